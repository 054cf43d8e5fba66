//! Authentication service.
//!
//! Passwords are hashed with Argon2id; bearer tokens are HS256 JWTs with an
//! expiry. Token verification always re-fetches the user record, so a
//! deleted user is de-authorized immediately rather than at token expiry.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use thiserror::Error;

use shopkit_core::{Email, EmailError, User, UserId};

use crate::db::{RepositoryError, UserRepository};

/// Authentication failures.
///
/// `InvalidCredentials` carries one uniform message for both unknown emails
/// and wrong passwords, so login cannot be used as a user-existence oracle.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Incorrect email or password")]
    InvalidCredentials,

    #[error("User already exists with this email")]
    EmailTaken,

    #[error("Please include a valid email")]
    InvalidEmail(#[from] EmailError),

    #[error("No token provided, access denied")]
    NoToken,

    #[error("Token is not valid")]
    InvalidToken,

    #[error("User no longer exists")]
    UserGone,

    #[error("password hashing failed")]
    PasswordHash,

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

/// JWT signing and verification keys, derived from the secret once.
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenKeys {
    /// Derive HS256 keys from a shared secret.
    #[must_use]
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// JWT claims carried by a bearer token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    /// User ID.
    sub: String,
    /// Expiry, seconds since the epoch.
    exp: i64,
}

/// Authentication service.
///
/// Handles user registration, login, token issuance, and verification.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
    keys: &'a TokenKeys,
    token_ttl_days: u32,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool, keys: &'a TokenKeys, token_ttl_days: u32) -> Self {
        Self {
            users: UserRepository::new(pool),
            keys,
            token_ttl_days,
        }
    }

    /// Register a new user and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::EmailTaken` if the email is already registered.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, String), AuthError> {
        let email = Email::parse(email)?;
        let password_hash = hash_password(password)?;

        let user = self
            .users
            .create(name, &email, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AuthError::EmailTaken,
                other => AuthError::Repository(other),
            })?;

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    /// Login with email and password and issue a token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email is unknown or the
    /// password is wrong — deliberately indistinguishable.
    pub async fn login(&self, email: &Email, password: &str) -> Result<(User, String), AuthError> {
        let (user, password_hash) = self
            .users
            .get_by_email_with_hash(email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        let token = self.issue_token(&user.id)?;
        Ok((user, token))
    }

    /// Verify a bearer token and load its user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` for bad signatures or expired tokens.
    /// Returns `AuthError::UserGone` if the subject no longer exists.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &self.keys.decoding,
            &Validation::default(),
        )
        .map_err(|_| AuthError::InvalidToken)?;

        let user_id = UserId::new(data.claims.sub);
        self.users
            .get_by_id(&user_id)
            .await?
            .ok_or(AuthError::UserGone)
    }

    /// Sign a token for a user, valid for the configured number of days.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidToken` if signing fails.
    pub fn issue_token(&self, user_id: &UserId) -> Result<String, AuthError> {
        let exp = Utc::now() + Duration::days(i64::from(self.token_ttl_days));
        let claims = Claims {
            sub: user_id.as_str().to_owned(),
            exp: exp.timestamp(),
        };

        jsonwebtoken::encode(&Header::default(), &claims, &self.keys.encoding)
            .map_err(|_| AuthError::InvalidToken)
    }
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("hunter2-but-longer").unwrap();
        assert!(verify_password("hunter2-but-longer", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same-password").unwrap();
        let b = hash_password("same-password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_token_roundtrip_claims() {
        let keys = TokenKeys::from_secret(b"a-test-signing-key-of-decent-size");
        let exp = (Utc::now() + Duration::days(1)).timestamp();
        let claims = Claims {
            sub: "user-1".to_owned(),
            exp,
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding).unwrap();

        let decoded =
            jsonwebtoken::decode::<Claims>(&token, &keys.decoding, &Validation::default()).unwrap();
        assert_eq!(decoded.claims.sub, "user-1");
    }

    #[test]
    fn test_expired_token_rejected() {
        let keys = TokenKeys::from_secret(b"a-test-signing-key-of-decent-size");
        let claims = Claims {
            sub: "user-1".to_owned(),
            exp: (Utc::now() - Duration::hours(2)).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert!(
            jsonwebtoken::decode::<Claims>(&token, &keys.decoding, &Validation::default()).is_err()
        );
    }

    #[test]
    fn test_wrong_key_rejected() {
        let keys = TokenKeys::from_secret(b"a-test-signing-key-of-decent-size");
        let other = TokenKeys::from_secret(b"a-different-signing-key-entirely");
        let claims = Claims {
            sub: "user-1".to_owned(),
            exp: (Utc::now() + Duration::days(1)).timestamp(),
        };
        let token = jsonwebtoken::encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert!(
            jsonwebtoken::decode::<Claims>(&token, &other.decoding, &Validation::default())
                .is_err()
        );
    }
}
