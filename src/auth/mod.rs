/*!
 * # Credentials and tokens
 *
 * Passwords are stored as argon2 PHC strings. A successful login yields a
 * pair of HS256 JWTs: a short-lived access token and a refresh token signed
 * with its own secret. Routes are not gated on these tokens.
 */

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::ServiceError;

const ISSUER: &str = "beauty-erp";

/// Which secret a token was signed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

/// Claim structure for JWT tokens
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,         // user_code
    pub username: String,
    pub user_type_id: i32,
    pub kind: TokenKind,
    pub jti: String,
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub refresh_expires_in: u64,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token has expired")]
    TokenExpired,

    #[error("Token creation failed: {0}")]
    TokenCreation(String),

    #[error("Password hashing failed: {0}")]
    Hashing(String),
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::TokenCreation(_) | AuthError::Hashing(_) => {
                ServiceError::InternalError(err.to_string())
            }
            other => ServiceError::AuthError(other.to_string()),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Debug)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_refresh_secret: String,
    pub access_token_expiration: Duration,
    pub refresh_token_expiration: Duration,
}

impl From<&AppConfig> for AuthConfig {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            jwt_secret: cfg.jwt_secret.clone(),
            jwt_refresh_secret: cfg.jwt_refresh_secret.clone(),
            access_token_expiration: Duration::from_secs(cfg.jwt_expiration),
            refresh_token_expiration: Duration::from_secs(cfg.jwt_refresh_expiration),
        }
    }
}

/// Hashes a plaintext password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}

/// Checks a plaintext password against a stored PHC string. Malformed
/// hashes never verify.
pub fn verify_password(password: &str, stored: &str) -> bool {
    PasswordHash::new(stored)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// Issues and checks JWTs.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    config: AuthConfig,
}

impl TokenIssuer {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    fn secret(&self, kind: TokenKind) -> &[u8] {
        match kind {
            TokenKind::Access => self.config.jwt_secret.as_bytes(),
            TokenKind::Refresh => self.config.jwt_refresh_secret.as_bytes(),
        }
    }

    fn sign(
        &self,
        user_code: &str,
        username: &str,
        user_type_id: i32,
        kind: TokenKind,
    ) -> Result<String, AuthError> {
        let ttl = match kind {
            TokenKind::Access => self.config.access_token_expiration,
            TokenKind::Refresh => self.config.refresh_token_expiration,
        };
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_code.to_string(),
            username: username.to_string(),
            user_type_id,
            kind,
            jti: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
            iss: ISSUER.to_string(),
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret(kind)),
        )
        .map_err(|e| AuthError::TokenCreation(e.to_string()))
    }

    /// Generates an access/refresh pair for a user.
    pub fn issue(
        &self,
        user_code: &str,
        username: &str,
        user_type_id: i32,
    ) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.sign(user_code, username, user_type_id, TokenKind::Access)?,
            refresh_token: self.sign(user_code, username, user_type_id, TokenKind::Refresh)?,
            token_type: "Bearer".to_string(),
            expires_in: self.config.access_token_expiration.as_secs(),
            refresh_expires_in: self.config.refresh_token_expiration.as_secs(),
        })
    }

    /// Decodes a token of the given kind, checking signature, expiry and issuer.
    pub fn validate(&self, token: &str, kind: TokenKind) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let claims = decode::<Claims>(token, &DecodingKey::from_secret(self.secret(kind)), &validation)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })?
            .claims;

        if claims.kind != kind {
            return Err(AuthError::InvalidToken);
        }
        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(AuthConfig {
            jwt_secret: "access_secret_for_unit_tests_0123456789".into(),
            jwt_refresh_secret: "refresh_secret_for_unit_tests_9876543210".into(),
            access_token_expiration: Duration::from_secs(900),
            refresh_token_expiration: Duration::from_secs(86_400),
        })
    }

    #[test]
    fn password_hash_round_trip() {
        let hash = hash_password("s3cret-pass").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password("s3cret-pass", &hash));
        assert!(!verify_password("wrong", &hash));
        assert!(!verify_password("s3cret-pass", "not-a-phc-string"));
    }

    #[test]
    fn issued_tokens_validate_with_their_own_secret() {
        let issuer = issuer();
        let pair = issuer.issue("U001", "alice", 1).unwrap();

        let access = issuer.validate(&pair.access_token, TokenKind::Access).unwrap();
        assert_eq!(access.sub, "U001");
        assert_eq!(access.username, "alice");

        let refresh = issuer.validate(&pair.refresh_token, TokenKind::Refresh).unwrap();
        assert_eq!(refresh.kind, TokenKind::Refresh);

        assert!(matches!(
            issuer.validate(&pair.refresh_token, TokenKind::Access),
            Err(AuthError::InvalidToken)
        ));
    }
}
