//! JWT token service for staff sessions

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum accepted `JWT_SECRET` length
pub const MIN_SECRET_LEN: usize = 32;

/// JWT configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 key (at least 32 characters)
    pub secret: String,
    /// Token lifetime in minutes
    pub expiration_minutes: i64,
    pub issuer: String,
    pub audience: String,
    /// Set when no usable `JWT_SECRET` was found and a random key stands in
    #[serde(skip)]
    pub secret_generated: bool,
}

impl Default for JwtConfig {
    fn default() -> Self {
        let (secret, secret_generated) = match load_jwt_secret() {
            Ok(Some(secret)) => (secret, false),
            Ok(None) => {
                tracing::warn!("JWT_SECRET not set, generating a temporary key");
                (generate_printable_secret(), true)
            }
            Err(e) => {
                // tokens signed with a generated key do not survive restarts
                tracing::error!("JWT configuration error: {e}, using a generated key");
                (generate_printable_secret(), true)
            }
        };

        Self {
            secret,
            secret_generated,
            expiration_minutes: std::env::var("JWT_EXPIRATION_MINUTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(720),
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "cafe-server".to_string()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "cafe-staff".to_string()),
        }
    }
}

impl JwtConfig {
    /// Refuse a generated key in production; sessions must survive restarts
    pub fn require_configured_secret(&self, production: bool) -> Result<(), JwtError> {
        if production && self.secret_generated {
            return Err(JwtError::ConfigError(format!(
                "JWT_SECRET of at least {MIN_SECRET_LEN} characters must be set in production"
            )));
        }
        Ok(())
    }
}

/// Claims carried by a staff token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Staff account id
    pub sub: String,
    pub email: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
    pub iss: String,
    pub aud: String,
}

#[derive(Error, Debug)]
pub enum JwtError {
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Token generation failed: {0}")]
    GenerationFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Random 64-character printable secret (development)
pub fn generate_printable_secret() -> String {
    const ALLOWED: &[u8] =
        b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*()-_=+[]{}|;:,.<>?";
    let mut rng = rand::thread_rng();
    (0..64)
        .map(|_| ALLOWED[rng.gen_range(0..ALLOWED.len())] as char)
        .collect()
}

/// `Ok(None)` when `JWT_SECRET` is unset
fn load_jwt_secret() -> Result<Option<String>, JwtError> {
    match std::env::var("JWT_SECRET") {
        Ok(secret) if secret.len() >= MIN_SECRET_LEN => Ok(Some(secret)),
        Ok(_) => Err(JwtError::ConfigError(format!(
            "JWT_SECRET must be at least {MIN_SECRET_LEN} characters long"
        ))),
        Err(_) => Ok(None),
    }
}

#[derive(Clone)]
pub struct JwtService {
    pub config: JwtConfig,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtService {
    pub fn with_config(config: JwtConfig) -> Self {
        let encoding_key = EncodingKey::from_secret(config.secret.as_bytes());
        let decoding_key = DecodingKey::from_secret(config.secret.as_bytes());

        Self {
            config,
            encoding_key,
            decoding_key,
        }
    }

    pub fn generate_token(&self, user_id: &str, email: &str, role: &str) -> Result<String, JwtError> {
        let now = Utc::now();
        let expiration = now + Duration::minutes(self.config.expiration_minutes);

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            exp: expiration.timestamp(),
            iat: now.timestamp(),
            iss: self.config.issuer.clone(),
            aud: self.config.audience.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| JwtError::GenerationFailed(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[&self.config.audience]);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_required_spec_claims(&["sub", "exp", "iat", "iss", "aud"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::ExpiredToken,
                ErrorKind::InvalidSignature => JwtError::InvalidSignature,
                _ => JwtError::InvalidToken(e.to_string()),
            }
        })?;

        Ok(token_data.claims)
    }

    /// Token part of an `Authorization: Bearer <token>` header
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header.strip_prefix("Bearer ").map(str::trim).filter(|t| !t.is_empty())
    }
}

/// Authenticated staff member, inserted into request extensions by
/// [`require_staff`](crate::auth::require_staff)
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

impl From<Claims> for CurrentUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
            role: claims.role,
        }
    }
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role == "admin"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(expiration_minutes: i64) -> JwtService {
        JwtService::with_config(JwtConfig {
            secret: generate_printable_secret(),
            expiration_minutes,
            issuer: "cafe-server".to_string(),
            audience: "cafe-staff".to_string(),
            secret_generated: false,
        })
    }

    #[test]
    fn test_generated_secret_refused_in_production() {
        let mut config = service(60).config;
        assert!(config.require_configured_secret(true).is_ok());

        config.secret_generated = true;
        assert!(config.require_configured_secret(false).is_ok());
        assert!(matches!(
            config.require_configured_secret(true),
            Err(JwtError::ConfigError(_))
        ));
    }

    #[test]
    fn test_jwt_generation_and_validation() {
        let service = service(60);
        let token = service
            .generate_token("admin", "admin@beanbox.com", "admin")
            .expect("Failed to generate test token");

        let claims = service.validate_token(&token).expect("Failed to validate test token");
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.email, "admin@beanbox.com");

        let user = CurrentUser::from(claims);
        assert!(user.is_admin());
    }

    #[test]
    fn test_expired_token() {
        // well past the default 60s leeway
        let service = service(-10);
        let token = service.generate_token("admin", "admin@beanbox.com", "admin").unwrap();
        assert!(matches!(
            service.validate_token(&token),
            Err(JwtError::ExpiredToken)
        ));
    }

    #[test]
    fn test_foreign_key_rejected() {
        let token = service(60)
            .generate_token("admin", "admin@beanbox.com", "admin")
            .unwrap();
        assert!(matches!(
            service(60).validate_token(&token),
            Err(JwtError::InvalidSignature)
        ));
        assert!(service(60).validate_token("not-a-token").is_err());
    }

    #[test]
    fn test_printable_secret() {
        let a = generate_printable_secret();
        assert_eq!(a.len(), 64);
        assert!(a.len() >= MIN_SECRET_LEN);
        assert_ne!(a, generate_printable_secret());
    }

    #[test]
    fn test_extract_from_header() {
        assert_eq!(JwtService::extract_from_header("Bearer abc"), Some("abc"));
        assert_eq!(JwtService::extract_from_header("Basic abc"), None);
        assert_eq!(JwtService::extract_from_header("Bearer "), None);
    }
}
