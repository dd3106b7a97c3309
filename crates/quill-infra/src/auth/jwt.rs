//! Signed session tokens.
//!
//! The token is what the login cookie holds: an HS256 JWT naming the user.
//! Nothing is stored server side, so logging out only drops the cookie.

use chrono::{TimeDelta, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use quill_core::ports::{AuthError, TokenClaims, TokenService};

pub const DEFAULT_SECRET: &str = "change-me-in-production";
pub const DEFAULT_EXPIRATION_HOURS: i64 = 24;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_hours: i64,
    pub issuer: String,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: DEFAULT_SECRET.to_string(),
            expiration_hours: DEFAULT_EXPIRATION_HOURS,
            issuer: "quill".to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: Uuid,
    username: String,
    iss: String,
    iat: i64,
    exp: i64,
}

pub struct JwtTokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    lifetime: TimeDelta,
    issuer: String,
}

impl JwtTokenService {
    pub fn new(config: JwtConfig) -> Self {
        if config.secret == DEFAULT_SECRET {
            tracing::warn!("Using default JWT secret. Set JWT_SECRET for production use.");
        }

        // Tokens must be able to expire at a representable instant.
        let lifetime = TimeDelta::try_hours(config.expiration_hours)
            .filter(|lifetime| Utc::now().checked_add_signed(*lifetime).is_some())
            .unwrap_or_else(|| {
                tracing::warn!(
                    hours = config.expiration_hours,
                    default = DEFAULT_EXPIRATION_HOURS,
                    "JWT expiration out of range; using the default"
                );
                TimeDelta::hours(DEFAULT_EXPIRATION_HOURS)
            });

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&config.issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
            lifetime,
            issuer: config.issuer,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate_token(&self, user_id: Uuid, username: &str) -> Result<String, AuthError> {
        let issued = Utc::now();
        let expires = issued
            .checked_add_signed(self.lifetime)
            .ok_or_else(|| AuthError::InvalidToken("expiry out of range".to_string()))?;
        let claims = SessionClaims {
            sub: user_id,
            username: username.to_string(),
            iss: self.issuer.clone(),
            iat: issued.timestamp(),
            exp: expires.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))
    }

    fn validate_token(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken(e.to_string()),
            })?;

        Ok(TokenClaims {
            user_id: data.claims.sub,
            username: data.claims.username,
            exp: data.claims.exp,
        })
    }

    fn expiration_seconds(&self) -> i64 {
        self.lifetime.num_seconds()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str, issuer: &str) -> JwtTokenService {
        JwtTokenService::new(JwtConfig {
            secret: secret.to_string(),
            expiration_hours: 1,
            issuer: issuer.to_string(),
        })
    }

    #[test]
    fn test_token_names_the_user() {
        let service = service("test-secret-key", "quill");
        let user_id = Uuid::new_v4();

        let token = service.generate_token(user_id, "alice").unwrap();
        let claims = service.validate_token(&token).unwrap();

        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.username, "alice");
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let result = service("test-secret-key", "quill").validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken(_))));
    }

    #[test]
    fn test_foreign_issuer_or_secret_is_rejected() {
        let token = service("same-secret", "quill")
            .generate_token(Uuid::new_v4(), "bob")
            .unwrap();

        assert!(service("same-secret", "elsewhere").validate_token(&token).is_err());
        assert!(service("other-secret", "quill").validate_token(&token).is_err());
    }

    #[test]
    fn test_expired_token() {
        let service = JwtTokenService::new(JwtConfig {
            expiration_hours: -2,
            ..JwtConfig::default()
        });
        let token = service.generate_token(Uuid::new_v4(), "carol").unwrap();

        assert!(matches!(
            service.validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_out_of_range_expiration_falls_back_to_default() {
        for hours in [i64::MAX, i64::MIN, 10_000_000_000] {
            let service = JwtTokenService::new(JwtConfig {
                expiration_hours: hours,
                ..JwtConfig::default()
            });
            assert_eq!(service.expiration_seconds(), DEFAULT_EXPIRATION_HOURS * 3600);
            assert!(service.generate_token(Uuid::new_v4(), "dave").is_ok());
        }
    }

    #[test]
    fn test_expiration_seconds() {
        let service = JwtTokenService::new(JwtConfig::default());
        assert_eq!(service.expiration_seconds(), 86_400);
    }
}
