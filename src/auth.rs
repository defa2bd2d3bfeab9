use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AuthSettings;
use crate::error::ApiError;
use crate::routes::AppState;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing bearer token")]
    MissingToken,

    #[error("Invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token subject is not a matcher id")]
    InvalidSubject,
}

/// Claims carried by matcher tokens. `sub` holds the matcher id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 verifier for matcher bearer tokens
#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<&str>, leeway_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_secs;
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(&settings.jwt_secret, settings.issuer.as_deref(), settings.leeway_secs)
    }

    /// Verify `token` and return the matcher id it names
    pub fn verify(&self, token: &str) -> Result<Uuid, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| AuthError::InvalidSubject)
    }
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Matcher identity taken from a verified bearer token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedMatcher(pub Uuid);

impl AuthenticatedMatcher {
    pub fn id(&self) -> Uuid {
        self.0
    }

    fn from_request_sync(req: &HttpRequest) -> Result<Self, ApiError> {
        let state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| ApiError::Internal("Application state not configured".to_string()))?;

        let token = bearer_token(req).ok_or(AuthError::MissingToken)?;
        let matcher_id = state.auth.verify(token).map_err(|e| {
            tracing::warn!("Rejected token on {}: {}", req.path(), e);
            e
        })?;

        Ok(Self(matcher_id))
    }
}

impl FromRequest for AuthenticatedMatcher {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, sub: &str, iss: Option<&str>) -> String {
        let claims = Claims {
            sub: sub.to_string(),
            exp: jsonwebtoken::get_current_timestamp() + 3600,
            iss: iss.map(str::to_string),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_verify_returns_subject() {
        let verifier = JwtVerifier::new("secret", None, 0);
        let id = Uuid::new_v4();
        assert_eq!(verifier.verify(&token("secret", &id.to_string(), None)).unwrap(), id);
    }

    #[test]
    fn test_verify_rejects_bad_tokens() {
        let verifier = JwtVerifier::new("secret", Some("matchday"), 0);
        let id = Uuid::new_v4().to_string();

        assert!(matches!(
            verifier.verify(&token("other", &id, Some("matchday"))),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            verifier.verify(&token("secret", &id, Some("elsewhere"))),
            Err(AuthError::InvalidToken(_))
        ));
        assert!(matches!(
            verifier.verify(&token("secret", "not-a-uuid", Some("matchday"))),
            Err(AuthError::InvalidSubject)
        ));
    }
}
