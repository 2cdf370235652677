use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use tracing::debug;
use uuid::Uuid;

use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::role::Role,
    models::Claims,
};

/// Issues and validates signed, time-bounded session tokens.
///
/// Tokens are stateless: there is no refresh and no revocation list, the
/// claims are trusted until `exp`.
pub struct SessionIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionIssuer {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::seconds(ttl_secs),
        }
    }

    pub fn issue(&self, user_id: i64, role: Role) -> Result<String, ApiError> {
        self.issue_at(user_id, role, Utc::now())
    }

    fn issue_at(&self, user_id: i64, role: Role, issued_at: DateTime<Utc>) -> Result<String, ApiError> {
        let claims = Claims {
            sub: user_id.to_string(),
            user_id,
            role,
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ApiError::Internal(format!("failed to sign session token: {e}")))
    }

    /// Resolves a presented token into the caller's identity and role.
    pub fn resolve(&self, token: Option<&str>) -> Result<AuthUser, ApiError> {
        let token = token.ok_or(ApiError::Unauthenticated)?;

        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            debug!(error = %e, "Rejected session token");
            ApiError::InvalidToken
        })?;

        Ok(AuthUser {
            user_id: data.claims.user_id,
            role: data.claims.role,
        })
    }
}
