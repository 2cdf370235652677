use crate::auth::auth::session_token;
use crate::auth::jwt::SessionIssuer;
use crate::error::ApiError;
use actix_web::middleware::Next;
use actix_web::{
    Error, HttpMessage,
    body::BoxBody,
    dev::{ServiceRequest, ServiceResponse},
    web::Data,
};
use tracing::{debug, info};

/// Resolves the session token once per request and stores the caller's
/// [`AuthUser`](crate::auth::auth::AuthUser) in the request extensions.
pub async fn auth_middleware(
    req: ServiceRequest,
    next: Next<BoxBody>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    let sessions = match req.app_data::<Data<SessionIssuer>>() {
        Some(s) => s.clone(),
        None => {
            return Ok(req.error_response(ApiError::Internal("session issuer missing".into())));
        }
    };

    let resolved = sessions.resolve(session_token(req.headers()));

    match resolved {
        Ok(user) => {
            debug!(user_id = user.user_id, role = %user.role, path = req.path(), "Session resolved");
            req.extensions_mut().insert(user);
            next.call(req).await
        }
        Err(e) => {
            info!(error = %e, path = req.path(), "Rejected unauthenticated request");
            Ok(req.error_response(e))
        }
    }
}
