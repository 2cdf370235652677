use crate::{
    auth::{
        jwt::SessionIssuer,
        policy::{self, Action, Scope},
    },
    error::ApiError,
    model::role::Role,
};
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload, http::header, web::Data};
use futures::future::{Ready, ready};
use serde::Serialize;

/// Identity and role resolved from the session token.
#[derive(Debug, Clone, Serialize)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
}

impl AuthUser {
    pub fn authorize(&self, action: Action) -> Result<Scope, ApiError> {
        policy::authorize(self, action)
    }
}

/// Token from the `Authorization` header, with or without a `Bearer ` prefix.
pub fn session_token(headers: &header::HeaderMap) -> Option<&str> {
    let raw = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = raw.strip_prefix("Bearer ").unwrap_or(raw).trim();
    (!token.is_empty()).then_some(token)
}

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        // already resolved by auth_middleware
        if let Some(user) = req.extensions().get::<AuthUser>() {
            return ready(Ok(user.clone()));
        }

        let sessions = match req.app_data::<Data<SessionIssuer>>() {
            Some(s) => s,
            None => return ready(Err(ApiError::Internal("session issuer missing".into()))),
        };

        ready(sessions.resolve(session_token(req.headers())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn accepts_raw_and_bearer_tokens() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer abc.def"))
            .to_http_request();
        assert_eq!(session_token(req.headers()), Some("abc.def"));

        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "abc.def"))
            .to_http_request();
        assert_eq!(session_token(req.headers()), Some("abc.def"));
    }

    #[test]
    fn blank_header_is_no_token() {
        let req = TestRequest::default()
            .insert_header((header::AUTHORIZATION, "Bearer "))
            .to_http_request();
        assert_eq!(session_token(req.headers()), None);
        assert_eq!(session_token(TestRequest::default().to_http_request().headers()), None);
    }

    #[actix_web::test]
    async fn extractor_resolves_header_without_middleware() {
        let sessions = SessionIssuer::new("secret", 60);
        let token = sessions.issue(3, Role::Employee).unwrap();
        let req = TestRequest::default()
            .app_data(Data::new(sessions))
            .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
            .to_http_request();

        let user = AuthUser::extract(&req).await.unwrap();
        assert_eq!(user.user_id, 3);
        assert_eq!(user.role, Role::Employee);
    }
}
