#![allow(dead_code, unused_macros)]

use actix_web::{test::TestRequest, web};
use serde_json::Value;
use std::net::SocketAddr;
use tempfile::TempDir;

use dayflow::{
    config::Config, db::init_db, routes::RateLimits, state::Services, store::credentials,
};

pub struct TestContext {
    pub services: Services,
    limits: RateLimits,
    pub uploads: TempDir,
}

impl TestContext {
    pub async fn new() -> Self {
        let uploads = tempfile::tempdir().unwrap();
        let config = test_config(&uploads);
        let limits = RateLimits::from_config(&config).unwrap();
        let pool = init_db(&config.database_url).await.unwrap();

        Self {
            services: Services::new(pool, config),
            limits,
            uploads,
        }
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        dayflow::configure_app(cfg, &self.services, &self.limits);
    }

    pub async fn verification_token(&self, email: &str) -> String {
        credentials::verification_token(&self.services.pool, email)
            .await
            .unwrap()
            .expect("account awaiting verification")
    }
}

fn test_config(uploads: &TempDir) -> Config {
    Config {
        database_url: "sqlite::memory:".into(),
        jwt_secret: "integration-test-secret".into(),
        server_addr: "127.0.0.1:0".into(),
        session_ttl: 3600,
        rate_login_per_min: 10_000,
        rate_signup_per_min: 10_000,
        rate_protected_per_min: 10_000,
        api_prefix: "/api".into(),
        app_base_url: "http://localhost:3000".into(),
        public_base_url: "http://localhost:5000".into(),
        upload_dir: uploads.path().to_string_lossy().into_owned(),
        max_upload_bytes: 1024,
        log_dir: "logs".into(),
        mail_from: "test@dayflow.io".into(),
    }
}

fn peer() -> SocketAddr {
    "127.0.0.1:40000".parse().unwrap()
}

/// Rate limiting keys on the peer address, so every request carries one.
pub fn request(req: TestRequest, token: Option<&str>) -> TestRequest {
    let req = req.peer_addr(peer());
    match token {
        Some(token) => req.insert_header(("Authorization", format!("Bearer {token}"))),
        None => req,
    }
}

pub fn post(path: &str, token: Option<&str>, body: Value) -> TestRequest {
    request(TestRequest::post().uri(path), token).set_json(body)
}

pub fn put(path: &str, token: Option<&str>, body: Value) -> TestRequest {
    request(TestRequest::put().uri(path), token).set_json(body)
}

pub fn get(path: &str, token: Option<&str>) -> TestRequest {
    request(TestRequest::get().uri(path), token)
}

/// Sends `$req` and returns `(status, json body)`.
macro_rules! call {
    ($app:expr, $req:expr) => {{
        let resp = actix_web::test::call_service(&$app, $req.to_request()).await;
        let status = resp.status();
        let bytes = actix_web::test::read_body(resp).await;
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            serde_json::Value::String(String::from_utf8_lossy(&bytes).into_owned())
        });
        (status, body)
    }};
}

/// Signs up, verifies and logs in; returns `(token, user_id)`.
macro_rules! register {
    ($app:expr, $ctx:expr, $code:expr, $email:expr, $role:expr) => {{
        let (status, body) = call!(
            $app,
            common::post(
                "/api/signup",
                None,
                serde_json::json!({
                    "employeeId": $code,
                    "name": format!("Person {}", $code),
                    "email": $email,
                    "password": "correct horse",
                    "role": $role,
                })
            )
        );
        assert_eq!(status, actix_web::http::StatusCode::CREATED, "{body}");

        let token = $ctx.verification_token($email).await;
        let (status, _) = call!(
            $app,
            common::post("/api/verify", None, serde_json::json!({ "token": token }))
        );
        assert_eq!(status, actix_web::http::StatusCode::OK);

        let (status, body) = call!(
            $app,
            common::post(
                "/api/login",
                None,
                serde_json::json!({ "email": $email, "password": "correct horse" })
            )
        );
        assert_eq!(status, actix_web::http::StatusCode::OK, "{body}");
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }};
}
