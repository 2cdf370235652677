#[macro_use]
mod common;

use actix_web::{App, http::StatusCode, test};
use async_trait::async_trait;
use serde_json::json;
use std::sync::{Arc, Mutex};

use common::{TestContext, post};
use dayflow::mail::{Mail, MailError, Mailer};

fn signup_body(code: &str, email: &str, password: &str, role: &str) -> serde_json::Value {
    json!({
        "employeeId": code,
        "name": "Someone",
        "email": email,
        "password": password,
        "role": role,
    })
}

#[actix_web::test]
async fn signup_rules() {
    let ctx = TestContext::new().await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    let (status, body) = call!(app, post("/api/signup", None, signup_body("E-1", "a@x.io", "short", "Employee")));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "InvalidInput");

    let (status, body) = call!(app, post("/api/signup", None, signup_body("A-1", "boss@x.io", "long enough", "Admin")));
    assert_eq!(status, StatusCode::CREATED);
    assert!(body["user"].get("passwordHash").is_none());
    assert_eq!(body["user"]["jobTitle"], "HR");

    let (status, body) = call!(app, post("/api/signup", None, signup_body("A-2", "boss2@x.io", "long enough", "Admin")));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "An admin account already exists");

    // refused as a conflict even when the rest of the form is invalid
    let (status, body) = call!(app, post("/api/signup", None, signup_body("", "", "short", "Admin")));
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Conflict");

    let (status, _) = call!(app, post("/api/signup", None, signup_body("E-2", "BOSS@x.io", "long enough", "Employee")));
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = call!(app, post("/api/signup", None, signup_body("A-1", "other@x.io", "long enough", "Employee")));
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_web::test]
async fn login_failures() {
    let ctx = TestContext::new().await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;

    call!(app, post("/api/signup", None, signup_body("E-1", "e@x.io", "long enough", "Employee")));

    let login = |password: &str, admin: bool| {
        post(
            "/api/login",
            None,
            json!({ "email": "e@x.io", "password": password, "isAdminLogin": admin }),
        )
    };

    let (status, body) = call!(app, login("long enough", false));
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["message"], "Email not verified");

    let token = ctx.verification_token("e@x.io").await;
    let (status, _) = call!(app, post("/api/verify", None, json!({ "token": token })));
    assert_eq!(status, StatusCode::OK);
    let (status, _) = call!(app, post("/api/verify", None, json!({ "token": token })));
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = call!(app, login("wrong password", false));
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, body) = call!(
        app,
        post("/api/login", None, json!({ "email": "nobody@x.io", "password": "long enough" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid credentials");

    let (status, _) = call!(app, login("long enough", true));
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call!(app, login("long enough", false));
    assert_eq!(status, StatusCode::OK);
    assert!(body["token"].as_str().is_some_and(|t| !t.is_empty()));
    assert_eq!(body["user"]["email"], "e@x.io");
}

#[actix_web::test]
async fn reset_password_checks_identity() {
    let ctx = TestContext::new().await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;
    register!(app, ctx, "E-1", "e@x.io", "Employee");

    let (status, body) = call!(
        app,
        post(
            "/api/reset-password",
            None,
            json!({ "email": "e@x.io", "employeeId": "E-9", "newPassword": "brand new pass" })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Verification failed");

    let (status, _) = call!(
        app,
        post(
            "/api/reset-password",
            None,
            json!({ "email": "e@x.io", "employeeId": "E-1", "newPassword": "short" })
        )
    );
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = call!(
        app,
        post(
            "/api/reset-password",
            None,
            json!({ "email": "e@x.io", "employeeId": "E-1", "newPassword": "brand new pass" })
        )
    );
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call!(
        app,
        post("/api/login", None, json!({ "email": "e@x.io", "password": "correct horse" }))
    );
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call!(
        app,
        post("/api/login", None, json!({ "email": "e@x.io", "password": "brand new pass" }))
    );
    assert_eq!(status, StatusCode::OK);
}

#[derive(Default)]
struct Outbox(Mutex<Vec<Mail>>);

#[async_trait]
impl Mailer for Outbox {
    async fn send(&self, mail: &Mail) -> Result<(), MailError> {
        self.0.lock().unwrap().push(mail.clone());
        Ok(())
    }
}

#[actix_web::test]
async fn resend_waits_for_the_mailer() {
    let ctx = TestContext::new().await;
    let app = test::init_service(App::new().configure(|cfg| ctx.configure(cfg))).await;
    call!(app, post("/api/signup", None, signup_body("E-1", "e@x.io", "long enough", "Employee")));

    let resend = || post("/api/verify/resend", None, json!({ "email": "e@x.io" }));

    let (status, body) = call!(app, resend());
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "Unavailable");

    let outbox = Arc::new(Outbox::default());
    assert!(ctx.services.mailer.install(outbox.clone()));

    let (status, _) = call!(app, resend());
    assert_eq!(status, StatusCode::ACCEPTED);

    let token = ctx.verification_token("e@x.io").await;
    let sent = outbox.0.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "e@x.io");
    assert!(sent[0].html.contains(&format!("http://localhost:3000/verify/{token}")));
}
