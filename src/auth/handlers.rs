use crate::{
    auth::{
        jwt::SessionIssuer,
        password::{hash_password, validate_strength, verify_password},
        policy,
    },
    config::Config,
    error::ApiError,
    ledger::attendance::today,
    mail::{MailerSlot, verification_mail},
    model::{role::Role, user::NewUser},
    models::{LoginReqDto, LoginResponse, ResendVerificationReq, ResetPasswordReq, SignupReq, VerifyReq},
    store::credentials,
    utils::email_registry::{EmailRegistry, normalize},
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

fn verification_link(config: &Config, token: &str) -> String {
    format!("{}/verify/{}", config.app_base_url.trim_end_matches('/'), token)
}

/// Account registration
#[utoipa::path(
    post,
    path = "/api/signup",
    request_body = SignupReq,
    responses(
        (status = 201, description = "Account created, verification mail sent", body = Object, example = json!({
            "message": "Signup successful. Please verify your email."
        })),
        (status = 400, description = "Missing fields or weak password"),
        (status = 409, description = "Email or employee code taken, or an admin already exists")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_signup", skip_all, fields(role = %req.role))]
pub async fn signup(
    req: web::Json<SignupReq>,
    pool: web::Data<SqlitePool>,
    registry: web::Data<EmailRegistry>,
    mailer: web::Data<MailerSlot>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let req = req.into_inner();

    // a second admin is refused before any other check
    if req.role == Role::Admin {
        let admins = credentials::count_admins(pool.get_ref()).await?;
        policy::authorize_admin_signup(admins)?;
    }

    let email = normalize(&req.email);
    let name = req.name.trim();
    let employee_code = req.employee_code.trim();

    if email.is_empty() || name.is_empty() || employee_code.is_empty() {
        return Err(ApiError::invalid_input("employeeId, name and email are required"));
    }
    validate_strength(&req.password)?;

    if !registry.is_available(&email, pool.get_ref()).await? {
        info!("Signup rejected: email already registered");
        return Err(ApiError::UserExists);
    }

    let token = Uuid::new_v4().to_simple().to_string();
    let new_user = NewUser {
        employee_code: employee_code.to_string(),
        name: name.to_string(),
        email: email.clone(),
        password_hash: hash_password(&req.password)?,
        role: req.role,
        join_date: today(),
        verification_token: token.clone(),
    };

    let user = credentials::create(pool.get_ref(), &new_user).await?;
    registry.remember(&email).await;
    info!(user_id = user.id, "Account created");

    let mail = verification_mail(&email, &verification_link(&config, &token));
    if let Err(e) = mailer.send(mail).await {
        warn!(error = %e, user_id = user.id, "Verification mail not sent");
    }

    Ok(HttpResponse::Created().json(json!({
        "message": "Signup successful. Please verify your email.",
        "user": user,
    })))
}

/// Email verification
#[utoipa::path(
    post,
    path = "/api/verify",
    request_body = VerifyReq,
    responses(
        (status = 200, description = "Account verified", body = Object, example = json!({
            "message": "Verified"
        })),
        (status = 400, description = "Unknown or already used token")
    ),
    tag = "Auth"
)]
pub async fn verify(
    req: web::Json<VerifyReq>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let token = req.token.trim();
    if token.is_empty() || !credentials::set_verified(pool.get_ref(), token).await? {
        return Err(ApiError::invalid_input("Invalid token"));
    }

    debug!("Account verified");
    Ok(HttpResponse::Ok().json(json!({ "message": "Verified" })))
}

/// Re-send the verification mail for an unverified account
#[utoipa::path(
    post,
    path = "/api/verify/resend",
    request_body = ResendVerificationReq,
    responses(
        (status = 202, description = "Mail queued if the account is awaiting verification"),
        (status = 503, description = "Mail service not ready yet")
    ),
    tag = "Auth"
)]
pub async fn resend_verification(
    req: web::Json<ResendVerificationReq>,
    pool: web::Data<SqlitePool>,
    mailer: web::Data<MailerSlot>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    if !mailer.is_ready() {
        return Err(ApiError::MailerNotReady);
    }

    let email = normalize(&req.email);
    // same answer whether or not the address is known
    if let Some(token) = credentials::verification_token(pool.get_ref(), &email).await? {
        mailer
            .send(verification_mail(&email, &verification_link(&config, &token)))
            .await?;
    }

    Ok(HttpResponse::Accepted().json(json!({
        "message": "If the account awaits verification, a new link has been sent."
    })))
}

/// Login and receive a session token
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginReqDto,
    responses(
        (status = 200, description = "Session issued", body = LoginResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 403, description = "Email not verified, or not an admin on admin login")
    ),
    tag = "Auth"
)]
#[instrument(
    name = "auth_login",
    skip(pool, sessions, req),
    fields(admin_login = req.is_admin_login)
)]
pub async fn login(
    req: web::Json<LoginReqDto>,
    pool: web::Data<SqlitePool>,
    sessions: web::Data<SessionIssuer>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let email = normalize(&req.email);
    let creds = match credentials::find_credentials(pool.get_ref(), &email).await? {
        Some(creds) => creds,
        None => {
            info!("Invalid credentials: user not found");
            return Err(ApiError::InvalidCredentials);
        }
    };

    if !verify_password(&req.password, &creds.password_hash)? {
        info!(user_id = creds.id, "Invalid credentials: password mismatch");
        return Err(ApiError::InvalidCredentials);
    }

    if !creds.is_verified {
        return Err(ApiError::Unverified);
    }

    if req.is_admin_login && creds.role != Role::Admin {
        return Err(ApiError::Forbidden("Access denied: not an admin account"));
    }

    let token = sessions.issue(creds.id, creds.role)?;
    let user = credentials::get(pool.get_ref(), creds.id).await?;

    info!(user_id = user.id, "Login successful");
    Ok(HttpResponse::Ok().json(LoginResponse { token, user }))
}

/// Reset a password after confirming email and employee code
#[utoipa::path(
    post,
    path = "/api/reset-password",
    request_body = ResetPasswordReq,
    responses(
        (status = 200, description = "Password updated"),
        (status = 400, description = "Identity check failed or weak password")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_reset_password", skip_all)]
pub async fn reset_password(
    req: web::Json<ResetPasswordReq>,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let email = normalize(&req.email);
    let user = credentials::find_by_email_and_code(pool.get_ref(), &email, req.employee_code.trim())
        .await?
        .ok_or_else(|| ApiError::invalid_input("Verification failed"))?;

    validate_strength(&req.new_password)?;
    credentials::set_password(pool.get_ref(), user.id, &hash_password(&req.new_password)?).await?;

    info!(user_id = user.id, "Password reset");
    Ok(HttpResponse::Ok().json(json!({ "message": "Password updated" })))
}
