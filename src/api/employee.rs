use crate::{
    auth::{auth::AuthUser, policy::Action},
    error::ApiError,
    model::user::{DirectoryEntry, HrFields, User},
    store::credentials,
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

/// Full staff records (Admin)
#[utoipa::path(
    get,
    path = "/api/users",
    responses(
        (status = 200, description = "All user records", body = [User]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_users(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::ListStaff)?;
    let users = credentials::list_all(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

/// Get one user record
#[utoipa::path(
    get,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Employees may only view themselves"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn get_user(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let user_id = path.into_inner();
    auth.authorize(Action::ViewUser { target: user_id })?;

    let user = credentials::get(pool.get_ref(), user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update HR fields of a user (Admin)
#[utoipa::path(
    put,
    path = "/api/users/{user_id}",
    params(
        ("user_id" = i64, Path, description = "User ID")
    ),
    request_body = HrFields,
    responses(
        (status = 200, description = "Updated record", body = User),
        (status = 400, description = "No fields, negative salary or empty name"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "User not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn update_user(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<HrFields>,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::EditHrFields)?;
    let user_id = path.into_inner();

    let user = credentials::update_hr_fields(pool.get_ref(), user_id, &payload).await?;
    tracing::info!(user_id, updated_by = auth.user_id, "HR fields updated");
    Ok(HttpResponse::Ok().json(user))
}

/// Verified colleagues, for addressing messages
#[utoipa::path(
    get,
    path = "/api/directory",
    responses(
        (status = 200, description = "Directory entries ordered by name", body = [DirectoryEntry]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn directory(
    _auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let entries = credentials::directory(pool.get_ref()).await?;
    Ok(HttpResponse::Ok().json(entries))
}
