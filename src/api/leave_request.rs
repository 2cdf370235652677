use crate::{
    auth::{auth::AuthUser, policy::Action},
    error::ApiError,
    ledger::leave,
    model::leave_request::{LeaveRequest, LeaveStatus, NewLeave},
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DecideLeave {
    #[schema(example = "Approved")]
    pub status: LeaveStatus,
    #[serde(default)]
    #[schema(example = "ok")]
    pub admin_remarks: Option<String>,
}

/* =========================
Apply for leave (Employee)
========================= */
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body(
        content = NewLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted as Pending", body = LeaveRequest),
        (status = 400, description = "Start date after end date"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only employees request leave")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewLeave>,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::ApplyLeave)?;
    let request = leave::apply(pool.get_ref(), auth.user_id, &payload).await?;
    Ok(HttpResponse::Created().json(request))
}

/* =========================
Approve or reject (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/leaves/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request to decide")
    ),
    request_body = DecideLeave,
    responses(
        (status = 200, description = "Leave decided", body = LeaveRequest),
        (status = 400, description = "Status must be Approved or Rejected"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Leave request already decided")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
    payload: web::Json<DecideLeave>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();
    let remarks = payload
        .admin_remarks
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let request = leave::decide(pool.get_ref(), &auth, leave_id, payload.status, remarks).await?;
    Ok(HttpResponse::Ok().json(request))
}

/* =========================
Get leave by id
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves/{leave_id}",
    params(
        ("leave_id" = i64, Path, description = "ID of the leave request")
    ),
    responses(
        (status = 200, description = "Leave request", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Not found, or not visible to the caller")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ApiError> {
    let scope = auth.authorize(Action::ViewLeave)?;
    let request = leave::get(pool.get_ref(), path.into_inner(), scope).await?;
    Ok(HttpResponse::Ok().json(request))
}

/* =========================
List leave requests
========================= */
#[utoipa::path(
    get,
    path = "/api/leaves",
    responses(
        (status = 200, description = "All requests for Admin, own requests for Employees", body = [LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let scope = auth.authorize(Action::ViewLeave)?;
    let requests = leave::list(pool.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(requests))
}
