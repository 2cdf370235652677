use crate::{
    api::optional_json,
    auth::{auth::AuthUser, policy::Action},
    error::ApiError,
    ledger::attendance::{self, today},
    model::attendance::{AttendanceRecord, AttendanceSummary, SweepReport},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;
use utoipa::ToSchema;

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckInReq {
    /// defaults to today
    #[serde(default)]
    #[schema(example = "2024-01-10")]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub is_half_day: bool,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct AttendanceDateReq {
    /// defaults to today
    #[serde(default)]
    #[schema(example = "2024-01-10")]
    pub date: Option<NaiveDate>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/checkin",
    request_body(content = CheckInReq, description = "Optional; omit for a full day today"),
    responses(
        (status = 201, description = "Checked in", body = AttendanceRecord),
        (status = 400, description = "Malformed body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only employees record attendance"),
        (status = 409, description = "Already checked in on that date")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::CheckIn)?;
    let req: CheckInReq = optional_json(&body)?;

    let record = attendance::check_in(
        pool.get_ref(),
        auth.user_id,
        req.date.unwrap_or_else(today),
        req.is_half_day,
    )
    .await?;

    Ok(HttpResponse::Created().json(record))
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance/checkout",
    request_body(content = AttendanceDateReq, description = "Optional; omit for today"),
    responses(
        (status = 200, description = "Checked out", body = AttendanceRecord),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only employees record attendance"),
        (status = 404, description = "No open record on that date")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::CheckOut)?;
    let req: AttendanceDateReq = optional_json(&body)?;
    let date = req.date.unwrap_or_else(today);

    let record = attendance::check_out(pool.get_ref(), auth.user_id, date).await?;
    Ok(HttpResponse::Ok().json(record))
}

/// Mark every user without a record as Absent (Admin)
#[utoipa::path(
    post,
    path = "/api/attendance/mark-absent",
    request_body(content = AttendanceDateReq, description = "Optional; omit for today"),
    responses(
        (status = 200, description = "Sweep finished; failed lists users that could not be marked", body = SweepReport),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_absent(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::SweepAbsent)?;
    let req: AttendanceDateReq = optional_json(&body)?;
    let date = req.date.unwrap_or_else(today);

    let report = attendance::sweep_absent(pool.get_ref(), date).await?;
    Ok(HttpResponse::Ok().json(report))
}

/// Attendance history: all users for Admin, own records for Employees
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Records, newest first", body = [AttendanceRecord]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let scope = auth.authorize(Action::ViewAttendance)?;
    let records = attendance::list(pool.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(records))
}

/// Present / half-day / absent breakdown over the visible records
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    responses(
        (status = 200, description = "Counts and proportions", body = AttendanceSummary),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_summary(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let scope = auth.authorize(Action::ViewAttendance)?;
    let records = attendance::list(pool.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(attendance::summarize(&records)))
}
