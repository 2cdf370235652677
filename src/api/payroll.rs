use crate::{
    auth::{auth::AuthUser, policy::Action},
    error::ApiError,
    model::payroll::PayrollEntry,
    store::credentials,
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

/// Salary figures: everyone for Admin, own row for Employees
#[utoipa::path(
    get,
    path = "/api/payroll",
    responses(
        (status = 200, description = "Payroll entries", body = [PayrollEntry]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Payroll"
)]
pub async fn list_payroll(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let scope = auth.authorize(Action::ViewPayroll)?;
    let entries = credentials::payroll(pool.get_ref(), scope).await?;
    Ok(HttpResponse::Ok().json(entries))
}
