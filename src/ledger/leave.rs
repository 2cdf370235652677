use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::{
    auth::{auth::AuthUser, policy::{Action, Scope}},
    error::ApiError,
    model::leave_request::{LeaveRequest, LeaveStatus, NewLeave},
};

const LEAVE_COLUMNS: &str =
    "l.id, l.user_id, l.leave_type, l.start_date, l.end_date, l.remarks, l.admin_remarks, l.status";

/// Files a Pending request for `user_id`.
pub async fn apply(pool: &SqlitePool, user_id: i64, leave: &NewLeave) -> Result<LeaveRequest, ApiError> {
    if leave.start_date > leave.end_date {
        return Err(ApiError::InvalidRange {
            start: leave.start_date,
            end: leave.end_date,
        });
    }

    let remarks = leave
        .remarks
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty());

    let result = sqlx::query(
        r#"
        INSERT INTO leaves (user_id, leave_type, start_date, end_date, remarks, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(leave.leave_type)
    .bind(leave.start_date)
    .bind(leave.end_date)
    .bind(remarks)
    .bind(LeaveStatus::Pending)
    .execute(pool)
    .await?;

    let id = result.last_insert_rowid();
    debug!(id, user_id, leave_type = %leave.leave_type, "Leave requested");
    get(pool, id, Scope::Own(user_id)).await
}

/// Moves a Pending request to `status`. A request is decided once.
pub async fn decide(
    pool: &SqlitePool,
    decider: &AuthUser,
    id: i64,
    status: LeaveStatus,
    admin_remarks: Option<&str>,
) -> Result<LeaveRequest, ApiError> {
    decider.authorize(Action::DecideLeave)?;

    if status == LeaveStatus::Pending {
        return Err(ApiError::invalid_input("status must be Approved or Rejected"));
    }

    let result = sqlx::query(
        r#"
        UPDATE leaves
        SET status = ?, admin_remarks = ?
        WHERE id = ? AND status = 'Pending'
        "#,
    )
    .bind(status)
    .bind(admin_remarks)
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        let current = sqlx::query_scalar::<_, LeaveStatus>("SELECT status FROM leaves WHERE id = ?")
            .bind(id)
            .fetch_optional(pool)
            .await?;
        return Err(match current {
            Some(status) => ApiError::NotPending { id, status },
            None => ApiError::NotFound("Leave request"),
        });
    }

    info!(id, decided_by = decider.user_id, %status, "Leave request decided");
    get(pool, id, Scope::All).await
}

/// One request, `NotFound` when it lies outside `scope`.
pub async fn get(pool: &SqlitePool, id: i64, scope: Scope) -> Result<LeaveRequest, ApiError> {
    let request = sqlx::query_as::<_, LeaveRequest>(&format!(
        r#"
        SELECT {LEAVE_COLUMNS}, u.name AS name
        FROM leaves l
        JOIN users u ON u.id = l.user_id
        WHERE l.id = ?
        "#
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?
    .filter(|r| scope.permits(r.user_id))
    .ok_or(ApiError::NotFound("Leave request"))?;

    Ok(match scope {
        Scope::All => request,
        Scope::Own(_) => LeaveRequest { name: None, ..request },
    })
}

/// Requests visible in `scope`, newest first.
pub async fn list(pool: &SqlitePool, scope: Scope) -> Result<Vec<LeaveRequest>, ApiError> {
    let requests = match scope {
        Scope::All => {
            sqlx::query_as::<_, LeaveRequest>(&format!(
                r#"
                SELECT {LEAVE_COLUMNS}, u.name AS name
                FROM leaves l
                JOIN users u ON u.id = l.user_id
                ORDER BY l.id DESC
                "#
            ))
            .fetch_all(pool)
            .await?
        }
        Scope::Own(user_id) => {
            sqlx::query_as::<_, LeaveRequest>(&format!(
                "SELECT {LEAVE_COLUMNS}, NULL AS name FROM leaves l WHERE l.user_id = ? ORDER BY l.id DESC"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(requests)
}
