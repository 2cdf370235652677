use sqlx::{Executor, Sqlite, SqlitePool};
use tracing::{debug, info};

use crate::{
    auth::policy::{self, Scope},
    error::ApiError,
    model::{
        payroll::PayrollEntry,
        role::Role,
        user::{AttachmentKind, Credentials, DirectoryEntry, HrFields, NewUser, SelfFields, User},
    },
    utils::db_utils::{Assignments, build_update_sql, execute_update},
};

const USER_COLUMNS: &str = "id, employee_code, name, email, role, is_verified, phone, address, \
     job_title, department, salary, join_date, profile_pic, document";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(user)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<User, ApiError> {
    find_by_id(pool, id).await?.ok_or(ApiError::NotFound("User"))
}

/// Secrets needed to check a login attempt.
pub async fn find_credentials(pool: &SqlitePool, email: &str) -> Result<Option<Credentials>, ApiError> {
    let creds = sqlx::query_as::<_, Credentials>(
        "SELECT id, role, password_hash, is_verified FROM users WHERE email = ?",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(creds)
}

/// Identity check used by password reset.
pub async fn find_by_email_and_code(
    pool: &SqlitePool,
    email: &str,
    employee_code: &str,
) -> Result<Option<User>, ApiError> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE email = ? AND employee_code = ?"
    ))
    .bind(email)
    .bind(employee_code)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn count_admins<'e, E>(executor: E) -> Result<i64, ApiError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users WHERE role = ?")
        .bind(Role::Admin)
        .fetch_one(executor)
        .await?;
    Ok(count)
}

/// Inserts a new account. Admin accounts are count-checked inside the same
/// transaction; the partial unique index on `role` catches any race.
pub async fn create(pool: &SqlitePool, new: &NewUser) -> Result<User, ApiError> {
    let mut tx = pool.begin().await?;

    if new.role == Role::Admin {
        let admins = count_admins(&mut *tx).await?;
        policy::authorize_admin_signup(admins)?;
    }

    let result = sqlx::query(
        r#"
        INSERT INTO users
            (employee_code, name, email, password_hash, role, job_title, department, salary, join_date, verification_token)
        VALUES (?, ?, ?, ?, ?, ?, 'General', 0, ?, ?)
        "#,
    )
    .bind(&new.employee_code)
    .bind(&new.name)
    .bind(&new.email)
    .bind(&new.password_hash)
    .bind(new.role)
    .bind(new.role.default_job_title())
    .bind(new.join_date)
    .bind(&new.verification_token)
    .execute(&mut *tx)
    .await
    .map_err(classify_insert_error)?;

    tx.commit().await?;

    let id = result.last_insert_rowid();
    info!(user_id = id, role = %new.role, "User created");
    get(pool, id).await
}

fn classify_insert_error(e: sqlx::Error) -> ApiError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            // sqlite names the violated columns, e.g. "UNIQUE constraint failed: users.role"
            let message = db_err.message();
            return if message.contains("users.role") || message.contains("users_single_admin") {
                ApiError::AdminExists
            } else {
                ApiError::UserExists
            };
        }
    }
    ApiError::Database(e)
}

/// Marks the account holding `token` as verified. `false` if no account does.
pub async fn set_verified(pool: &SqlitePool, token: &str) -> Result<bool, ApiError> {
    let result = sqlx::query(
        "UPDATE users SET is_verified = 1, verification_token = NULL WHERE verification_token = ?",
    )
    .bind(token)
    .execute(pool)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Pending verification token of an unverified account.
pub async fn verification_token(pool: &SqlitePool, email: &str) -> Result<Option<String>, ApiError> {
    let token = sqlx::query_scalar::<_, Option<String>>(
        "SELECT verification_token FROM users WHERE email = ? AND is_verified = 0",
    )
    .bind(email)
    .fetch_optional(pool)
    .await?;
    Ok(token.flatten())
}

pub async fn update_hr_fields(pool: &SqlitePool, id: i64, fields: &HrFields) -> Result<User, ApiError> {
    if fields.salary.is_some_and(|s| s < 0) {
        return Err(ApiError::invalid_input("salary cannot be negative"));
    }
    if fields.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
        return Err(ApiError::invalid_input("name cannot be empty"));
    }

    let assignments = Assignments::default()
        .text("name", fields.name.as_ref())
        .int("salary", fields.salary)
        .text("department", fields.department.as_ref())
        .text("job_title", fields.job_title.as_ref())
        .date("join_date", fields.join_date);

    apply_update(pool, id, assignments).await
}

pub async fn update_self_fields(pool: &SqlitePool, id: i64, fields: &SelfFields) -> Result<User, ApiError> {
    let assignments = Assignments::default()
        .text("phone", fields.phone.as_ref())
        .text("address", fields.address.as_ref());

    apply_update(pool, id, assignments).await
}

async fn apply_update(pool: &SqlitePool, id: i64, assignments: Assignments) -> Result<User, ApiError> {
    let update = build_update_sql("users", assignments, "id", id)?;
    debug!(sql = %update.sql, user_id = id, "Updating user");

    if execute_update(pool, update).await? == 0 {
        return Err(ApiError::NotFound("User"));
    }
    get(pool, id).await
}

pub async fn set_password(pool: &SqlitePool, id: i64, password_hash: &str) -> Result<(), ApiError> {
    let result = sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
        .bind(password_hash)
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("User"));
    }
    Ok(())
}

pub async fn set_attachment(
    pool: &SqlitePool,
    id: i64,
    kind: AttachmentKind,
    uri: &str,
) -> Result<User, ApiError> {
    let sql = format!("UPDATE users SET {} = ? WHERE id = ?", kind.column());
    let result = sqlx::query(&sql).bind(uri).bind(id).execute(pool).await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("User"));
    }
    get(pool, id).await
}

pub async fn list_all(pool: &SqlitePool) -> Result<Vec<User>, ApiError> {
    let users = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn directory(pool: &SqlitePool) -> Result<Vec<DirectoryEntry>, ApiError> {
    let entries = sqlx::query_as::<_, DirectoryEntry>(
        "SELECT id, employee_code, name, job_title, department FROM users WHERE is_verified = 1 ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(entries)
}

pub async fn payroll(pool: &SqlitePool, scope: Scope) -> Result<Vec<PayrollEntry>, ApiError> {
    const COLUMNS: &str = "id AS user_id, employee_code, name, job_title, department, salary";

    let entries = match scope {
        Scope::All => {
            sqlx::query_as::<_, PayrollEntry>(&format!("SELECT {COLUMNS} FROM users ORDER BY id"))
                .fetch_all(pool)
                .await?
        }
        Scope::Own(user_id) => {
            sqlx::query_as::<_, PayrollEntry>(&format!("SELECT {COLUMNS} FROM users WHERE id = ?"))
                .bind(user_id)
                .fetch_all(pool)
                .await?
        }
    };
    Ok(entries)
}
