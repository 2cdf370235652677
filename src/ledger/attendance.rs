use chrono::{Local, NaiveDate, NaiveTime, Timelike};
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::{
    auth::policy::Scope,
    error::ApiError,
    model::attendance::{AttendanceRecord, AttendanceStatus, AttendanceSummary, SweepReport},
};

const RECORD_COLUMNS: &str = "id, user_id, date, status, check_in, check_out";

fn now_time() -> NaiveTime {
    let now = Local::now().time();
    now.with_nanosecond(0).unwrap_or(now)
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Opens the day's record for `user_id`. One record per user per day.
pub async fn check_in(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
    is_half_day: bool,
) -> Result<AttendanceRecord, ApiError> {
    let status = if is_half_day {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Present
    };

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, status, check_in)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(user_id)
    .bind(date)
    .bind(status)
    .bind(now_time())
    .execute(pool)
    .await;

    match result {
        Ok(_) => {
            debug!(user_id, %date, %status, "Checked in");
            fetch(pool, user_id, date).await
        }
        Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
            Err(ApiError::DuplicateCheckIn(date))
        }
        Err(e) => Err(e.into()),
    }
}

/// Closes the open record for (`user_id`, `date`). Status is left untouched.
pub async fn check_out(
    pool: &SqlitePool,
    user_id: i64,
    date: NaiveDate,
) -> Result<AttendanceRecord, ApiError> {
    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out = ?
        WHERE user_id = ?
        AND date = ?
        AND check_in IS NOT NULL
        AND check_out IS NULL
        "#,
    )
    .bind(now_time())
    .bind(user_id)
    .bind(date)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NoOpenRecord(date));
    }

    debug!(user_id, %date, "Checked out");
    fetch(pool, user_id, date).await
}

async fn fetch(pool: &SqlitePool, user_id: i64, date: NaiveDate) -> Result<AttendanceRecord, ApiError> {
    let record = sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {RECORD_COLUMNS}, NULL AS name FROM attendance WHERE user_id = ? AND date = ?"
    ))
    .bind(user_id)
    .bind(date)
    .fetch_optional(pool)
    .await?;

    record.ok_or(ApiError::NotFound("Attendance record"))
}

/// Marks every user without a record on `date` as Absent.
///
/// Each insert stands alone and ignores rows that already exist, so a failed
/// or repeated sweep can simply be run again.
pub async fn sweep_absent(pool: &SqlitePool, date: NaiveDate) -> Result<SweepReport, ApiError> {
    let missing = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT u.id FROM users u
        WHERE NOT EXISTS (
            SELECT 1 FROM attendance a WHERE a.user_id = u.id AND a.date = ?
        )
        ORDER BY u.id
        "#,
    )
    .bind(date)
    .fetch_all(pool)
    .await?;

    let mut report = SweepReport {
        date,
        marked: 0,
        failed: Vec::new(),
    };

    for user_id in missing {
        let inserted = sqlx::query(
            r#"
            INSERT INTO attendance (user_id, date, status)
            VALUES (?, ?, ?)
            ON CONFLICT (user_id, date) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(AttendanceStatus::Absent)
        .execute(pool)
        .await;

        match inserted {
            Ok(done) if done.rows_affected() > 0 => report.marked += 1,
            Ok(_) => debug!(user_id, %date, "Record appeared during sweep, skipped"),
            Err(e) => {
                warn!(error = %e, user_id, %date, "Failed to mark user absent");
                report.failed.push(user_id);
            }
        }
    }

    info!(%date, marked = report.marked, failed = report.failed.len(), "Absentee sweep finished");
    Ok(report)
}

/// Records visible in `scope`, newest day first.
pub async fn list(pool: &SqlitePool, scope: Scope) -> Result<Vec<AttendanceRecord>, ApiError> {
    let records = match scope {
        Scope::All => {
            sqlx::query_as::<_, AttendanceRecord>(
                r#"
                SELECT a.id, a.user_id, a.date, a.status, a.check_in, a.check_out, u.name AS name
                FROM attendance a
                JOIN users u ON u.id = a.user_id
                ORDER BY a.date DESC, a.id DESC
                "#,
            )
            .fetch_all(pool)
            .await?
        }
        Scope::Own(user_id) => {
            sqlx::query_as::<_, AttendanceRecord>(&format!(
                "SELECT {RECORD_COLUMNS}, NULL AS name FROM attendance WHERE user_id = ? ORDER BY date DESC, id DESC"
            ))
            .bind(user_id)
            .fetch_all(pool)
            .await?
        }
    };
    Ok(records)
}

pub fn summarize(records: &[AttendanceRecord]) -> AttendanceSummary {
    let count = |status: AttendanceStatus| records.iter().filter(|r| r.status == status).count();
    let present = count(AttendanceStatus::Present);
    let half_day = count(AttendanceStatus::HalfDay);
    let absent = count(AttendanceStatus::Absent);
    let total = records.len();

    let ratio = |n: usize| if total == 0 { 0.0 } else { n as f64 / total as f64 };

    AttendanceSummary {
        total,
        present,
        half_day,
        absent,
        present_ratio: ratio(present),
        half_day_ratio: ratio(half_day),
        absent_ratio: ratio(absent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        db::init_db,
        model::role::Role,
        store::credentials::{self, tests::new_user},
    };

    fn jan(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    async fn setup() -> (SqlitePool, i64, i64) {
        let pool = init_db("sqlite::memory:").await.unwrap();
        let a = credentials::create(&pool, &new_user("E1", "a@x.io", Role::Employee)).await.unwrap();
        let b = credentials::create(&pool, &new_user("E2", "b@x.io", Role::Employee)).await.unwrap();
        (pool, a.id, b.id)
    }

    #[actix_web::test]
    async fn check_in_then_out() {
        let (pool, a, _) = setup().await;

        let record = check_in(&pool, a, jan(10), false).await.unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.check_in.is_some());
        assert!(record.check_out.is_none());

        let record = check_out(&pool, a, jan(10)).await.unwrap();
        assert_eq!(record.status, AttendanceStatus::Present);
        assert!(record.check_out.is_some());
    }

    #[actix_web::test]
    async fn half_day_check_in() {
        let (pool, a, _) = setup().await;
        let record = check_in(&pool, a, jan(10), true).await.unwrap();
        assert_eq!(record.status, AttendanceStatus::HalfDay);
    }

    #[actix_web::test]
    async fn second_check_in_same_day_is_rejected() {
        let (pool, a, _) = setup().await;
        check_in(&pool, a, jan(10), false).await.unwrap();

        let err = check_in(&pool, a, jan(10), true).await.unwrap_err();
        assert!(matches!(err, ApiError::DuplicateCheckIn(d) if d == jan(10)));
        // another day is fine
        check_in(&pool, a, jan(11), false).await.unwrap();
    }

    #[actix_web::test]
    async fn check_out_without_check_in_is_rejected() {
        let (pool, a, _) = setup().await;
        let err = check_out(&pool, a, jan(10)).await.unwrap_err();
        assert!(matches!(err, ApiError::NoOpenRecord(_)));
        assert!(list(&pool, Scope::Own(a)).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn second_check_out_is_rejected_and_keeps_first_time() {
        let (pool, a, _) = setup().await;
        check_in(&pool, a, jan(10), false).await.unwrap();
        let first = check_out(&pool, a, jan(10)).await.unwrap();

        assert!(matches!(check_out(&pool, a, jan(10)).await, Err(ApiError::NoOpenRecord(_))));
        let records = list(&pool, Scope::Own(a)).await.unwrap();
        assert_eq!(records[0].check_out, first.check_out);
    }

    #[actix_web::test]
    async fn sweep_skips_recorded_users_and_is_idempotent() {
        let (pool, a, b) = setup().await;
        check_in(&pool, a, jan(10), false).await.unwrap();
        check_out(&pool, a, jan(10)).await.unwrap();

        let first = sweep_absent(&pool, jan(10)).await.unwrap();
        assert_eq!(first.marked, 1);
        assert!(first.failed.is_empty());

        let second = sweep_absent(&pool, jan(10)).await.unwrap();
        assert_eq!(second.marked, 0);

        let all = list(&pool, Scope::All).await.unwrap();
        assert_eq!(all.len(), 2);
        let a_row = all.iter().find(|r| r.user_id == a).unwrap();
        let b_row = all.iter().find(|r| r.user_id == b).unwrap();
        assert_eq!(a_row.status, AttendanceStatus::Present);
        assert_eq!(b_row.status, AttendanceStatus::Absent);
        assert!(b_row.check_in.is_none() && b_row.check_out.is_none());
    }

    #[actix_web::test]
    async fn sweep_collects_row_failures_and_keeps_going() {
        let (pool, a, b) = setup().await;
        let c = credentials::create(&pool, &new_user("E3", "c@x.io", Role::Employee)).await.unwrap().id;

        sqlx::query(&format!(
            "CREATE TRIGGER refuse_absent BEFORE INSERT ON attendance \
             WHEN NEW.user_id = {b} BEGIN SELECT RAISE(ABORT, 'refused'); END"
        ))
        .execute(&pool)
        .await
        .unwrap();

        let report = sweep_absent(&pool, jan(10)).await.unwrap();
        assert_eq!(report.marked, 2);
        assert_eq!(report.failed, vec![b]);

        let swept: Vec<i64> = list(&pool, Scope::All).await.unwrap().iter().map(|r| r.user_id).collect();
        assert!(swept.contains(&a) && swept.contains(&c));
        assert!(!swept.contains(&b));

        sqlx::query("DROP TRIGGER refuse_absent").execute(&pool).await.unwrap();

        let rerun = sweep_absent(&pool, jan(10)).await.unwrap();
        assert_eq!(rerun.marked, 1);
        assert!(rerun.failed.is_empty());
        assert_eq!(list(&pool, Scope::Own(b)).await.unwrap()[0].status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn absent_rows_cannot_be_checked_into_or_out_of() {
        let (pool, a, _) = setup().await;
        sweep_absent(&pool, jan(10)).await.unwrap();

        assert!(matches!(check_out(&pool, a, jan(10)).await, Err(ApiError::NoOpenRecord(_))));
        assert!(matches!(check_in(&pool, a, jan(10), false).await, Err(ApiError::DuplicateCheckIn(_))));
    }

    #[actix_web::test]
    async fn listing_is_scoped_and_newest_first() {
        let (pool, a, b) = setup().await;
        check_in(&pool, a, jan(9), false).await.unwrap();
        check_in(&pool, a, jan(11), false).await.unwrap();
        check_in(&pool, b, jan(10), false).await.unwrap();

        let own = list(&pool, Scope::Own(a)).await.unwrap();
        assert_eq!(own.iter().map(|r| r.date).collect::<Vec<_>>(), vec![jan(11), jan(9)]);
        assert!(own.iter().all(|r| r.name.is_none()));

        let all = list(&pool, Scope::All).await.unwrap();
        assert_eq!(all.iter().map(|r| r.date).collect::<Vec<_>>(), vec![jan(11), jan(10), jan(9)]);
        assert_eq!(all[1].name.as_deref(), Some("User E2"));
    }

    #[test]
    fn summary_proportions() {
        let row = |status| AttendanceRecord {
            id: 0,
            user_id: 1,
            date: jan(1),
            status,
            check_in: None,
            check_out: None,
            name: None,
        };
        let records = vec![
            row(AttendanceStatus::Present),
            row(AttendanceStatus::Present),
            row(AttendanceStatus::HalfDay),
            row(AttendanceStatus::Absent),
        ];

        let summary = summarize(&records);
        assert_eq!((summary.present, summary.half_day, summary.absent), (2, 1, 1));
        assert_eq!(summary.present_ratio, 0.5);
        assert_eq!(summary.half_day_ratio + summary.absent_ratio, 0.5);
        assert_eq!(summarize(&[]).present_ratio, 0.0);
    }
}
