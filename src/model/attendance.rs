use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
    sqlx::Type,
)]
pub enum AttendanceStatus {
    Present,
    #[serde(rename = "Half-day")]
    #[strum(serialize = "Half-day")]
    #[sqlx(rename = "Half-day")]
    HalfDay,
    Absent,
}

/// One row of the attendance ledger. `name` is only filled for the admin view.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 2)]
    pub user_id: i64,
    #[schema(example = "2024-01-10")]
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    #[schema(example = "09:00:00", nullable = true)]
    pub check_in: Option<NaiveTime>,
    #[schema(example = "17:30:00", nullable = true)]
    pub check_out: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Jane Doe", nullable = true)]
    pub name: Option<String>,
}

/// Present / half-day / absent proportions over a set of records.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceSummary {
    pub total: usize,
    pub present: usize,
    pub half_day: usize,
    pub absent: usize,
    pub present_ratio: f64,
    pub half_day_ratio: f64,
    pub absent_ratio: f64,
}

/// Outcome of a mark-absent sweep. Users in `failed` can be picked up by a retry.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SweepReport {
    #[schema(example = "2024-01-10")]
    pub date: NaiveDate,
    #[schema(example = 3)]
    pub marked: usize,
    pub failed: Vec<i64>,
}
