use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
    sqlx::Type,
)]
pub enum LeaveType {
    Sick,
    Casual,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
    sqlx::Type,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveRequest {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = 2)]
    pub user_id: i64,
    #[serde(rename = "type")]
    pub leave_type: LeaveType,
    #[schema(example = "2024-02-01")]
    pub start_date: NaiveDate,
    #[schema(example = "2024-02-03")]
    pub end_date: NaiveDate,
    #[schema(example = "Flu", nullable = true)]
    pub remarks: Option<String>,
    #[schema(example = "ok", nullable = true)]
    pub admin_remarks: Option<String>,
    pub status: LeaveStatus,
    /// requester name, admin view only
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "Jane Doe", nullable = true)]
    pub name: Option<String>,
}

/// Fields an employee supplies when applying for leave.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewLeave {
    #[serde(rename = "type")]
    #[schema(example = "Sick")]
    pub leave_type: LeaveType,
    #[serde(alias = "start")]
    #[schema(example = "2024-02-01")]
    pub start_date: NaiveDate,
    #[serde(alias = "end")]
    #[schema(example = "2024-02-03")]
    pub end_date: NaiveDate,
    #[serde(default)]
    #[schema(example = "Flu")]
    pub remarks: Option<String>,
}
