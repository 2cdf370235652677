use serde::Serialize;
use utoipa::ToSchema;

/// Payroll figures for one employee, as kept on the user record.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PayrollEntry {
    #[schema(example = 2)]
    pub user_id: i64,
    #[schema(example = "EMP-002")]
    pub employee_code: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "Developer")]
    pub job_title: String,
    #[schema(example = "Engineering")]
    pub department: String,
    #[schema(example = 52000)]
    pub salary: i64,
}
