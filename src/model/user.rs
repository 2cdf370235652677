use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::role::Role;

/// Public view of an account. Secrets live in [`Credentials`] and are never serialized.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "id": 2,
    "employeeCode": "EMP-002",
    "name": "Jane Doe",
    "email": "jane@dayflow.io",
    "role": "Employee",
    "isVerified": true,
    "phone": null,
    "address": null,
    "jobTitle": "Employee",
    "department": "General",
    "salary": 0,
    "joinDate": "2024-01-01",
    "profilePic": null,
    "document": null
}))]
pub struct User {
    pub id: i64,
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub is_verified: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub job_title: String,
    pub department: String,
    pub salary: i64,
    pub join_date: NaiveDate,
    pub profile_pic: Option<String>,
    pub document: Option<String>,
}

/// Login-time view of an account.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Credentials {
    pub id: i64,
    pub role: Role,
    pub password_hash: String,
    pub is_verified: bool,
}

/// Everything the store needs to create an account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub employee_code: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub join_date: NaiveDate,
    pub verification_token: String,
}

/// Fields only the admin may change.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HrFields {
    #[schema(example = "Jane Doe")]
    pub name: Option<String>,
    #[schema(example = 52000)]
    pub salary: Option<i64>,
    #[schema(example = "Engineering")]
    pub department: Option<String>,
    #[schema(example = "Developer")]
    pub job_title: Option<String>,
    #[schema(example = "2024-01-01")]
    pub join_date: Option<NaiveDate>,
}

/// Fields a user may change on their own record.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelfFields {
    #[schema(example = "+8801712345678")]
    pub phone: Option<String>,
    #[schema(example = "12 Main Street")]
    pub address: Option<String>,
}

/// Minimal user listing, enough to address a message.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: i64,
    pub employee_code: String,
    pub name: String,
    pub job_title: String,
    pub department: String,
}

/// Which document slot an uploaded file is attached to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, Display, EnumString, ToSchema)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum AttachmentKind {
    Profile,
    Document,
}

impl AttachmentKind {
    pub fn column(&self) -> &'static str {
        match self {
            AttachmentKind::Profile => "profile_pic",
            AttachmentKind::Document => "document",
        }
    }
}
