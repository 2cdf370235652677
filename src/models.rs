use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::{role::Role, user::User};

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupReq {
    #[serde(alias = "employeeId")]
    #[schema(example = "EMP-002")]
    pub employee_code: String,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane@dayflow.io")]
    pub email: String,
    #[schema(example = "correct horse")]
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginReqDto {
    #[schema(example = "jane@dayflow.io")]
    pub email: String,
    #[schema(example = "correct horse")]
    pub password: String,
    #[serde(default)]
    pub is_admin_login: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct VerifyReq {
    pub token: String,
}

#[derive(Deserialize, ToSchema)]
pub struct ResendVerificationReq {
    #[schema(example = "jane@dayflow.io")]
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordReq {
    pub email: String,
    #[serde(alias = "employeeId")]
    pub employee_code: String,
    pub new_password: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/// Session token claims.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}
