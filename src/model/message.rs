use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: i64,
    pub sender_id: i64,
    pub sender_name: String,
    pub receiver_id: i64,
    pub receiver_name: String,
    pub subject: String,
    pub body: String,
    #[schema(example = "2024-01-10")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    #[schema(example = 2)]
    pub receiver_id: i64,
    #[schema(example = "Shift change")]
    pub subject: String,
    #[schema(example = "Can we swap Friday?")]
    pub body: String,
}
