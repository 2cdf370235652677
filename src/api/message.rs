use crate::{
    auth::{auth::AuthUser, policy::Action},
    error::ApiError,
    ledger::attendance::today,
    model::message::{Message, NewMessage},
    store::{credentials, messages},
};
use actix_web::{HttpResponse, web};
use sqlx::SqlitePool;

/// Send an internal message
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = NewMessage,
    responses(
        (status = 201, description = "Message stored", body = Message),
        (status = 400, description = "Empty subject"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Receiver not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Messages"
)]
pub async fn send_message(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<NewMessage>,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::SendMessage)?;

    let sender = credentials::get(pool.get_ref(), auth.user_id).await?;
    let receiver = credentials::find_by_id(pool.get_ref(), payload.receiver_id)
        .await?
        .ok_or(ApiError::NotFound("Receiver"))?;

    let message = messages::send(
        pool.get_ref(),
        &sender,
        &receiver,
        &payload.subject,
        &payload.body,
        today(),
    )
    .await?;

    Ok(HttpResponse::Created().json(message))
}

/// Caller's inbox, newest first
#[utoipa::path(
    get,
    path = "/api/messages",
    responses(
        (status = 200, description = "Messages addressed to the caller", body = [Message]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Messages"
)]
pub async fn inbox(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::ReadInbox)?;
    let messages = messages::inbox(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(messages))
}
