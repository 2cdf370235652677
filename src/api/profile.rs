use crate::{
    auth::{auth::AuthUser, policy::Action},
    error::ApiError,
    model::user::{AttachmentKind, SelfFields, User},
    store::credentials,
    uploads::UploadStore,
};
use actix_web::{HttpResponse, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::info;
use utoipa::IntoParams;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UploadQuery {
    /// `profile` or `document`
    #[serde(rename = "type")]
    #[param(value_type = String, example = "document")]
    pub kind: AttachmentKind,
    /// original file name, used for the extension only
    #[param(example = "contract.pdf")]
    pub filename: Option<String>,
}

/// Own user record
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Caller's record", body = User),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn get_profile(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
) -> Result<HttpResponse, ApiError> {
    let user = credentials::get(pool.get_ref(), auth.user_id).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Update own contact fields
#[utoipa::path(
    put,
    path = "/api/profile",
    request_body = SelfFields,
    responses(
        (status = 200, description = "Updated record", body = User),
        (status = 400, description = "No fields provided"),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn update_profile(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    payload: web::Json<SelfFields>,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::EditProfile { target: auth.user_id })?;

    let user = credentials::update_self_fields(pool.get_ref(), auth.user_id, &payload).await?;
    Ok(HttpResponse::Ok().json(user))
}

/// Upload a profile picture or document for the caller
#[utoipa::path(
    post,
    path = "/api/upload",
    params(UploadQuery),
    request_body(content = Vec<u8>, description = "Raw file bytes", content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Stored and attached", body = Object, example = json!({
            "uri": "http://localhost:5000/uploads/1704880000000-3f2a.pdf"
        })),
        (status = 400, description = "Empty body or unknown type"),
        (status = 401, description = "Unauthorized"),
        (status = 413, description = "File too large")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Profile"
)]
pub async fn upload(
    auth: AuthUser,
    pool: web::Data<SqlitePool>,
    store: web::Data<UploadStore>,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    auth.authorize(Action::EditProfile { target: auth.user_id })?;

    let original = query.filename.as_deref().unwrap_or_default();
    let uri = store.save(original, body).await?;
    let user = credentials::set_attachment(pool.get_ref(), auth.user_id, query.kind, &uri).await?;

    info!(user_id = auth.user_id, kind = %query.kind, "Attachment stored");
    Ok(HttpResponse::Created().json(json!({
        "uri": uri,
        "user": user,
    })))
}
