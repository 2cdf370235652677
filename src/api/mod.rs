use actix_web::web::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod message;
pub mod payroll;
pub mod profile;

/// Body for endpoints whose JSON payload may be omitted. Only an empty body
/// yields `T::default()`; anything else must parse.
pub(crate) fn optional_json<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    serde_json::from_slice(body).map_err(|e| ApiError::invalid_input(format!("Invalid request body: {e}")))
}
