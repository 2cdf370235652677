use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use chrono::NaiveDate;
use derive_more::Display;
use serde::Serialize;
use serde_json::json;

use crate::mail::MailError;
use crate::model::leave_request::LeaveStatus;

/// Coarse failure classes surfaced to API clients.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, strum_macros::Display)]
pub enum ErrorKind {
    Unauthenticated,
    Forbidden,
    NotFound,
    Conflict,
    InvalidInput,
    Unavailable,
    Internal,
}

impl ErrorKind {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "Missing session token")]
    Unauthenticated,
    #[display(fmt = "Invalid or expired session token")]
    InvalidToken,
    #[display(fmt = "Invalid credentials")]
    InvalidCredentials,
    #[display(fmt = "Email not verified")]
    Unverified,
    #[display(fmt = "{}", _0)]
    Forbidden(&'static str),
    #[display(fmt = "{} not found", _0)]
    NotFound(&'static str),
    #[display(fmt = "No open attendance record on {}", _0)]
    NoOpenRecord(NaiveDate),
    #[display(fmt = "An admin account already exists")]
    AdminExists,
    #[display(fmt = "User already exists")]
    UserExists,
    #[display(fmt = "Already checked in on {}", _0)]
    DuplicateCheckIn(NaiveDate),
    #[display(fmt = "Leave request {} is already {}", id, status)]
    NotPending { id: i64, status: LeaveStatus },
    #[display(fmt = "Start date {} is after end date {}", start, end)]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[display(fmt = "Password must be at least {} characters", _0)]
    WeakPassword(usize),
    #[display(fmt = "{}", _0)]
    InvalidInput(String),
    #[display(fmt = "Mail service is not ready")]
    MailerNotReady,
    #[display(fmt = "Database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "Internal error: {}", _0)]
    Internal(String),
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Unauthenticated | ApiError::InvalidToken | ApiError::InvalidCredentials => {
                ErrorKind::Unauthenticated
            }
            ApiError::Forbidden(_) | ApiError::Unverified => ErrorKind::Forbidden,
            ApiError::NotFound(_) | ApiError::NoOpenRecord(_) => ErrorKind::NotFound,
            ApiError::AdminExists
            | ApiError::UserExists
            | ApiError::DuplicateCheckIn(_)
            | ApiError::NotPending { .. } => ErrorKind::Conflict,
            ApiError::InvalidRange { .. } | ApiError::WeakPassword(_) | ApiError::InvalidInput(_) => {
                ErrorKind::InvalidInput
            }
            ApiError::MailerNotReady => ErrorKind::Unavailable,
            ApiError::Database(_) | ApiError::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::InvalidInput(message.into())
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Database(e) => Some(e),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl From<MailError> for ApiError {
    fn from(e: MailError) -> Self {
        match e {
            MailError::NotReady => ApiError::MailerNotReady,
            MailError::Delivery(reason) => ApiError::Internal(reason),
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.kind().status_code()
    }

    fn error_response(&self) -> HttpResponse {
        let kind = self.kind();
        let message = if kind == ErrorKind::Internal {
            tracing::error!(error = %self, "Request failed");
            "Internal Server Error".to_string()
        } else {
            self.to_string()
        };

        HttpResponse::build(kind.status_code()).json(json!({
            "error": kind,
            "message": message,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn taxonomy_maps_to_status_codes() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert_eq!(ApiError::InvalidToken.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::Unverified.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NoOpenRecord(date).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::DuplicateCheckIn(date).status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::WeakPassword(8).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::MailerNotReady.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn not_pending_message_names_the_status() {
        let err = ApiError::NotPending {
            id: 7,
            status: LeaveStatus::Approved,
        };
        assert_eq!(err.to_string(), "Leave request 7 is already Approved");
        assert_eq!(err.kind(), ErrorKind::Conflict);
    }

    #[actix_web::test]
    async fn internal_errors_do_not_leak_details() {
        let resp = ApiError::Internal("disk on fire".into()).error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = to_bytes(resp.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal");
        assert_eq!(json["message"], "Internal Server Error");
    }
}
