use actix_web::error::ResponseError;
use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use serde::Serialize;
use thiserror::Error;

use crate::errors::{DomainError, ErrorCode, InfraErrorKind};
use crate::web::trace_ctx;

/// Fixed detail for every authentication failure, whatever the sub-cause.
pub const AUTH_FAILED_DETAIL: &str = "Make sure you are providing the correct credentials";
/// Fixed detail for every token rejection, whatever the sub-cause.
pub const TOKEN_INVALID_DETAIL: &str = "Token is invalid or expired";

#[derive(Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub type_: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    pub code: String,
    pub trace_id: String,
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Bad request: {detail}")]
    BadRequest { code: ErrorCode, detail: String },
    #[error("Authentication failed")]
    AuthenticationFailed,
    #[error("Token invalid")]
    TokenInvalid,
    #[error("Missing token")]
    MissingToken,
    #[error("Forbidden: {detail}")]
    Forbidden { code: ErrorCode, detail: String },
    #[error("Service unavailable: {detail}")]
    Unavailable { detail: String },
    #[error("Internal error: {detail}")]
    Internal { detail: String },
    #[error("Configuration error: {detail}")]
    Config { detail: String },
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::BadRequest { code, .. } => *code,
            AppError::AuthenticationFailed => ErrorCode::AuthenticationFailed,
            AppError::TokenInvalid => ErrorCode::TokenInvalid,
            AppError::MissingToken => ErrorCode::MissingToken,
            AppError::Forbidden { code, .. } => *code,
            AppError::Unavailable { .. } => ErrorCode::ServiceUnavailable,
            AppError::Internal { .. } => ErrorCode::Internal,
            AppError::Config { .. } => ErrorCode::ConfigError,
        }
    }

    fn detail(&self) -> String {
        match self {
            AppError::BadRequest { detail, .. } => detail.clone(),
            AppError::AuthenticationFailed => AUTH_FAILED_DETAIL.to_string(),
            AppError::TokenInvalid => TOKEN_INVALID_DETAIL.to_string(),
            AppError::MissingToken => "No token header provided".to_string(),
            AppError::Forbidden { detail, .. } => detail.clone(),
            // Collaborator details stay in the logs.
            AppError::Unavailable { .. } => "Service temporarily unavailable".to_string(),
            AppError::Internal { .. } => "Internal server error".to_string(),
            AppError::Config { detail } => detail.clone(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::AuthenticationFailed => StatusCode::UNAUTHORIZED,
            AppError::TokenInvalid => StatusCode::UNAUTHORIZED,
            AppError::MissingToken => StatusCode::BAD_REQUEST,
            AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
            AppError::Unavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Config { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn bad_request(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            detail: detail.into(),
        }
    }

    pub fn forbidden(code: ErrorCode, detail: impl Into<String>) -> Self {
        Self::Forbidden {
            code,
            detail: detail.into(),
        }
    }

    pub fn internal(detail: impl Into<String>) -> Self {
        Self::Internal {
            detail: detail.into(),
        }
    }

    pub fn config(detail: impl Into<String>) -> Self {
        Self::Config {
            detail: detail.into(),
        }
    }

    fn humanize_code(code: &str) -> String {
        code.split('_')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    None => String::new(),
                    Some(first) => first
                        .to_uppercase()
                        .chain(chars.flat_map(char::to_lowercase))
                        .collect(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl From<DomainError> for AppError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::MalformedInput(detail) => {
                AppError::bad_request(ErrorCode::InvalidRequest, detail)
            }
            DomainError::AuthenticationFailed => AppError::AuthenticationFailed,
            DomainError::TokenInvalid => AppError::TokenInvalid,
            DomainError::UnsupportedGrant(grant) => AppError::bad_request(
                ErrorCode::UnsupportedGrantType,
                format!("Unknown grant type: {grant}"),
            ),
            DomainError::Infra(InfraErrorKind::Timeout | InfraErrorKind::DbUnavailable, detail) => {
                AppError::Unavailable { detail }
            }
            DomainError::Infra(kind, detail) => {
                AppError::internal(format!("{kind:?}: {detail}"))
            }
        }
    }
}

impl From<sea_orm::DbErr> for AppError {
    fn from(e: sea_orm::DbErr) -> Self {
        match e {
            sea_orm::DbErr::Conn(_) | sea_orm::DbErr::ConnectionAcquire(_) => {
                AppError::Unavailable {
                    detail: e.to_string(),
                }
            }
            other => AppError::internal(format!("database error: {other}")),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status();
        let code = self.code().as_str();
        let trace_id = trace_ctx::trace_id();

        if status.is_server_error() {
            tracing::error!(%trace_id, code, error = %self, "request failed");
        }

        let problem_details = ProblemDetails {
            type_: format!("https://blue-auth.dev/errors/{code}"),
            title: Self::humanize_code(code),
            status: status.as_u16(),
            detail: self.detail(),
            code: code.to_string(),
            trace_id: trace_id.clone(),
        };

        HttpResponse::build(status)
            .content_type("application/problem+json")
            .insert_header(("x-trace-id", trace_id))
            .json(problem_details)
    }
}
