use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Legacy header carrying a bare token.
pub const APP_TOKEN_HEADER: &str = "X-APP-TOKEN";

/// Raw token taken from `X-APP-TOKEN` or `Authorization: Bearer`.
///
/// Extraction only checks presence; verification is the caller's job.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthToken {
    pub token: String,
}

impl AuthToken {
    pub fn from_headers(req: &HttpRequest) -> Result<Self, AppError> {
        if let Some(value) = req.headers().get(APP_TOKEN_HEADER) {
            let token = value.to_str().map_err(|_| AppError::TokenInvalid)?.trim();
            if !token.is_empty() {
                return Ok(Self {
                    token: token.to_string(),
                });
            }
        }

        let Some(auth_header) = req.headers().get(header::AUTHORIZATION) else {
            return Err(AppError::MissingToken);
        };
        let auth_value = auth_header.to_str().map_err(|_| AppError::TokenInvalid)?;

        // Parse "Bearer <token>" format
        let parts: Vec<&str> = auth_value.split_whitespace().collect();
        match parts.as_slice() {
            ["Bearer", token] if !token.is_empty() => Ok(Self {
                token: (*token).to_string(),
            }),
            [] => Err(AppError::MissingToken),
            _ => Err(AppError::TokenInvalid),
        }
    }
}

impl FromRequest for AuthToken {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let result = Self::from_headers(req);
        Box::pin(async move { result })
    }
}
