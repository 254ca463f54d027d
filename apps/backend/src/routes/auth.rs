use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::services::auth_flow::{LoginOutcome, LoginRequest};
use crate::state::app_state::AppState;

pub const GRANTED_MESSAGE: &str = "Authorization Granted";
pub const DECODED_MESSAGE: &str = "Token decode successful";

/// Success envelope shared by the auth endpoints.
#[derive(Debug, Serialize)]
pub struct AuthResponse<T: Serialize> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

impl<T: Serialize> AuthResponse<T> {
    fn accepted(message: &'static str, data: T) -> HttpResponse {
        HttpResponse::Accepted().json(AuthResponse {
            success: true,
            message,
            data,
        })
    }
}

/// Single login endpoint; `grant_type` selects the flow.
async fn login(
    req: web::Json<LoginRequest>,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let outcome = app_state.auth.login(&req).await?;

    let message = match outcome {
        LoginOutcome::Tokens(_) => GRANTED_MESSAGE,
        LoginOutcome::Claims(_) => DECODED_MESSAGE,
    };
    Ok(AuthResponse::accepted(message, outcome))
}

/// Decode the token presented in `X-APP-TOKEN` or `Authorization: Bearer`.
async fn check_login(
    token: AuthToken,
    app_state: web::Data<AppState>,
) -> Result<HttpResponse, AppError> {
    let claims = app_state.auth.introspect(&token.token)?;
    Ok(AuthResponse::accepted(DECODED_MESSAGE, claims))
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/login").route(web::post().to(login)))
        .service(web::resource("/checklogin").route(web::get().to(check_login)));
}
