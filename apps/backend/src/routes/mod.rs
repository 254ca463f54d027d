use actix_web::{error::JsonPayloadError, web, HttpRequest};

use crate::error::AppError;
use crate::errors::ErrorCode;

pub mod auth;
pub mod health;

/// Register every route; shared by `main.rs` and the test app builder.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config());

    // Health check routes: /health
    cfg.configure(health::configure_routes);

    // Auth routes: /api/auth/**
    cfg.service(web::scope("/api/auth").configure(auth::configure_routes));
}

/// Body parse failures become problem details instead of actix's plain text.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        AppError::bad_request(ErrorCode::InvalidRequest, format!("Invalid JSON body: {err}"))
            .into()
    })
}
