use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};

use crate::auth::claims::ClaimSet;
use crate::error::AppError;
use crate::extractors::auth_token::AuthToken;
use crate::state::app_state::AppState;

/// Claims of a verified token presented on the request.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub ClaimSet);

impl CurrentUser {
    pub fn claims(&self) -> &ClaimSet {
        &self.0
    }

    fn from_http(req: &HttpRequest) -> Result<Self, AppError> {
        let token = AuthToken::from_headers(req)?;
        let app_state = req
            .app_data::<web::Data<AppState>>()
            .ok_or_else(|| AppError::internal("AppState missing from request"))?;

        let claims = app_state.auth.verify(&token.token)?;
        Ok(CurrentUser(claims))
    }
}

impl FromRequest for CurrentUser {
    type Error = AppError;
    type Future = std::pin::Pin<Box<dyn std::future::Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = Self::from_http(req);
        Box::pin(async move { result })
    }
}
