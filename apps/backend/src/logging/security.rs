use tracing::warn;

use crate::logging::pii::Redacted;
use crate::web::trace_ctx;

/// Log a login failure with its internal cause. The caller only ever sees
/// the uniform authentication failure.
pub fn login_failed(reason: &str, email: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_LOGIN_FAILED",
        %trace_id,
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// Log a rejected token presentation.
pub fn token_rejected(grant: &str) {
    let trace_id = trace_ctx::trace_id();

    warn!(
        event = "SECURITY_TOKEN_REJECTED",
        %trace_id,
        grant,
        "Token rejected"
    );
}
