use axum::Extension;
use serde_json::{json, Value};

use crate::auth::{gate, SessionState};
use crate::middleware::{ApiResponse, ApiResult};

/// GET /auth/session - Report the caller's session as the middleware
/// resolved it. Reachable without a session so clients can probe on load.
pub async fn session(Extension(state): Extension<SessionState>) -> ApiResult<Value> {
    let body = match &state {
        SessionState::Authenticated(actor) => json!({
            "authenticated": true,
            "user": actor,
        }),
        _ => json!({
            "authenticated": false,
            "user": Value::Null,
        }),
    };
    Ok(ApiResponse::success(body))
}

/// POST /auth/logout - Stateless tokens have nothing to revoke server-side;
/// the response tells the client where to land after discarding its token.
pub async fn logout() -> ApiResult<Value> {
    Ok(ApiResponse::success(json!({
        "redirect_to": gate::sign_out_redirect(),
    })))
}
