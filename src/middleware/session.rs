use axum::{
    extract::Request,
    http::{header, HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::auth::gate::{self, GateDecision, SessionState, Surface, DASHBOARD_ROUTE};
use crate::auth::{validate_jwt, Actor};

/// The resolved actor, injected for handlers behind the gate.
#[derive(Clone, Debug)]
pub struct CurrentActor(pub Actor);

/// Resolves the session from the bearer token, if any, and injects the
/// resulting [`SessionState`]. Never rejects: anonymous requests pass
/// through as `Anonymous` so public surfaces stay reachable.
pub async fn session_middleware(headers: HeaderMap, mut request: Request, next: Next) -> Response {
    let state = resolve_session(&headers);
    request.extensions_mut().insert(state);
    next.run(request).await
}

/// Gate enforcement. Placed after [`session_middleware`] on the admin and
/// login route groups; translates the gate's pure decision into HTTP.
pub async fn gate_middleware(request: Request, next: Next) -> Response {
    let state = request
        .extensions()
        .get::<SessionState>()
        .cloned()
        .unwrap_or(SessionState::Anonymous);
    let surface = Surface::from_path(request.uri().path());

    match gate::decide(&state, surface) {
        GateDecision::Allow => {
            let mut request = request;
            if let Some(actor) = state.actor() {
                request.extensions_mut().insert(CurrentActor(actor.clone()));
            }
            next.run(request).await
        }
        GateDecision::Redirect(location) => redirect_response(surface, location),
        // A request is only handled once the session is resolved, but the
        // decision table is total: answer "come back later" rather than leak.
        GateDecision::Wait => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": true,
                "message": "Sesión en restauración",
                "code": "SESSION_RESTORING",
            })),
        )
            .into_response(),
    }
}

fn resolve_session(headers: &HeaderMap) -> SessionState {
    let Some(token) = extract_bearer(headers) else {
        return SessionState::Anonymous;
    };
    match validate_jwt(&token) {
        Ok(claims) => SessionState::Authenticated(claims.actor()),
        Err(e) => {
            tracing::debug!("Rejected bearer token: {}", e);
            SessionState::Anonymous
        }
    }
}

fn extract_bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

fn redirect_response(surface: Surface, location: &'static str) -> Response {
    match surface {
        // Anonymous actor on an admin surface: challenge with the login route.
        Surface::Admin => (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": true,
                "message": "Debes iniciar sesión para acceder al panel",
                "code": "UNAUTHORIZED",
                "redirect_to": location,
            })),
        )
            .into_response(),
        // Authenticated actor on the login surface: send to the dashboard.
        _ => (
            StatusCode::SEE_OTHER,
            [(header::LOCATION, DASHBOARD_ROUTE)],
            Json(json!({
                "success": true,
                "data": { "redirect_to": location },
            })),
        )
            .into_response(),
    }
}
