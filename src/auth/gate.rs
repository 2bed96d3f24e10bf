use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::Role;

/// Route targets the gate can send an actor to.
pub const LOGIN_ROUTE: &str = "/auth";
pub const DASHBOARD_ROUTE: &str = "/admin";
pub const STOREFRONT_ROUTE: &str = "/";

/// The authenticated identity carried by a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub user_id: Uuid,
    pub email: String,
    pub role: Role,
}

/// Session lifecycle as seen by route guards. `Restoring` covers the window
/// while the session is being recovered; guards must not redirect during it
/// or the user sees a flash-redirect that undoes itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    Restoring,
    Anonymous,
    Authenticated(Actor),
}

impl SessionState {
    pub fn actor(&self) -> Option<&Actor> {
        match self {
            SessionState::Authenticated(actor) => Some(actor),
            _ => None,
        }
    }
}

/// The surface a navigation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Storefront,
    Login,
    Admin,
}

impl Surface {
    /// Classify a request path. Admin surfaces live under `/admin` and
    /// `/api/admin`; the login surface is `/auth`.
    pub fn from_path(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        if path == LOGIN_ROUTE || path.starts_with("/auth/") {
            Surface::Login
        } else if path == DASHBOARD_ROUTE
            || path.starts_with("/admin/")
            || path == "/api/admin"
            || path.starts_with("/api/admin/")
        {
            Surface::Admin
        } else {
            Surface::Storefront
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateDecision {
    Allow,
    /// Session still restoring: render a loading state, decide later.
    Wait,
    Redirect(&'static str),
}

/// The access-control decision table. Pure: same inputs, same answer.
pub fn decide(state: &SessionState, surface: Surface) -> GateDecision {
    match (state, surface) {
        (SessionState::Restoring, Surface::Admin) => GateDecision::Wait,
        (SessionState::Anonymous, Surface::Admin) => GateDecision::Redirect(LOGIN_ROUTE),
        (SessionState::Authenticated(_), Surface::Login) => GateDecision::Redirect(DASHBOARD_ROUTE),
        _ => GateDecision::Allow,
    }
}

/// Where an explicit sign-out lands.
pub fn sign_out_redirect() -> &'static str {
    STOREFRONT_ROUTE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor() -> Actor {
        Actor {
            user_id: Uuid::new_v4(),
            email: "admin@automax.example".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn anonymous_admin_navigation_redirects_to_login() {
        assert_eq!(
            decide(&SessionState::Anonymous, Surface::Admin),
            GateDecision::Redirect("/auth")
        );
    }

    #[test]
    fn authenticated_login_navigation_redirects_to_dashboard() {
        assert_eq!(
            decide(&SessionState::Authenticated(actor()), Surface::Login),
            GateDecision::Redirect("/admin")
        );
    }

    #[test]
    fn restoring_session_waits_instead_of_redirecting() {
        assert_eq!(decide(&SessionState::Restoring, Surface::Admin), GateDecision::Wait);
    }

    #[test]
    fn storefront_is_always_open() {
        assert_eq!(decide(&SessionState::Anonymous, Surface::Storefront), GateDecision::Allow);
        assert_eq!(decide(&SessionState::Restoring, Surface::Storefront), GateDecision::Allow);
        assert_eq!(
            decide(&SessionState::Authenticated(actor()), Surface::Storefront),
            GateDecision::Allow
        );
    }

    #[test]
    fn classifies_paths() {
        assert_eq!(Surface::from_path("/admin/marcas"), Surface::Admin);
        assert_eq!(Surface::from_path("/api/admin/modelos"), Surface::Admin);
        assert_eq!(Surface::from_path("/auth"), Surface::Login);
        assert_eq!(Surface::from_path("/tienda"), Surface::Storefront);
    }
}
