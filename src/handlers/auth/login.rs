use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::gate::DASHBOARD_ROUTE;
use crate::auth::{generate_jwt, password, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Credential, Profile, Role, UserRole};
use crate::store::{Db, Repository};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /auth/login - Verify credentials and issue a session token. Wrong
/// email and wrong password answer identically.
pub async fn login(Json(body): Json<LoginRequest>) -> ApiResult<Value> {
    super::validate_credentials(&body.email, &body.password, None)?;

    let pool = Db::pool().await?;
    let credentials = Repository::<Credential>::new("auth_users", pool.clone())?;

    let email = body.email.trim().to_lowercase();
    let credential = credentials
        .select_one(credentials.filter()?.eq("email", email.as_str())?)
        .await?
        .ok_or_else(|| ApiError::unauthorized("Credenciales inválidas"))?;

    if !password::verify(&body.password, &credential.password_digest) {
        return Err(ApiError::unauthorized("Credenciales inválidas"));
    }

    let roles = Repository::<UserRole>::new("user_roles", pool.clone())?;
    let profiles = Repository::<Profile>::new("profiles", pool)?;
    let (roles, profile) = tokio::try_join!(
        roles.select_any(roles.filter()?.eq("user_id", credential.id)?),
        profiles.select_one(profiles.filter()?.eq("user_id", credential.id)?),
    )?;

    // Prefer the admin role when the actor holds several.
    let role = if roles.iter().any(|r| r.role == Role::Admin) {
        Role::Admin
    } else {
        Role::User
    };

    let claims = Claims::new(credential.id, credential.email.clone(), role);
    let token = generate_jwt(&claims)
        .map_err(|e| ApiError::internal_server_error(format!("Token error: {}", e)))?;

    Ok(ApiResponse::success(json!({
        "token": token,
        "user": {
            "id": credential.id,
            "email": credential.email,
            "full_name": profile.and_then(|p| p.full_name),
            "role": role,
        },
        "redirect_to": DASHBOARD_ROUTE,
    })))
}
