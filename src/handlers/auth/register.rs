use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::auth::gate::DASHBOARD_ROUTE;
use crate::auth::{generate_jwt, password, Claims};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Credential, Profile, Role, UserRole};
use crate::store::{Db, Repository, SqlValue, StoreError, WriteRecord};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
}

/// POST /auth/register - Create credential, profile and default role for a
/// new actor, then sign them in.
pub async fn register(Json(body): Json<RegisterRequest>) -> ApiResult<Value> {
    super::validate_credentials(&body.email, &body.password, Some(&body.full_name))?;

    let pool = Db::pool().await?;
    let credentials = Repository::<Credential>::new("auth_users", pool.clone())?;

    let email = body.email.trim().to_lowercase();
    let full_name = body.full_name.trim().to_string();

    let record: WriteRecord = vec![
        ("email".to_string(), SqlValue::from(email.as_str())),
        (
            "password_digest".to_string(),
            SqlValue::from(password::digest(&body.password)),
        ),
    ];
    let credential = match credentials.insert(record).await {
        Ok(credential) => credential,
        Err(StoreError::DuplicateKey(_)) => {
            return Err(ApiError::conflict("Este email ya está registrado"));
        }
        Err(e) => return Err(e.into()),
    };

    let profiles = Repository::<Profile>::new("profiles", pool.clone())?;
    let roles = Repository::<UserRole>::new("user_roles", pool)?;
    let profile_record: WriteRecord = vec![
        ("user_id".to_string(), SqlValue::from(credential.id)),
        ("email".to_string(), SqlValue::from(email.as_str())),
        ("full_name".to_string(), SqlValue::from(full_name.as_str())),
    ];
    let role_record: WriteRecord = vec![
        ("user_id".to_string(), SqlValue::from(credential.id)),
        ("role".to_string(), SqlValue::from(Role::User.as_str())),
    ];
    let (profile, _role) = tokio::try_join!(
        profiles.insert(profile_record),
        roles.insert(role_record),
    )?;

    let claims = Claims::new(credential.id, credential.email.clone(), Role::User);
    let token = generate_jwt(&claims)
        .map_err(|e| ApiError::internal_server_error(format!("Token error: {}", e)))?;

    Ok(ApiResponse::created(json!({
        "message": "Tu cuenta ha sido creada exitosamente",
        "token": token,
        "user": {
            "id": credential.id,
            "email": credential.email,
            "full_name": profile.full_name,
            "role": Role::User,
        },
        "redirect_to": DASHBOARD_ROUTE,
    })))
}
