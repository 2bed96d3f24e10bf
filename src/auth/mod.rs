use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config;
use crate::models::Role;

pub mod gate;
pub mod password;

pub use gate::{Actor, GateDecision, SessionState, Surface};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String, role: Role) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            sub: user_id,
            email,
            role,
            exp,
            iat: now.timestamp(),
        }
    }

    pub fn actor(&self) -> Actor {
        Actor {
            user_id: self.sub,
            email: self.email.clone(),
            role: self.role,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key)
        .map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    let secret = &config::config().security.jwt_secret;
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    let token_data = decode::<Claims>(token, &decoding_key, &Validation::default())
        .map_err(|e| JwtError::InvalidToken(e.to_string()))?;
    Ok(token_data.claims)
}
