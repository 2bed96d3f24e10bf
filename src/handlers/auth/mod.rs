pub mod login;
pub mod register;
pub mod session;

use std::collections::HashMap;

use crate::error::ApiError;

pub use login::login;
pub use register::register;
pub use session::{logout, session};

/// Shared form-level checks for the auth surface, mirroring the sign-in and
/// sign-up schemas: well-formed email, password of at least 6 characters,
/// full name of at least 2.
pub(crate) fn validate_credentials(
    email: &str,
    password: &str,
    full_name: Option<&str>,
) -> Result<(), ApiError> {
    let mut field_errors = HashMap::new();

    if !is_plausible_email(email) {
        field_errors.insert("email".to_string(), "Email inválido".to_string());
    }
    if password.len() < 6 {
        field_errors.insert(
            "password".to_string(),
            "La contraseña debe tener al menos 6 caracteres".to_string(),
        );
    }
    if let Some(name) = full_name {
        if name.trim().chars().count() < 2 {
            field_errors.insert(
                "full_name".to_string(),
                "El nombre debe tener al menos 2 caracteres".to_string(),
            );
        }
    }

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error(
            "Error de validación",
            Some(field_errors),
        ))
    }
}

fn is_plausible_email(email: &str) -> bool {
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_emails() {
        assert!(is_plausible_email("ana@automax.example"));
        assert!(!is_plausible_email("sin-arroba"));
        assert!(!is_plausible_email("a@sin-punto"));
        assert!(!is_plausible_email("@dominio.com"));
    }

    #[test]
    fn short_password_is_a_field_error() {
        let err = validate_credentials("ana@automax.example", "abc", None).unwrap_err();
        match err {
            ApiError::ValidationError { field_errors, .. } => {
                assert!(field_errors.unwrap().contains_key("password"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
