pub mod brands;
pub mod dashboard;
pub mod models;

use serde_json::Value;

use crate::admin::{Editor, SubmitError};
use crate::error::ApiError;
use crate::store::StoreError;

/// Applies a JSON payload over the open form, field by field. The editor
/// ignores names outside the schema, so stray payload keys are harmless.
pub(crate) fn overlay(editor: &mut Editor, payload: &Value) {
    let Some(object) = payload.as_object() else {
        return;
    };
    for (name, value) in object {
        match value {
            Value::String(s) => editor.set_field(name, s.clone()),
            Value::Number(n) => editor.set_field(name, n.to_string()),
            Value::Bool(b) => editor.set_field(name, b.to_string()),
            Value::Null => editor.set_field(name, ""),
            _ => {}
        }
    }
}

/// Maps an editor submit failure to the API error surface. Duplicate-key
/// conflicts get the entity-specific message the form shows.
pub(crate) fn submit_error(err: SubmitError, duplicate_message: &str) -> ApiError {
    match err {
        SubmitError::Validation { field_errors } => {
            ApiError::validation_error("Error de validación", Some(field_errors))
        }
        SubmitError::Store(StoreError::DuplicateKey(_)) => ApiError::conflict(duplicate_message),
        SubmitError::Store(e) => e.into(),
    }
}

/// Query flag for destructive endpoints: nothing is deleted without it.
#[derive(Debug, serde::Deserialize)]
pub struct DeleteParams {
    #[serde(default)]
    pub confirm: bool,
}
