//! Editor workflow over an in-memory adapter: defaults, validation,
//! normalization and the confirm-before-delete rule, with no database.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::json;
use uuid::Uuid;

use automax_api::admin::{
    brand_schema, car_model_schema, DeleteOutcome, Editor, EditorState, EntityAdapter, SubmitError,
};
use automax_api::store::{SqlValue, StoreError, WriteRecord};

#[derive(Debug)]
enum Call {
    Create(WriteRecord),
    Update(Uuid, WriteRecord),
    Delete(Uuid),
}

#[derive(Debug, Clone, Copy)]
enum FailMode {
    None,
    DuplicateKey,
}

struct MemoryAdapter {
    calls: Mutex<Vec<Call>>,
    fail: FailMode,
}

impl MemoryAdapter {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: FailMode::None,
        }
    }

    fn failing_with_duplicate() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: FailMode::DuplicateKey,
        }
    }

    fn failure(&self) -> Option<StoreError> {
        match self.fail {
            FailMode::None => None,
            FailMode::DuplicateKey => Some(StoreError::DuplicateKey("uq_name".to_string())),
        }
    }

    fn calls(&self) -> std::sync::MutexGuard<'_, Vec<Call>> {
        self.calls.lock().unwrap()
    }
}

#[async_trait]
impl EntityAdapter for MemoryAdapter {
    async fn create(&self, record: WriteRecord) -> Result<(), StoreError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.calls().push(Call::Create(record));
        Ok(())
    }

    async fn update(&self, id: Uuid, record: WriteRecord) -> Result<(), StoreError> {
        if let Some(err) = self.failure() {
            return Err(err);
        }
        self.calls().push(Call::Update(id, record));
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.calls().push(Call::Delete(id));
        Ok(())
    }
}

fn field<'a>(record: &'a WriteRecord, name: &str) -> &'a SqlValue {
    &record
        .iter()
        .find(|(n, _)| n == name)
        .unwrap_or_else(|| panic!("missing field {}", name))
        .1
}

#[test]
fn create_dialog_opens_with_schema_defaults() {
    let mut editor = Editor::new(car_model_schema());
    editor.open_create();

    let fields = editor.fields().unwrap();
    assert_eq!(fields["year"], Utc::now().year().to_string());
    assert_eq!(fields["price"], "0");
    assert_eq!(fields["fuel_type"], "Gasolina");
    assert_eq!(fields["transmission"], "Automática");
    assert_eq!(fields["name"], "");
}

#[test]
fn edit_dialog_populates_from_the_entity() {
    let mut editor = Editor::new(brand_schema());
    let id = Uuid::new_v4();
    editor.open_edit(
        id,
        &json!({
            "name": "Ford",
            "description": null,
            "logo_url": "https://cdn.automax.example/ford.png",
        }),
    );

    let fields = editor.fields().unwrap();
    assert_eq!(fields["name"], "Ford");
    // Null optionals show as the empty string in the form.
    assert_eq!(fields["description"], "");
    assert_eq!(fields["logo_url"], "https://cdn.automax.example/ford.png");
}

#[test]
fn unknown_field_names_are_ignored() {
    let mut editor = Editor::new(brand_schema());
    editor.open_create();
    editor.set_field("name", "Toyota");
    editor.set_field("evil_column", "x");

    let fields = editor.fields().unwrap();
    assert_eq!(fields["name"], "Toyota");
    assert!(!fields.contains_key("evil_column"));
}

#[tokio::test]
async fn submit_normalizes_empty_optionals_to_null() {
    let adapter = MemoryAdapter::new();
    let mut editor = Editor::new(brand_schema());
    editor.open_create();
    editor.set_field("name", "  Nissan  ");
    editor.set_field("description", "");
    editor.set_field("logo_url", "");

    editor.submit(&adapter, &[]).await.unwrap();
    assert_eq!(*editor.state(), EditorState::Idle);

    let calls = adapter.calls();
    let record = match calls.as_slice() {
        [Call::Create(record)] => record,
        other => panic!("unexpected calls: {:?}", other),
    };
    assert_eq!(*field(record, "name"), SqlValue::Text("Nissan".to_string()));
    assert_eq!(*field(record, "description"), SqlValue::Null);
    assert_eq!(*field(record, "logo_url"), SqlValue::Null);
}

#[tokio::test]
async fn invalid_input_never_reaches_the_adapter() {
    let adapter = MemoryAdapter::new();
    let brand = Uuid::new_v4();
    let mut editor = Editor::new(car_model_schema());
    editor.open_create();
    editor.set_field("brand_id", brand.to_string());
    editor.set_field("name", "Leaf");
    editor.set_field("price", "-500");
    editor.set_field("image_url", "no-es-una-url");

    let err = editor.submit(&adapter, &[brand]).await.unwrap_err();
    match err {
        SubmitError::Validation { field_errors } => {
            assert!(field_errors.contains_key("price"));
            assert!(field_errors.contains_key("image_url"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(adapter.calls().is_empty());
    // The dialog stays open with the user's values intact.
    assert_eq!(editor.fields().unwrap()["price"], "-500");
}

#[tokio::test]
async fn reference_outside_the_allowed_set_is_rejected() {
    let adapter = MemoryAdapter::new();
    let mut editor = Editor::new(car_model_schema());
    editor.open_create();
    editor.set_field("brand_id", Uuid::new_v4().to_string());
    editor.set_field("name", "Hilux");

    let err = editor.submit(&adapter, &[]).await.unwrap_err();
    match err {
        SubmitError::Validation { field_errors } => {
            assert!(field_errors.contains_key("brand_id"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
    assert!(adapter.calls().is_empty());
}

#[tokio::test]
async fn store_rejection_reopens_the_dialog_with_fields_intact() {
    let adapter = MemoryAdapter::failing_with_duplicate();
    let mut editor = Editor::new(brand_schema());
    editor.open_create();
    editor.set_field("name", "Ford");

    let err = editor.submit(&adapter, &[]).await.unwrap_err();
    assert!(matches!(err, SubmitError::Store(StoreError::DuplicateKey(_))));

    match editor.state() {
        EditorState::Open { fields, .. } => assert_eq!(fields["name"], "Ford"),
        other => panic!("unexpected state: {:?}", other),
    }
}

#[tokio::test]
async fn edit_submit_writes_through_update() {
    let adapter = MemoryAdapter::new();
    let id = Uuid::new_v4();
    let mut editor = Editor::new(brand_schema());
    editor.open_edit(id, &json!({ "name": "Ford", "description": "clásicos" }));
    editor.set_field("description", "importados");

    editor.submit(&adapter, &[]).await.unwrap();

    let calls = adapter.calls();
    match calls.as_slice() {
        [Call::Update(updated, record)] => {
            assert_eq!(*updated, id);
            assert_eq!(
                *field(record, "description"),
                SqlValue::Text("importados".to_string())
            );
        }
        other => panic!("unexpected calls: {:?}", other),
    }
}

#[tokio::test]
async fn delete_requires_explicit_confirmation() {
    let adapter = MemoryAdapter::new();
    let editor = Editor::new(brand_schema());
    let id = Uuid::new_v4();

    let outcome = editor.delete(&adapter, id, false).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::NotConfirmed);
    assert!(adapter.calls().is_empty());

    let outcome = editor.delete(&adapter, id, true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert!(matches!(adapter.calls().as_slice(), [Call::Delete(deleted)] if *deleted == id));
}
