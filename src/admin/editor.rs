//! One reusable create/edit/delete workflow for admin entities, parameterized
//! by a field schema and a CRUD adapter. Brand and CarModel share this state
//! machine instead of duplicating it per entity.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::FromRow;
use url::Url;
use uuid::Uuid;

use crate::store::repository::{Repository, WriteRecord};
use crate::store::{SqlValue, StoreError};

/// What kind of form field this is; drives parsing, validation and the
/// empty-string-to-null normalization applied before a write.
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Required free text.
    Text,
    /// Optional free text; empty submits as null.
    OptionalText,
    /// Optional URL; empty submits as null, non-empty must parse.
    OptionalUrl,
    /// Required integer.
    Integer,
    /// Required non-negative decimal amount.
    Money,
    /// Required value drawn from a closed vocabulary.
    Choice(&'static [&'static str]),
    /// Required id drawn from the caller-supplied allowed set.
    Reference,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldDefault {
    Empty,
    Fixed(&'static str),
    CurrentYear,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub default: FieldDefault,
}

impl FieldSpec {
    pub fn default_value(&self) -> String {
        match self.default {
            FieldDefault::Empty => match self.kind {
                // A choice field is never blank; it opens on the first entry.
                FieldKind::Choice(vocabulary) => {
                    vocabulary.first().copied().unwrap_or_default().to_string()
                }
                _ => String::new(),
            },
            FieldDefault::Fixed(v) => v.to_string(),
            FieldDefault::CurrentYear => Utc::now().year().to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EntitySchema {
    pub entity: &'static str,
    pub fields: &'static [FieldSpec],
}

/// The in-memory form buffer: every field as the string the form shows.
pub type FormFields = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    Create,
    Edit(Uuid),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorState {
    Idle,
    Open { mode: EditMode, fields: FormFields },
    Submitting { mode: EditMode, fields: FormFields },
}

#[derive(Debug)]
pub enum SubmitError {
    /// Malformed input. Never reaches the store; the dialog stays open.
    Validation { field_errors: HashMap<String, String> },
    /// The store rejected the write; the dialog reopens with the user's
    /// values intact so they can correct and resubmit.
    Store(StoreError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// Confirmation declined: no backend call was made.
    NotConfirmed,
}

/// CRUD seam the editor writes through.
#[async_trait]
pub trait EntityAdapter: Send + Sync {
    async fn create(&self, record: WriteRecord) -> Result<(), StoreError>;
    async fn update(&self, id: Uuid, record: WriteRecord) -> Result<(), StoreError>;
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Adapter over a plain table repository.
pub struct TableAdapter<T> {
    repo: Repository<T>,
}

impl<T> TableAdapter<T> {
    pub fn new(repo: Repository<T>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<T> EntityAdapter for TableAdapter<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Sync + Unpin,
{
    async fn create(&self, record: WriteRecord) -> Result<(), StoreError> {
        self.repo.insert(record).await.map(|_| ())
    }

    async fn update(&self, id: Uuid, record: WriteRecord) -> Result<(), StoreError> {
        self.repo.update(id, record).await.map(|_| ())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        self.repo.delete(id).await
    }
}

pub struct Editor {
    schema: EntitySchema,
    state: EditorState,
}

impl Editor {
    pub fn new(schema: EntitySchema) -> Self {
        Self {
            schema,
            state: EditorState::Idle,
        }
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn fields(&self) -> Option<&FormFields> {
        match &self.state {
            EditorState::Open { fields, .. } | EditorState::Submitting { fields, .. } => {
                Some(fields)
            }
            EditorState::Idle => None,
        }
    }

    /// Opens the dialog for a new entity with the schema's defaults.
    pub fn open_create(&mut self) {
        let fields = self
            .schema
            .fields
            .iter()
            .map(|f| (f.name.to_string(), f.default_value()))
            .collect();
        self.state = EditorState::Open {
            mode: EditMode::Create,
            fields,
        };
    }

    /// Opens the dialog populated verbatim from an existing entity. Null
    /// optionals map to the empty string; a null choice falls back to the
    /// vocabulary default.
    pub fn open_edit(&mut self, id: Uuid, entity: &Value) {
        let fields = self
            .schema
            .fields
            .iter()
            .map(|f| {
                let value = match entity.get(f.name) {
                    Some(Value::String(s)) => s.clone(),
                    Some(Value::Number(n)) => n.to_string(),
                    _ => f.default_value(),
                };
                (f.name.to_string(), value)
            })
            .collect();
        self.state = EditorState::Open {
            mode: EditMode::Edit(id),
            fields,
        };
    }

    /// Applies user edits to the open form. Unknown names are ignored.
    pub fn set_field(&mut self, name: &str, value: impl Into<String>) {
        if !self.schema.fields.iter().any(|f| f.name == name) {
            return;
        }
        if let EditorState::Open { fields, .. } = &mut self.state {
            fields.insert(name.to_string(), value.into());
        }
    }

    /// Validates, normalizes and writes the open form through the adapter.
    /// `allowed_refs` is the id set a Reference field may point into (the
    /// currently loaded brand list, for car models).
    pub async fn submit(
        &mut self,
        adapter: &dyn EntityAdapter,
        allowed_refs: &[Uuid],
    ) -> Result<(), SubmitError> {
        let (mode, fields) = match &self.state {
            EditorState::Open { mode, fields } => (*mode, fields.clone()),
            _ => {
                let mut field_errors = HashMap::new();
                field_errors.insert("_form".to_string(), "No hay un formulario abierto".to_string());
                return Err(SubmitError::Validation { field_errors });
            }
        };

        let record = normalize(&self.schema, &fields, allowed_refs)
            .map_err(|field_errors| SubmitError::Validation { field_errors })?;

        self.state = EditorState::Submitting {
            mode,
            fields: fields.clone(),
        };

        let result = match mode {
            EditMode::Create => adapter.create(record).await,
            EditMode::Edit(id) => adapter.update(id, record).await,
        };

        match result {
            Ok(()) => {
                // Success closes the dialog and resets to defaults; the
                // caller re-fetches the affected set.
                self.state = EditorState::Idle;
                Ok(())
            }
            Err(err) => {
                self.state = EditorState::Open { mode, fields };
                Err(SubmitError::Store(err))
            }
        }
    }

    /// Deletes an entity after explicit confirmation. Declining issues no
    /// backend call at all.
    pub async fn delete(
        &self,
        adapter: &dyn EntityAdapter,
        id: Uuid,
        confirmed: bool,
    ) -> Result<DeleteOutcome, StoreError> {
        if !confirmed {
            return Ok(DeleteOutcome::NotConfirmed);
        }
        adapter.delete(id).await?;
        Ok(DeleteOutcome::Deleted)
    }
}

/// Parses and validates the form buffer into a write record, normalizing
/// empty optional strings back to null.
fn normalize(
    schema: &EntitySchema,
    fields: &FormFields,
    allowed_refs: &[Uuid],
) -> Result<WriteRecord, HashMap<String, String>> {
    let mut record: WriteRecord = Vec::with_capacity(schema.fields.len());
    let mut field_errors = HashMap::new();

    for spec in schema.fields {
        let raw = fields.get(spec.name).map(String::as_str).unwrap_or("").trim();
        match parse_field(spec, raw, allowed_refs) {
            Ok(value) => record.push((spec.name.to_string(), value)),
            Err(message) => {
                field_errors.insert(spec.name.to_string(), message);
            }
        }
    }

    if field_errors.is_empty() {
        Ok(record)
    } else {
        Err(field_errors)
    }
}

fn parse_field(spec: &FieldSpec, raw: &str, allowed_refs: &[Uuid]) -> Result<SqlValue, String> {
    match spec.kind {
        FieldKind::Text => {
            if raw.is_empty() {
                Err("Este campo es obligatorio".to_string())
            } else {
                Ok(SqlValue::Text(raw.to_string()))
            }
        }
        FieldKind::OptionalText => {
            if raw.is_empty() {
                Ok(SqlValue::Null)
            } else {
                Ok(SqlValue::Text(raw.to_string()))
            }
        }
        FieldKind::OptionalUrl => {
            if raw.is_empty() {
                Ok(SqlValue::Null)
            } else {
                Url::parse(raw)
                    .map(|_| SqlValue::Text(raw.to_string()))
                    .map_err(|_| "URL inválida".to_string())
            }
        }
        FieldKind::Integer => raw
            .parse::<i64>()
            .map(SqlValue::Int)
            .map_err(|_| "Debe ser un número".to_string()),
        FieldKind::Money => {
            let amount: Decimal = raw.parse().map_err(|_| "Debe ser un número".to_string())?;
            if amount < Decimal::ZERO {
                Err("No puede ser negativo".to_string())
            } else {
                Ok(SqlValue::Decimal(amount))
            }
        }
        FieldKind::Choice(vocabulary) => {
            if vocabulary.contains(&raw) {
                Ok(SqlValue::Text(raw.to_string()))
            } else {
                Err("Valor no permitido".to_string())
            }
        }
        FieldKind::Reference => {
            let id = Uuid::parse_str(raw).map_err(|_| "Selecciona una opción válida".to_string())?;
            if allowed_refs.contains(&id) {
                Ok(SqlValue::Uuid(id))
            } else {
                Err("Selecciona una opción válida".to_string())
            }
        }
    }
}
