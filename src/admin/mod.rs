pub mod editor;
pub mod schema;

pub use editor::{
    DeleteOutcome, EditMode, Editor, EditorState, EntityAdapter, FieldDefault, FieldKind,
    FieldSpec, EntitySchema, SubmitError, TableAdapter,
};
pub use schema::{brand_schema, car_model_schema};
