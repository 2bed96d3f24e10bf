//! Field schemas for the two admin-managed entities. Defaults mirror the
//! dialog's initial values: current year, zero price, first vocabulary entry.

use crate::models::{FuelType, Transmission};

use super::editor::{EntitySchema, FieldDefault, FieldKind, FieldSpec};

const BRAND_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "description",
        kind: FieldKind::OptionalText,
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "logo_url",
        kind: FieldKind::OptionalUrl,
        default: FieldDefault::Empty,
    },
];

const CAR_MODEL_FIELDS: &[FieldSpec] = &[
    FieldSpec {
        name: "brand_id",
        kind: FieldKind::Reference,
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "name",
        kind: FieldKind::Text,
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "year",
        kind: FieldKind::Integer,
        default: FieldDefault::CurrentYear,
    },
    FieldSpec {
        name: "price",
        kind: FieldKind::Money,
        default: FieldDefault::Fixed("0"),
    },
    FieldSpec {
        name: "fuel_type",
        kind: FieldKind::Choice(&FuelType::ALL),
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "transmission",
        kind: FieldKind::Choice(&Transmission::ALL),
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "description",
        kind: FieldKind::OptionalText,
        default: FieldDefault::Empty,
    },
    FieldSpec {
        name: "image_url",
        kind: FieldKind::OptionalUrl,
        default: FieldDefault::Empty,
    },
];

pub fn brand_schema() -> EntitySchema {
    EntitySchema {
        entity: "brands",
        fields: BRAND_FIELDS,
    }
}

pub fn car_model_schema() -> EntitySchema {
    EntitySchema {
        entity: "car_models",
        fields: CAR_MODEL_FIELDS,
    }
}
