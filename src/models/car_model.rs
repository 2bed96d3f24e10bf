use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A vehicle listing. `brand_id` must reference an existing brand at write
/// time; the database enforces this with a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarModel {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub year: i32,
    pub price: Decimal,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Read-path shape: a car model joined with its brand name for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarListing {
    pub id: Uuid,
    pub brand_id: Uuid,
    pub name: String,
    pub year: i32,
    pub price: Decimal,
    pub fuel_type: Option<String>,
    pub transmission: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub brand_name: Option<String>,
}

/// Fuel vocabulary. Stored as text; the admin form only accepts these values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FuelType {
    #[serde(rename = "Gasolina")]
    Gasolina,
    #[serde(rename = "Diésel")]
    Diesel,
    #[serde(rename = "Híbrido")]
    Hibrido,
    #[serde(rename = "Eléctrico")]
    Electrico,
}

impl FuelType {
    pub const ALL: [&'static str; 4] = ["Gasolina", "Diésel", "Híbrido", "Eléctrico"];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Gasolina => "Gasolina",
            FuelType::Diesel => "Diésel",
            FuelType::Hibrido => "Híbrido",
            FuelType::Electrico => "Eléctrico",
        }
    }
}

/// Transmission vocabulary, same storage rules as [`FuelType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Transmission {
    #[serde(rename = "Automática")]
    Automatica,
    #[serde(rename = "Manual")]
    Manual,
}

impl Transmission {
    pub const ALL: [&'static str; 2] = ["Automática", "Manual"];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Automatica => "Automática",
            Transmission::Manual => "Manual",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vocabulary_defaults_are_first_entries() {
        assert_eq!(FuelType::ALL[0], FuelType::Gasolina.as_str());
        assert_eq!(Transmission::ALL[0], Transmission::Automatica.as_str());
    }

    #[test]
    fn vocabulary_serializes_to_spanish_labels() {
        assert_eq!(serde_json::to_string(&FuelType::Diesel).unwrap(), "\"Diésel\"");
        assert_eq!(serde_json::to_string(&Transmission::Automatica).unwrap(), "\"Automática\"");
    }
}
