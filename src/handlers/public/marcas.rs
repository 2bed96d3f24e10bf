use std::collections::HashMap;

use serde_json::{json, Value};
use uuid::Uuid;

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Brand, CarModel};
use crate::store::{Db, Repository};

/// GET /api/marcas - Brands ordered by name, each with the number of car
/// models it currently has.
pub async fn get() -> ApiResult<Value> {
    let pool = Db::pool().await?;
    let brand_repo = Repository::<Brand>::new("brands", pool.clone())?;
    let car_repo = Repository::<CarModel>::new("car_models", pool)?;

    let (brands, cars) = tokio::try_join!(
        brand_repo.select_any(brand_repo.filter()?.order_by("name")?),
        car_repo.select_any(car_repo.filter()?),
    )?;

    let mut counts: HashMap<Uuid, usize> = HashMap::new();
    for car in &cars {
        *counts.entry(car.brand_id).or_default() += 1;
    }

    let brands: Vec<Value> = brands
        .into_iter()
        .map(|brand| {
            let model_count = counts.get(&brand.id).copied().unwrap_or(0);
            json!({
                "id": brand.id,
                "name": brand.name,
                "description": brand.description,
                "logo_url": brand.logo_url,
                "created_at": brand.created_at,
                "model_count": model_count,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({ "brands": brands })))
}
