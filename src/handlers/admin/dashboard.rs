use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::config;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Brand, CarModel, Profile};
use crate::store::{CarModelRepo, Db, ListingOrder, Repository};

/// GET /api/admin/dashboard - Back-office landing numbers: entity totals,
/// average listing price and the most recent models.
pub async fn get() -> ApiResult<Value> {
    let pool = Db::pool().await?;
    let brands = Repository::<Brand>::new("brands", pool.clone())?;
    let models = Repository::<CarModel>::new("car_models", pool.clone())?;
    let profiles = Repository::<Profile>::new("profiles", pool.clone())?;
    let listings = CarModelRepo::new(pool);

    let recent_limit = config::config().catalog.recent_models;
    let (total_brands, all_models, total_users, recent) = tokio::try_join!(
        brands.count(brands.filter()?),
        models.select_any(models.filter()?),
        profiles.count(profiles.filter()?),
        listings.select_listings(ListingOrder::CreatedDesc, Some(recent_limit)),
    )?;

    let total_models = all_models.len();
    let average_price = if all_models.is_empty() {
        Decimal::ZERO
    } else {
        let sum: Decimal = all_models.iter().map(|m| m.price).sum();
        (sum / Decimal::from(total_models as u64)).round_dp(2)
    };

    let recent_models: Vec<Value> = recent
        .into_iter()
        .map(|car| {
            json!({
                "name": car.name,
                "brand": car.brand_name,
                "price": car.price,
            })
        })
        .collect();

    Ok(ApiResponse::success(json!({
        "total_brands": total_brands,
        "total_models": total_models,
        "total_users": total_users,
        "average_price": average_price,
        "recent_models": recent_models,
    })))
}
