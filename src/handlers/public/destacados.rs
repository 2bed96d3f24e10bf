use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Brand;
use crate::store::{CarModelRepo, Db, ListingOrder, Repository};

/// GET /api/destacados - Home-page feed: the brand list plus newest-first
/// listings for the brand filter pills.
pub async fn get() -> ApiResult<Value> {
    let pool = Db::pool().await?;
    let brand_repo = Repository::<Brand>::new("brands", pool.clone())?;
    let car_repo = CarModelRepo::new(pool);

    let (brands, cars) = tokio::try_join!(
        brand_repo.select_any(brand_repo.filter()?.order_by("name")?),
        car_repo.select_listings(ListingOrder::CreatedDesc, None),
    )?;

    Ok(ApiResponse::success(json!({
        "brands": brands,
        "cars": cars,
    })))
}
