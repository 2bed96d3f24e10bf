use serde_json::{json, Value};

use crate::middleware::{ApiResponse, ApiResult};
use crate::store::{CarModelRepo, Db, ListingOrder};

/// GET /api/modelos - Every listing ordered by name, brand name joined in.
pub async fn get() -> ApiResult<Value> {
    let pool = Db::pool().await?;
    let cars = CarModelRepo::new(pool)
        .select_listings(ListingOrder::NameAsc, None)
        .await?;
    Ok(ApiResponse::success(json!({ "cars": cars })))
}
