use axum::extract::Query;
use serde_json::{json, Value};

use crate::catalog::{CatalogParams, CatalogQuery};
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Brand;
use crate::store::{CarModelRepo, Db, ListingOrder, Repository};

/// GET /api/tienda - The catalog: full brand list plus the filtered, searched
/// and sorted car listings. `brand`, `q` and `sort` arrive in the query
/// string; the response echoes the canonical query string so the client can
/// keep the URL synchronized (no parameter at all means "all brands").
pub async fn get(Query(params): Query<CatalogParams>) -> ApiResult<Value> {
    let pool = Db::pool().await?;
    let brand_repo = Repository::<Brand>::new("brands", pool.clone())?;
    let car_repo = CarModelRepo::new(pool);

    // Brand list and listings are independent reads; issue them together.
    let (brands, cars) = tokio::try_join!(
        brand_repo.select_any(brand_repo.filter()?.order_by("name")?),
        car_repo.select_listings(ListingOrder::CreatedDesc, None),
    )?;

    let query = CatalogQuery::from_params(&params);
    let cars = query.apply(&cars);
    let total = cars.len();

    Ok(ApiResponse::success(json!({
        "brands": brands,
        "cars": cars,
        "total": total,
        "query_string": query.to_query_string(),
    })))
}
