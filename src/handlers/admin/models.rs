use axum::extract::{Path, Query};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::admin::{car_model_schema, DeleteOutcome, Editor, TableAdapter};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::{Brand, CarModel};
use crate::store::{CarModelRepo, Db, ListingOrder, Repository};

const DUPLICATE_MESSAGE: &str = "Ya existe un modelo con ese nombre";

async fn model_repo() -> Result<Repository<CarModel>, ApiError> {
    let pool = Db::pool().await?;
    Ok(Repository::<CarModel>::new("car_models", pool)?)
}

/// Ids a model's `brand_id` may reference. The editor checks membership so a
/// stale form can't point at a brand deleted since the page loaded.
async fn brand_ids() -> Result<Vec<Uuid>, ApiError> {
    let pool = Db::pool().await?;
    let repo = Repository::<Brand>::new("brands", pool)?;
    let brands = repo.select_any(repo.filter()?).await?;
    Ok(brands.into_iter().map(|b| b.id).collect())
}

async fn fetch_listings() -> Result<Value, ApiError> {
    let pool = Db::pool().await?;
    let cars = CarModelRepo::new(pool)
        .select_listings(ListingOrder::CreatedDesc, None)
        .await?;
    Ok(json!(cars))
}

/// GET /api/admin/modelos - Newest-first listings with brand names joined in.
pub async fn list() -> ApiResult<Value> {
    let cars = fetch_listings().await?;
    Ok(ApiResponse::success(json!({ "cars": cars })))
}

/// POST /api/admin/modelos - Create a model through the editor workflow.
pub async fn create(Json(payload): Json<Value>) -> ApiResult<Value> {
    let adapter = TableAdapter::new(model_repo().await?);
    let refs = brand_ids().await?;

    let mut editor = Editor::new(car_model_schema());
    editor.open_create();
    super::overlay(&mut editor, &payload);
    editor
        .submit(&adapter, &refs)
        .await
        .map_err(|e| super::submit_error(e, DUPLICATE_MESSAGE))?;

    Ok(ApiResponse::created(json!({
        "message": "Modelo creado correctamente",
        "cars": fetch_listings().await?,
    })))
}

/// PUT /api/admin/modelos/:id - Populate from the stored model, overlay the
/// caller's changes, submit.
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<Value>) -> ApiResult<Value> {
    let repo = model_repo().await?;
    let current = repo.select_404(repo.filter()?.eq("id", id)?).await?;
    let current = serde_json::to_value(&current)
        .map_err(|e| ApiError::internal_server_error(format!("Serialization error: {}", e)))?;

    let adapter = TableAdapter::new(model_repo().await?);
    let refs = brand_ids().await?;

    let mut editor = Editor::new(car_model_schema());
    editor.open_edit(id, &current);
    super::overlay(&mut editor, &payload);
    editor
        .submit(&adapter, &refs)
        .await
        .map_err(|e| super::submit_error(e, DUPLICATE_MESSAGE))?;

    Ok(ApiResponse::success(json!({
        "message": "Modelo actualizado correctamente",
        "cars": fetch_listings().await?,
    })))
}

/// DELETE /api/admin/modelos/:id?confirm=true
pub async fn delete(
    Path(id): Path<Uuid>,
    Query(params): Query<super::DeleteParams>,
) -> ApiResult<Value> {
    let adapter = TableAdapter::new(model_repo().await?);
    let editor = Editor::new(car_model_schema());

    match editor.delete(&adapter, id, params.confirm).await? {
        DeleteOutcome::Deleted => Ok(ApiResponse::success(json!({
            "message": "Modelo eliminado correctamente",
            "deleted": true,
            "cars": fetch_listings().await?,
        }))),
        DeleteOutcome::NotConfirmed => Ok(ApiResponse::success(json!({
            "message": "Eliminación cancelada",
            "deleted": false,
        }))),
    }
}
