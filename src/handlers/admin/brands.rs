use axum::extract::{Path, Query};
use axum::Json;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::admin::{brand_schema, DeleteOutcome, Editor, TableAdapter};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::models::Brand;
use crate::store::{Db, Repository, StoreError};

const DUPLICATE_MESSAGE: &str = "Ya existe una marca con ese nombre";

async fn repo() -> Result<Repository<Brand>, ApiError> {
    let pool = Db::pool().await?;
    Ok(Repository::<Brand>::new("brands", pool)?)
}

async fn fetch_all(repo: &Repository<Brand>) -> Result<Vec<Brand>, ApiError> {
    Ok(repo.select_any(repo.filter()?.order_by("name")?).await?)
}

/// GET /api/admin/marcas - Brands ordered by name for the admin table.
pub async fn list() -> ApiResult<Value> {
    let repo = repo().await?;
    let brands = fetch_all(&repo).await?;
    Ok(ApiResponse::success(json!({ "brands": brands })))
}

/// POST /api/admin/marcas - Create a brand through the editor workflow and
/// answer with the re-fetched list.
pub async fn create(Json(payload): Json<Value>) -> ApiResult<Value> {
    let repo = repo().await?;
    let adapter = TableAdapter::new(self::repo().await?);

    let mut editor = Editor::new(brand_schema());
    editor.open_create();
    super::overlay(&mut editor, &payload);
    editor
        .submit(&adapter, &[])
        .await
        .map_err(|e| super::submit_error(e, DUPLICATE_MESSAGE))?;

    let brands = fetch_all(&repo).await?;
    Ok(ApiResponse::created(json!({
        "message": "Marca creada correctamente",
        "brands": brands,
    })))
}

/// PUT /api/admin/marcas/:id - Populate the editor from the stored brand,
/// overlay the caller's changes, submit.
pub async fn update(Path(id): Path<Uuid>, Json(payload): Json<Value>) -> ApiResult<Value> {
    let repo = repo().await?;
    let current = repo.select_404(repo.filter()?.eq("id", id)?).await?;
    let current = serde_json::to_value(&current)
        .map_err(|e| ApiError::internal_server_error(format!("Serialization error: {}", e)))?;

    let adapter = TableAdapter::new(self::repo().await?);
    let mut editor = Editor::new(brand_schema());
    editor.open_edit(id, &current);
    super::overlay(&mut editor, &payload);
    editor
        .submit(&adapter, &[])
        .await
        .map_err(|e| super::submit_error(e, DUPLICATE_MESSAGE))?;

    let brands = fetch_all(&repo).await?;
    Ok(ApiResponse::success(json!({
        "message": "Marca actualizada correctamente",
        "brands": brands,
    })))
}

/// DELETE /api/admin/marcas/:id?confirm=true - Nothing happens without the
/// confirmation flag. A brand with models attached stays put.
pub async fn delete(
    Path(id): Path<Uuid>,
    Query(params): Query<super::DeleteParams>,
) -> ApiResult<Value> {
    let repo = repo().await?;
    let adapter = TableAdapter::new(self::repo().await?);
    let editor = Editor::new(brand_schema());

    match editor.delete(&adapter, id, params.confirm).await {
        Ok(DeleteOutcome::Deleted) => {
            let brands = fetch_all(&repo).await?;
            Ok(ApiResponse::success(json!({
                "message": "Marca eliminada correctamente",
                "deleted": true,
                "brands": brands,
            })))
        }
        Ok(DeleteOutcome::NotConfirmed) => Ok(ApiResponse::success(json!({
            "message": "Eliminación cancelada",
            "deleted": false,
        }))),
        Err(StoreError::ForeignKeyViolation(_)) => {
            Err(ApiError::conflict("La marca tiene modelos asociados"))
        }
        Err(e) => Err(e.into()),
    }
}
