//! Resource CRUD request handlers.
//!
//! One set of handlers serves every resource kind; each kind gets its own
//! router instance whose state is the matching [`ResourceService`].

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::api::middleware::unknown_endpoint;
use crate::error::{AppError, AppResult};
use crate::models::{Resource, ResourceKind};
use crate::services::ResourceService;
use crate::state::AppState;

/// Creates the routes for one resource kind under `base` (e.g. `/api/tours`).
///
/// Routes (each also matches with a trailing slash):
/// - GET {base}         - List all resources, newest first
/// - POST {base}        - Create a new resource
/// - GET {base}/{id}    - Get resource by ID
/// - PUT {base}/{id}    - Replace resource by ID
/// - DELETE {base}/{id} - Delete resource by ID
///
/// Any other method on these paths is an unknown endpoint (404), not a 405.
pub fn resource_routes<K: ResourceKind>(base: &str, service: ResourceService<K>) -> Router<AppState> {
    let collection = get(list::<K>).post(create::<K>);
    let item = get(read::<K>).put(update::<K>).delete(delete::<K>);
    let item_path = format!("{base}/{{id}}");

    Router::new()
        .route(base, collection.clone())
        .route(&format!("{base}/"), collection)
        .route(&item_path, item.clone())
        .route(&format!("{item_path}/"), item)
        .method_not_allowed_fallback(unknown_endpoint)
        .with_state(service)
}

/// Unwraps the JSON body, turning any rejection into an invalid-data error.
fn json_body<K: ResourceKind>(payload: Result<Json<K>, JsonRejection>) -> AppResult<K> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::InvalidData {
            entity: K::NAME.to_string(),
            reason: rejection.body_text(),
        })
}

async fn list<K: ResourceKind>(
    State(service): State<ResourceService<K>>,
) -> AppResult<Json<Vec<Resource<K>>>> {
    Ok(Json(service.list().await?))
}

async fn create<K: ResourceKind>(
    State(service): State<ResourceService<K>>,
    payload: Result<Json<K>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Resource<K>>)> {
    let resource = service.create(json_body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(resource)))
}

async fn read<K: ResourceKind>(
    State(service): State<ResourceService<K>>,
    Path(id): Path<String>,
) -> AppResult<Json<Resource<K>>> {
    let id = service.parse_id(&id)?;
    Ok(Json(service.get(id).await?))
}

/// PUT replaces the whole document; the id is checked before the body.
async fn update<K: ResourceKind>(
    State(service): State<ResourceService<K>>,
    Path(id): Path<String>,
    payload: Result<Json<K>, JsonRejection>,
) -> AppResult<Json<Resource<K>>> {
    let id = service.parse_id(&id)?;
    let body = json_body(payload)?;
    Ok(Json(service.update(id, body).await?))
}

async fn delete<K: ResourceKind>(
    State(service): State<ResourceService<K>>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    let id = service.parse_id(&id)?;
    service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
