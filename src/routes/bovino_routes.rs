use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::bovino_controller::BovinoController;
use crate::dto::bovino_dto::{BovinoFilters, BovinoResponse};
use crate::models::bovino::Bovino;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_bovino_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_bovino))
        .route("/", get(list_bovinos))
        .route("/:id", get(get_bovino))
        .route("/:id", put(update_bovino))
        .route("/:id", delete(delete_bovino))
        // El límite por defecto de axum (2 MB) queda por debajo de la
        // imagen máxima aceptada; el límite fino lo aplica UploadStore.
        .layer(DefaultBodyLimit::max(8 * 1024 * 1024))
}

async fn list_bovinos(
    State(state): State<AppState>,
    Query(filters): Query<BovinoFilters>,
) -> Result<Json<Vec<BovinoResponse>>, AppError> {
    let controller = BovinoController::new(state.pool.clone(), state.uploads.clone());
    let response = controller.list(filters).await?;
    Ok(Json(response))
}

async fn get_bovino(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BovinoResponse>, AppError> {
    let controller = BovinoController::new(state.pool.clone(), state.uploads.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_bovino(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Bovino>), AppError> {
    let controller = BovinoController::new(state.pool.clone(), state.uploads.clone());
    let bovino = controller.create(multipart).await?;
    Ok((StatusCode::CREATED, Json(bovino)))
}

async fn update_bovino(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<BovinoResponse>, AppError> {
    let controller = BovinoController::new(state.pool.clone(), state.uploads.clone());
    let response = controller.update(id, multipart).await?;
    Ok(Json(response))
}

async fn delete_bovino(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = BovinoController::new(state.pool.clone(), state.uploads.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
