use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use uuid::Uuid;

use crate::controllers::historial_controller::HistorialController;
use crate::dto::historial_dto::{CreateHistorialRequest, HistorialResponse, UpdateHistorialRequest};
use crate::models::historial_reproduccion::HistorialReproduccion;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_historial_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_historial))
        .route("/", get(list_historiales))
        .route("/:id", get(get_historial))
        .route("/:id", put(update_historial))
        .route("/:id", delete(delete_historial))
}

async fn list_historiales(
    State(state): State<AppState>,
) -> Result<Json<Vec<HistorialResponse>>, AppError> {
    let controller = HistorialController::new(state.pool.clone());
    let response = controller.list().await?;
    Ok(Json(response))
}

async fn get_historial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<HistorialResponse>, AppError> {
    let controller = HistorialController::new(state.pool.clone());
    let response = controller.get_by_id(id).await?;
    Ok(Json(response))
}

async fn create_historial(
    State(state): State<AppState>,
    Json(request): Json<CreateHistorialRequest>,
) -> Result<(StatusCode, Json<HistorialReproduccion>), AppError> {
    let controller = HistorialController::new(state.pool.clone());
    let historial = controller.create(request).await?;
    Ok((StatusCode::CREATED, Json(historial)))
}

async fn update_historial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateHistorialRequest>,
) -> Result<Json<HistorialResponse>, AppError> {
    let controller = HistorialController::new(state.pool.clone());
    let response = controller.update(id, request).await?;
    Ok(Json(response))
}

async fn delete_historial(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    let controller = HistorialController::new(state.pool.clone());
    controller.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
