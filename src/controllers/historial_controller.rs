use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::historial_dto::{CreateHistorialRequest, HistorialResponse, UpdateHistorialRequest};
use crate::models::historial_reproduccion::HistorialReproduccion;
use crate::repositories::historial_repository::HistorialRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::validate_not_empty;

const HISTORIAL_NO_ENCONTRADO: &str = "Historial de reproducción no encontrado";

pub struct HistorialController {
    repository: HistorialRepository,
}

impl HistorialController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: HistorialRepository::new(pool),
        }
    }

    pub async fn list(&self) -> Result<Vec<HistorialResponse>, AppError> {
        let historiales = self.repository.find_all_con_bovino().await?;

        Ok(historiales
            .into_iter()
            .map(|(historial, bovino)| HistorialResponse::new(historial, bovino))
            .collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<HistorialResponse, AppError> {
        let (historial, bovino) = self
            .repository
            .find_by_id_con_bovino(id)
            .await?
            .ok_or_else(|| AppError::NotFound(HISTORIAL_NO_ENCONTRADO.to_string()))?;

        Ok(HistorialResponse::new(historial, bovino))
    }

    pub async fn create(
        &self,
        request: CreateHistorialRequest,
    ) -> Result<HistorialReproduccion, AppError> {
        let tipo_evento_valido = request
            .tipo_evento
            .as_deref()
            .map(|tipo| validate_not_empty(tipo).is_ok())
            .unwrap_or(false);

        let (Some(bovino_id), Some(fecha_evento), true) =
            (request.bovino_id, request.fecha_evento, tipo_evento_valido)
        else {
            return Err(AppError::BadRequest(
                "BovinoId, fecha del evento y tipo de evento son requeridos.".to_string(),
            ));
        };

        self.repository
            .create(
                bovino_id,
                fecha_evento,
                request.tipo_evento.unwrap_or_default(),
                request.detalles,
            )
            .await
            .map_err(AppError::into_bad_request)
    }

    /// La respuesta de update no incluye el bovino asociado, a diferencia
    /// de get/list.
    pub async fn update(
        &self,
        id: Uuid,
        request: UpdateHistorialRequest,
    ) -> Result<HistorialResponse, AppError> {
        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound("Historial de reproducción no encontrado o sin cambios".to_string())
            })?;

        let updated = self
            .repository
            .update(
                id,
                request.bovino_id.unwrap_or(current.bovino_id),
                request.fecha_evento.unwrap_or(current.fecha_evento),
                request.tipo_evento.unwrap_or(current.tipo_evento),
                request.detalles.or(current.detalles),
            )
            .await
            .map_err(AppError::into_bad_request)?
            .ok_or_else(|| {
                AppError::NotFound("Historial de reproducción no encontrado o sin cambios".to_string())
            })?;

        Ok(HistorialResponse::new(updated, None))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let eliminados = self.repository.delete(id).await?;
        if eliminados == 0 {
            return Err(AppError::NotFound(HISTORIAL_NO_ENCONTRADO.to_string()));
        }

        Ok(())
    }
}
