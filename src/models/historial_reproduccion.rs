//! Modelo de HistorialReproduccion

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Evento reproductivo de un bovino - mapea exactamente a la tabla
/// historiales_reproduccion
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HistorialReproduccion {
    pub id: Uuid,
    pub bovino_id: Uuid,
    pub fecha_evento: NaiveDate,
    pub tipo_evento: String,
    pub detalles: Option<String>,
    pub created_at: DateTime<Utc>,
}
