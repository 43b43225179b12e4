//! Modelo de Bovino
//!
//! Este módulo contiene el struct Bovino, la entidad principal del
//! marketplace. Mapea exactamente a la tabla bovinos.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Bovino principal - mapea exactamente a la tabla bovinos
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Bovino {
    pub id: Uuid,
    pub edad: i32,
    pub peso: i32,
    pub precio: Decimal,
    pub ubicacion: Option<String>,
    pub imagen_url: Option<String>,
    pub raza_id: Option<Uuid>,
    pub vendedor_id: Uuid,
    pub created_at: DateTime<Utc>,
}
