//! Modelos de características genéticas

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// Definición de una característica genética
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CaracteristicaGenetica {
    pub id: Uuid,
    pub nombre: String,
    pub descripcion: Option<String>,
}

/// Valor registrado de una característica para un bovino concreto
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ValorCaracteristica {
    pub id: Uuid,
    pub bovino_id: Uuid,
    pub caracteristica_id: Uuid,
    pub valor: Decimal,
}
