use serde::{Deserialize, Serialize};
use chrono::NaiveDate;
use uuid::Uuid;

use crate::models::bovino::Bovino;
use crate::models::historial_reproduccion::HistorialReproduccion;

/// Request para registrar un evento reproductivo.
///
/// Los campos requeridos se comprueban en el controller para poder
/// responder con el mensaje de la API original.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHistorialRequest {
    pub bovino_id: Option<Uuid>,
    pub fecha_evento: Option<NaiveDate>,
    pub tipo_evento: Option<String>,
    pub detalles: Option<String>,
}

/// Request para actualizar un evento reproductivo
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHistorialRequest {
    pub bovino_id: Option<Uuid>,
    pub fecha_evento: Option<NaiveDate>,
    pub tipo_evento: Option<String>,
    pub detalles: Option<String>,
}

/// Response de historial; `bovino` solo viene hidratado en list/get
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorialResponse {
    pub id: Uuid,
    pub bovino_id: Uuid,
    pub fecha_evento: NaiveDate,
    pub tipo_evento: String,
    pub detalles: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bovino: Option<Bovino>,
}

impl HistorialResponse {
    pub fn new(historial: HistorialReproduccion, bovino: Option<Bovino>) -> Self {
        Self {
            id: historial.id,
            bovino_id: historial.bovino_id,
            fecha_evento: historial.fecha_evento,
            tipo_evento: historial.tipo_evento,
            detalles: historial.detalles,
            created_at: historial.created_at,
            bovino,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_historial_response_omits_bovino_when_absent() {
        let historial = HistorialReproduccion {
            id: Uuid::new_v4(),
            bovino_id: Uuid::new_v4(),
            fecha_evento: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            tipo_evento: "inseminación".to_string(),
            detalles: None,
            created_at: Utc::now(),
        };
        let json: serde_json::Value =
            serde_json::to_value(HistorialResponse::new(historial, None)).unwrap();
        assert!(json.get("bovino").is_none());
        assert!(json.get("fechaEvento").is_some());
        assert!(json.get("tipoEvento").is_some());
    }

    #[test]
    fn test_create_request_accepts_partial_bodies() {
        let request: CreateHistorialRequest = serde_json::from_value(serde_json::json!({
            "bovinoId": "550e8400-e29b-41d4-a716-446655440000",
            "tipoEvento": "parto"
        }))
        .unwrap();
        assert!(request.bovino_id.is_some());
        assert!(request.fecha_evento.is_none());
        assert_eq!(request.tipo_evento.as_deref(), Some("parto"));
    }
}
