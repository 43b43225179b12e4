use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::bovino::Bovino;
use crate::models::caracteristica::CaracteristicaGenetica;
use crate::models::historial_reproduccion::HistorialReproduccion;
use crate::models::raza::Raza;
use crate::models::user::User;
use crate::services::upload_service::StoredImage;

/// Filtros opcionales del listado de bovinos.
///
/// Todos los filtros presentes se combinan con AND; un parámetro ausente no
/// impone restricción. No se valida min <= max: un rango invertido
/// simplemente no devuelve resultados.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BovinoFilters {
    pub raza_id: Option<Uuid>,
    pub peso_min: Option<i32>,
    pub peso_max: Option<i32>,
    pub precio_min: Option<Decimal>,
    pub precio_max: Option<Decimal>,
    pub ubicacion: Option<String>,
}

/// Campos del formulario multipart de creación/actualización de bovinos.
///
/// Los valores llegan como texto y se convierten en el controller. `imagen`
/// queda ya escrita en disco durante el parseo; `imagen_url` transporta el
/// campo de texto `imagenUrl`, cuya cadena vacía es la señal explícita de
/// quitar la imagen actual.
#[derive(Debug, Default)]
pub struct BovinoForm {
    pub edad: Option<String>,
    pub peso: Option<String>,
    pub precio: Option<String>,
    pub ubicacion: Option<String>,
    pub raza_id: Option<String>,
    pub vendedor_id: Option<String>,
    pub imagen_url: Option<String>,
    pub imagen: Option<StoredImage>,
}

/// Response de usuario (sin password)
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            nombre: user.nombre,
            email: user.email,
            telefono: user.telefono,
            created_at: user.created_at,
        }
    }
}

/// Valor de característica con su definición asociada
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValorCaracteristicaResponse {
    pub id: Uuid,
    pub valor: Decimal,
    pub caracteristica_asociada: CaracteristicaGenetica,
}

/// Bovino hidratado con sus asociaciones, tal como lo devuelven
/// list/get/update
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BovinoResponse {
    pub id: Uuid,
    pub edad: i32,
    pub peso: i32,
    pub precio: Decimal,
    pub ubicacion: Option<String>,
    pub imagen_url: Option<String>,
    pub raza_id: Option<Uuid>,
    pub vendedor_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub raza: Option<Raza>,
    pub propietario: Option<UserResponse>,
    pub valores_de_caracteristicas: Vec<ValorCaracteristicaResponse>,
    pub historial_reproductivo: Vec<HistorialReproduccion>,
}

impl BovinoResponse {
    pub fn new(
        bovino: Bovino,
        raza: Option<Raza>,
        propietario: Option<UserResponse>,
        valores_de_caracteristicas: Vec<ValorCaracteristicaResponse>,
        historial_reproductivo: Vec<HistorialReproduccion>,
    ) -> Self {
        Self {
            id: bovino.id,
            edad: bovino.edad,
            peso: bovino.peso,
            precio: bovino.precio,
            ubicacion: bovino.ubicacion,
            imagen_url: bovino.imagen_url,
            raza_id: bovino.raza_id,
            vendedor_id: bovino.vendedor_id,
            created_at: bovino.created_at,
            raza,
            propietario,
            valores_de_caracteristicas,
            historial_reproductivo,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: Uuid::new_v4(),
            nombre: "Ana Gómez".to_string(),
            email: "ana@example.com".to_string(),
            password_hash: "$2b$12$secreto".to_string(),
            telefono: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_user_response_never_carries_password() {
        let response = UserResponse::from(sample_user());
        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("secreto"));
    }

    #[test]
    fn test_bovino_response_uses_camel_case_wire_names() {
        let bovino = Bovino {
            id: Uuid::new_v4(),
            edad: 3,
            peso: 420,
            precio: Decimal::new(150000, 2),
            ubicacion: Some("Córdoba".to_string()),
            imagen_url: Some("/uploads/imagen-1700000000000.png".to_string()),
            raza_id: None,
            vendedor_id: Uuid::new_v4(),
            created_at: Utc::now(),
        };
        let response = BovinoResponse::new(
            bovino,
            None,
            Some(UserResponse::from(sample_user())),
            vec![],
            vec![],
        );
        let json: serde_json::Value = serde_json::to_value(&response).unwrap();
        assert!(json.get("imagenUrl").is_some());
        assert!(json.get("vendedorId").is_some());
        assert!(json.get("valoresDeCaracteristicas").is_some());
        assert!(json.get("historialReproductivo").is_some());
        assert!(json.get("imagen_url").is_none());
    }

    #[test]
    fn test_filters_deserialize_with_camel_case_keys() {
        let filters: BovinoFilters = serde_json::from_value(serde_json::json!({
            "razaId": "550e8400-e29b-41d4-a716-446655440000",
            "pesoMin": 200,
            "precioMax": "3500.00"
        }))
        .unwrap();
        assert!(filters.raza_id.is_some());
        assert_eq!(filters.peso_min, Some(200));
        assert_eq!(filters.precio_max.unwrap().to_string(), "3500.00");
        assert!(filters.peso_max.is_none());
    }
}
