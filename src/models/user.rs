//! Modelo de User
//!
//! El struct User incluye el hash de la contraseña y por eso NO deriva
//! Serialize: las respuestas usan siempre `dto::bovino_dto::UserResponse`,
//! que no tiene el campo.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// User (propietario/vendedor) - mapea exactamente a la tabla users
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub nombre: String,
    pub email: String,
    pub password_hash: String,
    pub telefono: Option<String>,
    pub created_at: DateTime<Utc>,
}
