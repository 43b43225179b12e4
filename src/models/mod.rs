//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL con las convenciones estándar.

pub mod bovino;
pub mod caracteristica;
pub mod historial_reproduccion;
pub mod raza;
pub mod user;
