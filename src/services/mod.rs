//! Services module
//!
//! Este módulo contiene la lógica de negocio que no pertenece a un
//! controller concreto, como el almacenamiento de imágenes subidas.

pub mod upload_service;

pub use upload_service::*;
