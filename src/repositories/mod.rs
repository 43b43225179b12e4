pub mod bovino_repository;
pub mod historial_repository;
