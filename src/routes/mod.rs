pub mod bovino_routes;
pub mod historial_routes;
