pub mod bovino_controller;
pub mod historial_controller;
