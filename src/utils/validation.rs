//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! y conversión de tipos.

use rust_decimal::Decimal;
use uuid::Uuid;
use validator::ValidationError;

/// Validar y convertir string a UUID
pub fn validate_uuid(value: &str) -> Result<Uuid, ValidationError> {
    Uuid::parse_str(value).map_err(|_| {
        let mut error = ValidationError::new("uuid");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a entero
pub fn validate_int(value: &str) -> Result<i32, ValidationError> {
    value.trim().parse::<i32>().map_err(|_| {
        let mut error = ValidationError::new("integer");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar y convertir string a decimal
pub fn validate_decimal(value: &str) -> Result<Decimal, ValidationError> {
    value.trim().parse::<Decimal>().map_err(|_| {
        let mut error = ValidationError::new("decimal");
        error.add_param("value".into(), &value.to_string());
        error
    })
}

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_uuid() {
        let valid_uuid = "550e8400-e29b-41d4-a716-446655440000";
        assert!(validate_uuid(valid_uuid).is_ok());

        let invalid_uuid = "invalid-uuid";
        assert!(validate_uuid(invalid_uuid).is_err());
    }

    #[test]
    fn test_validate_int() {
        assert_eq!(validate_int("450").unwrap(), 450);
        assert_eq!(validate_int(" 12 ").unwrap(), 12);
        assert!(validate_int("450.5").is_err());
        assert!(validate_int("abc").is_err());
    }

    #[test]
    fn test_validate_decimal() {
        assert_eq!(validate_decimal("1500.50").unwrap().to_string(), "1500.50");
        assert!(validate_decimal("precio").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("monta natural").is_ok());
        assert!(validate_not_empty("").is_err());
        assert!(validate_not_empty("   ").is_err());
    }
}
