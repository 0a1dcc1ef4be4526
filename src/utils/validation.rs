//! Utilidades de validación
//!
//! Reglas compartidas por los DTOs de entrada (`#[validate(...)]`).

use chrono::{Datelike, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use validator::ValidationError;

use crate::models::vehicle::MIN_YEAR;

lazy_static! {
    /// Matrícula: letras, dígitos y guiones
    pub static ref PLATE_REGEX: Regex = Regex::new(r"^[A-Za-z0-9-]+$").unwrap();
    /// Teléfono: dígitos con separadores habituales
    pub static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9 ()-]+$").unwrap();
}

/// Validar que un string no esté vacío
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_blank");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Año de fabricación entre 1900 y el año próximo
pub fn validate_vehicle_year(year: i32) -> Result<(), ValidationError> {
    let max = Utc::now().year() + 1;
    if year < MIN_YEAR || year > max {
        let mut error = ValidationError::new("range");
        error.add_param("min".into(), &MIN_YEAR);
        error.add_param("max".into(), &max);
        error.add_param("actual".into(), &year);
        return Err(error);
    }
    Ok(())
}
