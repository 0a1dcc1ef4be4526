//! Errores del dominio
//!
//! Las entidades validan sus propias invariantes y devuelven estos errores
//! sin tocar ningún campo cuando una transición no es válida.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Transición de estado no permitida (guard clause)
    #[error("{0}")]
    InvalidOperation(String),

    /// Argumento fuera de rango o vacío
    #[error("{0}")]
    InvalidArgument(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

pub(crate) fn invalid_argument(message: impl Into<String>) -> DomainError {
    DomainError::InvalidArgument(message.into())
}

pub(crate) fn invalid_operation(message: impl Into<String>) -> DomainError {
    DomainError::InvalidOperation(message.into())
}

pub(crate) fn require_not_blank(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(invalid_argument(format!("{} cannot be empty", field)));
    }
    Ok(())
}
