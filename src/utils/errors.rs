//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del sistema
//! y su conversión a respuestas HTTP `application/problem+json` (RFC 7807).

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::{header, HeaderValue, StatusCode};
use serde::Serialize;
use thiserror::Error;

use crate::models::errors::DomainError;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Violación de unicidad (matrícula, número de licencia)
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl From<DomainError> for AppError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::InvalidOperation(msg) => AppError::InvalidOperation(msg),
            DomainError::InvalidArgument(msg) => AppError::InvalidArgument(msg),
        }
    }
}

/// Cuerpo de error RFC 7807
#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<serde_json::Value>,
}

impl ProblemDetails {
    fn new(status: StatusCode, title: &str, detail: String) -> Self {
        Self {
            problem_type: problem_type_for(status).to_string(),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
            errors: None,
        }
    }
}

fn problem_type_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::NOT_FOUND => "https://tools.ietf.org/html/rfc9110#section-15.5.5",
        StatusCode::CONFLICT => "https://tools.ietf.org/html/rfc9110#section-15.5.10",
        StatusCode::BAD_REQUEST => "https://tools.ietf.org/html/rfc9110#section-15.5.1",
        _ => "https://tools.ietf.org/html/rfc9110#section-15.6.1",
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InvalidOperation(_)
            | AppError::InvalidArgument(_)
            | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn to_problem(&self) -> ProblemDetails {
        let status = self.status_code();
        match self {
            AppError::NotFound(msg) => {
                tracing::warn!("🔍 Recurso no encontrado: {}", msg);
                ProblemDetails::new(status, "Resource Not Found", msg.clone())
            }

            AppError::Conflict(msg) => {
                tracing::warn!("⚠️ Conflicto: {}", msg);
                ProblemDetails::new(status, "Duplicate Resource", msg.clone())
            }

            AppError::InvalidOperation(msg) => {
                tracing::warn!("⛔ Operación inválida: {}", msg);
                ProblemDetails::new(status, "Invalid Operation", msg.clone())
            }

            AppError::InvalidArgument(msg) => {
                tracing::warn!("⛔ Argumento inválido: {}", msg);
                ProblemDetails::new(status, "Bad Request", msg.clone())
            }

            AppError::Validation(e) => {
                tracing::warn!("⛔ Error de validación: {}", e);
                let mut problem = ProblemDetails::new(
                    status,
                    "Bad Request",
                    "The provided data is invalid".to_string(),
                );
                problem.errors = serde_json::to_value(e).ok();
                problem
            }

            AppError::Database(e) => {
                tracing::error!("❌ Error de base de datos: {}", e);
                internal_problem()
            }
        }
    }
}

fn internal_problem() -> ProblemDetails {
    ProblemDetails::new(
        StatusCode::INTERNAL_SERVER_ERROR,
        "Internal Server Error",
        "An internal error occurred. Please try again later.".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let mut response = (status, Json(self.to_problem())).into_response();
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/problem+json"),
        );
        response
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(entity: &str, id: impl std::fmt::Display) -> AppError {
    AppError::NotFound(format!("{} with id '{}' was not found", entity, id))
}

/// Función helper para crear errores de conflicto
pub fn conflict_error(entity: &str, field: &str, value: &str) -> AppError {
    AppError::Conflict(format!("{} with {} '{}' already exists", entity, field, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(not_found_error("Vehicle", "x").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            conflict_error("Vehicle", "Plate", "ABC").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::from(DomainError::InvalidOperation("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::from(DomainError::InvalidArgument("x".into())).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::Database(sqlx::Error::PoolTimedOut).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_messages() {
        assert_eq!(
            conflict_error("Vehicle", "Plate", "ABC1234").to_string(),
            "Conflict: Vehicle with Plate 'ABC1234' already exists"
        );
        assert_eq!(
            not_found_error("Driver", "42").to_string(),
            "Not found: Driver with id '42' was not found"
        );
    }

    #[test]
    fn test_internal_errors_hide_details() {
        let problem =
            AppError::Database(sqlx::Error::Protocol("secret connection string".into()))
                .to_problem();
        assert_eq!(problem.status, 500);
        assert!(!problem.detail.contains("secret"));
    }
}
