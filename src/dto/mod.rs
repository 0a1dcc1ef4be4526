//! DTOs de la API
//!
//! Formatos JSON (camelCase) de entrada y salida. Las requests se validan con
//! `validator` antes de llegar a los servicios.

pub mod driver_dto;
pub mod maintenance_dto;
pub mod trip_dto;
pub mod vehicle_dto;

pub use driver_dto::*;
pub use maintenance_dto::*;
pub use trip_dto::*;
pub use vehicle_dto::*;
