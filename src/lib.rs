//! Fleet Manager
//!
//! Backend de gestión de flota: vehículos, conductores, viajes y mantenimientos,
//! con alertas diarias de mantenimiento próximo.

pub mod cache;
pub mod config;
pub mod database;
pub mod dto;
pub mod jobs;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;

pub use routes::create_router;
pub use state::{AppState, Repositories};
