//! Tareas programadas

pub mod maintenance_check_job;

pub use maintenance_check_job::MaintenanceCheckJob;
