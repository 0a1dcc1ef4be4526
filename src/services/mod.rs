//! Services module
//!
//! Este módulo contiene la lógica de negocio de la flota. Los servicios orquestan
//! entidades y repositorios, e invalidan el cache cuando cambian los listados.

pub mod driver_service;
pub mod maintenance_service;
pub mod trip_service;
pub mod vehicle_service;

pub use driver_service::DriverService;
pub use maintenance_service::MaintenanceService;
pub use trip_service::TripService;
pub use vehicle_service::VehicleService;
