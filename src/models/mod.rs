//! Modelos del dominio
//!
//! Entidades de la flota con sus invariantes. Las mutaciones sólo ocurren
//! a través de métodos con nombre que devuelven `DomainResult`.

pub mod driver;
pub mod errors;
pub mod maintenance_record;
pub mod trip;
pub mod vehicle;

pub use driver::Driver;
pub use errors::{DomainError, DomainResult};
pub use maintenance_record::MaintenanceRecord;
pub use trip::Trip;
pub use vehicle::{Vehicle, VehicleStatus};
