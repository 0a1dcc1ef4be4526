//! Modelo de Driver

use uuid::Uuid;

use super::errors::{require_not_blank, DomainResult};

pub const NAME_MAX_LEN: usize = 100;
pub const LICENSE_MAX_LEN: usize = 20;
pub const PHONE_MAX_LEN: usize = 15;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Driver {
    id: Uuid,
    name: String,
    license_number: String,
    phone: String,
    active: bool,
}

impl Driver {
    /// Los conductores nacen activos
    pub fn new(name: &str, license_number: &str, phone: &str) -> DomainResult<Self> {
        require_not_blank(name, "Name")?;
        require_not_blank(license_number, "License number")?;
        require_not_blank(phone, "Phone")?;

        Ok(Self {
            id: Uuid::new_v4(),
            name: name.trim().to_string(),
            license_number: license_number.trim().to_string(),
            phone: phone.trim().to_string(),
            active: true,
        })
    }

    pub fn restore(
        id: Uuid,
        name: String,
        license_number: String,
        phone: String,
        active: bool,
    ) -> Self {
        Self {
            id,
            name,
            license_number,
            phone,
            active,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn license_number(&self) -> &str {
        &self.license_number
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activate(&mut self) {
        self.active = true;
    }

    pub fn deactivate(&mut self) {
        self.active = false;
    }

    /// Disponible = activo y sin viaje abierto. El viaje abierto lo resuelve
    /// el repositorio con una consulta explícita, no recorriendo una colección.
    pub fn is_available(&self, has_active_trip: bool) -> bool {
        self.active && !has_active_trip
    }

    pub fn update_info(&mut self, name: &str, phone: &str) -> DomainResult<()> {
        require_not_blank(name, "Name")?;
        require_not_blank(phone, "Phone")?;
        self.name = name.trim().to_string();
        self.phone = phone.trim().to_string();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn driver() -> Driver {
        Driver::new("Ana Souza", "LIC-001", "11987654321").unwrap()
    }

    #[test]
    fn test_new_driver_is_active() {
        let driver = driver();
        assert!(driver.is_active());
        assert_eq!(driver.license_number(), "LIC-001");
    }

    #[test]
    fn test_new_driver_requires_fields() {
        assert!(Driver::new("", "LIC-001", "11987654321").is_err());
        assert!(Driver::new("Ana", "  ", "11987654321").is_err());
        assert!(Driver::new("Ana", "LIC-001", "").is_err());
    }

    #[test]
    fn test_availability_follows_active_flag_without_open_trips() {
        let mut driver = driver();
        assert!(driver.is_available(false));

        driver.deactivate();
        assert!(!driver.is_available(false));

        driver.activate();
        assert!(driver.is_available(false));
    }

    #[test]
    fn test_driver_with_open_trip_is_never_available() {
        let mut driver = driver();
        assert!(!driver.is_available(true));
        driver.deactivate();
        assert!(!driver.is_available(true));
    }

    #[test]
    fn test_update_info() {
        let mut driver = driver();
        driver.update_info("Ana Lima", "11900000000").unwrap();
        assert_eq!(driver.name(), "Ana Lima");
        assert_eq!(driver.phone(), "11900000000");
        assert_eq!(driver.license_number(), "LIC-001");

        assert!(driver.update_info("", "11900000000").is_err());
        assert_eq!(driver.name(), "Ana Lima");
    }
}
