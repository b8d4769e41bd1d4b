use sysinfo::{System, SystemExt};
use thiserror::Error;

#[derive(Debug, Error, Clone)]
#[error("{message}")]
pub struct LoadError {
    message: String,
}

impl LoadError {
    #[cfg(test)]
    pub(crate) fn mock_readings_exhausted() -> Self {
        Self {
            message: "mock load readings exhausted".to_string(),
        }
    }
}

pub trait LoadProvider {
    async fn load_one_minute(&mut self) -> Result<f64, LoadError>;
}

pub struct SysinfoLoadProvider {
    system: System,
}

impl SysinfoLoadProvider {
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl LoadProvider for SysinfoLoadProvider {
    async fn load_one_minute(&mut self) -> Result<f64, LoadError> {
        Ok(self.system.load_average().one)
    }
}

#[cfg(test)]
pub(crate) struct MockLoadProvider {
    readings: Vec<f64>,
}

#[cfg(test)]
impl MockLoadProvider {
    pub(crate) fn new(readings: Vec<f64>) -> Self {
        Self { readings }
    }
}

#[cfg(test)]
impl LoadProvider for MockLoadProvider {
    async fn load_one_minute(&mut self) -> Result<f64, LoadError> {
        if self.readings.is_empty() {
            return Err(LoadError::mock_readings_exhausted());
        }

        Ok(self.readings.remove(0))
    }
}
