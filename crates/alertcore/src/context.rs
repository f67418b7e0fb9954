use crate::NodeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Known execution context slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKey {
    Temperature,
    Location,
}

impl ContextKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextKey::Temperature => "weather.temperature",
            ContextKey::Location => "weather.location",
        }
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coordinates resolved for the payload city
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Per-traversal store shared by handlers.
///
/// Each key has a fixed type, so a reader can only observe "missing" or a
/// value of the right type. Writes overwrite.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ExecutionContext {
    temperature: Option<f64>,
    location: Option<Coordinates>,
}

impl ExecutionContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_temperature(&mut self, celsius: f64) {
        self.temperature = Some(celsius);
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    /// Temperature written by an upstream weather lookup
    pub fn require_temperature(&self) -> Result<f64, NodeError> {
        self.temperature
            .ok_or(NodeError::MissingContext(ContextKey::Temperature))
    }

    pub fn set_location(&mut self, coordinates: Coordinates) {
        self.location = Some(coordinates);
    }

    pub fn require_location(&self) -> Result<Coordinates, NodeError> {
        self.location.ok_or(NodeError::MissingContext(ContextKey::Location))
    }

    pub fn contains(&self, key: ContextKey) -> bool {
        match key {
            ContextKey::Temperature => self.temperature.is_some(),
            ContextKey::Location => self.location.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_temperature_names_the_key() {
        let ctx = ExecutionContext::new();
        let err = ctx.require_temperature().unwrap_err();
        assert_eq!(err, NodeError::MissingContext(ContextKey::Temperature));
        assert!(err.to_string().contains("weather.temperature"));
    }

    #[test]
    fn last_write_wins() {
        let mut ctx = ExecutionContext::new();
        ctx.set_temperature(10.0);
        ctx.set_temperature(12.5);
        assert_eq!(ctx.require_temperature().unwrap(), 12.5);
        assert!(ctx.contains(ContextKey::Temperature));
        assert!(!ctx.contains(ContextKey::Location));
    }
}
