//! # Port Validation
//!
//! Converts caller supplied port values into a [`Port`]. Values are never clamped:
//! anything that is not an integer in `1..=65535` is an [`InvalidPort`] error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const PORT_RANGE_MESSAGE: &str = "Port must be between 1 and 65535";

/// A TCP port in the closed range `1..=65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Port(u16);

impl Port {
    pub fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Port> for u16 {
    fn from(port: Port) -> Self {
        port.0
    }
}

impl TryFrom<i64> for Port {
    type Error = InvalidPort;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match u16::try_from(value) {
            Ok(port) if port >= 1 => Ok(Port(port)),
            _ => Err(InvalidPort::new(PORT_RANGE_MESSAGE)),
        }
    }
}

impl FromStr for Port {
    type Err = InvalidPort;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse::<i64>()
            .map_err(|e| InvalidPort::new(format!("invalid literal '{s}': {e}")))?;
        Port::try_from(value)
    }
}

/// Raised for any port value that is not an integer in `1..=65535`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid port number: {reason}")]
pub struct InvalidPort {
    reason: String,
}

impl InvalidPort {
    fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// The underlying conversion or range failure.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A port value as it arrives in a JSON request body.
///
/// Unknown shapes (booleans, arrays, `null`...) are kept in [`PortInput::Other`] so that
/// they surface as an [`InvalidPort`] instead of a malformed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortInput {
    Integer(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl Default for PortInput {
    fn default() -> Self {
        PortInput::Integer(80)
    }
}

impl From<i64> for PortInput {
    fn from(value: i64) -> Self {
        PortInput::Integer(value)
    }
}

impl From<f64> for PortInput {
    fn from(value: f64) -> Self {
        PortInput::Float(value)
    }
}

impl From<&str> for PortInput {
    fn from(value: &str) -> Self {
        PortInput::Text(value.to_string())
    }
}

impl From<String> for PortInput {
    fn from(value: String) -> Self {
        PortInput::Text(value)
    }
}

/// Validates and converts a port given as a string or a number.
///
/// # Examples
/// ```
/// use hostwatch_common::network::port::validate_port;
///
/// assert_eq!(validate_port("8080").unwrap().get(), 8080);
/// assert!(validate_port(0_i64).is_err());
/// ```
pub fn validate_port(input: impl Into<PortInput>) -> Result<Port, InvalidPort> {
    match input.into() {
        PortInput::Integer(value) => Port::try_from(value),
        PortInput::Float(value) => port_from_float(value),
        PortInput::Text(text) => text.parse::<Port>(),
        PortInput::Other(value) => Err(InvalidPort::new(format!(
            "expected a number or a numeric string, found {value}"
        ))),
    }
}

fn port_from_float(value: f64) -> Result<Port, InvalidPort> {
    if !value.is_finite() || value.fract() != 0.0 {
        return Err(InvalidPort::new(format!("{value} is not a whole number")));
    }
    if value < i64::MIN as f64 || value > i64::MAX as f64 {
        return Err(InvalidPort::new(PORT_RANGE_MESSAGE));
    }
    Port::try_from(value as i64)
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
