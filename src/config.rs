//! Configuration for the AmpBridge console
//!
//! Loads configuration from an optional TOML file with the minimal
//! parameters needed to reach the device.

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Default serial port on unix hosts
#[cfg(unix)]
pub const DEFAULT_PORT: &str = "/dev/ttyUSB0";

/// Default serial port on windows hosts
#[cfg(windows)]
pub const DEFAULT_PORT: &str = "COM3";

/// Fixed baud rate of the controller's console UART
pub const BAUD_RATE: u32 = 921_600;

/// Top-level bridge configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BridgeConfig {
    pub transport: TransportConfig,
}

/// Transport configuration (serial port)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TransportConfig {
    /// Serial port path (e.g., "/dev/ttyUSB0" or "COM3")
    pub port: String,
    /// Baud rate
    pub baud: u32,
}

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: BridgeConfig = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load `ampbridge.toml` from the working directory if present,
    /// falling back to defaults otherwise.
    pub fn load_or_default() -> Result<Self> {
        let path = Path::new("ampbridge.toml");
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            transport: TransportConfig {
                port: DEFAULT_PORT.to_string(),
                baud: BAUD_RATE,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BridgeConfig::default();
        assert_eq!(config.transport.port, DEFAULT_PORT);
        assert_eq!(config.transport.baud, 921_600);
    }

    #[test]
    fn test_toml_serialization() {
        let config = BridgeConfig::default();
        let toml_string = toml::to_string_pretty(&config).unwrap();

        assert!(toml_string.contains("[transport]"));
        assert!(toml_string.contains("baud = 921600"));
    }

    #[test]
    fn test_toml_deserialization() {
        let toml_content = r#"
[transport]
port = "/dev/ttyACM1"
baud = 115200
"#;

        let config: BridgeConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.transport.port, "/dev/ttyACM1");
        assert_eq!(config.transport.baud, 115200);
    }
}
