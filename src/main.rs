//! AmpBridge - serial console bridge for the amplifier controller
//!
//! Usage: `ampbridge [port]`
//!
//! The single positional argument is the serial port; it overrides the port
//! from `ampbridge.toml` (or the platform default when no file exists). The
//! baud rate is fixed by the controller firmware.

use ampbridge::bridge::Bridge;
use ampbridge::{BridgeConfig, Result};
use std::env;

/// Serial port from the first positional argument, if any
fn parse_port() -> Option<String> {
    env::args().nth(1).filter(|arg| !arg.starts_with('-'))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = BridgeConfig::load_or_default()?;
    if let Some(port) = parse_port() {
        config.transport.port = port;
    }

    log::info!(
        "AmpBridge starting on {} @ {} baud",
        config.transport.port,
        config.transport.baud
    );

    let mut bridge = match Bridge::connect(&config) {
        Ok(bridge) => bridge,
        Err(e) => {
            // Open failure aborts startup; no retry
            eprintln!("[ERROR] Connection failed: {}", e);
            return Err(e);
        }
    };
    bridge.run()
}
