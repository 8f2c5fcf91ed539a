//! Reader thread for the bridge
//!
//! Continuously polls the transport for inbound bytes, assembles lines,
//! decodes them and dispatches: telemetry folds into the shared snapshot and
//! repaints the dashboard; everything else prints to the scrolling region.
//! The thread polls the shared running flag each iteration and is never
//! force-terminated.

use crate::dashboard::Dashboard;
use crate::protocol::{decode, LineScanner, ProtocolMessage};
use crate::status::StatusSnapshot;
use crate::transport::Transport;
use chrono::Local;
use parking_lot::Mutex;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Idle sleep when no inbound bytes are pending
const IDLE_POLL: Duration = Duration::from_millis(10);

/// Reader loop - polls the transport and dispatches inbound messages
///
/// A transport read failure is reported once and ends the loop; the bridge
/// keeps running in a degraded state (commands still go out, no further
/// inbound updates arrive).
pub fn reader_loop(
    transport: Arc<Mutex<Box<dyn Transport>>>,
    running: Arc<AtomicBool>,
    snapshot: Arc<Mutex<StatusSnapshot>>,
    dashboard: Arc<Mutex<Dashboard>>,
) {
    let mut scanner = LineScanner::new();
    let mut buf = [0u8; 512];

    while running.load(Ordering::Relaxed) {
        let read_result = {
            let mut port = transport.lock();
            match port.bytes_available() {
                Ok(0) => Ok(0),
                Ok(_) => port.read(&mut buf),
                Err(e) => Err(e),
            }
        };

        match read_result {
            Ok(0) => {
                thread::sleep(IDLE_POLL);
            }
            Ok(n) => {
                for line in scanner.push(&buf[..n]) {
                    dispatch(&line, &snapshot, &dashboard);
                }
            }
            Err(e) => {
                log::error!("Read error: {}", e);
                println!("[WARNING] Read error: {}", e);
                break;
            }
        }
    }

    log::debug!("Reader thread exiting");
}

/// Decode one line and react to it
fn dispatch(
    line: &str,
    snapshot: &Arc<Mutex<StatusSnapshot>>,
    dashboard: &Arc<Mutex<Dashboard>>,
) {
    let message = decode(line);

    if let ProtocolMessage::Telemetry(_) = message {
        let changed = snapshot.lock().apply(&message);
        if changed {
            let snap = snapshot.lock().clone();
            let mut out = io::stdout();
            if let Err(e) = dashboard.lock().repaint(&mut out, &snap) {
                log::warn!("Dashboard repaint failed: {}", e);
            }
        }
        return;
    }

    println!("{}", render_line(&message, &timestamp()));
}

fn timestamp() -> String {
    Local::now().format("%H:%M:%S%.3f").to_string()
}

/// Format one non-telemetry message for the scrolling region
fn render_line(message: &ProtocolMessage, ts: &str) -> String {
    match message {
        ProtocolMessage::Log(log) => {
            let lvl = log.lvl.to_uppercase();
            if let Some(offset) = log.offset_sec {
                format!("[{}] LOG [{}] {} (offset: {}s)", ts, lvl, log.msg, offset)
            } else if let Some(ref reason) = log.reason {
                format!("[{}] LOG [{}] {} - {}", ts, lvl, log.msg, reason)
            } else {
                format!("[{}] LOG [{}] {}", ts, lvl, log.msg)
            }
        }
        ProtocolMessage::Ack(ack) => {
            let changed = ack.changed.as_deref().unwrap_or("");
            if ack.ok {
                let value = ack
                    .value
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                format!("[{}] ACK [OK] {} = {}", ts, changed, value)
            } else {
                let error = ack.error.as_deref().unwrap_or("");
                format!("[{}] ACK [ERR] {}: {}", ts, changed, error)
            }
        }
        ProtocolMessage::Ota { evt } => format!("[{}] OTA {}", ts, evt),
        ProtocolMessage::Analyzer { evt } => format!("[{}] ANALYZER {}", ts, evt),
        ProtocolMessage::RawText(raw) => format!("[{}] RX <- {}", ts, raw),
        // Telemetry never reaches the scrolling region
        ProtocolMessage::Telemetry(_) => String::new(),
    }
}
