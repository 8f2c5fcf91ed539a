//! Bridge lifecycle and operator input loop
//!
//! Owns the concurrency contract: one reader thread continuously decodes and
//! dispatches inbound messages; the main thread blocks on operator input and
//! emits outbound commands. They share the transport, the status snapshot
//! and the dashboard behind short-lived mutexes; only the main thread
//! writes to the transport, only the reader mutates the snapshot.
//!
//! Lifecycle: Disconnected -> Connected -> Closing -> Disconnected. A failed
//! transport open aborts startup with no retry. Closing stops the reader via
//! the shared running flag, waits a short grace period for an in-flight read
//! to finish, then drops the transport.

use crate::commands::{self, Console, Outcome, TimedSend};
use crate::config::BridgeConfig;
use crate::dashboard::Dashboard;
use crate::error::{Error, Result};
use crate::protocol::encode;
use crate::reader::reader_loop;
use crate::status::StatusSnapshot;
use crate::transport::{SerialTransport, Transport};
use chrono::Local;
use parking_lot::Mutex;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::{self, BufRead, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// Grace period for an in-flight read when closing
const CLOSE_GRACE: Duration = Duration::from_millis(200);

/// Slice length for cancellable pauses between preset steps
const PAUSE_SLICE: Duration = Duration::from_millis(20);

/// The connected bridge
pub struct Bridge {
    transport: Arc<Mutex<Box<dyn Transport>>>,
    snapshot: Arc<Mutex<StatusSnapshot>>,
    dashboard: Arc<Mutex<Dashboard>>,
    running: Arc<AtomicBool>,
}

impl Bridge {
    /// Open the serial transport and enter the Connected state
    ///
    /// A connection failure aborts startup; it is not retried.
    pub fn connect(config: &BridgeConfig) -> Result<Self> {
        let transport = SerialTransport::open(&config.transport.port, config.transport.baud)?;
        println!(
            "[CONNECTED] {} @ {} baud\n",
            config.transport.port, config.transport.baud
        );
        Ok(Self::with_transport(Box::new(transport)))
    }

    /// Build a bridge over an already-open transport
    pub fn with_transport(transport: Box<dyn Transport>) -> Self {
        Self {
            transport: Arc::new(Mutex::new(transport)),
            snapshot: Arc::new(Mutex::new(StatusSnapshot::default())),
            dashboard: Arc::new(Mutex::new(Dashboard::new())),
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Run until the operator exits or interrupts
    pub fn run(&mut self) -> Result<()> {
        self.full_redraw()?;

        println!("AmpBridge Monitor + Commander");
        println!("Type 'help' for available commands");
        println!();

        let handle = {
            let transport = Arc::clone(&self.transport);
            let running = Arc::clone(&self.running);
            let snapshot = Arc::clone(&self.snapshot);
            let dashboard = Arc::clone(&self.dashboard);
            thread::Builder::new()
                .name("reader".to_string())
                .spawn(move || reader_loop(transport, running, snapshot, dashboard))
                .map_err(Error::Io)?
        };

        // Interrupts during pauses and prompts unwind to Closing
        let r = Arc::clone(&self.running);
        ctrlc::set_handler(move || {
            r.store(false, Ordering::Relaxed);
        })
        .map_err(|e| Error::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

        let result = self.input_loop();

        // Closing: stop the reader, give an in-flight read time to finish
        self.running.store(false, Ordering::Relaxed);
        thread::sleep(CLOSE_GRACE);
        let _ = handle.join();
        println!("\n[DISCONNECTED]");

        result
    }

    fn input_loop(&mut self) -> Result<()> {
        let mut editor = DefaultEditor::new()?;
        let mut console = StdConsole;

        loop {
            if !self.running.load(Ordering::Relaxed) {
                return Ok(());
            }

            match editor.readline("> ") {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = editor.add_history_entry(&line);

                    match commands::interpret(&line, &mut console) {
                        Outcome::Send(plan) => self.execute_plan(&plan, &mut console),
                        Outcome::Redraw => self.full_redraw()?,
                        Outcome::Exit => return Ok(()),
                        Outcome::Handled => {}
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    return Ok(());
                }
                // Unrecoverable input stream termination
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Send each step of a plan in order, honoring the pauses
    ///
    /// A write failure drops that command and is reported; the plan (and the
    /// bridge) keeps going. Pauses poll the running flag so an interrupt
    /// cancels a preset mid-sequence.
    fn execute_plan(&self, plan: &[TimedSend], console: &mut dyn Console) {
        for step in plan {
            if !self.running.load(Ordering::Relaxed) {
                return;
            }
            if let Some(ref announce) = step.announce {
                console.info(announce);
            }

            let wire = encode(&step.command);
            let write_result = self.transport.lock().write_all(wire.as_bytes());
            match write_result {
                Ok(()) => {
                    let ts = Local::now().format("%H:%M:%S%.3f");
                    println!("[{}] TX -> {}", ts, wire.trim_end());
                }
                Err(e) => {
                    console.error(&format!("Send error: {}", e));
                }
            }

            cancellable_sleep(step.pause_after, &self.running);
        }
    }

    fn full_redraw(&self) -> Result<()> {
        let snap = self.snapshot.lock().clone();
        let mut out = io::stdout();
        self.dashboard.lock().full_redraw(&mut out, &snap)
    }
}

/// Sleep in short slices, returning early when the running flag clears
fn cancellable_sleep(duration: Duration, running: &Arc<AtomicBool>) {
    let mut remaining = duration;
    while !remaining.is_zero() {
        if !running.load(Ordering::Relaxed) {
            return;
        }
        let slice = remaining.min(PAUSE_SLICE);
        thread::sleep(slice);
        remaining -= slice;
    }
}

/// Console backed by stdout/stdin
struct StdConsole;

impl Console for StdConsole {
    fn print(&mut self, msg: &str) {
        println!("{}", msg);
    }

    fn info(&mut self, msg: &str) {
        println!("[INFO] {}", msg);
    }

    fn error(&mut self, msg: &str) {
        println!("[ERROR] {}", msg);
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        print!("[WARNING] {}", prompt);
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => answer.trim().eq_ignore_ascii_case("yes"),
            Err(_) => false,
        }
    }
}
