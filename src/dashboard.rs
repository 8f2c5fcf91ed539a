//! In-place terminal status dashboard
//!
//! A fixed-height header region at the top of the terminal is repainted from
//! the [`StatusSnapshot`]; everything below it scrolls normally (logs, acks,
//! raw device output). Two paint paths:
//!
//! - Full redraw: clears the whole screen and paints from row 1. Used on
//!   connect and on the operator's `clear` action, when the prior screen
//!   contents are being discarded anyway.
//! - Incremental repaint: saves the cursor, rewrites each header line in
//!   place (clearing first, so shorter lines erase longer predecessors),
//!   then restores the cursor so scrolling output is undisturbed.
//!
//! Incremental repaints are rate-limited; realtime telemetry can arrive far
//! faster than a terminal is worth repainting.

use crate::error::Result;
use crate::status::StatusSnapshot;
use crossterm::style::Stylize;
use crossterm::{cursor, queue, style::Print, terminal};
use std::io::Write;
use std::time::{Duration, Instant};

/// Header region height in rows
pub const HEADER_HEIGHT: u16 = 8;

/// Minimum interval between incremental repaints
pub const REPAINT_INTERVAL: Duration = Duration::from_millis(500);

/// Width of the VU bar in glyphs
const VU_BAR_WIDTH: usize = 60;

/// Full VU scale
const VU_MAX: u16 = 255;

/// Paints the header region; owns only the repaint clock
pub struct Dashboard {
    /// None until the first incremental repaint, which is therefore never
    /// rate-limited away.
    last_paint: Option<Instant>,
}

impl Dashboard {
    pub fn new() -> Self {
        Self { last_paint: None }
    }

    /// Clear the whole screen and paint the header from row 1
    ///
    /// No cursor save/restore: the prior screen contents are gone anyway.
    /// Leaves the cursor just below the header for scrolling output.
    pub fn full_redraw<W: Write>(&mut self, out: &mut W, snapshot: &StatusSnapshot) -> Result<()> {
        queue!(
            out,
            terminal::Clear(terminal::ClearType::All),
            cursor::MoveTo(0, 0)
        )?;
        for line in header_lines(snapshot) {
            queue!(out, Print(line), Print("\r\n"))?;
        }
        out.flush()?;
        Ok(())
    }

    /// Rewrite the header in place, rate-limited
    ///
    /// Returns true when a repaint actually happened; false when it was
    /// skipped because fewer than [`REPAINT_INTERVAL`] elapsed since the
    /// previous one.
    pub fn repaint<W: Write>(&mut self, out: &mut W, snapshot: &StatusSnapshot) -> Result<bool> {
        if let Some(last) = self.last_paint {
            if last.elapsed() < REPAINT_INTERVAL {
                return Ok(false);
            }
        }
        self.last_paint = Some(Instant::now());

        queue!(out, cursor::SavePosition, cursor::MoveTo(0, 0))?;
        for line in header_lines(snapshot) {
            queue!(
                out,
                terminal::Clear(terminal::ClearType::CurrentLine),
                Print(line),
                cursor::MoveToNextLine(1)
            )?;
        }
        queue!(out, cursor::RestorePosition)?;
        out.flush()?;
        Ok(true)
    }
}

impl Default for Dashboard {
    fn default() -> Self {
        Self::new()
    }
}

/// Render the eight header lines from the snapshot
///
/// Reads only; never mutates the snapshot.
fn header_lines(s: &StatusSnapshot) -> [String; HEADER_HEIGHT as usize] {
    let power = if s.power_on {
        format!("{}", " ON ".black().on_green())
    } else {
        format!("{}", " OFF ".black().on_dark_grey())
    };

    let status = if s.errors.is_empty() {
        format!("{}", "OK".green())
    } else {
        format!("{}", s.errors.join(", ").red().bold())
    };

    [
        format!(
            "{}",
            format!(" AMP BRIDGE   fw {:<10} {}", s.fw_version, s.device_time).bold()
        ),
        format!(
            " Power  : {}   Input : {:<5}  Speaker : {}",
            power, s.input, s.speaker
        ),
        format!(
            " SMPS   : {:>6.2} V   12V rail : {:>5.2} V   Temp : {:>5.1} C",
            s.smps_v, s.v12_v, s.temp_c
        ),
        format!(" Fan    : {:<6}  duty {:>4}", s.fan_mode, s.fan_duty),
        format!(" VU     : [{}]", vu_bar(s.vu)),
        format!(" Status : {}", status),
        format!(" {}", "─".repeat(66)),
        String::new(),
    ]
}

/// Fixed-width two-glyph VU bar, filled proportionally to level/255
fn vu_bar(vu: u16) -> String {
    let level = vu.min(VU_MAX) as usize;
    let filled = level * VU_BAR_WIDTH / VU_MAX as usize;
    let mut bar = "█".repeat(filled);
    bar.push_str(&"░".repeat(VU_BAR_WIDTH - filled));
    bar
}
