//! Last-known device status, folded from telemetry
//!
//! The snapshot is a display cache, not a source of truth — the device owns
//! all durable state. It is created with defaults when the bridge connects,
//! mutated in place on every telemetry message, and discarded on exit.

use crate::protocol::{FullReport, ProtocolMessage, RealtimeReport, TelemetryFrame};

/// Input source shown before any telemetry arrives
const DEFAULT_INPUT: &str = "aux";

/// Bridge-local view of the controller state
#[derive(Debug, Clone, PartialEq)]
pub struct StatusSnapshot {
    pub fw_version: String,
    pub device_time: String,
    pub power_on: bool,
    pub smps_v: f64,
    pub v12_v: f64,
    pub temp_c: f64,
    pub input: String,
    pub speaker: String,
    pub fan_mode: String,
    pub fan_duty: u16,
    /// VU level, 0-255
    pub vu: u16,
    pub errors: Vec<String>,
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self {
            fw_version: String::new(),
            device_time: String::new(),
            power_on: false,
            smps_v: 0.0,
            v12_v: 0.0,
            temp_c: 0.0,
            input: DEFAULT_INPUT.to_string(),
            speaker: String::new(),
            fan_mode: String::new(),
            fan_duty: 0,
            vu: 0,
            errors: Vec::new(),
        }
    }
}

impl StatusSnapshot {
    /// Fold one inbound message into the snapshot
    ///
    /// No-op unless the message is telemetry. Returns true when the snapshot
    /// changed, i.e. when a dashboard repaint is warranted.
    pub fn apply(&mut self, msg: &ProtocolMessage) -> bool {
        match msg {
            ProtocolMessage::Telemetry(TelemetryFrame::Full(report)) => {
                self.fold_full(report);
                true
            }
            ProtocolMessage::Telemetry(TelemetryFrame::Realtime(report)) => {
                self.fold_realtime(report);
                true
            }
            _ => false,
        }
    }

    /// Full snapshot: every field is overwritten, absent sub-fields fall
    /// back to their documented defaults.
    fn fold_full(&mut self, report: &FullReport) {
        self.fw_version = report.fw_ver.clone().unwrap_or_default();
        self.device_time = report.time.clone().unwrap_or_default();

        let states = report.states.clone().unwrap_or_default();
        self.power_on = states.on;

        let smps = report.smps.clone().unwrap_or_default();
        self.smps_v = smps.v.unwrap_or(0.0);
        self.v12_v = report.v12.unwrap_or(0.0);
        self.temp_c = report.heat_c.unwrap_or(0.0);

        let inputs = report.inputs.clone().unwrap_or_default();
        self.input = if inputs.bt { "bt" } else { DEFAULT_INPUT }.to_string();
        self.speaker = inputs.speaker.unwrap_or_default();

        let nvs = report.nvs.clone().unwrap_or_default();
        self.fan_mode = nvs.fan_mode_str.unwrap_or_default();
        self.fan_duty = nvs.fan_duty.unwrap_or(0);

        let analyzer = report.analyzer.clone().unwrap_or_default();
        self.vu = analyzer.vu.unwrap_or(0).min(255);

        self.errors = report.errors.clone().unwrap_or_default();
    }

    /// Realtime sample: only the fields the device samples fast are
    /// overwritten; everything else keeps its previous value.
    fn fold_realtime(&mut self, report: &RealtimeReport) {
        if let Some(vu) = report.vu {
            self.vu = vu.min(255);
        }
        if let Some(ref input) = report.input {
            self.input = input.clone();
        }
    }
}
