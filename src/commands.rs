//! Operator command interpreter
//!
//! Maps one operator-typed line to zero or more outbound commands, or to a
//! bridge-level action (exit, redraw, help). Dispatch is a lookup table from
//! action token to handler; matching is case-insensitive on the action.
//!
//! Validation failures are reported through the [`Console`] and produce no
//! transport traffic. Multi-step presets come back as an ordered plan of
//! (command, pause) pairs the bridge executes synchronously, so the pauses
//! stay cancellable without losing the original blocking behavior.

use crate::help;
use crate::protocol::{
    AnalyzerOp, AnalyzerRequest, BuzzerTone, DeviceField, FanMode, OutboundCommand, Speaker,
};
use chrono::{Local, NaiveDateTime, Utc};
use std::time::Duration;

/// The device RTC stores WIB (UTC+7) wall-clock time; epoch syncs carry
/// this fixed offset. Not a general timezone converter.
const RTC_TZ_OFFSET_SECS: i64 = 7 * 3600;

/// Valid analyzer band counts
const ANALYZER_BANDS: [u16; 6] = [8, 16, 24, 32, 48, 64];

/// Default buzzer duty (half scale)
const BUZZ_DEFAULT_DUTY: u32 = 512;

/// Operator-facing output and confirmation prompts
///
/// The bridge wires this to stdout/stdin; tests script it.
pub trait Console {
    /// Plain output (help text, multi-line blocks)
    fn print(&mut self, msg: &str);
    /// Informational note
    fn info(&mut self, msg: &str);
    /// Rejection or failure note
    fn error(&mut self, msg: &str);
    /// Interactive yes/no prompt; only an explicit "yes" returns true
    fn confirm(&mut self, prompt: &str) -> bool;
}

/// One step of an outbound plan
#[derive(Debug, Clone, PartialEq)]
pub struct TimedSend {
    pub command: OutboundCommand,
    /// Pause after the send before the next step (or before accepting the
    /// next operator line)
    pub pause_after: Duration,
    /// Info line printed just before the send
    pub announce: Option<String>,
}

impl TimedSend {
    fn new(command: OutboundCommand) -> Self {
        Self {
            command,
            pause_after: Duration::ZERO,
            announce: None,
        }
    }
}

/// Result of interpreting one operator line
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// Send these commands in order, honoring the pauses
    Send(Vec<TimedSend>),
    /// Full dashboard redraw
    Redraw,
    /// Leave the bridge loop
    Exit,
    /// Nothing to transmit (help shown, input rejected, informational)
    Handled,
}

type Handler = fn(&[&str], &mut dyn Console) -> Outcome;

/// Action vocabulary: one entry per operator command
const ACTIONS: &[(&str, Handler)] = &[
    // Power
    ("pwr-on", |_, _| field(DeviceField::Power(true))),
    ("pwr-off", |_, _| field(DeviceField::Power(false))),
    // Speaker
    ("spk-big", |_, _| field(DeviceField::SpkSel(Speaker::Big))),
    ("spk-small", |_, _| field(DeviceField::SpkSel(Speaker::Small))),
    ("spk-on", |_, _| field(DeviceField::SpkPwr(true))),
    ("spk-off", |_, _| field(DeviceField::SpkPwr(false))),
    // Bluetooth
    ("bt-on", |_, _| field(DeviceField::Bt(true))),
    ("bt-off", |_, _| field(DeviceField::Bt(false))),
    // Fan
    ("fan-auto", |_, _| field(DeviceField::FanMode(FanMode::Auto))),
    ("fan-custom", |_, _| {
        field(DeviceField::FanMode(FanMode::Custom))
    }),
    ("fan-duty", fan_duty),
    ("fan-min", fan_min),
    // SMPS
    ("smps-on", |_, _| field(DeviceField::SmpsBypass(false))),
    ("smps-off", |_, _| field(DeviceField::SmpsBypass(true))),
    ("smps-cutoff", smps_cutoff),
    // Buzzer
    ("buzz", buzz),
    ("buzz-click", |_, _| tone(1975, 60, BUZZ_DEFAULT_DUTY)),
    ("buzz-beep", |_, _| tone(1000, 200, BUZZ_DEFAULT_DUTY)),
    ("buzz-low", |_, _| tone(440, 300, BUZZ_DEFAULT_DUTY)),
    ("buzz-mid", |_, _| tone(880, 300, BUZZ_DEFAULT_DUTY)),
    ("buzz-high", |_, _| tone(1760, 300, BUZZ_DEFAULT_DUTY)),
    ("buzz-warning", |_, _| tone(1760, 100, 384)),
    ("buzz-stop", |_, _| tone(0, 0, 0)),
    ("buzz-error", buzz_error),
    ("buzz-melody", buzz_melody),
    ("buzz-test", buzz_test),
    // Analyzer
    ("ana-get", |_, _| {
        analyzer(AnalyzerRequest {
            op: AnalyzerOp::Get,
            ..Default::default()
        })
    }),
    ("ana-mode", ana_mode),
    ("ana-bands", ana_bands),
    ("ana-update", ana_update),
    ("ana-gain", ana_gain),
    // RTC
    ("rtc-sync", rtc_sync),
    ("rtc-sync-force", rtc_sync_force),
    ("rtc-get", |_, console| {
        console.info("RTC time available in telemetry 'hz1.time' field");
        console.info("Wait for next telemetry message");
        Outcome::Handled
    }),
    // State / config
    ("state-save", |_, console| {
        console.info("State is auto-saved to NVS on each change");
        Outcome::Handled
    }),
    ("state-load", |_, console| {
        console.info("State is auto-loaded from NVS on boot");
        Outcome::Handled
    }),
    ("nvs-reset", nvs_reset),
    // System
    ("reset", factory_reset),
    ("reboot", |_, console| {
        console.info("Reboot not implemented via serial");
        console.info("Use hardware reset button or power cycle");
        Outcome::Handled
    }),
    ("status", |_, console| {
        console.info("Check the dashboard header for current status");
        Outcome::Handled
    }),
    ("version", |_, console| {
        console.info("Firmware version in telemetry 'hz1.fw_ver' field");
        Outcome::Handled
    }),
    // Utility
    ("json", raw_json),
    ("clear", |_, _| Outcome::Redraw),
    ("help", help_cmd),
    ("exit", |_, _| Outcome::Exit),
    ("quit", |_, _| Outcome::Exit),
    ("q", |_, _| Outcome::Exit),
];

/// Interpret one operator line
///
/// Unknown actions are reported, never fatal. An empty line is a no-op.
pub fn interpret(line: &str, console: &mut dyn Console) -> Outcome {
    let mut parts = line.split_whitespace();
    let Some(action) = parts.next() else {
        return Outcome::Handled;
    };
    let action = action.to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match ACTIONS.iter().find(|(name, _)| *name == action) {
        Some((_, handler)) => handler(&args, console),
        None => {
            console.error(&format!("Unknown command: {}", action));
            console.print("        Type 'help' for available commands");
            Outcome::Handled
        }
    }
}

fn field(f: DeviceField) -> Outcome {
    Outcome::Send(vec![TimedSend::new(OutboundCommand::Cmd(vec![f]))])
}

fn analyzer(req: AnalyzerRequest) -> Outcome {
    Outcome::Send(vec![TimedSend::new(OutboundCommand::Analyzer(req))])
}

fn tone(f: u32, ms: u32, d: u32) -> Outcome {
    Outcome::Send(vec![TimedSend::new(buzz_cmd(f, ms, d))])
}

fn buzz_cmd(f: u32, ms: u32, d: u32) -> OutboundCommand {
    OutboundCommand::Cmd(vec![DeviceField::Buzz(BuzzerTone { f, ms, d })])
}

fn fan_duty(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: fan-duty <0-1023>");
        return Outcome::Handled;
    };
    let Ok(duty) = raw.parse::<i32>() else {
        console.error("Invalid duty value");
        return Outcome::Handled;
    };
    if !(0..=1023).contains(&duty) {
        console.error("Duty must be 0-1023");
        return Outcome::Handled;
    }
    console.info(&format!("Set fan to CUSTOM mode with duty {}", duty));
    // Manual duty implies manual mode; a bare duty value is never sent alone
    Outcome::Send(vec![TimedSend::new(OutboundCommand::Cmd(vec![
        DeviceField::FanMode(FanMode::Custom),
        DeviceField::FanDuty(duty as u16),
    ]))])
}

fn fan_min(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: fan-min <0-1023>");
        return Outcome::Handled;
    };
    match raw.parse::<u16>() {
        Ok(duty) => field(DeviceField::FanMinDuty(duty)),
        Err(_) => {
            console.error("Invalid duty value");
            Outcome::Handled
        }
    }
}

fn smps_cutoff(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: smps-cutoff <voltage>");
        return Outcome::Handled;
    };
    match raw.parse::<f64>() {
        Ok(voltage) => field(DeviceField::SmpsCutoffV(voltage)),
        Err(_) => {
            console.error("Invalid voltage value");
            Outcome::Handled
        }
    }
}

fn buzz(args: &[&str], console: &mut dyn Console) -> Outcome {
    if args.len() < 2 {
        console.error("Usage: buzz <freq_hz> <duration_ms> [duty]");
        console.print("        Example: buzz 1000 200");
        return Outcome::Handled;
    }
    let freq = args[0].parse::<u32>();
    let duration = args[1].parse::<u32>();
    let duty = match args.get(2) {
        Some(raw) => raw.parse::<u32>(),
        None => Ok(BUZZ_DEFAULT_DUTY),
    };
    match (freq, duration, duty) {
        (Ok(f), Ok(ms), Ok(d)) => tone(f, ms, d),
        _ => {
            console.error("Invalid values");
            Outcome::Handled
        }
    }
}

fn buzz_error(_args: &[&str], console: &mut dyn Console) -> Outcome {
    console.info("Playing error pattern...");
    let steps = (0..3)
        .map(|_| TimedSend {
            command: buzz_cmd(880, 150, BUZZ_DEFAULT_DUTY),
            pause_after: Duration::from_millis(250),
            announce: None,
        })
        .collect();
    Outcome::Send(steps)
}

fn buzz_melody(_args: &[&str], console: &mut dyn Console) -> Outcome {
    console.info("Playing melody...");
    // C5 D5 E5 F5, each held for its duration plus a small settle pause
    let notes: [(u32, u32); 4] = [(523, 200), (587, 200), (659, 200), (698, 300)];
    let steps = notes
        .iter()
        .map(|&(f, ms)| TimedSend {
            command: buzz_cmd(f, ms, BUZZ_DEFAULT_DUTY),
            pause_after: Duration::from_millis(u64::from(ms) + 50),
            announce: None,
        })
        .collect();
    Outcome::Send(steps)
}

fn buzz_test(_args: &[&str], console: &mut dyn Console) -> Outcome {
    console.info("Testing buzzer tones...");
    let tests: [(&str, u32, u32); 5] = [
        ("Click", 1975, 60),
        ("Low (440Hz)", 440, 300),
        ("Mid (880Hz)", 880, 300),
        ("High (1760Hz)", 1760, 300),
        ("Very High (3520Hz)", 3520, 200),
    ];
    let steps = tests
        .iter()
        .map(|&(name, f, ms)| TimedSend {
            command: buzz_cmd(f, ms, BUZZ_DEFAULT_DUTY),
            pause_after: Duration::from_millis(u64::from(ms) + 500),
            announce: Some(format!("Playing: {}", name)),
        })
        .collect();
    Outcome::Send(steps)
}

fn ana_mode(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: ana-mode <fft|vu>");
        return Outcome::Handled;
    };
    let mode = raw.to_ascii_lowercase();
    if mode != "fft" && mode != "vu" {
        console.error("Mode must be 'fft' or 'vu'");
        return Outcome::Handled;
    }
    analyzer(AnalyzerRequest {
        op: AnalyzerOp::Set,
        mode: Some(mode),
        ..Default::default()
    })
}

fn ana_bands(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: ana-bands <8|16|24|32|48|64>");
        return Outcome::Handled;
    };
    let Ok(bands) = raw.parse::<u16>() else {
        console.error("Invalid bands value");
        return Outcome::Handled;
    };
    if !ANALYZER_BANDS.contains(&bands) {
        console.error("Bands must be 8, 16, 24, 32, 48, or 64");
        return Outcome::Handled;
    }
    analyzer(AnalyzerRequest {
        op: AnalyzerOp::Set,
        bands: Some(bands),
        ..Default::default()
    })
}

fn ana_update(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: ana-update <ms>");
        return Outcome::Handled;
    };
    match raw.parse::<u32>() {
        Ok(update_ms) => analyzer(AnalyzerRequest {
            op: AnalyzerOp::Set,
            update_ms: Some(update_ms),
            ..Default::default()
        }),
        Err(_) => {
            console.error("Invalid update_ms value");
            Outcome::Handled
        }
    }
}

fn ana_gain(args: &[&str], console: &mut dyn Console) -> Outcome {
    let Some(raw) = args.first() else {
        console.error("Usage: ana-gain <0.0-2.0>");
        return Outcome::Handled;
    };
    match raw.parse::<f64>() {
        Ok(gain) => analyzer(AnalyzerRequest {
            op: AnalyzerOp::Set,
            gain: Some(gain),
            ..Default::default()
        }),
        Err(_) => {
            console.error("Invalid gain value");
            Outcome::Handled
        }
    }
}

fn rtc_sync(args: &[&str], console: &mut dyn Console) -> Outcome {
    let iso = if args.is_empty() {
        let now = Local::now().format("%Y-%m-%dT%H:%M:%S").to_string();
        console.info(&format!("Syncing RTC with local time: {}", now));
        now
    } else {
        let iso = args.join(" ");
        console.info(&format!("Syncing RTC with: {}", iso));
        iso
    };
    // The device enforces its own sync policy; these notes are advisory only
    console.info("Note: May be rate-limited (24h interval, offset >2s)");
    console.info("Use 'rtc-sync-force' to bypass rate limit");
    field(DeviceField::RtcSet(iso))
}

fn rtc_sync_force(args: &[&str], console: &mut dyn Console) -> Outcome {
    if args.is_empty() {
        let epoch = Utc::now().timestamp() + RTC_TZ_OFFSET_SECS;
        let local_time = Local::now().format("%Y-%m-%dT%H:%M:%S");
        console.info(&format!(
            "Force syncing RTC (bypass rate limit): {}",
            local_time
        ));
        return field(DeviceField::RtcSetEpoch(epoch));
    }

    let iso = args.join(" ");
    match NaiveDateTime::parse_from_str(&iso, "%Y-%m-%dT%H:%M:%S") {
        Ok(dt) => {
            let epoch = dt.and_utc().timestamp() + RTC_TZ_OFFSET_SECS;
            console.info(&format!("Force syncing RTC with: {}", iso));
            field(DeviceField::RtcSetEpoch(epoch))
        }
        Err(_) => {
            console.error("Invalid time format. Use: YYYY-MM-DDTHH:MM:SS");
            Outcome::Handled
        }
    }
}

fn nvs_reset(_args: &[&str], console: &mut dyn Console) -> Outcome {
    if console.confirm("Reset NVS settings to defaults? (yes/no): ") {
        console.info("NVS reset command sent");
        field(DeviceField::NvsReset)
    } else {
        console.info("NVS reset cancelled");
        Outcome::Handled
    }
}

fn factory_reset(_args: &[&str], console: &mut dyn Console) -> Outcome {
    if console.confirm("Factory reset will erase all settings. Continue? (yes/no): ") {
        console.info("Factory reset command sent");
        field(DeviceField::FactoryReset)
    } else {
        console.info("Factory reset cancelled");
        Outcome::Handled
    }
}

fn raw_json(args: &[&str], console: &mut dyn Console) -> Outcome {
    if args.is_empty() {
        console.error("Usage: json <json_string>");
        return Outcome::Handled;
    }
    let raw = args.join(" ");
    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(_) => Outcome::Send(vec![TimedSend::new(OutboundCommand::Raw(raw))]),
        Err(e) => {
            console.error(&format!("Invalid JSON: {}", e));
            Outcome::Handled
        }
    }
}

fn help_cmd(args: &[&str], console: &mut dyn Console) -> Outcome {
    match args.first() {
        Some(category) => match help::category(category) {
            Some(text) => console.print(&text),
            None => {
                console.error(&format!("Unknown category: {}", category));
                console.print("Available categories: power, speaker, fan, buzzer, analyzer, smps, rtc");
            }
        },
        None => console.print(&help::overview()),
    }
    Outcome::Handled
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::protocol::encode;
    use serde_json::Value;
    use std::collections::VecDeque;

    /// Console double recording output and scripting confirmations
    #[derive(Default)]
    pub struct ScriptedConsole {
        pub prints: Vec<String>,
        pub infos: Vec<String>,
        pub errors: Vec<String>,
        pub confirms: VecDeque<bool>,
    }

    impl Console for ScriptedConsole {
        fn print(&mut self, msg: &str) {
            self.prints.push(msg.to_string());
        }
        fn info(&mut self, msg: &str) {
            self.infos.push(msg.to_string());
        }
        fn error(&mut self, msg: &str) {
            self.errors.push(msg.to_string());
        }
        fn confirm(&mut self, _prompt: &str) -> bool {
            self.confirms.pop_front().unwrap_or(false)
        }
    }

    fn sends(outcome: Outcome) -> Vec<TimedSend> {
        match outcome {
            Outcome::Send(steps) => steps,
            other => panic!("expected Send, got {:?}", other),
        }
    }

    fn wire(step: &TimedSend) -> Value {
        serde_json::from_str(encode(&step.command).trim_end()).unwrap()
    }

    #[test]
    fn test_fan_duty_couples_custom_mode() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("fan-duty 800", &mut console));
        assert_eq!(steps.len(), 1);

        let value = wire(&steps[0]);
        assert_eq!(value["type"], "cmd");
        assert_eq!(value["cmd"]["fan_mode"], "custom");
        assert_eq!(value["cmd"]["fan_duty"], 800);
    }

    #[test]
    fn test_fan_duty_range_rejected() {
        for input in ["fan-duty 1024", "fan-duty -1", "fan-duty lots"] {
            let mut console = ScriptedConsole::default();
            assert_eq!(interpret(input, &mut console), Outcome::Handled);
            assert_eq!(console.errors.len(), 1, "no error for {:?}", input);
        }
    }

    #[test]
    fn test_action_matching_is_case_insensitive() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("PWR-ON", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["power"], true);
    }

    #[test]
    fn test_ana_bands_validation() {
        let mut console = ScriptedConsole::default();
        assert_eq!(interpret("ana-bands 20", &mut console), Outcome::Handled);
        assert_eq!(console.errors.len(), 1);

        let steps = sends(interpret("ana-bands 32", &mut console));
        let value = wire(&steps[0]);
        assert_eq!(value["type"], "analyzer");
        assert_eq!(value["cmd"], "set");
        assert_eq!(value["bands"], 32);
    }

    #[test]
    fn test_ana_mode_validation() {
        let mut console = ScriptedConsole::default();
        assert_eq!(interpret("ana-mode loud", &mut console), Outcome::Handled);
        assert_eq!(console.errors.len(), 1);

        let steps = sends(interpret("ana-mode fft", &mut console));
        assert_eq!(wire(&steps[0])["mode"], "fft");
    }

    #[test]
    fn test_rtc_sync_force_epoch_offset() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("rtc-sync-force 2025-12-07T10:26:00", &mut console));
        let value = wire(&steps[0]);

        // UTC-naive epoch of 2025-12-07T10:26:00 plus the fixed +7h offset
        assert_eq!(value["cmd"]["rtc_set_epoch"], 1_765_103_160 + 25_200);
    }

    #[test]
    fn test_rtc_sync_force_rejects_bad_format() {
        let mut console = ScriptedConsole::default();
        assert_eq!(
            interpret("rtc-sync-force yesterday", &mut console),
            Outcome::Handled
        );
        assert_eq!(console.errors.len(), 1);
    }

    #[test]
    fn test_buzz_presets_literal_values() {
        let cases = [
            ("buzz-click", 1975, 60, 512),
            ("buzz-beep", 1000, 200, 512),
            ("buzz-low", 440, 300, 512),
            ("buzz-mid", 880, 300, 512),
            ("buzz-high", 1760, 300, 512),
            ("buzz-warning", 1760, 100, 384),
            ("buzz-stop", 0, 0, 0),
        ];
        for (input, f, ms, d) in cases {
            let mut console = ScriptedConsole::default();
            let steps = sends(interpret(input, &mut console));
            assert_eq!(steps.len(), 1, "{}", input);
            let value = wire(&steps[0]);
            assert_eq!(value["cmd"]["buzz"]["f"], f, "{}", input);
            assert_eq!(value["cmd"]["buzz"]["ms"], ms, "{}", input);
            assert_eq!(value["cmd"]["buzz"]["d"], d, "{}", input);
        }
    }

    #[test]
    fn test_buzz_custom_defaults_duty() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("buzz 1000 200", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["buzz"]["d"], 512);

        let steps = sends(interpret("buzz 440 500 256", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["buzz"]["d"], 256);

        assert_eq!(interpret("buzz 1000", &mut console), Outcome::Handled);
        assert_eq!(console.errors.len(), 1);
    }

    #[test]
    fn test_buzz_melody_sequence() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("buzz-melody", &mut console));
        assert_eq!(steps.len(), 4);

        let freqs: Vec<i64> = steps
            .iter()
            .map(|s| wire(s)["cmd"]["buzz"]["f"].as_i64().unwrap())
            .collect();
        assert_eq!(freqs, vec![523, 587, 659, 698]);

        // Each note is held for its duration plus the settle pause
        assert_eq!(steps[0].pause_after, Duration::from_millis(250));
        assert_eq!(steps[3].pause_after, Duration::from_millis(350));
    }

    #[test]
    fn test_buzz_error_repeats() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("buzz-error", &mut console));
        assert_eq!(steps.len(), 3);
        for step in &steps {
            let value = wire(step);
            assert_eq!(value["cmd"]["buzz"]["f"], 880);
            assert_eq!(value["cmd"]["buzz"]["ms"], 150);
            assert_eq!(step.pause_after, Duration::from_millis(250));
        }
    }

    #[test]
    fn test_buzz_test_announces_each_preset() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("buzz-test", &mut console));
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].announce.as_deref(), Some("Playing: Click"));
        assert_eq!(
            steps[4].announce.as_deref(),
            Some("Playing: Very High (3520Hz)")
        );
        assert_eq!(steps[4].pause_after, Duration::from_millis(700));
    }

    #[test]
    fn test_destructive_actions_require_confirmation() {
        // Declined: no transport activity
        let mut console = ScriptedConsole::default();
        console.confirms.push_back(false);
        assert_eq!(interpret("nvs-reset", &mut console), Outcome::Handled);

        // Accepted: exactly one command
        let mut console = ScriptedConsole::default();
        console.confirms.push_back(true);
        let steps = sends(interpret("nvs-reset", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["nvs_reset"], true);

        let mut console = ScriptedConsole::default();
        console.confirms.push_back(true);
        let steps = sends(interpret("reset", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["factory_reset"], true);
    }

    #[test]
    fn test_raw_json_validation() {
        let mut console = ScriptedConsole::default();
        assert_eq!(interpret("json {broken", &mut console), Outcome::Handled);
        assert_eq!(console.errors.len(), 1);

        let steps = sends(interpret(r#"json {"type":"cmd","cmd":{"bt":true}}"#, &mut console));
        assert_eq!(
            steps[0].command,
            OutboundCommand::Raw(r#"{"type":"cmd","cmd":{"bt":true}}"#.to_string())
        );
    }

    #[test]
    fn test_smps_polarity() {
        let mut console = ScriptedConsole::default();
        let steps = sends(interpret("smps-on", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["smps_bypass"], false);

        let steps = sends(interpret("smps-off", &mut console));
        assert_eq!(wire(&steps[0])["cmd"]["smps_bypass"], true);
    }

    #[test]
    fn test_unknown_and_empty_input() {
        let mut console = ScriptedConsole::default();
        assert_eq!(interpret("warp-drive on", &mut console), Outcome::Handled);
        assert_eq!(console.errors.len(), 1);

        assert_eq!(interpret("   ", &mut console), Outcome::Handled);
    }

    #[test]
    fn test_bridge_level_actions() {
        let mut console = ScriptedConsole::default();
        assert_eq!(interpret("exit", &mut console), Outcome::Exit);
        assert_eq!(interpret("quit", &mut console), Outcome::Exit);
        assert_eq!(interpret("q", &mut console), Outcome::Exit);
        assert_eq!(interpret("clear", &mut console), Outcome::Redraw);
        assert_eq!(interpret("help", &mut console), Outcome::Handled);
        assert!(!console.prints.is_empty());
    }
}
