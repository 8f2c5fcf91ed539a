//! Wire protocol for the amplifier controller console
//!
//! The controller speaks newline-delimited JSON in both directions. Inbound
//! lines decode to [`ProtocolMessage`]; decoding never fails — anything that
//! is not valid JSON with a recognized `type` degrades to
//! [`ProtocolMessage::RawText`] carrying the original line, so no message is
//! ever dropped silently.
//!
//! Outbound traffic is one of two envelopes:
//! - `{"type":"cmd","cmd":{...}}` for device settings
//! - `{"type":"analyzer","cmd":"get"|"set",...}` for the audio analyzer

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Inbound message, immutable once parsed
#[derive(Debug, Clone, PartialEq)]
pub enum ProtocolMessage {
    Log(LogMessage),
    Ack(AckMessage),
    Telemetry(TelemetryFrame),
    Ota { evt: String },
    Analyzer { evt: String },
    /// Not valid JSON, or JSON without a recognized `type`
    RawText(String),
}

/// Device log line
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogMessage {
    pub lvl: String,
    pub msg: String,
    pub reason: Option<String>,
    pub offset_sec: Option<i64>,
}

impl Default for LogMessage {
    fn default() -> Self {
        Self {
            lvl: "info".to_string(),
            msg: String::new(),
            reason: None,
            offset_sec: None,
        }
    }
}

/// Command acknowledgment
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AckMessage {
    pub ok: bool,
    pub changed: Option<String>,
    pub value: Option<AckValue>,
    pub error: Option<String>,
}

/// Loosely-typed ack value (string, number or bool on the wire)
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum AckValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl fmt::Display for AckValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AckValue::Bool(b) => write!(f, "{}", b),
            AckValue::Int(n) => write!(f, "{}", n),
            AckValue::Float(x) => write!(f, "{}", x),
            AckValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Telemetry payload, either a full snapshot or a realtime sample
///
/// The two payloads are mutually exclusive per message. Full snapshots
/// arrive at a slow cadence and carry complete state; realtime samples
/// arrive fast and carry only the fields cheap enough to sample often.
#[derive(Debug, Clone, PartialEq)]
pub enum TelemetryFrame {
    Full(FullReport),
    Realtime(RealtimeReport),
}

/// Full telemetry snapshot (`hz1` payload)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FullReport {
    pub time: Option<String>,
    pub fw_ver: Option<String>,
    pub smps: Option<SmpsReport>,
    pub v12: Option<f64>,
    pub heat_c: Option<f64>,
    pub inputs: Option<InputsReport>,
    pub states: Option<StatesReport>,
    pub nvs: Option<NvsReport>,
    pub analyzer: Option<AnalyzerReport>,
    pub errors: Option<Vec<String>>,
}

/// SMPS rail section of the full snapshot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SmpsReport {
    pub v: Option<f64>,
    pub stage: Option<String>,
    pub cutoff: Option<f64>,
}

/// Input routing section of the full snapshot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct InputsReport {
    pub bt: bool,
    pub speaker: Option<String>,
}

/// Power state flags of the full snapshot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatesReport {
    pub on: bool,
    pub standby: bool,
}

/// Non-volatile config echo of the full snapshot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NvsReport {
    pub fan_mode_str: Option<String>,
    pub fan_duty: Option<u16>,
}

/// Analyzer section of the full snapshot
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AnalyzerReport {
    pub vu: Option<u16>,
    pub mode: Option<String>,
}

/// Realtime telemetry sample (`rt` payload)
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RealtimeReport {
    pub vu: Option<u16>,
    pub input: Option<String>,
}

/// Decode one inbound line
///
/// Pure; never fails. Parse failure is itself a representable outcome.
pub fn decode(line: &str) -> ProtocolMessage {
    let Ok(value) = serde_json::from_str::<Value>(line) else {
        return ProtocolMessage::RawText(line.to_string());
    };

    let Some(kind) = value.get("type").and_then(Value::as_str) else {
        return ProtocolMessage::RawText(line.to_string());
    };

    match kind {
        "log" => match serde_json::from_value::<LogMessage>(value.clone()) {
            Ok(msg) => ProtocolMessage::Log(msg),
            Err(_) => ProtocolMessage::RawText(line.to_string()),
        },
        "ack" => match serde_json::from_value::<AckMessage>(value.clone()) {
            Ok(msg) => ProtocolMessage::Ack(msg),
            Err(_) => ProtocolMessage::RawText(line.to_string()),
        },
        "telemetry" => decode_telemetry(&value, line),
        "ota" => ProtocolMessage::Ota {
            evt: event_name(&value),
        },
        "analyzer" => ProtocolMessage::Analyzer {
            evt: event_name(&value),
        },
        _ => ProtocolMessage::RawText(line.to_string()),
    }
}

fn decode_telemetry(value: &Value, line: &str) -> ProtocolMessage {
    if let Some(hz1) = value.get("hz1") {
        if let Ok(report) = serde_json::from_value::<FullReport>(hz1.clone()) {
            return ProtocolMessage::Telemetry(TelemetryFrame::Full(report));
        }
    } else if let Some(rt) = value.get("rt") {
        if let Ok(report) = serde_json::from_value::<RealtimeReport>(rt.clone()) {
            return ProtocolMessage::Telemetry(TelemetryFrame::Realtime(report));
        }
    }
    // Telemetry without a classifiable payload is surfaced verbatim
    ProtocolMessage::RawText(line.to_string())
}

fn event_name(value: &Value) -> String {
    value
        .get("evt")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Speaker output selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Speaker {
    Big,
    Small,
}

impl Speaker {
    pub fn as_str(&self) -> &'static str {
        match self {
            Speaker::Big => "big",
            Speaker::Small => "small",
        }
    }
}

/// Fan control mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FanMode {
    Auto,
    Custom,
}

impl FanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            FanMode::Auto => "auto",
            FanMode::Custom => "custom",
        }
    }
}

/// Buzzer tone parameters (`{"f":..,"ms":..,"d":..}` on the wire)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuzzerTone {
    pub f: u32,
    pub ms: u32,
    pub d: u32,
}

/// One field of the `cmd` envelope
///
/// The vocabulary is fixed by the controller firmware; there is no free-form
/// extension beyond the raw-JSON escape hatch.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceField {
    Power(bool),
    SpkSel(Speaker),
    SpkPwr(bool),
    Bt(bool),
    FanMode(FanMode),
    FanDuty(u16),
    FanMinDuty(u16),
    SmpsBypass(bool),
    SmpsCutoffV(f64),
    Buzz(BuzzerTone),
    RtcSet(String),
    RtcSetEpoch(i64),
    NvsReset,
    FactoryReset,
}

impl DeviceField {
    /// Wire key for this field
    pub fn key(&self) -> &'static str {
        match self {
            DeviceField::Power(_) => "power",
            DeviceField::SpkSel(_) => "spk_sel",
            DeviceField::SpkPwr(_) => "spk_pwr",
            DeviceField::Bt(_) => "bt",
            DeviceField::FanMode(_) => "fan_mode",
            DeviceField::FanDuty(_) => "fan_duty",
            DeviceField::FanMinDuty(_) => "fan_min_duty",
            DeviceField::SmpsBypass(_) => "smps_bypass",
            DeviceField::SmpsCutoffV(_) => "smps_cutoff_v",
            DeviceField::Buzz(_) => "buzz",
            DeviceField::RtcSet(_) => "rtc_set",
            DeviceField::RtcSetEpoch(_) => "rtc_set_epoch",
            DeviceField::NvsReset => "nvs_reset",
            DeviceField::FactoryReset => "factory_reset",
        }
    }

    /// Wire value for this field
    pub fn value(&self) -> Value {
        match self {
            DeviceField::Power(b)
            | DeviceField::SpkPwr(b)
            | DeviceField::Bt(b)
            | DeviceField::SmpsBypass(b) => Value::Bool(*b),
            DeviceField::SpkSel(s) => Value::String(s.as_str().to_string()),
            DeviceField::FanMode(m) => Value::String(m.as_str().to_string()),
            DeviceField::FanDuty(d) | DeviceField::FanMinDuty(d) => Value::from(*d),
            DeviceField::SmpsCutoffV(v) => Value::from(*v),
            DeviceField::Buzz(tone) => {
                serde_json::to_value(tone).unwrap_or(Value::Null)
            }
            DeviceField::RtcSet(iso) => Value::String(iso.clone()),
            DeviceField::RtcSetEpoch(epoch) => Value::from(*epoch),
            DeviceField::NvsReset | DeviceField::FactoryReset => Value::Bool(true),
        }
    }
}

/// Analyzer sub-command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalyzerOp {
    Get,
    Set,
}

impl AnalyzerOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyzerOp::Get => "get",
            AnalyzerOp::Set => "set",
        }
    }
}

/// Analyzer envelope (`{"type":"analyzer","cmd":...,params}`)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyzerRequest {
    pub op: AnalyzerOp,
    pub mode: Option<String>,
    pub bands: Option<u16>,
    pub update_ms: Option<u32>,
    pub gain: Option<f64>,
}

impl Default for AnalyzerOp {
    fn default() -> Self {
        AnalyzerOp::Get
    }
}

/// Outbound command, built by the interpreter and encoded here
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundCommand {
    /// `cmd` envelope with one or more device fields
    Cmd(Vec<DeviceField>),
    /// `analyzer` envelope
    Analyzer(AnalyzerRequest),
    /// Pre-validated raw JSON, forwarded unmodified
    Raw(String),
}

/// Encode one outbound command as a newline-terminated JSON line
///
/// Pure; does not touch shared state. The output contains no interior
/// newlines.
pub fn encode(command: &OutboundCommand) -> String {
    let mut line = match command {
        OutboundCommand::Cmd(fields) => {
            let mut cmd = Map::new();
            for field in fields {
                cmd.insert(field.key().to_string(), field.value());
            }
            let mut root = Map::new();
            root.insert("type".to_string(), Value::from("cmd"));
            root.insert("cmd".to_string(), Value::Object(cmd));
            Value::Object(root).to_string()
        }
        OutboundCommand::Analyzer(req) => {
            let mut root = Map::new();
            root.insert("type".to_string(), Value::from("analyzer"));
            root.insert("cmd".to_string(), Value::from(req.op.as_str()));
            if let Some(ref mode) = req.mode {
                root.insert("mode".to_string(), Value::from(mode.clone()));
            }
            if let Some(bands) = req.bands {
                root.insert("bands".to_string(), Value::from(bands));
            }
            if let Some(update_ms) = req.update_ms {
                root.insert("update_ms".to_string(), Value::from(update_ms));
            }
            if let Some(gain) = req.gain {
                root.insert("gain".to_string(), Value::from(gain));
            }
            Value::Object(root).to_string()
        }
        OutboundCommand::Raw(raw) => raw.clone(),
    };
    line.push('\n');
    line
}

/// Accumulates raw transport bytes and yields complete lines
///
/// Line-oriented analogue of a packet reader: bytes go in as they arrive,
/// complete `\n`/`\r`-terminated lines come out, partial tails are kept for
/// the next chunk.
#[derive(Debug, Default)]
pub struct LineScanner {
    buffer: Vec<u8>,
}

/// Cap on the partial-line tail; a device spewing unterminated output must
/// not grow the buffer without bound.
const MAX_PARTIAL: usize = 16 * 1024;

impl LineScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed a chunk of bytes, returning all completed non-empty lines
    pub fn push(&mut self, chunk: &[u8]) -> Vec<String> {
        self.buffer.extend_from_slice(chunk);

        let mut lines = Vec::new();
        let mut start = 0;
        for i in 0..self.buffer.len() {
            let b = self.buffer[i];
            if b == b'\n' || b == b'\r' {
                if i > start {
                    let line = String::from_utf8_lossy(&self.buffer[start..i])
                        .trim()
                        .to_string();
                    if !line.is_empty() {
                        lines.push(line);
                    }
                }
                start = i + 1;
            }
        }
        self.buffer.drain(..start);

        if self.buffer.len() > MAX_PARTIAL {
            let keep = self.buffer.split_off(self.buffer.len() - MAX_PARTIAL / 2);
            self.buffer = keep;
            log::warn!("Line buffer overflow, dropped oldest partial data");
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_log_defaults() {
        let msg = decode(r#"{"type":"log","msg":"rtc_synced","offset_sec":3}"#);
        match msg {
            ProtocolMessage::Log(log) => {
                assert_eq!(log.lvl, "info");
                assert_eq!(log.msg, "rtc_synced");
                assert_eq!(log.offset_sec, Some(3));
                assert_eq!(log.reason, None);
            }
            other => panic!("expected log, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_ack_value_types() {
        let msg = decode(r#"{"type":"ack","ok":true,"changed":"fan_duty","value":800}"#);
        match msg {
            ProtocolMessage::Ack(ack) => {
                assert!(ack.ok);
                assert_eq!(ack.changed.as_deref(), Some("fan_duty"));
                assert_eq!(ack.value, Some(AckValue::Int(800)));
            }
            other => panic!("expected ack, got {:?}", other),
        }

        let msg = decode(r#"{"type":"ack","ok":true,"changed":"fan_mode","value":"custom"}"#);
        match msg {
            ProtocolMessage::Ack(ack) => {
                assert_eq!(ack.value, Some(AckValue::Str("custom".to_string())));
            }
            other => panic!("expected ack, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_non_json_is_raw() {
        let line = "Guru Meditation Error: Core 1 panic'ed";
        assert_eq!(
            decode(line),
            ProtocolMessage::RawText(line.to_string())
        );
    }

    #[test]
    fn test_decode_unknown_type_preserves_line() {
        let line = r#"{"type":"bootbanner","v":3}"#;
        assert_eq!(
            decode(line),
            ProtocolMessage::RawText(line.to_string())
        );
    }

    #[test]
    fn test_decode_json_without_type_is_raw() {
        let line = r#"{"msg":"hello"}"#;
        assert_eq!(
            decode(line),
            ProtocolMessage::RawText(line.to_string())
        );
    }

    #[test]
    fn test_decode_full_telemetry() {
        let line = r#"{"type":"telemetry","hz1":{"time":"2025-12-07T10:26:00","fw_ver":"2.1.0","states":{"on":true,"standby":false}}}"#;
        match decode(line) {
            ProtocolMessage::Telemetry(TelemetryFrame::Full(report)) => {
                assert_eq!(report.fw_ver.as_deref(), Some("2.1.0"));
                assert!(report.states.unwrap().on);
                assert!(report.errors.is_none());
            }
            other => panic!("expected full telemetry, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_realtime_telemetry() {
        let line = r#"{"type":"telemetry","rt":{"vu":128,"input":"bt","bands":[1,2,3]}}"#;
        match decode(line) {
            ProtocolMessage::Telemetry(TelemetryFrame::Realtime(report)) => {
                assert_eq!(report.vu, Some(128));
                assert_eq!(report.input.as_deref(), Some("bt"));
            }
            other => panic!("expected realtime telemetry, got {:?}", other),
        }
    }

    #[test]
    fn test_decode_telemetry_without_payload_is_raw() {
        let line = r#"{"type":"telemetry"}"#;
        assert_eq!(
            decode(line),
            ProtocolMessage::RawText(line.to_string())
        );
    }

    #[test]
    fn test_decode_events() {
        assert_eq!(
            decode(r#"{"type":"ota","evt":"begin"}"#),
            ProtocolMessage::Ota {
                evt: "begin".to_string()
            }
        );
        assert_eq!(
            decode(r#"{"type":"analyzer","evt":"mode_changed"}"#),
            ProtocolMessage::Analyzer {
                evt: "mode_changed".to_string()
            }
        );
    }

    #[test]
    fn test_encode_cmd_envelope() {
        let cmd = OutboundCommand::Cmd(vec![
            DeviceField::FanMode(FanMode::Custom),
            DeviceField::FanDuty(800),
        ]);
        let line = encode(&cmd);
        assert!(line.ends_with('\n'));
        assert!(!line.trim_end().contains('\n'));

        let value: Value = serde_json::from_str(line.trim_end()).unwrap();
        assert_eq!(value["type"], "cmd");
        assert_eq!(value["cmd"]["fan_mode"], "custom");
        assert_eq!(value["cmd"]["fan_duty"], 800);
    }

    #[test]
    fn test_encode_buzz_tone() {
        let cmd = OutboundCommand::Cmd(vec![DeviceField::Buzz(BuzzerTone {
            f: 1975,
            ms: 60,
            d: 512,
        })]);
        let value: Value = serde_json::from_str(encode(&cmd).trim_end()).unwrap();
        assert_eq!(value["cmd"]["buzz"]["f"], 1975);
        assert_eq!(value["cmd"]["buzz"]["ms"], 60);
        assert_eq!(value["cmd"]["buzz"]["d"], 512);
    }

    #[test]
    fn test_encode_analyzer_set() {
        let cmd = OutboundCommand::Analyzer(AnalyzerRequest {
            op: AnalyzerOp::Set,
            bands: Some(32),
            ..Default::default()
        });
        let value: Value = serde_json::from_str(encode(&cmd).trim_end()).unwrap();
        assert_eq!(value["type"], "analyzer");
        assert_eq!(value["cmd"], "set");
        assert_eq!(value["bands"], 32);
        assert!(value.get("mode").is_none());
    }

    #[test]
    fn test_encode_raw_passthrough() {
        let cmd = OutboundCommand::Raw(r#"{"type":"cmd","cmd":{"power":true}}"#.to_string());
        assert_eq!(
            encode(&cmd),
            "{\"type\":\"cmd\",\"cmd\":{\"power\":true}}\n"
        );
    }

    #[test]
    fn test_line_scanner_splits_and_buffers() {
        let mut scanner = LineScanner::new();
        assert!(scanner.push(b"{\"type\":").is_empty());
        let lines = scanner.push(b"\"ota\"}\r\npartial");
        assert_eq!(lines, vec!["{\"type\":\"ota\"}".to_string()]);
        let lines = scanner.push(b" tail\n");
        assert_eq!(lines, vec!["partial tail".to_string()]);
    }

    #[test]
    fn test_line_scanner_skips_blank_lines() {
        let mut scanner = LineScanner::new();
        let lines = scanner.push(b"\r\n\r\nhello\r\n\n");
        assert_eq!(lines, vec!["hello".to_string()]);
    }
}
