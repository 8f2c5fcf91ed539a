//! Operator help text

/// Full command reference
pub fn overview() -> String {
    let mut out = String::new();
    out.push_str("\n=== AmpBridge - Command Reference ===\n\n");

    out.push_str("Power Control:\n");
    out.push_str("  pwr-on                      Power ON\n");
    out.push_str("  pwr-off                     Power OFF (standby)\n\n");

    out.push_str("Speaker Control:\n");
    out.push_str("  spk-big                     Switch to BIG speaker\n");
    out.push_str("  spk-small                   Switch to SMALL speaker\n");
    out.push_str("  spk-on                      Speaker power ON\n");
    out.push_str("  spk-off                     Speaker power OFF\n\n");

    out.push_str("Bluetooth:\n");
    out.push_str("  bt-on                       Bluetooth ON\n");
    out.push_str("  bt-off                      Bluetooth OFF\n\n");

    out.push_str("Fan Control:\n");
    out.push_str("  fan-auto                    Fan auto mode\n");
    out.push_str("  fan-custom                  Fan custom mode\n");
    out.push_str("  fan-duty <0-1023>           Set fan duty (auto switches to custom)\n");
    out.push_str("  fan-min <0-1023>            Set minimum fan duty\n\n");

    out.push_str("SMPS Control:\n");
    out.push_str("  smps-on                     Enable SMPS\n");
    out.push_str("  smps-off                    Bypass SMPS\n");
    out.push_str("  smps-cutoff <voltage>       Set SMPS cutoff voltage\n\n");

    out.push_str("Buzzer Control:\n");
    out.push_str("  buzz <freq> <dur> [duty]    Custom buzzer tone\n");
    out.push_str("  buzz-click                  Quick click\n");
    out.push_str("  buzz-beep                   Standard beep\n");
    out.push_str("  buzz-low/mid/high           Tone presets\n");
    out.push_str("  buzz-warning                Warning beep\n");
    out.push_str("  buzz-error                  Error pattern\n");
    out.push_str("  buzz-melody                 Simple melody\n");
    out.push_str("  buzz-stop                   Stop any playing sound\n");
    out.push_str("  buzz-test                   Test all tones\n\n");

    out.push_str("Analyzer Control:\n");
    out.push_str("  ana-get                     Get analyzer config\n");
    out.push_str("  ana-mode <fft|vu>           Set analyzer mode\n");
    out.push_str("  ana-bands <8-64>            Set FFT bands\n");
    out.push_str("  ana-update <ms>             Set update interval\n");
    out.push_str("  ana-gain <0.0-2.0>          Set analyzer gain\n\n");

    out.push_str("RTC Control:\n");
    out.push_str("  rtc-get                     Get RTC time (from telemetry)\n");
    out.push_str("  rtc-sync                    Sync RTC with system local time\n");
    out.push_str("  rtc-sync-force              Force sync (bypass 24h rate limit)\n");
    out.push_str("  rtc-sync-force <ISO8601>    Force sync with custom time\n\n");

    out.push_str("System:\n");
    out.push_str("  nvs-reset                   Reset NVS to defaults\n");
    out.push_str("  reset                       Factory reset\n");
    out.push_str("  status                      Request status\n");
    out.push_str("  version                     Show version\n\n");

    out.push_str("Utility:\n");
    out.push_str("  json <json_string>          Send raw JSON\n");
    out.push_str("  clear                       Redraw dashboard\n");
    out.push_str("  help                        Show this help\n");
    out.push_str("  help <category>             Show category help\n");
    out.push_str("  exit / quit / q             Quit bridge\n\n");

    out.push_str("Examples:\n");
    out.push_str("  spk-big\n");
    out.push_str("  fan-duty 800               # Auto switches to custom mode\n");
    out.push_str("  buzz 1000 200\n");
    out.push_str("  buzz-melody\n");
    out.push_str("  ana-bands 24\n");
    out.push_str("  rtc-sync\n\n");

    out.push_str("Categories: power, speaker, fan, buzzer, analyzer, smps, rtc\n");
    out
}

/// Category-specific help, None for an unknown category
pub fn category(name: &str) -> Option<String> {
    let text = match name.to_ascii_lowercase().as_str() {
        "power" => {
            "\n=== Power Control ===\n\
             \x20 pwr-on      - Turn amplifier ON\n\
             \x20 pwr-off     - Turn amplifier OFF (standby mode)\n"
        }
        "speaker" => {
            "\n=== Speaker Control ===\n\
             \x20 spk-big     - Switch audio output to BIG speaker\n\
             \x20 spk-small   - Switch audio output to SMALL speaker\n\
             \x20 spk-on      - Enable speaker power relay\n\
             \x20 spk-off     - Disable speaker power relay\n\n\
             Note: Speaker selection is independent from power relay\n"
        }
        "fan" => {
            "\n=== Fan Control ===\n\
             \x20 fan-auto           - Automatic fan control based on temperature\n\
             \x20 fan-custom         - Manual fan control mode\n\
             \x20 fan-duty <value>   - Set PWM duty cycle (0-1023)\n\
             \x20                      Automatically switches to CUSTOM mode\n\
             \x20 fan-min <value>    - Set minimum duty for auto mode\n\n\
             Examples:\n\
             \x20 fan-duty 512       # 50% duty (auto switches to custom)\n\
             \x20 fan-duty 800       # ~78% duty\n\n\
             Note: Fan can be controlled even when power is OFF (standby)\n"
        }
        "buzzer" => {
            "\n=== Buzzer Control ===\n\
             \x20 buzz <freq> <dur> [duty]  - Play custom tone\n\
             \x20   freq  : Frequency in Hz (100-5000)\n\
             \x20   dur   : Duration in milliseconds\n\
             \x20   duty  : PWM duty cycle 0-1023 (default: 512)\n\n\
             Presets:\n\
             \x20 buzz-click      - Quick UI click (1975Hz, 60ms)\n\
             \x20 buzz-beep       - Standard beep (1000Hz, 200ms)\n\
             \x20 buzz-low        - Low tone (440Hz, 300ms)\n\
             \x20 buzz-mid        - Mid tone (880Hz, 300ms)\n\
             \x20 buzz-high       - High tone (1760Hz, 300ms)\n\
             \x20 buzz-error      - Error pattern (3 short beeps)\n\
             \x20 buzz-warning    - Warning beep (high pitch)\n\
             \x20 buzz-melody     - Simple melody (C-D-E-F)\n\
             \x20 buzz-stop       - Stop any playing sound\n\
             \x20 buzz-test       - Test all tone presets\n"
        }
        "analyzer" => {
            "\n=== Analyzer Control ===\n\
             \x20 ana-get              - Get current analyzer configuration\n\
             \x20 ana-mode <fft|vu>    - Set mode (FFT spectrum or VU meter)\n\
             \x20 ana-bands <8-64>     - Set number of FFT bands\n\
             \x20 ana-update <ms>      - Set update interval in milliseconds\n\
             \x20 ana-gain <value>     - Set input gain\n\n\
             Valid band counts: 8, 16, 24, 32, 48, 64\n\
             Recommended update: 33ms (30 Hz) or 50ms (20 Hz)\n"
        }
        "smps" => {
            "\n=== SMPS Control ===\n\
             \x20 smps-on              - Enable SMPS (switching power supply)\n\
             \x20 smps-off             - Bypass SMPS (use direct power)\n\
             \x20 smps-cutoff <volts>  - Set low voltage cutoff threshold\n"
        }
        "rtc" => {
            "\n=== RTC Control ===\n\
             \x20 rtc-get                  - Get current RTC time (from telemetry)\n\
             \x20 rtc-sync                 - Sync RTC with system local time\n\
             \x20 rtc-sync-force           - Force sync (bypass 24h rate limit)\n\
             \x20 rtc-sync-force <ISO8601> - Force sync with custom time\n\n\
             Time Format: YYYY-MM-DDTHH:MM:SS (local time WIB)\n\n\
             Notes:\n\
             - rtc-sync: Rate-limited by the device (24h interval, offset >2s)\n\
             - rtc-sync-force: Bypass rate limit using epoch method\n\
             - RTC stores LOCAL time (WIB, UTC+7)\n\
             - Check telemetry 'hz1.time' field for current RTC time\n"
        }
        _ => return None,
    };
    Some(text.to_string())
}
