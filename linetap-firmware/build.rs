//! Build script for linetap-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates bridge.toml at compile time
//! - Generates the board constants and pin macros from bridge.toml

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use linetap_core::transport::MAX_RECONNECT_FAILURES;
use linetap_core::BridgeConfig;

/// Highest GPIO number on the RP2040
const MAX_GPIO: i64 = 29;

/// UART0 pins capable of TX / RX
const UART0_TX: &[i64] = &[0, 12, 16, 28];
const UART0_RX: &[i64] = &[1, 13, 17, 29];

/// UART1 pins capable of TX / RX
const UART1_TX: &[i64] = &[4, 8, 20, 24];
const UART1_RX: &[i64] = &[5, 9, 21, 25];

fn main() {
    setup_linker();
    let board = validate_config();
    generate_config(&board);
}

/// Everything the firmware needs from bridge.toml
struct Board {
    serial_tx: i64,
    serial_rx: i64,
    companion_tx: i64,
    companion_rx: i64,
    companion_baud: i64,
    buttons: [i64; 3],
    broker_reset: bool,
    broker_max_failures: i64,
    timing: BridgeConfig,
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate bridge.toml and extract the board description
fn validate_config() -> Board {
    println!("cargo:rerun-if-changed=bridge.toml");

    let config_path = Path::new("bridge.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: bridge.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a bridge.toml configuration file.         ║\n\
            ║  Please create one in the linetap-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read bridge.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in bridge.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    for section in ["serial", "companion", "buttons"] {
        if config.get(section).and_then(|s| s.as_table()).is_none() {
            errors.push(format!("Missing [{}] section", section));
        }
    }
    report("Missing configuration sections", &errors);

    let serial_tx = pin(&config, "serial", "tx_pin", &mut errors);
    let serial_rx = pin(&config, "serial", "rx_pin", &mut errors);
    let companion_tx = pin(&config, "companion", "tx_pin", &mut errors);
    let companion_rx = pin(&config, "companion", "rx_pin", &mut errors);
    let buttons = [
        pin(&config, "buttons", "prev_pin", &mut errors),
        pin(&config, "buttons", "select_pin", &mut errors),
        pin(&config, "buttons", "next_pin", &mut errors),
    ];

    if !UART0_TX.contains(&serial_tx) {
        errors.push(format!("[serial] tx_pin {} is not a UART0 TX pin", serial_tx));
    }
    if !UART0_RX.contains(&serial_rx) {
        errors.push(format!("[serial] rx_pin {} is not a UART0 RX pin", serial_rx));
    }
    if !UART1_TX.contains(&companion_tx) {
        errors.push(format!("[companion] tx_pin {} is not a UART1 TX pin", companion_tx));
    }
    if !UART1_RX.contains(&companion_rx) {
        errors.push(format!("[companion] rx_pin {} is not a UART1 RX pin", companion_rx));
    }

    let mut used = vec![serial_tx, serial_rx, companion_tx, companion_rx];
    used.extend_from_slice(&buttons);
    for (i, a) in used.iter().enumerate() {
        if *a >= 0 && used[..i].contains(a) {
            errors.push(format!("GPIO {} is assigned more than once", a));
        }
    }

    let companion_baud = match config.get("companion").and_then(|d| d.get("baud")) {
        None => 115_200,
        Some(toml::Value::Integer(baud)) if *baud >= 1_200 && *baud <= 921_600 => *baud,
        Some(_) => {
            errors.push("[companion] baud must be 1200-921600".to_string());
            115_200
        }
    };

    let broker_reset = match config.get("broker").and_then(|b| b.get("reset_on_failure")) {
        None => true,
        Some(toml::Value::Boolean(enabled)) => *enabled,
        Some(_) => {
            errors.push("[broker] reset_on_failure must be true or false".to_string());
            true
        }
    };

    let broker_max_failures = match config.get("broker").and_then(|b| b.get("max_failures")) {
        None => i64::from(MAX_RECONNECT_FAILURES),
        Some(toml::Value::Integer(n)) if (1..=i64::from(u8::MAX)).contains(n) => *n,
        Some(_) => {
            errors.push("[broker] max_failures must be 1-255".to_string());
            i64::from(MAX_RECONNECT_FAILURES)
        }
    };

    let timing = match config.get("timing") {
        None => BridgeConfig::default(),
        Some(table) => match table.clone().try_into::<BridgeConfig>() {
            Ok(timing) => timing,
            Err(e) => {
                errors.push(format!("[timing] {}", e));
                BridgeConfig::default()
            }
        },
    };
    if timing.error_display_ms == 0 {
        errors.push("[timing] error_display_ms must be positive".to_string());
    }
    if timing.display_refresh_ms == 0 {
        errors.push("[timing] display_refresh_ms must be positive".to_string());
    }

    report("Invalid bridge configuration", &errors);

    println!("cargo:warning=bridge.toml validated successfully");

    Board {
        serial_tx,
        serial_rx,
        companion_tx,
        companion_rx,
        companion_baud,
        buttons,
        broker_reset,
        broker_max_failures,
        timing,
    }
}

/// Read a GPIO number, recording an error if it is missing or out of range
fn pin(config: &toml::Value, section: &str, key: &str, errors: &mut Vec<String>) -> i64 {
    match config.get(section).and_then(|s| s.get(key)) {
        Some(toml::Value::Integer(n)) if (0..=MAX_GPIO).contains(n) => *n,
        Some(_) => {
            errors.push(format!("[{}] {} must be a GPIO 0-{}", section, key, MAX_GPIO));
            -1
        }
        None => {
            errors.push(format!("[{}] {} is required", section, key));
            -1
        }
    }
}

/// Write `$OUT_DIR/bridge_config.rs`
fn generate_config(board: &Board) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    let t = &board.timing;

    let code = format!(
        "// Generated from bridge.toml\n\
        \n\
        pub const BRIDGE_CONFIG: linetap_core::BridgeConfig = linetap_core::BridgeConfig {{\n\
        \x20   idle_timeout_ms: {},\n\
        \x20   fast_click_window_ms: {},\n\
        \x20   error_display_ms: {},\n\
        \x20   display_refresh_ms: {},\n\
        }};\n\
        \n\
        pub const COMPANION_BAUD: u32 = {};\n\
        \n\
        pub const BROKER_RESET_ENABLED: bool = {};\n\
        \n\
        pub const BROKER_MAX_FAILURES: u8 = {};\n\
        \n\
        macro_rules! serial_pins {{\n\
        \x20   ($p:ident) => {{\n\
        \x20       ($p.PIN_{}, $p.PIN_{})\n\
        \x20   }};\n\
        }}\n\
        \n\
        macro_rules! companion_pins {{\n\
        \x20   ($p:ident) => {{\n\
        \x20       ($p.PIN_{}, $p.PIN_{})\n\
        \x20   }};\n\
        }}\n\
        \n\
        macro_rules! button_pins {{\n\
        \x20   ($p:ident) => {{\n\
        \x20       [\n\
        \x20           embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_{}),\n\
        \x20           embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_{}),\n\
        \x20           embassy_rp::Peri::<embassy_rp::gpio::AnyPin>::from($p.PIN_{}),\n\
        \x20       ]\n\
        \x20   }};\n\
        }}\n",
        t.idle_timeout_ms,
        t.fast_click_window_ms,
        t.error_display_ms,
        t.display_refresh_ms,
        board.companion_baud,
        board.broker_reset,
        board.broker_max_failures,
        board.serial_tx,
        board.serial_rx,
        board.companion_tx,
        board.companion_rx,
        board.buttons[0],
        board.buttons[1],
        board.buttons[2],
    );

    fs::write(out_dir.join("bridge_config.rs"), code).unwrap();
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}
