//! WebChannel CLI UI primitives.
#![allow(dead_code)]

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Terminal palette
pub mod colors {
    use console::Color;

    pub const CYAN: Color = Color::Color256(51);
    pub const MAGENTA: Color = Color::Color256(201);
    pub const NEON_GREEN: Color = Color::Color256(82);
    pub const DIM: Color = Color::Color256(240);
}

pub mod symbols {
    pub const DIAMOND: &str = "\u{25C6}";          // ◆
    pub const DIAMOND_OUTLINE: &str = "\u{25C7}";  // ◇
    pub const TARGET_FILLED: &str = "\u{25C9}";    // ◉
    pub const TRIANGLE: &str = "\u{25B8}";         // ▸
    pub const DOT: &str = "\u{00B7}";              // ·
    pub const ARROW: &str = "\u{2500}\u{25B8}";    // ─▸
}

/// Print compact version header
pub fn print_compact_header(version: &str) {
    println!(
        "  {} {} {}",
        style(symbols::DIAMOND).fg(colors::CYAN),
        style("webchannel").fg(colors::CYAN).bold(),
        style(version).dim()
    );
    println!();
}

pub fn success(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::TARGET_FILLED).fg(colors::NEON_GREEN),
        msg
    );
}

pub fn error(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND).fg(colors::MAGENTA),
        style(msg).fg(colors::MAGENTA)
    );
}

pub fn info(msg: &str) {
    println!(
        "  {} {}",
        style(symbols::DIAMOND_OUTLINE).fg(colors::CYAN),
        msg
    );
}

pub fn dim(msg: &str) {
    println!("  {}", style(msg).fg(colors::DIM));
}

/// Create a spinner
pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    let spinner_style = ProgressStyle::default_spinner()
        .tick_chars("\u{25CE}\u{25C9}\u{25CE}\u{25C9}") // ◎◉◎◉
        .template("  {spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    pb.set_style(spinner_style);
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(150));
    pb
}

/// One `source ─▸ output` line of a generation summary.
pub fn generated_line(source: &str, output: &str, interfaces: &[String]) {
    let names = if interfaces.is_empty() {
        style("no interfaces".to_string()).fg(colors::DIM)
    } else {
        style(interfaces.join(", ")).fg(colors::CYAN)
    };
    println!(
        "    {} {} {} {}",
        style(source).bold(),
        style(symbols::ARROW).fg(colors::DIM),
        output,
        names
    );
}

/// Mapping header in watch and generate output.
pub fn mapping_line(source: &str, target: &str) {
    println!(
        "  {} {} {} {}",
        style(symbols::TRIANGLE).fg(colors::CYAN),
        source,
        style(symbols::ARROW).fg(colors::DIM),
        target
    );
}

/// Print timing info
pub fn timing(label: &str, duration_ms: u128) {
    println!(
        "  {} {} {}",
        style(symbols::DOT).fg(colors::DIM),
        style(label).fg(colors::DIM),
        style(format!("{}ms", duration_ms)).fg(colors::DIM)
    );
}
