//! Terminal output helpers for the txmap binary. Everything goes to stderr so
//! that stdout carries only mapping results.

use std::time::Instant;

use colored::Colorize;

pub fn banner(subtitle: &str) {
    eprintln!();
    eprintln!("{} {}", "txmap".bold().cyan(), subtitle.dimmed());
    eprintln!();
}

pub fn section(title: &str) {
    let bar = "─".repeat(50);
    eprintln!("{} {}", title.bold().blue(), bar.dimmed());
}

pub fn kv(key: &str, value: &str) {
    eprintln!("  {:<20} {}", key.dimmed(), value);
}

pub fn success(msg: &str) {
    eprintln!("  {} {}", "✓".green().bold(), msg);
}

pub fn warning(msg: &str) {
    eprintln!("  {} {}", "⚠".yellow(), msg.yellow());
}

/// Value for optional fields: the value itself or a dimmed "none".
#[must_use]
pub fn or_none<T: ToString>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "none".dimmed().to_string(),
    }
}

pub fn print_summary(start: Instant) {
    eprintln!();
    eprintln!(
        "{}  {}",
        "Time".dimmed(),
        format!("{:.3}s", start.elapsed().as_secs_f64()).bold()
    );
    eprintln!();
}
