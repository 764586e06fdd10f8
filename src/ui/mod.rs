//! Colored console output with timestamps

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use colored::*;

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set_verbose(enabled: bool) {
	VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn is_verbose() -> bool {
	VERBOSE.load(Ordering::Relaxed)
}

fn line(icon: ColoredString, msg: &str) {
	let time = Local::now().format("%H:%M:%S").to_string().dimmed();
	println!("[{}] {} {}", time, icon, msg);
}

pub fn info(msg: &str) {
	line("ℹ".bright_blue().bold(), msg);
}

pub fn success(msg: &str) {
	line("✓".bright_green().bold(), msg);
}

pub fn warn(msg: &str) {
	line("⚠".bright_yellow().bold(), msg);
}

pub fn error(msg: &str) {
	line("✗".bright_red().bold(), msg);
}

pub fn debug(msg: &str) {
	if is_verbose() {
		line("⚙".bright_black().bold(), &msg.dimmed().to_string());
	}
}

/// Prints a section header with visual separation.
pub fn header(title: &str) {
	println!();
	println!("{}", format!("─── {} ───", title).bright_blue().bold());
}

/// Prints a run summary with clustering statistics.
pub fn summary(
	clusters: usize,
	folders: usize,
	skipped: usize,
	warnings: usize,
	duration_secs: f32,
) {
	header("Summary");

	println!("  {} {}", "Clusters:".bright_blue(), clusters);
	println!("  {} {}", "Folders:".bright_blue(), folders);
	if skipped > 0 {
		println!("  {} {}", "Skipped:".yellow(), skipped);
	}
	if warnings > 0 {
		println!("  {} {}", "Warnings:".yellow(), warnings);
	}
	println!("  {} {:.2}s", "Duration:".bright_blue(), duration_secs);
	println!();
}
