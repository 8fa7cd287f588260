//! Colored output for lazyfox
//!
//! Uses owo-colors for terminal colors. Progress bars live in
//! `helpers::internal::progress`.

use owo_colors::OwoColorize;
use std::fmt::Display;

/// Print an action header (blue, bold)
/// Example: "==> Resolving latest"
pub fn action(message: &str) {
    println!("{} {}", "==>".blue().bold(), message.bold());
}

/// Print a sub-action (cyan arrow)
/// Example: "  -> download"
pub fn sub_action(step: &str) {
    println!("  {} {}", "->".cyan(), step);
}

/// Print a detail line (dimmed)
pub fn detail(message: &str) {
    println!("     {}", message.dimmed());
}

/// Print a labelled value, used for the source summary block.
/// Example: ":: version      v0.1.0"
pub fn field(label: &str, value: impl Display) {
    println!("{} {:<12} {}", "::".cyan(), label, value.bold());
}

/// Print a success message (green)
pub fn success(message: &str) {
    println!("{} {}", "==>".green().bold(), message.green());
}

/// Print an info message (cyan)
pub fn info(message: &str) {
    println!("{} {}", "::".cyan(), message);
}

/// Print a warning message (yellow)
pub fn warning(message: &str) {
    eprintln!("{} {}", "warning:".yellow().bold(), message.yellow());
}

/// Print an error message (red)
pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message.red());
}
