use anyhow::Result;
use colored::Colorize;
use hossi_application::{NotificationCenter, NotificationLevel};
use serde_json::Value;

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints and drains every pending notification to stderr.
pub fn print_notifications(center: &NotificationCenter) {
    for notification in center.drain() {
        let line = match notification.level {
            NotificationLevel::Success => format!("✓ {}", notification.message).green(),
            NotificationLevel::Info => format!("ℹ {}", notification.message).cyan(),
            NotificationLevel::Error => format!("✗ {}", notification.message).red(),
        };
        eprintln!("{}", line);
    }
}
