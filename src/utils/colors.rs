/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

/// Greyed out when the value carries nothing to show ("", "--:--", "00:00").
pub fn colorize_optional(value: &str) -> String {
    let v = value.trim();
    if v.is_empty() || v == "--:--" || v == "00:00" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}

/// Counts in a sync summary: green for inserts, yellow for updates, red for deletes.
pub fn colorize_count(value: usize, color: &str) -> String {
    if value == 0 {
        format!("{GREY}{value}{RESET}")
    } else {
        format!("{color}{value}{RESET}")
    }
}
