use chrono::{DateTime, Utc};

use studybuddy_lib::review::algorithm::format_interval;

/// ANSI color codes
pub struct Color;

impl Color {
    pub const RESET: &str = "\x1b[0m";
    pub const BOLD: &str = "\x1b[1m";
    pub const DIM: &str = "\x1b[2m";
    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const CYAN: &str = "\x1b[36m";
}

/// Wrap `text` in a color code when colors are enabled
pub fn paint(text: &str, color: &str, use_color: bool) -> String {
    if use_color {
        format!("{}{}{}", color, text, Color::RESET)
    } else {
        text.to_string()
    }
}

/// Describe when an item is next due relative to `now`
pub fn describe_due(next_review: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if next_review <= now {
        return "due now".to_string();
    }

    let remaining = next_review - now;
    let days = remaining.num_days();
    if days >= 1 {
        format!("in {}", format_interval(days as u32))
    } else if remaining.num_hours() >= 1 {
        format!("in {}h", remaining.num_hours())
    } else {
        format!("in {}m", remaining.num_minutes().max(1))
    }
}

/// Truncate to `width` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}
