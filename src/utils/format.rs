use chrono::{DateTime, Utc};

/// Relative "last updated" indicator for rendered stats.
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    if secs < 5 {
        "just now".to_string()
    } else if secs < 60 {
        format!("{}s ago", secs)
    } else if secs < 3600 {
        format!("{}m ago", secs / 60)
    } else if secs < 86_400 {
        format!("{}h ago", secs / 3600)
    } else {
        format!("{}d ago", secs / 86_400)
    }
}

pub fn format_count(count: Option<u64>) -> String {
    match count {
        Some(count) => count.to_string(),
        None => "-".to_string(),
    }
}
