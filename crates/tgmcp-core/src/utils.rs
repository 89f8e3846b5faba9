use chrono::Utc;

/// RFC3339 timestamp in UTC, used by tool result envelopes.
pub fn iso_timestamp_utc() -> String {
    Utc::now().to_rfc3339()
}

/// Truncate to at most `max_len` characters, appending an ellipsis when cut.
pub fn truncate_text(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        return s.to_string();
    }
    let mut out = s.chars().take(max_len).collect::<String>();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_is_rfc3339() {
        let ts = iso_timestamp_utc();
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }

    #[test]
    fn truncate_text_adds_ellipsis() {
        assert_eq!(truncate_text("short", 10), "short");
        let t = truncate_text(&"a".repeat(20), 10);
        assert_eq!(t, format!("{}...", "a".repeat(10)));
    }
}
