use chrono::NaiveDate;
use uuid::Uuid;

use crate::{LnError, Result};

/// Generates a fresh opaque identifier for a note or todo
pub fn new_entity_id() -> String {
    Uuid::new_v4().to_string()
}

// Helper method for parsing tags
pub fn parse_tags(tags: Option<String>) -> Vec<String> {
    tags.map(|t| {
        t.split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

/// Parses a `YYYY-MM-DD` date given on the command line
pub fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d").map_err(|e| LnError::InvalidInput {
        message: format!("'{}' is not a YYYY-MM-DD date: {}", input, e),
    })
}

/// Parses a `YYYY-MM` month into (year, month)
pub fn parse_month(input: &str) -> Result<(i32, u32)> {
    let invalid = || LnError::InvalidInput {
        message: format!("'{}' is not a YYYY-MM month", input),
    };

    let (year, month) = input.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month: u32 = month.parse().map_err(|_| invalid())?;
    if !(1..=12).contains(&month) {
        return Err(invalid());
    }
    Ok((year, month))
}

/// First line of `content`, cut to at most `max_len` characters
pub fn content_preview(content: &str, max_len: usize) -> String {
    let first_line = content.lines().next().unwrap_or("").trim();
    if first_line.chars().count() <= max_len {
        return first_line.to_string();
    }
    let cut: String = first_line.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_trimmed_and_empty_entries_dropped() {
        assert_eq!(
            parse_tags(Some(" work, ,home ,".to_string())),
            vec!["work".to_string(), "home".to_string()]
        );
        assert!(parse_tags(None).is_empty());
    }

    #[test]
    fn ids_are_unique() {
        assert_ne!(new_entity_id(), new_entity_id());
    }

    #[test]
    fn month_parsing_rejects_out_of_range() {
        assert_eq!(parse_month("2025-11").unwrap(), (2025, 11));
        assert!(parse_month("2025-13").is_err());
        assert!(parse_month("november").is_err());
    }

    #[test]
    fn preview_truncates_on_char_boundaries() {
        assert_eq!(content_preview("short\nsecond", 10), "short");
        assert_eq!(content_preview("ééééééééééé", 6), "ééé...");
    }
}
