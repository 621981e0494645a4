use crate::error::{AppError, AppResult};
use regex::Regex;
use std::sync::LazyLock;

static TABLE_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]{1,32}$").expect("valid table id pattern"));

/// Validates a table identifier taken from a URL path and returns it trimmed.
pub fn validate_table_id(table_id: &str) -> AppResult<String> {
    let trimmed = table_id.trim();
    if !TABLE_ID_PATTERN.is_match(trimmed) {
        return Err(AppError::ValidationError(
            "Invalid table id, expected 1-32 letters, digits, '-' or '_'".to_string(),
        ));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_table_id() {
        assert_eq!(validate_table_id("7").unwrap(), "7");
        assert_eq!(validate_table_id(" patio-3 ").unwrap(), "patio-3");
        assert!(validate_table_id("").is_err());
        assert!(validate_table_id("table 4").is_err());
        assert!(validate_table_id("../admin").is_err());
        assert!(validate_table_id(&"x".repeat(33)).is_err());
    }
}
