//! `.env`-style text codec for bulk import/export.
//!
//! One `KEY=value` pair per line; blank lines and `#`-prefixed lines are
//! ignored on parse. Order is preserved in both directions.

use crate::error::{PzError, Result};

/// Parse a single `KEY=value` argument.
///
/// Splits at the first `=`, so values may themselves contain `=`.
///
/// # Errors
///
/// Returns `PzError::MalformedInput` when the `=` is missing or the key
/// is empty — rejected before any network call.
pub fn parse_key_value(input: &str) -> Result<(String, String)> {
    let (key, value) = input
        .split_once('=')
        .ok_or_else(|| PzError::MalformedInput("expected KEY=value".to_string()))?;
    if key.is_empty() {
        return Err(PzError::MalformedInput("key cannot be empty".to_string()));
    }
    Ok((key.to_string(), value.to_string()))
}

/// Parse `.env` text into ordered pairs. A later duplicate key wins.
pub fn parse_env(content: &str) -> Result<Vec<(String, String)>> {
    let mut pairs: Vec<(String, String)> = Vec::new();
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let (key, value) = parse_key_value(trimmed)?;
        pairs.retain(|(existing, _)| existing != &key);
        pairs.push((key, value));
    }
    Ok(pairs)
}

/// Serialize pairs back to `.env` text, one `KEY=value` per line.
pub fn to_env(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_value_splits_at_first_equals() {
        let (key, value) = parse_key_value("DATABASE_URL=postgres://u:p@host/db?sslmode=1").unwrap();
        assert_eq!(key, "DATABASE_URL");
        assert_eq!(value, "postgres://u:p@host/db?sslmode=1");
    }

    #[test]
    fn test_parse_key_value_allows_empty_value() {
        let (key, value) = parse_key_value("EMPTY=").unwrap();
        assert_eq!(key, "EMPTY");
        assert_eq!(value, "");
    }

    #[test]
    fn test_parse_key_value_rejects_missing_equals() {
        assert!(matches!(
            parse_key_value("NOEQUALS"),
            Err(PzError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_key_value_rejects_empty_key() {
        assert!(matches!(
            parse_key_value("=value"),
            Err(PzError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_parse_env_skips_comments_and_blanks() {
        let pairs = parse_env("FOO=bar\n#comment\n\nBAZ=qux").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("FOO".to_string(), "bar".to_string()),
                ("BAZ".to_string(), "qux".to_string())
            ]
        );
    }

    #[test]
    fn test_env_round_trip() {
        let pairs = parse_env("FOO=bar\n#comment\n\nBAZ=qux").unwrap();
        assert_eq!(to_env(&pairs), "FOO=bar\nBAZ=qux");
    }

    #[test]
    fn test_parse_env_later_duplicate_wins() {
        let pairs = parse_env("A=1\nB=2\nA=3").unwrap();
        assert_eq!(
            pairs,
            vec![
                ("B".to_string(), "2".to_string()),
                ("A".to_string(), "3".to_string())
            ]
        );
    }

    #[test]
    fn test_parse_env_bad_line_is_fatal() {
        assert!(parse_env("GOOD=1\nbadline\n").is_err());
    }
}
