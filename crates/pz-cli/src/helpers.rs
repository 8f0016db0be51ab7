//! Parsing and formatting helper functions for the CLI.

use chrono::{DateTime, Duration, Utc};

/// Parse an expiration window like `1h`, `2d`, `1w`, `3m` into an
/// absolute timestamp.
pub fn parse_expiration(value: &str) -> anyhow::Result<DateTime<Utc>> {
    if value.len() < 2 {
        return Err(anyhow::anyhow!(
            "Invalid expiration: {} (expected <number><unit>)",
            value
        ));
    }

    let (num_str, unit) = value.split_at(value.len() - 1);
    let amount: i64 = num_str
        .parse()
        .map_err(|_| anyhow::anyhow!("Invalid expiration number: {}", value))?;
    if amount <= 0 {
        return Err(anyhow::anyhow!("Expiration must be positive: {}", value));
    }

    let window = match unit {
        "h" => Duration::hours(amount),
        "d" => Duration::days(amount),
        "w" => Duration::weeks(amount),
        "m" => Duration::days(30 * amount),
        _ => {
            return Err(anyhow::anyhow!(
                "Invalid expiration unit: {} (use h/d/w/m)",
                unit
            ))
        }
    };
    Ok(Utc::now() + window)
}

/// Map a file extension to the paste language tag.
pub fn language_from_filename(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "js" | "jsx" => "javascript",
        "ts" | "tsx" => "typescript",
        "py" => "python",
        "rb" => "ruby",
        "go" => "go",
        "rs" => "rust",
        "java" => "java",
        "c" | "h" => "c",
        "cpp" | "cc" | "hpp" => "cpp",
        "cs" => "csharp",
        "php" => "php",
        "swift" => "swift",
        "kt" => "kotlin",
        "sql" => "sql",
        "sh" | "bash" | "zsh" => "bash",
        "md" => "markdown",
        "json" => "json",
        "yaml" | "yml" => "yaml",
        "toml" => "toml",
        "xml" => "xml",
        "html" => "html",
        "css" => "css",
        _ => "text",
    }
}

/// Mask a token for status output, keeping only the edges. Counts
/// characters, not bytes, so multibyte tokens never split mid-character.
pub fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 12 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiration_units() {
        let now = Utc::now();
        assert!(parse_expiration("1h").unwrap() > now);
        assert!(parse_expiration("2d").unwrap() > parse_expiration("1d").unwrap());
        assert!(parse_expiration("1w").unwrap() > parse_expiration("6d").unwrap());
        assert!(parse_expiration("1m").unwrap() > parse_expiration("4w").unwrap());
    }

    #[test]
    fn test_parse_expiration_rejects_garbage() {
        assert!(parse_expiration("").is_err());
        assert!(parse_expiration("h").is_err());
        assert!(parse_expiration("0d").is_err());
        assert!(parse_expiration("-1d").is_err());
        assert!(parse_expiration("5y").is_err());
    }

    #[test]
    fn test_language_from_filename() {
        assert_eq!(language_from_filename("main.rs"), "rust");
        assert_eq!(language_from_filename("archive.tar.gz"), "text");
        assert_eq!(language_from_filename("Makefile"), "text");
        assert_eq!(language_from_filename("APP.PY"), "python");
    }

    #[test]
    fn test_mask_token() {
        assert_eq!(mask_token("short"), "*****");
        let masked = mask_token("tok_0123456789abcdef");
        assert_eq!(masked, "tok_0123...cdef");
    }

    #[test]
    fn test_mask_token_multibyte() {
        // 5 characters but 15 bytes; must not split mid-character.
        assert_eq!(mask_token("トークン値"), "*****");

        let masked = mask_token("トークン_0123456789末尾です");
        assert_eq!(masked, "トークン_012...末尾です");
    }
}
