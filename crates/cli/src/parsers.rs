use std::path::PathBuf;

/// Parse an Org tag.
///
/// Org tags may only contain letters, digits, `_`, `@`, `#` and `%`.
///
/// # Errors
/// Returns an error if the tag is empty or contains any other character.
pub fn parse_tag(s: &str) -> Result<String, String> {
    let tag = s.trim();
    if tag.is_empty() {
        return Err("tag must not be empty".to_string());
    }
    if let Some(bad) = tag
        .chars()
        .find(|c| !(c.is_alphanumeric() || matches!(c, '_' | '@' | '#' | '%')))
    {
        return Err(format!("invalid character '{bad}' in tag: {tag}"));
    }
    Ok(tag.to_string())
}

/// Parse a non-empty path argument.
///
/// Existence is checked later, together with the rest of the configuration.
///
/// # Errors
/// Returns an error if the argument is empty.
pub fn parse_non_empty_path(s: &str) -> Result<PathBuf, String> {
    if s.is_empty() {
        return Err("path must not be empty".to_string());
    }
    Ok(PathBuf::from(s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tag_basic() {
        assert_eq!(parse_tag("filedatestamps").unwrap(), "filedatestamps");
        assert_eq!(parse_tag(" photos_2011 ").unwrap(), "photos_2011");
        assert_eq!(parse_tag("@home").unwrap(), "@home");
    }

    #[test]
    fn test_parse_tag_error() {
        assert!(parse_tag("").is_err());
        assert!(parse_tag("two words").is_err());
        assert!(parse_tag("a:b").unwrap_err().contains("':'"));
    }

    #[test]
    fn test_parse_non_empty_path() {
        assert_eq!(parse_non_empty_path("/tmp").unwrap(), PathBuf::from("/tmp"));
        assert!(parse_non_empty_path("").is_err());
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Well-formed tags are accepted unchanged
        #[test]
        fn test_tag_roundtrip(tag in "[a-zA-Z0-9_@#%]{1,30}") {
            prop_assert_eq!(parse_tag(&tag).unwrap(), tag);
        }

        /// Tags with a colon or whitespace inside are always rejected
        #[test]
        fn test_tag_rejects_separators(
            head in "[a-z]{1,10}",
            sep in "[: \t]",
            tail in "[a-z]{1,10}"
        ) {
            let input = format!("{head}{sep}{tail}");
            prop_assert!(parse_tag(&input).is_err());
        }
    }
}
