use crate::utils::error::{HarvestError, Result};
use scraper::Selector;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl ToString, reason: impl Into<String>) -> HarvestError {
    HarvestError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }

    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("Invalid URL format: {}", e)))?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("Unsupported URL scheme: {}", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(invalid(field_name, path, "Path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "Path contains null bytes"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

/// Parses a CSS selector, reporting the offending field on failure.
pub fn validate_selector(field_name: &str, selector: &str) -> Result<Selector> {
    if selector.trim().is_empty() {
        return Err(invalid(field_name, selector, "Selector cannot be empty"));
    }
    Selector::parse(selector).map_err(|e| HarvestError::SelectorError {
        selector: selector.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("source.url", "https://arxiv.org/search/cs").is_ok());
        assert!(validate_url("source.url", "http://localhost:8080/").is_ok());
        assert!(validate_url("source.url", "").is_err());
        assert!(validate_url("source.url", "arxiv.org").is_err());
        assert!(validate_url("source.url", "ftp://arxiv.org").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("output.dir", "papers_txt").is_ok());
        assert!(validate_path("output.dir", "  ").is_err());
        assert!(validate_path("output.dir", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("output.title_max_chars", 50, 1, 200).is_ok());
        assert!(validate_range("output.title_max_chars", 0, 1, 200).is_err());
        assert!(validate_range("output.title_max_chars", 201, 1, 200).is_err());
    }

    #[test]
    fn test_validate_selector() {
        assert!(validate_selector("selectors.entry", r#"li[class*="arxiv-result"]"#).is_ok());
        assert!(matches!(
            validate_selector("selectors.entry", "li[[["),
            Err(HarvestError::SelectorError { .. })
        ));
        assert!(validate_selector("selectors.entry", "").is_err());
    }
}
