//! URL and input validation utilities

use anyhow::{anyhow, Result};
use url::Url;

/// Validate URL syntax
pub fn validate_url(url: &str) -> Result<Url> {
    Url::parse(url.trim()).map_err(|e| anyhow!("Invalid URL format: {}", e))
}

/// Check if the source should be fetched over HTTP(S)
pub fn is_http_url(source: &str) -> bool {
    if let Ok(parsed) = Url::parse(source.trim()) {
        let scheme = parsed.scheme();
        scheme == "http" || scheme == "https"
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_detection() {
        assert!(is_http_url("https://docs.google.com/spreadsheets/d/e/x/pub?output=csv"));
        assert!(is_http_url(" http://localhost:8080/sheet.csv "));
        assert!(!is_http_url("file:///tmp/sheet.csv"));
        assert!(!is_http_url("./sheet.csv"));
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://example.com/a.csv").is_ok());
        assert!(validate_url("not a url").is_err());
    }
}
