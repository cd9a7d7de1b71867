//! Destination URL validation.
//!
//! Destinations are stored exactly as submitted; validation only decides
//! whether a string is acceptable as a redirect target.

use url::Url;

/// Errors that can occur while validating a destination URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlValidationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,

    #[error("URL must include a host")]
    MissingHost,

    #[error("URL must not contain whitespace or control characters")]
    InvalidCharacters,
}

/// Checks that `input` is an absolute HTTP(S) URL with a host.
///
/// Rejects relative references and schemes such as `javascript:`, `data:` or
/// `file:` that must never be used as redirect targets. Whitespace and control
/// characters are rejected up front: the parser silently drops tabs and
/// newlines, so the raw string would differ from what was checked.
///
/// # Examples
///
/// ```ignore
/// assert!(validate_destination_url("https://example.com/path?q=1").is_ok());
/// assert!(validate_destination_url("/relative").is_err());
/// assert!(validate_destination_url("javascript:alert(1)").is_err());
/// ```
pub fn validate_destination_url(input: &str) -> Result<Url, UrlValidationError> {
    if input
        .chars()
        .any(|c| c.is_whitespace() || c.is_control())
    {
        return Err(UrlValidationError::InvalidCharacters);
    }

    let url = Url::parse(input).map_err(|e| UrlValidationError::InvalidFormat(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => return Err(UrlValidationError::UnsupportedProtocol),
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(UrlValidationError::MissingHost);
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_http_and_https() {
        assert!(validate_destination_url("http://example.com").is_ok());
        assert!(validate_destination_url("https://example.com/very/long/path").is_ok());
    }

    #[test]
    fn test_accepts_query_fragment_and_port() {
        assert!(validate_destination_url("https://example.com:8443/a?b=c#d").is_ok());
        assert!(validate_destination_url("http://192.168.1.1:8080/api").is_ok());
        assert!(validate_destination_url("http://localhost:3000/test").is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        let result = validate_destination_url("invalid-url-%$*!@");
        assert!(matches!(
            result.unwrap_err(),
            UrlValidationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_rejects_relative_reference() {
        assert!(matches!(
            validate_destination_url("/just/a/path").unwrap_err(),
            UrlValidationError::InvalidFormat(_)
        ));
    }

    #[test]
    fn test_rejects_dangerous_schemes() {
        for input in [
            "javascript:alert(1)",
            "data:text/html,hi",
            "file:///etc/passwd",
            "ftp://example.com/file.txt",
        ] {
            assert!(
                matches!(
                    validate_destination_url(input).unwrap_err(),
                    UrlValidationError::UnsupportedProtocol
                ),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_whitespace_and_control_characters() {
        for input in [
            "https://example.com/a\nb",
            "https://example.com/a\tb",
            "https://example.com/a\r\nSet-Cookie:x=1",
            " https://example.com",
            "https://example.com/a b",
            "https://example.com/\u{0}",
        ] {
            assert!(
                matches!(
                    validate_destination_url(input).unwrap_err(),
                    UrlValidationError::InvalidCharacters
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_accepts_non_ascii_path() {
        assert!(validate_destination_url("https://example.com/caf\u{e9}").is_ok());
    }

    #[test]
    fn test_does_not_rewrite_input() {
        let url = validate_destination_url("HTTPS://EXAMPLE.COM:443/Path").unwrap();
        // The parsed form is only used for checks; callers keep the original string.
        assert_eq!(url.host_str(), Some("example.com"));
    }
}
