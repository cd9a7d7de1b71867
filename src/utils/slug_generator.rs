//! Slug generation and validation utilities.
//!
//! Generated slugs combine a short digest of the destination URL with random
//! characters, so identical URLs share a prefix but still get distinct slugs.

use crate::error::AppError;
use rand::Rng;
use serde_json::json;
use sha2::{Digest, Sha256};

/// Number of hex characters taken from the URL digest.
pub const HASH_PREFIX_LENGTH: usize = 4;

/// Number of random characters appended after the digest prefix.
pub const RANDOM_SUFFIX_LENGTH: usize = 4;

/// Total length of a generated slug.
pub const GENERATED_SLUG_LENGTH: usize = HASH_PREFIX_LENGTH + RANDOM_SUFFIX_LENGTH;

/// URL-safe alphabet for the random part of a generated slug.
const URL_SAFE_ALPHABET: &[u8; 64] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789_-";

/// Slugs that would be shadowed by fixed routes.
pub const RESERVED_SLUGS: &[&str] = &["api", "health", "exports"];

/// Generates a slug for `original_url`.
///
/// The first [`HASH_PREFIX_LENGTH`] characters are the lowercase hex SHA-256
/// digest of the URL; the rest are drawn from the URL-safe alphabet. The
/// result is not guaranteed to be unique; the store's unique index decides.
///
/// # Examples
///
/// ```ignore
/// let slug = generate_slug("https://example.com/very/long/path");
/// assert_eq!(slug.len(), 8);
/// ```
pub fn generate_slug(original_url: &str) -> String {
    let mut slug = String::with_capacity(GENERATED_SLUG_LENGTH);
    slug.push_str(&url_digest_prefix(original_url));
    slug.push_str(&random_suffix(RANDOM_SUFFIX_LENGTH));
    slug
}

/// Stable hex prefix derived from the destination URL.
pub fn url_digest_prefix(original_url: &str) -> String {
    let digest = Sha256::digest(original_url.as_bytes());
    let mut prefix = hex::encode(digest);
    prefix.truncate(HASH_PREFIX_LENGTH);
    prefix
}

/// Random string of `len` characters from the URL-safe alphabet.
pub fn random_suffix(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| URL_SAFE_ALPHABET[rng.random_range(0..URL_SAFE_ALPHABET.len())] as char)
        .collect()
}

/// Validates a caller-supplied slug.
///
/// # Rules
///
/// - One or more characters
/// - Only lowercase ASCII letters and digits
/// - Not one of [`RESERVED_SLUGS`]
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_slug(slug: &str) -> Result<(), AppError> {
    if slug.is_empty() {
        return Err(AppError::bad_request(
            "Slug must not be empty",
            json!({ "slug": slug }),
        ));
    }

    if !slug
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        return Err(AppError::bad_request(
            "Slug can only contain lowercase letters and digits",
            json!({ "slug": slug }),
        ));
    }

    if RESERVED_SLUGS.contains(&slug) {
        return Err(AppError::bad_request(
            "This slug is reserved",
            json!({ "slug": slug }),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn is_url_safe(c: char) -> bool {
        c.is_ascii_alphanumeric() || c == '-' || c == '_'
    }

    #[test]
    fn test_generate_slug_has_fixed_length() {
        let slug = generate_slug("https://example.com/very/long/path");
        assert_eq!(slug.len(), GENERATED_SLUG_LENGTH);
    }

    #[test]
    fn test_generate_slug_url_safe_characters() {
        for _ in 0..200 {
            let slug = generate_slug("https://example.com");
            assert!(slug.chars().all(is_url_safe), "unexpected slug {slug}");
        }
    }

    #[test]
    fn test_generate_slug_prefix_is_stable_per_url() {
        let a = generate_slug("https://example.com/a");
        let b = generate_slug("https://example.com/a");

        assert_eq!(a[..HASH_PREFIX_LENGTH], b[..HASH_PREFIX_LENGTH]);
        assert_eq!(
            &a[..HASH_PREFIX_LENGTH],
            url_digest_prefix("https://example.com/a")
        );
    }

    #[test]
    fn test_digest_prefix_is_sha256_hex() {
        // sha256("abc") = ba7816bf...
        assert_eq!(url_digest_prefix("abc"), "ba78");
    }

    #[test]
    fn test_generate_slug_random_part_differs() {
        let slugs: HashSet<String> = (0..1000)
            .map(|_| generate_slug("https://example.com"))
            .collect();

        // 64^4 possible suffixes; a handful of birthday collisions is fine.
        assert!(slugs.len() > 990);
    }

    #[test]
    fn test_random_suffix_length() {
        assert_eq!(random_suffix(0), "");
        assert_eq!(random_suffix(12).len(), 12);
    }

    #[test]
    fn test_validate_lowercase_and_digits() {
        assert!(validate_custom_slug("promo2025").is_ok());
        assert!(validate_custom_slug("a").is_ok());
        assert!(validate_custom_slug("12345678").is_ok());
    }

    #[test]
    fn test_validate_empty_string() {
        let err = validate_custom_slug("").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_validate_uppercase_letters() {
        let err = validate_custom_slug("MySlug").unwrap_err();
        assert!(err.to_string().contains("lowercase"));
    }

    #[test]
    fn test_validate_separators_not_allowed() {
        assert!(validate_custom_slug("my-link").is_err());
        assert!(validate_custom_slug("my_link").is_err());
        assert!(validate_custom_slug("my link").is_err());
        assert!(validate_custom_slug("path/seg").is_err());
    }

    #[test]
    fn test_validate_non_ascii_rejected() {
        assert!(validate_custom_slug("caf\u{e9}").is_err());
    }

    #[test]
    fn test_validate_all_reserved_slugs() {
        for &reserved in RESERVED_SLUGS {
            assert!(
                validate_custom_slug(reserved).is_err(),
                "Reserved slug '{}' should be invalid",
                reserved
            );
        }
    }
}
