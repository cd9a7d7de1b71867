//! Helper functions used across the application.
//!
//! - [`slug_generator`] - Slug generation and validation
//! - [`url_validator`] - Destination URL checks
//! - [`db_error`] - SQLx error classification

pub mod db_error;
pub mod slug_generator;
pub mod url_validator;
