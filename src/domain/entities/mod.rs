//! Core domain entities representing the business data model.
//!
//! Entities are plain data structures without business logic. Creation input
//! lives in a separate `New*` struct so the store can assign identifiers and
//! timestamps.

pub mod link;

pub use link::{Link, NewLink};
