//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated via
//! `mockall` for unit tests.
//!
//! # Testing
//!
//! See integration tests in `tests/repository_link.rs` for usage examples.

pub mod link_repository;

pub use link_repository::{
    LinkFilter, LinkRepository, LinkSort, SortDirection, SortField, StoreError,
};

#[cfg(test)]
pub use link_repository::MockLinkRepository;
