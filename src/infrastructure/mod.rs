//! Infrastructure layer for external integrations.
//!
//! This layer implements interfaces defined by the domain layer.
//!
//! # Modules
//!
//! - [`export`] - Report storage (local filesystem)
//! - [`persistence`] - Link store implementations (PostgreSQL and in-memory)

pub mod export;
pub mod persistence;
