//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::link_service::LinkService`] - Link creation, resolution, deletion and listing
//! - [`services::export_service::ExportService`] - CSV reports of stored links

pub mod services;
