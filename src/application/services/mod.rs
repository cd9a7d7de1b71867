//! Business logic services for the application layer.

pub mod export_service;
pub mod link_service;

pub use export_service::{ExportReport, ExportService};
pub use link_service::{LinkPage, LinkService, ListLinksQuery};
