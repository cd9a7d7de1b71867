//! Shared state injected into every handler.

use std::sync::Arc;

use chrono_tz::Tz;

use crate::application::services::{ExportService, LinkService};
use crate::domain::repositories::LinkRepository;
use crate::infrastructure::export::ExportStorage;

#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub export_service: Arc<ExportService>,
}

impl AppState {
    pub fn new(link_service: Arc<LinkService>, export_service: Arc<ExportService>) -> Self {
        Self {
            link_service,
            export_service,
        }
    }

    /// Wires both services over one link store.
    pub fn build(
        link_repository: Arc<dyn LinkRepository>,
        export_storage: Arc<dyn ExportStorage>,
        export_timezone: Tz,
        public_base_url: &str,
    ) -> Self {
        let link_service = Arc::new(LinkService::new(link_repository.clone(), public_base_url));
        let export_service = Arc::new(ExportService::new(
            link_repository,
            export_storage,
            export_timezone,
            public_base_url,
        ));

        Self::new(link_service, export_service)
    }
}
