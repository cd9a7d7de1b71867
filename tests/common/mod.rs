#![allow(dead_code)]

use axum_test::TestServer;
use chrono_tz::Tz;
use link_shortener::domain::entities::{Link, NewLink};
use link_shortener::domain::repositories::LinkRepository;
use link_shortener::infrastructure::export::LocalExportStorage;
use link_shortener::infrastructure::persistence::InMemoryLinkRepository;
use link_shortener::routes::router;
use link_shortener::state::AppState;
use std::sync::Arc;
use tempfile::TempDir;

pub const BASE_URL: &str = "http://sho.rt";

/// A full application over an in-memory store, with reports written to a
/// temporary directory that lives as long as this value.
pub struct TestApp {
    pub server: TestServer,
    pub repo: Arc<InMemoryLinkRepository>,
    pub export_dir: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let repo = Arc::new(InMemoryLinkRepository::new());
        let export_dir = tempfile::tempdir().unwrap();

        let state = create_test_state(repo.clone(), &export_dir).await;
        let server = TestServer::new(router(state, export_dir.path())).unwrap();

        Self {
            server,
            repo,
            export_dir,
        }
    }

    pub async fn seed(&self, slug: &str, url: &str) -> Link {
        create_test_link(self.repo.as_ref(), slug, url).await
    }
}

pub async fn create_test_state(repo: Arc<dyn LinkRepository>, export_dir: &TempDir) -> AppState {
    let storage = LocalExportStorage::new(export_dir.path(), BASE_URL)
        .await
        .unwrap();

    AppState::build(repo, Arc::new(storage), Tz::UTC, BASE_URL)
}

pub async fn create_test_link(repo: &dyn LinkRepository, slug: &str, url: &str) -> Link {
    repo.insert(NewLink {
        slug: slug.to_string(),
        original_url: url.to_string(),
    })
    .await
    .unwrap()
}
