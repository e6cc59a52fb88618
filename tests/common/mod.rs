#![allow(dead_code)]

use async_trait::async_trait;
use catalog_navigator::application::services::CatalogView;
use catalog_navigator::domain::entities::{Domain, Lesson, Technology, Tutorial};
use catalog_navigator::domain::gateway::{CatalogGateway, FetchError, ListFilter};
use catalog_navigator::infrastructure::gateway::{CatalogFixture, InMemoryGateway};
use catalog_navigator::state::AppState;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

pub fn fixture() -> CatalogFixture {
    CatalogFixture {
        domains: vec![
            Domain::new("d1", "Web Development"),
            Domain::new("d2", "Programming"),
            Domain::new("d3", "Data Science"),
        ],
        technologies: vec![
            Technology::new("t1", "HTML", "d1"),
            Technology::new("t2", "CSS", "d1"),
            Technology::new("t7", "Rust", "d2"),
        ],
        tutorials: vec![
            Tutorial::new("u1", "HTML Basics", "t1"),
            Tutorial::new("u2", "Forms", "t1"),
            Tutorial::new("u7", "Ownership", "t7"),
        ],
        lessons: vec![
            Lesson::new("l2", "Headings", "u1").with_order(2),
            Lesson::new("l1", "Structure", "u1").with_order(1),
            Lesson::new("l9", "Borrowing", "u7").with_duration(20),
        ],
    }
}

/// View over the standard fixture, as the server wires it.
pub fn create_test_state(default_path: bool) -> AppState {
    let gateway: Arc<dyn CatalogGateway> = Arc::new(InMemoryGateway::new(fixture()));
    let view = CatalogView::new(gateway).with_default_path(default_path);
    AppState::new(Arc::new(view))
}

/// State whose domain list can never be fetched.
pub fn create_offline_state() -> AppState {
    let gateway: Arc<dyn CatalogGateway> = Arc::new(OfflineGateway);
    AppState::new(Arc::new(CatalogView::new(gateway)))
}

pub struct OfflineGateway;

#[async_trait]
impl CatalogGateway for OfflineGateway {
    async fn list_domains(&self, _: &ListFilter) -> Result<Vec<Domain>, FetchError> {
        Err(FetchError::Unavailable("catalog offline".into()))
    }

    async fn list_technologies(&self, _: &str, _: &ListFilter) -> Result<Vec<Technology>, FetchError> {
        Err(FetchError::Unavailable("catalog offline".into()))
    }

    async fn list_tutorials(&self, _: &str, _: &ListFilter) -> Result<Vec<Tutorial>, FetchError> {
        Err(FetchError::Unavailable("catalog offline".into()))
    }

    async fn list_lessons(&self, _: &str, _: &ListFilter) -> Result<Vec<Lesson>, FetchError> {
        Err(FetchError::Unavailable("catalog offline".into()))
    }
}

/// Fixture gateway whose child queries block until the gate is opened.
///
/// Domain lists are answered immediately. Every call is counted per parent
/// id, and parents listed in `failing` answer with `Unavailable`.
pub struct GatedGateway {
    inner: InMemoryGateway,
    gate: watch::Sender<bool>,
    calls: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
}

impl GatedGateway {
    pub fn new() -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            inner: InMemoryGateway::new(fixture()),
            gate,
            calls: Mutex::new(HashMap::new()),
            failing: Mutex::new(HashSet::new()),
        }
    }

    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    pub fn fail(&self, parent_id: &str) {
        self.failing.lock().unwrap().insert(parent_id.to_string());
    }

    pub fn recover(&self, parent_id: &str) {
        self.failing.lock().unwrap().remove(parent_id);
    }

    pub fn calls(&self, parent_id: &str) -> usize {
        self.calls.lock().unwrap().get(parent_id).copied().unwrap_or(0)
    }

    async fn enter(&self, parent_id: &str) -> Result<(), FetchError> {
        *self
            .calls
            .lock()
            .unwrap()
            .entry(parent_id.to_string())
            .or_default() += 1;

        let mut gate = self.gate.subscribe();
        gate.wait_for(|open| *open)
            .await
            .map_err(|_| FetchError::Unavailable("gate dropped".into()))?;

        if self.failing.lock().unwrap().contains(parent_id) {
            return Err(FetchError::Unavailable(format!("{parent_id} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogGateway for GatedGateway {
    async fn list_domains(&self, filter: &ListFilter) -> Result<Vec<Domain>, FetchError> {
        *self.calls.lock().unwrap().entry("root".to_string()).or_default() += 1;
        self.inner.list_domains(filter).await
    }

    async fn list_technologies(
        &self,
        domain_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Technology>, FetchError> {
        self.enter(domain_id).await?;
        self.inner.list_technologies(domain_id, filter).await
    }

    async fn list_tutorials(
        &self,
        technology_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Tutorial>, FetchError> {
        self.enter(technology_id).await?;
        self.inner.list_tutorials(technology_id, filter).await
    }

    async fn list_lessons(
        &self,
        tutorial_id: &str,
        filter: &ListFilter,
    ) -> Result<Vec<Lesson>, FetchError> {
        self.enter(tutorial_id).await?;
        self.inner.list_lessons(tutorial_id, filter).await
    }
}
