//! Catalog view: the owner of the tree cache and its expansion state.

use super::default_path::{DefaultPath, pick_domain, pick_technology, pick_tutorial};
use crate::domain::expansion::{ExpansionMap, ExpansionState, NodeFlags, ToggleDecision};
use crate::domain::gateway::{CatalogGateway, FetchError, ListFilter};
use crate::domain::level::{Level, NodeKey};
use crate::domain::tree::{CatalogTree, ChildBatch, MergeOutcome, NodeRef};
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Notify, RwLock};
use tracing::{debug, info, warn};

/// State of the root (domain list) fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RootState {
    #[default]
    Idle,
    Loading,
    Ready,
    Failed {
        message: String,
    },
}

/// Result of a toggle or expand request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Children were fetched and merged.
    Fetched { count: usize },
    /// Cached children were shown without any call.
    Shown { count: usize },
    /// The node was collapsed; cached children were kept.
    Hidden,
    /// A fetch for this node is already in flight. Nothing happened.
    AlreadyLoading,
    /// The fetch failed. The node is collapsed again.
    Failed(FetchError),
    /// The node is not in the cache.
    NotFound,
    /// Lessons have no children.
    Leaf,
    /// The view was refreshed while the fetch was in flight; the response
    /// was dropped.
    Stale,
}

impl ToggleOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToggleOutcome::Fetched { .. } => "fetched",
            ToggleOutcome::Shown { .. } => "shown",
            ToggleOutcome::Hidden => "hidden",
            ToggleOutcome::AlreadyLoading => "already_loading",
            ToggleOutcome::Failed(_) => "failed",
            ToggleOutcome::NotFound => "not_found",
            ToggleOutcome::Leaf => "leaf",
            ToggleOutcome::Stale => "stale",
        }
    }
}

/// Result of [`CatalogView::load`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootLoad {
    /// Domains were fetched; `default_path` reports how deep the walk got.
    Loaded {
        domains: usize,
        default_path: DefaultPath,
    },
    /// The root was already loaded in this generation.
    AlreadyLoaded,
    /// Another load is in flight.
    InProgress,
    /// A refresh started while this load was in flight.
    Superseded,
}

/// Point-in-time copy of everything the UI renders.
///
/// Cloning the tree is cheap: child lists are shared with the live view.
#[derive(Debug, Clone)]
pub struct ViewSnapshot {
    pub generation: u64,
    pub root: RootState,
    pub tree: CatalogTree,
    pub expansion: ExpansionMap,
}

impl ViewSnapshot {
    /// Observable state of a cached node.
    pub fn node_state(&self, key: &NodeKey) -> Option<ExpansionState> {
        let children = self.tree.children_state(key)?;
        Some(self.expansion.state(key, children))
    }

    pub fn flags(&self, key: &NodeKey) -> NodeFlags {
        self.expansion.flags(key)
    }
}

#[derive(Debug, Default)]
struct ViewState {
    generation: u64,
    root: RootState,
    tree: CatalogTree,
    expansion: ExpansionMap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Intent {
    /// User toggle: hide if expanded, surface failures.
    Toggle,
    /// Open without ever hiding, surface failures.
    Expand,
    /// Default-path step: open without hiding, fail silently.
    AutoExpand,
}

/// Lazily populated catalog tree plus its expansion state.
///
/// The view exclusively owns both; every mutation goes through
/// [`CatalogView::toggle`], [`CatalogView::expand`], [`CatalogView::load`],
/// [`CatalogView::refresh`] or [`CatalogView::collapse_all`]. State is only
/// locked between gateway calls, never across one, so several fetches for
/// different nodes can be in flight at once while each merge runs to
/// completion without interleaving.
///
/// # Guarantees
///
/// - At most one fetch per node is in flight; toggles meanwhile are no-ops
/// - A node whose children were fetched is never fetched again in the same
///   generation, even if the list was empty
/// - A failed fetch leaves an error marker and the next toggle retries
/// - A refresh bumps the generation; late responses from before it are dropped
pub struct CatalogView<G: CatalogGateway + ?Sized = dyn CatalogGateway> {
    gateway: Arc<G>,
    state: RwLock<ViewState>,
    /// Woken whenever a fetch lands, successful or not.
    landed: Notify,
    default_path: bool,
}

impl<G: CatalogGateway + ?Sized> CatalogView<G> {
    /// Creates an empty view. Nothing is fetched until [`Self::load`].
    pub fn new(gateway: Arc<G>) -> Self {
        Self {
            gateway,
            state: RwLock::new(ViewState::default()),
            landed: Notify::new(),
            default_path: true,
        }
    }

    /// Enables or disables the default-path walk after the root load.
    pub fn with_default_path(mut self, enabled: bool) -> Self {
        self.default_path = enabled;
        self
    }

    /// Fetches the domain list, then walks the default path.
    ///
    /// Runs once per generation: after a successful load further calls
    /// return [`RootLoad::AlreadyLoaded`]. After a failure the root is left in
    /// [`RootState::Failed`] and calling `load` again retries.
    ///
    /// # Errors
    ///
    /// Returns the gateway error if the domain list cannot be fetched. Errors
    /// below the root never surface here.
    pub async fn load(&self) -> Result<RootLoad, FetchError> {
        let generation = {
            let mut state = self.state.write().await;
            match state.root {
                RootState::Loading => return Ok(RootLoad::InProgress),
                RootState::Ready => return Ok(RootLoad::AlreadyLoaded),
                RootState::Idle | RootState::Failed { .. } => {}
            }
            state.root = RootState::Loading;
            state.generation
        };

        counter!("catalog_fetch_total", "level" => "root").increment(1);
        let result = self.gateway.list_domains(&ListFilter::default()).await;

        let (count, picked) = {
            let mut state = self.state.write().await;
            if state.generation != generation {
                debug!(generation, "dropping superseded domain list");
                return Ok(RootLoad::Superseded);
            }

            match result {
                Ok(domains) => {
                    let picked = pick_domain(&domains).map(|d| d.id.clone());
                    let count = domains.len();
                    state.tree.set_domains(domains);
                    state.root = RootState::Ready;
                    (count, picked)
                }
                Err(e) => {
                    counter!("catalog_fetch_failures_total", "level" => "root").increment(1);
                    warn!(error = %e, "failed to load catalog domains");
                    state.root = RootState::Failed {
                        message: e.to_string(),
                    };
                    return Err(e);
                }
            }
        };

        info!(count, generation, "catalog domains loaded");

        let default_path = if self.default_path {
            self.walk_default_path(generation, picked).await
        } else {
            DefaultPath::default()
        };

        Ok(RootLoad::Loaded {
            domains: count,
            default_path,
        })
    }

    /// Re-attempts the root load after a failure.
    ///
    /// On success the default path is walked again from the start.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub async fn retry(&self) -> Result<RootLoad, FetchError> {
        self.load().await
    }

    /// Discards the whole cache and expansion state, then loads again.
    ///
    /// # Errors
    ///
    /// Same as [`Self::load`].
    pub async fn refresh(&self) -> Result<RootLoad, FetchError> {
        {
            let mut state = self.state.write().await;
            let generation = state.generation + 1;
            *state = ViewState {
                generation,
                ..ViewState::default()
            };
            info!(generation, "catalog view reset");
        }
        self.load().await
    }

    /// Toggles a node: fetches, shows or hides its children as needed.
    ///
    /// Fails soft: unknown nodes and gateway errors are reported through the
    /// returned [`ToggleOutcome`], never as a panic or error value.
    pub async fn toggle(&self, key: &NodeKey) -> ToggleOutcome {
        self.activate(key, Intent::Toggle, None).await
    }

    /// Like [`Self::toggle`], but never collapses an expanded node.
    pub async fn expand(&self, key: &NodeKey) -> ToggleOutcome {
        self.activate(key, Intent::Expand, None).await
    }

    /// Collapses every node. Cached children and in-flight fetches are kept.
    pub async fn collapse_all(&self) {
        let mut state = self.state.write().await;
        state.expansion.collapse_all();
        debug!("collapsed all nodes");
    }

    pub async fn snapshot(&self) -> ViewSnapshot {
        let state = self.state.read().await;
        ViewSnapshot {
            generation: state.generation,
            root: state.root.clone(),
            tree: state.tree.clone(),
            expansion: state.expansion.clone(),
        }
    }

    pub async fn root_state(&self) -> RootState {
        self.state.read().await.root.clone()
    }

    /// Observable state of a node, or `None` if it is not cached.
    pub async fn node_state(&self, key: &NodeKey) -> Option<ExpansionState> {
        let state = self.state.read().await;
        let children = state.tree.children_state(key)?;
        Some(state.expansion.state(key, children))
    }

    pub async fn node_flags(&self, key: &NodeKey) -> NodeFlags {
        self.state.read().await.expansion.flags(key)
    }

    async fn activate(
        &self,
        key: &NodeKey,
        intent: Intent,
        expected_generation: Option<u64>,
    ) -> ToggleOutcome {
        let generation = {
            let mut guard = self.state.write().await;
            let state = &mut *guard;

            if expected_generation.is_some_and(|g| g != state.generation) {
                return ToggleOutcome::Stale;
            }

            let Some(node) = state.tree.node(key) else {
                debug!(%key, "toggle on node that is not cached");
                return ToggleOutcome::NotFound;
            };
            if key.level.is_leaf() {
                return ToggleOutcome::Leaf;
            }
            let children = node.children_state();
            let count = node.child_count();

            match state.expansion.decide(key, children) {
                ToggleDecision::AlreadyLoading => {
                    debug!(%key, "fetch already in flight");
                    if intent != Intent::AutoExpand {
                        state.expansion.join_fetch(key);
                    }
                    return ToggleOutcome::AlreadyLoading;
                }
                ToggleDecision::Hide if intent == Intent::Toggle => {
                    state.expansion.hide(key);
                    return ToggleOutcome::Hidden;
                }
                ToggleDecision::Hide => return ToggleOutcome::Shown { count },
                ToggleDecision::Show => {
                    state.expansion.show(key);
                    return ToggleOutcome::Shown { count };
                }
                ToggleDecision::Fetch => {
                    state.expansion.begin_fetch(key);
                    state.generation
                }
            }
        };

        let result = self.fetch_children(key).await;
        let outcome = self.land(key, intent, generation, result).await;
        self.landed.notify_waiters();
        outcome
    }

    /// Applies a fetch result to the state, unless a refresh made it stale.
    async fn land(
        &self,
        key: &NodeKey,
        intent: Intent,
        generation: u64,
        result: Result<ChildBatch, FetchError>,
    ) -> ToggleOutcome {
        let mut guard = self.state.write().await;
        let state = &mut *guard;
        if state.generation != generation {
            debug!(%key, generation, "dropping response from before refresh");
            return ToggleOutcome::Stale;
        }

        match result {
            Ok(batch) => {
                let count = batch.len();
                let merged = state.tree.merge_children(key, batch);
                state.expansion.finish_fetch(key);
                if merged != MergeOutcome::Merged {
                    warn!(%key, ?merged, "fetched children could not be merged");
                    state.expansion.hide(key);
                    return ToggleOutcome::NotFound;
                }
                debug!(%key, count, "children merged");
                ToggleOutcome::Fetched { count }
            }
            Err(e) if intent == Intent::AutoExpand => {
                if state.expansion.flags(key).joined {
                    warn!(%key, error = %e, "failed to fetch children");
                } else {
                    debug!(%key, error = %e, "default path stopped");
                }
                state.expansion.abandon_fetch(key, e.to_string());
                ToggleOutcome::Failed(e)
            }
            Err(e) => {
                warn!(%key, error = %e, "failed to fetch children");
                state.expansion.fail_fetch(key, e.to_string());
                ToggleOutcome::Failed(e)
            }
        }
    }

    async fn fetch_children(&self, key: &NodeKey) -> Result<ChildBatch, FetchError> {
        let filter = ListFilter::default();
        let id = key.id.as_str();
        let level = key.level.as_str();

        counter!("catalog_fetch_total", "level" => level).increment(1);
        let result = match key.level {
            Level::Domain => self
                .gateway
                .list_technologies(id, &filter)
                .await
                .map(ChildBatch::Technologies),
            Level::Technology => self
                .gateway
                .list_tutorials(id, &filter)
                .await
                .map(ChildBatch::Tutorials),
            Level::Tutorial => self
                .gateway
                .list_lessons(id, &filter)
                .await
                .map(ChildBatch::Lessons),
            Level::Lesson => Err(FetchError::Invalid(format!("{key} has no children"))),
        };

        if result.is_err() {
            counter!("catalog_fetch_failures_total", "level" => level).increment(1);
        }
        result
    }

    /// Opens domain → "html" technology → first tutorial, one step at a time.
    ///
    /// Each step waits for the previous fetch. The walk stops silently at the
    /// first missing candidate or failed fetch. A step that meets a user
    /// fetch in flight for its node waits for that fetch instead of issuing
    /// a second one.
    async fn walk_default_path(&self, generation: u64, domain: Option<String>) -> DefaultPath {
        let mut path = DefaultPath::default();

        let Some(domain_id) = domain else {
            debug!("no domain matches the default path");
            return path;
        };
        let key = NodeKey::domain(domain_id);
        if !self.open_default_step(&key, generation).await {
            return path;
        }
        path.domain = Some(key.id);

        let technology = self
            .read_tree(|tree| match tree.node(&NodeKey::domain(path.domain.as_deref()?)) {
                Some(NodeRef::Domain(node)) => {
                    let records = node.technologies.items()?.iter().map(|t| &t.record);
                    pick_technology(records).map(|t| t.id.clone())
                }
                _ => None,
            })
            .await;
        let Some(technology_id) = technology else {
            debug!("no technology matches the default path");
            return path;
        };
        let key = NodeKey::technology(technology_id);
        if !self.open_default_step(&key, generation).await {
            return path;
        }
        path.technology = Some(key.id);

        let tutorial = self
            .read_tree(
                |tree| match tree.node(&NodeKey::technology(path.technology.as_deref()?)) {
                    Some(NodeRef::Technology(node)) => {
                        let records = node.tutorials.items()?.iter().map(|u| &u.record);
                        pick_tutorial(records).map(|u| u.id.clone())
                    }
                    _ => None,
                },
            )
            .await;
        let Some(tutorial_id) = tutorial else {
            return path;
        };
        let key = NodeKey::tutorial(tutorial_id);
        if self.open_default_step(&key, generation).await {
            path.tutorial = Some(key.id);
        }

        info!(depth = path.depth(), "default path opened");
        path
    }

    /// Opens one default-path node.
    ///
    /// If a user fetch for the node is in flight, waits for it to land and
    /// continues only if it left the node open.
    async fn open_default_step(&self, key: &NodeKey, generation: u64) -> bool {
        loop {
            let landed = self.landed.notified();
            tokio::pin!(landed);
            landed.as_mut().enable();

            match self
                .activate(key, Intent::AutoExpand, Some(generation))
                .await
            {
                ToggleOutcome::Fetched { .. } | ToggleOutcome::Shown { .. } => return true,
                ToggleOutcome::AlreadyLoading => {
                    debug!(%key, "default path waiting for in-flight fetch");
                    landed.await;
                    let state = self.state.read().await;
                    if state.generation != generation {
                        return false;
                    }
                    let flags = state.expansion.flags(key);
                    if flags.loading {
                        continue;
                    }
                    if !flags.expanded {
                        debug!(%key, "default path stopped after user fetch");
                        return false;
                    }
                }
                _ => return false,
            }
        }
    }

    async fn read_tree<T>(&self, f: impl FnOnce(&CatalogTree) -> Option<T>) -> Option<T> {
        let state = self.state.read().await;
        f(&state.tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Domain, Lesson, Technology, Tutorial};
    use crate::domain::gateway::MockCatalogGateway;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn web_domains() -> Vec<Domain> {
        vec![
            Domain::new("d1", "Web Development"),
            Domain::new("d2", "Programming"),
        ]
    }

    fn lesson_ids(snapshot: &ViewSnapshot, tutorial_id: &str) -> Vec<String> {
        match snapshot.tree.node(&NodeKey::tutorial(tutorial_id)) {
            Some(NodeRef::Tutorial(node)) => node
                .lessons
                .items()
                .unwrap_or(&[])
                .iter()
                .map(|l| l.id.clone())
                .collect(),
            _ => vec![],
        }
    }

    #[tokio::test]
    async fn test_load_walks_default_path() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .withf(|id, _| id == "d1")
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    Technology::new("t1", "HTML", "d1"),
                    Technology::new("t2", "CSS", "d1"),
                ])
            });
        mock.expect_list_tutorials()
            .withf(|id, _| id == "t1")
            .times(1)
            .returning(|_, _| Ok(vec![Tutorial::new("u1", "Intro", "t1")]));
        mock.expect_list_lessons()
            .withf(|id, _| id == "u1")
            .times(1)
            .returning(|_, _| {
                Ok(vec![
                    Lesson::new("l2", "B", "u1").with_order(2),
                    Lesson::new("l1", "A", "u1").with_order(1),
                ])
            });

        let view = CatalogView::new(Arc::new(mock));
        let result = view.load().await.unwrap();

        assert_eq!(
            result,
            RootLoad::Loaded {
                domains: 2,
                default_path: DefaultPath {
                    domain: Some("d1".into()),
                    technology: Some("t1".into()),
                    tutorial: Some("u1".into()),
                },
            }
        );

        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.root, RootState::Ready);
        assert_eq!(lesson_ids(&snapshot, "u1"), vec!["l1", "l2"]);
        assert_eq!(
            snapshot.node_state(&NodeKey::domain("d1")),
            Some(ExpansionState::ExpandedPopulated)
        );
        assert_eq!(
            snapshot.node_state(&NodeKey::technology("t1")),
            Some(ExpansionState::ExpandedPopulated)
        );
        assert_eq!(
            snapshot.node_state(&NodeKey::tutorial("u1")),
            Some(ExpansionState::ExpandedPopulated)
        );
        assert_eq!(
            snapshot.node_state(&NodeKey::domain("d2")),
            Some(ExpansionState::Collapsed)
        );
    }

    #[tokio::test]
    async fn test_default_path_stops_without_matching_domain() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(vec![Domain::new("d9", "Data Science")]));

        let view = CatalogView::new(Arc::new(mock));
        let result = view.load().await.unwrap();

        assert_eq!(
            result,
            RootLoad::Loaded {
                domains: 1,
                default_path: DefaultPath::default(),
            }
        );
    }

    #[tokio::test]
    async fn test_default_path_stops_without_html() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .times(1)
            .returning(|_, _| Ok(vec![Technology::new("t2", "CSS", "d1")]));

        let view = CatalogView::new(Arc::new(mock));
        let RootLoad::Loaded { default_path, .. } = view.load().await.unwrap() else {
            panic!("expected a fresh load");
        };

        assert_eq!(default_path.domain.as_deref(), Some("d1"));
        assert_eq!(default_path.technology, None);
        assert_eq!(default_path.depth(), 1);
    }

    #[tokio::test]
    async fn test_default_path_failure_is_silent() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .times(1)
            .returning(|_, _| Err(FetchError::Timeout));

        let view = CatalogView::new(Arc::new(mock));
        let result = view.load().await;

        assert!(matches!(
            result,
            Ok(RootLoad::Loaded { ref default_path, .. }) if default_path.depth() == 0
        ));
        assert_eq!(view.root_state().await, RootState::Ready);
        let flags = view.node_flags(&NodeKey::domain("d1")).await;
        assert_eq!(flags.error, None);
        assert!(!flags.loading);
        assert_eq!(
            view.node_state(&NodeKey::domain("d1")).await,
            Some(ExpansionState::Collapsed)
        );
    }

    #[tokio::test]
    async fn test_fetch_once_then_cached() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .withf(|id, _| id == "d2")
            .times(1)
            .returning(|_, _| Ok(vec![Technology::new("t7", "Rust", "d2")]));

        let view = CatalogView::new(Arc::new(mock)).with_default_path(false);
        view.load().await.unwrap();
        let d2 = NodeKey::domain("d2");

        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Fetched { count: 1 });
        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Hidden);
        assert_eq!(
            view.node_state(&d2).await,
            Some(ExpansionState::CollapsedAfterExpand)
        );
        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Shown { count: 1 });
        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Hidden);
        assert_eq!(view.expand(&d2).await, ToggleOutcome::Shown { count: 1 });
        assert_eq!(view.expand(&d2).await, ToggleOutcome::Shown { count: 1 });
    }

    #[tokio::test]
    async fn test_empty_branch_is_not_refetched() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let view = CatalogView::new(Arc::new(mock)).with_default_path(false);
        view.load().await.unwrap();
        let d2 = NodeKey::domain("d2");

        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Fetched { count: 0 });
        assert_eq!(
            view.node_state(&d2).await,
            Some(ExpansionState::ExpandedEmpty)
        );
        view.toggle(&d2).await;
        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Shown { count: 0 });
    }

    #[tokio::test]
    async fn test_failed_fetch_marks_error_and_retries() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .withf(|id, _| id == "d1")
            .times(2)
            .returning(move |_, _| {
                if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(FetchError::Unavailable("connection reset".into()))
                } else {
                    Ok(vec![Technology::new("t1", "HTML", "d1")])
                }
            });

        let view = CatalogView::new(Arc::new(mock)).with_default_path(false);
        view.load().await.unwrap();
        let d1 = NodeKey::domain("d1");
        let d2 = NodeKey::domain("d2");

        let outcome = view.toggle(&d1).await;
        assert!(matches!(outcome, ToggleOutcome::Failed(FetchError::Unavailable(_))));
        assert_eq!(view.node_state(&d1).await, Some(ExpansionState::Collapsed));
        assert!(view.node_flags(&d1).await.error.is_some());
        assert_eq!(view.node_flags(&d2).await, NodeFlags::default());

        assert_eq!(view.toggle(&d1).await, ToggleOutcome::Fetched { count: 1 });
        assert_eq!(view.node_flags(&d1).await.error, None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_root_failure_then_retry_runs_default_path() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();

        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains().times(2).returning(move |_| {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(FetchError::Unavailable("offline".into()))
            } else {
                Ok(web_domains())
            }
        });
        mock.expect_list_technologies()
            .withf(|id, _| id == "d1")
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let view = CatalogView::new(Arc::new(mock));

        assert!(view.load().await.is_err());
        assert!(matches!(
            view.root_state().await,
            RootState::Failed { .. }
        ));
        assert_eq!(
            view.toggle(&NodeKey::domain("d1")).await,
            ToggleOutcome::NotFound
        );

        let result = view.retry().await.unwrap();
        assert!(matches!(
            result,
            RootLoad::Loaded { domains: 2, ref default_path } if default_path.depth() == 1
        ));
        assert_eq!(view.root_state().await, RootState::Ready);
        assert_eq!(view.load().await.unwrap(), RootLoad::AlreadyLoaded);
    }

    #[tokio::test]
    async fn test_leaf_and_unknown_nodes_never_fetch() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .times(1)
            .returning(|_, _| Ok(vec![Technology::new("t1", "HTML", "d1")]));
        mock.expect_list_tutorials()
            .times(1)
            .returning(|_, _| Ok(vec![Tutorial::new("u1", "Intro", "t1")]));
        mock.expect_list_lessons()
            .times(1)
            .returning(|_, _| Ok(vec![Lesson::new("l1", "Tags", "u1")]));

        let view = CatalogView::new(Arc::new(mock));
        view.load().await.unwrap();

        assert_eq!(
            view.toggle(&NodeKey::lesson("l1")).await,
            ToggleOutcome::Leaf
        );
        assert_eq!(
            view.toggle(&NodeKey::technology("nope")).await,
            ToggleOutcome::NotFound
        );
    }

    #[tokio::test]
    async fn test_collapse_all_keeps_cache() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(1)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .times(1)
            .returning(|_, _| Ok(vec![Technology::new("t2", "CSS", "d1")]));

        let view = CatalogView::new(Arc::new(mock));
        view.load().await.unwrap();
        let d1 = NodeKey::domain("d1");
        assert_eq!(
            view.node_state(&d1).await,
            Some(ExpansionState::ExpandedPopulated)
        );

        view.collapse_all().await;

        assert_eq!(
            view.node_state(&d1).await,
            Some(ExpansionState::CollapsedAfterExpand)
        );
        assert_eq!(view.toggle(&d1).await, ToggleOutcome::Shown { count: 1 });
    }

    #[tokio::test]
    async fn test_refresh_discards_cache() {
        let mut mock = MockCatalogGateway::new();
        mock.expect_list_domains()
            .times(2)
            .returning(|_| Ok(web_domains()));
        mock.expect_list_technologies()
            .withf(|id, _| id == "d2")
            .times(2)
            .returning(|_, _| Ok(vec![Technology::new("t7", "Rust", "d2")]));

        let view = CatalogView::new(Arc::new(mock)).with_default_path(false);
        view.load().await.unwrap();
        let d2 = NodeKey::domain("d2");
        view.toggle(&d2).await;

        let result = view.refresh().await.unwrap();

        assert!(matches!(result, RootLoad::Loaded { domains: 2, .. }));
        let snapshot = view.snapshot().await;
        assert_eq!(snapshot.generation, 1);
        assert_eq!(snapshot.node_state(&d2), Some(ExpansionState::Collapsed));
        assert_eq!(view.toggle(&d2).await, ToggleOutcome::Fetched { count: 1 });
    }

    /// Answers technology queries only once the gate is opened.
    struct HeldGateway {
        gate: tokio::sync::watch::Sender<bool>,
        technology_calls: AtomicUsize,
        fail_technologies: bool,
    }

    impl HeldGateway {
        fn new(fail_technologies: bool) -> Self {
            Self {
                gate: tokio::sync::watch::channel(false).0,
                technology_calls: AtomicUsize::new(0),
                fail_technologies,
            }
        }
    }

    #[async_trait::async_trait]
    impl CatalogGateway for HeldGateway {
        async fn list_domains(&self, _: &ListFilter) -> Result<Vec<Domain>, FetchError> {
            Ok(web_domains())
        }

        async fn list_technologies(
            &self,
            domain_id: &str,
            _: &ListFilter,
        ) -> Result<Vec<Technology>, FetchError> {
            self.technology_calls.fetch_add(1, Ordering::SeqCst);
            let mut gate = self.gate.subscribe();
            if gate.wait_for(|open| *open).await.is_err() {
                return Err(FetchError::Unavailable("gate dropped".into()));
            }
            if self.fail_technologies {
                return Err(FetchError::Unavailable("connection reset".into()));
            }
            Ok(vec![Technology::new("t1", "HTML", domain_id)])
        }

        async fn list_tutorials(
            &self,
            technology_id: &str,
            _: &ListFilter,
        ) -> Result<Vec<Tutorial>, FetchError> {
            Ok(vec![Tutorial::new("u1", "Intro", technology_id)])
        }

        async fn list_lessons(
            &self,
            _: &str,
            _: &ListFilter,
        ) -> Result<Vec<Lesson>, FetchError> {
            Ok(vec![])
        }
    }

    async fn walk_behind_user_fetch(
        gateway: Arc<HeldGateway>,
    ) -> (Arc<CatalogView<HeldGateway>>, DefaultPath, ToggleOutcome) {
        let view = Arc::new(CatalogView::new(gateway.clone()).with_default_path(false));
        view.load().await.unwrap();
        let d1 = NodeKey::domain("d1");

        let user = {
            let view = view.clone();
            let d1 = d1.clone();
            tokio::spawn(async move { view.toggle(&d1).await })
        };
        while !view.node_flags(&d1).await.loading {
            tokio::task::yield_now().await;
        }

        let walk = {
            let view = view.clone();
            tokio::spawn(async move { view.walk_default_path(0, Some("d1".to_string())).await })
        };
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
        gateway.gate.send_replace(true);

        let outcome = user.await.unwrap();
        let path = walk.await.unwrap();
        (view, path, outcome)
    }

    #[tokio::test]
    async fn test_default_path_waits_for_user_fetch_then_continues() {
        let gateway = Arc::new(HeldGateway::new(false));

        let (view, path, outcome) = walk_behind_user_fetch(gateway.clone()).await;

        assert_eq!(outcome, ToggleOutcome::Fetched { count: 1 });
        assert_eq!(path.depth(), 3);
        assert_eq!(gateway.technology_calls.load(Ordering::SeqCst), 1);
        assert_eq!(
            view.node_state(&NodeKey::tutorial("u1")).await,
            Some(ExpansionState::ExpandedEmpty)
        );
    }

    #[tokio::test]
    async fn test_default_path_stops_when_user_fetch_fails() {
        let gateway = Arc::new(HeldGateway::new(true));

        let (view, path, outcome) = walk_behind_user_fetch(gateway.clone()).await;

        assert!(matches!(outcome, ToggleOutcome::Failed(_)));
        assert_eq!(path.depth(), 0);
        assert_eq!(gateway.technology_calls.load(Ordering::SeqCst), 1);
        assert!(view.node_flags(&NodeKey::domain("d1")).await.error.is_some());
    }
}
