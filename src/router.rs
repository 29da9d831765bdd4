// src/router.rs
//! Drives navigation: matches a location against the [`RouteTree`], runs the
//! loaders of the matched chain, and commits the outcome.
//!
//! Every navigation takes a new generation number from a `watch` channel. A
//! loader in flight races against that channel; as soon as a newer navigation
//! starts, the older one is dropped and reported as [`Navigation::Superseded`]
//! without touching the committed state.
use crate::errors::NavigationError;
use crate::loader::LoaderData;
use crate::routes::{RouteId, RouteMatch, RouteTree};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationState {
    Idle,
    Loading { location: String },
}

#[derive(Debug)]
pub struct ResolvedRoute {
    location: String,
    route: RouteMatch,
    data: HashMap<RouteId, LoaderData>,
}

impl ResolvedRoute {
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn route(&self) -> &RouteMatch {
        &self.route
    }

    pub fn data_for(&self, id: RouteId) -> Option<&LoaderData> {
        self.data.get(&id)
    }

    /// Data produced for the leaf route, if it has a loader.
    pub fn leaf_data(&self) -> Option<&LoaderData> {
        self.data_for(self.route.leaf())
    }
}

#[derive(Debug)]
pub enum RouteOutcome {
    Ready(ResolvedRoute),
    Failed { location: String, error: NavigationError },
}

impl RouteOutcome {
    pub fn location(&self) -> &str {
        match self {
            RouteOutcome::Ready(resolved) => resolved.location(),
            RouteOutcome::Failed { location, .. } => location,
        }
    }

    pub fn error(&self) -> Option<&NavigationError> {
        match self {
            RouteOutcome::Ready(_) => None,
            RouteOutcome::Failed { error, .. } => Some(error),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Navigation {
    Committed(Arc<RouteOutcome>),
    Superseded { location: String },
}

#[derive(Debug)]
struct RouterState {
    navigation: NavigationState,
    committed: Option<Arc<RouteOutcome>>,
}

pub struct Router {
    tree: Arc<RouteTree>,
    generation: watch::Sender<u64>,
    state: RwLock<RouterState>,
}

impl Router {
    pub fn new(tree: Arc<RouteTree>) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            tree,
            generation,
            state: RwLock::new(RouterState { navigation: NavigationState::Idle, committed: None }),
        }
    }

    pub fn tree(&self) -> &Arc<RouteTree> {
        &self.tree
    }

    pub async fn state(&self) -> NavigationState {
        self.state.read().await.navigation.clone()
    }

    /// The last committed outcome, if any navigation has finished yet.
    pub async fn current(&self) -> Option<Arc<RouteOutcome>> {
        self.state.read().await.committed.clone()
    }

    pub async fn navigate(&self, location: &str) -> Navigation {
        let generation = self.begin(location).await;
        info!("Router: navigating to {} (generation {})", location, generation);

        let outcome = match self.tree.resolve(location) {
            None => {
                warn!("Router: no route for {}", location);
                RouteOutcome::Failed {
                    location: location.to_string(),
                    error: NavigationError::NoMatch(location.to_string()),
                }
            }
            Some(route) => {
                let mut superseded = self.generation.subscribe();
                tokio::select! {
                    outcome = self.run_loaders(location, route) => outcome,
                    _ = wait_for_newer(&mut superseded, generation) => {
                        debug!("Router: navigation to {} superseded while loading", location);
                        return Navigation::Superseded { location: location.to_string() };
                    }
                }
            }
        };

        self.commit(generation, outcome).await
    }

    async fn begin(&self, location: &str) -> u64 {
        let mut state = self.state.write().await;
        self.generation.send_modify(|g| *g += 1);
        state.navigation = NavigationState::Loading { location: location.to_string() };
        *self.generation.borrow()
    }

    async fn run_loaders(&self, location: &str, route: RouteMatch) -> RouteOutcome {
        let mut data = HashMap::new();
        for id in route.chain() {
            let Some(loader) = self.tree.node(*id).loader() else {
                continue;
            };
            debug!("Router: running loader for {}", self.tree.pattern(*id));
            match loader.load(route.params()).await {
                Ok(value) => {
                    data.insert(*id, value);
                }
                Err(source) => {
                    warn!("Router: loader failed for {}: {}", location, source);
                    return RouteOutcome::Failed {
                        location: location.to_string(),
                        error: NavigationError::Loader { location: location.to_string(), source },
                    };
                }
            }
        }
        RouteOutcome::Ready(ResolvedRoute { location: location.to_string(), route, data })
    }

    async fn commit(&self, generation: u64, outcome: RouteOutcome) -> Navigation {
        let mut state = self.state.write().await;
        if *self.generation.borrow() != generation {
            debug!("Router: discarding stale result for {}", outcome.location());
            return Navigation::Superseded { location: outcome.location().to_string() };
        }
        let outcome = Arc::new(outcome);
        state.committed = Some(outcome.clone());
        state.navigation = NavigationState::Idle;
        Navigation::Committed(outcome)
    }
}

async fn wait_for_newer(rx: &mut watch::Receiver<u64>, generation: u64) {
    if rx.wait_for(|current| *current != generation).await.is_err() {
        // Sender dropped with the router; nothing newer can arrive.
        std::future::pending::<()>().await;
    }
}
