use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};
use tracing::debug;

use crate::capability::{PlaceSearch, RoutePlanner};
use crate::place::Region;
use crate::session::{DiscoverySession, RouteToken, SessionSnapshot};

/// Broadcast to listeners after every session mutation. Coarse on purpose:
/// listeners pull a fresh `snapshot()` rather than diffing payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// A search resolved and replaced the result set.
    ResultsUpdated,
    /// Selection changed (select, deselect, or a random pick).
    SelectionChanged,
    /// A route computation for the current selection resolved.
    RouteUpdated,
}

/// Async owner of a `DiscoverySession`.
///
/// All public operations are fire-and-forget: they never block the caller on
/// the search or routing capability. Completions are applied through the
/// session's token-guarded `apply_*` operations, so a completion for a
/// superseded search or selection is discarded rather than clobbering newer
/// state. In-flight requests are not cancelled, merely ignored on arrival.
pub struct Discovery<S, P> {
    session: Arc<RwLock<DiscoverySession>>,
    search: Arc<S>,
    planner: Arc<P>,
    region: Arc<RwLock<Region>>,
    events: broadcast::Sender<SessionEvent>,
}

impl<S, P> Clone for Discovery<S, P> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            search: Arc::clone(&self.search),
            planner: Arc::clone(&self.planner),
            region: Arc::clone(&self.region),
            events: self.events.clone(),
        }
    }
}

impl<S, P> Discovery<S, P>
where
    S: PlaceSearch + 'static,
    P: RoutePlanner + 'static,
{
    pub fn new(search: S, planner: P, region: Region) -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            session: Arc::new(RwLock::new(DiscoverySession::new())),
            search: Arc::new(search),
            planner: Arc::new(planner),
            region: Arc::new(RwLock::new(region)),
            events,
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.session.read().await.snapshot()
    }

    pub async fn region(&self) -> Region {
        *self.region.read().await
    }

    /// Change the viewing region. Affects subsequent searches and route
    /// origins; already-resolved results stay as they are.
    pub async fn set_region(&self, region: Region) {
        *self.region.write().await = region;
    }

    /// Kick off a place search for `query` over the current region. Returns
    /// immediately; the result set is replaced when the search resolves,
    /// unless a newer search was issued in the meantime.
    pub async fn start_search(&self, query: &str) {
        let token = self.session.write().await.begin_search();
        let region = *self.region.read().await;
        let query = query.to_string();
        let this = self.clone();
        tokio::spawn(async move {
            let places = this.search.search(&query, &region).await;
            let mut session = this.session.write().await;
            if session.apply_search_results(token, places) {
                debug!(query, count = session.results().len(), "search resolved");
                let _ = this.events.send(SessionEvent::ResultsUpdated);
            } else {
                debug!(query, "discarding stale search completion");
            }
        });
    }

    /// Select a place from the current result set and kick off a route
    /// computation for it. Unknown ids are ignored.
    pub async fn select(&self, place_id: &str) {
        let token = self.session.write().await.select(place_id);
        let Some(token) = token else { return };
        let _ = self.events.send(SessionEvent::SelectionChanged);
        self.spawn_route(token).await;
    }

    pub async fn deselect(&self) {
        if self.session.write().await.deselect() {
            let _ = self.events.send(SessionEvent::SelectionChanged);
        }
    }

    /// "Choose for me": select a uniformly random result. No-op when the
    /// result set is empty.
    pub async fn choose_random(&self) {
        let token = {
            let mut session = self.session.write().await;
            session.choose_random(&mut rand::thread_rng())
        };
        let Some(token) = token else { return };
        let _ = self.events.send(SessionEvent::SelectionChanged);
        self.spawn_route(token).await;
    }

    /// "Choose again": re-pick from the candidates the previous random pick
    /// held back. No-op when there is nothing left to draw from.
    pub async fn choose_another(&self) {
        let token = {
            let mut session = self.session.write().await;
            session.choose_another(&mut rand::thread_rng())
        };
        let Some(token) = token else { return };
        let _ = self.events.send(SessionEvent::SelectionChanged);
        self.spawn_route(token).await;
    }

    async fn spawn_route(&self, token: RouteToken) {
        let destination = self.session.read().await.selected().cloned();
        let Some(destination) = destination else {
            return;
        };
        let origin = self.region.read().await.center;
        let this = self.clone();
        tokio::spawn(async move {
            let route = this.planner.route(origin, &destination).await;
            let mut session = this.session.write().await;
            if session.apply_route(token, route) {
                debug!(destination = %destination.name, "route resolved");
                let _ = this.events.send(SessionEvent::RouteUpdated);
            } else {
                debug!(destination = %destination.name, "discarding stale route completion");
            }
        });
    }
}
