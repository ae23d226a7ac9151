use std::collections::HashSet;

use rand::Rng;
use serde::Serialize;

use crate::place::{Place, Route};

/// Identifies one issued place search. A completion carrying a token that is
/// no longer the latest is stale and gets discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchToken(u64);

/// Identifies one issued route computation. Any change to the selection
/// invalidates outstanding tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteToken(u64);

/// The restaurant discovery workflow: current search results, the selected
/// place, the backup set behind the "choose again" flow, and the computed
/// route to the selection.
///
/// This is the single-owner, synchronous core. Asynchronous callers issue a
/// token (`begin_search`, `select`, `choose_random`, ...) before firing a
/// request and feed the outcome back through `apply_search_results` /
/// `apply_route`; the token guard is what keeps late completions for a
/// superseded search or selection from clobbering newer state.
///
/// Invariants:
/// - replacing the result set clears selection, route, and backup
/// - a route is only ever present while a selection is present
/// - the backup set is non-empty only between a random pick and whatever
///   ends that flow (re-pick, deselect, or a new search)
#[derive(Debug, Default)]
pub struct DiscoverySession {
    results: Vec<Place>,
    backup: Vec<Place>,
    selected: Option<Place>,
    route: Option<Route>,
    /// Monotonic revision counter — incremented on every state change.
    rev: u64,
    search_seq: u64,
    route_seq: u64,
}

/// Cloneable UI-facing view of the session.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub rev: u64,
    pub results: Vec<Place>,
    pub selected: Option<Place>,
    pub route: Option<Route>,
    pub can_offer_random_pick: bool,
    pub can_offer_another_pick: bool,
}

impl DiscoverySession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[Place] {
        &self.results
    }

    pub fn selected(&self) -> Option<&Place> {
        self.selected.as_ref()
    }

    pub fn route(&self) -> Option<&Route> {
        self.route.as_ref()
    }

    pub fn rev(&self) -> u64 {
        self.rev
    }

    /// True once a search has landed with results and nothing is selected —
    /// the window in which the "choose for me" action is offered.
    pub fn can_offer_random_pick(&self) -> bool {
        !self.results.is_empty() && self.selected.is_none()
    }

    /// True while unshown candidates from a random pick remain — the window
    /// in which the "choose again" action is offered.
    pub fn can_offer_another_pick(&self) -> bool {
        !self.backup.is_empty()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            rev: self.rev,
            results: self.results.clone(),
            selected: self.selected.clone(),
            route: self.route.clone(),
            can_offer_random_pick: self.can_offer_random_pick(),
            can_offer_another_pick: self.can_offer_another_pick(),
        }
    }

    /// Issue a new search generation. Call before firing the asynchronous
    /// search; pass the token back to `apply_search_results`.
    pub fn begin_search(&mut self) -> SearchToken {
        self.search_seq += 1;
        SearchToken(self.search_seq)
    }

    /// Apply a resolved search. Returns false (state untouched) when `token`
    /// is not the newest issued search — the newest issue wins, not the last
    /// completion. On accept, the result set is replaced wholesale (deduped
    /// by id, order kept) and selection/route/backup are cleared.
    pub fn apply_search_results(&mut self, token: SearchToken, places: Vec<Place>) -> bool {
        if token.0 != self.search_seq {
            return false;
        }

        let mut seen = HashSet::new();
        self.results = places
            .into_iter()
            .filter(|p| seen.insert(p.id.clone()))
            .collect();
        self.backup.clear();
        self.selected = None;
        self.route = None;
        self.route_seq += 1; // routes to the old selection are now stale
        self.rev += 1;
        true
    }

    /// Select a member of the current result set. Clears any computed route
    /// and issues a route generation for the caller to resolve. Selecting a
    /// place that is not in the result set is a no-op.
    pub fn select(&mut self, place_id: &str) -> Option<RouteToken> {
        let place = self.results.iter().find(|p| p.id == place_id)?.clone();
        self.selected = Some(place);
        self.route = None;
        self.route_seq += 1;
        self.rev += 1;
        Some(RouteToken(self.route_seq))
    }

    /// Clear the selection and route. When the result set is the singleton
    /// left behind by a random pick, it is cleared too, returning the session
    /// to the empty pre-search state. Returns false when nothing was selected.
    pub fn deselect(&mut self) -> bool {
        if self.selected.is_none() {
            return false;
        }
        self.selected = None;
        self.route = None;
        self.backup.clear();
        self.route_seq += 1;
        if self.results.len() == 1 {
            self.results.clear();
        }
        self.rev += 1;
        true
    }

    /// Pick one place uniformly at random from the result set, select it, and
    /// hold the remaining candidates aside for "choose again". The result set
    /// collapses to the singleton pick. Returns the route token for the new
    /// selection, or `None` when the result set is empty.
    pub fn choose_random<R: Rng>(&mut self, rng: &mut R) -> Option<RouteToken> {
        if self.results.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.results.len());
        let picked = self.results.remove(idx);
        self.backup = std::mem::take(&mut self.results);
        self.results = vec![picked.clone()];
        self.selected = Some(picked);
        self.route = None;
        self.route_seq += 1;
        self.rev += 1;
        Some(RouteToken(self.route_seq))
    }

    /// Re-pick from the candidates held back by the previous random pick.
    /// The previously shown place is not in the pool, so the same place is
    /// never offered twice in a row. No-op when there is nothing to restore.
    pub fn choose_another<R: Rng>(&mut self, rng: &mut R) -> Option<RouteToken> {
        if self.backup.is_empty() {
            return None;
        }
        self.results = std::mem::take(&mut self.backup);
        self.choose_random(rng)
    }

    /// Apply a resolved route computation. Discarded (returns false) when the
    /// selection changed since the token was issued, or nothing is selected.
    pub fn apply_route(&mut self, token: RouteToken, route: Option<Route>) -> bool {
        if token.0 != self.route_seq || self.selected.is_none() {
            return false;
        }
        self.route = route;
        self.rev += 1;
        true
    }
}
