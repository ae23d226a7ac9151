//! End-to-end tests of the async discovery runtime with scripted
//! capabilities: overlapping completions, stale-result discarding, and the
//! random pick / re-pick flow.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tokio::time::{sleep, timeout};

use foodie_core::discovery::{Discovery, SessionEvent};
use foodie_core::place::{Coordinate, Place, Region, Route};
use foodie_core::{PlaceSearch, RoutePlanner};

fn place(id: &str) -> Place {
    Place::new(id, id.to_uppercase(), Coordinate::new(42.974, -82.405))
}

fn region() -> Region {
    Region::new(Coordinate::new(42.974, -82.405), 15_000.0)
}

/// Search capability that answers each known query with a fixed result list
/// after a fixed delay. Unknown queries resolve empty, like a failed search.
#[derive(Default)]
struct ScriptedSearch {
    scripts: HashMap<String, (Duration, Vec<Place>)>,
}

impl ScriptedSearch {
    fn with(mut self, query: &str, delay_ms: u64, places: Vec<Place>) -> Self {
        self.scripts
            .insert(query.to_string(), (Duration::from_millis(delay_ms), places));
        self
    }
}

#[async_trait]
impl PlaceSearch for ScriptedSearch {
    async fn search(&self, query: &str, _region: &Region) -> Vec<Place> {
        match self.scripts.get(query) {
            Some((delay, places)) => {
                sleep(*delay).await;
                places.clone()
            }
            None => Vec::new(),
        }
    }
}

/// Route planner that answers per destination id with a fixed delay and a
/// route whose distance encodes which destination it was computed for.
#[derive(Default)]
struct ScriptedRoutes {
    scripts: HashMap<String, (Duration, Option<Route>)>,
}

impl ScriptedRoutes {
    fn with(mut self, dest_id: &str, delay_ms: u64, distance_m: f64) -> Self {
        self.scripts.insert(
            dest_id.to_string(),
            (
                Duration::from_millis(delay_ms),
                Some(Route {
                    distance_m,
                    expected_travel_time: Duration::from_secs(60),
                }),
            ),
        );
        self
    }
}

#[async_trait]
impl RoutePlanner for ScriptedRoutes {
    async fn route(&self, _origin: Coordinate, destination: &Place) -> Option<Route> {
        match self.scripts.get(&destination.id) {
            Some((delay, route)) => {
                sleep(*delay).await;
                route.clone()
            }
            None => None,
        }
    }
}

async fn wait_for(rx: &mut broadcast::Receiver<SessionEvent>, wanted: SessionEvent) {
    timeout(Duration::from_secs(2), async {
        loop {
            let event = rx.recv().await.expect("event channel closed");
            if event == wanted {
                return;
            }
        }
    })
    .await
    .unwrap_or_else(|_| panic!("timed out waiting for {wanted:?}"));
}

#[tokio::test]
async fn search_populates_results() {
    let search = ScriptedSearch::default().with("pizza", 5, vec![place("a"), place("b")]);
    let discovery = Discovery::new(search, ScriptedRoutes::default(), region());
    let mut rx = discovery.subscribe();

    discovery.start_search("pizza").await;
    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;

    let snap = discovery.snapshot().await;
    assert_eq!(snap.results.len(), 2);
    assert!(snap.can_offer_random_pick);
    assert!(snap.selected.is_none());
}

#[tokio::test]
async fn overlapping_searches_newest_issue_wins() {
    let search = ScriptedSearch::default()
        .with("pizza", 80, vec![place("slow")])
        .with("tacos", 10, vec![place("fast")]);
    let discovery = Discovery::new(search, ScriptedRoutes::default(), region());
    let mut rx = discovery.subscribe();

    // User mashes two category buttons; the first search is still in flight
    // when the second one is issued.
    discovery.start_search("pizza").await;
    discovery.start_search("tacos").await;

    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;
    sleep(Duration::from_millis(150)).await; // let the stale pizza search land

    let snap = discovery.snapshot().await;
    let ids: Vec<_> = snap.results.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, ["fast"], "stale completion must not replace results");

    // The discarded completion must not have produced a second update.
    assert!(
        timeout(Duration::from_millis(50), rx.recv()).await.is_err(),
        "no event expected for a discarded completion"
    );
}

#[tokio::test]
async fn failed_search_folds_to_empty() {
    let discovery = Discovery::new(ScriptedSearch::default(), ScriptedRoutes::default(), region());
    let mut rx = discovery.subscribe();

    discovery.start_search("ramen").await;
    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;

    let snap = discovery.snapshot().await;
    assert!(snap.results.is_empty());
    assert!(!snap.can_offer_random_pick);
    assert!(!snap.can_offer_another_pick);
}

#[tokio::test]
async fn route_resolves_for_selection() {
    let search = ScriptedSearch::default().with("food", 1, vec![place("a"), place("b")]);
    let routes = ScriptedRoutes::default().with("a", 5, 1234.0);
    let discovery = Discovery::new(search, routes, region());
    let mut rx = discovery.subscribe();

    discovery.start_search("food").await;
    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;

    discovery.select("a").await;
    wait_for(&mut rx, SessionEvent::RouteUpdated).await;

    let snap = discovery.snapshot().await;
    assert_eq!(snap.selected.as_ref().unwrap().id, "a");
    assert_eq!(snap.route.as_ref().unwrap().distance_m, 1234.0);
}

#[tokio::test]
async fn stale_route_discarded_after_reselect() {
    let search = ScriptedSearch::default().with("food", 1, vec![place("a"), place("b")]);
    let routes = ScriptedRoutes::default()
        .with("a", 80, 1.0)
        .with("b", 5, 2.0);
    let discovery = Discovery::new(search, routes, region());
    let mut rx = discovery.subscribe();

    discovery.start_search("food").await;
    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;

    // Select "a" (slow route), then switch to "b" before a's route resolves.
    discovery.select("a").await;
    discovery.select("b").await;
    wait_for(&mut rx, SessionEvent::RouteUpdated).await;
    sleep(Duration::from_millis(150)).await; // let the stale route for "a" land

    let snap = discovery.snapshot().await;
    assert_eq!(snap.selected.as_ref().unwrap().id, "b");
    assert_eq!(
        snap.route.as_ref().unwrap().distance_m,
        2.0,
        "route for a superseded selection must not apply"
    );
}

#[tokio::test]
async fn unknown_selection_is_ignored() {
    let search = ScriptedSearch::default().with("food", 1, vec![place("a")]);
    let discovery = Discovery::new(search, ScriptedRoutes::default(), region());
    let mut rx = discovery.subscribe();

    discovery.start_search("food").await;
    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;

    discovery.select("nope").await;
    let snap = discovery.snapshot().await;
    assert!(snap.selected.is_none());
}

#[tokio::test]
async fn random_pick_and_repick_flow() {
    let all = vec![place("a"), place("b"), place("c")];
    let search = ScriptedSearch::default().with("food", 1, all.clone());
    let routes = ScriptedRoutes::default()
        .with("a", 1, 1.0)
        .with("b", 1, 2.0)
        .with("c", 1, 3.0);
    let discovery = Discovery::new(search, routes, region());
    let mut rx = discovery.subscribe();

    discovery.start_search("food").await;
    wait_for(&mut rx, SessionEvent::ResultsUpdated).await;

    discovery.choose_random().await;
    wait_for(&mut rx, SessionEvent::RouteUpdated).await;

    let snap = discovery.snapshot().await;
    let first = snap.selected.clone().unwrap();
    assert!(all.contains(&first));
    assert_eq!(snap.results, vec![first.clone()]);
    assert!(snap.route.is_some());
    assert!(!snap.can_offer_random_pick);
    assert!(snap.can_offer_another_pick);

    discovery.choose_another().await;
    wait_for(&mut rx, SessionEvent::RouteUpdated).await;

    let snap = discovery.snapshot().await;
    let second = snap.selected.clone().unwrap();
    assert_ne!(first.id, second.id, "re-pick must not repeat the last pick");
    assert_eq!(snap.results.len(), 1);

    // Backing out of the pick returns the session to the pre-search state.
    discovery.deselect().await;
    let snap = discovery.snapshot().await;
    assert!(snap.selected.is_none());
    assert!(snap.route.is_none());
    assert!(snap.results.is_empty());
    assert!(!snap.can_offer_another_pick);
}

#[tokio::test]
async fn deselect_without_selection_emits_nothing() {
    let discovery = Discovery::new(ScriptedSearch::default(), ScriptedRoutes::default(), region());
    let mut rx = discovery.subscribe();

    discovery.deselect().await;
    assert!(timeout(Duration::from_millis(30), rx.recv()).await.is_err());
}
