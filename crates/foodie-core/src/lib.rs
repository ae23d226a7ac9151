//! Core of foodie: the restaurant discovery workflow.
//!
//! `session::DiscoverySession` is the synchronous state machine (results,
//! selection, backup set, route). `discovery::Discovery` wraps it for an
//! async world, firing capability requests without blocking and applying
//! completions through token guards. The capabilities themselves —
//! `capability::PlaceSearch` and `capability::RoutePlanner` — are trait
//! seams; `providers` ships offline implementations.

pub mod capability;
pub mod category;
pub mod config;
pub mod discovery;
pub mod place;
pub mod platform;
pub mod providers;
pub mod session;

pub use capability::{PlaceSearch, RoutePlanner};
pub use discovery::{Discovery, SessionEvent};
pub use place::{Coordinate, Place, Region, Route};
pub use session::{DiscoverySession, SessionSnapshot};
