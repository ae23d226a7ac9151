use async_trait::async_trait;

use crate::place::{Coordinate, Place, Region, Route};

/// Place search capability. Failures are folded into an empty result list;
/// the session never distinguishes "found nothing" from "search broke".
#[async_trait]
pub trait PlaceSearch: Send + Sync {
    async fn search(&self, query: &str, region: &Region) -> Vec<Place>;
}

/// Route planning capability. Failures are folded into `None`.
#[async_trait]
pub trait RoutePlanner: Send + Sync {
    async fn route(&self, origin: Coordinate, destination: &Place) -> Option<Route>;
}
