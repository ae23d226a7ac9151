use std::time::Duration;

use async_trait::async_trait;

use crate::capability::RoutePlanner;
use crate::place::{Coordinate, Place, Route};

/// Heuristic route planner: great-circle distance scaled by a road winding
/// factor, travel time from a fixed average speed. Good enough for an
/// offline "~12 min away" estimate; not a road router.
#[derive(Debug, Clone)]
pub struct GreatCircleRoutes {
    pub average_speed_mps: f64,
    pub winding_factor: f64,
}

impl Default for GreatCircleRoutes {
    fn default() -> Self {
        Self {
            // ~40 km/h — in-town driving.
            average_speed_mps: 11.1,
            winding_factor: 1.3,
        }
    }
}

#[async_trait]
impl RoutePlanner for GreatCircleRoutes {
    async fn route(&self, origin: Coordinate, destination: &Place) -> Option<Route> {
        if self.average_speed_mps <= 0.0 {
            return None;
        }
        let distance_m = origin.distance_m(destination.coordinate) * self.winding_factor;
        Some(Route {
            distance_m,
            expected_travel_time: Duration::from_secs_f64(distance_m / self.average_speed_mps),
        })
    }
}
