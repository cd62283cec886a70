//! Route Optimization Service
//!
//! Reorders the items of a single day into a greedy nearest-neighbor visiting
//! sequence. Distance is straight-line Euclidean over raw lat/lng degrees,
//! which matches the rough geometry the map view draws; no road network or
//! travel-time lookup is involved. The pass is deterministic: the walk starts
//! from whichever item the day currently lists first, and distance ties go to
//! the candidate with the lowest current position.

use crate::models::itinerary::ItineraryItem;

pub struct RouteOptimizer;

impl RouteOptimizer {
    /// Arrange one day's items into visiting order. The input must already be
    /// sorted by the day's current order; the output is the same items as a
    /// permutation. `order` fields are left alone, the itinerary manager
    /// renumbers after the pass.
    pub fn nearest_neighbor_order(items: Vec<ItineraryItem>) -> Vec<ItineraryItem> {
        if items.len() <= 1 {
            return items;
        }

        let mut remaining = items;
        let mut route: Vec<ItineraryItem> = Vec::with_capacity(remaining.len());
        route.push(remaining.remove(0));

        while !remaining.is_empty() {
            let current = (
                route[route.len() - 1].location.lat,
                route[route.len() - 1].location.lng,
            );

            let mut nearest_idx = 0;
            let mut nearest_dist = f64::INFINITY;
            for (idx, candidate) in remaining.iter().enumerate() {
                let dist = Self::flat_distance(
                    current,
                    (candidate.location.lat, candidate.location.lng),
                );
                // Strict comparison keeps the first (lowest-index) candidate on ties.
                if dist < nearest_dist {
                    nearest_dist = dist;
                    nearest_idx = idx;
                }
            }

            route.push(remaining.remove(nearest_idx));
        }

        route
    }

    fn flat_distance(from: (f64, f64), to: (f64, f64)) -> f64 {
        let d_lat = from.0 - to.0;
        let d_lng = from.1 - to.1;
        (d_lat * d_lat + d_lng * d_lng).sqrt()
    }
}
