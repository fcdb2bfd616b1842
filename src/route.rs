//! Route finaliser (spec §4.6): turns a router node sequence and the
//! rotated low-resolution shape into the engine's output — a realised
//! distance, the route's geographic points, and the ideal shape's
//! geographic points.

use crate::graph::RoadGraph;
use crate::types::PlanarPoint;
use crate::utils::GeoPoint;
use petgraph::graph::NodeIndex;

/// A finished route: the realised distance plus both point sequences the
/// caller draws on a map (spec §6's engine output).
#[derive(Clone, Debug, PartialEq)]
pub struct FinalizedRoute {
    pub total_distance_km: f64,
    pub route_points: Vec<GeoPoint>,
    pub drawing_points: Vec<GeoPoint>,
}

/// Builds the final route from the router's node sequence and the rotated
/// low-resolution shape used to produce it. `route` must be non-empty.
pub fn finalize_route(route: &[NodeIndex], rotated_shape: &[PlanarPoint], graph: &RoadGraph) -> FinalizedRoute {
    assert!(!route.is_empty());

    let total_distance_km = realised_length_km(route, graph);
    let route_points = route.iter().map(|&node| graph.node_geo(node)).collect();
    let drawing_points = rotated_shape
        .iter()
        .map(|&point| graph.projection().inverse(point))
        .collect();

    FinalizedRoute {
        total_distance_km,
        route_points,
        drawing_points,
    }
}

/// Sum of the minimum parallel-edge `length` between each consecutive pair
/// of route nodes, converted to kilometres and rounded to one decimal.
fn realised_length_km(route: &[NodeIndex], graph: &RoadGraph) -> f64 {
    let meters: f64 = route
        .windows(2)
        .map(|w| {
            graph
                .min_parallel_edge_length(w[0], w[1])
                .expect("consecutive route nodes are directly connected")
        })
        .sum();

    (meters / 1000. * 10.).round() / 10.
}
