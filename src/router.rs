//! Shape-constrained router (spec §4.5): walks the low-resolution shape
//! segment by segment, running a single-source shortest path from the
//! current node to the node nearest each segment's far endpoint, under an
//! edge weight that depends on the current segment (spec §9's "dynamic
//! edge weight" design note). Each segment rebuilds its own weight rather
//! than precomputing static weights for the whole graph.

use crate::geometry;
use crate::graph::RoadGraph;
use crate::types::PlanarPoint;
use crate::utils::DebugTime;
use petgraph::graph::NodeIndex;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

/// Weights for the per-edge cost of spec §4.5
#[derive(Copy, Clone, Debug)]
pub struct RouterWeights {
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

const POINT_TO_SEGMENT_SAMPLES: usize = 10;

/// Walks `shape_lo` segment by segment and returns the accumulated route
/// node sequence. The route always contains at least the start node (the
/// node nearest `shape_lo[0]`), even if every segment is skipped.
pub fn route_shape(shape_lo: &[PlanarPoint], graph: &RoadGraph, weights: RouterWeights) -> Vec<NodeIndex> {
    assert!(shape_lo.len() >= 1);

    let start = graph
        .nearest_node(shape_lo[0])
        .expect("graph has at least one node");

    let mut route = vec![start];
    let mut current = start;
    let mut timer = DebugTime::new();

    for window in shape_lo.windows(2) {
        let (a, b) = (window[0], window[1]);
        let target = graph.nearest_node(b).expect("graph has at least one node");

        if target == current {
            continue;
        }

        match shortest_path(graph, current, target, a, b, weights) {
            Some(path) => {
                route.extend(path.into_iter().skip(1));
                current = target;
            }
            None => {
                timer.msg(format!(
                    "No path for segment {} -> {}, skipping",
                    current.index(),
                    target.index()
                ));
            }
        }
    }

    route
}

/// Single-source shortest path from `start` to `goal`, using the segment
/// endpoints `a`/`b` to build the edge weight of spec §4.5. Ties in the
/// priority queue break on ascending node index (spec §5 determinism),
/// matched here by keying the heap on `(cost.to_bits(), node)` — valid
/// because every weight term is a distance or an integral of distances,
/// hence non-negative, and `f64::to_bits` preserves ordering on
/// non-negative floats.
fn shortest_path(
    graph: &RoadGraph,
    start: NodeIndex,
    goal: NodeIndex,
    a: PlanarPoint,
    b: PlanarPoint,
    weights: RouterWeights,
) -> Option<Vec<NodeIndex>> {
    let mut dist: HashMap<NodeIndex, f64> = HashMap::new();
    let mut predecessor: HashMap<NodeIndex, NodeIndex> = HashMap::new();
    let mut heap = BinaryHeap::new();

    dist.insert(start, 0.);
    heap.push(Reverse((0u64, start)));

    while let Some(Reverse((cost_bits, node))) = heap.pop() {
        let cost = f64::from_bits(cost_bits);
        if cost > *dist.get(&node).unwrap_or(&f64::INFINITY) {
            continue;
        }
        if node == goal {
            return Some(reconstruct_path(start, goal, &predecessor));
        }

        for (_, next) in graph.edges_from(node) {
            let weight = edge_weight(graph, node, next, a, b, weights);
            let next_cost = cost + weight;

            if next_cost < *dist.get(&next).unwrap_or(&f64::INFINITY) {
                dist.insert(next, next_cost);
                predecessor.insert(next, node);
                heap.push(Reverse((next_cost.to_bits(), next)));
            }
        }
    }

    None
}

fn reconstruct_path(
    start: NodeIndex,
    goal: NodeIndex,
    predecessor: &HashMap<NodeIndex, NodeIndex>,
) -> Vec<NodeIndex> {
    let mut path = vec![goal];
    let mut node = goal;
    while node != start {
        node = predecessor[&node];
        path.push(node);
    }
    path.reverse();
    path
}

/// `weight(u -> v) = alpha * C1 + beta * C2 + gamma * C3` (spec §4.5)
fn edge_weight(
    graph: &RoadGraph,
    u: NodeIndex,
    v: NodeIndex,
    a: PlanarPoint,
    b: PlanarPoint,
    weights: RouterWeights,
) -> f64 {
    let coord_u = graph.node_planar(u);
    let coord_v = graph.node_planar(v);

    let c1 = geometry::distance(coord_v, b);
    let c2 = geometry::distance(coord_v, coord_u);
    let c3 = geometry::point_to_segment(a, b, coord_u, coord_v, POINT_TO_SEGMENT_SAMPLES);

    weights.alpha * c1 + weights.beta * c2 + weights.gamma * c3
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::build_grid_graph;
    use crate::utils::GeoPoint;

    fn default_weights() -> RouterWeights {
        RouterWeights {
            alpha: 1.0,
            beta: 5.0,
            gamma: 1.0,
        }
    }

    #[test]
    fn straight_line_follows_single_grid_row() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        let graph = build_grid_graph(anchor, 100., 2000.);

        let shape: Vec<PlanarPoint> = (0..8).map(|i| PlanarPoint::new(i as f64 * 100., 0.)).collect();
        let route = route_shape(&shape, &graph, default_weights());

        assert!(route.len() > 1);
        for w in route.windows(2) {
            assert_ne!(w[0], w[1]);
            assert!(graph.min_parallel_edge_length(w[0], w[1]).is_some());
        }
        // Every visited node lies on the same grid row (y == 0)
        for &node in &route {
            assert_eq!(graph.node_planar(node).y, 0.);
        }
    }

    #[test]
    fn disconnected_segment_is_skipped_but_route_stays_connected() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        let mut graph = build_grid_graph(anchor, 100., 500.);

        // Sever the graph into two halves by rebuilding without cross edges
        // at x = 0: achieved by constructing a custom two-component graph
        use crate::graph::{RoadGraph, RoadNode};
        let nodes = vec![
            RoadNode::new(PlanarPoint::new(0., 0.), anchor),
            RoadNode::new(PlanarPoint::new(100., 0.), anchor),
            RoadNode::new(PlanarPoint::new(1000., 0.), anchor),
            RoadNode::new(PlanarPoint::new(1100., 0.), anchor),
        ];
        let edges = vec![(0, 1, 100.), (1, 0, 100.), (2, 3, 100.), (3, 2, 100.)];
        graph = RoadGraph::build(nodes, edges, Box::new(crate::projection::WebMercatorProjection));

        let shape = vec![
            PlanarPoint::new(0., 0.),
            PlanarPoint::new(100., 0.),
            PlanarPoint::new(1100., 0.),
        ];
        let route = route_shape(&shape, &graph, default_weights());

        // The unreachable segment is skipped; the route stays connected
        assert!(!route.is_empty());
        for w in route.windows(2) {
            assert!(graph.min_parallel_edge_length(w[0], w[1]).is_some());
        }
    }

    #[test]
    fn skipping_a_zero_length_segment_does_not_duplicate_current_node() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        let graph = build_grid_graph(anchor, 100., 500.);
        // Two successive shape points snap to the same nearest node
        let shape = vec![
            PlanarPoint::new(0., 0.),
            PlanarPoint::new(1., 0.),
            PlanarPoint::new(300., 0.),
        ];
        let route = route_shape(&shape, &graph, default_weights());
        for w in route.windows(2) {
            assert_ne!(w[0], w[1]);
        }
    }
}
