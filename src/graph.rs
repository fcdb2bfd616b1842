//! The road graph (spec §3, §4.7/§9): a directed multigraph of nodes
//! (planar + geographic coordinates) and edges (authoritative traversal
//! `length`), plus a spatial index over node positions for nearest-node
//! queries. Represented with `petgraph`'s arena-indexed `Graph`, per the
//! design note that a cyclic graph should use indices rather than owning
//! pointers.

use crate::projection::{Projection, WebMercatorProjection};
use crate::types::PlanarPoint;
use crate::utils::GeoPoint;
use petgraph::graph::{EdgeIndex, Graph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Directed;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

/// Per-node attributes: a single consistent planar projection for the
/// whole graph (spec §3 invariant), plus the originating geographic point
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RoadNode {
    pub planar: PlanarPoint,
    pub geo: GeoPoint,
}

/// Per-edge attributes: the graph's authoritative traversal length, which
/// may differ from the Euclidean distance between endpoints (curved
/// roads, one-way detours, etc.)
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct RoadEdge {
    pub length: f64,
}

/// An entry in the node spatial index: the node's planar position plus its
/// index in the graph, so nearest-neighbour queries resolve back to a node
struct IndexedNode {
    x: f64,
    y: f64,
    node: NodeIndex,
}

impl RTreeObject for IndexedNode {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl PointDistance for IndexedNode {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }
}

/// A directed multigraph of road nodes and edges, with a single consistent
/// planar projection and a spatial index over node positions
pub struct RoadGraph {
    pub graph: Graph<RoadNode, RoadEdge, Directed>,
    rtree: RTree<IndexedNode>,
    projection: Box<dyn Projection>,
}

/// Plain node/edge arrays, serializable independently of the graph's
/// projection (which is rebuilt at load time) — used to persist synthetic
/// or pre-computed graphs to disk (spec §4.10's `synth-grid` fixtures)
#[derive(Serialize, Deserialize)]
pub struct SerializedRoadGraph {
    pub nodes: Vec<RoadNode>,
    pub edges: Vec<(u32, u32, f64)>,
}

impl RoadGraph {
    /// Build a graph from plain node/edge arrays and a projection. Edge
    /// endpoints are node indices into `nodes`.
    pub fn build(
        nodes: Vec<RoadNode>,
        edges: Vec<(u32, u32, f64)>,
        projection: Box<dyn Projection>,
    ) -> Self {
        let mut graph = Graph::new();
        for node in &nodes {
            graph.add_node(*node);
        }
        for (src, dst, length) in edges {
            graph.add_edge(
                NodeIndex::new(src as usize),
                NodeIndex::new(dst as usize),
                RoadEdge { length },
            );
        }

        let rtree = RTree::bulk_load(
            graph
                .node_indices()
                .map(|node| IndexedNode {
                    x: graph[node].planar.x,
                    y: graph[node].planar.y,
                    node,
                })
                .collect(),
        );

        RoadGraph {
            graph,
            rtree,
            projection,
        }
    }

    pub fn from_serialized(data: SerializedRoadGraph, projection: Box<dyn Projection>) -> Self {
        Self::build(data.nodes, data.edges, projection)
    }

    pub fn to_serialized(&self) -> SerializedRoadGraph {
        let nodes = self.graph.node_weights().copied().collect();
        let edges = self
            .graph
            .edge_references()
            .map(|e| (e.source().index() as u32, e.target().index() as u32, e.weight().length))
            .collect();
        SerializedRoadGraph { nodes, edges }
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    pub fn node_planar(&self, node: NodeIndex) -> PlanarPoint {
        self.graph[node].planar
    }

    pub fn node_geo(&self, node: NodeIndex) -> GeoPoint {
        self.graph[node].geo
    }

    pub fn edges_from(&self, node: NodeIndex) -> impl Iterator<Item = (EdgeIndex, NodeIndex)> + '_ {
        self.graph.edges(node).map(|e| (e.id(), e.target()))
    }

    pub fn edge_length(&self, edge: EdgeIndex) -> f64 {
        self.graph[edge].length
    }

    /// The minimum `length` among all parallel edges directly connecting
    /// `from` to `to`, or `None` if they are not directly connected
    pub fn min_parallel_edge_length(&self, from: NodeIndex, to: NodeIndex) -> Option<f64> {
        self.graph
            .edges(from)
            .filter(|e| e.target() == to)
            .map(|e| e.weight().length)
            .fold(None, |acc, len| Some(acc.map_or(len, |a: f64| a.min(len))))
    }

    /// The graph node nearest to `point`, breaking distance ties by the
    /// lowest node index (spec §5 determinism guarantee)
    pub fn nearest_node(&self, point: PlanarPoint) -> Option<NodeIndex> {
        let query = point.as_array();
        let nearest = self.rtree.nearest_neighbor(&query)?;
        let min_dist_2 = nearest.distance_2(&query);

        self.rtree
            .locate_within_distance(query, min_dist_2 + 1e-9)
            .map(|candidate| candidate.node)
            .min_by_key(|node| node.index())
    }
}

/// Builds a synthetic square grid road graph, centred on an anchor, for
/// tests and for the CLI's `synth-grid` demo fixture (spec §8's seed test
/// graphs are exactly this shape). Nodes are connected to their 4
/// orthogonal neighbours with bidirectional edges whose length equals the
/// grid spacing.
pub fn build_grid_graph(anchor: GeoPoint, spacing_m: f64, half_extent_m: f64) -> RoadGraph {
    let projection = crate::projection::EquirectangularProjection::new(anchor);
    let steps = (half_extent_m / spacing_m).floor() as i64;

    let mut nodes = Vec::new();
    let mut index_of = std::collections::HashMap::new();
    for i in -steps..=steps {
        for j in -steps..=steps {
            let planar = PlanarPoint::new(i as f64 * spacing_m, j as f64 * spacing_m);
            let geo = projection.inverse(planar);
            index_of.insert((i, j), nodes.len() as u32);
            nodes.push(RoadNode { planar, geo });
        }
    }

    let mut edges = Vec::new();
    for i in -steps..=steps {
        for j in -steps..=steps {
            let here = index_of[&(i, j)];
            for (di, dj) in [(1, 0), (0, 1)] {
                if let Some(&there) = index_of.get(&(i + di, j + dj)) {
                    edges.push((here, there, spacing_m));
                    edges.push((there, here, spacing_m));
                }
            }
        }
    }

    RoadGraph::build(nodes, edges, Box::new(projection))
}

impl RoadNode {
    pub fn new(planar: PlanarPoint, geo: GeoPoint) -> Self {
        Self { planar, geo }
    }
}

impl Default for RoadGraph {
    fn default() -> Self {
        RoadGraph::build(Vec::new(), Vec::new(), Box::new(WebMercatorProjection))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn grid_graph_nearest_node() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        let graph = build_grid_graph(anchor, 100., 2000.);
        let origin_node = graph.nearest_node(PlanarPoint::new(1., -1.)).unwrap();
        assert_eq!(graph.node_planar(origin_node).x, 0.);
        assert_eq!(graph.node_planar(origin_node).y, 0.);
    }

    #[test]
    fn nearest_node_breaks_ties_by_lowest_index() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        // Two nodes equidistant from (50, 0): (0,0) and (100,0)
        let nodes = vec![
            RoadNode::new(PlanarPoint::new(100., 0.), anchor),
            RoadNode::new(PlanarPoint::new(0., 0.), anchor),
        ];
        let graph = RoadGraph::build(nodes, vec![], Box::new(WebMercatorProjection));
        let nearest = graph.nearest_node(PlanarPoint::new(50., 0.)).unwrap();
        assert_eq!(nearest.index(), 0);
    }

    #[test]
    fn min_parallel_edge_length() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        let nodes = vec![
            RoadNode::new(PlanarPoint::new(0., 0.), anchor),
            RoadNode::new(PlanarPoint::new(100., 0.), anchor),
        ];
        let edges = vec![(0, 1, 100.), (0, 1, 50.)];
        let graph = RoadGraph::build(nodes, edges, Box::new(WebMercatorProjection));
        let min = graph
            .min_parallel_edge_length(NodeIndex::new(0), NodeIndex::new(1))
            .unwrap();
        assert_eq!(min, 50.);
    }

    #[test]
    fn round_trip_serialization() {
        let anchor = GeoPoint::from_degrees(0., 0.);
        let graph = build_grid_graph(anchor, 100., 200.);
        let serialized = graph.to_serialized();
        let bytes = bincode::serialize(&serialized).unwrap();
        let restored: SerializedRoadGraph = bincode::deserialize(&bytes).unwrap();
        assert_eq!(restored.nodes.len(), serialized.nodes.len());
        assert_eq!(restored.edges.len(), serialized.edges.len());
    }
}
