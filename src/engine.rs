//! Top-level orchestration (spec §2/§6): wires shape conditioning,
//! orientation search, the shape-constrained router and the route
//! finaliser behind the engine's in-process call contract.

use crate::cache::{RoadGraphCache, RoadGraphSource};
use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::geometry;
use crate::orientation;
use crate::route::{self, FinalizedRoute};
use crate::router::{self, RouterWeights};
use crate::shape;
use crate::types::DrawingPoint;
use crate::utils::GeoPoint;

/// The engine's in-process call input (spec §6)
pub struct DrawingRequest {
    pub drawing_display_points: Vec<DrawingPoint>,
    pub start_lat: f64,
    pub start_lon: f64,
    pub target_distance_km: f64,
}

/// Owns the tunables, the graph cache and the road-graph collaborator; a
/// single instance can serve many independent requests concurrently, each
/// holding its own working state (spec §5).
pub struct GpsArtEngine {
    config: EngineConfig,
    cache: RoadGraphCache,
    source: Box<dyn RoadGraphSource>,
}

impl GpsArtEngine {
    pub fn new(config: EngineConfig, source: Box<dyn RoadGraphSource>) -> Self {
        GpsArtEngine {
            config,
            cache: RoadGraphCache::new(),
            source,
        }
    }

    /// Installs a graph directly into the cache, bypassing the collaborator.
    /// Used by callers (tests, the CLI) that already have a concrete graph.
    pub fn preload_graph(&self, anchor: GeoPoint, graph: crate::graph::RoadGraph) {
        self.cache.preload(anchor, self.config.network_type, graph);
    }

    pub fn synthesize(&self, request: &DrawingRequest) -> Result<FinalizedRoute, EngineError> {
        validate(request)?;

        let anchor = GeoPoint::try_from_degrees(request.start_lat, request.start_lon)
            .ok_or_else(|| EngineError::InvalidInput("anchor latitude/longitude out of range".to_string()))?;

        let graph = self.cache.get_or_acquire(
            self.source.as_ref(),
            anchor,
            self.config.network_distance,
            self.config.network_type,
        )?;

        let target_length_m = request.target_distance_km * 1000. * self.config.path_length_adjustment;

        let shape_lo = shape::condition_shape(
            &request.drawing_display_points,
            anchor,
            target_length_m,
            self.config.resample_points,
            graph.projection(),
        );
        let shape_hi = shape::condition_shape(
            &request.drawing_display_points,
            anchor,
            target_length_m,
            self.config.rotation_search_points,
            graph.projection(),
        );

        if geometry::polyline_length(&shape_hi.planar) == 0. {
            let start = graph
                .nearest_node(shape_lo.planar[0])
                .expect("graph has at least one node");
            return Ok(route::finalize_route(&[start], &shape_lo.planar, &graph));
        }

        let orientation = orientation::search_orientation(
            &shape_hi.planar,
            &graph,
            self.config.rotation_search_steps,
        );

        let rotated_lo = geometry::rotate(&shape_lo.planar, orientation.theta, shape_lo.planar[0]);

        let weights = RouterWeights {
            alpha: self.config.alpha,
            beta: self.config.beta,
            gamma: self.config.gamma,
        };
        let route_nodes = router::route_shape(&rotated_lo, &graph, weights);

        if route_nodes.is_empty() {
            return Err(EngineError::EmptyRoute);
        }

        Ok(route::finalize_route(&route_nodes, &rotated_lo, &graph))
    }
}

fn validate(request: &DrawingRequest) -> Result<(), EngineError> {
    if request.drawing_display_points.len() < 2 {
        return Err(EngineError::InvalidInput(
            "drawing must have at least two points".to_string(),
        ));
    }
    if request.target_distance_km <= 0. {
        return Err(EngineError::InvalidInput(
            "target distance must be positive".to_string(),
        ));
    }
    Ok(())
}
