//! Graph cache and collaborator interface (spec §5/§9): the road graph is
//! shared read-only across requests and keyed by anchor; a cache refresh
//! (new anchor) is serialised against concurrent readers with a
//! reader/writer lock so no reader ever observes a partially rebuilt
//! graph. Modelled as an explicit object owned by the engine, not as
//! module-scope global state.

use crate::config::NetworkType;
use crate::error::EngineError;
use crate::graph::RoadGraph;
use crate::utils::{DebugTime, GeoPoint};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// The upward interface to the road-graph acquisition collaborator (spec
/// §6). Real OSM acquisition is an external concern and is not
/// implemented here; the crate ships only trivial in-memory sources for
/// tests and the CLI.
pub trait RoadGraphSource: Send + Sync {
    fn acquire(
        &self,
        anchor: GeoPoint,
        radius_m: f64,
        mode: NetworkType,
    ) -> Result<RoadGraph, EngineError>;
}

/// A `RoadGraphSource` with no real acquisition capability, for tests
/// that already have a concrete graph in hand and install it directly
/// with [`RoadGraphCache::preload`]. Only reached if that graph was
/// never preloaded for the requested anchor/mode, which indicates a
/// caller bug.
pub struct NullRoadGraphSource;

impl RoadGraphSource for NullRoadGraphSource {
    fn acquire(
        &self,
        anchor: GeoPoint,
        _radius_m: f64,
        _mode: NetworkType,
    ) -> Result<RoadGraph, EngineError> {
        Err(EngineError::GraphUnavailable {
            lat: anchor.lat.as_degrees(),
            lon: anchor.lon.as_degrees(),
            reason: "no graph was preloaded for this anchor/mode".to_string(),
        })
    }
}

/// A `RoadGraphSource` wrapping a single pre-built or file-loaded graph,
/// for the CLI's `route` subcommand: the graph is handed over on the
/// first `acquire` call (a cache miss) and consumed, since a CLI
/// invocation only ever serves one request.
pub struct StaticRoadGraphSource {
    graph: std::sync::Mutex<Option<RoadGraph>>,
}

impl StaticRoadGraphSource {
    pub fn new(graph: RoadGraph) -> Self {
        StaticRoadGraphSource {
            graph: std::sync::Mutex::new(Some(graph)),
        }
    }
}

impl RoadGraphSource for StaticRoadGraphSource {
    fn acquire(
        &self,
        anchor: GeoPoint,
        _radius_m: f64,
        _mode: NetworkType,
    ) -> Result<RoadGraph, EngineError> {
        self.graph.lock().unwrap().take().ok_or_else(|| EngineError::GraphUnavailable {
            lat: anchor.lat.as_degrees(),
            lon: anchor.lon.as_degrees(),
            reason: "static road graph source already consumed".to_string(),
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
struct AnchorKey {
    anchor: GeoPoint,
    mode: NetworkType,
}

/// A process-wide, anchor-keyed cache of road graphs with reader/writer
/// discipline: readers take a read lock only long enough to clone an
/// `Arc`; a miss takes a write lock, calls the source, and inserts.
pub struct RoadGraphCache {
    entries: RwLock<HashMap<AnchorKey, Arc<RoadGraph>>>,
}

impl RoadGraphCache {
    pub fn new() -> Self {
        RoadGraphCache {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Directly install a graph for an anchor/mode pair, bypassing the
    /// source. Used by `StaticRoadGraphSource`-backed callers (tests, CLI)
    /// that already have the graph in hand.
    pub fn preload(&self, anchor: GeoPoint, mode: NetworkType, graph: RoadGraph) {
        let key = AnchorKey { anchor, mode };
        self.entries.write().unwrap().insert(key, Arc::new(graph));
    }

    /// Returns the cached graph for `(anchor, mode)`, calling `source` to
    /// build and cache one on a miss.
    pub fn get_or_acquire(
        &self,
        source: &dyn RoadGraphSource,
        anchor: GeoPoint,
        radius_m: f64,
        mode: NetworkType,
    ) -> Result<Arc<RoadGraph>, EngineError> {
        let key = AnchorKey { anchor, mode };

        if let Some(graph) = self.entries.read().unwrap().get(&key) {
            return Ok(Arc::clone(graph));
        }

        let mut timer = DebugTime::new();
        let graph = Arc::new(source.acquire(anchor, radius_m, mode)?);
        timer.msg("Acquired road graph for cache miss");

        let mut entries = self.entries.write().unwrap();
        let graph = entries.entry(key).or_insert(graph);
        Ok(Arc::clone(graph))
    }
}

impl Default for RoadGraphCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::graph::build_grid_graph;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource {
        calls: AtomicUsize,
        spacing_m: f64,
        half_extent_m: f64,
    }

    impl RoadGraphSource for CountingSource {
        fn acquire(
            &self,
            anchor: GeoPoint,
            _radius_m: f64,
            _mode: NetworkType,
        ) -> Result<RoadGraph, EngineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(build_grid_graph(anchor, self.spacing_m, self.half_extent_m))
        }
    }

    #[test]
    fn cache_hit_avoids_second_acquire() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            spacing_m: 100.,
            half_extent_m: 500.,
        };
        let cache = RoadGraphCache::new();
        let anchor = GeoPoint::from_degrees(1., 1.);

        cache
            .get_or_acquire(&source, anchor, 1000., NetworkType::Walk)
            .unwrap();
        cache
            .get_or_acquire(&source, anchor, 1000., NetworkType::Walk)
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn different_anchors_both_acquire() {
        let source = CountingSource {
            calls: AtomicUsize::new(0),
            spacing_m: 100.,
            half_extent_m: 500.,
        };
        let cache = RoadGraphCache::new();

        cache
            .get_or_acquire(&source, GeoPoint::from_degrees(1., 1.), 1000., NetworkType::Walk)
            .unwrap();
        cache
            .get_or_acquire(&source, GeoPoint::from_degrees(2., 2.), 1000., NetworkType::Walk)
            .unwrap();

        assert_eq!(source.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn static_source_yields_graph_once() {
        let anchor = GeoPoint::from_degrees(3., 3.);
        let source = StaticRoadGraphSource::new(build_grid_graph(anchor, 100., 500.));

        assert!(source.acquire(anchor, 1000., NetworkType::Walk).is_ok());
        assert!(matches!(
            source.acquire(anchor, 1000., NetworkType::Walk),
            Err(EngineError::GraphUnavailable { .. })
        ));
    }
}
