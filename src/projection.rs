//! Forward/inverse mappings between geographic `(lat, lon)` and a local
//! planar metric frame. Two implementations ship: the teacher's existing
//! Web Mercator projection (a `RoadGraph`'s own supplied projection, used
//! globally and independent of any particular anchor) and an
//! equirectangular approximation anchored at a given latitude (the
//! fallback of spec §4.2, used by the shape conditioner).

use crate::types::PlanarPoint;
use crate::utils::GeoPoint;

/// A bijective (over the relevant bounded region) mapping between
/// geographic and planar coordinates
pub trait Projection: Send + Sync {
    fn forward(&self, point: GeoPoint) -> PlanarPoint;
    fn inverse(&self, point: PlanarPoint) -> GeoPoint;
}

/// The teacher's existing global Web Mercator projection, suitable as a
/// `RoadGraph`'s own supplied projection (spec §4.2 "Supplied projection")
#[derive(Copy, Clone, Debug, Default)]
pub struct WebMercatorProjection;

impl Projection for WebMercatorProjection {
    fn forward(&self, point: GeoPoint) -> PlanarPoint {
        let [x, y] = point.web_mercator_project();
        PlanarPoint::new(x, y)
    }

    fn inverse(&self, point: PlanarPoint) -> GeoPoint {
        GeoPoint::from_web_mercator(point.as_array())
    }
}

const EARTH_RADIUS_M: f64 = 6_378_137.;

/// Equirectangular approximation anchored at a given latitude: the
/// fallback projection of spec §4.2, used whenever a request needs a
/// planar frame centred on its own anchor rather than on whatever frame
/// the graph itself uses.
#[derive(Copy, Clone, Debug)]
pub struct EquirectangularProjection {
    anchor: GeoPoint,
    meters_per_degree_lat: f64,
    meters_per_degree_lon: f64,
}

impl EquirectangularProjection {
    pub fn new(anchor: GeoPoint) -> Self {
        let meters_per_degree_lat = 2. * std::f64::consts::PI * EARTH_RADIUS_M / 360.;
        let meters_per_degree_lon = meters_per_degree_lat * anchor.lat.as_radians().cos();
        Self {
            anchor,
            meters_per_degree_lat,
            meters_per_degree_lon,
        }
    }
}

impl Projection for EquirectangularProjection {
    fn forward(&self, point: GeoPoint) -> PlanarPoint {
        let d_lon = point.lon.as_degrees() - self.anchor.lon.as_degrees();
        let d_lat = point.lat.as_degrees() - self.anchor.lat.as_degrees();
        PlanarPoint::new(
            d_lon * self.meters_per_degree_lon,
            -d_lat * self.meters_per_degree_lat,
        )
    }

    fn inverse(&self, point: PlanarPoint) -> GeoPoint {
        let d_lon = point.x / self.meters_per_degree_lon;
        let d_lat = -point.y / self.meters_per_degree_lat;
        GeoPoint::from_degrees(
            self.anchor.lat.as_degrees() + d_lat,
            self.anchor.lon.as_degrees() + d_lon,
        )
    }
}
