//! Shape conditioning (spec §4.3): turns the user's raw freehand drawing
//! into a polyline living in the road graph's own planar frame, at a
//! controlled point count and arc length.

use crate::geometry;
use crate::projection::{EquirectangularProjection, Projection};
use crate::types::{DrawingPoint, PlanarPoint};
use crate::utils::GeoPoint;

/// A drawing resampled, scaled to a target arc length and reprojected into
/// a road graph's planar frame. `planar[0]` is the anchor's image.
#[derive(Clone, Debug)]
pub struct ConditionedShape {
    pub planar: Vec<PlanarPoint>,
}

/// Resample `drawing` to `n` points, scale it to `target_length_m` metres
/// of arc length, and map it into `graph_projection`'s planar frame via the
/// anchor-centred equirectangular bridge (spec §4.2/§4.3). The double
/// conversion (equirectangular then graph projection) is required even
/// when `graph_projection` happens to be equirectangular itself, since the
/// two are not guaranteed to be inverses of one another in general.
pub fn condition_shape(
    drawing: &[DrawingPoint],
    anchor: GeoPoint,
    target_length_m: f64,
    n: usize,
    graph_projection: &dyn Projection,
) -> ConditionedShape {
    let resampled = geometry::resample(drawing, n);

    let origin = resampled[0];
    let translated: Vec<DrawingPoint> = resampled
        .iter()
        .map(|p| DrawingPoint::new(p.x - origin.x, p.y - origin.y))
        .collect();

    let arc_length = geometry::polyline_length(&translated);

    let anchor_frame = EquirectangularProjection::new(anchor);

    let shape_latlon: Vec<GeoPoint> = if arc_length == 0. {
        vec![anchor; n]
    } else {
        let scale = target_length_m / arc_length;
        translated
            .iter()
            .map(|p| {
                let scaled = PlanarPoint::new(p.x * scale, p.y * scale);
                anchor_frame.inverse(scaled)
            })
            .collect()
    };

    let planar = shape_latlon
        .into_iter()
        .map(|p| graph_projection.forward(p))
        .collect();

    ConditionedShape { planar }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::projection::WebMercatorProjection;

    #[test]
    fn scaling_hits_target_arc_length() {
        let drawing = vec![
            DrawingPoint::new(0., 0.),
            DrawingPoint::new(10., 0.),
            DrawingPoint::new(10., 10.),
            DrawingPoint::new(0., 10.),
        ];
        let anchor = GeoPoint::from_degrees(45., 5.);
        let shape = condition_shape(&drawing, anchor, 700., 40, &WebMercatorProjection);

        // Reproject back to a local metric frame to measure arc length without
        // distortion from the graph's own (here, Web Mercator) projection.
        let local = EquirectangularProjection::new(anchor);
        let back: Vec<PlanarPoint> = shape
            .planar
            .iter()
            .map(|p| local.forward(WebMercatorProjection.inverse(*p)))
            .collect();
        let length = geometry::polyline_length(&back);
        assert!(
            (length - 700.).abs() / 700. < 0.001,
            "length {length} not within 0.1% of 700"
        );
    }

    #[test]
    fn degenerate_drawing_maps_to_anchor() {
        let drawing = vec![
            DrawingPoint::new(5., 5.),
            DrawingPoint::new(5., 5.),
            DrawingPoint::new(5., 5.),
        ];
        let anchor = GeoPoint::from_degrees(10., 10.);
        let shape = condition_shape(&drawing, anchor, 1000., 5, &WebMercatorProjection);

        let expected = WebMercatorProjection.forward(anchor);
        for p in &shape.planar {
            assert!((p.x - expected.x).abs() < 1e-6);
            assert!((p.y - expected.y).abs() < 1e-6);
        }
    }

    #[test]
    fn first_point_is_anchor_image() {
        let drawing = vec![DrawingPoint::new(0., 0.), DrawingPoint::new(3., 4.)];
        let anchor = GeoPoint::from_degrees(1., 1.);
        let shape = condition_shape(&drawing, anchor, 500., 10, &WebMercatorProjection);
        let expected = WebMercatorProjection.forward(anchor);
        assert!((shape.planar[0].x - expected.x).abs() < 1e-6);
        assert!((shape.planar[0].y - expected.y).abs() < 1e-6);
    }
}
