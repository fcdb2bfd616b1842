//! Point types shared across the conditioning, orientation and routing
//! stages. Kept separate from `geometry` so that `Point2D` stays generic
//! and these concrete types can pick up `serde`/`rstar` impls freely.

use crate::geometry::Point2D;
use serde::{Deserialize, Serialize};

/// A point of the user's freehand drawing, in arbitrary screen units
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct DrawingPoint {
    pub x: f64,
    pub y: f64,
}

impl DrawingPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Point2D for DrawingPoint {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn from_xy(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A point in a local planar metric frame (metres), centred on some anchor
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PlanarPoint {
    pub x: f64,
    pub y: f64,
}

impl PlanarPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_array(&self) -> [f64; 2] {
        [self.x, self.y]
    }
}

impl Point2D for PlanarPoint {
    fn x(&self) -> f64 {
        self.x
    }
    fn y(&self) -> f64 {
        self.y
    }
    fn from_xy(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}
