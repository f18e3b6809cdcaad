//! Freehand line (polyline) object.

use super::{ObjectId, ObjectTrait, StrokeStyle};
use crate::geometry::{SelectionBox, bounds_of_points, point_to_polyline_dist};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step of a line, relative to the previous point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeltaPoint {
    pub dx: f64,
    pub dy: f64,
}

impl DeltaPoint {
    pub fn new(dx: f64, dy: f64) -> Self {
        Self { dx, dy }
    }
}

/// A freehand line: an anchor point plus ordered delta points.
///
/// Storing deltas instead of absolute points means a move only has to
/// rewrite the anchor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ObjectId,
    /// Anchor (first point).
    pub x: f64,
    pub y: f64,
    /// Ordered deltas from the previous point.
    #[serde(default)]
    pub delta_points: Vec<DeltaPoint>,
    #[serde(flatten)]
    pub style: StrokeStyle,
}

impl Line {
    /// Create a new line starting at the anchor.
    pub fn new(anchor: Point) -> Self {
        Self {
            id: super::new_object_id(),
            x: anchor.x,
            y: anchor.y,
            delta_points: Vec::new(),
            style: StrokeStyle::default(),
        }
    }

    /// Build a line through a sequence of absolute points.
    pub fn from_points(points: &[Point]) -> Self {
        let anchor = points.first().copied().unwrap_or(Point::ZERO);
        let mut line = Self::new(anchor);
        for w in points.windows(2) {
            line.delta_points.push(DeltaPoint::new(w[1].x - w[0].x, w[1].y - w[0].y));
        }
        line
    }

    /// Extend the line by one absolute point.
    pub fn push_point(&mut self, point: Point) {
        let last = self.points().last().copied().unwrap_or(Point::new(self.x, self.y));
        self.delta_points.push(DeltaPoint::new(point.x - last.x, point.y - last.y));
    }

    /// All constituent points: the anchor plus the running sum of deltas.
    pub fn points(&self) -> Vec<Point> {
        let mut pts = Vec::with_capacity(self.delta_points.len() + 1);
        let mut current = Point::new(self.x, self.y);
        pts.push(current);
        for d in &self.delta_points {
            current = Point::new(current.x + d.dx, current.y + d.dy);
            pts.push(current);
        }
        pts
    }
}

impl ObjectTrait for Line {
    fn id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    fn set_position(&mut self, destination: Point) {
        self.x = destination.x;
        self.y = destination.y;
    }

    fn bounding_box(&self) -> Rect {
        bounds_of_points(&self.points())
    }

    fn set_property(&mut self, prop: &str, value: &Value) -> bool {
        self.style.set_property(prop, value)
    }

    /// A long diagonal's bounding box can overlap a box the line itself
    /// never crosses, so selection requires an actual point inside.
    fn in_selection(&self, selection: &SelectionBox) -> bool {
        self.points().iter().any(|p| selection.contains(*p))
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_polyline_dist(point, &self.points()) <= tolerance + self.style.stroke_width / 2.0
    }
}
