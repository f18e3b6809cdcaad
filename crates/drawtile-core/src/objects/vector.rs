//! Straight vector (single segment) object.

use super::{ObjectId, ObjectTrait, StrokeStyle};
use crate::geometry::point_to_segment_dist;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A straight segment from an anchor to anchor + (dx, dy).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vector {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ObjectId,
    /// Anchor (start point).
    pub x: f64,
    pub y: f64,
    /// Offset to the end point.
    pub dx: f64,
    pub dy: f64,
    #[serde(flatten)]
    pub style: StrokeStyle,
}

impl Vector {
    /// Create a new vector between two absolute points.
    pub fn new(start: Point, end: Point) -> Self {
        Self {
            id: super::new_object_id(),
            x: start.x,
            y: start.y,
            dx: end.x - start.x,
            dy: end.y - start.y,
            style: StrokeStyle::default(),
        }
    }

    /// End point (anchor + delta).
    pub fn end(&self) -> Point {
        Point::new(self.x + self.dx, self.y + self.dy)
    }

    /// Length of the segment.
    pub fn length(&self) -> f64 {
        (self.dx * self.dx + self.dy * self.dy).sqrt()
    }
}

impl ObjectTrait for Vector {
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
        let end = self.end();
        Rect::new(
            self.x.min(end.x),
            self.y.min(end.y),
            self.x.max(end.x),
            self.y.max(end.y),
        )
    }

    fn set_property(&mut self, prop: &str, value: &Value) -> bool {
        self.style.set_property(prop, value)
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        point_to_segment_dist(point, self.position(), self.end())
            <= tolerance + self.style.stroke_width / 2.0
    }
}
