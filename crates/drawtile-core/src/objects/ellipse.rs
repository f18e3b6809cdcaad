//! Ellipse object.

use super::{ObjectId, ObjectTrait, StrokeStyle, default_fill, value_as_f64, value_as_string};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An axis-aligned ellipse anchored at its center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ObjectId,
    /// Center point.
    pub x: f64,
    pub y: f64,
    /// Horizontal radius.
    pub rx: f64,
    /// Vertical radius.
    pub ry: f64,
    /// Fill color ("none" = outline only).
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(flatten)]
    pub style: StrokeStyle,
}

impl Ellipse {
    /// Create a new ellipse.
    pub fn new(center: Point, rx: f64, ry: f64) -> Self {
        Self {
            id: super::new_object_id(),
            x: center.x,
            y: center.y,
            rx,
            ry,
            fill: default_fill(),
            style: StrokeStyle::default(),
        }
    }

    /// Create a circle.
    pub fn circle(center: Point, radius: f64) -> Self {
        Self::new(center, radius, radius)
    }

    /// Whether the ellipse is filled.
    pub fn is_filled(&self) -> bool {
        self.fill != "none"
    }
}

impl ObjectTrait for Ellipse {
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
        Rect::new(self.x - self.rx, self.y - self.ry, self.x + self.rx, self.y + self.ry)
    }

    fn set_property(&mut self, prop: &str, value: &Value) -> bool {
        match prop {
            "fill" => match value_as_string(value) {
                Some(fill) => {
                    self.fill = fill;
                    true
                }
                None => false,
            },
            "rx" => match value_as_f64(value) {
                Some(rx) => {
                    self.rx = rx;
                    true
                }
                None => false,
            },
            "ry" => match value_as_f64(value) {
                Some(ry) => {
                    self.ry = ry;
                    true
                }
                None => false,
            },
            _ => self.style.set_property(prop, value),
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let half_sw = self.style.stroke_width / 2.0;
        let dx_outer = (point.x - self.x) / (self.rx + tolerance + half_sw);
        let dy_outer = (point.y - self.y) / (self.ry + tolerance + half_sw);
        if dx_outer * dx_outer + dy_outer * dy_outer > 1.0 {
            return false;
        }
        if self.is_filled() {
            return true;
        }
        // Outline only: reject if inside inner ellipse
        let inner_rx = (self.rx - tolerance - half_sw).max(0.0);
        let inner_ry = (self.ry - tolerance - half_sw).max(0.0);
        if inner_rx < f64::EPSILON || inner_ry < f64::EPSILON {
            return true;
        }
        let dx_inner = (point.x - self.x) / inner_rx;
        let dy_inner = (point.y - self.y) / inner_ry;
        dx_inner * dx_inner + dy_inner * dy_inner > 1.0
    }
}
