//! Rectangle object.

use super::{ObjectId, ObjectTrait, StrokeStyle, default_fill, value_as_f64, value_as_string};
use crate::geometry::rect_contains;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ObjectId,
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Fill color ("none" = outline only).
    #[serde(default = "default_fill")]
    pub fill: String,
    #[serde(flatten)]
    pub style: StrokeStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(position: Point, width: f64, height: f64) -> Self {
        Self {
            id: super::new_object_id(),
            x: position.x,
            y: position.y,
            width,
            height,
            fill: default_fill(),
            style: StrokeStyle::default(),
        }
    }

    /// Create a rectangle from two corner points.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    /// Whether the rectangle is filled.
    pub fn is_filled(&self) -> bool {
        self.fill != "none"
    }

    fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl ObjectTrait for Rectangle {
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
        self.as_rect()
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
            "width" => match value_as_f64(value) {
                Some(w) => {
                    self.width = w;
                    true
                }
                None => false,
            },
            "height" => match value_as_f64(value) {
                Some(h) => {
                    self.height = h;
                    true
                }
                None => false,
            },
            _ => self.style.set_property(prop, value),
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        let rect = self.as_rect();
        if self.is_filled() {
            // Filled: hit anywhere inside
            rect_contains(rect.inflate(tolerance, tolerance), point)
        } else {
            // Outline only: hit on the border
            let reach = tolerance + self.style.stroke_width / 2.0;
            let outer = rect.inflate(reach, reach);
            let inner = rect.inflate(-reach, -reach);
            rect_contains(outer, point)
                && !(inner.width() > 0.0 && inner.height() > 0.0 && rect_contains(inner, point))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bounding_box() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert_eq!(rect.bounding_box(), Rect::new(10.0, 20.0, 110.0, 70.0));
    }

    #[test]
    fn test_from_corners_normalizes() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert_eq!(rect.bounding_box(), Rect::new(50.0, 50.0, 100.0, 100.0));
    }

    #[test]
    fn test_hit_test_outline_vs_filled() {
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 100.0, 100.0);
        // Outline only: the center is not a hit.
        assert!(!rect.hit_test(Point::new(50.0, 50.0), 2.0));
        assert!(rect.hit_test(Point::new(100.0, 50.0), 2.0));

        rect.fill = "#cccccc".to_string();
        assert!(rect.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), 0.0));
    }

    #[test]
    fn test_set_property() {
        let mut rect = Rectangle::new(Point::ZERO, 10.0, 10.0);
        assert!(rect.set_property("fill", &json!("#00ff00")));
        assert_eq!(rect.fill, "#00ff00");
        assert!(rect.set_property("width", &json!(42.0)));
        assert!((rect.width - 42.0).abs() < f64::EPSILON);
        assert!(rect.set_property("strokeWidth", &json!(4.0)));
        assert!((rect.style.stroke_width - 4.0).abs() < f64::EPSILON);
        assert!(!rect.set_property("rx", &json!(1.0)));
    }
}
