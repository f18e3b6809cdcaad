//! Variable-reference chip object.

use super::{ObjectId, ObjectTrait, value_as_f64, value_as_string};
use crate::geometry::rect_contains;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A chip displaying a named variable, anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variable {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ObjectId,
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Variable name.
    pub name: String,
    /// Current value, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Unit label, when the variable carries one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Variable {
    /// Create a new variable chip.
    pub fn new(name: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: super::new_object_id(),
            x: position.x,
            y: position.y,
            width,
            height,
            name: name.into(),
            value: None,
            unit: None,
        }
    }

    /// Human-readable label, e.g. `speed=9.8 m/s`.
    pub fn label(&self) -> String {
        match (self.value, &self.unit) {
            (Some(value), Some(unit)) => format!("{}={} {}", self.name, value, unit),
            (Some(value), None) => format!("{}={}", self.name, value),
            (None, _) => self.name.clone(),
        }
    }

    fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl ObjectTrait for Variable {
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
            "name" => match value_as_string(value) {
                Some(name) => {
                    self.name = name;
                    true
                }
                None => false,
            },
            "value" => {
                if value.is_null() {
                    self.value = None;
                    true
                } else {
                    match value_as_f64(value) {
                        Some(v) => {
                            self.value = Some(v);
                            true
                        }
                        None => false,
                    }
                }
            }
            "unit" => {
                self.unit = value.as_str().map(str::to_string);
                true
            }
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
            _ => false,
        }
    }

    fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        rect_contains(self.as_rect().inflate(tolerance, tolerance), point)
    }
}
