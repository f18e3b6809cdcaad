//! Drawing object definitions.

mod ellipse;
mod image;
mod line;
mod rectangle;
mod variable;
mod vector;

pub use ellipse::Ellipse;
pub use image::{Image, PLACEHOLDER_IMAGE_URL};
pub use line::{DeltaPoint, Line};
pub use rectangle::Rectangle;
pub use variable::Variable;
pub use vector::Vector;

use crate::geometry::SelectionBox;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Unique identifier for drawing objects.
///
/// Ids travel on the wire, so they are plain strings: freshly created
/// objects get a UUID, imported documents keep whatever id they carried.
/// The empty string means "not yet assigned".
pub type ObjectId = String;

/// Generate a fresh object id, unique for the drawing's lifetime.
pub fn new_object_id() -> ObjectId {
    Uuid::new_v4().to_string()
}

pub(crate) fn default_stroke() -> String {
    "#000000".to_string()
}

pub(crate) fn default_fill() -> String {
    "none".to_string()
}

pub(crate) fn default_stroke_width() -> f64 {
    1.0
}

/// Read a numeric property value; numeric strings are accepted.
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

pub(crate) fn value_as_string(value: &Value) -> Option<String> {
    value.as_str().map(str::to_string)
}

/// Stroke styling shared by every stroked variant.
///
/// Flattened into the wire representation, so `stroke`, `strokeDashArray`
/// and `strokeWidth` appear as top-level object fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeStyle {
    /// Stroke color.
    #[serde(default = "default_stroke")]
    pub stroke: String,
    /// Dash pattern (None = solid).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash_array: Option<String>,
    /// Stroke width.
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self {
            stroke: default_stroke(),
            stroke_dash_array: None,
            stroke_width: default_stroke_width(),
        }
    }
}

impl StrokeStyle {
    /// Apply a style property by name. Returns false for unknown names or
    /// values of the wrong shape, leaving the style untouched.
    pub(crate) fn set_property(&mut self, prop: &str, value: &Value) -> bool {
        match prop {
            "stroke" => match value_as_string(value) {
                Some(s) => {
                    self.stroke = s;
                    true
                }
                None => false,
            },
            "strokeDashArray" => {
                self.stroke_dash_array = value.as_str().map(str::to_string);
                true
            }
            "strokeWidth" => match value_as_f64(value) {
                Some(w) => {
                    self.stroke_width = w;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }
}

/// Common trait for all drawing object variants.
pub trait ObjectTrait {
    /// Get the unique identifier (empty when not yet assigned).
    fn id(&self) -> &str;

    /// Get the anchor position.
    fn position(&self) -> Point;

    /// Move the anchor to `destination`; the rest of the geometry follows.
    fn set_position(&mut self, destination: Point);

    /// Get the axis-aligned bounding box ({nw, se} as x0y0/x1y1).
    fn bounding_box(&self) -> Rect;

    /// Set a named property from a raw JSON value. Returns false when the
    /// variant has no such property or the value does not fit, leaving the
    /// object untouched.
    fn set_property(&mut self, prop: &str, value: &Value) -> bool;

    /// Test whether this object falls inside a drag-selection box.
    /// Default: open-interval overlap of the bounding box.
    fn in_selection(&self, selection: &SelectionBox) -> bool {
        selection.overlaps(self.bounding_box())
    }

    /// Check if a point (in world coordinates) hits this object.
    fn hit_test(&self, point: Point, tolerance: f64) -> bool;
}

/// Tagged union of all drawing object variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DrawingObject {
    Line(Line),
    Vector(Vector),
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Image(Image),
    Variable(Variable),
}

impl DrawingObject {
    pub fn id(&self) -> &str {
        match self {
            DrawingObject::Line(o) => o.id(),
            DrawingObject::Vector(o) => o.id(),
            DrawingObject::Rectangle(o) => o.id(),
            DrawingObject::Ellipse(o) => o.id(),
            DrawingObject::Image(o) => o.id(),
            DrawingObject::Variable(o) => o.id(),
        }
    }

    /// Check whether this object already has an id.
    pub fn has_id(&self) -> bool {
        !self.id().is_empty()
    }

    /// Replace the object's id.
    pub fn set_id(&mut self, id: ObjectId) {
        match self {
            DrawingObject::Line(o) => o.id = id,
            DrawingObject::Vector(o) => o.id = id,
            DrawingObject::Rectangle(o) => o.id = id,
            DrawingObject::Ellipse(o) => o.id = id,
            DrawingObject::Image(o) => o.id = id,
            DrawingObject::Variable(o) => o.id = id,
        }
    }

    /// Assign a fresh id when none is present, returning the final id.
    pub fn ensure_id(&mut self) -> &str {
        if !self.has_id() {
            self.set_id(new_object_id());
        }
        self.id()
    }

    /// Wire name of this variant.
    pub fn object_type(&self) -> &'static str {
        match self {
            DrawingObject::Line(_) => "line",
            DrawingObject::Vector(_) => "vector",
            DrawingObject::Rectangle(_) => "rectangle",
            DrawingObject::Ellipse(_) => "ellipse",
            DrawingObject::Image(_) => "image",
            DrawingObject::Variable(_) => "variable",
        }
    }

    pub fn position(&self) -> Point {
        match self {
            DrawingObject::Line(o) => o.position(),
            DrawingObject::Vector(o) => o.position(),
            DrawingObject::Rectangle(o) => o.position(),
            DrawingObject::Ellipse(o) => o.position(),
            DrawingObject::Image(o) => o.position(),
            DrawingObject::Variable(o) => o.position(),
        }
    }

    pub fn set_position(&mut self, destination: Point) {
        match self {
            DrawingObject::Line(o) => o.set_position(destination),
            DrawingObject::Vector(o) => o.set_position(destination),
            DrawingObject::Rectangle(o) => o.set_position(destination),
            DrawingObject::Ellipse(o) => o.set_position(destination),
            DrawingObject::Image(o) => o.set_position(destination),
            DrawingObject::Variable(o) => o.set_position(destination),
        }
    }

    pub fn bounding_box(&self) -> Rect {
        match self {
            DrawingObject::Line(o) => o.bounding_box(),
            DrawingObject::Vector(o) => o.bounding_box(),
            DrawingObject::Rectangle(o) => o.bounding_box(),
            DrawingObject::Ellipse(o) => o.bounding_box(),
            DrawingObject::Image(o) => o.bounding_box(),
            DrawingObject::Variable(o) => o.bounding_box(),
        }
    }

    pub fn set_property(&mut self, prop: &str, value: &Value) -> bool {
        match self {
            DrawingObject::Line(o) => o.set_property(prop, value),
            DrawingObject::Vector(o) => o.set_property(prop, value),
            DrawingObject::Rectangle(o) => o.set_property(prop, value),
            DrawingObject::Ellipse(o) => o.set_property(prop, value),
            DrawingObject::Image(o) => o.set_property(prop, value),
            DrawingObject::Variable(o) => o.set_property(prop, value),
        }
    }

    pub fn in_selection(&self, selection: &SelectionBox) -> bool {
        match self {
            DrawingObject::Line(o) => o.in_selection(selection),
            DrawingObject::Vector(o) => o.in_selection(selection),
            DrawingObject::Rectangle(o) => o.in_selection(selection),
            DrawingObject::Ellipse(o) => o.in_selection(selection),
            DrawingObject::Image(o) => o.in_selection(selection),
            DrawingObject::Variable(o) => o.in_selection(selection),
        }
    }

    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        match self {
            DrawingObject::Line(o) => o.hit_test(point, tolerance),
            DrawingObject::Vector(o) => o.hit_test(point, tolerance),
            DrawingObject::Rectangle(o) => o.hit_test(point, tolerance),
            DrawingObject::Ellipse(o) => o.hit_test(point, tolerance),
            DrawingObject::Image(o) => o.hit_test(point, tolerance),
            DrawingObject::Variable(o) => o.hit_test(point, tolerance),
        }
    }

    /// Check if this object is an image.
    pub fn is_image(&self) -> bool {
        matches!(self, DrawingObject::Image(_))
    }

    /// Get the image if this object is an image.
    pub fn as_image(&self) -> Option<&Image> {
        match self {
            DrawingObject::Image(img) => Some(img),
            _ => None,
        }
    }

    /// Get the mutable image if this object is an image.
    pub fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            DrawingObject::Image(img) => Some(img),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tagged_union_wire_format() {
        let rect = DrawingObject::Rectangle(Rectangle::new(Point::new(1.0, 2.0), 3.0, 4.0));
        let value = serde_json::to_value(&rect).unwrap();
        assert_eq!(value["type"], "rectangle");
        assert_eq!(value["x"], 1.0);
        assert_eq!(value["width"], 3.0);
        assert_eq!(value["stroke"], "#000000");

        let parsed: DrawingObject = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, rect);
    }

    #[test]
    fn test_unknown_type_rejected() {
        let result: Result<DrawingObject, _> =
            serde_json::from_value(json!({ "type": "hexagon", "x": 0.0, "y": 0.0 }));
        assert!(result.is_err());
    }

    #[test]
    fn test_ensure_id_generates_once() {
        let mut rect = DrawingObject::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0));
        rect.set_id(String::new());
        assert!(!rect.has_id());

        let id = rect.ensure_id().to_string();
        assert!(!id.is_empty());
        assert_eq!(rect.ensure_id(), id);
    }

    #[test]
    fn test_new_object_ids_are_unique() {
        let a = new_object_id();
        let b = new_object_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_unknown_property_is_rejected() {
        let mut rect = DrawingObject::Rectangle(Rectangle::new(Point::ZERO, 1.0, 1.0));
        assert!(!rect.set_property("cornerRadius", &json!(4.0)));
        assert!(rect.set_property("stroke", &json!("#ff0000")));
    }

    #[test]
    fn test_stroke_style_value_shapes() {
        let mut style = StrokeStyle::default();
        // strokeWidth accepts numbers and numeric strings.
        assert!(style.set_property("strokeWidth", &json!(3.0)));
        assert!((style.stroke_width - 3.0).abs() < f64::EPSILON);
        assert!(style.set_property("strokeWidth", &json!("2.5")));
        assert!((style.stroke_width - 2.5).abs() < f64::EPSILON);
        // Wrong shapes leave the style untouched.
        assert!(!style.set_property("strokeWidth", &json!(true)));
        assert!(!style.set_property("stroke", &json!(7)));
        // Dash array clears back to solid on non-string values.
        assert!(style.set_property("strokeDashArray", &json!("3,3")));
        assert_eq!(style.stroke_dash_array.as_deref(), Some("3,3"));
        assert!(style.set_property("strokeDashArray", &Value::Null));
        assert_eq!(style.stroke_dash_array, None);
    }
}
