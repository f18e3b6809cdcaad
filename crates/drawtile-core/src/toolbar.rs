//! Toolbar style settings.

use crate::objects::{DrawingObject, StrokeStyle, default_fill, value_as_f64, value_as_string};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default style for newly drawn objects.
///
/// Changing a setting while objects are selected also restyles the
/// selection; that part lives on [`crate::content::DrawingContent`], which
/// owns the selection and the log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolbarSettings {
    pub stroke: String,
    pub fill: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke_dash_array: Option<String>,
    pub stroke_width: f64,
}

impl Default for ToolbarSettings {
    fn default() -> Self {
        let style = StrokeStyle::default();
        Self {
            stroke: style.stroke,
            fill: default_fill(),
            stroke_dash_array: style.stroke_dash_array,
            stroke_width: style.stroke_width,
        }
    }
}

impl ToolbarSettings {
    /// Apply one setting by property name. Returns false for unknown names
    /// or values of the wrong shape.
    pub fn set(&mut self, prop: &str, value: &Value) -> bool {
        match prop {
            "stroke" => match value_as_string(value) {
                Some(stroke) => {
                    self.stroke = stroke;
                    true
                }
                None => false,
            },
            "fill" => match value_as_string(value) {
                Some(fill) => {
                    self.fill = fill;
                    true
                }
                None => false,
            },
            "strokeDashArray" => {
                self.stroke_dash_array = value.as_str().map(str::to_string);
                true
            }
            "strokeWidth" => match value_as_f64(value) {
                Some(width) => {
                    self.stroke_width = width;
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// Current stroke settings as an object style.
    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle {
            stroke: self.stroke.clone(),
            stroke_dash_array: self.stroke_dash_array.clone(),
            stroke_width: self.stroke_width,
        }
    }

    /// Stamp these settings onto a freshly drawn object.
    pub fn apply_to(&self, object: &mut DrawingObject) {
        match object {
            DrawingObject::Line(o) => o.style = self.stroke_style(),
            DrawingObject::Vector(o) => o.style = self.stroke_style(),
            DrawingObject::Rectangle(o) => {
                o.style = self.stroke_style();
                o.fill = self.fill.clone();
            }
            DrawingObject::Ellipse(o) => {
                o.style = self.stroke_style();
                o.fill = self.fill.clone();
            }
            // Images and variable chips carry no stroke style.
            DrawingObject::Image(_) | DrawingObject::Variable(_) => {}
        }
    }
}
