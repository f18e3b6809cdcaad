//! Embedded image object.

use super::{ObjectId, ObjectTrait, value_as_f64, value_as_string};
use crate::geometry::rect_contains;
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Placeholder shown while an image url is waiting for resolution.
pub const PLACEHOLDER_IMAGE_URL: &str = "assets/image_placeholder.png";

/// An embedded raster image anchored at its top-left corner.
///
/// The stored `url` is the authoritative reference persisted in the log;
/// the displayable url is resolved through an external store and cached on
/// the live object only (never serialized, never appended to the log).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: ObjectId,
    /// Top-left corner.
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Stored url.
    pub url: String,
    /// Url the image was originally uploaded from, when different.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_url: Option<String>,
    /// Transient upload filename; dropped by export url transforms.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Resolved display url. Runtime cache state, never persisted.
    #[serde(skip)]
    pub resolved_url: Option<String>,
}

impl Image {
    /// Create a new image object.
    pub fn new(url: impl Into<String>, position: Point, width: f64, height: f64) -> Self {
        Self {
            id: super::new_object_id(),
            x: position.x,
            y: position.y,
            width,
            height,
            url: url.into(),
            original_url: None,
            filename: None,
            resolved_url: None,
        }
    }

    /// Url the renderer should display: the resolved one, or the
    /// placeholder while resolution is still pending.
    pub fn display_url(&self) -> &str {
        self.resolved_url.as_deref().unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    /// Whether this image is still waiting for url resolution.
    pub fn is_pending(&self) -> bool {
        self.resolved_url.is_none()
    }

    /// Point the image at a new stored url and fall back to the placeholder
    /// until the new url resolves.
    pub fn set_url_pending(&mut self, url: String) {
        self.url = url;
        self.resolved_url = None;
    }

    /// Record the resolved display url. Safe to apply repeatedly.
    pub fn apply_resolution(&mut self, display_url: &str) {
        self.resolved_url = Some(display_url.to_string());
    }

    fn as_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height)
    }
}

impl ObjectTrait for Image {
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
            // A url edit routes through the placeholder-then-patch path
            // rather than a raw assignment.
            "url" => match value_as_string(value) {
                Some(url) => {
                    self.set_url_pending(url);
                    true
                }
                None => false,
            },
            "originalUrl" => {
                self.original_url = value.as_str().map(str::to_string);
                true
            }
            "filename" => {
                self.filename = value.as_str().map(str::to_string);
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

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_placeholder_until_resolved() {
        let mut img = Image::new("curriculum/unit/cat.png", Point::ZERO, 100.0, 80.0);
        assert!(img.is_pending());
        assert_eq!(img.display_url(), PLACEHOLDER_IMAGE_URL);

        img.apply_resolution("blob:resolved-cat");
        assert!(!img.is_pending());
        assert_eq!(img.display_url(), "blob:resolved-cat");

        // Idempotent.
        img.apply_resolution("blob:resolved-cat");
        assert_eq!(img.display_url(), "blob:resolved-cat");
    }

    #[test]
    fn test_url_update_goes_pending_again() {
        let mut img = Image::new("a.png", Point::ZERO, 10.0, 10.0);
        img.apply_resolution("blob:a");

        assert!(img.set_property("url", &json!("b.png")));
        assert_eq!(img.url, "b.png");
        assert!(img.is_pending());
        assert_eq!(img.display_url(), PLACEHOLDER_IMAGE_URL);
    }

    #[test]
    fn test_resolution_state_not_serialized() {
        let mut img = Image::new("a.png", Point::ZERO, 10.0, 10.0);
        img.apply_resolution("blob:a");

        let value = serde_json::to_value(&img).unwrap();
        assert!(value.get("resolvedUrl").is_none());
        assert!(value.get("resolved_url").is_none());

        let parsed: Image = serde_json::from_value(value).unwrap();
        assert!(parsed.is_pending());
    }

    #[test]
    fn test_bounding_box_and_hit() {
        let img = Image::new("a.png", Point::new(10.0, 20.0), 100.0, 50.0);
        assert_eq!(img.bounding_box(), Rect::new(10.0, 20.0, 110.0, 70.0));
        assert!(img.hit_test(Point::new(50.0, 50.0), 0.0));
        assert!(!img.hit_test(Point::new(150.0, 50.0), 0.0));
    }
}
