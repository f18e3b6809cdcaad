//! Selection-box geometry and shared distance helpers.

use kurbo::{Point, Rect};

/// A normalized drag-selection region with northwest/southeast corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectionBox {
    /// Northwest corner.
    pub nw: Point,
    /// Southeast corner.
    pub se: Point,
}

impl SelectionBox {
    /// Build a box from a drag gesture, normalizing the corners so `nw`
    /// is always the minimum and `se` the maximum.
    pub fn new(start: Point, current: Point) -> Self {
        Self {
            nw: Point::new(start.x.min(current.x), start.y.min(current.y)),
            se: Point::new(start.x.max(current.x), start.y.max(current.y)),
        }
    }

    /// Build a box covering a bounding rectangle.
    pub fn from_rect(rect: Rect) -> Self {
        Self::new(Point::new(rect.x0, rect.y0), Point::new(rect.x1, rect.y1))
    }

    /// Closed-rectangle containment test: points on the edge count.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.nw.x && point.x <= self.se.x && point.y >= self.nw.y && point.y <= self.se.y
    }

    /// Open-interval intersection test against a bounding rectangle.
    /// A box that only touches an edge does not overlap.
    pub fn overlaps(&self, other: Rect) -> bool {
        self.nw.x < other.x1 && self.se.x > other.x0 && self.nw.y < other.y1 && self.se.y > other.y0
    }
}

/// Closed containment test for a bounding rectangle.
pub fn rect_contains(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Axis-aligned bounding box of a point set. Empty input yields a zero rect.
pub fn bounds_of_points(points: &[Point]) -> Rect {
    let Some(first) = points.first() else {
        return Rect::ZERO;
    };
    points.iter().fold(
        Rect::new(first.x, first.y, first.x, first.y),
        |rect, p| Rect::new(rect.x0.min(p.x), rect.y0.min(p.y), rect.x1.max(p.x), rect.y1.max(p.y)),
    )
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = kurbo::Vec2::new(b.x - a.x, b.y - a.y);
    let pv = kurbo::Vec2::new(point.x - a.x, point.y - a.y);
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = Point::new(a.x + t * seg.x, a.y + t * seg.y);
    ((point.x - proj.x).powi(2) + (point.y - proj.y).powi(2)).sqrt()
}

/// Minimum distance from a point to a polyline (sequence of connected segments).
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    if points.len() == 1 {
        return point_to_segment_dist(point, points[0], points[0]);
    }
    points
        .windows(2)
        .map(|w| point_to_segment_dist(point, w[0], w[1]))
        .fold(f64::INFINITY, f64::min)
}
