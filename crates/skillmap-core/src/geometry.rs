//! 2D points, distances and bounding boxes shared by projection and viewport.

use serde::{Deserialize, Serialize};

/// Distances below this are treated as coincident points.
pub const COINCIDENT_EPSILON: f64 = 1e-9;

/// A point in either PCA output space or screen space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub const ORIGIN: Point2 = Point2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point2) -> f64 {
        distance(*self, *other)
    }

    /// Linear interpolation, `t = 0` at `self`, `t = 1` at `other`.
    pub fn lerp(&self, other: &Point2, t: f64) -> Point2 {
        Point2::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

impl From<[f64; 2]> for Point2 {
    fn from([x, y]: [f64; 2]) -> Self {
        Self { x, y }
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Point2, b: Point2) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    (dx * dx + dy * dy).sqrt()
}

/// Distance from `target` to the closest point that does not coincide with it.
///
/// Returns `None` when every point coincides with `target` (or `points` is empty).
pub fn nearest_neighbor_distance(target: Point2, points: &[Point2]) -> Option<f64> {
    points
        .iter()
        .map(|p| distance(target, *p))
        .filter(|d| *d > COINCIDENT_EPSILON)
        .min_by(|a, b| a.total_cmp(b))
}

/// Index pairs `(i, j)` with `i < j` closer than `threshold`, in lexicographic order.
pub fn connections(points: &[Point2], threshold: f64) -> Vec<(usize, usize)> {
    let mut edges = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            if distance(points[i], points[j]) < threshold {
                edges.push((i, j));
            }
        }
    }
    edges
}

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Point2,
    pub max: Point2,
}

impl BoundingBox {
    /// Box around all points, `None` for an empty slice.
    pub fn around(points: impl IntoIterator<Item = Point2>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut bbox = BoundingBox {
            min: first,
            max: first,
        };
        for p in iter {
            bbox.min.x = bbox.min.x.min(p.x);
            bbox.min.y = bbox.min.y.min(p.y);
            bbox.max.x = bbox.max.x.max(p.x);
            bbox.max.y = bbox.max.y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    pub fn center(&self) -> Point2 {
        self.min.lerp(&self.max, 0.5)
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}
