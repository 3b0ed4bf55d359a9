//! Viewport transform management
//!
//! A projected point reaches the screen in two steps:
//!
//! ```text
//! PCA space --(domain map)--> window space --(scale, offset)--> screen
//! ```
//!
//! The domain map linearly sends `[pca_domain_min, pca_domain_max]` onto
//! `[-dim / 2, dim / 2]` for each axis, so window space is centred on the
//! origin and depends only on the viewport size. Zoom, pan and focus act on
//! the `(scale, offset)` pair alone:
//!
//! ```text
//! screen = window × scale + offset
//! ```
//!
//! # States
//!
//! ```text
//! Idle --focus_on--> Animating --(now >= start + duration)--> Idle
//! ```
//!
//! Zoom and pan apply immediately while idle and are dropped while animating.

mod animation;
mod fit;
mod transform;

use serde::{Deserialize, Serialize};

use crate::config::VisualConfig;
use crate::geometry::Point2;

pub use animation::{Easing, FocusAnimation};
pub use fit::compute_fit_transform;
pub use transform::{is_near, ViewportManager, ViewportState};

/// Scale and offset from window space to screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub scale: f64,
    pub offset: Point2,
}

impl Transform {
    pub fn new(scale: f64, offset: Point2) -> Self {
        Self { scale, offset }
    }

    /// Scale 1 with the window origin at the viewport centre.
    pub fn centered(size: ViewportSize) -> Self {
        Self::new(1.0, size.center())
    }

    pub fn apply(&self, window: Point2) -> Point2 {
        Point2::new(
            window.x * self.scale + self.offset.x,
            window.y * self.scale + self.offset.y,
        )
    }

    pub fn invert(&self, screen: Point2) -> Point2 {
        Point2::new(
            (screen.x - self.offset.x) / self.scale,
            (screen.y - self.offset.y) / self.scale,
        )
    }
}

/// Viewport dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point2 {
        Point2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn contains(&self, p: Point2) -> bool {
        p.x >= 0.0 && p.x <= self.width && p.y >= 0.0 && p.y <= self.height
    }
}

/// Whether a focus animation is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewportMode {
    Idle,
    Animating,
}

/// PCA-space point to window space.
pub fn domain_to_window(p: Point2, size: ViewportSize, config: &VisualConfig) -> Point2 {
    let span = config.pca_domain_max - config.pca_domain_min;
    let map = |v: f64, dim: f64| (v - config.pca_domain_min) / span * dim - dim / 2.0;
    Point2::new(map(p.x, size.width), map(p.y, size.height))
}

/// Window-space point back to PCA space.
///
/// Undefined for a zero-sized axis.
pub fn window_to_domain(w: Point2, size: ViewportSize, config: &VisualConfig) -> Point2 {
    let span = config.pca_domain_max - config.pca_domain_min;
    let unmap = |v: f64, dim: f64| (v + dim / 2.0) / dim * span + config.pca_domain_min;
    Point2::new(unmap(w.x, size.width), unmap(w.y, size.height))
}
