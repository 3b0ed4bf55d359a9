//! ViewportManager - zoom, pan and animated focus over projected points

use tracing::{debug, trace};

use crate::config::{FocusZoomPolicy, VisualConfig};
use crate::error::Result;
use crate::geometry::{distance, nearest_neighbor_distance, Point2};

use super::{
    compute_fit_transform, domain_to_window, window_to_domain, FocusAnimation, Transform,
    ViewportMode, ViewportSize,
};

/// Euclidean hit test between a screen point and the cursor.
pub fn is_near(screen: Point2, cursor: Point2, threshold: f64) -> bool {
    distance(screen, cursor) <= threshold
}

/// Current scale, offset and optional in-flight animation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub scale: f64,
    pub offset: Point2,
    pub animation: Option<FocusAnimation>,
}

impl ViewportState {
    pub fn from_transform(transform: Transform) -> Self {
        Self {
            scale: transform.scale,
            offset: transform.offset,
            animation: None,
        }
    }

    /// Last computed transform, without advancing any animation.
    pub fn transform(&self) -> Transform {
        Transform::new(self.scale, self.offset)
    }

    pub fn mode(&self) -> ViewportMode {
        match self.animation {
            Some(_) => ViewportMode::Animating,
            None => ViewportMode::Idle,
        }
    }

    /// State and transform at frame time `now`.
    ///
    /// Idle states are returned unchanged. A finished animation yields its
    /// exact target and an idle state.
    pub fn advanced(&self, now: f64) -> (ViewportState, Transform) {
        let Some(animation) = self.animation else {
            return (*self, self.transform());
        };
        let (transform, done) = animation.sample(now);
        let next = ViewportState {
            scale: transform.scale,
            offset: transform.offset,
            animation: if done { None } else { Some(animation) },
        };
        (next, transform)
    }
}

/// Owns the transform between PCA space and screen space for one session.
///
/// Mutated only from the frame loop; no locking.
#[derive(Debug, Clone)]
pub struct ViewportManager {
    config: VisualConfig,
    size: ViewportSize,
    state: ViewportState,
}

impl ViewportManager {
    /// Centred view at scale 1 (clamped).
    ///
    /// Fails with [`Error::Config`](crate::Error::Config) when `config` does
    /// not pass [`VisualConfig::validate`].
    pub fn new(config: VisualConfig, size: ViewportSize) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_valid_config(config, size))
    }

    /// View fitted to `points`.
    pub fn fitted(config: VisualConfig, size: ViewportSize, points: &[Point2]) -> Result<Self> {
        let mut viewport = Self::new(config, size)?;
        viewport.reset(points);
        Ok(viewport)
    }

    /// Caller guarantees `config` is valid.
    pub(crate) fn with_valid_config(config: VisualConfig, size: ViewportSize) -> Self {
        let transform = Transform::new(config.clamp_scale(1.0), size.center());
        Self {
            config,
            size,
            state: ViewportState::from_transform(transform),
        }
    }

    pub fn config(&self) -> &VisualConfig {
        &self.config
    }

    pub fn size(&self) -> ViewportSize {
        self.size
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn mode(&self) -> ViewportMode {
        self.state.mode()
    }

    pub fn is_animating(&self) -> bool {
        self.mode() == ViewportMode::Animating
    }

    /// Last computed transform. Stale while an animation runs until
    /// [`get_transform`](Self::get_transform) is called with a timestamp.
    pub fn transform(&self) -> Transform {
        self.state.transform()
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    /// Current transform, advancing a running animation to `now` when given.
    pub fn get_transform(&mut self, now: Option<f64>) -> Transform {
        let Some(now) = now else {
            return self.state.transform();
        };
        let (next, transform) = self.state.advanced(now);
        if self.state.animation.is_some() && next.animation.is_none() {
            debug!(scale = transform.scale, "focus animation finished");
        }
        self.state = next;
        transform
    }

    /// Zoom by `delta` wheel units keeping `pivot` (screen pixels) fixed.
    ///
    /// Returns false when dropped because an animation is running.
    pub fn zoom_at(&mut self, delta: f64, pivot: Point2) -> bool {
        if self.is_animating() {
            trace!(delta, "zoom dropped during animation");
            return false;
        }
        if delta == 0.0 {
            return true;
        }
        let old_scale = self.state.scale;
        let new_scale = self
            .config
            .clamp_scale(old_scale * (1.0 - delta * self.config.zoom_sensitivity));
        if new_scale == old_scale {
            return true;
        }
        let factor = new_scale / old_scale;
        let offset = self.state.offset;
        self.state.scale = new_scale;
        self.state.offset = Point2::new(
            pivot.x - (pivot.x - offset.x) * factor,
            pivot.y - (pivot.y - offset.y) * factor,
        );
        true
    }

    /// Shift the view by screen pixels. Unbounded.
    ///
    /// Returns false when dropped because an animation is running.
    pub fn pan(&mut self, dx: f64, dy: f64) -> bool {
        if self.is_animating() {
            trace!(dx, dy, "pan dropped during animation");
            return false;
        }
        self.state.offset.x += dx;
        self.state.offset.y += dy;
        true
    }

    /// Transform that centres `target` (PCA space) at the zoom chosen by the
    /// configured [`FocusZoomPolicy`]. `points` are the candidate neighbours.
    pub fn focus_target(&self, target: Point2, points: &[Point2]) -> Transform {
        let target_window = domain_to_window(target, self.size, &self.config);
        let scale = match self.config.focus_zoom {
            FocusZoomPolicy::Fixed { scale } => scale,
            FocusZoomPolicy::NearestNeighbor {
                edge_fraction,
                fallback_scale,
            } => {
                let window_points: Vec<Point2> = points
                    .iter()
                    .map(|p| domain_to_window(*p, self.size, &self.config))
                    .collect();
                let half_extent = self.size.width.min(self.size.height) / 2.0;
                match nearest_neighbor_distance(target_window, &window_points) {
                    Some(d) => edge_fraction * half_extent / d,
                    None => fallback_scale,
                }
            }
        };
        let scale = self.config.clamp_scale(scale);
        let center = self.size.center();
        Transform::new(
            scale,
            Point2::new(
                center.x - target_window.x * scale,
                center.y - target_window.y * scale,
            ),
        )
    }

    /// Start an animated transition centring `target`.
    ///
    /// A focus during a running animation restarts from the transform
    /// interpolated at `now` and replaces the previous target.
    pub fn focus_on(&mut self, target: Point2, points: &[Point2], now: f64) {
        let start = self.get_transform(Some(now));
        let target_transform = self.focus_target(target, points);
        debug!(
            from_scale = start.scale,
            to_scale = target_transform.scale,
            "focus animation started"
        );
        self.state = ViewportState {
            scale: start.scale,
            offset: start.offset,
            animation: Some(FocusAnimation {
                start_time: now,
                duration: self.config.focus_duration_ms,
                start,
                target: target_transform,
                easing: self.config.focus_easing,
            }),
        };
    }

    /// PCA-space point to screen pixels under the current transform.
    pub fn map_point(&self, point: Point2) -> Point2 {
        self.transform()
            .apply(domain_to_window(point, self.size, &self.config))
    }

    /// Screen pixels back to PCA space under the current transform.
    pub fn unmap_point(&self, screen: Point2) -> Point2 {
        window_to_domain(self.transform().invert(screen), self.size, &self.config)
    }

    /// Hit radius for nodes at the current zoom.
    pub fn hit_radius(&self) -> f64 {
        self.config.hit_radius(self.state.scale)
    }

    /// Whether the node drawn for `point` is under `cursor`.
    pub fn is_point_hovered(&self, point: Point2, cursor: Point2) -> bool {
        is_near(self.map_point(point), cursor, self.hit_radius())
    }

    /// Adopt a new viewport size, refitting to `points` and recentring.
    pub fn resize(&mut self, size: ViewportSize, points: &[Point2]) {
        debug!(width = size.width, height = size.height, "viewport resized");
        self.size = size;
        self.reset(points);
    }

    /// Full re-initialization: drop any animation and fit to `points`.
    pub fn reset(&mut self, points: &[Point2]) {
        let transform = compute_fit_transform(points, self.size, self.config.fit_padding, &self.config);
        self.state = ViewportState::from_transform(transform);
    }
}
