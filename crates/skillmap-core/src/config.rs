//! Visualization configuration
//!
//! Every tunable the pipeline uses lives here as a named default plus an
//! overridable field. Overrides are parsed from partial JSON documents;
//! omitted fields keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::viewport::Easing;

/// Lower bound of the PCA output domain mapped onto the window.
pub const DEFAULT_PCA_DOMAIN_MIN: f64 = -2.0;
/// Upper bound of the PCA output domain mapped onto the window.
pub const DEFAULT_PCA_DOMAIN_MAX: f64 = 2.0;
pub const DEFAULT_MIN_SCALE: f64 = 0.05;
pub const DEFAULT_MAX_SCALE: f64 = 20.0;
/// Fractional scale change per unit of wheel delta.
pub const DEFAULT_ZOOM_SENSITIVITY: f64 = 0.001;
pub const DEFAULT_FOCUS_DURATION_MS: f64 = 450.0;
/// Fraction of the half-viewport at which the nearest neighbour lands after a focus.
pub const DEFAULT_FOCUS_EDGE_FRACTION: f64 = 0.4;
/// Focus zoom used when the target has no distinct neighbour.
pub const DEFAULT_FOCUS_FALLBACK_SCALE: f64 = 3.0;
/// Avatar diameter in pixels at scale 1; the hit radius is half of it.
pub const DEFAULT_AVATAR_SIZE: f64 = 40.0;
/// PCA-space distance under which two users get an edge.
pub const DEFAULT_CONNECTION_DISTANCE: f64 = 0.5;
/// Screen padding kept around the content by fit-to-content.
pub const DEFAULT_FIT_PADDING: f64 = 100.0;
pub const DEFAULT_PANEL_WIDTH: f64 = 200.0;
pub const DEFAULT_PANEL_HEIGHT: f64 = 80.0;
pub const DEFAULT_PANEL_MARGIN: f64 = 10.0;

/// How `focus_on` picks the target zoom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FocusZoomPolicy {
    /// Always zoom to the same scale.
    Fixed { scale: f64 },
    /// Zoom so the nearest other point sits at `edge_fraction` of the
    /// half-viewport from the centre. Falls back to `fallback_scale` when
    /// every other point coincides with the target.
    NearestNeighbor {
        edge_fraction: f64,
        fallback_scale: f64,
    },
}

impl Default for FocusZoomPolicy {
    fn default() -> Self {
        Self::NearestNeighbor {
            edge_fraction: DEFAULT_FOCUS_EDGE_FRACTION,
            fallback_scale: DEFAULT_FOCUS_FALLBACK_SCALE,
        }
    }
}

/// Visualization constants consumed by the viewport, hit-testing and edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    pub pca_domain_min: f64,
    pub pca_domain_max: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub zoom_sensitivity: f64,
    pub focus_duration_ms: f64,
    pub focus_easing: Easing,
    pub focus_zoom: FocusZoomPolicy,
    pub avatar_size: f64,
    pub connection_distance: f64,
    pub fit_padding: f64,
    pub panel_width: f64,
    pub panel_height: f64,
    pub panel_margin: f64,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            pca_domain_min: DEFAULT_PCA_DOMAIN_MIN,
            pca_domain_max: DEFAULT_PCA_DOMAIN_MAX,
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            zoom_sensitivity: DEFAULT_ZOOM_SENSITIVITY,
            focus_duration_ms: DEFAULT_FOCUS_DURATION_MS,
            focus_easing: Easing::EaseOutQuad,
            focus_zoom: FocusZoomPolicy::default(),
            avatar_size: DEFAULT_AVATAR_SIZE,
            connection_distance: DEFAULT_CONNECTION_DISTANCE,
            fit_padding: DEFAULT_FIT_PADDING,
            panel_width: DEFAULT_PANEL_WIDTH,
            panel_height: DEFAULT_PANEL_HEIGHT,
            panel_margin: DEFAULT_PANEL_MARGIN,
        }
    }
}

impl VisualConfig {
    /// Parse a (possibly partial) JSON override document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the invariants the viewport relies on.
    pub fn validate(&self) -> Result<()> {
        let finite = [
            self.pca_domain_min,
            self.pca_domain_max,
            self.min_scale,
            self.max_scale,
            self.zoom_sensitivity,
            self.focus_duration_ms,
            self.avatar_size,
            self.connection_distance,
            self.fit_padding,
            self.panel_width,
            self.panel_height,
            self.panel_margin,
        ];
        if finite.iter().any(|v| !v.is_finite()) {
            return Err(Error::Config("all values must be finite".into()));
        }
        if self.pca_domain_min >= self.pca_domain_max {
            return Err(Error::Config(format!(
                "pca domain is empty: [{}, {}]",
                self.pca_domain_min, self.pca_domain_max
            )));
        }
        if self.min_scale <= 0.0 || self.min_scale > self.max_scale {
            return Err(Error::Config(format!(
                "scale bounds must satisfy 0 < min <= max, got [{}, {}]",
                self.min_scale, self.max_scale
            )));
        }
        if self.focus_duration_ms <= 0.0 {
            return Err(Error::Config(format!(
                "focus duration must be positive, got {}ms",
                self.focus_duration_ms
            )));
        }
        let sizes = [
            ("zoom_sensitivity", self.zoom_sensitivity),
            ("avatar_size", self.avatar_size),
            ("connection_distance", self.connection_distance),
            ("fit_padding", self.fit_padding),
            ("panel_width", self.panel_width),
            ("panel_height", self.panel_height),
            ("panel_margin", self.panel_margin),
        ];
        if let Some((name, value)) = sizes.iter().find(|(_, v)| *v < 0.0) {
            return Err(Error::Config(format!("{} must be >= 0, got {}", name, value)));
        }
        match self.focus_zoom {
            FocusZoomPolicy::Fixed { scale } if !(scale > 0.0 && scale.is_finite()) => Err(
                Error::Config(format!("fixed focus scale must be positive, got {}", scale)),
            ),
            FocusZoomPolicy::NearestNeighbor {
                edge_fraction,
                fallback_scale,
            } if !(edge_fraction > 0.0 && edge_fraction.is_finite())
                || !(fallback_scale > 0.0 && fallback_scale.is_finite()) =>
            {
                Err(Error::Config(format!(
                    "nearest-neighbour focus needs positive edge fraction and fallback, got {} / {}",
                    edge_fraction, fallback_scale
                )))
            }
            _ => Ok(()),
        }
    }

    /// Clamp a scale into the configured bounds.
    pub fn clamp_scale(&self, scale: f64) -> f64 {
        scale.max(self.min_scale).min(self.max_scale)
    }

    /// Hit radius for a node at the given zoom.
    pub fn hit_radius(&self, scale: f64) -> f64 {
        self.avatar_size / 2.0 * scale
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_are_valid() {
        VisualConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_override_keeps_defaults() {
        let config = VisualConfig::from_json_str(r#"{"max_scale": 8.0, "avatar_size": 24}"#).unwrap();
        assert_eq!(config.max_scale, 8.0);
        assert_eq!(config.avatar_size, 24.0);
        assert_eq!(config.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(config.focus_zoom, FocusZoomPolicy::default());
    }

    #[test]
    fn fixed_focus_policy_parses() {
        let config =
            VisualConfig::from_json_str(r#"{"focus_zoom": {"policy": "fixed", "scale": 4.0}}"#)
                .unwrap();
        assert_eq!(config.focus_zoom, FocusZoomPolicy::Fixed { scale: 4.0 });
    }

    #[test]
    fn rejects_inverted_scale_bounds() {
        let err = VisualConfig::from_json_str(r#"{"min_scale": 5.0, "max_scale": 1.0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)), "got {:?}", err);
    }

    #[test]
    fn rejects_zero_min_scale() {
        let err = VisualConfig::from_json_str(r#"{"min_scale": 0.0}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_empty_domain() {
        let err =
            VisualConfig::from_json_str(r#"{"pca_domain_min": 1.0, "pca_domain_max": 1.0}"#)
                .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn rejects_malformed_json() {
        let err = VisualConfig::from_json_str("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }

    #[test]
    fn clamp_and_hit_radius() {
        let config = VisualConfig::default();
        assert_eq!(config.clamp_scale(1000.0), DEFAULT_MAX_SCALE);
        assert_eq!(config.clamp_scale(0.0), DEFAULT_MIN_SCALE);
        assert_eq!(config.hit_radius(2.0), DEFAULT_AVATAR_SIZE);
    }
}
