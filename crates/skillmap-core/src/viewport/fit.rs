//! Fit-to-content transform, shared by initialization and resize.

use crate::config::VisualConfig;
use crate::geometry::{BoundingBox, Point2, COINCIDENT_EPSILON};

use super::{domain_to_window, Transform, ViewportSize};

/// Largest scale that shows every point with `padding` pixels to spare,
/// centred on the content's bounding box.
///
/// The scale is clamped into the configured bounds. Empty input, or content
/// without extent, keeps scale 1 (clamped) and only recentres.
pub fn compute_fit_transform(
    points: &[Point2],
    size: ViewportSize,
    padding: f64,
    config: &VisualConfig,
) -> Transform {
    let window_points = points.iter().map(|p| domain_to_window(*p, size, config));
    let Some(bbox) = BoundingBox::around(window_points) else {
        return Transform::new(config.clamp_scale(1.0), size.center());
    };

    let available_w = (size.width - 2.0 * padding).max(1.0);
    let available_h = (size.height - 2.0 * padding).max(1.0);

    let fit_axis = |available: f64, extent: f64| {
        if extent > COINCIDENT_EPSILON {
            available / extent
        } else {
            f64::INFINITY
        }
    };
    let scale = fit_axis(available_w, bbox.width()).min(fit_axis(available_h, bbox.height()));
    let scale = if scale.is_finite() { scale } else { 1.0 };
    let scale = config.clamp_scale(scale);

    let center = bbox.center();
    let screen_center = size.center();
    Transform::new(
        scale,
        Point2::new(
            screen_center.x - center.x * scale,
            screen_center.y - center.y * scale,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fits(points: &[Point2], size: ViewportSize, padding: f64) -> bool {
        let config = VisualConfig::default();
        let t = compute_fit_transform(points, size, padding, &config);
        points.iter().all(|p| {
            let s = t.apply(domain_to_window(*p, size, &config));
            s.x >= padding - 1e-6
                && s.x <= size.width - padding + 1e-6
                && s.y >= padding - 1e-6
                && s.y <= size.height - padding + 1e-6
        })
    }

    #[test]
    fn empty_points_center_view() {
        let size = ViewportSize::new(800.0, 600.0);
        let t = compute_fit_transform(&[], size, 50.0, &VisualConfig::default());
        assert_eq!(t, Transform::new(1.0, Point2::new(400.0, 300.0)));
    }

    #[test]
    fn single_point_is_centered() {
        let config = VisualConfig::default();
        let size = ViewportSize::new(800.0, 600.0);
        let p = Point2::new(1.0, -1.0);
        let t = compute_fit_transform(&[p], size, 50.0, &config);
        let s = t.apply(domain_to_window(p, size, &config));
        assert!(s.distance(&size.center()) < 1e-9);
        assert_eq!(t.scale, 1.0);
    }

    #[test]
    fn spread_points_fill_padded_area() {
        let points = [
            Point2::new(-5.0, 1.0),
            Point2::new(3.0, -4.0),
            Point2::new(0.5, 6.0),
        ];
        assert!(fits(&points, ViewportSize::new(800.0, 600.0), 100.0));
        assert!(fits(&points, ViewportSize::new(300.0, 1200.0), 20.0));
    }

    #[test]
    fn tight_axis_limits_scale() {
        let config = VisualConfig::default();
        let size = ViewportSize::new(800.0, 800.0);
        // Window extent: 400px wide, 200px tall at scale 1.
        let points = [Point2::new(-1.0, -0.5), Point2::new(1.0, 0.5)];
        let t = compute_fit_transform(&points, size, 0.0, &config);
        assert!((t.scale - 2.0).abs() < 1e-12, "scale = {}", t.scale);
    }

    #[test]
    fn scale_is_clamped() {
        let config = VisualConfig::default();
        let size = ViewportSize::new(800.0, 600.0);
        let points = [Point2::new(0.0, 0.0), Point2::new(1e-6, 1e-6)];
        let t = compute_fit_transform(&points, size, 0.0, &config);
        assert_eq!(t.scale, config.max_scale);
    }
}
