//! Focus animation
//!
//! Animations are sampled lazily: nothing ticks in the background, the
//! caller passes the frame timestamp and gets the interpolated transform.

use serde::{Deserialize, Serialize};

use super::Transform;

/// Easing curve applied to linear animation progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    Linear,
    /// `1 - (1 - t)²`
    #[default]
    EaseOutQuad,
}

impl Easing {
    /// Map progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(&self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutQuad => 1.0 - (1.0 - t) * (1.0 - t),
        }
    }
}

/// An in-flight transition between two transforms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FocusAnimation {
    /// Frame timestamp the animation started at, in milliseconds
    pub start_time: f64,
    pub duration: f64,
    pub start: Transform,
    pub target: Transform,
    pub easing: Easing,
}

impl FocusAnimation {
    pub fn end_time(&self) -> f64 {
        self.start_time + self.duration
    }

    /// Linear progress in `[0, 1]` at `now`.
    pub fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start_time) / self.duration).clamp(0.0, 1.0)
    }

    /// Interpolated transform at `now` and whether the animation has finished.
    ///
    /// Once finished the target is returned exactly, without interpolation error.
    pub fn sample(&self, now: f64) -> (Transform, bool) {
        if now >= self.end_time() {
            return (self.target, true);
        }
        let eased = self.easing.apply(self.progress(now));
        let transform = Transform {
            scale: self.start.scale + (self.target.scale - self.start.scale) * eased,
            offset: self.start.offset.lerp(&self.target.offset, eased),
        };
        (transform, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Point2;
    use pretty_assertions::assert_eq;

    fn animation() -> FocusAnimation {
        FocusAnimation {
            start_time: 1000.0,
            duration: 400.0,
            start: Transform::new(1.0, Point2::new(0.0, 0.0)),
            target: Transform::new(3.0, Point2::new(100.0, -50.0)),
            easing: Easing::EaseOutQuad,
        }
    }

    #[test]
    fn ease_out_quad_curve() {
        let e = Easing::EaseOutQuad;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.75);
        assert_eq!(e.apply(1.0), 1.0);
        assert_eq!(e.apply(2.0), 1.0);
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
    }

    #[test]
    fn samples_start_before_and_at_start() {
        let anim = animation();
        assert_eq!(anim.sample(900.0), (anim.start, false));
        assert_eq!(anim.sample(1000.0), (anim.start, false));
    }

    #[test]
    fn samples_midway_with_easing() {
        let (t, done) = animation().sample(1200.0);
        assert!(!done);
        assert_eq!(t.scale, 2.5);
        assert_eq!(t.offset, Point2::new(75.0, -37.5));
    }

    #[test]
    fn finishes_exactly_on_target() {
        let anim = animation();
        assert_eq!(anim.sample(1400.0), (anim.target, true));
        assert_eq!(anim.sample(5000.0), (anim.target, true));
    }
}
