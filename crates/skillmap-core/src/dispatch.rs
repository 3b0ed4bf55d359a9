//! Interaction dispatcher
//!
//! Routes raw input to the session's viewport:
//!
//! | Event                         | Call                      |
//! |-------------------------------|---------------------------|
//! | wheel                         | `zoom_at`                 |
//! | drag with nothing hovered     | `pan`                     |
//! | click on a hovered point      | `focus_on`                |
//! | resize                        | `resize` (refit)          |
//! | frame                         | `get_transform(Some(now))`|
//!
//! Frame timestamps must not go backwards; an out-of-order timestamp is
//! replaced by the latest one seen.

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

use crate::geometry::Point2;
use crate::session::Session;
use crate::viewport::{Transform, ViewportSize};

/// Raw input, in screen pixels and milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Wheel { delta: f64, x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    Drag { dx: f64, dy: f64 },
    Click { x: f64, y: f64, now: f64 },
    Resize { width: f64, height: f64 },
    Frame { now: f64 },
}

/// Tracks hover state between events.
#[derive(Debug, Default)]
pub struct Dispatcher {
    hovered: Option<usize>,
    last_frame: Option<f64>,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Apply one event. Returns whether the scene needs a redraw.
    pub fn handle(&mut self, session: &mut Session, event: InputEvent) -> bool {
        trace!(?event, "dispatch");
        match event {
            InputEvent::Wheel { delta, x, y } => {
                session.viewport_mut().zoom_at(delta, Point2::new(x, y)) && delta != 0.0
            }
            InputEvent::PointerMove { x, y } => {
                let hovered = session.hovered_index(Point2::new(x, y));
                let changed = hovered != self.hovered;
                self.hovered = hovered;
                changed
            }
            InputEvent::Drag { dx, dy } => {
                if self.hovered.is_some() {
                    return false;
                }
                session.viewport_mut().pan(dx, dy)
            }
            InputEvent::Click { x, y, now } => {
                self.hovered = session.hovered_index(Point2::new(x, y));
                match self.hovered {
                    Some(index) => session.focus_user(index, self.clock(now)),
                    None => false,
                }
            }
            InputEvent::Resize { width, height } => {
                self.hovered = None;
                session.resize(ViewportSize::new(width, height));
                true
            }
            InputEvent::Frame { now } => {
                let was_animating = session.viewport().is_animating();
                let now = self.clock(now);
                session.viewport_mut().get_transform(Some(now));
                was_animating
            }
        }
    }

    /// Transform to render the frame at `now` with.
    pub fn frame(&mut self, session: &mut Session, now: f64) -> Transform {
        let now = self.clock(now);
        session.viewport_mut().get_transform(Some(now))
    }

    fn clock(&mut self, now: f64) -> f64 {
        match self.last_frame {
            Some(last) if now < last => {
                warn!(now, last, "timestamp went backwards, holding last frame time");
                last
            }
            _ => {
                self.last_frame = Some(now);
                now
            }
        }
    }
}
