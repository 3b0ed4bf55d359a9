//! Hover hit-testing and detail panel placement

use crate::geometry::{distance, Point2};
use crate::viewport::{ViewportManager, ViewportSize};

/// Vertical gap between the avatar edge and the baseline of the username label, at scale 1.
pub const USERNAME_LABEL_GAP: f64 = 25.0;

/// Index of the point drawn closest to `cursor`, if within the zoom-scaled hit radius.
///
/// Ties resolve to the lowest index.
pub fn hovered_index(viewport: &ViewportManager, points: &[Point2], cursor: Point2) -> Option<usize> {
    let radius = viewport.hit_radius();
    let mut best: Option<(usize, f64)> = None;
    for (i, p) in points.iter().enumerate() {
        let d = distance(viewport.map_point(*p), cursor);
        if d > radius {
            continue;
        }
        match best {
            Some((_, best_d)) if best_d <= d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i)
}

/// Size and spacing of the hover panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanelLayout {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
    pub avatar_size: f64,
}

impl PanelLayout {
    pub fn from_viewport(viewport: &ViewportManager) -> Self {
        let config = viewport.config();
        Self {
            width: config.panel_width,
            height: config.panel_height,
            margin: config.panel_margin,
            avatar_size: config.avatar_size,
        }
    }
}

/// Top-left corner of the detail panel for a node drawn at `anchor`.
///
/// Horizontally: right of the node if it fits, else left, else flush with
/// the right edge. Vertically: above the node if it fits, else below the
/// username label, else pinned to the top margin.
pub fn detail_panel_origin(
    anchor: Point2,
    viewport: ViewportSize,
    layout: &PanelLayout,
    scale: f64,
) -> Point2 {
    let margin = layout.margin;
    let space_left = anchor.x - margin;
    let space_right = viewport.width - (anchor.x + margin);
    let space_top = anchor.y - margin;
    let space_bottom = viewport.height - (anchor.y + margin);

    let x = if space_right >= layout.width {
        anchor.x + margin
    } else if space_left >= layout.width {
        anchor.x - margin - layout.width
    } else {
        viewport.width - layout.width - margin
    };

    let label_height = (layout.avatar_size / 2.0 + USERNAME_LABEL_GAP) * scale;
    let y = if space_top >= layout.height {
        anchor.y - margin - layout.height
    } else if space_bottom >= layout.height + label_height {
        anchor.y + margin + label_height
    } else {
        margin
    };

    Point2::new(x, y)
}
