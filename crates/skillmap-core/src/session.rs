//! Session - owns the dataset, weights, projection and viewport
//!
//! Lifecycle:
//!
//! ```text
//! Session::new | Session::with_weights -> load_users -> (set_weights | load_users | resize)* -> teardown
//! ```
//!
//! Re-vectorization and re-projection happen only on data or weight changes,
//! never per frame. Weight updates equal to the current weights are skipped.

use tracing::{debug, info, warn};

use crate::config::VisualConfig;
use crate::error::Result;
use crate::geometry::{connections, Point2};
use crate::hover::{detail_panel_origin, hovered_index, PanelLayout};
use crate::projection::PcaModel;
use crate::types::{FeatureWeights, UserRecord};
use crate::vectorize::{vectorize, FeatureColumn, FeatureMatrix};
use crate::viewport::{ViewportManager, ViewportSize};

/// One active visualization.
#[derive(Debug)]
pub struct Session {
    users: Vec<UserRecord>,
    weights: FeatureWeights,
    matrix: FeatureMatrix,
    model: Option<PcaModel>,
    points: Vec<Point2>,
    viewport: ViewportManager,
}

impl Session {
    /// Empty session with default weights. Rejects an invalid `config`.
    pub fn new(config: VisualConfig, size: ViewportSize) -> Result<Self> {
        Self::with_weights(config, size, FeatureWeights::default())
    }

    /// Empty session whose first projection already uses `weights`, so the
    /// viewport fit done by [`load_users`](Self::load_users) matches the
    /// points it renders.
    pub fn with_weights(
        config: VisualConfig,
        size: ViewportSize,
        weights: FeatureWeights,
    ) -> Result<Self> {
        let viewport = ViewportManager::new(config, size)?;
        Ok(Self::from_parts(viewport, sanitize(weights)))
    }

    fn from_parts(viewport: ViewportManager, weights: FeatureWeights) -> Self {
        Self {
            users: Vec::new(),
            weights,
            matrix: vectorize(&[], &weights),
            model: None,
            points: Vec::new(),
            viewport,
        }
    }

    /// Replace the dataset wholesale and re-initialize the viewport.
    ///
    /// With fewer than two users the records are kept but no points are
    /// produced and [`Error::InsufficientData`](crate::Error::InsufficientData) is returned.
    pub fn load_users(&mut self, users: Vec<UserRecord>) -> Result<&[Point2]> {
        info!(users = users.len(), "loading dataset");
        self.users = users;
        let result = self.recompute();
        self.viewport.reset(&self.points);
        result.map(|_| self.points.as_slice())
    }

    /// Update feature weights, sanitizing negative or NaN values to 0.
    ///
    /// Returns `Ok(false)` when the sanitized weights equal the current ones
    /// and nothing was recomputed. The viewport transform is left untouched.
    pub fn set_weights(&mut self, weights: FeatureWeights) -> Result<bool> {
        let sanitized = sanitize(weights);
        if sanitized == self.weights {
            debug!("weights unchanged, skipping re-projection");
            return Ok(false);
        }
        self.weights = sanitized;
        self.recompute()?;
        Ok(true)
    }

    fn recompute(&mut self) -> Result<()> {
        self.matrix = vectorize(&self.users, &self.weights);
        let projected = PcaModel::fit(&self.matrix.vectors)
            .and_then(|model| model.transform(&self.matrix.vectors).map(|p| (model, p)));
        match projected {
            Ok((model, points)) => {
                debug!(
                    points = points.len(),
                    columns = self.matrix.n_columns(),
                    explained = ?model.explained_variance_ratio(),
                    "re-projected"
                );
                self.model = Some(model);
                self.points = points;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "projection failed, clearing points");
                self.model = None;
                self.points.clear();
                Err(e)
            }
        }
    }

    pub fn users(&self) -> &[UserRecord] {
        &self.users
    }

    pub fn user(&self, index: usize) -> Option<&UserRecord> {
        self.users.get(index)
    }

    pub fn weights(&self) -> FeatureWeights {
        self.weights
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.matrix.columns
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.matrix
    }

    /// Projected points, `points()[i]` belonging to `users()[i]`. Empty until
    /// a projection succeeds.
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Whether there is something to render.
    pub fn is_ready(&self) -> bool {
        !self.points.is_empty()
    }

    pub fn explained_variance_ratio(&self) -> Option<[f64; 2]> {
        self.model.as_ref().map(PcaModel::explained_variance_ratio)
    }

    pub fn viewport(&self) -> &ViewportManager {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut ViewportManager {
        &mut self.viewport
    }

    /// Pairs of users close enough in PCA space to draw an edge.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        connections(&self.points, self.viewport.config().connection_distance)
    }

    pub fn hovered_index(&self, cursor: Point2) -> Option<usize> {
        hovered_index(&self.viewport, &self.points, cursor)
    }

    /// Where the detail panel for `index` goes, at the current transform.
    pub fn detail_panel_origin(&self, index: usize) -> Option<Point2> {
        let point = self.points.get(index)?;
        Some(detail_panel_origin(
            self.viewport.map_point(*point),
            self.viewport.size(),
            &PanelLayout::from_viewport(&self.viewport),
            self.viewport.scale(),
        ))
    }

    /// Start a focus animation on a user. Returns false for an unknown index.
    pub fn focus_user(&mut self, index: usize, now: f64) -> bool {
        let Some(target) = self.points.get(index).copied() else {
            return false;
        };
        self.viewport.focus_on(target, &self.points, now);
        true
    }

    /// Find a user's index by id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.users.iter().position(|u| u.id == id)
    }

    pub fn resize(&mut self, size: ViewportSize) {
        self.viewport.resize(size, &self.points);
    }

    /// End the session and release its dataset.
    pub fn teardown(self) {
        info!(users = self.users.len(), "session closed");
    }
}

impl Default for Session {
    fn default() -> Self {
        let viewport = ViewportManager::with_valid_config(
            VisualConfig::default(),
            ViewportSize::new(800.0, 600.0),
        );
        Self::from_parts(viewport, FeatureWeights::default())
    }
}

fn sanitize(weights: FeatureWeights) -> FeatureWeights {
    let sanitized = weights.sanitized();
    if sanitized != weights {
        warn!(?weights, ?sanitized, "clamped invalid feature weights");
    }
    sanitized
}
