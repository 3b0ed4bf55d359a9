//! Skillmap Core
//!
//! Projects multi-attribute user profiles (skills, scores, companies) onto a
//! 2D plane and keeps the screen transform for an interactive, zoomable view
//! of the result.
//!
//! Pipeline:
//!
//! ```text
//! users + weights -> vectorize -> project (PCA) -> points -> ViewportManager -> screen
//! ```
//!
//! Rendering, data ingestion and avatar fetching live outside this crate.
//!
//! # Example
//!
//! ```rust
//! use skillmap_core::{project, vectorize, FeatureWeights, UserRecord};
//!
//! let users = vec![
//!     UserRecord::new("1", "alice").with_skill("rust", 5.0),
//!     UserRecord::new("2", "bob").with_skill("python", 4.0),
//!     UserRecord::new("3", "carol").with_skill("rust", 2.0).with_company("Acme"),
//! ];
//! let features = vectorize(&users, &FeatureWeights::default());
//! let points = project(&features.vectors).unwrap();
//! assert_eq!(points.len(), users.len());
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod geometry;
pub mod hover;
pub mod projection;
pub mod session;
pub mod types;
pub mod vectorize;
pub mod viewport;

// Re-export main types at crate root
pub use config::{FocusZoomPolicy, VisualConfig};
pub use dispatch::{Dispatcher, InputEvent};
pub use error::{Error, Result};
pub use geometry::{connections, distance, BoundingBox, Point2};
pub use hover::{detail_panel_origin, hovered_index, PanelLayout};
pub use projection::{project, PcaModel};
pub use session::Session;
pub use types::{FeatureWeights, Scores, UserRecord};
pub use vectorize::{
    feature_columns, vectorize, vectorize_with, FeatureColumn, FeatureMatrix, ScoreKind,
    SkillNormalization, SKILL_NORMALIZATION,
};
pub use viewport::{
    compute_fit_transform, is_near, Easing, FocusAnimation, Transform, ViewportManager,
    ViewportMode, ViewportSize, ViewportState,
};
