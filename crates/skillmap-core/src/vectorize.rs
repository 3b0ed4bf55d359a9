//! Feature vectorizer
//!
//! Turns user records into equally sized numeric vectors with the layout
//!
//! ```text
//! [skill_1 .. skill_k, e_score, i_score, b_score, company_1 .. company_m]
//! ```
//!
//! Skill and company columns are the sorted union of names across all users,
//! so the layout only depends on the user set, never on map iteration order.
//! A user lacking a skill or company contributes 0 to that column.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::types::{FeatureWeights, UserRecord};

/// How raw skill levels become column values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillNormalization {
    /// `level × weights.skills`
    Raw,
    /// `level / max observed level for that skill × weights.skills`
    MaxObserved,
}

/// Normalization applied by [`vectorize`].
pub const SKILL_NORMALIZATION: SkillNormalization = SkillNormalization::Raw;

/// Which behavioural score a column carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreKind {
    E,
    I,
    B,
}

impl ScoreKind {
    pub const ALL: [ScoreKind; 3] = [ScoreKind::E, ScoreKind::I, ScoreKind::B];
}

/// Semantic meaning of one vector component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "name", rename_all = "snake_case")]
pub enum FeatureColumn {
    Skill(String),
    Score(ScoreKind),
    Company(String),
}

impl fmt::Display for FeatureColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill(name) => write!(f, "skill:{}", name),
            Self::Score(ScoreKind::E) => write!(f, "e_score"),
            Self::Score(ScoreKind::I) => write!(f, "i_score"),
            Self::Score(ScoreKind::B) => write!(f, "b_score"),
            Self::Company(name) => write!(f, "company:{}", name),
        }
    }
}

/// Feature vectors for one (user set, weights) pair.
///
/// `vectors[i]` belongs to `users[i]`; every row has `columns.len()` entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub columns: Vec<FeatureColumn>,
    pub vectors: Vec<Vec<f64>>,
}

impl FeatureMatrix {
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn n_rows(&self) -> usize {
        self.vectors.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of a column, if present.
    pub fn column_index(&self, column: &FeatureColumn) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }
}

/// Derive the column layout for a user set.
pub fn feature_columns(users: &[UserRecord]) -> Vec<FeatureColumn> {
    let skills: BTreeSet<&str> = users
        .iter()
        .flat_map(|u| u.skills.keys().map(String::as_str))
        .collect();
    let companies: BTreeSet<&str> = users
        .iter()
        .flat_map(|u| u.companies.iter().map(String::as_str))
        .collect();

    let mut columns = Vec::with_capacity(skills.len() + 3 + companies.len());
    columns.extend(skills.into_iter().map(|s| FeatureColumn::Skill(s.to_string())));
    columns.extend(ScoreKind::ALL.into_iter().map(FeatureColumn::Score));
    columns.extend(
        companies
            .into_iter()
            .map(|c| FeatureColumn::Company(c.to_string())),
    );
    columns
}

/// Vectorize users with the crate-wide [`SKILL_NORMALIZATION`].
pub fn vectorize(users: &[UserRecord], weights: &FeatureWeights) -> FeatureMatrix {
    vectorize_with(users, weights, SKILL_NORMALIZATION)
}

/// Vectorize users with an explicit skill normalization.
///
/// Weights are used as given; sanitizing them is the caller's job.
pub fn vectorize_with(
    users: &[UserRecord],
    weights: &FeatureWeights,
    normalization: SkillNormalization,
) -> FeatureMatrix {
    let columns = feature_columns(users);

    let max_levels: BTreeMap<&str, f64> = match normalization {
        SkillNormalization::Raw => BTreeMap::new(),
        SkillNormalization::MaxObserved => {
            let mut max = BTreeMap::new();
            for user in users {
                for (skill, level) in &user.skills {
                    let entry = max.entry(skill.as_str()).or_insert(0.0f64);
                    *entry = entry.max(*level);
                }
            }
            max
        }
    };

    let vectors = users
        .iter()
        .map(|user| {
            columns
                .iter()
                .map(|column| match column {
                    FeatureColumn::Skill(skill) => {
                        let level = user.skill_level(skill);
                        let value = match normalization {
                            SkillNormalization::Raw => level,
                            SkillNormalization::MaxObserved => {
                                match max_levels.get(skill.as_str()) {
                                    Some(max) if *max > 0.0 => level / max,
                                    _ => 0.0,
                                }
                            }
                        };
                        value * weights.skills
                    }
                    FeatureColumn::Score(kind) => {
                        let score = match kind {
                            ScoreKind::E => user.scores.e_score,
                            ScoreKind::I => user.scores.i_score,
                            ScoreKind::B => user.scores.b_score,
                        };
                        score * weights.scores
                    }
                    FeatureColumn::Company(company) => {
                        let member = if user.works_at(company) { 1.0 } else { 0.0 };
                        member * weights.companies
                    }
                })
                .collect()
        })
        .collect();

    FeatureMatrix { columns, vectors }
}
