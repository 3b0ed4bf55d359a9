//! User records and feature weights
//!
//! Records arrive already validated (numeric ranges, required fields,
//! URL-shaped avatar). They are never mutated after loading; a new dataset
//! replaces the old one wholesale.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Behavioural scores attached to every user, pre-normalized upstream and
/// used as-is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub e_score: f64,
    pub i_score: f64,
    pub b_score: f64,
}

impl Scores {
    pub fn new(e_score: f64, i_score: f64, b_score: f64) -> Self {
        Self {
            e_score,
            i_score,
            b_score,
        }
    }

    /// Scores in column order: e, i, b.
    pub fn as_array(&self) -> [f64; 3] {
        [self.e_score, self.i_score, self.b_score]
    }
}

/// A single user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    /// Skill name to level (>= 0)
    #[serde(default)]
    pub skills: BTreeMap<String, f64>,
    #[serde(default)]
    pub scores: Scores,
    #[serde(default)]
    pub companies: Vec<String>,
    #[serde(default)]
    pub avatar: String,
}

impl UserRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            skills: BTreeMap::new(),
            scores: Scores::default(),
            companies: Vec::new(),
            avatar: String::new(),
        }
    }

    pub fn with_skill(mut self, skill: impl Into<String>, level: f64) -> Self {
        self.skills.insert(skill.into(), level);
        self
    }

    pub fn with_scores(mut self, scores: Scores) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_company(mut self, company: impl Into<String>) -> Self {
        self.companies.push(company.into());
        self
    }

    pub fn with_avatar(mut self, avatar: impl Into<String>) -> Self {
        self.avatar = avatar.into();
        self
    }

    /// Level of a skill, 0 when the user does not list it.
    pub fn skill_level(&self, skill: &str) -> f64 {
        self.skills.get(skill).copied().unwrap_or(0.0)
    }

    pub fn works_at(&self, company: &str) -> bool {
        self.companies.iter().any(|c| c == company)
    }
}

/// Per-group multipliers applied during vectorization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureWeights {
    pub skills: f64,
    pub scores: f64,
    pub companies: f64,
}

impl Default for FeatureWeights {
    fn default() -> Self {
        Self {
            skills: 1.0,
            scores: 1.0,
            companies: 1.0,
        }
    }
}

impl FeatureWeights {
    pub fn new(skills: f64, scores: f64, companies: f64) -> Self {
        Self {
            skills,
            scores,
            companies,
        }
    }

    /// Clamp negative, NaN and infinite multipliers to 0.
    pub fn sanitized(&self) -> Self {
        fn clamp(w: f64) -> f64 {
            if w.is_finite() && w > 0.0 {
                w
            } else {
                0.0
            }
        }
        Self {
            skills: clamp(self.skills),
            scores: clamp(self.scores),
            companies: clamp(self.companies),
        }
    }

    pub fn is_sanitized(&self) -> bool {
        self.sanitized() == *self
    }
}
