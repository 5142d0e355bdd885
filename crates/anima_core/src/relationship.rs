//! Relationship views: how a character currently regards another actor.
//!
//! The affect core consumes these signals but never owns or mutates them.
//! Implementations must be side-effect free and stable within one call.

use crate::math::{clamp01, clamp_signed};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stance {
    #[default]
    Neutral,
    Love,
    Hate,
}

/// Interpersonal signals for a given actor id.
pub trait RelationshipView: Send + Sync {
    /// Shift applied to incoming valence (-1.0 to 1.0).
    fn interpretation_bias(&self, actor_id: &str) -> f64;
    fn trust(&self, actor_id: &str) -> f64;
    fn safety(&self, actor_id: &str) -> f64;
    fn sexual_awareness(&self, actor_id: &str) -> f64;
    fn respect(&self, actor_id: &str) -> f64;
    fn resentment(&self, actor_id: &str) -> f64;
    fn stance(&self, actor_id: &str) -> Stance;
}

/// Fixed signals, used as-is for every actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipSignals {
    pub interpretation_bias: f64,
    pub trust: f64,
    pub safety: f64,
    pub sexual_awareness: f64,
    pub respect: f64,
    pub resentment: f64,
    pub stance: Stance,
}

impl Default for RelationshipSignals {
    fn default() -> Self {
        Self {
            interpretation_bias: 0.0,
            trust: 0.5,
            safety: 0.5,
            sexual_awareness: 0.0,
            respect: 0.5,
            resentment: 0.0,
            stance: Stance::Neutral,
        }
    }
}

impl RelationshipSignals {
    pub fn neutral() -> Self {
        Self::default()
    }

    pub fn with_trust(mut self, trust: f64) -> Self {
        self.trust = trust;
        self
    }

    pub fn with_safety(mut self, safety: f64) -> Self {
        self.safety = safety;
        self
    }

    pub fn with_bias(mut self, bias: f64) -> Self {
        self.interpretation_bias = bias;
        self
    }

    pub fn with_sexual_awareness(mut self, awareness: f64) -> Self {
        self.sexual_awareness = awareness;
        self
    }
}

impl RelationshipView for RelationshipSignals {
    fn interpretation_bias(&self, _: &str) -> f64 {
        self.interpretation_bias
    }
    fn trust(&self, _: &str) -> f64 {
        self.trust
    }
    fn safety(&self, _: &str) -> f64 {
        self.safety
    }
    fn sexual_awareness(&self, _: &str) -> f64 {
        self.sexual_awareness
    }
    fn respect(&self, _: &str) -> f64 {
        self.respect
    }
    fn resentment(&self, _: &str) -> f64 {
        self.resentment
    }
    fn stance(&self, _: &str) -> Stance {
        self.stance
    }
}

/// Per-actor signals with a fallback for strangers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RelationshipBook {
    pub actors: HashMap<String, RelationshipSignals>,
    pub stranger: RelationshipSignals,
}

impl RelationshipBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, actor_id: impl Into<String>, signals: RelationshipSignals) {
        self.actors.insert(actor_id.into(), signals);
    }

    pub fn with(mut self, actor_id: impl Into<String>, signals: RelationshipSignals) -> Self {
        self.insert(actor_id, signals);
        self
    }

    fn get(&self, actor_id: &str) -> &RelationshipSignals {
        self.actors.get(actor_id).unwrap_or(&self.stranger)
    }
}

impl RelationshipView for RelationshipBook {
    fn interpretation_bias(&self, actor_id: &str) -> f64 {
        self.get(actor_id).interpretation_bias
    }
    fn trust(&self, actor_id: &str) -> f64 {
        self.get(actor_id).trust
    }
    fn safety(&self, actor_id: &str) -> f64 {
        self.get(actor_id).safety
    }
    fn sexual_awareness(&self, actor_id: &str) -> f64 {
        self.get(actor_id).sexual_awareness
    }
    fn respect(&self, actor_id: &str) -> f64 {
        self.get(actor_id).respect
    }
    fn resentment(&self, actor_id: &str) -> f64 {
        self.get(actor_id).resentment
    }
    fn stance(&self, actor_id: &str) -> Stance {
        self.get(actor_id).stance
    }
}

/// Stance switches on at this score (0-100 scale).
const STANCE_ON: f64 = 75.0;

/// Affinity ledger kept by the host application on a 0-100 scale.
///
/// Converted into [`RelationshipSignals`] so it can drive the affect core.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AffinityScores {
    pub like: f64,
    pub dislike: f64,
    pub liked: f64,
    pub disliked: f64,
    pub love: f64,
    pub hate: f64,
    pub trust: f64,
    pub respect: f64,
    pub sexual_awareness: f64,
}

impl AffinityScores {
    pub fn to_signals(&self) -> RelationshipSignals {
        let balance = (self.liked - self.disliked) + (self.love - self.hate);
        let stance = if self.love >= STANCE_ON && self.love > self.hate {
            Stance::Love
        } else if self.hate >= STANCE_ON {
            Stance::Hate
        } else {
            Stance::Neutral
        };

        RelationshipSignals {
            interpretation_bias: clamp_signed(balance / 200.0 * 0.5),
            trust: clamp01(self.trust / 100.0),
            safety: clamp01(0.5 + (self.trust - self.hate) / 200.0),
            sexual_awareness: clamp01(self.sexual_awareness / 100.0),
            respect: clamp01(self.respect / 100.0),
            resentment: clamp01(self.hate / 100.0),
            stance,
        }
    }
}

impl From<&AffinityScores> for RelationshipSignals {
    fn from(scores: &AffinityScores) -> Self {
        scores.to_signals()
    }
}
