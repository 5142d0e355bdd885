//! Scenario files: who the character knows and what happens to them.
//!
//! ```toml
//! character = "stilla"
//! scene = ["public"]
//!
//! [relationships.actors.player]
//! trust = 0.8
//!
//! [affinity.rival]
//! hate = 80.0
//!
//! [[events]]
//! kind = "stimulus"
//! actor = "player"
//! tags = ["praise"]
//! intensity = 0.9
//!
//! [[events]]
//! kind = "wait"
//! seconds = 1800
//!
//! [[events]]
//! kind = "turn"
//! actor = "player"
//! ```

use anima_core::{
    AffinityScores, DecayMode, ProfileConfig, RelationshipBook, SceneContext, SceneStep,
    Stimulus,
};
use anima_limbic::{LimbicSystem, SharedView, Turn};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Used when neither the command line, the scenario nor the profiles name one.
pub const FALLBACK_CHARACTER: &str = "self";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub character: Option<String>,
    /// Tags describing the setting, e.g. `public`.
    pub scene: Vec<String>,
    pub relationships: RelationshipBook,
    /// Host-style 0-100 affinity scores, merged over `relationships`.
    pub affinity: BTreeMap<String, AffinityScores>,
    pub events: Vec<ScenarioEvent>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScenarioEvent {
    Wait {
        seconds: f64,
        #[serde(default)]
        decay_mode: DecayMode,
    },
    Stimulus {
        actor: String,
        #[serde(default)]
        tags: Vec<String>,
        #[serde(default)]
        context: Vec<String>,
        intensity: Option<f64>,
        valence: Option<f64>,
        ambiguity: Option<f64>,
        violation: Option<f64>,
        social_cost: Option<f64>,
    },
    Turn {
        actor: String,
        /// Overrides the scenario's scene tags for this turn.
        public: Option<bool>,
    },
}

/// One line of output per turn.
#[derive(Debug, Clone, Serialize)]
pub struct TurnRecord {
    pub turn: usize,
    pub actor: String,
    #[serde(flatten)]
    pub result: Turn,
}

impl Scenario {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read scenario: {}", path.as_ref().display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML scenario")
    }

    /// Command line first, then the scenario, then the profiles' default.
    pub fn character_id(&self, requested: Option<&str>, profiles: &ProfileConfig) -> String {
        requested
            .or(self.character.as_deref())
            .or(profiles.default_character.as_deref())
            .unwrap_or(FALLBACK_CHARACTER)
            .to_string()
    }

    /// Relationship book with affinity scores folded in.
    pub fn view(&self) -> RelationshipBook {
        let mut book = self.relationships.clone();
        for (actor, scores) in &self.affinity {
            book.insert(actor.clone(), scores.to_signals());
        }
        book
    }

    pub fn scene_context(&self) -> SceneContext {
        self.scene
            .iter()
            .fold(SceneContext::private(), |scene, tag| scene.with_tag(tag.as_str()))
    }
}

impl ScenarioEvent {
    fn stimulus(&self, target: &str) -> Option<Stimulus> {
        let ScenarioEvent::Stimulus {
            actor,
            tags,
            context,
            intensity,
            valence,
            ambiguity,
            violation,
            social_cost,
        } = self
        else {
            return None;
        };

        let mut s = Stimulus::new(actor.as_str(), target).with_tags(tags.iter().cloned());
        for c in context {
            s = s.with_context(c.as_str());
        }
        if let Some(v) = intensity {
            s = s.with_intensity(*v);
        }
        if let Some(v) = valence {
            s = s.with_valence(*v);
        }
        if let Some(v) = ambiguity {
            s = s.with_ambiguity(*v);
        }
        if let Some(v) = violation {
            s = s.with_violation(*v);
        }
        if let Some(v) = social_cost {
            s = s.with_social_cost(*v);
        }
        Some(s)
    }
}

/// Feed every event to `limbic` in order, writing one JSON line per turn.
/// Returns the number of turns taken.
pub async fn replay<W: Write>(
    scenario: &Scenario,
    limbic: &LimbicSystem,
    out: &mut W,
) -> Result<usize> {
    let view: SharedView = Arc::new(scenario.view());
    let base_scene = scenario.scene_context();
    let mut turns = 0;

    for (index, event) in scenario.events.iter().enumerate() {
        match event {
            ScenarioEvent::Wait {
                seconds,
                decay_mode,
            } => {
                let elapsed = Duration::try_from_secs_f64(*seconds).with_context(|| {
                    format!("Event {}: invalid wait of {} seconds", index, seconds)
                })?;
                limbic
                    .apply_scene_step(SceneStep::new(elapsed).with_mode(*decay_mode))
                    .await?;
            }
            ScenarioEvent::Stimulus { .. } => {
                let Some(stimulus) = event.stimulus(limbic.id()) else {
                    continue;
                };
                if let Err(e) = stimulus.validate() {
                    tracing::warn!("Event {}: {}; values will be clamped", index, e);
                }
                limbic.apply_stimulus(stimulus, view.clone()).await?;
            }
            ScenarioEvent::Turn { actor, public } => {
                let scene = match public {
                    Some(true) => base_scene.clone().with_tag(anima_core::PUBLIC),
                    Some(false) => SceneContext {
                        tags: base_scene
                            .tags
                            .iter()
                            .filter(|t| t.as_str() != anima_core::PUBLIC)
                            .cloned()
                            .collect(),
                    },
                    None => base_scene.clone(),
                };
                let result = limbic.turn(actor.as_str(), view.clone(), scene).await?;
                turns += 1;
                let record = TurnRecord {
                    turn: turns,
                    actor: actor.clone(),
                    result,
                };
                serde_json::to_writer(&mut *out, &record)?;
                writeln!(out)?;
            }
        }
    }

    tracing::info!("Replayed {} event(s), {} turn(s)", scenario.events.len(), turns);
    Ok(turns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anima_core::{RelationshipView, Stance};

    const SCENE: &str = r#"
scene = ["public"]

[relationships.actors.player]
trust = 0.9

[affinity.rival]
hate = 80.0

[[events]]
kind = "stimulus"
actor = "player"
tags = ["praise"]
intensity = 0.9

[[events]]
kind = "wait"
seconds = 1800
decay_mode = "hard_reset_recent_flags"

[[events]]
kind = "turn"
actor = "player"
public = false
"#;

    #[test]
    fn test_parse_scenario() {
        let s = Scenario::from_toml(SCENE).unwrap();
        assert_eq!(s.events.len(), 3);
        assert!(matches!(
            s.events[1],
            ScenarioEvent::Wait {
                decay_mode: DecayMode::HardResetRecentFlags,
                ..
            }
        ));
        assert!(s.scene_context().is_public());
    }

    #[test]
    fn test_view_merges_affinity() {
        let view = Scenario::from_toml(SCENE).unwrap().view();
        assert_eq!(view.trust("player"), 0.9);
        assert_eq!(view.stance("rival"), Stance::Hate);
        assert_eq!(view.trust("nobody"), 0.5);
    }

    #[test]
    fn test_character_resolution_order() {
        let mut profiles = ProfileConfig::default();
        let mut s = Scenario::default();
        assert_eq!(s.character_id(None, &profiles), FALLBACK_CHARACTER);

        profiles.default_character = Some("stilla".into());
        assert_eq!(s.character_id(None, &profiles), "stilla");

        s.character = Some("rook".into());
        assert_eq!(s.character_id(None, &profiles), "rook");
        assert_eq!(s.character_id(Some("wren"), &profiles), "wren");
    }

    #[test]
    fn test_unknown_event_kind_rejected() {
        let bad = "[[events]]\nkind = \"teleport\"\n";
        assert!(Scenario::from_toml(bad).is_err());
    }

    #[test]
    fn test_stimulus_event_builds_stimulus() {
        let s = Scenario::from_toml(SCENE).unwrap();
        let stim = s.events[0].stimulus("stilla").unwrap();
        assert_eq!(stim.target_id, "stilla");
        assert!(stim.has_tag("praise"));
        assert_eq!(stim.intensity, 0.9);
        assert_eq!(stim.valence, 0.0);
        assert!(s.events[2].stimulus("stilla").is_none());
    }
}
