//! Read-only, serializable copy of a character's affect.
//!
//! The core defines no storage; callers persist the snapshot however they
//! like and hand it back to [`Psyche::restore`].

use crate::dims::{DriveMap, EmotionMap, MoodMap, RecentFlagMap, RegulationMap};
use crate::impulse::ImpulseMap;
use crate::state::{AffectState, Psyche};
use crate::temperament::{ExpressionStyle, Temperament};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsycheSnapshot {
    pub emotion: EmotionMap,
    pub mood: MoodMap,
    pub drive: DriveMap,
    pub regulation_base: RegulationMap,
    /// Diagnostic only; recomputed from base on restore.
    pub regulation_effective: RegulationMap,
    pub recent_flags: RecentFlagMap,
    pub stress: f64,
    pub arousal: f64,
    pub fatigue: f64,
    #[serde(default)]
    pub last_stimulus_summary: Option<String>,
    #[serde(default)]
    pub impulse_contributions: ImpulseMap<String>,
}

impl Psyche {
    pub fn snapshot(&self) -> PsycheSnapshot {
        let s = &self.state;
        PsycheSnapshot {
            emotion: s.emotion.clone(),
            mood: s.mood.clone(),
            drive: s.drive.clone(),
            regulation_base: s.regulation.clone(),
            regulation_effective: s.effective_regulation(),
            recent_flags: s.recent.clone(),
            stress: s.stress,
            arousal: s.arousal,
            fatigue: s.fatigue,
            last_stimulus_summary: self.last_stimulus.clone(),
            impulse_contributions: self.last_trace.clone(),
        }
    }

    /// Rebuild a character from a stored snapshot. Values are clamped on the
    /// way in.
    pub fn restore(
        temperament: Temperament,
        style: ExpressionStyle,
        snapshot: PsycheSnapshot,
    ) -> Self {
        let mut state = AffectState {
            emotion: snapshot.emotion,
            mood: snapshot.mood,
            drive: snapshot.drive,
            regulation: snapshot.regulation_base,
            recent: snapshot.recent_flags,
            stress: snapshot.stress,
            arousal: snapshot.arousal,
            fatigue: snapshot.fatigue,
        };
        state.normalize(&temperament);

        Self {
            temperament,
            style,
            state,
            last_stimulus: snapshot.last_stimulus_summary,
            last_trace: snapshot.impulse_contributions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dims::{Emotion, Regulation};
    use crate::impulse::SceneContext;
    use crate::relationship::RelationshipSignals;
    use crate::stimulus::Stimulus;

    #[test]
    fn test_snapshot_restore_preserves_state() {
        let mut p = Psyche::default();
        let view = RelationshipSignals::neutral();
        p.apply_stimulus(&Stimulus::new("a", "b").with_tag("betrayal").with_intensity(0.7), &view);
        p.generate_impulses("a", &view, &SceneContext::private());

        let snap = p.snapshot();
        let restored =
            Psyche::restore(Temperament::default(), ExpressionStyle::default(), snap.clone());

        assert_eq!(restored.state(), p.state());
        assert_eq!(restored.last_stimulus_summary(), p.last_stimulus_summary());
        assert_eq!(restored.snapshot(), snap);
    }

    #[test]
    fn test_restore_clamps_and_rederives_effective_regulation() {
        let mut snap = Psyche::default().snapshot();
        snap.emotion[Emotion::Joy] = 2.0;
        snap.stress = 0.95;
        snap.regulation_effective[Regulation::SelfControl] = 0.0;

        let p = Psyche::restore(Temperament::default(), ExpressionStyle::default(), snap);
        assert_eq!(p.state().emotion(Emotion::Joy), 1.0);
        let eff = p.effective_regulation();
        assert!((eff[Regulation::SelfControl] - 0.65 * 0.7).abs() < 1e-12);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let snap = Psyche::default().snapshot();
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["mood"]["rested"], 0.6);
        assert_eq!(json["recent_flags"]["recent_threat"], 0.0);
        assert!(json["last_stimulus_summary"].is_null());
        let back: PsycheSnapshot = serde_json::from_value(json).unwrap();
        assert_eq!(back.regulation_base[Regulation::Empathy], 0.6);
    }

    #[test]
    fn test_snapshot_exposes_effective_regulation() {
        let mut p = Psyche::default();
        p.state.fatigue = 0.9;
        let snap = p.snapshot();
        assert_eq!(snap.regulation_base[Regulation::SelfControl], 0.65);
        assert!((snap.regulation_effective[Regulation::SelfControl] - 0.65 * 0.85).abs() < 1e-12);
    }
}
