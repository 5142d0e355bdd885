//! Impulse generator: projects affect into behavioral tendencies.
//!
//! Each impulse is a clamped weighted sum of signed terms drawn from the
//! state, effective regulation and relationship signals. The three strongest
//! terms of every impulse are kept as a readable trace.

use crate::dims::{dimension, DimMap, Drive, Emotion, Mood, RecentFlag, Regulation};
use crate::math::clamp01;
use crate::relationship::RelationshipView;
use crate::state::Psyche;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;

dimension! {
    /// Behavioral tendencies handed to the dialogue layer.
    Impulse: "impulse" {
        Withdraw => "withdraw",
        Talk => "talk",
        Defy => "defy",
        Submit => "submit",
        SeekTouch => "seek_touch",
        Flirt => "flirt",
        AvoidTouch => "avoid_touch",
        Lie => "lie",
        Hide => "hide",
        AttackVerbal => "attack_verbal",
        AttackPhysical => "attack_physical",
        Help => "help",
        Please => "please",
        Assert => "assert",
        Eat => "eat",
        Sleep => "sleep",
        SeekSafety => "seek_safety",
    }
}

pub type ImpulseMap<T = f64> = DimMap<Impulse, T, { Impulse::COUNT }>;

/// Tag marking a scene as observed by others.
pub const PUBLIC: &str = "public";

/// Tags describing the current scene. Only `public` is consulted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneContext {
    pub tags: BTreeSet<String>,
}

impl SceneContext {
    pub fn private() -> Self {
        Self::default()
    }

    pub fn public() -> Self {
        Self::default().with_tag(PUBLIC)
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn is_public(&self) -> bool {
        self.tags.contains(PUBLIC)
    }
}

type Term = (&'static str, f64);

/// Clamped sum plus the top three terms by magnitude.
fn compose(terms: &[Term]) -> (f64, String) {
    let sum: f64 = terms.iter().map(|(_, v)| v).sum();
    let mut ranked = terms.to_vec();
    // Stable: ties keep declaration order
    ranked.sort_by(|a, b| b.1.abs().partial_cmp(&a.1.abs()).unwrap_or(Ordering::Equal));
    let trace = ranked
        .iter()
        .take(3)
        .map(|(name, value)| format!("{}({:.2})", name, value))
        .collect::<Vec<_>>()
        .join(" + ");
    (clamp01(sum), trace)
}

impl Psyche {
    /// Compute all impulses toward `actor_id` and record the contribution
    /// trace. Affect itself is not modified.
    pub fn generate_impulses<V: RelationshipView + ?Sized>(
        &mut self,
        actor_id: &str,
        view: &V,
        scene: &SceneContext,
    ) -> ImpulseMap {
        let (mut impulses, trace) = self.compute_impulses(actor_id, view);
        self.last_trace = trace;
        apply_boosts(self, &mut impulses, scene);
        impulses
    }

    fn compute_impulses<V: RelationshipView + ?Sized>(
        &self,
        actor_id: &str,
        view: &V,
    ) -> (ImpulseMap, ImpulseMap<String>) {
        let s = &self.state;
        let reg = s.effective_regulation();
        let trust = clamp01(view.trust(actor_id));
        let safety = clamp01(view.safety(actor_id));
        let relation_boost = 1.0 + (trust - 0.5) * 0.2;
        let threat_boost = 1.0 + (0.5 - safety) * 0.25;

        let e = |k: Emotion| s.emotion[k];
        let m = |k: Mood| s.mood[k];
        let d = |k: Drive| s.drive[k];
        let r = |k: Regulation| reg[k];

        let terms_for = |impulse: Impulse| -> Vec<Term> {
            match impulse {
                Impulse::Withdraw => vec![
                    ("fear", 0.4 * e(Emotion::Fear) * threat_boost),
                    ("disgust", 0.4 * e(Emotion::Disgust)),
                    ("stress", 0.3 * s.stress),
                    ("fatigue", 0.3 * s.fatigue),
                    ("melancholy", 0.2 * m(Mood::Melancholy)),
                    ("good_mood", -0.2 * m(Mood::GoodMood)),
                ],
                Impulse::Talk => vec![
                    ("affection", 0.4 * e(Emotion::Affection) * relation_boost),
                    ("joy", 0.3 * e(Emotion::Joy)),
                    ("approval_need", 0.3 * d(Drive::ApprovalNeed)),
                    ("belonging_need", 0.2 * d(Drive::BelongingNeed)),
                    ("fear", -0.3 * e(Emotion::Fear)),
                    ("shame", -0.2 * e(Emotion::Shame)),
                ],
                Impulse::Defy => vec![
                    ("rebellion_drive", 0.5 * d(Drive::RebellionDrive)),
                    ("anger", 0.3 * e(Emotion::Anger)),
                    ("autonomy_need", 0.2 * d(Drive::AutonomyNeed)),
                    ("stress", 0.2 * s.stress),
                    ("norm_adherence", -0.4 * r(Regulation::NormAdherence)),
                    ("risk_aversion", -0.2 * r(Regulation::RiskAversion)),
                ],
                Impulse::Submit => vec![
                    ("fear", 0.4 * e(Emotion::Fear)),
                    ("risk_aversion", 0.3 * r(Regulation::RiskAversion)),
                    ("norm_adherence", 0.2 * r(Regulation::NormAdherence)),
                    ("anger", -0.3 * e(Emotion::Anger)),
                    ("pride", -0.2 * r(Regulation::Pride)),
                ],
                Impulse::SeekTouch => vec![
                    ("intimacy_need", 0.5 * d(Drive::IntimacyNeed)),
                    ("affection", 0.4 * e(Emotion::Affection) * relation_boost),
                    ("arousal_emotion", 0.4 * e(Emotion::ArousalEmotion)),
                    ("sexual_drive", 0.3 * d(Drive::SexualDrive)),
                    ("shame", -0.3 * e(Emotion::Shame)),
                    ("fear", -0.2 * e(Emotion::Fear)),
                ],
                Impulse::Flirt => vec![
                    ("sexual_drive", 0.4 * d(Drive::SexualDrive)),
                    ("confidence", 0.4 * m(Mood::Confidence)),
                    ("good_mood", 0.3 * m(Mood::GoodMood)),
                    ("control_need", 0.2 * d(Drive::ControlNeed)),
                    ("shyness", -0.4 * r(Regulation::Shyness)),
                    ("norm_adherence", -0.2 * r(Regulation::NormAdherence)),
                ],
                Impulse::AvoidTouch => vec![
                    ("disgust", 0.6 * e(Emotion::Disgust)),
                    ("fear", 0.4 * e(Emotion::Fear) * threat_boost),
                    ("recent_boundary_violation", 0.4 * s.recent[RecentFlag::BoundaryViolation]),
                    ("stress", 0.3 * s.stress),
                    ("affection", -0.2 * e(Emotion::Affection)),
                ],
                Impulse::Lie => vec![
                    ("shame", 0.4 * e(Emotion::Shame)),
                    ("fear", 0.3 * e(Emotion::Fear)),
                    ("status_need", 0.2 * d(Drive::StatusNeed)),
                    ("empathy", -0.3 * r(Regulation::Empathy)),
                    ("norm_adherence", -0.2 * r(Regulation::NormAdherence)),
                ],
                Impulse::Hide => vec![
                    ("shame", 0.4 * e(Emotion::Shame)),
                    ("stress", 0.3 * s.stress),
                    ("anxiety", 0.2 * m(Mood::Anxiety)),
                    ("confidence", -0.2 * m(Mood::Confidence)),
                ],
                Impulse::AttackVerbal => vec![
                    ("anger", 0.6 * e(Emotion::Anger)),
                    ("contempt", 0.3 * e(Emotion::Contempt)),
                    ("aggression_drive", 0.2 * d(Drive::AggressionDrive)),
                    ("stress", 0.2 * s.stress),
                    ("self_control", -0.4 * r(Regulation::SelfControl)),
                    ("empathy", -0.2 * r(Regulation::Empathy)),
                ],
                Impulse::AttackPhysical => vec![
                    ("anger", 0.7 * e(Emotion::Anger)),
                    ("fear", -0.15 * e(Emotion::Fear)),
                ],
                Impulse::Help => vec![
                    ("affection", 0.45 * e(Emotion::Affection) * relation_boost),
                    ("empathy", 0.4 * r(Regulation::Empathy)),
                    ("fatigue", -0.2 * s.fatigue),
                ],
                Impulse::Please => vec![
                    ("approval_need", 0.45 * d(Drive::ApprovalNeed)),
                    ("fear", 0.25 * e(Emotion::Fear)),
                    ("pride", -0.2 * r(Regulation::Pride)),
                ],
                Impulse::Assert => vec![
                    ("confidence", 0.45 * m(Mood::Confidence)),
                    ("control_need", 0.25 * d(Drive::ControlNeed)),
                    ("fear", -0.2 * e(Emotion::Fear)),
                ],
                Impulse::Eat => vec![
                    ("hunger", 0.8 * d(Drive::Hunger)),
                    ("fatigue", 0.1 * s.fatigue),
                ],
                Impulse::Sleep => vec![
                    ("sleepiness", 0.75 * d(Drive::Sleepiness)),
                    ("fatigue", 0.35 * s.fatigue),
                    ("arousal", -0.2 * s.arousal),
                ],
                Impulse::SeekSafety => vec![
                    ("fear", 0.6 * e(Emotion::Fear)),
                    ("safety_need", 0.45 * d(Drive::SafetyNeed)),
                    ("stress", 0.3 * s.stress),
                ],
            }
        };

        let composed: ImpulseMap<(f64, String)> = DimMap::from_fn(|k| compose(&terms_for(k)));
        let values = composed.map(|_, (v, _)| *v);
        let trace = composed.map(|_, (_, t)| t.clone());
        (values, trace)
    }
}

/// Threshold-triggered adjustments on top of the weighted sums.
fn apply_boosts(p: &Psyche, impulses: &mut ImpulseMap, scene: &SceneContext) {
    let s = &p.state;
    let reg = s.effective_regulation();

    if s.emotion[Emotion::Shame] > 0.65 && reg[Regulation::Pride] > 0.6 {
        impulses[Impulse::AttackVerbal] = clamp01(impulses[Impulse::AttackVerbal] + 0.15);
    }
    if s.emotion[Emotion::Fear] > 0.75 && s.arousal > 0.6 {
        impulses[Impulse::Defy] = clamp01(impulses[Impulse::Defy] + 0.1);
    }
    if s.mood[Mood::Loneliness] > 0.7 && s.recent[RecentFlag::Rejection] > 0.3 {
        impulses[Impulse::SeekTouch] = clamp01(impulses[Impulse::SeekTouch] + 0.15);
    }
    if s.stress > 0.85 {
        impulses[Impulse::Lie] = clamp01(impulses[Impulse::Lie] + 0.1);
    }
    if scene.is_public() {
        impulses[Impulse::Flirt] = clamp01(impulses[Impulse::Flirt] * 0.75);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dims::Dimension;
    use crate::relationship::RelationshipSignals;
    use crate::stimulus::Stimulus;

    fn neutral() -> RelationshipSignals {
        RelationshipSignals::neutral()
    }

    #[test]
    fn test_talk_weighted_sum() {
        // Scenario D
        let mut p = Psyche::default();
        p.state.emotion[Emotion::Affection] = 0.8;
        p.state.emotion[Emotion::Joy] = 0.5;
        p.state.drive[Drive::ApprovalNeed] = 0.2;
        p.state.drive[Drive::BelongingNeed] = 0.1;
        let impulses = p.generate_impulses("player", &neutral(), &SceneContext::private());
        assert!((impulses[Impulse::Talk] - 0.55).abs() < 1e-9, "talk {}", impulses[Impulse::Talk]);
    }

    #[test]
    fn test_trace_lists_top_three_terms() {
        let mut p = Psyche::default();
        p.state.emotion[Emotion::Affection] = 0.8;
        p.state.emotion[Emotion::Joy] = 0.5;
        p.state.drive[Drive::ApprovalNeed] = 0.2;
        p.state.drive[Drive::BelongingNeed] = 0.1;
        p.generate_impulses("player", &neutral(), &SceneContext::private());
        assert_eq!(
            p.last_impulse_trace()[Impulse::Talk],
            "affection(0.32) + joy(0.15) + approval_need(0.06)"
        );
        assert!(p.last_impulse_trace()[Impulse::Withdraw]
            .starts_with("good_mood(-0.10) + stress(0.06)"));
    }

    #[test]
    fn test_all_impulses_in_unit_interval() {
        let mut p = Psyche::default();
        for tag in ["threat", "humiliation", "betrayal", "rejection"] {
            let s = Stimulus::new("a", "b").with_tag(tag).with_intensity(1.0);
            p.apply_stimulus(&s, &neutral());
        }
        let impulses = p.generate_impulses("a", &neutral(), &SceneContext::public());
        for key in Impulse::ALL {
            let v = impulses[*key];
            assert!((0.0..=1.0).contains(&v), "{} out of range: {}", key, v);
        }
    }

    #[test]
    fn test_public_scene_dampens_flirt() {
        let mut p = Psyche::default();
        p.state.drive[Drive::SexualDrive] = 1.0;
        p.state.mood[Mood::Confidence] = 1.0;
        let private =
            p.generate_impulses("a", &neutral(), &SceneContext::private())[Impulse::Flirt];
        let public = p.generate_impulses("a", &neutral(), &SceneContext::public())[Impulse::Flirt];
        assert!(private > 0.0);
        assert!((public - private * 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_low_safety_amplifies_withdrawal() {
        let mut p = Psyche::default();
        p.state.emotion[Emotion::Fear] = 0.6;
        let calm = p.generate_impulses("a", &neutral().with_safety(1.0), &SceneContext::private());
        let scared =
            p.generate_impulses("a", &neutral().with_safety(0.0), &SceneContext::private());
        assert!(scared[Impulse::Withdraw] > calm[Impulse::Withdraw]);
        assert!(scared[Impulse::AvoidTouch] > calm[Impulse::AvoidTouch]);
    }

    #[test]
    fn test_loneliness_after_rejection_boosts_seek_touch() {
        let mut p = Psyche::default();
        p.state.drive[Drive::IntimacyNeed] = 0.4;
        let before =
            p.generate_impulses("a", &neutral(), &SceneContext::private())[Impulse::SeekTouch];
        p.state.mood[Mood::Loneliness] = 0.8;
        p.state.recent[RecentFlag::Rejection] = 0.5;
        let after =
            p.generate_impulses("a", &neutral(), &SceneContext::private())[Impulse::SeekTouch];
        assert!((after - before - 0.15).abs() < 1e-12);
    }

    #[test]
    fn test_generation_does_not_touch_affect() {
        let mut p = Psyche::default();
        let before = p.state().clone();
        p.generate_impulses("a", &neutral(), &SceneContext::public());
        assert_eq!(p.state(), &before);
    }

    #[test]
    fn test_scene_context_serializes_as_tag_list() {
        let ctx: SceneContext = serde_json::from_str(r#"["public", "night"]"#).unwrap();
        assert!(ctx.is_public());
        assert!(!SceneContext::private().is_public());
    }
}
