//! Property-based tests for the anima_core affect engine.
//!
//! Verifies that every scalar stays in [0, 1] under arbitrary event
//! sequences, that decay converges to the temperament's baselines, and that
//! the engine is deterministic.

use anima_core::{
    DecayMode, Dimension, Emotion, ExpressionStyle, Impulse, Mood, Psyche, PsycheSnapshot,
    RecentFlag, RelationshipSignals, SceneContext, SceneStep, Stance, Stimulus, Temperament,
    KNOWN_TAGS,
};
use proptest::prelude::*;
use std::time::Duration;

// ============================================================================
// Strategies
// ============================================================================

#[derive(Debug, Clone)]
enum Event {
    Stimulus(Stimulus),
    Step(SceneStep),
}

fn arb_stimulus() -> impl Strategy<Value = Stimulus> {
    (
        prop::sample::subsequence(KNOWN_TAGS.to_vec(), 0..4),
        -0.5f64..1.5,
        -1.5f64..1.5,
        -0.2f64..1.2,
        -0.2f64..1.2,
        -0.2f64..1.2,
    )
        .prop_map(|(tags, intensity, valence, ambiguity, violation, social_cost)| {
            Stimulus::new("actor", "self")
                .with_id("prop")
                .with_tags(tags)
                .with_intensity(intensity)
                .with_valence(valence)
                .with_ambiguity(ambiguity)
                .with_violation(violation)
                .with_social_cost(social_cost)
        })
}

fn arb_step() -> impl Strategy<Value = SceneStep> {
    (
        0u64..172_800,
        prop_oneof![
            Just(DecayMode::None),
            Just(DecayMode::SoftDecay),
            Just(DecayMode::HardResetRecentFlags),
        ],
    )
        .prop_map(|(secs, mode)| SceneStep::new(Duration::from_secs(secs)).with_mode(mode))
}

fn arb_event() -> impl Strategy<Value = Event> {
    prop_oneof![
        3 => arb_stimulus().prop_map(Event::Stimulus),
        1 => arb_step().prop_map(Event::Step),
    ]
}

/// Signals deliberately include out-of-range values.
fn arb_view() -> impl Strategy<Value = RelationshipSignals> {
    (
        -1.5f64..1.5,
        -0.5f64..1.5,
        -0.5f64..1.5,
        -0.5f64..1.5,
    )
        .prop_map(|(bias, trust, safety, awareness)| RelationshipSignals {
            interpretation_bias: bias,
            trust,
            safety,
            sexual_awareness: awareness,
            respect: 0.5,
            resentment: 0.0,
            stance: Stance::Neutral,
        })
}

fn run(p: &mut Psyche, events: &[Event], view: &RelationshipSignals) {
    for event in events {
        match event {
            Event::Stimulus(s) => p.apply_stimulus(s, view),
            Event::Step(step) => p.apply_scene_step(*step),
        }
    }
}

fn all_scalars(snap: &PsycheSnapshot) -> Vec<f64> {
    snap.emotion
        .values()
        .chain(snap.mood.values())
        .chain(snap.drive.values())
        .chain(snap.regulation_base.values())
        .chain(snap.regulation_effective.values())
        .chain(snap.recent_flags.values())
        .copied()
        .chain([snap.stress, snap.arousal, snap.fatigue])
        .collect()
}

fn in_unit(v: f64) -> bool {
    (0.0..=1.0).contains(&v)
}

// ============================================================================
// Clamp invariant
// ============================================================================

proptest! {
    /// **Core invariant**: no sequence of stimuli and scene steps can push any
    /// dimension outside [0, 1].
    #[test]
    fn prop_state_stays_in_unit_interval(
        events in prop::collection::vec(arb_event(), 1..40),
        view in arb_view(),
    ) {
        let mut p = Psyche::default();
        for event in &events {
            run(&mut p, std::slice::from_ref(event), &view);
            for v in all_scalars(&p.snapshot()) {
                prop_assert!(in_unit(v), "value {} escaped [0,1] after {:?}", v, event);
            }
        }
    }

    /// Impulses and hint probabilities are bounded for any reachable state.
    #[test]
    fn prop_outputs_stay_in_unit_interval(
        events in prop::collection::vec(arb_event(), 0..30),
        view in arb_view(),
        public in any::<bool>(),
    ) {
        let mut p = Psyche::default();
        run(&mut p, &events, &view);

        let scene = if public { SceneContext::public() } else { SceneContext::private() };
        let impulses = p.generate_impulses("actor", &view, &scene);
        for key in Impulse::ALL {
            prop_assert!(in_unit(impulses[*key]), "{} = {}", key, impulses[*key]);
        }

        let hints = p.generate_expression_hints("actor", &view, &impulses, &scene);
        prop_assert!(in_unit(hints.talk_probability));
        prop_assert!(in_unit(hints.end_conversation_probability));
        prop_assert!(in_unit(hints.politeness));
        prop_assert!(in_unit(hints.silence));
    }
}

// ============================================================================
// Decay
// ============================================================================

proptest! {
    /// Twenty of the longest half-lives return emotions and moods to
    /// baseline and clear recent flags.
    #[test]
    fn prop_decay_converges_to_baseline(
        events in prop::collection::vec(arb_stimulus(), 1..20),
        view in arb_view(),
    ) {
        let mut p = Psyche::default();
        for s in &events {
            p.apply_stimulus(s, &view);
        }
        for _ in 0..20 {
            p.apply_scene_step(SceneStep::new(Duration::from_secs(12 * 3600)));
        }

        let t = Temperament::default();
        let state = p.state();
        for key in Emotion::ALL {
            prop_assert!((state.emotion(*key) - t.baseline_emotion[*key]).abs() < 1e-6, "{}", key);
        }
        for key in Mood::ALL {
            prop_assert!((state.mood(*key) - t.baseline_mood[*key]).abs() < 1e-6, "{}", key);
        }
        for key in RecentFlag::ALL {
            prop_assert!(state.recent(*key) < 1e-3, "{}", key);
        }
        prop_assert!((state.stress() - 0.2).abs() < 1e-3);
        prop_assert!((state.arousal() - 0.15).abs() < 1e-3);
    }

    /// One stress half-life halves the gap to the resting point exactly.
    #[test]
    fn prop_stress_half_life_exact(stress in 0.0f64..=1.0) {
        let mut snap = Psyche::default().snapshot();
        snap.stress = stress;
        let mut p = Psyche::restore(Temperament::default(), ExpressionStyle::default(), snap);
        p.apply_scene_step(SceneStep::new(Duration::from_secs(30 * 60)));
        let expected = 0.2 + (stress - 0.2) * 0.5;
        prop_assert!((p.state().stress() - expected).abs() < 1e-9);
    }

    /// Splitting an idle period in two lands on the same emotions.
    #[test]
    fn prop_emotion_decay_composes(
        events in prop::collection::vec(arb_stimulus(), 1..5),
        a in 1u64..600,
        b in 1u64..600,
    ) {
        let view = RelationshipSignals::neutral();
        let mut whole = Psyche::default();
        for s in &events {
            whole.apply_stimulus(s, &view);
        }
        let mut split = whole.clone();

        whole.apply_scene_step(SceneStep::new(Duration::from_secs(a + b)));
        split.apply_scene_step(SceneStep::new(Duration::from_secs(a)));
        split.apply_scene_step(SceneStep::new(Duration::from_secs(b)));

        // Coupling may fire in between; only check the uncoupled emotions
        for key in [Emotion::Joy, Emotion::Fear, Emotion::Sadness, Emotion::Disgust] {
            prop_assert!(
                (whole.state().emotion(key) - split.state().emotion(key)).abs() < 1e-9,
                "{} diverged", key
            );
        }
    }
}

// ============================================================================
// Determinism and recent flags
// ============================================================================

proptest! {
    #[test]
    fn prop_same_inputs_same_state(
        events in prop::collection::vec(arb_event(), 0..30),
        view in arb_view(),
    ) {
        let mut a = Psyche::default();
        let mut b = Psyche::default();
        run(&mut a, &events, &view);
        run(&mut b, &events, &view);
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    /// Same state, view and scene give byte-identical impulses and hints,
    /// both across clones and across repeated calls on one character.
    #[test]
    fn prop_same_state_same_outputs(
        events in prop::collection::vec(arb_event(), 0..30),
        view in arb_view(),
        public in any::<bool>(),
    ) {
        let mut a = Psyche::default();
        run(&mut a, &events, &view);
        let mut b = a.clone();
        let scene = if public { SceneContext::public() } else { SceneContext::private() };

        let impulses_a = a.generate_impulses("actor", &view, &scene);
        let hints_a = a.generate_expression_hints("actor", &view, &impulses_a, &scene);
        let impulses_b = b.generate_impulses("actor", &view, &scene);
        let hints_b = b.generate_expression_hints("actor", &view, &impulses_b, &scene);

        prop_assert_eq!(&impulses_a, &impulses_b);
        prop_assert_eq!(&hints_a, &hints_b);
        prop_assert_eq!(a.last_impulse_trace(), b.last_impulse_trace());
        prop_assert_eq!(
            serde_json::to_string(&impulses_a).unwrap(),
            serde_json::to_string(&impulses_b).unwrap()
        );
        prop_assert_eq!(
            serde_json::to_string(&hints_a).unwrap(),
            serde_json::to_string(&hints_b).unwrap()
        );

        let trace = a.last_impulse_trace().clone();
        let again = a.generate_impulses("actor", &view, &scene);
        let hints_again = a.generate_expression_hints("actor", &view, &again, &scene);
        prop_assert_eq!(&again, &impulses_a);
        prop_assert_eq!(&hints_again, &hints_a);
        prop_assert_eq!(a.last_impulse_trace(), &trace);
    }

    /// A stimulus never lowers a recent flag; only time does.
    #[test]
    fn prop_stimulus_never_lowers_recent_flags(
        history in prop::collection::vec(arb_stimulus(), 0..10),
        next in arb_stimulus(),
        view in arb_view(),
    ) {
        let mut p = Psyche::default();
        for s in &history {
            p.apply_stimulus(s, &view);
        }
        let before = p.state().recent_flags().clone();
        let after = p.after_stimulus(&next, &view);
        for key in RecentFlag::ALL {
            prop_assert!(after.state().recent(*key) >= before[*key], "{} dropped", key);
        }
    }
}

#[test]
fn test_nan_inputs_are_sanitized() {
    let mut p = Psyche::default();
    let s = Stimulus::new("actor", "self")
        .with_tags(["threat", "praise"])
        .with_intensity(f64::NAN)
        .with_valence(f64::NAN);
    p.apply_stimulus(&s, &RelationshipSignals::neutral());
    for v in all_scalars(&p.snapshot()) {
        assert!(in_unit(v), "NaN leaked: {}", v);
    }
}
