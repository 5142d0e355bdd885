//! Stimulus processor: turns one tagged social event into affect deltas.
//!
//! The per-tag effects are data. `TAG_RULES` maps each tag group to a list
//! of effects, and a single loop interprets them in the stimulus's tag order.

use crate::dims::{Drive, Emotion, Mood, RecentFlag, Regulation, RegulationMap};
use crate::math::{clamp01, clamp_signed};
use crate::relationship::RelationshipView;
use crate::state::Psyche;
use crate::stimulus::Stimulus;

// =============================================================================
// Effect table
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Target {
    Emotion(Emotion),
    Mood(Mood),
    Drive(Drive),
    Stress,
    Arousal,
    Fatigue,
    /// Raise-to-max; never lowers the flag.
    Recent(RecentFlag),
}

/// Extra multiplier applied on top of the working intensity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Factor {
    One,
    /// `1 - 0.3 * self_control_eff`
    SelfControlDamp,
    SocialCost,
    Pride,
    SexualAwareness,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Magnitude {
    /// `weight * i * factor`
    Scaled(f64, Factor),
    /// The trust-discounted violation level, independent of intensity.
    EffectiveViolation,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Condition {
    Always,
    SafeWithActor,
    UnsafeWithActor,
    ViolationAbove(f64),
    /// Only when the matched tag is exactly this one.
    OnlyTag(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Effect {
    pub target: Target,
    pub magnitude: Magnitude,
    pub condition: Condition,
}

#[derive(Debug)]
pub(crate) struct TagRule {
    pub tags: &'static [&'static str],
    pub effects: &'static [Effect],
}

const fn fx(target: Target, weight: f64) -> Effect {
    Effect {
        target,
        magnitude: Magnitude::Scaled(weight, Factor::One),
        condition: Condition::Always,
    }
}

const fn fx_by(target: Target, weight: f64, factor: Factor) -> Effect {
    Effect {
        target,
        magnitude: Magnitude::Scaled(weight, factor),
        condition: Condition::Always,
    }
}

const fn fx_if(target: Target, weight: f64, condition: Condition) -> Effect {
    Effect {
        target,
        magnitude: Magnitude::Scaled(weight, Factor::One),
        condition,
    }
}

use self::Target::{Arousal, Fatigue, Recent, Stress};
use self::Target::Drive as D;
use self::Target::Emotion as E;
use self::Target::Mood as M;

pub(crate) static TAG_RULES: &[TagRule] = &[
    TagRule {
        tags: &["praise", "admiration", "thanks"],
        effects: &[
            fx(E(Emotion::Joy), 0.6),
            fx(E(Emotion::Affection), 0.3),
            fx(M(Mood::Confidence), 0.2),
            fx(Recent(RecentFlag::Praise), 0.7),
        ],
    },
    TagRule {
        tags: &["insult", "ridicule"],
        effects: &[
            fx_by(E(Emotion::Anger), 0.6, Factor::SelfControlDamp),
            fx_by(E(Emotion::Shame), 0.4, Factor::SocialCost),
            fx(E(Emotion::Sadness), 0.3),
            fx(M(Mood::Irritability), 0.2),
        ],
    },
    TagRule {
        tags: &["humiliation"],
        effects: &[
            fx(E(Emotion::Shame), 0.8),
            fx_by(E(Emotion::Anger), 0.4, Factor::Pride),
            fx(Stress, 0.5),
            fx(Recent(RecentFlag::Humiliation), 0.8),
        ],
    },
    TagRule {
        tags: &["threat", "violence", "danger"],
        effects: &[
            fx(E(Emotion::Fear), 0.8),
            fx(Stress, 0.7),
            fx(Arousal, 0.4),
            fx(Recent(RecentFlag::Threat), 0.9),
        ],
    },
    TagRule {
        tags: &["comfort", "support", "protection", "safe_signal"],
        effects: &[
            fx(E(Emotion::Joy), 0.3),
            fx(E(Emotion::Fear), -0.3),
            fx(Stress, -0.4),
            fx(M(Mood::Rested), 0.2),
            fx(D(Drive::IntimacyNeed), -0.2),
            fx(Fatigue, -0.15),
        ],
    },
    TagRule {
        tags: &["rest"],
        effects: &[
            fx(Fatigue, -0.5),
            fx(M(Mood::Rested), 0.3),
            fx(D(Drive::Sleepiness), -0.3),
            fx(Stress, -0.1),
        ],
    },
    TagRule {
        tags: &["rejection", "neglect"],
        effects: &[
            fx(E(Emotion::Sadness), 0.6),
            fx(E(Emotion::Anger), 0.3),
            fx(M(Mood::Loneliness), 0.5),
            fx(Recent(RecentFlag::Rejection), 0.8),
        ],
    },
    TagRule {
        tags: &["betrayal"],
        effects: &[
            fx(E(Emotion::Anger), 0.7),
            fx(E(Emotion::Sadness), 0.5),
            fx(Stress, 0.6),
            fx(E(Emotion::Contempt), 0.3),
        ],
    },
    TagRule {
        tags: &["touch"],
        effects: &[
            fx_if(E(Emotion::Affection), 0.4, Condition::SafeWithActor),
            fx_if(E(Emotion::Disgust), 0.3, Condition::UnsafeWithActor),
            fx_if(Stress, 0.3, Condition::UnsafeWithActor),
        ],
    },
    TagRule {
        tags: &["intimate_touch", "sexual", "flirt"],
        effects: &[
            fx_by(E(Emotion::ArousalEmotion), 0.7, Factor::SexualAwareness),
            fx_by(E(Emotion::Shame), 0.4, Factor::SocialCost),
            fx(D(Drive::SexualDrive), 0.2),
            fx_if(E(Emotion::Disgust), 0.6, Condition::ViolationAbove(0.3)),
            fx_if(E(Emotion::Fear), 0.4, Condition::ViolationAbove(0.3)),
            fx_if(E(Emotion::Anger), 0.4, Condition::ViolationAbove(0.3)),
            Effect {
                target: Recent(RecentFlag::BoundaryViolation),
                magnitude: Magnitude::EffectiveViolation,
                condition: Condition::ViolationAbove(0.3),
            },
            fx(Recent(RecentFlag::Intimacy), 0.6),
        ],
    },
    TagRule {
        tags: &["gift", "money", "food"],
        effects: &[
            fx(E(Emotion::Joy), 0.3),
            fx(D(Drive::ApprovalNeed), -0.2),
            fx_if(D(Drive::Hunger), -0.4, Condition::OnlyTag("food")),
        ],
    },
    TagRule {
        tags: &["status_loss"],
        effects: &[fx(D(Drive::StatusNeed), 0.4)],
    },
    TagRule {
        tags: &["status_gain"],
        effects: &[fx(D(Drive::StatusNeed), -0.3), fx(M(Mood::Confidence), 0.2)],
    },
    TagRule {
        tags: &["boundary_crossing", "coercion"],
        effects: &[
            fx(Recent(RecentFlag::BoundaryViolation), 0.8),
            fx(E(Emotion::Fear), 0.2),
            fx(E(Emotion::Disgust), 0.3),
        ],
    },
];

pub(crate) fn rule_for(tag: &str) -> Option<&'static TagRule> {
    TAG_RULES.iter().find(|rule| rule.tags.contains(&tag))
}

// =============================================================================
// Appraisal
// =============================================================================

/// Everything an effect needs, computed once per stimulus.
#[derive(Debug, Clone)]
pub(crate) struct Appraisal {
    pub valence: f64,
    pub intensity: f64,
    pub violation: f64,
    /// Working intensity: effective intensity times mean tag sensitivity.
    pub i: f64,
    pub social_cost: f64,
    pub safety: f64,
    pub sexual_awareness: f64,
    pub regulation: RegulationMap,
}

impl Appraisal {
    fn factor(&self, factor: Factor) -> f64 {
        match factor {
            Factor::One => 1.0,
            Factor::SelfControlDamp => 1.0 - self.regulation[Regulation::SelfControl] * 0.3,
            Factor::SocialCost => self.social_cost,
            Factor::Pride => self.regulation[Regulation::Pride],
            Factor::SexualAwareness => self.sexual_awareness,
        }
    }

    fn holds(&self, condition: Condition, tag: &str) -> bool {
        match condition {
            Condition::Always => true,
            Condition::SafeWithActor => self.safety >= 0.5,
            Condition::UnsafeWithActor => self.safety < 0.5,
            Condition::ViolationAbove(threshold) => self.violation > threshold,
            Condition::OnlyTag(only) => tag == only,
        }
    }

    fn magnitude(&self, magnitude: Magnitude) -> f64 {
        match magnitude {
            Magnitude::Scaled(weight, factor) => weight * self.i * self.factor(factor),
            Magnitude::EffectiveViolation => self.violation,
        }
    }
}

impl Psyche {
    /// Appraise one stimulus and fold its effects into the state.
    ///
    /// A `time_passed` stimulus with a positive elapsed duration is routed to
    /// the decay engine instead.
    pub fn apply_stimulus<V: RelationshipView + ?Sized>(&mut self, stimulus: &Stimulus, view: &V) {
        self.last_stimulus = Some(stimulus.summary());

        if let Some(dt) = stimulus.elapsed_marker() {
            self.advance(dt);
            return;
        }

        let appraisal = self.appraise(stimulus, view);
        tracing::debug!(
            stimulus = %stimulus.id,
            valence = appraisal.valence,
            intensity = appraisal.intensity,
            violation = appraisal.violation,
            working_intensity = appraisal.i,
            "Appraising stimulus"
        );

        for tag in &stimulus.tags {
            let Some(rule) = rule_for(tag) else {
                continue;
            };
            for effect in rule.effects {
                if appraisal.holds(effect.condition, tag) {
                    self.apply_effect(effect.target, appraisal.magnitude(effect.magnitude));
                }
            }
        }

        let i = appraisal.i;
        let ev = appraisal.valence;
        if ev > 0.4 {
            self.add_mood(Mood::GoodMood, 0.1 * i * ev);
        } else if ev < -0.4 {
            self.add_mood(Mood::Melancholy, 0.1 * i * ev.abs());
            self.add_mood(Mood::Anxiety, 0.08 * i * ev.abs());
        }

        if stimulus.has_tag("humiliation") {
            self.add_drive(Drive::AutonomyNeed, 0.2 * i);
            self.add_drive(Drive::RebellionDrive, 0.3 * i);
        }

        self.apply_coupling_rules();
    }

    pub fn after_stimulus<V: RelationshipView + ?Sized>(
        &self,
        stimulus: &Stimulus,
        view: &V,
    ) -> Self {
        let mut next = self.clone();
        next.apply_stimulus(stimulus, view);
        next
    }

    pub(crate) fn appraise<V: RelationshipView + ?Sized>(
        &self,
        s: &Stimulus,
        view: &V,
    ) -> Appraisal {
        let actor = s.actor_id.as_str();
        let trust = clamp01(view.trust(actor));

        let valence = clamp_signed(s.valence + view.interpretation_bias(actor));
        let intensity = clamp01(s.intensity * (0.75 + 0.5 * (1.0 - clamp01(s.ambiguity))));
        let violation = clamp01(s.violation_level * (1.0 - trust * 0.5));
        let i = intensity * self.temperament.mean_sensitivity(&s.tags);

        Appraisal {
            valence,
            intensity,
            violation,
            i,
            social_cost: clamp01(s.social_cost),
            safety: clamp01(view.safety(actor)),
            sexual_awareness: clamp01(view.sexual_awareness(actor)),
            regulation: self.state.effective_regulation(),
        }
    }

    fn apply_effect(&mut self, target: Target, delta: f64) {
        match target {
            Target::Emotion(k) => self.add_emotion(k, delta),
            Target::Mood(k) => self.add_mood(k, delta),
            Target::Drive(k) => self.add_drive(k, delta),
            Target::Stress => self.add_stress(delta),
            Target::Arousal => self.add_arousal(delta),
            Target::Fatigue => self.add_fatigue(delta),
            Target::Recent(k) => self.raise_recent(k, delta),
        }
    }
}
