//! Expression hints: the qualitative surface a dialogue layer may act on.
//!
//! Hints never expose raw affect numbers beyond a few probabilities; the
//! categorical fields are what renderers are expected to use.

use crate::dims::{Emotion, Mood, Regulation};
use crate::impulse::{Impulse, ImpulseMap, SceneContext};
use crate::math::clamp01;
use crate::relationship::RelationshipView;
use crate::state::Psyche;
use serde::{Deserialize, Serialize};

macro_rules! hint_enum {
    ($(#[$meta:meta])* $name:ident { $( $variant:ident => $key:literal ),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $( $variant ),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $key ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

hint_enum!(Tone {
    Neutral => "neutral",
    Cold => "cold",
    Hostile => "hostile",
    Playful => "playful",
    Shy => "shy",
    Tired => "tired",
    Warm => "warm",
});

hint_enum!(Distance {
    Close => "close",
    Normal => "normal",
    Far => "far",
});

hint_enum!(Gaze {
    Glare => "glare",
    AvoidEyeContact => "avoid_eye_contact",
    SeekEyeContact => "seek_eye_contact",
});

hint_enum!(SpeechRate {
    Fast => "fast",
    Normal => "normal",
    Slow => "slow",
});

hint_enum!(Volume {
    Loud => "loud",
    Normal => "normal",
    Quiet => "quiet",
});

hint_enum!(
    /// Small visible gestures.
    MicroAction {
        ArmsCrossed => "arms_crossed",
        AvertGaze => "avert_gaze",
        Sigh => "sigh",
        Smile => "smile",
    }
);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionHints {
    pub talk_probability: f64,
    pub end_conversation_probability: f64,
    pub tone: Tone,
    pub distance: Distance,
    pub gaze: Gaze,
    pub speech_rate: SpeechRate,
    pub politeness: f64,
    pub volume: Volume,
    pub silence: f64,
    pub micro_actions: Vec<MicroAction>,
}

impl Psyche {
    pub fn generate_expression_hints<V: RelationshipView + ?Sized>(
        &self,
        actor_id: &str,
        view: &V,
        impulses: &ImpulseMap,
        scene: &SceneContext,
    ) -> ExpressionHints {
        let s = &self.state;
        let style = &self.style;
        let reg = s.effective_regulation();
        let public = if scene.is_public() { 0.05 } else { 0.0 };
        let trust = clamp01(view.trust(actor_id));

        let anger = s.emotion[Emotion::Anger];
        let shame = s.emotion[Emotion::Shame];
        let joy = s.emotion[Emotion::Joy];
        let withdraw = impulses[Impulse::Withdraw];
        let attack_verbal = impulses[Impulse::AttackVerbal];

        let talk_probability = clamp01(
            impulses[Impulse::Talk]
                - withdraw * 0.8
                - s.fatigue * 0.4
                - s.emotion[Emotion::Fear] * 0.3
                + trust * 0.1,
        );
        let end_conversation_probability =
            clamp01(withdraw * 0.7 + s.mood[Mood::Irritability] * 0.3 + s.fatigue * 0.4);
        let silence =
            clamp01(shame * 0.5 + s.mood[Mood::Melancholy] * 0.4 + s.fatigue * 0.3 + public);

        let tone = if anger > 0.6 {
            if style.aggression_masking > 0.6 {
                Tone::Cold
            } else {
                Tone::Hostile
            }
        } else if shame > 0.5 {
            if style.shame_masking > 0.6 {
                Tone::Playful
            } else {
                Tone::Shy
            }
        } else if s.fatigue > 0.7 {
            Tone::Tired
        } else if s.emotion[Emotion::Affection] + joy > 0.8 {
            Tone::Warm
        } else {
            Tone::Neutral
        };

        let distance = if impulses[Impulse::SeekTouch] > impulses[Impulse::AvoidTouch] + 0.2 {
            Distance::Close
        } else if withdraw > 0.5 {
            Distance::Far
        } else {
            Distance::Normal
        };

        let gaze = if attack_verbal > 0.6 {
            Gaze::Glare
        } else if shame > 0.5 {
            Gaze::AvoidEyeContact
        } else {
            Gaze::SeekEyeContact
        };

        let speech_rate = if s.arousal > 0.7 {
            SpeechRate::Fast
        } else if s.fatigue > 0.6 {
            SpeechRate::Slow
        } else {
            SpeechRate::Normal
        };

        let volume = if anger > 0.6 {
            Volume::Loud
        } else if shame > 0.5 {
            Volume::Quiet
        } else {
            Volume::Normal
        };

        let politeness = clamp01(
            style.politeness_baseline + 0.2 * reg[Regulation::NormAdherence] - 0.2 * attack_verbal
                + public,
        );

        let micro_actions = [
            (anger > 0.5, MicroAction::ArmsCrossed),
            (shame > 0.4, MicroAction::AvertGaze),
            (s.fatigue > 0.5, MicroAction::Sigh),
            (joy > 0.4, MicroAction::Smile),
        ]
        .into_iter()
        .filter_map(|(on, action)| on.then_some(action))
        .collect();

        ExpressionHints {
            talk_probability,
            end_conversation_probability,
            tone,
            distance,
            gaze,
            speech_rate,
            politeness,
            volume,
            silence,
            micro_actions,
        }
    }
}
