//! Temperament: the static, per-character configuration of the affect engine.
//!
//! Baselines are where emotions and moods settle, gains scale every additive
//! effect, half-lives set how fast each dimension relaxes, and accumulation
//! rates set how fast drives build up when nothing satisfies them.

use crate::dims::{
    DimMap, Drive, DriveMap, Emotion, EmotionMap, Mood, MoodMap, RecentFlagMap, Regulation,
    RegulationMap,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Tags the stimulus processor knows about. Each starts with sensitivity 1.0.
pub const KNOWN_TAGS: &[&str] = &[
    "praise",
    "admiration",
    "thanks",
    "insult",
    "ridicule",
    "humiliation",
    "rejection",
    "betrayal",
    "neglect",
    "comfort",
    "support",
    "protection",
    "threat",
    "violence",
    "dominance",
    "coercion",
    "touch",
    "intimate_touch",
    "sexual",
    "flirt",
    "gift",
    "money",
    "food",
    "status_gain",
    "status_loss",
    "boundary_crossing",
    "apology",
    "repair_attempt",
    "competition",
    "envy_trigger",
    "danger",
    "safe_signal",
    "rest",
    "time_passed",
];

#[derive(Debug, Clone)]
pub struct Temperament {
    pub baseline_emotion: EmotionMap,
    pub baseline_mood: MoodMap,
    pub baseline_drive: DriveMap,
    pub baseline_regulation: RegulationMap,

    pub emotion_gain: EmotionMap,
    pub mood_gain: MoodMap,
    pub drive_gain: DriveMap,

    /// Multiplier on working intensity per tag (1.0 when absent).
    pub tag_sensitivity: HashMap<String, f64>,

    pub emotion_half_life: EmotionMap<Duration>,
    pub mood_half_life: MoodMap<Duration>,
    pub recent_flag_half_life: RecentFlagMap<Duration>,
    pub stress_half_life: Duration,
    pub arousal_half_life: Duration,

    /// Per-second rise of each drive.
    pub drive_accumulation_per_sec: DriveMap,

    /// Time awake after which fatigue saturates.
    pub waking_hours: Duration,
}

impl Default for Temperament {
    fn default() -> Self {
        Self {
            baseline_emotion: EmotionMap::filled(0.0),
            baseline_mood: default_baseline_mood(),
            baseline_drive: DriveMap::filled(0.2),
            baseline_regulation: default_regulation(),
            emotion_gain: EmotionMap::filled(1.0),
            mood_gain: MoodMap::filled(1.0),
            drive_gain: DriveMap::filled(1.0),
            tag_sensitivity: KNOWN_TAGS.iter().map(|t| (t.to_string(), 1.0)).collect(),
            emotion_half_life: default_emotion_half_life(),
            mood_half_life: default_mood_half_life(),
            recent_flag_half_life: DimMap::filled(hours(1.0)),
            stress_half_life: Duration::from_secs(30 * 60),
            arousal_half_life: Duration::from_secs(15 * 60),
            drive_accumulation_per_sec: default_drive_accumulation(),
            waking_hours: hours(16.0),
        }
    }
}

impl Temperament {
    pub fn sensitivity_to(&self, tag: &str) -> f64 {
        self.tag_sensitivity.get(tag).copied().unwrap_or(1.0)
    }

    /// Average sensitivity over a tag set; 1.0 for an empty set.
    pub fn mean_sensitivity<'a>(&self, tags: impl IntoIterator<Item = &'a String>) -> f64 {
        let (sum, n) = tags
            .into_iter()
            .fold((0.0, 0usize), |(sum, n), tag| (sum + self.sensitivity_to(tag), n + 1));
        if n == 0 {
            1.0
        } else {
            sum / n as f64
        }
    }
}

/// Presentation traits consulted only by the expression hint generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExpressionStyle {
    /// Above 0.6 anger reads as "cold" rather than "hostile".
    pub aggression_masking: f64,
    /// Above 0.6 shame reads as "playful" rather than "shy".
    pub shame_masking: f64,
    pub politeness_baseline: f64,
}

impl Default for ExpressionStyle {
    fn default() -> Self {
        Self {
            aggression_masking: 0.3,
            shame_masking: 0.3,
            politeness_baseline: 0.5,
        }
    }
}

pub(crate) fn hours(h: f64) -> Duration {
    Duration::from_secs_f64(h * 3600.0)
}

/// Per-second rate that takes a drive from 0 to 1 in `h` hours.
pub fn per_second_to_saturate_in(h: f64) -> f64 {
    1.0 / (h * 3600.0)
}

fn default_baseline_mood() -> MoodMap {
    MoodMap::from_fn(|k| match k {
        Mood::GoodMood => 0.5,
        Mood::Irritability => 0.2,
        Mood::Anxiety => 0.2,
        Mood::Melancholy => 0.15,
        Mood::Confidence => 0.5,
        Mood::Loneliness => 0.2,
        Mood::Rested => 0.6,
    })
}

fn default_regulation() -> RegulationMap {
    RegulationMap::from_fn(|k| match k {
        Regulation::SelfControl => 0.65,
        Regulation::NormAdherence => 0.6,
        Regulation::Empathy => 0.6,
        Regulation::RiskAversion => 0.55,
        Regulation::Shyness => 0.45,
        Regulation::Pride => 0.55,
        Regulation::JealousyTrait => 0.35,
        Regulation::TraumaSensitivity => 0.3,
    })
}

fn default_emotion_half_life() -> EmotionMap<Duration> {
    DimMap::from_fn(|k| {
        Duration::from_secs(match k {
            Emotion::Surprise => 15,
            Emotion::Fear => 45,
            Emotion::Anger => 60,
            Emotion::Joy => 70,
            Emotion::Shame => 90,
            Emotion::Guilt => 120,
            Emotion::Sadness => 80,
            Emotion::Disgust => 80,
            Emotion::Interest => 70,
            Emotion::Contempt => 100,
            Emotion::Affection => 75,
            Emotion::ArousalEmotion => 80,
        })
    })
}

fn default_mood_half_life() -> MoodMap<Duration> {
    DimMap::from_fn(|k| {
        hours(match k {
            Mood::Irritability => 6.0,
            Mood::Anxiety => 8.0,
            Mood::Melancholy => 12.0,
            Mood::GoodMood => 6.0,
            Mood::Confidence => 8.0,
            Mood::Loneliness => 12.0,
            Mood::Rested => 6.0,
        })
    })
}

fn default_drive_accumulation() -> DriveMap {
    DriveMap::from_fn(|k| {
        per_second_to_saturate_in(match k {
            Drive::Hunger => 6.0,
            Drive::Thirst => 8.0,
            Drive::Sleepiness => 16.0,
            Drive::Pain => 72.0,
            Drive::ApprovalNeed => 36.0,
            Drive::StatusNeed => 48.0,
            Drive::BelongingNeed => 24.0,
            Drive::AutonomyNeed => 24.0,
            Drive::ControlNeed => 24.0,
            Drive::CuriosityNeed => 20.0,
            Drive::SafetyNeed => 30.0,
            Drive::SexualDrive => 24.0,
            Drive::IntimacyNeed => 18.0,
            Drive::RebellionDrive => 30.0,
            Drive::AggressionDrive => 30.0,
        })
    })
}
