//! Affect state and the per-character `Psyche` that owns it.
//!
//! Every scalar lives in [0, 1] and is clamped on write. Regulation only
//! stores the temperament-given base; the effective values are derived on
//! demand from base + stress + fatigue.

use crate::dims::{
    Drive, DriveMap, Emotion, EmotionMap, Mood, MoodMap, RecentFlag, RecentFlagMap, Regulation,
    RegulationMap,
};
use crate::impulse::ImpulseMap;
use crate::math::{clamp01, clamp01_or};
use crate::temperament::{ExpressionStyle, Temperament};
use serde::{Deserialize, Serialize};

pub const INITIAL_STRESS: f64 = 0.2;
pub const INITIAL_AROUSAL: f64 = 0.2;
pub const INITIAL_FATIGUE: f64 = 0.1;

/// Resting points the decay engine pulls stress and arousal toward.
pub const RESTING_STRESS: f64 = 0.2;
pub const RESTING_AROUSAL: f64 = 0.15;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AffectState {
    pub(crate) emotion: EmotionMap,
    pub(crate) mood: MoodMap,
    pub(crate) drive: DriveMap,
    pub(crate) regulation: RegulationMap,
    pub(crate) recent: RecentFlagMap,
    pub(crate) stress: f64,
    pub(crate) arousal: f64,
    pub(crate) fatigue: f64,
}

impl AffectState {
    /// Fresh state seeded from the temperament's baselines.
    pub fn from_temperament(t: &Temperament) -> Self {
        Self {
            emotion: t.baseline_emotion.map(|_, v| clamp01(*v)),
            mood: t.baseline_mood.map(|_, v| clamp01(*v)),
            drive: t.baseline_drive.map(|_, v| clamp01(*v)),
            regulation: t.baseline_regulation.map(|_, v| clamp01(*v)),
            recent: RecentFlagMap::filled(0.0),
            stress: INITIAL_STRESS,
            arousal: INITIAL_AROUSAL,
            fatigue: INITIAL_FATIGUE,
        }
    }

    pub fn emotion(&self, key: Emotion) -> f64 {
        self.emotion[key]
    }

    pub fn mood(&self, key: Mood) -> f64 {
        self.mood[key]
    }

    pub fn drive(&self, key: Drive) -> f64 {
        self.drive[key]
    }

    pub fn regulation_base(&self, key: Regulation) -> f64 {
        self.regulation[key]
    }

    pub fn recent(&self, key: RecentFlag) -> f64 {
        self.recent[key]
    }

    pub fn stress(&self) -> f64 {
        self.stress
    }

    pub fn arousal(&self) -> f64 {
        self.arousal
    }

    pub fn fatigue(&self) -> f64 {
        self.fatigue
    }

    pub fn emotions(&self) -> &EmotionMap {
        &self.emotion
    }

    pub fn moods(&self) -> &MoodMap {
        &self.mood
    }

    pub fn drives(&self) -> &DriveMap {
        &self.drive
    }

    pub fn recent_flags(&self) -> &RecentFlagMap {
        &self.recent
    }

    /// Base regulation dampened by load: high stress and high fatigue each
    /// erode self-control.
    pub fn effective_regulation(&self) -> RegulationMap {
        let mut eff = self.regulation.clone();
        if self.stress > 0.8 {
            eff[Regulation::SelfControl] = clamp01(eff[Regulation::SelfControl] * 0.7);
        }
        if self.fatigue > 0.7 {
            eff[Regulation::SelfControl] = clamp01(eff[Regulation::SelfControl] * 0.85);
        }
        eff
    }

    /// Clamp every value, replacing NaN with the temperament's resting value.
    pub fn normalize(&mut self, t: &Temperament) {
        for (k, v) in self.emotion.iter_mut() {
            *v = clamp01_or(*v, t.baseline_emotion[k]);
        }
        for (k, v) in self.mood.iter_mut() {
            *v = clamp01_or(*v, t.baseline_mood[k]);
        }
        for (k, v) in self.drive.iter_mut() {
            *v = clamp01_or(*v, t.baseline_drive[k]);
        }
        for (k, v) in self.regulation.iter_mut() {
            *v = clamp01_or(*v, t.baseline_regulation[k]);
        }
        for (_, v) in self.recent.iter_mut() {
            *v = clamp01(*v);
        }
        self.stress = clamp01_or(self.stress, RESTING_STRESS);
        self.arousal = clamp01_or(self.arousal, RESTING_AROUSAL);
        self.fatigue = clamp01_or(self.fatigue, INITIAL_FATIGUE);
    }
}

/// One simulated character: static temperament plus evolving affect.
///
/// Mutating operations take `&mut self`; the `after_*` variants return a new
/// value and leave the receiver untouched.
#[derive(Debug, Clone)]
pub struct Psyche {
    pub(crate) temperament: Temperament,
    pub(crate) style: ExpressionStyle,
    pub(crate) state: AffectState,
    pub(crate) last_stimulus: Option<String>,
    pub(crate) last_trace: ImpulseMap<String>,
}

impl Default for Psyche {
    fn default() -> Self {
        Self::new(Temperament::default(), ExpressionStyle::default())
    }
}

impl Psyche {
    pub fn new(temperament: Temperament, style: ExpressionStyle) -> Self {
        let state = AffectState::from_temperament(&temperament);
        Self {
            temperament,
            style,
            state,
            last_stimulus: None,
            last_trace: Default::default(),
        }
    }

    pub fn temperament(&self) -> &Temperament {
        &self.temperament
    }

    pub fn style(&self) -> &ExpressionStyle {
        &self.style
    }

    pub fn state(&self) -> &AffectState {
        &self.state
    }

    pub fn last_stimulus_summary(&self) -> Option<&str> {
        self.last_stimulus.as_deref()
    }

    /// Top contributors per impulse from the latest `generate_impulses` call.
    pub fn last_impulse_trace(&self) -> &ImpulseMap<String> {
        &self.last_trace
    }

    pub fn effective_regulation(&self) -> RegulationMap {
        self.state.effective_regulation()
    }

    // Clamp-on-write adders. Emotion, mood and drive deltas go through the
    // temperament gain first.

    pub(crate) fn add_emotion(&mut self, key: Emotion, delta: f64) {
        let next = self.state.emotion[key] + delta * self.temperament.emotion_gain[key];
        self.state.emotion[key] = clamp01_or(next, self.temperament.baseline_emotion[key]);
    }

    pub(crate) fn add_mood(&mut self, key: Mood, delta: f64) {
        let next = self.state.mood[key] + delta * self.temperament.mood_gain[key];
        self.state.mood[key] = clamp01_or(next, self.temperament.baseline_mood[key]);
    }

    pub(crate) fn add_drive(&mut self, key: Drive, delta: f64) {
        let next = self.state.drive[key] + delta * self.temperament.drive_gain[key];
        self.state.drive[key] = clamp01_or(next, self.temperament.baseline_drive[key]);
    }

    pub(crate) fn add_stress(&mut self, delta: f64) {
        self.state.stress = clamp01_or(self.state.stress + delta, RESTING_STRESS);
    }

    pub(crate) fn add_arousal(&mut self, delta: f64) {
        self.state.arousal = clamp01_or(self.state.arousal + delta, RESTING_AROUSAL);
    }

    pub(crate) fn add_fatigue(&mut self, delta: f64) {
        self.state.fatigue = clamp01_or(self.state.fatigue + delta, INITIAL_FATIGUE);
    }

    /// Recent flags only ever rise through stimuli; decay lowers them.
    pub(crate) fn raise_recent(&mut self, key: RecentFlag, value: f64) {
        let current = self.state.recent[key];
        self.state.recent[key] = current.max(clamp01(value));
    }
}
