//! Decay engine: continuous time applied to a character.
//!
//! Emotions and moods relax toward their baselines, drives accumulate,
//! stress and arousal settle to their resting points, fatigue builds over the
//! waking day and recent flags fade toward zero.

use crate::math::{approach_half_life, clamp01};
use crate::state::{Psyche, RESTING_AROUSAL, RESTING_STRESS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecayMode {
    /// Treated the same as `SoftDecay`.
    None,
    #[default]
    SoftDecay,
    /// Soft decay, then every recent flag is forced to zero.
    HardResetRecentFlags,
}

/// A block of elapsed scene time.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneStep {
    pub elapsed: Duration,
    pub decay_mode: DecayMode,
}

impl SceneStep {
    pub fn new(elapsed: Duration) -> Self {
        Self {
            elapsed,
            decay_mode: DecayMode::SoftDecay,
        }
    }

    pub fn with_mode(mut self, decay_mode: DecayMode) -> Self {
        self.decay_mode = decay_mode;
        self
    }
}

impl Psyche {
    pub fn apply_scene_step(&mut self, step: SceneStep) {
        if step.elapsed.is_zero() {
            // Nothing to integrate; effective regulation is derived on read.
            return;
        }

        self.advance(step.elapsed);

        if step.decay_mode == DecayMode::HardResetRecentFlags {
            for (_, v) in self.state.recent.iter_mut() {
                *v = 0.0;
            }
        }
    }

    pub fn after_scene_step(&self, step: SceneStep) -> Self {
        let mut next = self.clone();
        next.apply_scene_step(step);
        next
    }

    /// Integrate `dt` of time passage, then run the coupling rules.
    pub(crate) fn advance(&mut self, dt: Duration) {
        let t = &self.temperament;
        let s = &mut self.state;

        for (k, v) in s.emotion.iter_mut() {
            *v = approach_half_life(*v, t.baseline_emotion[k], t.emotion_half_life[k], dt);
        }
        for (k, v) in s.mood.iter_mut() {
            *v = approach_half_life(*v, t.baseline_mood[k], t.mood_half_life[k], dt);
        }

        let secs = dt.as_secs_f64();
        for (k, v) in s.drive.iter_mut() {
            let rise = t.drive_accumulation_per_sec[k] * secs * t.drive_gain[k];
            *v = clamp01(*v + rise);
        }

        s.stress = approach_half_life(s.stress, RESTING_STRESS, t.stress_half_life, dt);
        s.arousal = approach_half_life(s.arousal, RESTING_AROUSAL, t.arousal_half_life, dt);

        let waking = t.waking_hours.as_secs_f64();
        if waking > 0.0 {
            s.fatigue = clamp01(s.fatigue + secs / waking);
        } else {
            s.fatigue = 1.0;
        }

        for (k, v) in s.recent.iter_mut() {
            *v = approach_half_life(*v, 0.0, t.recent_flag_half_life[k], dt);
        }

        tracing::trace!(
            elapsed_secs = secs,
            stress = s.stress,
            fatigue = s.fatigue,
            "Decay step applied"
        );

        self.apply_coupling_rules();
    }
}
