//! Cross-dimension coupling, run after every decay step and stimulus.

use crate::dims::{Drive, Emotion, Mood, Regulation};
use crate::state::Psyche;

impl Psyche {
    pub(crate) fn apply_coupling_rules(&mut self) {
        let reg = self.state.effective_regulation();
        let shame = self.state.emotion[Emotion::Shame];
        let fear = self.state.emotion[Emotion::Fear];
        let loneliness = self.state.mood[Mood::Loneliness];

        // Wounded pride turns shame into anger
        if shame > 0.6 && reg[Regulation::Pride] > 0.6 {
            let delta = 0.25 * (shame - 0.6);
            tracing::trace!(delta, "Coupling: shame -> anger");
            self.add_emotion(Emotion::Anger, delta);
        }

        if fear > 0.7 {
            let delta = 0.1 * (fear - 0.7);
            tracing::trace!(delta, "Coupling: fear -> aggression_drive");
            self.add_drive(Drive::AggressionDrive, delta);
        }

        if loneliness > 0.7 {
            let delta = 0.1 * (loneliness - 0.7);
            tracing::trace!(delta, "Coupling: loneliness -> intimacy_need");
            self.add_drive(Drive::IntimacyNeed, delta);
        }

        // Lingering desire once the body has calmed down
        if self.state.arousal < 0.25 && self.state.emotion[Emotion::ArousalEmotion] > 0.5 {
            tracing::trace!("Coupling: arousal_emotion -> guilt");
            self.add_emotion(Emotion::Guilt, 0.08);
        }
    }
}
