//! # Anima Core
//!
//! Per-character affect simulation. A [`Psyche`] ingests discrete social
//! events ([`Stimulus`]) and continuous time ([`SceneStep`]), evolves
//! emotion, mood, drive and regulation under decay and coupling rules, and
//! projects the result into behavioral impulses and qualitative expression
//! hints.
//!
//! ## Time Scales
//!
//! - Emotions: seconds to minutes
//! - Moods, stress, arousal, recent flags: minutes to hours
//! - Drives and fatigue: accumulate over the waking day
//!
//! The core is synchronous and deterministic. Callers that share a character
//! across tasks serialize access themselves (see `anima_limbic`).

mod appraisal;
pub mod config;
mod coupling;
mod decay;
pub mod dims;
pub mod error;
mod expression;
mod impulse;
pub mod math;
mod relationship;
mod snapshot;
mod state;
mod stimulus;
mod temperament;

pub use config::{CharacterProfile, ProfileConfig};
pub use decay::{DecayMode, SceneStep};
pub use dims::{
    DimMap, Dimension, Drive, DriveMap, Emotion, EmotionMap, Mood, MoodMap, RecentFlag,
    RecentFlagMap, Regulation, RegulationMap,
};
pub use error::{AnimaError, Result};
pub use expression::{Distance, ExpressionHints, Gaze, MicroAction, SpeechRate, Tone, Volume};
pub use impulse::{Impulse, ImpulseMap, SceneContext, PUBLIC};
pub use relationship::{
    AffinityScores, RelationshipBook, RelationshipSignals, RelationshipView, Stance,
};
pub use snapshot::PsycheSnapshot;
pub use state::{AffectState, Psyche};
pub use stimulus::{Stimulus, TIME_PASSED};
pub use temperament::{per_second_to_saturate_in, ExpressionStyle, Temperament, KNOWN_TAGS};
