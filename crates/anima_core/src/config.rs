use crate::dims::{DimMap, Dimension};
use crate::error::{AnimaError, Result as AnimaResult};
use crate::state::Psyche;
use crate::temperament::{per_second_to_saturate_in, ExpressionStyle, Temperament};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::time::Duration;

// ============================================================================
// Profile file
// ============================================================================

/// A set of character profiles, usually loaded from `profiles.toml`.
///
/// ```toml
/// default_character = "stilla"
///
/// [characters.stilla]
/// waking_hours = 18.0
/// baseline_mood = { good_mood = 0.6 }
/// tag_sensitivity = { insult = 1.4 }
///
/// [characters.stilla.style]
/// aggression_masking = 0.8
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub default_character: Option<String>,
    /// Applied to characters that do not set their own.
    pub waking_hours: Option<f64>,
    pub characters: HashMap<String, CharacterProfile>,
}

impl ProfileConfig {
    /// Load profiles from a TOML file, then apply env var overrides.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read profile file: {}", path.as_ref().display()))?;
        let mut config = Self::from_toml(&content)?;
        config.apply_env_overrides();
        tracing::info!(
            "Loaded {} character profile(s) from {}",
            config.characters.len(),
            path.as_ref().display()
        );
        Ok(config)
    }

    /// Try to load from path; if missing or invalid, fall back to defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Self {
        match Self::load(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::info!("Profile file not found or invalid ({:#}), using defaults", e);
                let mut cfg = Self::default();
                cfg.apply_env_overrides();
                cfg
            }
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML profiles")
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("ANIMA_DEFAULT_CHARACTER") {
            self.default_character = Some(v);
        }
        if let Some(v) = lookup("ANIMA_WAKING_HOURS") {
            match v.parse::<f64>() {
                Ok(h) if h.is_finite() && h > 0.0 => self.waking_hours = Some(h),
                _ => tracing::warn!("Ignoring invalid ANIMA_WAKING_HOURS={}", v),
            }
        }
    }

    /// Profile for `id`, falling back to the default character and then to
    /// built-in defaults.
    pub fn profile(&self, id: &str) -> CharacterProfile {
        if let Some(p) = self.characters.get(id) {
            return self.with_global(p.clone());
        }
        let fallback = self
            .default_character
            .as_deref()
            .and_then(|d| self.characters.get(d));
        match fallback {
            Some(p) => {
                tracing::debug!("No profile for {}, using default character", id);
                self.with_global(p.clone())
            }
            None => {
                tracing::debug!("No profile for {}, using built-in temperament", id);
                self.with_global(CharacterProfile::default())
            }
        }
    }

    fn with_global(&self, mut profile: CharacterProfile) -> CharacterProfile {
        if profile.waking_hours.is_none() {
            profile.waking_hours = self.waking_hours;
        }
        profile
    }

    /// Build a fresh character for `id`.
    pub fn psyche_for(&self, id: &str) -> Result<Psyche> {
        let profile = self.profile(id);
        let temperament = profile
            .to_temperament()
            .with_context(|| format!("Invalid profile for character {}", id))?;
        Ok(Psyche::new(temperament, profile.style))
    }
}

// ============================================================================
// Character profile
// ============================================================================

/// Overrides on top of the default temperament. Every map is keyed by the
/// snake_case dimension name; missing keys keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterProfile {
    pub baseline_emotion: BTreeMap<String, f64>,
    pub baseline_mood: BTreeMap<String, f64>,
    pub baseline_drive: BTreeMap<String, f64>,
    pub baseline_regulation: BTreeMap<String, f64>,

    pub emotion_gain: BTreeMap<String, f64>,
    pub mood_gain: BTreeMap<String, f64>,
    pub drive_gain: BTreeMap<String, f64>,

    pub emotion_half_life_secs: BTreeMap<String, f64>,
    pub mood_half_life_secs: BTreeMap<String, f64>,
    pub recent_flag_half_life_secs: BTreeMap<String, f64>,
    pub stress_half_life_secs: Option<f64>,
    pub arousal_half_life_secs: Option<f64>,

    pub drive_hours_to_saturation: BTreeMap<String, f64>,
    pub tag_sensitivity: BTreeMap<String, f64>,
    pub waking_hours: Option<f64>,

    pub style: ExpressionStyle,
}

impl CharacterProfile {
    pub fn to_temperament(&self) -> AnimaResult<Temperament> {
        let mut t = Temperament::default();

        overlay(&mut t.baseline_emotion, &self.baseline_emotion, unit)?;
        overlay(&mut t.baseline_mood, &self.baseline_mood, unit)?;
        overlay(&mut t.baseline_drive, &self.baseline_drive, unit)?;
        overlay(&mut t.baseline_regulation, &self.baseline_regulation, unit)?;

        overlay(&mut t.emotion_gain, &self.emotion_gain, non_negative)?;
        overlay(&mut t.mood_gain, &self.mood_gain, non_negative)?;
        overlay(&mut t.drive_gain, &self.drive_gain, non_negative)?;

        overlay(&mut t.emotion_half_life, &self.emotion_half_life_secs, seconds)?;
        overlay(&mut t.mood_half_life, &self.mood_half_life_secs, seconds)?;
        overlay(&mut t.recent_flag_half_life, &self.recent_flag_half_life_secs, seconds)?;
        if let Some(s) = self.stress_half_life_secs {
            t.stress_half_life = seconds("stress_half_life_secs", s)?;
        }
        if let Some(s) = self.arousal_half_life_secs {
            t.arousal_half_life = seconds("arousal_half_life_secs", s)?;
        }

        overlay(&mut t.drive_accumulation_per_sec, &self.drive_hours_to_saturation, |k, h| {
            positive(k, h).map(per_second_to_saturate_in)
        })?;

        for (tag, &value) in &self.tag_sensitivity {
            t.tag_sensitivity.insert(tag.clone(), non_negative(tag, value)?);
        }

        if let Some(h) = self.waking_hours {
            let h = positive("waking_hours", h)?;
            t.waking_hours = seconds("waking_hours", h * 3600.0)?;
        }

        Ok(t)
    }
}

fn overlay<K: Dimension, T, const N: usize>(
    target: &mut DimMap<K, T, N>,
    source: &BTreeMap<String, f64>,
    convert: impl Fn(&str, f64) -> AnimaResult<T>,
) -> AnimaResult<()> {
    for (name, &value) in source {
        let key = K::from_name(name).ok_or_else(|| AnimaError::UnknownDimension {
            kind: K::KIND,
            name: name.clone(),
        })?;
        target[key] = convert(name, value)?;
    }
    Ok(())
}

fn unit(name: &str, v: f64) -> AnimaResult<f64> {
    if v.is_finite() && (0.0..=1.0).contains(&v) {
        Ok(v)
    } else {
        Err(AnimaError::InvalidConfig(format!("{} must be within 0..=1, got {}", name, v)))
    }
}

fn non_negative(name: &str, v: f64) -> AnimaResult<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(AnimaError::InvalidConfig(format!("{} must be >= 0, got {}", name, v)))
    }
}

fn positive(name: &str, v: f64) -> AnimaResult<f64> {
    if v.is_finite() && v > 0.0 {
        Ok(v)
    } else {
        Err(AnimaError::InvalidConfig(format!("{} must be > 0, got {}", name, v)))
    }
}

/// Zero is allowed: a zero half-life snaps to baseline.
fn seconds(name: &str, v: f64) -> AnimaResult<Duration> {
    let v = non_negative(name, v)?;
    Duration::try_from_secs_f64(v).map_err(|_| {
        AnimaError::InvalidConfig(format!("{} is too large for a duration, got {}", name, v))
    })
}
