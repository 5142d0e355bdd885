//! Stimulus: a single discrete social event fed to a character.

use crate::error::{AnimaError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;
use uuid::Uuid;

/// Tag marking a stimulus that only encodes the passage of time.
pub const TIME_PASSED: &str = "time_passed";

/// A tagged social event. Field ranges are declared, not enforced: the
/// engine clamps at every consuming formula. Use [`Stimulus::validate`] for a
/// strict boundary check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stimulus {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub actor_id: String,
    pub target_id: String,
    pub context: BTreeSet<String>,
    /// [0, 1]
    pub intensity: f64,
    /// [-1, 1]
    pub valence: f64,
    pub tags: BTreeSet<String>,
    pub channels: BTreeSet<String>,
    pub is_intentional: bool,
    /// [0, 1]: how open the event is to interpretation.
    pub ambiguity: f64,
    pub consent_related: f64,
    /// [0, 1]
    pub violation_level: f64,
    /// [0, 1]
    pub novelty: f64,
    /// [0, 1]: how costly the event is in front of others.
    pub social_cost: f64,
    #[serde(default, with = "opt_secs")]
    pub time_passed: Option<Duration>,
}

impl Stimulus {
    pub fn new(actor_id: impl Into<String>, target_id: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            actor_id: actor_id.into(),
            target_id: target_id.into(),
            context: BTreeSet::new(),
            intensity: 0.5,
            valence: 0.0,
            tags: BTreeSet::new(),
            channels: BTreeSet::new(),
            is_intentional: true,
            ambiguity: 0.0,
            consent_related: 0.0,
            violation_level: 0.0,
            novelty: 0.0,
            social_cost: 0.0,
            time_passed: None,
        }
    }

    /// A pure time-passage stimulus.
    pub fn time_passed(
        actor_id: impl Into<String>,
        target_id: impl Into<String>,
        dt: Duration,
    ) -> Self {
        let mut s = Self::new(actor_id, target_id).with_tag(TIME_PASSED);
        s.time_passed = Some(dt);
        s
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags.extend(tags.into_iter().map(Into::into));
        self
    }

    pub fn with_context(mut self, tag: impl Into<String>) -> Self {
        self.context.insert(tag.into());
        self
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn with_valence(mut self, valence: f64) -> Self {
        self.valence = valence;
        self
    }

    pub fn with_ambiguity(mut self, ambiguity: f64) -> Self {
        self.ambiguity = ambiguity;
        self
    }

    pub fn with_violation(mut self, violation_level: f64) -> Self {
        self.violation_level = violation_level;
        self
    }

    pub fn with_social_cost(mut self, social_cost: f64) -> Self {
        self.social_cost = social_cost;
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Elapsed time to apply when this stimulus only encodes time passage.
    pub fn elapsed_marker(&self) -> Option<Duration> {
        match self.time_passed {
            Some(dt) if self.has_tag(TIME_PASSED) && !dt.is_zero() => Some(dt),
            _ => None,
        }
    }

    /// One-line diagnostic summary: `<id> tags=[a,b] intensity=0.80`.
    pub fn summary(&self) -> String {
        let tags: Vec<&str> = self.tags.iter().map(String::as_str).collect();
        format!("{} tags=[{}] intensity={:.2}", self.id, tags.join(","), self.intensity)
    }

    /// Strict range check. The engine never calls this itself.
    pub fn validate(&self) -> Result<()> {
        check_range("intensity", self.intensity, 0.0, 1.0, "0..=1")?;
        check_range("valence", self.valence, -1.0, 1.0, "-1..=1")?;
        check_range("ambiguity", self.ambiguity, 0.0, 1.0, "0..=1")?;
        check_range("consent_related", self.consent_related, -1.0, 1.0, "-1..=1")?;
        check_range("violation_level", self.violation_level, 0.0, 1.0, "0..=1")?;
        check_range("novelty", self.novelty, 0.0, 1.0, "0..=1")?;
        check_range("social_cost", self.social_cost, 0.0, 1.0, "0..=1")?;
        Ok(())
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    lo: f64,
    hi: f64,
    expected: &'static str,
) -> Result<()> {
    if value.is_finite() && (lo..=hi).contains(&value) {
        Ok(())
    } else {
        Err(AnimaError::InvalidStimulus {
            field,
            value,
            expected,
        })
    }
}

/// `Option<Duration>` as fractional seconds.
mod opt_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => serializer.serialize_some(&d.as_secs_f64()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        let secs = Option::<f64>::deserialize(deserializer)?;
        Ok(secs
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(Duration::from_secs_f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let s = Stimulus::new("player", "stilla").with_tag("praise").with_intensity(0.8);
        assert_eq!(s.actor_id, "player");
        assert!(s.has_tag("praise"));
        assert!(s.is_intentional);
        assert_eq!(s.ambiguity, 0.0);
        assert!(s.validate().is_ok());
    }

    #[test]
    fn test_summary_format() {
        let s = Stimulus::new("a", "b")
            .with_id("evt-1")
            .with_tags(["threat", "danger"])
            .with_intensity(0.8);
        assert_eq!(s.summary(), "evt-1 tags=[danger,threat] intensity=0.80");
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let s = Stimulus::new("a", "b").with_intensity(1.5);
        match s.validate() {
            Err(AnimaError::InvalidStimulus { field, .. }) => assert_eq!(field, "intensity"),
            other => panic!("expected InvalidStimulus, got {:?}", other),
        }
        assert!(Stimulus::new("a", "b").with_valence(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_elapsed_marker_requires_tag_and_positive_duration() {
        let s = Stimulus::time_passed("a", "b", Duration::from_secs(60));
        assert_eq!(s.elapsed_marker(), Some(Duration::from_secs(60)));

        let mut untagged = Stimulus::new("a", "b");
        untagged.time_passed = Some(Duration::from_secs(60));
        assert_eq!(untagged.elapsed_marker(), None);

        let zero = Stimulus::time_passed("a", "b", Duration::ZERO);
        assert_eq!(zero.elapsed_marker(), None);
    }

    #[test]
    fn test_json_roundtrip_keeps_elapsed_seconds() {
        let s = Stimulus::time_passed("a", "b", Duration::from_secs(90));
        let json = serde_json::to_string(&s).unwrap();
        let back: Stimulus = serde_json::from_str(&json).unwrap();
        assert_eq!(back.time_passed, Some(Duration::from_secs(90)));
    }
}
