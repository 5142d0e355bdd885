//! Closed dimension vocabularies and the ordinal-indexed maps that hold them.
//!
//! Every affect dimension (emotion, mood, drive, regulation, recent flag,
//! impulse) is a closed enum. Values live in a fixed-size array indexed by the
//! enum ordinal, so a missing key is a compile error instead of a silent
//! default. On the wire the maps look like `{ "joy": 0.4, "anger": 0.0, ... }`.

use crate::error::AnimaError;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

/// A closed key set with a stable ordinal and a snake_case wire name.
pub trait Dimension: Copy + Eq + std::hash::Hash + fmt::Debug + 'static {
    /// Human name of the vocabulary ("emotion", "drive", ...)
    const KIND: &'static str;
    /// Every key, in ordinal order.
    const ALL: &'static [Self];

    fn index(self) -> usize;
    fn name(self) -> &'static str;

    fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.name() == name)
    }
}

macro_rules! dimension {
    (
        $(#[$meta:meta])*
        $name:ident : $kind:literal {
            $( $variant:ident => $key:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
            serde::Serialize, serde::Deserialize,
        )]
        pub enum $name {
            $( #[serde(rename = $key)] $variant ),+
        }

        impl $name {
            pub const COUNT: usize = [$( $key ),+].len();
        }

        impl $crate::dims::Dimension for $name {
            const KIND: &'static str = $kind;
            const ALL: &'static [Self] = &[$( Self::$variant ),+];

            fn index(self) -> usize {
                self as usize
            }

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => $key ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str($crate::dims::Dimension::name(*self))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::AnimaError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <Self as $crate::dims::Dimension>::from_name(s).ok_or_else(|| {
                    $crate::error::AnimaError::UnknownDimension {
                        kind: $kind,
                        name: s.to_string(),
                    }
                })
            }
        }
    };
}

pub(crate) use dimension;

dimension! {
    /// Fast-moving discrete emotions (seconds to minutes).
    Emotion: "emotion" {
        Joy => "joy",
        Anger => "anger",
        Fear => "fear",
        Sadness => "sadness",
        Disgust => "disgust",
        Surprise => "surprise",
        Interest => "interest",
        Shame => "shame",
        Guilt => "guilt",
        Contempt => "contempt",
        Affection => "affection",
        ArousalEmotion => "arousal_emotion",
    }
}

dimension! {
    /// Slow background moods (hours).
    Mood: "mood" {
        GoodMood => "good_mood",
        Irritability => "irritability",
        Anxiety => "anxiety",
        Melancholy => "melancholy",
        Confidence => "confidence",
        Loneliness => "loneliness",
        Rested => "rested",
    }
}

dimension! {
    /// Needs that accumulate with time and fall when satisfied.
    Drive: "drive" {
        Hunger => "hunger",
        Thirst => "thirst",
        Sleepiness => "sleepiness",
        Pain => "pain",
        ApprovalNeed => "approval_need",
        StatusNeed => "status_need",
        BelongingNeed => "belonging_need",
        AutonomyNeed => "autonomy_need",
        ControlNeed => "control_need",
        CuriosityNeed => "curiosity_need",
        SafetyNeed => "safety_need",
        SexualDrive => "sexual_drive",
        IntimacyNeed => "intimacy_need",
        RebellionDrive => "rebellion_drive",
        AggressionDrive => "aggression_drive",
    }
}

dimension! {
    /// Slow regulation traits. Only the base value is ever stored.
    Regulation: "regulation" {
        SelfControl => "self_control",
        NormAdherence => "norm_adherence",
        Empathy => "empathy",
        RiskAversion => "risk_aversion",
        Shyness => "shyness",
        Pride => "pride",
        JealousyTrait => "jealousy_trait",
        TraumaSensitivity => "trauma_sensitivity",
    }
}

dimension! {
    /// "This happened recently" markers; decay-only, raised with max semantics.
    RecentFlag: "recent flag" {
        Rejection => "recent_rejection",
        Humiliation => "recent_humiliation",
        BoundaryViolation => "recent_boundary_violation",
        Praise => "recent_praise",
        Threat => "recent_threat",
        Intimacy => "recent_intimacy",
    }
}

/// Fixed-size map from a closed key set to values, indexed by ordinal.
#[derive(Debug, Clone, PartialEq)]
pub struct DimMap<K: Dimension, T, const N: usize> {
    values: [T; N],
    _key: PhantomData<K>,
}

pub type EmotionMap<T = f64> = DimMap<Emotion, T, { Emotion::COUNT }>;
pub type MoodMap<T = f64> = DimMap<Mood, T, { Mood::COUNT }>;
pub type DriveMap<T = f64> = DimMap<Drive, T, { Drive::COUNT }>;
pub type RegulationMap<T = f64> = DimMap<Regulation, T, { Regulation::COUNT }>;
pub type RecentFlagMap<T = f64> = DimMap<RecentFlag, T, { RecentFlag::COUNT }>;

impl<K: Dimension, T, const N: usize> DimMap<K, T, N> {
    pub fn from_fn(mut f: impl FnMut(K) -> T) -> Self {
        debug_assert_eq!(K::ALL.len(), N, "{} map width mismatch", K::KIND);
        Self {
            values: std::array::from_fn(|i| f(K::ALL[i])),
            _key: PhantomData,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &T)> {
        K::ALL.iter().copied().zip(self.values.iter())
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (K, &mut T)> {
        K::ALL.iter().copied().zip(self.values.iter_mut())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.values.iter()
    }

    pub fn map<U>(&self, mut f: impl FnMut(K, &T) -> U) -> DimMap<K, U, N> {
        DimMap::from_fn(|k| f(k, &self.values[k.index()]))
    }
}

impl<K: Dimension, T: Clone, const N: usize> DimMap<K, T, N> {
    pub fn filled(value: T) -> Self {
        Self::from_fn(|_| value.clone())
    }
}

impl<K: Dimension, T: Default, const N: usize> Default for DimMap<K, T, N> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<K: Dimension, T, const N: usize> Index<K> for DimMap<K, T, N> {
    type Output = T;

    fn index(&self, key: K) -> &T {
        &self.values[key.index()]
    }
}

impl<K: Dimension, T, const N: usize> IndexMut<K> for DimMap<K, T, N> {
    fn index_mut(&mut self, key: K) -> &mut T {
        &mut self.values[key.index()]
    }
}

impl<K: Dimension, T: Serialize, const N: usize> Serialize for DimMap<K, T, N> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(N))?;
        for (key, value) in self.iter() {
            map.serialize_entry(key.name(), value)?;
        }
        map.end()
    }
}

/// Missing keys keep `T::default()`; unknown keys are rejected.
impl<'de, K: Dimension, T: Deserialize<'de> + Default, const N: usize> Deserialize<'de>
    for DimMap<K, T, N>
{
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, T>::deserialize(deserializer)?;
        let mut out = Self::default();
        for (name, value) in raw {
            let key = K::from_name(&name).ok_or_else(|| {
                D::Error::custom(AnimaError::UnknownDimension {
                    kind: K::KIND,
                    name: name.clone(),
                })
            })?;
            out[key] = value;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_match_vocabulary() {
        assert_eq!(Emotion::COUNT, 12);
        assert_eq!(Mood::COUNT, 7);
        assert_eq!(Drive::COUNT, 15);
        assert_eq!(Regulation::COUNT, 8);
        assert_eq!(RecentFlag::COUNT, 6);
        assert_eq!(Emotion::ALL.len(), Emotion::COUNT);
    }

    #[test]
    fn test_ordinals_follow_declaration_order() {
        for (i, key) in Drive::ALL.iter().enumerate() {
            assert_eq!(key.index(), i);
        }
    }

    #[test]
    fn test_name_parse() {
        assert_eq!("arousal_emotion".parse::<Emotion>().unwrap(), Emotion::ArousalEmotion);
        assert_eq!("recent_praise".parse::<RecentFlag>().unwrap(), RecentFlag::Praise);
        let err = "glee".parse::<Emotion>().unwrap_err();
        assert_eq!(
            err,
            AnimaError::UnknownDimension {
                kind: "emotion",
                name: "glee".to_string()
            }
        );
    }

    #[test]
    fn test_index_and_iter() {
        let mut map = MoodMap::filled(0.1);
        map[Mood::Rested] = 0.9;
        assert_eq!(map[Mood::Rested], 0.9);
        let collected: Vec<_> = map.iter().map(|(k, v)| (k, *v)).collect();
        assert_eq!(collected.len(), 7);
        assert_eq!(collected[6], (Mood::Rested, 0.9));
    }

    #[test]
    fn test_serializes_as_named_map() {
        let mut map = RecentFlagMap::default();
        map[RecentFlag::Threat] = 0.5;
        let json = serde_json::to_value(&map).unwrap();
        assert_eq!(json["recent_threat"], 0.5);
        assert_eq!(json["recent_praise"], 0.0);
    }

    #[test]
    fn test_deserialize_partial_and_unknown() {
        let map: EmotionMap = serde_json::from_str(r#"{"joy": 0.3}"#).unwrap();
        assert_eq!(map[Emotion::Joy], 0.3);
        assert_eq!(map[Emotion::Anger], 0.0);

        let bad: Result<EmotionMap, _> = serde_json::from_str(r#"{"glee": 0.3}"#);
        assert!(bad.is_err());
    }
}
