//! Outcome label vocabularies.
//!
//! Raw event data carries free-form strings (`description`, `events`,
//! `pitch_type`). Everything downstream works on the tagged types below;
//! the `from_*` constructors are the only place raw labels are interpreted.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PitchOutcome
// ============================================================================

/// Result of a single pitch from the batter's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PitchOutcome {
    Ball,
    CalledStrike,
    SwingingStrike,
    Foul,
    HitIntoPlay,
}

impl PitchOutcome {
    pub const ALL: [PitchOutcome; 5] = [
        PitchOutcome::Ball,
        PitchOutcome::CalledStrike,
        PitchOutcome::SwingingStrike,
        PitchOutcome::Foul,
        PitchOutcome::HitIntoPlay,
    ];

    /// Map a pitch-level `description` label onto the five modelled categories.
    ///
    /// Returns `None` for labels the model does not represent (hit-by-pitch,
    /// automatic balls/strikes, unknown tags). Such rows are skipped when
    /// building pitch-outcome distributions.
    pub fn from_description(description: &str) -> Option<Self> {
        match description.trim() {
            "ball" | "blocked_ball" | "intent_ball" | "pitchout" => Some(PitchOutcome::Ball),
            "called_strike" => Some(PitchOutcome::CalledStrike),
            "swinging_strike" | "swinging_strike_blocked" | "foul_tip" | "missed_bunt" => {
                Some(PitchOutcome::SwingingStrike)
            }
            "foul" | "foul_bunt" | "bunt_foul_tip" | "foul_pitchout" => Some(PitchOutcome::Foul),
            "hit_into_play" | "hit_into_play_no_out" | "hit_into_play_score" => {
                Some(PitchOutcome::HitIntoPlay)
            }
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PitchOutcome::Ball => "ball",
            PitchOutcome::CalledStrike => "called_strike",
            PitchOutcome::SwingingStrike => "swinging_strike",
            PitchOutcome::Foul => "foul",
            PitchOutcome::HitIntoPlay => "hit_into_play",
        }
    }
}

impl fmt::Display for PitchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// InPlayOutcome
// ============================================================================

/// Result of a ball put in play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InPlayOutcome {
    FieldOut,
    Single,
    Double,
    Triple,
    HomeRun,
}

impl InPlayOutcome {
    pub const ALL: [InPlayOutcome; 5] = [
        InPlayOutcome::FieldOut,
        InPlayOutcome::Single,
        InPlayOutcome::Double,
        InPlayOutcome::Triple,
        InPlayOutcome::HomeRun,
    ];

    /// Map a play-level `events` label. Fielder's choice and sacrifice flies
    /// collapse into `FieldOut`; every other event is outside the in-play model.
    pub fn from_event(event: &str) -> Option<Self> {
        match event.trim() {
            "field_out" | "fielders_choice" | "sac_fly" => Some(InPlayOutcome::FieldOut),
            "single" => Some(InPlayOutcome::Single),
            "double" => Some(InPlayOutcome::Double),
            "triple" => Some(InPlayOutcome::Triple),
            "home_run" => Some(InPlayOutcome::HomeRun),
            _ => None,
        }
    }

    pub fn is_hit(&self) -> bool {
        !matches!(self, InPlayOutcome::FieldOut)
    }

    pub fn label(&self) -> &'static str {
        match self {
            InPlayOutcome::FieldOut => "field_out",
            InPlayOutcome::Single => "single",
            InPlayOutcome::Double => "double",
            InPlayOutcome::Triple => "triple",
            InPlayOutcome::HomeRun => "home_run",
        }
    }
}

impl fmt::Display for InPlayOutcome {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// AtBatResult
// ============================================================================

/// Terminal result of a plate appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AtBatResult {
    Strikeout,
    Walk,
    InPlay(InPlayOutcome),
}

impl AtBatResult {
    pub const FIELD_OUT: AtBatResult = AtBatResult::InPlay(InPlayOutcome::FieldOut);
    pub const SINGLE: AtBatResult = AtBatResult::InPlay(InPlayOutcome::Single);
    pub const DOUBLE: AtBatResult = AtBatResult::InPlay(InPlayOutcome::Double);
    pub const TRIPLE: AtBatResult = AtBatResult::InPlay(InPlayOutcome::Triple);
    pub const HOME_RUN: AtBatResult = AtBatResult::InPlay(InPlayOutcome::HomeRun);

    /// Strikeouts and in-play field outs are the only results that record an out.
    pub fn is_out(&self) -> bool {
        matches!(self, AtBatResult::Strikeout | AtBatResult::InPlay(InPlayOutcome::FieldOut))
    }

    pub fn is_hit(&self) -> bool {
        matches!(self, AtBatResult::InPlay(outcome) if outcome.is_hit())
    }

    pub fn label(&self) -> &'static str {
        match self {
            AtBatResult::Strikeout => "strikeout",
            AtBatResult::Walk => "walk",
            AtBatResult::InPlay(outcome) => outcome.label(),
        }
    }
}

impl fmt::Display for AtBatResult {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// PitchType
// ============================================================================

/// Pitch classification code (`FF`, `SL`, `KC`, ...).
///
/// Stored inline so it is `Copy`; codes are one to three ASCII alphanumerics,
/// upper-cased on construction.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PitchType {
    code: [u8; 3],
    len: u8,
}

impl PitchType {
    pub const MAX_LEN: usize = 3;

    pub fn new(code: &str) -> Option<Self> {
        let code = code.trim();
        if code.is_empty() || code.len() > Self::MAX_LEN {
            return None;
        }
        if !code.bytes().all(|b| b.is_ascii_alphanumeric()) {
            return None;
        }
        let mut buf = [0u8; 3];
        for (slot, b) in buf.iter_mut().zip(code.bytes()) {
            *slot = b.to_ascii_uppercase();
        }
        Some(Self { code: buf, len: code.len() as u8 })
    }

    pub fn as_str(&self) -> &str {
        // Constructed only from ASCII bytes.
        std::str::from_utf8(&self.code[..self.len as usize]).unwrap_or("")
    }
}

impl fmt::Debug for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PitchType({})", self.as_str())
    }
}

impl fmt::Display for PitchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidPitchType(pub String);

impl fmt::Display for InvalidPitchType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid pitch type code: {:?}", self.0)
    }
}

impl std::error::Error for InvalidPitchType {}

impl FromStr for PitchType {
    type Err = InvalidPitchType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PitchType::new(s).ok_or_else(|| InvalidPitchType(s.to_string()))
    }
}

impl Serialize for PitchType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PitchType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PitchTypeVisitor;

        impl<'de> Visitor<'de> for PitchTypeVisitor {
            type Value = PitchType;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a pitch type code of 1-3 ASCII alphanumerics")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                PitchType::new(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(PitchTypeVisitor)
    }
}
