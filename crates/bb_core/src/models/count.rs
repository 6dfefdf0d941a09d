//! Ball-strike count.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use super::outcome::{AtBatResult, PitchOutcome};

pub const BALLS_FOR_WALK: u8 = 4;
pub const STRIKES_FOR_STRIKEOUT: u8 = 3;

/// Balls and strikes during a plate appearance.
///
/// A live count always has `balls < 4` and `strikes < 3`; reaching either
/// limit is reported by [`Count::terminal`]. Serialized as `"balls-strikes"`
/// so it can key maps in every serde format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Count {
    pub balls: u8,
    pub strikes: u8,
}

impl Count {
    pub const fn new(balls: u8, strikes: u8) -> Self {
        Self { balls, strikes }
    }

    /// The twelve counts a pitch can be thrown in.
    pub fn all_live() -> impl Iterator<Item = Count> {
        (0..BALLS_FOR_WALK)
            .flat_map(|balls| (0..STRIKES_FOR_STRIKEOUT).map(move |strikes| Count::new(balls, strikes)))
    }

    pub fn is_live(&self) -> bool {
        self.balls < BALLS_FOR_WALK && self.strikes < STRIKES_FOR_STRIKEOUT
    }

    pub fn reset(&mut self) {
        *self = Count::default();
    }

    /// Apply a non-terminal pitch outcome.
    ///
    /// Fouls only add a strike below two strikes. `HitIntoPlay` leaves the
    /// count untouched; the at-bat engine ends the plate appearance instead.
    pub fn apply(&mut self, outcome: PitchOutcome) {
        match outcome {
            PitchOutcome::Ball => self.balls += 1,
            PitchOutcome::CalledStrike | PitchOutcome::SwingingStrike => self.strikes += 1,
            PitchOutcome::Foul => {
                if self.strikes < STRIKES_FOR_STRIKEOUT - 1 {
                    self.strikes += 1;
                }
            }
            PitchOutcome::HitIntoPlay => {}
        }
    }

    /// `Strikeout` at three strikes, `Walk` at four balls, otherwise `None`.
    pub fn terminal(&self) -> Option<AtBatResult> {
        if self.strikes >= STRIKES_FOR_STRIKEOUT {
            Some(AtBatResult::Strikeout)
        } else if self.balls >= BALLS_FOR_WALK {
            Some(AtBatResult::Walk)
        } else {
            None
        }
    }
}

impl fmt::Display for Count {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.balls, self.strikes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidCount(pub String);

impl fmt::Display for InvalidCount {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "invalid count: {:?} (expected \"balls-strikes\")", self.0)
    }
}

impl std::error::Error for InvalidCount {}

impl FromStr for Count {
    type Err = InvalidCount;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || InvalidCount(s.to_string());
        let (balls, strikes) = s.trim().split_once('-').ok_or_else(invalid)?;
        let balls: u8 = balls.parse().map_err(|_| invalid())?;
        let strikes: u8 = strikes.parse().map_err(|_| invalid())?;
        let count = Count::new(balls, strikes);
        if !count.is_live() {
            return Err(invalid());
        }
        Ok(count)
    }
}

impl Serialize for Count {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Count {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct CountVisitor;

        impl<'de> Visitor<'de> for CountVisitor {
            type Value = Count;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a live count formatted as \"balls-strikes\"")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_str(CountVisitor)
    }
}
