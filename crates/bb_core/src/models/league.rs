//! League-average fallback distributions.
//!
//! Used whenever a player's own data cannot supply a distribution. Passed by
//! value through `SimulationConfig` so alternative baselines can be loaded
//! from config files.

use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use super::outcome::{InPlayOutcome, PitchOutcome, PitchType};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueAverages {
    /// Pitch outcomes when a batter has no usable pitch data.
    pub pitch_outcomes: Distribution<PitchOutcome>,
    /// Ball-in-play results when a player has no in-play events.
    pub in_play: Distribution<InPlayOutcome>,
    /// Pitch mix when a pitcher has no pitch data.
    pub pitch_mix: Distribution<PitchType>,
}

impl LeagueAverages {
    fn default_pitch_outcomes() -> Distribution<PitchOutcome> {
        Distribution::from_weights([
            (PitchOutcome::Ball, 0.35),
            (PitchOutcome::CalledStrike, 0.17),
            (PitchOutcome::SwingingStrike, 0.10),
            (PitchOutcome::Foul, 0.13),
            (PitchOutcome::HitIntoPlay, 0.25),
        ])
        .unwrap_or_else(Distribution::empty)
    }

    fn default_in_play() -> Distribution<InPlayOutcome> {
        Distribution::from_weights([
            (InPlayOutcome::FieldOut, 0.69),
            (InPlayOutcome::Single, 0.15),
            (InPlayOutcome::Double, 0.09),
            (InPlayOutcome::Triple, 0.02),
            (InPlayOutcome::HomeRun, 0.05),
        ])
        .unwrap_or_else(Distribution::empty)
    }

    fn default_pitch_mix() -> Distribution<PitchType> {
        let weights = [("FF", 0.35), ("SL", 0.20), ("CH", 0.15), ("CU", 0.15), ("SI", 0.10), ("FC", 0.05)];
        Distribution::from_weights(
            weights.iter().filter_map(|(code, w)| PitchType::new(code).map(|pt| (pt, *w))),
        )
        .unwrap_or_else(Distribution::empty)
    }

    /// Each fallback must be non-empty and sum to one.
    pub fn validate(&self) -> Result<(), String> {
        if !self.pitch_outcomes.is_normalized() {
            return Err("league pitch_outcomes must be non-empty with weights in [0, 1] summing to 1".into());
        }
        if !self.in_play.is_normalized() {
            return Err("league in_play must be non-empty with weights in [0, 1] summing to 1".into());
        }
        if !self.pitch_mix.is_normalized() {
            return Err("league pitch_mix must be non-empty with weights in [0, 1] summing to 1".into());
        }
        Ok(())
    }
}

impl Default for LeagueAverages {
    fn default() -> Self {
        Self {
            pitch_outcomes: Self::default_pitch_outcomes(),
            in_play: Self::default_in_play(),
            pitch_mix: Self::default_pitch_mix(),
        }
    }
}
