//! Historical per-pitch event records.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Half, InPlayOutcome, PitchOutcome, PitchType, PlayerId, Role};

/// One pitch from the historical record, using Statcast column names.
///
/// `events` is only set on the pitch that ended a plate appearance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchEvent {
    pub game_date: NaiveDate,
    pub pitcher: PlayerId,
    pub batter: PlayerId,
    #[serde(default)]
    pub home_team: String,
    #[serde(default)]
    pub away_team: String,
    #[serde(default)]
    pub inning_topbot: Option<Half>,
    #[serde(default)]
    pub pitch_type: Option<PitchType>,
    pub balls: u8,
    pub strikes: u8,
    pub description: String,
    #[serde(default)]
    pub events: Option<String>,
    #[serde(default)]
    pub at_bat_number: u32,
}

impl PitchEvent {
    pub fn pitch_outcome(&self) -> Option<PitchOutcome> {
        PitchOutcome::from_description(&self.description)
    }

    pub fn in_play_outcome(&self) -> Option<InPlayOutcome> {
        self.events.as_deref().and_then(InPlayOutcome::from_event)
    }

    pub fn involves(&self, player: PlayerId, role: Role) -> bool {
        match role {
            Role::Batter => self.batter == player,
            Role::Pitcher => self.pitcher == player,
        }
    }

    /// Team at bat for this pitch, when the half-inning is known.
    pub fn batting_team(&self) -> Option<&str> {
        match self.inning_topbot? {
            Half::Top => Some(self.away_team.as_str()),
            Half::Bottom => Some(self.home_team.as_str()),
        }
    }

    /// Team in the field for this pitch, when the half-inning is known.
    pub fn fielding_team(&self) -> Option<&str> {
        match self.inning_topbot? {
            Half::Top => Some(self.home_team.as_str()),
            Half::Bottom => Some(self.away_team.as_str()),
        }
    }
}
