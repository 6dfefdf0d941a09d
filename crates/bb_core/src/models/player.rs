use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use super::profile::PlayerProfile;

/// Numeric player identifier as used by the event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u32);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for PlayerId {
    fn from(id: u32) -> Self {
        PlayerId(id)
    }
}

/// Which side of the pitch a profile describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Batter,
    Pitcher,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Batter => "batter",
            Role::Pitcher => "pitcher",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamSide {
    #[default]
    Home,
    Away,
}

impl TeamSide {
    pub fn opponent(&self) -> Self {
        match self {
            TeamSide::Home => TeamSide::Away,
            TeamSide::Away => TeamSide::Home,
        }
    }
}

impl fmt::Display for TeamSide {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TeamSide::Home => f.write_str("home"),
            TeamSide::Away => f.write_str("away"),
        }
    }
}

/// A player taking part in a simulated game: identity plus a shared,
/// read-only probability profile.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub profile: Arc<PlayerProfile>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<String>, profile: Arc<PlayerProfile>) -> Self {
        Self { id, name: name.into(), profile }
    }
}

/// One team's batting order and starting pitcher.
#[derive(Debug, Clone)]
pub struct TeamSheet {
    pub name: String,
    pub lineup: Vec<Arc<Player>>,
    pub pitcher: Arc<Player>,
}

impl TeamSheet {
    pub fn new(name: impl Into<String>, lineup: Vec<Arc<Player>>, pitcher: Arc<Player>) -> Self {
        Self { name: name.into(), lineup, pitcher }
    }

    /// Batter at `slot`, wrapping around the order.
    ///
    /// # Panics
    /// If the lineup is empty. `Matchup::validate` rules that out before a
    /// game starts.
    pub fn batter(&self, slot: usize) -> &Arc<Player> {
        &self.lineup[slot % self.lineup.len()]
    }

    /// Multi-line batting order, one name per line.
    pub fn lineup_card(&self) -> String {
        self.lineup.iter().map(|p| p.name.as_str()).collect::<Vec<_>>().join("\n")
    }
}
