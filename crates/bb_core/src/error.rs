use thiserror::Error;

use crate::models::{PlayerId, Role, TeamSide};

/// Sampling was attempted on a distribution that cannot be sampled.
///
/// Profiles and league fallbacks guarantee non-empty distributions, so this
/// signals a bug in the profile layer rather than missing data.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DistributionError {
    #[error("cannot sample an empty distribution")]
    Empty,

    #[error("distribution has an invalid weight: {0}")]
    InvalidWeight(String),

    #[error("distribution weights sum to zero")]
    AllWeightsZero,
}

/// Missing or inconsistent inputs detected before a simulation starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("no lineup available for {side} team {team}")]
    MissingLineup { side: TeamSide, team: String },

    #[error("no starting pitcher available for {side} team {team}")]
    MissingPitcher { side: TeamSide, team: String },

    #[error("no historical data available to build player profiles")]
    NoHistoricalData,

    #[error("bootstrap needs at least one game")]
    NoGames,

    #[error("invalid simulation config: {0}")]
    InvalidConfig(String),
}

/// Failure inside an external collaborator (profile cache, roster lookup).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SourceError {
    #[error("profile cache error for {role} {player}: {message}")]
    Cache { player: PlayerId, role: Role, message: String },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Distribution(#[from] DistributionError),

    #[error(transparent)]
    Source(#[from] SourceError),
}

impl SimError {
    /// Configuration and source errors come from inputs; distribution errors
    /// come from the engine itself.
    pub fn is_input_error(&self) -> bool {
        !matches!(self, SimError::Distribution(_))
    }
}

pub type Result<T> = std::result::Result<T, SimError>;
