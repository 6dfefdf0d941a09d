//! # bb_core - Reproducible Monte Carlo Baseball Simulation
//!
//! Plays baseball games by sampling pitch types, pitch outcomes and
//! ball-in-play results from per-player probability profiles built out of
//! historical pitch-by-pitch data, then aggregates many games into a report.
//!
//! ## Features
//! - Count-aware profiles with an explicit fallback chain to league averages
//! - Deterministic games (same seed = same result)
//! - Parallel bootstrap whose report does not depend on thread count
//! - Leveled play-by-play narrative
//!
//! ```rust
//! use std::sync::Arc;
//! use bb_core::engine::{BootstrapRunner, SimulationConfig};
//! use bb_core::models::{Matchup, Player, PlayerId, PlayerProfile, Role, TeamSheet};
//!
//! let config = SimulationConfig::standard();
//! let player = |id: u32, role: Role| {
//!     let profile = PlayerProfile::league_average(PlayerId(id), role, &config.league);
//!     Arc::new(Player::new(PlayerId(id), format!("Player {id}"), Arc::new(profile)))
//! };
//! let sheet = |name: &str, first: u32| {
//!     let lineup = (first..first + 9).map(|id| player(id, Role::Batter)).collect();
//!     TeamSheet::new(name, lineup, player(first + 50, Role::Pitcher))
//! };
//!
//! let matchup = Matchup::new(sheet("NYY", 1), sheet("BOS", 100)).unwrap();
//! let report = BootstrapRunner::new(&config).run(&matchup, 10, 42).unwrap();
//! assert_eq!(report.games, 10);
//! ```

pub mod data;
pub mod engine;
pub mod error;
pub mod models;

pub use data::{EventLog, MatchupBuilder, PitchEvent, RosterCard};
pub use engine::{BootstrapReport, BootstrapRunner, GameEngine, GameResult, SimulationConfig};
pub use error::{ConfigurationError, DistributionError, Result, SimError, SourceError};
pub use models::{Matchup, PlayerId, PlayerProfile, Role, TeamSide};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
