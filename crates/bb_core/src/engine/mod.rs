//! Simulation engines, from a single pitch up to a bootstrap of many games.

pub mod at_bat;
pub mod bases;
pub mod bootstrap;
pub mod config;
pub mod frame;
pub mod game;
pub mod narrative;
pub mod sampler;

pub use at_bat::{
    select_outcome_distribution, select_pitch_mix, AtBatContext, AtBatEngine, AtBatOutcome,
    AtBatResolver, MixTier, OutcomeTier, PitchRecord,
};
pub use bases::{Advance, Bases};
pub use bootstrap::{game_rng, BootstrapReport, BootstrapRunner, ExecutionMode};
pub use config::{SimulationConfig, CONFIG_PATH_ENV};
pub use frame::{FrameEngine, HalfInningSummary};
pub use game::{GameEngine, GameResult, GameState, TeamState};
pub use narrative::{EventSink, GameLog, NarrativeEvent, NullSink};
pub use sampler::sample;

#[cfg(test)]
pub(crate) mod test_support {
    use rand::Rng;
    use std::sync::Arc;

    use super::at_bat::{AtBatContext, AtBatOutcome, AtBatResolver};
    use super::narrative::EventSink;
    use crate::error::DistributionError;
    use crate::models::{
        AtBatResult, LeagueAverages, Matchup, Player, PlayerId, PlayerProfile, Role, TeamSheet,
    };

    /// Resolver returning a fixed result per game situation, without pitches.
    pub struct Scripted<F> {
        script: F,
    }

    impl<F> Scripted<F> {
        pub fn new(script: F) -> Self
        where
            F: Fn(&AtBatContext<'_>) -> AtBatResult + Sync,
        {
            Self { script }
        }
    }

    impl<F> AtBatResolver for Scripted<F>
    where
        F: Fn(&AtBatContext<'_>) -> AtBatResult + Sync,
    {
        fn resolve<R: Rng + ?Sized>(
            &self,
            ctx: &AtBatContext<'_>,
            _rng: &mut R,
            _sink: &mut dyn EventSink,
        ) -> Result<AtBatOutcome, DistributionError> {
            Ok(AtBatOutcome::immediate((self.script)(ctx)))
        }
    }

    fn player(id: u32, role: Role) -> Arc<Player> {
        let profile = PlayerProfile::league_average(PlayerId(id), role, &LeagueAverages::default());
        Arc::new(Player::new(PlayerId(id), format!("Player {id}"), Arc::new(profile)))
    }

    fn sheet(name: &str, first_id: u32) -> TeamSheet {
        let lineup = (first_id..first_id + 9).map(|id| player(id, Role::Batter)).collect();
        TeamSheet::new(name, lineup, player(first_id + 50, Role::Pitcher))
    }

    /// League-average nine-man lineups named "Home" and "Away".
    pub fn matchup() -> Matchup {
        Matchup { home: sheet("Home", 100), away: sheet("Away", 200) }
    }
}
