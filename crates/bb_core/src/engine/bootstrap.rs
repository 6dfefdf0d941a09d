//! Monte Carlo bootstrap over many independent games.
//!
//! Game `i` draws from its own ChaCha8 stream (`seed`, stream `i`), and per-game
//! tallies are combined with integer addition, so a report depends only on
//! the seed and game count, never on thread scheduling.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::at_bat::{AtBatEngine, AtBatResolver};
use super::config::SimulationConfig;
use super::game::{GameEngine, GameResult};
use super::narrative::NullSink;
use crate::error::{ConfigurationError, Result};
use crate::models::{Matchup, StatBook, TeamSide};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    #[default]
    Parallel,
    Sequential,
}

/// Aggregate of a bootstrap run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapReport {
    pub home_team: String,
    pub away_team: String,
    pub games: u32,
    pub seed: u64,
    pub home_wins: u32,
    pub away_wins: u32,
    pub ties: u32,
    pub home_runs_total: u64,
    pub away_runs_total: u64,
    pub innings_total: u64,
    pub extra_inning_games: u32,
    pub walk_offs: u32,
    pub stats: StatBook,
}

impl BootstrapReport {
    pub fn mean_home_runs(&self) -> f64 {
        self.home_runs_total as f64 / self.games.max(1) as f64
    }

    pub fn mean_away_runs(&self) -> f64 {
        self.away_runs_total as f64 / self.games.max(1) as f64
    }

    pub fn win_pct(&self, side: TeamSide) -> f64 {
        let wins = match side {
            TeamSide::Home => self.home_wins,
            TeamSide::Away => self.away_wins,
        };
        wins as f64 / self.games.max(1) as f64
    }

    /// Side with more wins, `None` on an even split.
    pub fn favorite(&self) -> Option<TeamSide> {
        match self.home_wins.cmp(&self.away_wins) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn summary(&self) -> String {
        format!(
            "{} games: {} {} wins ({:.1}%), {} {} wins ({:.1}%), {} ties; mean score {} {:.2} - {} {:.2}",
            self.games,
            self.away_team,
            self.away_wins,
            self.win_pct(TeamSide::Away) * 100.0,
            self.home_team,
            self.home_wins,
            self.win_pct(TeamSide::Home) * 100.0,
            self.ties,
            self.away_team,
            self.mean_away_runs(),
            self.home_team,
            self.mean_home_runs(),
        )
    }
}

/// Per-game contribution; merged by addition only.
#[derive(Debug, Clone, Default)]
struct Tally {
    games: u32,
    home_wins: u32,
    away_wins: u32,
    ties: u32,
    home_runs: u64,
    away_runs: u64,
    innings: u64,
    extra_innings: u32,
    walk_offs: u32,
    stats: StatBook,
}

impl Tally {
    fn from_game(game: GameResult, regulation: u32) -> Self {
        let (home_wins, away_wins, ties) = match game.winner {
            Some(TeamSide::Home) => (1, 0, 0),
            Some(TeamSide::Away) => (0, 1, 0),
            None => (0, 0, 1),
        };
        Self {
            games: 1,
            home_wins,
            away_wins,
            ties,
            home_runs: u64::from(game.home_score),
            away_runs: u64::from(game.away_score),
            innings: u64::from(game.innings),
            extra_innings: u32::from(game.is_extra_innings(regulation)),
            walk_offs: u32::from(game.walk_off),
            stats: game.stats,
        }
    }

    fn merge(self, other: Tally) -> Tally {
        Tally {
            games: self.games + other.games,
            home_wins: self.home_wins + other.home_wins,
            away_wins: self.away_wins + other.away_wins,
            ties: self.ties + other.ties,
            home_runs: self.home_runs + other.home_runs,
            away_runs: self.away_runs + other.away_runs,
            innings: self.innings + other.innings,
            extra_innings: self.extra_innings + other.extra_innings,
            walk_offs: self.walk_offs + other.walk_offs,
            stats: self.stats.merged(other.stats),
        }
    }
}

/// Stream for game `index`: independent of every other game.
pub fn game_rng(seed: u64, index: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(index);
    rng
}

pub struct BootstrapRunner<'a, Res = AtBatEngine<'a>> {
    engine: GameEngine<'a, Res>,
    mode: ExecutionMode,
}

impl<'a> BootstrapRunner<'a> {
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { engine: GameEngine::new(config), mode: ExecutionMode::default() }
    }
}

impl<'a, Res: AtBatResolver> BootstrapRunner<'a, Res> {
    pub fn with_resolver(config: &'a SimulationConfig, resolver: Res) -> Self {
        Self { engine: GameEngine::with_resolver(config, resolver), mode: ExecutionMode::default() }
    }

    pub fn mode(mut self, mode: ExecutionMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn play_game(&self, matchup: &Matchup, seed: u64, index: u64) -> Result<GameResult> {
        let mut rng = game_rng(seed, index);
        self.engine.play(matchup, &mut rng, &mut NullSink)
    }

    /// Play `games` independent games of `matchup`.
    pub fn run(&self, matchup: &Matchup, games: u32, seed: u64) -> Result<BootstrapReport> {
        if games == 0 {
            return Err(ConfigurationError::NoGames.into());
        }
        matchup.validate()?;
        log::info!("bootstrap {}: {games} games, seed {seed}, {:?}", matchup.title(), self.mode);

        let regulation = self.engine.config().regulation_innings;
        let one = |i: u32| -> Result<Tally> {
            let game = self.play_game(matchup, seed, u64::from(i))?;
            log::debug!("game {i}: {} {} - {} {}", matchup.away.name, game.away_score, matchup.home.name, game.home_score);
            Ok(Tally::from_game(game, regulation))
        };

        let tally = match self.mode {
            ExecutionMode::Parallel => {
                (0..games).into_par_iter().map(one).try_reduce(Tally::default, |a, b| Ok(a.merge(b)))?
            }
            ExecutionMode::Sequential => {
                let mut acc = Tally::default();
                for i in 0..games {
                    acc = acc.merge(one(i)?);
                }
                acc
            }
        };

        let report = BootstrapReport {
            home_team: matchup.home.name.clone(),
            away_team: matchup.away.name.clone(),
            games: tally.games,
            seed,
            home_wins: tally.home_wins,
            away_wins: tally.away_wins,
            ties: tally.ties,
            home_runs_total: tally.home_runs,
            away_runs_total: tally.away_runs,
            innings_total: tally.innings,
            extra_inning_games: tally.extra_innings,
            walk_offs: tally.walk_offs,
            stats: tally.stats,
        };
        log::info!("bootstrap finished: {}", report.summary());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::test_support::{matchup, Scripted};
    use crate::error::SimError;
    use crate::models::AtBatResult;

    #[test]
    fn test_zero_games_rejected() {
        let config = SimulationConfig::standard();
        let err = BootstrapRunner::new(&config).run(&matchup(), 0, 1).unwrap_err();
        assert_eq!(err, SimError::Configuration(ConfigurationError::NoGames));
    }

    #[test]
    fn test_empty_lineup_rejected_before_any_game() {
        let config = SimulationConfig::standard();
        let mut matchup = matchup();
        matchup.home.lineup.clear();
        for mode in [ExecutionMode::Parallel, ExecutionMode::Sequential] {
            let err = BootstrapRunner::new(&config).mode(mode).run(&matchup, 10, 1).unwrap_err();
            assert!(matches!(err, SimError::Configuration(ConfigurationError::MissingLineup { .. })));
        }
    }

    #[test]
    fn test_bit_reproducible_for_fixed_seed() {
        let config = SimulationConfig::standard();
        let runner = BootstrapRunner::new(&config);
        let matchup = matchup();
        let a = runner.run(&matchup, 100, 2024).unwrap();
        let b = runner.run(&matchup, 100, 2024).unwrap();
        assert_eq!(a, b);
        assert_eq!(serde_json::to_string(&a).unwrap(), serde_json::to_string(&b).unwrap());
        assert_eq!(a.games, 100);
        assert_eq!(a.home_wins + a.away_wins + a.ties, 100);
        assert_eq!(a.ties, 0);
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let config = SimulationConfig::standard();
        let matchup = matchup();
        let parallel = BootstrapRunner::new(&config).run(&matchup, 100, 77).unwrap();
        let sequential = BootstrapRunner::new(&config).mode(ExecutionMode::Sequential).run(&matchup, 100, 77).unwrap();
        assert_eq!(parallel, sequential);
    }

    #[test]
    fn test_different_seeds_differ() {
        let config = SimulationConfig::standard();
        let runner = BootstrapRunner::new(&config);
        let matchup = matchup();
        let a = runner.run(&matchup, 50, 1).unwrap();
        let b = runner.run(&matchup, 50, 2).unwrap();
        assert_ne!(a.stats, b.stats);
    }

    #[test]
    fn test_scripted_totals_add_up() {
        let config = SimulationConfig::capped(10);
        let resolver = Scripted::new(|ctx| {
            if ctx.plate_appearance == 0 {
                AtBatResult::HOME_RUN
            } else {
                AtBatResult::Strikeout
            }
        });
        let matchup = matchup();
        let report = BootstrapRunner::with_resolver(&config, resolver).run(&matchup, 20, 5).unwrap();
        assert_eq!(report.ties, 20);
        assert_eq!(report.home_runs_total, 200);
        assert_eq!(report.extra_inning_games, 20);
        assert!((report.mean_away_runs() - 10.0).abs() < 1e-12);
        assert_eq!(report.favorite(), None);

        let leadoff = matchup.away.lineup[0].id;
        assert_eq!(report.stats.line(leadoff).batting.plate_appearances, 20 * 5);
    }
}
