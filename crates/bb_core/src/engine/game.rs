//! Full-game engine.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::at_bat::{AtBatEngine, AtBatResolver};
use super::config::SimulationConfig;
use super::frame::FrameEngine;
use super::narrative::{emit, EventSink, NarrativeEvent, LEVEL_SUMMARY};
use crate::error::{ConfigurationError, Result};
use crate::models::{Half, Matchup, StatBook, TeamSide};

/// Score and batting-order position for one team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamState {
    pub score: u32,
    /// Lineup slot of the next batter.
    pub cursor: usize,
}

/// Mutable per-game state. Everything else a game reads is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub inning: u32,
    pub half: Half,
    pub home: TeamState,
    pub away: TeamState,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl GameState {
    pub fn new() -> Self {
        Self { inning: 1, half: Half::Top, home: TeamState::default(), away: TeamState::default() }
    }

    pub fn team(&self, side: TeamSide) -> &TeamState {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    pub fn team_mut(&mut self, side: TeamSide) -> &mut TeamState {
        match side {
            TeamSide::Home => &mut self.home,
            TeamSide::Away => &mut self.away,
        }
    }

    pub fn is_tied(&self) -> bool {
        self.home.score == self.away.score
    }

    /// Bottom half at or beyond regulation with the home team ahead: no
    /// further plate appearances are needed.
    pub fn home_leads_late(&self, regulation: u32) -> bool {
        self.inning >= regulation && self.half == Half::Bottom && self.home.score > self.away.score
    }

    pub fn leader(&self) -> Option<TeamSide> {
        match self.home.score.cmp(&self.away.score) {
            std::cmp::Ordering::Greater => Some(TeamSide::Home),
            std::cmp::Ordering::Less => Some(TeamSide::Away),
            std::cmp::Ordering::Equal => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    pub home_score: u32,
    pub away_score: u32,
    pub innings: u32,
    /// `None` only when `max_innings` ended a tied game.
    pub winner: Option<TeamSide>,
    pub walk_off: bool,
    pub stats: StatBook,
}

impl GameResult {
    pub fn is_extra_innings(&self, regulation: u32) -> bool {
        self.innings > regulation
    }
}

/// Plays complete games for a fixed configuration and resolver.
pub struct GameEngine<'a, Res = AtBatEngine<'a>> {
    config: &'a SimulationConfig,
    resolver: Res,
}

impl<'a> GameEngine<'a> {
    /// Engine driven by the probabilistic at-bat model.
    pub fn new(config: &'a SimulationConfig) -> Self {
        Self { config, resolver: AtBatEngine::new(&config.league) }
    }
}

impl<'a, Res: AtBatResolver> GameEngine<'a, Res> {
    pub fn with_resolver(config: &'a SimulationConfig, resolver: Res) -> Self {
        Self { config, resolver }
    }

    pub fn config(&self) -> &SimulationConfig {
        self.config
    }

    /// Play one game from a fresh state.
    pub fn play<R: Rng + ?Sized>(
        &self,
        matchup: &Matchup,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<GameResult> {
        self.config.validate().map_err(ConfigurationError::InvalidConfig)?;
        matchup.validate()?;

        let frame = FrameEngine::new(self.config, &self.resolver);
        let regulation = self.config.regulation_innings;
        let mut state = GameState::new();
        let mut stats = StatBook::new();
        let mut walk_off = false;

        emit(sink, LEVEL_SUMMARY, || NarrativeEvent::Lineups {
            away: matchup.away.name.clone(),
            away_card: matchup.away.lineup_card(),
            home: matchup.home.name.clone(),
            home_card: matchup.home.lineup_card(),
        });

        loop {
            for half in [Half::Top, Half::Bottom] {
                state.half = half;
                let summary = frame.play_half(&mut state, matchup, &mut stats, rng, sink)?;
                walk_off |= summary.walk_off;
            }

            if state.inning >= regulation && !state.is_tied() {
                break;
            }
            if self.config.max_innings.is_some_and(|max| state.inning >= max) {
                log::debug!("game called tied after {} innings", state.inning);
                break;
            }
            state.inning += 1;
        }

        emit(sink, LEVEL_SUMMARY, || NarrativeEvent::Final {
            away: matchup.away.name.clone(),
            away_score: state.away.score,
            home: matchup.home.name.clone(),
            home_score: state.home.score,
            innings: state.inning,
        });

        Ok(GameResult {
            home_score: state.home.score,
            away_score: state.away.score,
            innings: state.inning,
            winner: state.leader(),
            walk_off,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::narrative::{GameLog, NullSink};
    use crate::engine::test_support::{matchup, Scripted};
    use crate::error::SimError;
    use crate::models::AtBatResult;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn team_plate_appearances(result: &GameResult, matchup: &Matchup, side: TeamSide) -> u32 {
        matchup.team(side).lineup.iter().map(|p| result.stats.line(p.id).batting.plate_appearances).sum()
    }

    #[test]
    fn test_leadoff_home_runs_score_once_per_half() {
        let config = SimulationConfig::capped(12);
        let resolver = Scripted::new(|ctx| {
            if ctx.plate_appearance == 0 {
                AtBatResult::HOME_RUN
            } else {
                AtBatResult::Strikeout
            }
        });
        let engine = GameEngine::with_resolver(&config, resolver);
        let matchup = matchup();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = engine.play(&matchup, &mut rng, &mut NullSink).unwrap();

        assert_eq!(result.innings, 12);
        assert_eq!(result.home_score, 12);
        assert_eq!(result.away_score, 12);
        assert_eq!(result.winner, None);
        assert!(!result.walk_off);
        assert_eq!(team_plate_appearances(&result, &matchup, TeamSide::Away), 48);
        assert_eq!(result.stats.line(matchup.home.pitcher.id).pitching.home_runs_allowed, 12);
    }

    #[test]
    fn test_bottom_ninth_skipped_when_home_leads() {
        let config = SimulationConfig::standard();
        let resolver = Scripted::new(|ctx| {
            if ctx.inning == 1 && ctx.half == Half::Bottom && ctx.plate_appearance == 0 {
                AtBatResult::HOME_RUN
            } else {
                AtBatResult::Strikeout
            }
        });
        let engine = GameEngine::with_resolver(&config, resolver);
        let matchup = matchup();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = engine.play(&matchup, &mut rng, &mut NullSink).unwrap();

        assert_eq!((result.home_score, result.away_score), (1, 0));
        assert_eq!(result.innings, 9);
        assert_eq!(result.winner, Some(TeamSide::Home));
        assert!(!result.walk_off);
        assert_eq!(team_plate_appearances(&result, &matchup, TeamSide::Away), 27);
        assert_eq!(team_plate_appearances(&result, &matchup, TeamSide::Home), 25);
    }

    #[test]
    fn test_walk_off_in_ninth() {
        let config = SimulationConfig::standard();
        let resolver = Scripted::new(|ctx| {
            if ctx.inning == 9 && ctx.half == Half::Bottom && ctx.plate_appearance == 1 {
                AtBatResult::HOME_RUN
            } else {
                AtBatResult::Strikeout
            }
        });
        let engine = GameEngine::with_resolver(&config, resolver);
        let matchup = matchup();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = engine.play(&matchup, &mut rng, &mut NullSink).unwrap();

        assert!(result.walk_off);
        assert_eq!(result.winner, Some(TeamSide::Home));
        assert_eq!(team_plate_appearances(&result, &matchup, TeamSide::Home), 26);
    }

    #[test]
    fn test_extra_innings_until_decided() {
        let config = SimulationConfig::standard();
        let resolver = Scripted::new(|ctx| {
            if ctx.inning == 11 && ctx.half == Half::Top && ctx.plate_appearance == 0 {
                AtBatResult::HOME_RUN
            } else {
                AtBatResult::Strikeout
            }
        });
        let engine = GameEngine::with_resolver(&config, resolver);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let result = engine.play(&matchup(), &mut rng, &mut NullSink).unwrap();
        assert_eq!(result.innings, 11);
        assert_eq!(result.winner, Some(TeamSide::Away));
        assert!(result.is_extra_innings(config.regulation_innings));
    }

    #[test]
    fn test_probabilistic_game_is_deterministic() {
        let config = SimulationConfig::standard();
        let engine = GameEngine::new(&config);
        let matchup = matchup();
        let play = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            engine.play(&matchup, &mut rng, &mut NullSink).unwrap()
        };
        let first = play(999);
        assert_eq!(first, play(999), "Same seed should produce same result");
        assert!(first.innings >= 9);
        assert!(first.winner.is_some());
    }

    #[test]
    fn test_narrative_summary_lines() {
        let config = SimulationConfig::standard();
        let resolver = Scripted::new(|ctx| {
            if ctx.half == Half::Bottom && ctx.inning == 1 && ctx.plate_appearance == 0 {
                AtBatResult::HOME_RUN
            } else {
                AtBatResult::Strikeout
            }
        });
        let engine = GameEngine::with_resolver(&config, resolver);
        let mut log = GameLog::new(1);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        engine.play(&matchup(), &mut rng, &mut log).unwrap();
        let text = log.to_text();
        assert!(text.starts_with("Away lineup:"));
        assert!(text.contains("Top of inning 1: Away batting"));
        assert!(text.contains("End of Bottom 1: 1 run(s). Score 0-1"));
        assert!(!text.contains("Bottom of inning 9"));
        assert!(text.ends_with("Final (9 innings): Away 0, Home 1"));
    }

    #[test]
    fn test_invalid_config_rejected_before_play() {
        let mut config = SimulationConfig::standard();
        config.outs_per_half = 0;
        let engine = GameEngine::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = engine.play(&matchup(), &mut rng, &mut NullSink).unwrap_err();
        assert!(err.is_input_error());
    }

    #[test]
    fn test_empty_lineup_rejected_before_play() {
        let config = SimulationConfig::standard();
        let engine = GameEngine::new(&config);
        let mut matchup = matchup();
        matchup.away.lineup.clear();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let err = engine.play(&matchup, &mut rng, &mut NullSink).unwrap_err();
        assert_eq!(
            err,
            SimError::Configuration(ConfigurationError::MissingLineup { side: TeamSide::Away, team: "Away".into() })
        );
    }
}
