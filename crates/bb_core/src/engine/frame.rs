//! Half-inning engine: plate appearances until the side is retired or the
//! home team walks it off.

use rand::Rng;
use std::sync::Arc;

use super::at_bat::{AtBatContext, AtBatResolver};
use super::bases::Bases;
use super::config::SimulationConfig;
use super::game::GameState;
use super::narrative::{emit, EventSink, NarrativeEvent, LEVEL_PLATE_APPEARANCE, LEVEL_SUMMARY};
use crate::error::DistributionError;
use crate::models::{Matchup, StatBook};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HalfInningSummary {
    pub runs: u32,
    pub outs: u32,
    pub plate_appearances: u32,
    /// The home team took the lead in a bottom half at or after regulation.
    pub walk_off: bool,
    /// Not played because the home team already led.
    pub skipped: bool,
}

pub struct FrameEngine<'a, Res> {
    config: &'a SimulationConfig,
    resolver: &'a Res,
}

impl<'a, Res: AtBatResolver> FrameEngine<'a, Res> {
    pub fn new(config: &'a SimulationConfig, resolver: &'a Res) -> Self {
        Self { config, resolver }
    }

    /// Play the half-inning described by `state.inning` / `state.half`,
    /// updating score, batting-order cursor and `stats`.
    pub fn play_half<R: Rng + ?Sized>(
        &self,
        state: &mut GameState,
        matchup: &Matchup,
        stats: &mut StatBook,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<HalfInningSummary, DistributionError> {
        let regulation = self.config.regulation_innings;
        if state.home_leads_late(regulation) {
            return Ok(HalfInningSummary { skipped: true, ..HalfInningSummary::default() });
        }

        let batting = state.half.batting_side();
        let offense = matchup.team(batting);
        let pitcher = &matchup.team(state.half.fielding_side()).pitcher;
        let (inning, half) = (state.inning, state.half);

        emit(sink, LEVEL_SUMMARY, || NarrativeEvent::HalfInningStart {
            inning,
            half,
            team: offense.name.clone(),
        });

        let mut bases = Bases::new();
        if self.config.extra_innings_runner && inning > regulation {
            let len = offense.lineup.len();
            let runner = Arc::clone(offense.batter(state.team(batting).cursor + len - 1));
            emit(sink, LEVEL_PLATE_APPEARANCE, || NarrativeEvent::ExtraInningsRunner {
                runner: runner.name.clone(),
            });
            bases = Bases::with_runner_on_second(runner);
        }

        let mut summary = HalfInningSummary::default();
        while summary.outs < self.config.outs_per_half {
            let cursor = state.team(batting).cursor;
            let batter = offense.batter(cursor);
            let ctx = AtBatContext {
                batter,
                pitcher,
                inning,
                half,
                outs: summary.outs,
                plate_appearance: summary.plate_appearances,
            };
            let outcome = self.resolver.resolve(&ctx, rng, sink)?;
            let advance = bases.advance(outcome.result, batter);

            if outcome.result.is_out() {
                summary.outs += 1;
            }
            summary.runs += advance.runs;
            summary.plate_appearances += 1;

            stats.record_plate_appearance(batter.id, pitcher.id, outcome.result, outcome.pitch_count(), advance.runs);
            for scorer in &advance.scorers {
                stats.record_run(scorer.id);
            }

            let team = state.team_mut(batting);
            team.score += advance.runs;
            team.cursor = (cursor + 1) % offense.lineup.len();

            emit(sink, LEVEL_PLATE_APPEARANCE, || NarrativeEvent::PlateAppearance {
                batter: batter.name.clone(),
                pitcher: pitcher.name.clone(),
                result: outcome.result,
                runs: advance.runs,
                detail: advance.description.clone(),
            });

            if state.home_leads_late(regulation) {
                summary.walk_off = true;
                emit(sink, LEVEL_SUMMARY, || NarrativeEvent::WalkOff { team: offense.name.clone() });
                break;
            }
        }

        emit(sink, LEVEL_SUMMARY, || NarrativeEvent::HalfInningEnd {
            inning,
            half,
            runs: summary.runs,
            away_score: state.away.score,
            home_score: state.home.score,
        });
        Ok(summary)
    }
}
