//! Per-player counting stats, tallied during simulation and merged across
//! bootstrap runs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::AddAssign;

use super::outcome::{AtBatResult, InPlayOutcome};
use super::player::PlayerId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattingLine {
    pub plate_appearances: u32,
    pub at_bats: u32,
    pub hits: u32,
    pub singles: u32,
    pub doubles: u32,
    pub triples: u32,
    pub home_runs: u32,
    pub walks: u32,
    pub strikeouts: u32,
    pub runs: u32,
    pub rbi: u32,
}

impl BattingLine {
    pub fn record(&mut self, result: AtBatResult, rbi: u32) {
        self.plate_appearances += 1;
        self.rbi += rbi;
        match result {
            AtBatResult::Walk => self.walks += 1,
            AtBatResult::Strikeout => {
                self.at_bats += 1;
                self.strikeouts += 1;
            }
            AtBatResult::InPlay(outcome) => {
                self.at_bats += 1;
                if outcome.is_hit() {
                    self.hits += 1;
                }
                match outcome {
                    InPlayOutcome::FieldOut => {}
                    InPlayOutcome::Single => self.singles += 1,
                    InPlayOutcome::Double => self.doubles += 1,
                    InPlayOutcome::Triple => self.triples += 1,
                    InPlayOutcome::HomeRun => self.home_runs += 1,
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Hits per at-bat, `None` without at-bats.
    pub fn average(&self) -> Option<f64> {
        (self.at_bats > 0).then(|| self.hits as f64 / self.at_bats as f64)
    }

    pub fn on_base_pct(&self) -> Option<f64> {
        (self.plate_appearances > 0)
            .then(|| (self.hits + self.walks) as f64 / self.plate_appearances as f64)
    }
}

impl AddAssign for BattingLine {
    fn add_assign(&mut self, o: Self) {
        self.plate_appearances += o.plate_appearances;
        self.at_bats += o.at_bats;
        self.hits += o.hits;
        self.singles += o.singles;
        self.doubles += o.doubles;
        self.triples += o.triples;
        self.home_runs += o.home_runs;
        self.walks += o.walks;
        self.strikeouts += o.strikeouts;
        self.runs += o.runs;
        self.rbi += o.rbi;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PitchingLine {
    pub batters_faced: u32,
    pub pitches: u32,
    pub strikeouts: u32,
    pub walks: u32,
    pub hits_allowed: u32,
    pub home_runs_allowed: u32,
    pub runs_allowed: u32,
    pub outs_recorded: u32,
}

impl PitchingLine {
    pub fn record(&mut self, result: AtBatResult, pitches: u32, runs: u32) {
        self.batters_faced += 1;
        self.pitches += pitches;
        self.runs_allowed += runs;
        if result.is_out() {
            self.outs_recorded += 1;
        }
        match result {
            AtBatResult::Walk => self.walks += 1,
            AtBatResult::Strikeout => self.strikeouts += 1,
            AtBatResult::InPlay(outcome) => {
                if outcome.is_hit() {
                    self.hits_allowed += 1;
                }
                if outcome == InPlayOutcome::HomeRun {
                    self.home_runs_allowed += 1;
                }
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Innings pitched in the conventional `whole.thirds` notation.
    pub fn innings_pitched(&self) -> String {
        format!("{}.{}", self.outs_recorded / 3, self.outs_recorded % 3)
    }
}

impl AddAssign for PitchingLine {
    fn add_assign(&mut self, o: Self) {
        self.batters_faced += o.batters_faced;
        self.pitches += o.pitches;
        self.strikeouts += o.strikeouts;
        self.walks += o.walks;
        self.hits_allowed += o.hits_allowed;
        self.home_runs_allowed += o.home_runs_allowed;
        self.runs_allowed += o.runs_allowed;
        self.outs_recorded += o.outs_recorded;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PlayerLine {
    pub batting: BattingLine,
    pub pitching: PitchingLine,
}

impl AddAssign for PlayerLine {
    fn add_assign(&mut self, o: Self) {
        self.batting += o.batting;
        self.pitching += o.pitching;
    }
}

// ============================================================================
// StatBook
// ============================================================================

/// Stat lines keyed by player. Merging is a key union with missing entries
/// treated as zero, so it is associative and commutative.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatBook {
    lines: BTreeMap<PlayerId, PlayerLine>,
}

impl StatBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn line(&self, player: PlayerId) -> PlayerLine {
        self.lines.get(&player).copied().unwrap_or_default()
    }

    pub fn line_mut(&mut self, player: PlayerId) -> &mut PlayerLine {
        self.lines.entry(player).or_default()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PlayerId, &PlayerLine)> {
        self.lines.iter()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Record one completed plate appearance for both participants.
    pub fn record_plate_appearance(
        &mut self,
        batter: PlayerId,
        pitcher: PlayerId,
        result: AtBatResult,
        pitches: u32,
        runs: u32,
    ) {
        self.line_mut(batter).batting.record(result, runs);
        self.line_mut(pitcher).pitching.record(result, pitches, runs);
    }

    pub fn record_run(&mut self, scorer: PlayerId) {
        self.line_mut(scorer).batting.runs += 1;
    }

    pub fn merge(&mut self, other: &StatBook) {
        for (player, line) in &other.lines {
            *self.line_mut(*player) += *line;
        }
    }

    /// Consuming merge for `reduce`-style folds.
    pub fn merged(mut self, other: StatBook) -> StatBook {
        if self.lines.len() < other.lines.len() {
            let mut other = other;
            other.merge(&self);
            return other;
        }
        self.merge(&other);
        self
    }
}
