//! Leveled play-by-play narrative.
//!
//! Separate from the `log` facade: the caller decides how much of a game to
//! see and where it goes. Levels:
//! 1. lineups, half-inning and final score summaries
//! 2. plate-appearance results and runner movement
//! 3. pitch-by-pitch

use serde::Serialize;
use std::fmt;

use crate::models::{AtBatResult, Count, Half, PitchOutcome, PitchType};

pub const LEVEL_SUMMARY: u8 = 1;
pub const LEVEL_PLATE_APPEARANCE: u8 = 2;
pub const LEVEL_PITCH: u8 = 3;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum NarrativeEvent {
    Lineups { away: String, away_card: String, home: String, home_card: String },
    HalfInningStart { inning: u32, half: Half, team: String },
    ExtraInningsRunner { runner: String },
    Pitch { number: u32, pitch_type: PitchType, outcome: PitchOutcome, count: Count },
    PlateAppearance { batter: String, pitcher: String, result: AtBatResult, runs: u32, detail: String },
    HalfInningEnd { inning: u32, half: Half, runs: u32, away_score: u32, home_score: u32 },
    WalkOff { team: String },
    Final { away: String, away_score: u32, home: String, home_score: u32, innings: u32 },
}

impl NarrativeEvent {
    pub fn level(&self) -> u8 {
        match self {
            NarrativeEvent::Lineups { .. }
            | NarrativeEvent::HalfInningStart { .. }
            | NarrativeEvent::HalfInningEnd { .. }
            | NarrativeEvent::WalkOff { .. }
            | NarrativeEvent::Final { .. } => LEVEL_SUMMARY,
            NarrativeEvent::PlateAppearance { .. } | NarrativeEvent::ExtraInningsRunner { .. } => {
                LEVEL_PLATE_APPEARANCE
            }
            NarrativeEvent::Pitch { .. } => LEVEL_PITCH,
        }
    }
}

impl fmt::Display for NarrativeEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NarrativeEvent::Lineups { away, away_card, home, home_card } => {
                write!(f, "{away} lineup:\n{away_card}\n{home} lineup:\n{home_card}")
            }
            NarrativeEvent::HalfInningStart { inning, half, team } => {
                write!(f, "{half} of inning {inning}: {team} batting")
            }
            NarrativeEvent::ExtraInningsRunner { runner } => write!(f, "{runner} starts on second"),
            NarrativeEvent::Pitch { number, pitch_type, outcome, count } => {
                write!(f, "Pitch {number}: {pitch_type} {outcome} ({count})")
            }
            NarrativeEvent::PlateAppearance { batter, pitcher, result, runs, detail } => {
                write!(f, "{batter} vs {pitcher}: {result}")?;
                if *runs > 0 {
                    write!(f, ", {runs} run(s) score")?;
                }
                if !detail.is_empty() {
                    write!(f, ". {detail}")?;
                }
                Ok(())
            }
            NarrativeEvent::HalfInningEnd { inning, half, runs, away_score, home_score } => {
                write!(f, "End of {half} {inning}: {runs} run(s). Score {away_score}-{home_score}")
            }
            NarrativeEvent::WalkOff { team } => write!(f, "{team} walk it off"),
            NarrativeEvent::Final { away, away_score, home, home_score, innings } => {
                write!(f, "Final ({innings} innings): {away} {away_score}, {home} {home_score}")
            }
        }
    }
}

/// Receiver for narrative events.
pub trait EventSink {
    /// Whether events at `level` should be built at all.
    fn wants(&self, level: u8) -> bool;

    fn record(&mut self, event: NarrativeEvent);
}

/// Build and record an event only when the sink wants its level.
pub(crate) fn emit(sink: &mut dyn EventSink, level: u8, make: impl FnOnce() -> NarrativeEvent) {
    if sink.wants(level) {
        sink.record(make());
    }
}

/// Discards everything. Used by bootstrap runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn wants(&self, _level: u8) -> bool {
        false
    }

    fn record(&mut self, _event: NarrativeEvent) {}
}

/// Collects events up to `verbosity` as tab-indented text lines, one tab per
/// level beyond the first.
#[derive(Debug, Clone, Default)]
pub struct GameLog {
    verbosity: u8,
    events: Vec<NarrativeEvent>,
}

impl GameLog {
    pub fn new(verbosity: u8) -> Self {
        Self { verbosity, events: Vec::new() }
    }

    pub fn events(&self) -> &[NarrativeEvent] {
        &self.events
    }

    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        for event in &self.events {
            let indent = "\t".repeat(usize::from(event.level().saturating_sub(1)));
            for line in event.to_string().lines() {
                lines.push(format!("{indent}{line}"));
            }
        }
        lines
    }

    pub fn to_text(&self) -> String {
        self.lines().join("\n")
    }
}

impl EventSink for GameLog {
    fn wants(&self, level: u8) -> bool {
        level <= self.verbosity
    }

    fn record(&mut self, event: NarrativeEvent) {
        if self.wants(event.level()) {
            self.events.push(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pitch() -> NarrativeEvent {
        NarrativeEvent::Pitch {
            number: 1,
            pitch_type: PitchType::new("FF").unwrap(),
            outcome: PitchOutcome::Ball,
            count: Count::new(1, 0),
        }
    }

    #[test]
    fn test_verbosity_filters_levels() {
        let mut log = GameLog::new(2);
        emit(&mut log, LEVEL_PITCH, pitch);
        emit(&mut log, LEVEL_SUMMARY, || NarrativeEvent::WalkOff { team: "NYY".into() });
        assert_eq!(log.events().len(), 1);

        let mut silent = GameLog::new(0);
        emit(&mut silent, LEVEL_SUMMARY, || NarrativeEvent::WalkOff { team: "NYY".into() });
        assert!(silent.events().is_empty());
    }

    #[test]
    fn test_lines_are_indented_by_level() {
        let mut log = GameLog::new(3);
        log.record(NarrativeEvent::HalfInningStart { inning: 1, half: Half::Top, team: "BOS".into() });
        log.record(pitch());
        let lines = log.lines();
        assert_eq!(lines[0], "Top of inning 1: BOS batting");
        assert_eq!(lines[1], "\t\tPitch 1: FF ball (1-0)");
    }

    #[test]
    fn test_null_sink_wants_nothing() {
        assert!(!NullSink.wants(LEVEL_SUMMARY));
    }
}
