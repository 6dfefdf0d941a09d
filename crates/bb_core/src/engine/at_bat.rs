//! At-bat state machine.
//!
//! Samples pitch type then pitch outcome until the count or a ball in play
//! ends the plate appearance. Distribution selection is split out into
//! [`select_pitch_mix`] and [`select_outcome_distribution`] so the fallback
//! order can be tested without sampling.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::narrative::{emit, EventSink, NarrativeEvent, LEVEL_PITCH};
use super::sampler::sample;
use crate::error::DistributionError;
use crate::models::{
    AtBatResult, Count, Distribution, Half, LeagueAverages, PitchOutcome, PitchType, Player,
    PlayerProfile, STRIKES_FOR_STRIKEOUT,
};

/// Consecutive two-strike fouls after which the batter's own distributions
/// are replaced by league averages for the rest of the plate appearance.
/// Only reachable when a sparse profile puts (nearly) all its weight on fouls.
pub const FOUL_STREAK_LIMIT: u32 = 30;

// ============================================================================
// Distribution selection
// ============================================================================

/// Which table supplied the pitch-outcome distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeTier {
    CountSpecific,
    PitchType,
    Global,
    League,
}

/// Which table supplied the pitch-type distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixTier {
    Count,
    Overall,
    League,
}

/// Pitcher's count-specific mix, then overall mix, then the league mix.
pub fn select_pitch_mix<'a>(
    pitcher: &'a PlayerProfile,
    count: Count,
    league: &'a LeagueAverages,
) -> (&'a Distribution<PitchType>, MixTier) {
    let chosen = match &pitcher.pitch_mix {
        Some(mix) => {
            let tier = if mix.by_count.contains_key(&count) { MixTier::Count } else { MixTier::Overall };
            (mix.for_count(count), tier)
        }
        None => (&league.pitch_mix, MixTier::League),
    };
    if chosen.0.is_empty() {
        return (&league.pitch_mix, MixTier::League);
    }
    chosen
}

/// Batter's outcomes for (pitch type, count), then for the pitch type, then
/// unconditioned. An empty selection is replaced by league averages.
pub fn select_outcome_distribution<'a>(
    batter: &'a PlayerProfile,
    pitch_type: PitchType,
    count: Count,
    league: &'a LeagueAverages,
) -> (&'a Distribution<PitchOutcome>, OutcomeTier) {
    let chosen = if let Some(dist) = batter.count_outcomes(pitch_type, count) {
        (dist, OutcomeTier::CountSpecific)
    } else if let Some(dist) = batter.pitch_type_outcomes(pitch_type) {
        (dist, OutcomeTier::PitchType)
    } else {
        (&batter.global_pitch_outcomes, OutcomeTier::Global)
    };
    if chosen.0.is_empty() {
        return (&league.pitch_outcomes, OutcomeTier::League);
    }
    chosen
}

// ============================================================================
// Records
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PitchRecord {
    /// 1-based within the plate appearance.
    pub number: u32,
    pub pitch_type: PitchType,
    pub outcome: PitchOutcome,
    pub count_after: Count,
    pub tier: OutcomeTier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AtBatOutcome {
    pub result: AtBatResult,
    pub pitches: Vec<PitchRecord>,
}

impl AtBatOutcome {
    /// Outcome with no pitch sequence, for resolvers that skip pitch sampling.
    pub fn immediate(result: AtBatResult) -> Self {
        Self { result, pitches: Vec::new() }
    }

    pub fn pitch_count(&self) -> u32 {
        self.pitches.len() as u32
    }
}

/// Game situation handed to a resolver.
#[derive(Debug, Clone, Copy)]
pub struct AtBatContext<'a> {
    pub batter: &'a Player,
    pub pitcher: &'a Player,
    pub inning: u32,
    pub half: Half,
    pub outs: u32,
    /// 0-based plate appearance within the current half-inning.
    pub plate_appearance: u32,
}

/// Decides the result of one plate appearance.
///
/// The game engines only see this trait, so tests can substitute scripted
/// resolvers for the probabilistic engine.
pub trait AtBatResolver: Sync {
    fn resolve<R: Rng + ?Sized>(
        &self,
        ctx: &AtBatContext<'_>,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<AtBatOutcome, DistributionError>;
}

// ============================================================================
// AtBatEngine
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct AtBatEngine<'a> {
    league: &'a LeagueAverages,
}

impl<'a> AtBatEngine<'a> {
    pub fn new(league: &'a LeagueAverages) -> Self {
        Self { league }
    }

    pub fn league(&self) -> &'a LeagueAverages {
        self.league
    }

    /// Simulate one plate appearance between `batter` and `pitcher`.
    pub fn simulate<R: Rng + ?Sized>(
        &self,
        batter: &PlayerProfile,
        pitcher: &PlayerProfile,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<AtBatOutcome, DistributionError> {
        let mut count = Count::default();
        let mut pitches = Vec::new();
        let mut foul_streak = 0u32;

        loop {
            let (mix, _) = select_pitch_mix(pitcher, count, self.league);
            let pitch_type = *sample(mix, rng)?;

            let (dist, tier) = if foul_streak >= FOUL_STREAK_LIMIT {
                (&self.league.pitch_outcomes, OutcomeTier::League)
            } else {
                select_outcome_distribution(batter, pitch_type, count, self.league)
            };
            log::trace!(
                "batter {} {} at {}: {:?} tier",
                batter.player_id,
                pitch_type,
                count,
                tier
            );
            let outcome = *sample(dist, rng)?;

            if outcome == PitchOutcome::Foul && count.strikes == STRIKES_FOR_STRIKEOUT - 1 {
                foul_streak += 1;
            } else {
                foul_streak = 0;
            }
            count.apply(outcome);

            let number = pitches.len() as u32 + 1;
            pitches.push(PitchRecord { number, pitch_type, outcome, count_after: count, tier });
            emit(sink, LEVEL_PITCH, || NarrativeEvent::Pitch { number, pitch_type, outcome, count });

            if outcome == PitchOutcome::HitIntoPlay {
                let in_play = if batter.in_play.is_empty() { &self.league.in_play } else { &batter.in_play };
                let result = AtBatResult::InPlay(*sample(in_play, rng)?);
                return Ok(AtBatOutcome { result, pitches });
            }
            if let Some(result) = count.terminal() {
                return Ok(AtBatOutcome { result, pitches });
            }
        }
    }
}

impl AtBatResolver for AtBatEngine<'_> {
    fn resolve<R: Rng + ?Sized>(
        &self,
        ctx: &AtBatContext<'_>,
        rng: &mut R,
        sink: &mut dyn EventSink,
    ) -> Result<AtBatOutcome, DistributionError> {
        self.simulate(&ctx.batter.profile, &ctx.pitcher.profile, rng, sink)
    }
}
