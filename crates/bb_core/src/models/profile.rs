//! Per-player probability profiles.
//!
//! A profile is computed once from a player's historical pitches and never
//! mutated afterwards. Lookups return `Option` so the at-bat engine can walk
//! its fallback chain explicitly; the builder guarantees that every
//! distribution stored here is non-empty and normalized.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::count::Count;
use super::distribution::{Distribution, Tally};
use super::league::LeagueAverages;
use super::outcome::{InPlayOutcome, PitchOutcome, PitchType};
use super::player::{PlayerId, Role};
use crate::data::PitchEvent;

/// Pitch-type selection model, present on pitcher profiles only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PitchMix {
    /// Unconditioned pitch-type frequencies.
    pub overall: Distribution<PitchType>,
    /// Frequencies per count. All twelve live counts are present; counts the
    /// pitcher was never observed in carry `overall`.
    pub by_count: BTreeMap<Count, Distribution<PitchType>>,
}

impl PitchMix {
    pub fn for_count(&self, count: Count) -> &Distribution<PitchType> {
        self.by_count.get(&count).unwrap_or(&self.overall)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub player_id: PlayerId,
    pub role: Role,
    /// Number of historical pitches the profile was built from.
    pub sample_size: u64,
    pub in_play: Distribution<InPlayOutcome>,
    pub global_pitch_outcomes: Distribution<PitchOutcome>,
    pub pitch_type_outcomes: BTreeMap<PitchType, Distribution<PitchOutcome>>,
    /// Pitch type → count → outcomes. Unobserved combinations are absent.
    pub count_pitch_outcomes: BTreeMap<PitchType, BTreeMap<Count, Distribution<PitchOutcome>>>,
    pub pitch_mix: Option<PitchMix>,
}

impl PlayerProfile {
    /// Build a profile from the rows involving `player_id` in `role`.
    ///
    /// Rows for other players are ignored, so callers may pass an unfiltered
    /// event slice. An empty sample yields a profile made entirely of league
    /// averages; construction never fails.
    pub fn build<'a>(
        player_id: PlayerId,
        role: Role,
        events: impl IntoIterator<Item = &'a PitchEvent>,
        league: &LeagueAverages,
    ) -> Self {
        let mut sample_size = 0u64;
        let mut in_play = Tally::new();
        let mut global = Tally::new();
        let mut by_type: BTreeMap<PitchType, Tally<PitchOutcome>> = BTreeMap::new();
        let mut by_type_count: BTreeMap<(PitchType, Count), Tally<PitchOutcome>> = BTreeMap::new();
        let mut mix = Tally::new();
        let mut mix_by_count: BTreeMap<Count, Tally<PitchType>> = BTreeMap::new();

        for event in events.into_iter().filter(|e| e.involves(player_id, role)) {
            sample_size += 1;

            if let Some(outcome) = event.in_play_outcome() {
                in_play.add(outcome);
            }

            let count = Count::new(event.balls, event.strikes);
            let count = count.is_live().then_some(count);

            if let Some(pitch_type) = event.pitch_type {
                mix.add(pitch_type);
                if let Some(count) = count {
                    mix_by_count.entry(count).or_default().add(pitch_type);
                }
            }

            let Some(outcome) = event.pitch_outcome() else {
                continue;
            };
            global.add(outcome);
            if let Some(pitch_type) = event.pitch_type {
                by_type.entry(pitch_type).or_default().add(outcome);
                if let Some(count) = count {
                    by_type_count.entry((pitch_type, count)).or_default().add(outcome);
                }
            }
        }

        let pitch_type_outcomes: BTreeMap<_, _> = by_type
            .into_iter()
            .filter_map(|(pt, tally)| tally.into_distribution().map(|d| (pt, d)))
            .collect();

        let mut count_pitch_outcomes: BTreeMap<PitchType, BTreeMap<Count, _>> = BTreeMap::new();
        for ((pitch_type, count), tally) in by_type_count {
            if let Some(dist) = tally.into_distribution() {
                count_pitch_outcomes.entry(pitch_type).or_default().insert(count, dist);
            }
        }

        let pitch_mix = match role {
            Role::Pitcher => {
                let overall = mix.into_distribution().unwrap_or_else(|| league.pitch_mix.clone());
                let by_count = Count::all_live()
                    .map(|count| {
                        let dist = mix_by_count
                            .remove(&count)
                            .and_then(Tally::into_distribution)
                            .unwrap_or_else(|| overall.clone());
                        (count, dist)
                    })
                    .collect();
                Some(PitchMix { overall, by_count })
            }
            Role::Batter => None,
        };

        Self {
            player_id,
            role,
            sample_size,
            in_play: in_play.into_distribution().unwrap_or_else(|| league.in_play.clone()),
            global_pitch_outcomes: global
                .into_distribution()
                .unwrap_or_else(|| league.pitch_outcomes.clone()),
            pitch_type_outcomes,
            count_pitch_outcomes,
            pitch_mix,
        }
    }

    /// Profile with no historical data behind it.
    pub fn league_average(player_id: PlayerId, role: Role, league: &LeagueAverages) -> Self {
        Self::build(player_id, role, std::iter::empty(), league)
    }

    pub fn count_outcomes(&self, pitch_type: PitchType, count: Count) -> Option<&Distribution<PitchOutcome>> {
        self.count_pitch_outcomes.get(&pitch_type)?.get(&count)
    }

    pub fn pitch_type_outcomes(&self, pitch_type: PitchType) -> Option<&Distribution<PitchOutcome>> {
        self.pitch_type_outcomes.get(&pitch_type)
    }

    pub fn is_empty_sample(&self) -> bool {
        self.sample_size == 0
    }

    /// Every stored distribution is non-empty and sums to one.
    pub fn is_normalized(&self) -> bool {
        let mix_ok = self.pitch_mix.as_ref().map_or(true, |mix| {
            mix.overall.is_normalized() && mix.by_count.values().all(Distribution::is_normalized)
        });
        self.in_play.is_normalized()
            && self.global_pitch_outcomes.is_normalized()
            && self.pitch_type_outcomes.values().all(Distribution::is_normalized)
            && self
                .count_pitch_outcomes
                .values()
                .flat_map(BTreeMap::values)
                .all(Distribution::is_normalized)
            && mix_ok
    }
}
