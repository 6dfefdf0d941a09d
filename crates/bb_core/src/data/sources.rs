//! Collaborator seams: where profiles, rosters and names come from.
//!
//! The engines never reach these directly. `MatchupBuilder` turns them into
//! an immutable [`Matchup`] before any at-bat is played.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::event_log::EventLog;
use crate::error::{ConfigurationError, Result, SourceError};
use crate::models::{LeagueAverages, Matchup, Player, PlayerId, PlayerProfile, Role, TeamSheet, TeamSide};

pub const UNKNOWN_PLAYER: &str = "Unknown Player";

/// Batting order plus starting pitcher, by id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RosterCard {
    pub batters: Vec<PlayerId>,
    pub pitcher: Option<PlayerId>,
}

impl RosterCard {
    pub fn with_pitcher(mut self, pitcher: PlayerId) -> Self {
        self.pitcher = Some(pitcher);
        self
    }
}

pub trait ProfileSource {
    fn profile(&self, player: PlayerId, role: Role, league: &LeagueAverages) -> Result<PlayerProfile>;
}

impl<T: ProfileSource + ?Sized> ProfileSource for &T {
    fn profile(&self, player: PlayerId, role: Role, league: &LeagueAverages) -> Result<PlayerProfile> {
        (**self).profile(player, role, league)
    }
}

/// Key-value store of computed profiles, one table per role.
pub trait ProfileCache {
    fn get(&self, role: Role, player: PlayerId) -> Result<Option<PlayerProfile>>;
    fn set(&self, role: Role, player: PlayerId, profile: &PlayerProfile) -> Result<()>;
}

pub trait RosterSource {
    fn roster(&self, team: &str, date: NaiveDate) -> Result<Option<RosterCard>>;
}

pub trait NameResolver {
    fn name(&self, player: PlayerId) -> Option<String>;

    fn display_name(&self, player: PlayerId) -> String {
        self.name(player).unwrap_or_else(|| UNKNOWN_PLAYER.to_string())
    }
}

impl NameResolver for HashMap<PlayerId, String> {
    fn name(&self, player: PlayerId) -> Option<String> {
        self.get(&player).cloned()
    }
}

/// Resolver that knows nobody.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameResolver for NoNames {
    fn name(&self, _player: PlayerId) -> Option<String> {
        None
    }
}

// ============================================================================
// Caching
// ============================================================================

/// In-process cache, mostly for tests and single runs.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<(Role, PlayerId), PlayerProfile>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        match self.entries.lock() {
            Ok(entries) => entries.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ProfileCache for MemoryCache {
    fn get(&self, role: Role, player: PlayerId) -> Result<Option<PlayerProfile>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| SourceError::Cache { player, role, message: "cache lock poisoned".into() })?;
        Ok(entries.get(&(role, player)).cloned())
    }

    fn set(&self, role: Role, player: PlayerId, profile: &PlayerProfile) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| SourceError::Cache { player, role, message: "cache lock poisoned".into() })?;
        entries.insert((role, player), profile.clone());
        Ok(())
    }
}

/// Get from `cache`, otherwise compute from `source` and store.
pub struct CachedProfiles<S, C> {
    source: S,
    cache: C,
}

impl<S: ProfileSource, C: ProfileCache> CachedProfiles<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

impl<S: ProfileSource, C: ProfileCache> ProfileSource for CachedProfiles<S, C> {
    fn profile(&self, player: PlayerId, role: Role, league: &LeagueAverages) -> Result<PlayerProfile> {
        if let Some(profile) = self.cache.get(role, player)? {
            log::debug!("profile cache hit: {role} {player}");
            return Ok(profile);
        }
        log::debug!("profile cache miss: {role} {player}");
        let profile = self.source.profile(player, role, league)?;
        self.cache.set(role, player, &profile)?;
        Ok(profile)
    }
}

// ============================================================================
// MatchupBuilder
// ============================================================================

/// Resolves roster cards into a [`Matchup`], loading every profile up front.
pub struct MatchupBuilder<'a, P, N> {
    profiles: &'a P,
    names: &'a N,
    league: &'a LeagueAverages,
}

impl<'a, P: ProfileSource, N: NameResolver> MatchupBuilder<'a, P, N> {
    pub fn new(profiles: &'a P, names: &'a N, league: &'a LeagueAverages) -> Self {
        Self { profiles, names, league }
    }

    fn player(&self, id: PlayerId, role: Role) -> Result<Arc<Player>> {
        let profile = self.profiles.profile(id, role, self.league)?;
        if profile.is_empty_sample() {
            log::warn!("{role} {id} has no history, using league averages");
        }
        Ok(Arc::new(Player::new(id, self.names.display_name(id), Arc::new(profile))))
    }

    pub fn team_sheet(&self, side: TeamSide, team: &str, card: &RosterCard) -> Result<TeamSheet> {
        if card.batters.is_empty() {
            return Err(ConfigurationError::MissingLineup { side, team: team.to_string() }.into());
        }
        let pitcher = card
            .pitcher
            .ok_or_else(|| ConfigurationError::MissingPitcher { side, team: team.to_string() })?;

        let lineup = card
            .batters
            .iter()
            .map(|id| self.player(*id, Role::Batter))
            .collect::<Result<Vec<_>>>()?;
        Ok(TeamSheet::new(team, lineup, self.player(pitcher, Role::Pitcher)?))
    }

    pub fn build(&self, home: (&str, &RosterCard), away: (&str, &RosterCard)) -> Result<Matchup> {
        let home = self.team_sheet(TeamSide::Home, home.0, home.1)?;
        let away = self.team_sheet(TeamSide::Away, away.0, away.1)?;
        let matchup = Matchup::new(home, away)?;
        log::info!("matchup ready: {}", matchup.title());
        Ok(matchup)
    }

    /// Replay a historical game: lineups as played on `date`.
    pub fn backtest<R: RosterSource>(&self, rosters: &R, home: &str, away: &str, date: NaiveDate) -> Result<Matchup> {
        let card = |side, team: &str| -> Result<RosterCard> {
            rosters
                .roster(team, date)?
                .ok_or_else(|| ConfigurationError::MissingLineup { side, team: team.to_string() }.into())
        };
        let home_card = card(TeamSide::Home, home)?;
        let away_card = card(TeamSide::Away, away)?;
        self.build((home, &home_card), (away, &away_card))
    }

    /// Project a game that has not been played: each team's most repeated
    /// lineup in `log`, with the named starters.
    pub fn predicted(
        &self,
        log: &EventLog,
        home: (&str, PlayerId),
        away: (&str, PlayerId),
    ) -> Result<Matchup> {
        let card = |side, (team, pitcher): (&str, PlayerId)| -> Result<RosterCard> {
            log.predicted_lineup(team)
                .map(|card| card.with_pitcher(pitcher))
                .ok_or_else(|| ConfigurationError::MissingLineup { side, team: team.to_string() }.into())
        };
        let home_card = card(TeamSide::Home, home)?;
        let away_card = card(TeamSide::Away, away)?;
        self.build((home.0, &home_card), (away.0, &away_card))
    }
}
