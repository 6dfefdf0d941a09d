//! In-memory historical event log: profile construction, backtest filtering
//! and lineup selection.

use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet};

use super::events::PitchEvent;
use super::sources::{ProfileSource, RosterCard, RosterSource};
use crate::error::{ConfigurationError, Result};
use crate::models::{LeagueAverages, PlayerId, PlayerProfile, Role};

/// Batting-order slots considered when predicting a lineup.
pub const PREDICTED_LINEUP_SLOTS: usize = 9;

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<PitchEvent>,
}

impl From<Vec<PitchEvent>> for EventLog {
    fn from(events: Vec<PitchEvent>) -> Self {
        Self { events }
    }
}

impl FromIterator<PitchEvent> for EventLog {
    fn from_iter<I: IntoIterator<Item = PitchEvent>>(iter: I) -> Self {
        Self { events: iter.into_iter().collect() }
    }
}

impl EventLog {
    pub fn new(events: Vec<PitchEvent>) -> Self {
        Self { events }
    }

    pub fn events(&self) -> &[PitchEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Every player seen in `role`.
    pub fn players(&self, role: Role) -> BTreeSet<PlayerId> {
        self.events
            .iter()
            .map(|e| match role {
                Role::Batter => e.batter,
                Role::Pitcher => e.pitcher,
            })
            .collect()
    }

    /// Build a profile from every row involving `player` in `role`.
    pub fn profile(&self, player: PlayerId, role: Role, league: &LeagueAverages) -> PlayerProfile {
        PlayerProfile::build(player, role, &self.events, league)
    }

    /// Copy of the log without `date`, so a replayed game cannot inform its
    /// own profiles.
    pub fn excluding_date(&self, date: NaiveDate) -> EventLog {
        self.events.iter().filter(|e| e.game_date != date).cloned().collect()
    }

    fn batting_rows<'a>(&'a self, team: &'a str) -> impl Iterator<Item = &'a PitchEvent> + 'a {
        self.events.iter().filter(move |e| e.batting_team() == Some(team))
    }

    /// Batting order of one game: hitters in order of their first plate
    /// appearance. Empty when the team did not bat that day.
    fn batting_order(&self, team: &str, date: NaiveDate) -> Vec<PlayerId> {
        let mut first_seen: BTreeMap<PlayerId, u32> = BTreeMap::new();
        for event in self.batting_rows(team).filter(|e| e.game_date == date) {
            let at_bat = first_seen.entry(event.batter).or_insert(event.at_bat_number);
            *at_bat = (*at_bat).min(event.at_bat_number);
        }
        let mut order: Vec<_> = first_seen.into_iter().collect();
        order.sort_by_key(|&(player, at_bat)| (at_bat, player));
        order.into_iter().map(|(player, _)| player).collect()
    }

    /// Lineup and starting pitcher `team` actually used on `date`.
    pub fn game_lineup(&self, team: &str, date: NaiveDate) -> Option<RosterCard> {
        let batters = self.batting_order(team, date);
        if batters.is_empty() {
            return None;
        }
        let pitcher = self
            .events
            .iter()
            .filter(|e| e.game_date == date && e.fielding_team() == Some(team))
            .min_by_key(|e| e.at_bat_number)
            .map(|e| e.pitcher);
        Some(RosterCard { batters, pitcher })
    }

    /// Most frequently repeated top-of-the-order across `team`'s games. Ties
    /// go to the order whose first use is most recent. The pitcher is left
    /// for the caller.
    pub fn predicted_lineup(&self, team: &str) -> Option<RosterCard> {
        let dates: BTreeSet<NaiveDate> = self.batting_rows(team).map(|e| e.game_date).collect();

        let mut seen: Vec<(Vec<PlayerId>, usize, NaiveDate)> = Vec::new();
        for date in dates {
            let mut order = self.batting_order(team, date);
            order.truncate(PREDICTED_LINEUP_SLOTS);
            match seen.iter_mut().find(|(o, _, _)| *o == order) {
                Some((_, count, _)) => *count += 1,
                None => seen.push((order, 1, date)),
            }
        }

        let (batters, count, first_used) = seen.into_iter().max_by_key(|(_, count, first)| (*count, *first))?;
        log::debug!("predicted {team} lineup used {count} time(s), first on {first_used}");
        Some(RosterCard { batters, pitcher: None })
    }
}

impl ProfileSource for EventLog {
    fn profile(&self, player: PlayerId, role: Role, league: &LeagueAverages) -> Result<PlayerProfile> {
        if self.events.is_empty() {
            return Err(ConfigurationError::NoHistoricalData.into());
        }
        Ok(EventLog::profile(self, player, role, league))
    }
}

impl RosterSource for EventLog {
    fn roster(&self, team: &str, date: NaiveDate) -> Result<Option<RosterCard>> {
        Ok(self.game_lineup(team, date))
    }
}
