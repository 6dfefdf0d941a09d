//! Matchup - both teams' lineups and starting pitchers.
//!
//! Built once before a simulation and referenced read-only by every game,
//! including games running concurrently during a bootstrap.

use std::sync::Arc;

use super::player::{Player, TeamSheet, TeamSide};
use crate::error::ConfigurationError;

#[derive(Debug, Clone)]
pub struct Matchup {
    pub home: TeamSheet,
    pub away: TeamSheet,
}

impl Matchup {
    /// Both sheets must carry at least one batter.
    pub fn new(home: TeamSheet, away: TeamSheet) -> Result<Self, ConfigurationError> {
        let matchup = Self { home, away };
        matchup.validate()?;
        Ok(matchup)
    }

    /// The sheets are public, so a lineup can be emptied after `new`.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for side in [TeamSide::Home, TeamSide::Away] {
            let sheet = self.team(side);
            if sheet.lineup.is_empty() {
                return Err(ConfigurationError::MissingLineup { side, team: sheet.name.clone() });
            }
        }
        Ok(())
    }

    pub fn team(&self, side: TeamSide) -> &TeamSheet {
        match side {
            TeamSide::Home => &self.home,
            TeamSide::Away => &self.away,
        }
    }

    /// Every distinct player in the matchup, home side first.
    pub fn players(&self) -> impl Iterator<Item = &Arc<Player>> {
        self.home
            .lineup
            .iter()
            .chain(std::iter::once(&self.home.pitcher))
            .chain(self.away.lineup.iter())
            .chain(std::iter::once(&self.away.pitcher))
    }

    pub fn title(&self) -> String {
        format!("{} @ {}", self.away.name, self.home.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeagueAverages, PlayerId, PlayerProfile, Role};

    fn player(id: u32, role: Role) -> Arc<Player> {
        let profile = PlayerProfile::league_average(PlayerId(id), role, &LeagueAverages::default());
        Arc::new(Player::new(PlayerId(id), format!("P{id}"), Arc::new(profile)))
    }

    fn sheet(name: &str, base: u32, batters: u32) -> TeamSheet {
        let lineup = (0..batters).map(|i| player(base + i, Role::Batter)).collect();
        TeamSheet::new(name, lineup, player(base + 100, Role::Pitcher))
    }

    #[test]
    fn test_empty_lineup_rejected_with_side_and_team() {
        let err = Matchup::new(sheet("NYY", 0, 9), sheet("BOS", 200, 0)).unwrap_err();
        assert_eq!(err, ConfigurationError::MissingLineup { side: TeamSide::Away, team: "BOS".into() });
        assert!(err.to_string().contains("away team BOS"));
    }

    #[test]
    fn test_validate_catches_lineup_cleared_after_new() {
        let mut matchup = Matchup::new(sheet("NYY", 0, 9), sheet("BOS", 200, 9)).unwrap();
        assert!(matchup.validate().is_ok());
        matchup.home.lineup.clear();
        assert_eq!(
            matchup.validate().unwrap_err(),
            ConfigurationError::MissingLineup { side: TeamSide::Home, team: "NYY".into() }
        );
    }

    #[test]
    fn test_team_lookup_and_players() {
        let matchup = Matchup::new(sheet("NYY", 0, 9), sheet("BOS", 200, 9)).unwrap();
        assert_eq!(matchup.team(TeamSide::Home).name, "NYY");
        assert_eq!(matchup.team(TeamSide::Away).name, "BOS");
        assert_eq!(matchup.players().count(), 20);
        assert_eq!(matchup.title(), "BOS @ NYY");
    }
}
