//! Base runners and advancement rules.

use std::sync::Arc;

use crate::models::{AtBatResult, InPlayOutcome, Player};

/// Runs and runner movement produced by one plate appearance.
#[derive(Debug, Clone, Default)]
pub struct Advance {
    pub runs: u32,
    /// Players who crossed the plate, in scoring order.
    pub scorers: Vec<Arc<Player>>,
    pub description: String,
}

/// Occupancy of first, second and third.
#[derive(Debug, Clone, Default)]
pub struct Bases {
    pub first: Option<Arc<Player>>,
    pub second: Option<Arc<Player>>,
    pub third: Option<Arc<Player>>,
}

impl Bases {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bases with a single runner placed on second.
    pub fn with_runner_on_second(runner: Arc<Player>) -> Self {
        Self { second: Some(runner), ..Self::default() }
    }

    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.second.is_none() && self.third.is_none()
    }

    pub fn runner_count(&self) -> usize {
        [&self.first, &self.second, &self.third].iter().filter(|r| r.is_some()).count()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply `result` with `batter` at the plate.
    pub fn advance(&mut self, result: AtBatResult, batter: &Arc<Player>) -> Advance {
        let mut notes = Notes::default();
        match result {
            AtBatResult::Strikeout | AtBatResult::InPlay(InPlayOutcome::FieldOut) => {}
            AtBatResult::Walk => self.walk(batter, &mut notes),
            AtBatResult::InPlay(InPlayOutcome::Single) => {
                notes.score(self.third.take());
                notes.moved(&self.second, "third");
                notes.moved(&self.first, "second");
                self.third = self.second.take();
                self.second = self.first.take();
                self.first = Some(Arc::clone(batter));
            }
            AtBatResult::InPlay(InPlayOutcome::Double) => {
                // The runner from second is credited with a run and also stays
                // on third; the runner from first leaves the bases.
                notes.score(self.third.take());
                notes.score(self.second.clone());
                notes.moved(&self.second, "third");
                self.third = self.second.take();
                self.second = Some(Arc::clone(batter));
                self.first = None;
            }
            AtBatResult::InPlay(InPlayOutcome::Triple) => {
                notes.score(self.third.take());
                notes.score(self.second.take());
                notes.score(self.first.take());
                self.third = Some(Arc::clone(batter));
            }
            AtBatResult::InPlay(InPlayOutcome::HomeRun) => {
                notes.score(self.third.take());
                notes.score(self.second.take());
                notes.score(self.first.take());
                notes.score(Some(Arc::clone(batter)));
            }
        }
        notes.finish()
    }

    /// Forced advancement only.
    fn walk(&mut self, batter: &Arc<Player>, notes: &mut Notes) {
        if self.first.is_none() {
            self.first = Some(Arc::clone(batter));
            return;
        }
        if self.second.is_none() {
            notes.moved(&self.first, "second");
            self.second = self.first.take();
        } else if self.third.is_none() {
            notes.moved(&self.second, "third");
            notes.moved(&self.first, "second");
            self.third = self.second.take();
            self.second = self.first.take();
        } else {
            notes.score(self.third.take());
            notes.moved(&self.second, "third");
            notes.moved(&self.first, "second");
            self.third = self.second.take();
            self.second = self.first.take();
        }
        self.first = Some(Arc::clone(batter));
    }
}

#[derive(Default)]
struct Notes {
    scorers: Vec<Arc<Player>>,
    parts: Vec<String>,
}

impl Notes {
    fn score(&mut self, runner: Option<Arc<Player>>) {
        if let Some(runner) = runner {
            self.parts.push(format!("{} scores", runner.name));
            self.scorers.push(runner);
        }
    }

    fn moved(&mut self, runner: &Option<Arc<Player>>, base: &str) {
        if let Some(runner) = runner {
            self.parts.push(format!("{} to {base}", runner.name));
        }
    }

    fn finish(self) -> Advance {
        Advance {
            runs: self.scorers.len() as u32,
            scorers: self.scorers,
            description: self.parts.join(", "),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LeagueAverages, PlayerId, PlayerProfile, Role};

    fn player(id: u32) -> Arc<Player> {
        let profile = PlayerProfile::league_average(PlayerId(id), Role::Batter, &LeagueAverages::default());
        Arc::new(Player::new(PlayerId(id), format!("R{id}"), Arc::new(profile)))
    }

    fn id(runner: &Option<Arc<Player>>) -> Option<u32> {
        runner.as_ref().map(|p| p.id.0)
    }

    fn loaded() -> Bases {
        Bases { first: Some(player(1)), second: Some(player(2)), third: Some(player(3)) }
    }

    #[test]
    fn test_walk_bases_loaded_forces_in_one_run() {
        let mut bases = loaded();
        let adv = bases.advance(AtBatResult::Walk, &player(9));
        assert_eq!(adv.runs, 1);
        assert_eq!(adv.scorers[0].id, PlayerId(3));
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (Some(9), Some(1), Some(2)));
        assert!(adv.description.contains("R3 scores"));
    }

    #[test]
    fn test_walk_only_forces() {
        let mut bases = Bases { third: Some(player(3)), ..Bases::new() };
        let adv = bases.advance(AtBatResult::Walk, &player(9));
        assert_eq!(adv.runs, 0);
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (Some(9), None, Some(3)));

        let mut bases = Bases { first: Some(player(1)), third: Some(player(3)), ..Bases::new() };
        bases.advance(AtBatResult::Walk, &player(9));
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (Some(9), Some(1), Some(3)));

        let mut bases = Bases { first: Some(player(1)), second: Some(player(2)), ..Bases::new() };
        bases.advance(AtBatResult::Walk, &player(9));
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (Some(9), Some(1), Some(2)));
    }

    #[test]
    fn test_home_run_bases_loaded_scores_four() {
        let mut bases = loaded();
        let adv = bases.advance(AtBatResult::HOME_RUN, &player(9));
        assert_eq!(adv.runs, 4);
        assert_eq!(adv.scorers.last().map(|p| p.id), Some(PlayerId(9)));
        assert!(bases.is_empty());
    }

    #[test]
    fn test_single_with_runner_on_second() {
        let mut bases = Bases::with_runner_on_second(player(2));
        let adv = bases.advance(AtBatResult::SINGLE, &player(9));
        assert_eq!(adv.runs, 0);
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (Some(9), None, Some(2)));
        assert_eq!(adv.description, "R2 to third");
    }

    #[test]
    fn test_single_scores_runner_from_third() {
        let mut bases = loaded();
        let adv = bases.advance(AtBatResult::SINGLE, &player(9));
        assert_eq!(adv.runs, 1);
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (Some(9), Some(1), Some(2)));
    }

    #[test]
    fn test_double_keeps_scoring_runner_on_third() {
        let mut bases = loaded();
        let adv = bases.advance(AtBatResult::DOUBLE, &player(9));
        assert_eq!(adv.runs, 2);
        assert_eq!(adv.scorers.iter().map(|p| p.id.0).collect::<Vec<_>>(), vec![3, 2]);
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (None, Some(9), Some(2)));
    }

    #[test]
    fn test_triple_clears_and_puts_batter_on_third() {
        let mut bases = loaded();
        let adv = bases.advance(AtBatResult::TRIPLE, &player(9));
        assert_eq!(adv.runs, 3);
        assert_eq!((id(&bases.first), id(&bases.second), id(&bases.third)), (None, None, Some(9)));
    }

    #[test]
    fn test_outs_leave_bases_alone() {
        for result in [AtBatResult::Strikeout, AtBatResult::FIELD_OUT] {
            let mut bases = loaded();
            let adv = bases.advance(result, &player(9));
            assert_eq!(adv.runs, 0);
            assert_eq!(bases.runner_count(), 3);
            assert!(adv.description.is_empty());
        }
    }
}
