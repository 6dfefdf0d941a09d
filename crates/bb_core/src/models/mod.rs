pub mod count;
pub mod distribution;
pub mod inning;
pub mod league;
pub mod matchup;
pub mod outcome;
pub mod player;
pub mod profile;
pub mod stats;

pub use count::{Count, InvalidCount, BALLS_FOR_WALK, STRIKES_FOR_STRIKEOUT};
pub use distribution::{Distribution, Tally, NORMALIZATION_TOLERANCE};
pub use inning::Half;
pub use league::LeagueAverages;
pub use matchup::Matchup;
pub use outcome::{AtBatResult, InPlayOutcome, InvalidPitchType, PitchOutcome, PitchType};
pub use player::{Player, PlayerId, Role, TeamSheet, TeamSide};
pub use profile::{PitchMix, PlayerProfile};
pub use stats::{BattingLine, PitchingLine, PlayerLine, StatBook};
