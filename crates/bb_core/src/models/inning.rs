use serde::{Deserialize, Serialize};
use std::fmt;

use super::player::TeamSide;

/// Half of an inning. Serialized with the `Top` / `Bot` labels used by the
/// event data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Half {
    #[default]
    Top,
    #[serde(rename = "Bot", alias = "Bottom")]
    Bottom,
}

impl Half {
    /// Away bats in the top, home in the bottom.
    pub fn batting_side(&self) -> TeamSide {
        match self {
            Half::Top => TeamSide::Away,
            Half::Bottom => TeamSide::Home,
        }
    }

    pub fn fielding_side(&self) -> TeamSide {
        self.batting_side().opponent()
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Half::Top => f.write_str("Top"),
            Half::Bottom => f.write_str("Bottom"),
        }
    }
}
