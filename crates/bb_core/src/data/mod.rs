//! Historical data and the collaborator traits that feed the engines.

pub mod event_log;
pub mod events;
pub mod sources;

pub use event_log::{EventLog, PREDICTED_LINEUP_SLOTS};
pub use events::PitchEvent;
pub use sources::{
    CachedProfiles, MatchupBuilder, MemoryCache, NameResolver, NoNames, ProfileCache, ProfileSource,
    RosterCard, RosterSource, UNKNOWN_PLAYER,
};
