//! Profile Cache Library
//!
//! Events CSV → per-player probability profiles → MessagePack → LZ4, one file
//! per player and role, with a SHA-256 manifest checksum over the directory.
//! Also wires the CSV inputs into backtest matchups for the CLI.

pub mod events_csv;
pub mod names;
pub mod store;

use anyhow::{Context, Result};
use bb_core::data::{CachedProfiles, MatchupBuilder, NameResolver};
use bb_core::models::{LeagueAverages, Matchup, PlayerId, Role};
use bb_core::{EventLog, PitchEvent};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub use events_csv::{read_events_csv, ParseStats};
pub use names::NameDirectory;
pub use store::{CacheError, CachedProfile, ProfileStore, DEFAULT_SCHEMA_VERSION};

/// Summary of a built profile cache
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheMetadata {
    /// Schema version (e.g. "v1")
    pub schema_version: String,
    /// SHA256 manifest checksum (hex)
    pub checksum: String,
    /// RFC3339
    pub created_at: String,
    pub batters: u32,
    pub pitchers: u32,
    pub events_parsed: u32,
    pub events_failed: u32,
    /// MessagePack bytes before compression, all entries
    pub original_size: u64,
    pub compressed_size: u64,
    /// compressed / original
    pub compression_ratio: f64,
}

/// Build a profile cache for every batter and pitcher in `events_csv`,
/// using default league averages for fallbacks.
pub fn build_profile_cache(events_csv: &Path, out_dir: &Path, schema_version: &str) -> Result<CacheMetadata> {
    build_profile_cache_with_league(events_csv, out_dir, schema_version, &LeagueAverages::default())
}

pub fn build_profile_cache_with_league(
    events_csv: &Path,
    out_dir: &Path,
    schema_version: &str,
    league: &LeagueAverages,
) -> Result<CacheMetadata> {
    // 1. Read events
    let (events, stats) = read_events_csv(events_csv)?;
    if events.is_empty() {
        anyhow::bail!("no usable events in {}", events_csv.display());
    }

    // 2. Profiles, one file each
    let store = ProfileStore::new(out_dir, schema_version);
    let mut counts = [0u32; 2];
    let mut original_size = 0u64;
    let mut compressed_size = 0u64;

    for (slot, role) in [Role::Batter, Role::Pitcher].into_iter().enumerate() {
        for (player, rows) in group_by_player(&events, role) {
            let profile = bb_core::PlayerProfile::build(player, role, rows, league);
            let size = store
                .store(role, player, &profile)
                .with_context(|| format!("Failed to write {role} profile {player}"))?;
            original_size += size.original;
            compressed_size += size.compressed;
            counts[slot] += 1;
        }
    }

    // 3. Checksum over what landed on disk
    let checksum = manifest_checksum(&store)?;
    let compression_ratio = if original_size == 0 { 0.0 } else { compressed_size as f64 / original_size as f64 };

    log::info!(
        "profile cache built at {}: {} batters, {} pitchers",
        out_dir.display(),
        counts[0],
        counts[1]
    );

    Ok(CacheMetadata {
        schema_version: schema_version.to_string(),
        checksum,
        created_at: chrono::Utc::now().to_rfc3339(),
        batters: counts[0],
        pitchers: counts[1],
        events_parsed: stats.parsed,
        events_failed: stats.failed,
        original_size,
        compressed_size,
        compression_ratio,
    })
}

fn group_by_player(events: &[PitchEvent], role: Role) -> BTreeMap<PlayerId, Vec<&PitchEvent>> {
    let mut groups: BTreeMap<PlayerId, Vec<&PitchEvent>> = BTreeMap::new();
    for event in events {
        let player = match role {
            Role::Batter => event.batter,
            Role::Pitcher => event.pitcher,
        };
        groups.entry(player).or_default().push(event);
    }
    groups
}

/// SHA-256 over each entry's relative path and bytes, in sorted order.
pub fn manifest_checksum(store: &ProfileStore) -> Result<String> {
    let mut hasher = Sha256::new();
    for relative in store.entries()? {
        let path = store.root().join(&relative);
        let bytes = fs::read(&path).with_context(|| format!("Failed to read cache entry: {}", path.display()))?;
        hasher.update(relative.to_string_lossy().replace('\\', "/").as_bytes());
        hasher.update(&bytes);
    }
    Ok(format!("{:x}", hasher.finalize()))
}

/// Recompute the manifest checksum of `cache_dir` and compare.
pub fn verify_cache(cache_dir: &Path, expected_checksum: &str) -> Result<bool> {
    if !cache_dir.is_dir() {
        anyhow::bail!("Cache directory not found: {}", cache_dir.display());
    }
    let store = ProfileStore::new(cache_dir, DEFAULT_SCHEMA_VERSION);
    Ok(manifest_checksum(&store)? == expected_checksum)
}

/// Matchup replaying `home` vs `away` on `date`: lineups as played that day,
/// profiles from every other day. With a store, profiles are read from it
/// and missing ones computed and written back.
pub fn backtest_matchup<N: NameResolver>(
    log: &EventLog,
    store: Option<&ProfileStore>,
    names: &N,
    league: &LeagueAverages,
    home: &str,
    away: &str,
    date: NaiveDate,
) -> Result<Matchup> {
    let training = log.excluding_date(date);
    let matchup = match store {
        Some(store) => {
            let profiles = CachedProfiles::new(training, store.clone());
            MatchupBuilder::new(&profiles, names, league).backtest(log, home, away, date)
        }
        None => MatchupBuilder::new(&training, names, league).backtest(log, home, away, date),
    };
    matchup.with_context(|| format!("Failed to set up {away} @ {home} on {date}"))
}

/// Matchup for a game the log does not contain: each team's most repeated
/// lineup, with the named starting pitchers. Profiles come from the whole log.
pub fn predicted_matchup<N: NameResolver>(
    log: &EventLog,
    store: Option<&ProfileStore>,
    names: &N,
    league: &LeagueAverages,
    home: (&str, PlayerId),
    away: (&str, PlayerId),
) -> Result<Matchup> {
    let matchup = match store {
        Some(store) => {
            let profiles = CachedProfiles::new(log, store.clone());
            MatchupBuilder::new(&profiles, names, league).predicted(log, home, away)
        }
        None => MatchupBuilder::new(log, names, league).predicted(log, home, away),
    };
    matchup.with_context(|| format!("Failed to predict {} @ {}", away.0, home.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bb_core::data::NoNames;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    const HEADER: &str =
        "game_date,pitcher,batter,home_team,away_team,inning_topbot,pitch_type,balls,strikes,description,events,at_bat_number";

    /// Two games, NYY hosting BOS. NYY pitcher 10, BOS pitcher 20.
    fn events_file() -> Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{HEADER}")?;
        for date in ["2024-04-01", "2024-04-02"] {
            let mut at_bat = 0;
            for i in 0..9u32 {
                at_bat += 1;
                writeln!(file, "{date},10,{},NYY,BOS,Top,FF,0,0,ball,,{at_bat}", 200 + i)?;
                writeln!(file, "{date},10,{},NYY,BOS,Top,SL,1,0,hit_into_play,field_out,{at_bat}", 200 + i)?;
                at_bat += 1;
                writeln!(file, "{date},20,{},NYY,BOS,Bot,CH,0,0,foul,,{at_bat}", 100 + i)?;
                writeln!(file, "{date},20,{},NYY,BOS,Bot,FF,0,1,hit_into_play,single,{at_bat}", 100 + i)?;
            }
        }
        writeln!(file, "garbage,row")?;
        Ok(file)
    }

    #[test]
    fn test_build_and_verify_cache() -> Result<()> {
        let events = events_file()?;
        let out = TempDir::new()?;

        let metadata = build_profile_cache(events.path(), out.path(), "v1")?;
        assert_eq!(metadata.schema_version, "v1");
        assert_eq!(metadata.batters, 18);
        assert_eq!(metadata.pitchers, 2);
        assert_eq!(metadata.events_parsed, 72);
        assert_eq!(metadata.events_failed, 1);
        assert!(metadata.compressed_size > 0);
        assert!(verify_cache(out.path(), &metadata.checksum)?);

        let store = ProfileStore::new(out.path(), "v1");
        let pitcher = store.load(Role::Pitcher, PlayerId(10))?.expect("pitcher cached");
        assert_eq!(pitcher.sample_size, 36);
        assert!(pitcher.pitch_mix.is_some());
        Ok(())
    }

    #[test]
    fn test_checksum_changes_with_contents() -> Result<()> {
        let events = events_file()?;
        let out = TempDir::new()?;
        let metadata = build_profile_cache(events.path(), out.path(), "v1")?;

        let store = ProfileStore::new(out.path(), "v1");
        let league = LeagueAverages::default();
        store.store(Role::Batter, PlayerId(999), &bb_core::PlayerProfile::league_average(PlayerId(999), Role::Batter, &league))?;
        assert!(!verify_cache(out.path(), &metadata.checksum)?);
        Ok(())
    }

    #[test]
    fn test_verify_missing_directory_errors() {
        assert!(verify_cache(Path::new("/definitely/not/a/cache"), "00").is_err());
    }

    #[test]
    fn test_backtest_matchup_with_store() -> Result<()> {
        let events = events_file()?;
        let (rows, _) = read_events_csv(events.path())?;
        let log = EventLog::new(rows);
        let store_dir = TempDir::new()?;
        let store = ProfileStore::new(store_dir.path(), "v1");
        let league = LeagueAverages::default();
        let date = NaiveDate::from_ymd_opt(2024, 4, 2).unwrap();

        let matchup = backtest_matchup(&log, Some(&store), &NoNames, &league, "NYY", "BOS", date)?;
        assert_eq!(matchup.home.lineup.len(), 9);
        assert_eq!(matchup.home.pitcher.id, PlayerId(10));
        assert_eq!(matchup.away.pitcher.id, PlayerId(20));
        // Every profile was written back.
        assert_eq!(store.entries()?.len(), 20);

        let again = backtest_matchup(&log, Some(&store), &NoNames, &league, "NYY", "BOS", date)?;
        assert_eq!(again.home.pitcher.profile, matchup.home.pitcher.profile);

        let err = backtest_matchup(&log, None, &NoNames, &league, "NYY", "TOR", date).unwrap_err();
        assert!(err.to_string().contains("TOR @ NYY"));
        Ok(())
    }

    #[test]
    fn test_predicted_matchup_with_named_starters() -> Result<()> {
        let events = events_file()?;
        let (rows, _) = read_events_csv(events.path())?;
        let log = EventLog::new(rows);
        let store_dir = TempDir::new()?;
        let store = ProfileStore::new(store_dir.path(), "v1");
        let league = LeagueAverages::default();

        let matchup = predicted_matchup(&log, Some(&store), &NoNames, &league, ("NYY", PlayerId(10)), ("BOS", PlayerId(20)))?;
        assert_eq!(matchup.home.lineup.len(), 9);
        assert_eq!(matchup.home.lineup[0].id, PlayerId(100));
        assert_eq!(matchup.away.lineup[0].id, PlayerId(200));
        assert_eq!(matchup.home.pitcher.id, PlayerId(10));
        assert_eq!(matchup.home.pitcher.profile.sample_size, 36);
        assert_eq!(store.entries()?.len(), 20);

        let err = predicted_matchup(&log, None, &NoNames, &league, ("NYY", PlayerId(10)), ("TOR", PlayerId(20))).unwrap_err();
        assert!(err.to_string().contains("TOR @ NYY"));
        Ok(())
    }
}
