//! Profile Cache CLI
//!
//! Events CSV → profile cache builder, plus backtest simulation of a
//! historical matchup, or of a predicted one when the events hold no game
//! on the requested date (bootstrap or a single narrated game).

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Args, Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "profile_cache")]
#[command(about = "Build player profile caches and simulate historical matchups", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Build a profile cache from an events CSV
    Build {
        /// Input events CSV (Statcast columns)
        #[arg(long)]
        events: PathBuf,

        /// Output cache directory
        #[arg(long)]
        out: PathBuf,

        /// Schema version (e.g., "v1")
        #[arg(long, default_value = profile_cache::DEFAULT_SCHEMA_VERSION)]
        schema_version: String,

        /// Simulation config whose league averages back the fallbacks
        #[arg(long)]
        config: Option<PathBuf>,

        /// Verify cache after building
        #[arg(long, default_value = "false")]
        verify: bool,

        /// Output metadata JSON file
        #[arg(long)]
        metadata: Option<PathBuf>,
    },

    /// Check a cache directory against a checksum
    Verify {
        #[arg(long)]
        dir: PathBuf,

        #[arg(long)]
        checksum: String,
    },

    /// Replay a historical matchup many times and report win rates
    Simulate {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// Number of games
        #[arg(long, default_value_t = 1000)]
        games: u32,

        /// Run games on one thread
        #[arg(long, default_value = "false")]
        sequential: bool,

        /// Output report JSON file
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Play one game of a historical matchup and print the play-by-play
    Game {
        #[command(flatten)]
        matchup: MatchupArgs,

        /// 1 = summary, 2 = plate appearances, 3 = pitches
        #[arg(long, default_value_t = 2)]
        verbosity: u8,
    },
}

#[cfg(feature = "cli")]
#[derive(Args)]
struct MatchupArgs {
    /// Input events CSV (Statcast columns)
    #[arg(long)]
    events: PathBuf,

    /// Home team code
    #[arg(long)]
    home: String,

    /// Away team code
    #[arg(long)]
    away: String,

    /// Game date to replay (YYYY-MM-DD)
    #[arg(long)]
    date: chrono::NaiveDate,

    /// Home starting pitcher id, for a date the events do not cover
    #[arg(long, requires = "away_pitcher")]
    home_pitcher: Option<u32>,

    /// Away starting pitcher id, for a date the events do not cover
    #[arg(long, requires = "home_pitcher")]
    away_pitcher: Option<u32>,

    /// Profile cache directory (read, and filled on misses)
    #[arg(long)]
    cache: Option<PathBuf>,

    /// Schema version of the cache
    #[arg(long, default_value = profile_cache::DEFAULT_SCHEMA_VERSION)]
    schema_version: String,

    /// Player names CSV
    #[arg(long)]
    names: Option<PathBuf>,

    /// Random seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Simulation config (JSON or YAML); falls back to BB_SIM_CONFIG_PATH
    #[arg(long)]
    config: Option<PathBuf>,
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { events, out, schema_version, config, verify, metadata } => {
            println!("🔨 Profiling {} into {} ({schema_version})", events.display(), out.display());

            let config = bb_core::SimulationConfig::resolve(config.as_deref())?;
            let meta = profile_cache::build_profile_cache_with_league(&events, &out, &schema_version, &config.league)?;

            print_metadata(&meta);

            if verify {
                check_manifest(&out, &meta.checksum)?;
            }

            if let Some(metadata_path) = metadata {
                write_json(&metadata_path, &meta, "Metadata")?;
            }
        }

        Commands::Verify { dir, checksum } => {
            check_manifest(&dir, &checksum)?;
        }

        Commands::Simulate { matchup, games, sequential, report } => {
            let config = bb_core::SimulationConfig::resolve(matchup.config.as_deref())?;
            let game = load_matchup(&matchup, &config)?;
            println!("⚾ {} on {}, {} games, seed {}", game.title(), matchup.date, games, matchup.seed);

            let mode = if sequential {
                bb_core::engine::ExecutionMode::Sequential
            } else {
                bb_core::engine::ExecutionMode::Parallel
            };
            let result = bb_core::BootstrapRunner::new(&config).mode(mode).run(&game, games, matchup.seed)?;

            print_report(&result);

            if let Some(report_path) = report {
                write_json(&report_path, &result, "Report")?;
            }
        }

        Commands::Game { matchup, verbosity } => {
            let config = bb_core::SimulationConfig::resolve(matchup.config.as_deref())?.with_verbosity(verbosity);
            let game = load_matchup(&matchup, &config)?;

            let mut log = bb_core::engine::GameLog::new(config.verbosity);
            let mut rng = bb_core::engine::game_rng(matchup.seed, 0);
            let result = bb_core::GameEngine::new(&config).play(&game, &mut rng, &mut log)?;

            print!("{}", log.to_text());
            println!(
                "\n{} {}, {} {} ({} innings{})",
                game.away.name,
                result.away_score,
                game.home.name,
                result.home_score,
                result.innings,
                if result.walk_off { ", walk-off" } else { "" }
            );
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
fn load_matchup(args: &MatchupArgs, config: &bb_core::SimulationConfig) -> Result<bb_core::Matchup> {
    let (events, stats) = profile_cache::read_events_csv(&args.events)?;
    if stats.failed > 0 {
        println!("⚠️  {} of {} event rows skipped", stats.failed, stats.total_rows);
    }
    let log = bb_core::EventLog::new(events);
    let store = args
        .cache
        .as_ref()
        .map(|dir| profile_cache::ProfileStore::new(dir, &args.schema_version));
    let names = match &args.names {
        Some(path) => profile_cache::NameDirectory::load(path)?,
        None => profile_cache::NameDirectory::default(),
    };

    let played = log.game_lineup(&args.home, args.date).is_some();
    match (played, args.home_pitcher, args.away_pitcher) {
        (false, Some(home_pitcher), Some(away_pitcher)) => {
            println!("🔮 No {} game on {}, predicting lineups", args.home, args.date);
            profile_cache::predicted_matchup(
                &log,
                store.as_ref(),
                &names,
                &config.league,
                (&args.home, bb_core::PlayerId(home_pitcher)),
                (&args.away, bb_core::PlayerId(away_pitcher)),
            )
        }
        _ => profile_cache::backtest_matchup(
            &log,
            store.as_ref(),
            &names,
            &config.league,
            &args.home,
            &args.away,
            args.date,
        ),
    }
}

#[cfg(feature = "cli")]
fn print_report(report: &bb_core::BootstrapReport) {
    println!("\n✅ {}", report.summary());
    println!(
        "   Extra innings:   {} games ({} walk-offs)",
        report.extra_inning_games, report.walk_offs
    );
    match report.favorite() {
        Some(side) => println!("   Favorite:        {}", match side {
            bb_core::TeamSide::Home => &report.home_team,
            bb_core::TeamSide::Away => &report.away_team,
        }),
        None => println!("   Favorite:        none"),
    }
}

#[cfg(feature = "cli")]
fn print_metadata(meta: &profile_cache::CacheMetadata) {
    println!("\n✅ {} batter and {} pitcher profiles", meta.batters, meta.pitchers);
    if meta.events_failed > 0 {
        println!("⚠️  {} of {} event rows skipped", meta.events_failed, meta.events_parsed + meta.events_failed);
    }
    println!(
        "   Profiles: {} → {} bytes ({:.0}% after LZ4)",
        meta.original_size,
        meta.compressed_size,
        meta.compression_ratio * 100.0
    );
    println!("   Manifest: {} ({})", meta.checksum, meta.schema_version);
}

#[cfg(feature = "cli")]
fn check_manifest(cache_dir: &Path, checksum: &str) -> Result<()> {
    if !profile_cache::verify_cache(cache_dir, checksum)? {
        anyhow::bail!("profile cache {} does not match manifest {checksum}", cache_dir.display());
    }
    println!("🔍 Manifest matches {}", cache_dir.display());
    Ok(())
}

#[cfg(feature = "cli")]
fn write_json<T: serde::Serialize>(path: &Path, value: &T, what: &str) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    std::fs::write(path, json).with_context(|| format!("Failed to write {what}: {}", path.display()))?;
    println!("📄 {what} saved to {}", path.display());
    Ok(())
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("profile_cache was built without the `cli` feature");
    std::process::exit(1);
}
