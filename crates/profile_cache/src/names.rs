//! Player name lookup loaded from CSV.
//!
//! Accepts either an `id,name` file or a register-style file with
//! `key_mlbam,name_first,name_last` columns.

use anyhow::{bail, Context, Result};
use bb_core::data::NameResolver;
use bb_core::PlayerId;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

const ID_COLUMNS: [&str; 3] = ["id", "key_mlbam", "player_id"];

#[derive(Debug, Clone, Default)]
pub struct NameDirectory {
    names: HashMap<PlayerId, String>,
}

#[derive(Clone, Copy)]
enum NameColumns {
    Full(usize),
    Split { first: usize, last: usize },
}

impl NameDirectory {
    pub fn load(path: &Path) -> Result<Self> {
        let reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("Failed to open names CSV: {}", path.display()))?;
        let directory = Self::from_reader(reader)?;
        log::info!("loaded {} player names from {}", directory.len(), path.display());
        Ok(directory)
    }

    pub fn from_reader<R: Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers().context("Failed to read names header")?.clone();
        let column = |name: &str| headers.iter().position(|h| h.trim() == name);

        let Some(id) = ID_COLUMNS.iter().find_map(|c| column(*c)) else {
            bail!("names CSV needs one of the columns {:?}", ID_COLUMNS);
        };
        let columns = match (column("name"), column("name_first"), column("name_last")) {
            (Some(full), _, _) => NameColumns::Full(full),
            (None, Some(first), Some(last)) => NameColumns::Split { first, last },
            _ => bail!("names CSV needs a `name` column or `name_first` and `name_last`"),
        };

        let mut names = HashMap::new();
        for (row, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read names row {}", row + 1))?;
            let Some(Ok(player)) = record.get(id).map(|v| v.trim().parse::<u32>()) else {
                log::warn!("skipping names row {}: bad player id", row + 1);
                continue;
            };
            let name = match columns {
                NameColumns::Full(full) => record.get(full).unwrap_or_default().trim().to_string(),
                NameColumns::Split { first, last } => format!(
                    "{} {}",
                    record.get(first).unwrap_or_default().trim(),
                    record.get(last).unwrap_or_default().trim()
                )
                .trim()
                .to_string(),
            };
            if !name.is_empty() {
                names.insert(PlayerId(player), name);
            }
        }
        Ok(Self { names })
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl NameResolver for NameDirectory {
    fn name(&self, player: PlayerId) -> Option<String> {
        self.names.get(&player).cloned()
    }
}
