//! Directory-backed profile cache.
//!
//! Layout: `<root>/<role>/<player_id>.msgpack.lz4`. Each file is a
//! size-prepended LZ4 block of a named-field MessagePack `CachedProfile`.

use bb_core::data::ProfileCache;
use bb_core::models::{PlayerId, PlayerProfile, Role};
use bb_core::SourceError;
use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_SCHEMA_VERSION: &str = "v1";
pub const ENTRY_EXTENSION: &str = "msgpack.lz4";

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] rmp_serde::encode::Error),

    #[error("Deserialization error: {0}")]
    Deserialization(#[from] rmp_serde::decode::Error),

    #[error("Decompression error: {0}")]
    Decompression(#[from] lz4_flex::block::DecompressError),

    #[error("Schema mismatch: found {found}, expected {expected}")]
    SchemaMismatch { found: String, expected: String },
}

impl CacheError {
    /// Whether recomputing the profile from events fixes the problem.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            CacheError::SchemaMismatch { .. } | CacheError::Deserialization(_) | CacheError::Decompression(_)
        )
    }
}

/// One cache entry as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedProfile {
    pub schema_version: String,
    /// RFC3339
    pub created_at: String,
    pub profile: PlayerProfile,
}

impl CachedProfile {
    pub fn new(schema_version: &str, profile: PlayerProfile) -> Self {
        Self {
            schema_version: schema_version.to_string(),
            created_at: chrono::Utc::now().to_rfc3339(),
            profile,
        }
    }
}

/// MessagePack then LZ4. Returns `(msgpack_len, compressed)`.
pub fn encode_entry(entry: &CachedProfile) -> Result<(usize, Vec<u8>), CacheError> {
    let msgpack = to_vec_named(entry)?;
    Ok((msgpack.len(), compress_prepend_size(&msgpack)))
}

pub fn decode_entry(bytes: &[u8]) -> Result<CachedProfile, CacheError> {
    let msgpack = decompress_size_prepended(bytes)?;
    Ok(from_slice(&msgpack)?)
}

/// Sizes of one written entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntrySize {
    pub original: u64,
    pub compressed: u64,
}

#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
    schema_version: String,
}

impl ProfileStore {
    /// Store rooted at `root`; directories are created on first write.
    pub fn new(root: impl Into<PathBuf>, schema_version: &str) -> Self {
        Self { root: root.into(), schema_version: schema_version.to_string() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn schema_version(&self) -> &str {
        &self.schema_version
    }

    pub fn entry_path(&self, role: Role, player: PlayerId) -> PathBuf {
        self.root.join(role.as_str()).join(format!("{player}.{ENTRY_EXTENSION}"))
    }

    /// `Ok(None)` when there is no entry or it was written under another
    /// schema version.
    pub fn load(&self, role: Role, player: PlayerId) -> Result<Option<PlayerProfile>, CacheError> {
        let path = self.entry_path(role, player);
        let bytes = match fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        let entry = decode_entry(&bytes)?;
        if entry.schema_version != self.schema_version {
            log::warn!(
                "stale cache entry {}: schema {} (expected {})",
                path.display(),
                entry.schema_version,
                self.schema_version
            );
            return Ok(None);
        }
        Ok(Some(entry.profile))
    }

    pub fn store(&self, role: Role, player: PlayerId, profile: &PlayerProfile) -> Result<EntrySize, CacheError> {
        let path = self.entry_path(role, player);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let (original, compressed) = encode_entry(&CachedProfile::new(&self.schema_version, profile.clone()))?;
        fs::write(&path, &compressed)?;
        Ok(EntrySize { original: original as u64, compressed: compressed.len() as u64 })
    }

    /// Entry files relative to the root, sorted, for checksumming.
    pub fn entries(&self) -> Result<Vec<PathBuf>, CacheError> {
        let mut entries = Vec::new();
        for role in [Role::Batter, Role::Pitcher] {
            let dir = self.root.join(role.as_str());
            let read = match fs::read_dir(&dir) {
                Ok(read) => read,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            for item in read {
                let name = item?.file_name();
                let name = name.to_string_lossy();
                if name.ends_with(ENTRY_EXTENSION) {
                    entries.push(Path::new(role.as_str()).join(name.as_ref()));
                }
            }
        }
        entries.sort();
        Ok(entries)
    }
}

impl ProfileCache for ProfileStore {
    fn get(&self, role: Role, player: PlayerId) -> bb_core::Result<Option<PlayerProfile>> {
        match self.load(role, player) {
            Ok(found) => Ok(found),
            Err(e) if e.is_recoverable() => {
                log::warn!("unreadable cache entry for {role} {player}: {e}");
                Ok(None)
            }
            Err(e) => Err(SourceError::Cache { player, role, message: e.to_string() }.into()),
        }
    }

    fn set(&self, role: Role, player: PlayerId, profile: &PlayerProfile) -> bb_core::Result<()> {
        self.store(role, player, profile)
            .map(|_| ())
            .map_err(|e| SourceError::Cache { player, role, message: e.to_string() }.into())
    }
}
