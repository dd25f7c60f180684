use super::error::SaveError;
use super::SNAPSHOT_VERSION;
use crate::config::LeagueConfig;
use crate::store::{LeagueStore, MemoryStore};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use lz4_flex::{compress_prepend_size, decompress_size_prepended};
use rmp_serde::{from_slice, to_vec_named};
use sha2::{Digest, Sha256};
use time::OffsetDateTime;

/// Everything needed to resume a league.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LeagueSnapshot {
    pub version: u32,

    /// Milliseconds since the Unix epoch
    pub timestamp: u64,

    pub config: LeagueConfig,

    /// Seed for the random stream after loading
    pub rng_seed: u64,

    pub store: MemoryStore,
}

impl LeagueSnapshot {
    pub fn new(config: LeagueConfig, store: MemoryStore, rng_seed: u64) -> Self {
        Self { version: SNAPSHOT_VERSION, timestamp: current_timestamp(), config, rng_seed, store }
    }

    pub fn validate(&self) -> Result<(), SaveError> {
        if self.config.validate().is_err() {
            return Err(SaveError::Corrupted);
        }

        // Every rostered player must point at an existing team.
        let tids: HashSet<_> = self.store.teams().iter().map(|t| t.tid).collect();
        if self.store.players().iter().filter_map(|p| p.tid()).any(|tid| !tids.contains(&tid)) {
            return Err(SaveError::Corrupted);
        }

        let attributes = self.store.attributes();
        if self.store.players().iter().any(|p| p.pid >= attributes.next_pid) {
            return Err(SaveError::Corrupted);
        }

        Ok(())
    }
}

/// Serialize, compress and checksum a snapshot.
pub fn serialize_and_compress(snapshot: &LeagueSnapshot) -> Result<Vec<u8>, SaveError> {
    snapshot.validate()?;

    let msgpack = to_vec_named(snapshot).map_err(SaveError::Serialization)?;

    // Size prepended so decompression needs no side channel
    let compressed = compress_prepend_size(&msgpack);

    let mut hasher = Sha256::new();
    hasher.update(&compressed);
    let checksum = hasher.finalize();

    let mut result = compressed;
    result.extend_from_slice(&checksum);

    Ok(result)
}

pub fn decompress_and_deserialize(bytes: &[u8]) -> Result<LeagueSnapshot, SaveError> {
    // Size header + checksum
    if bytes.len() < 4 + 32 {
        return Err(SaveError::Corrupted);
    }

    let (payload, checksum_bytes) = bytes.split_at(bytes.len() - 32);

    let mut hasher = Sha256::new();
    hasher.update(payload);
    let calculated_checksum = hasher.finalize();

    if &calculated_checksum[..] != checksum_bytes {
        return Err(SaveError::ChecksumMismatch);
    }

    let msgpack = decompress_size_prepended(payload).map_err(|_| SaveError::Decompression)?;
    let snapshot: LeagueSnapshot = from_slice(&msgpack).map_err(SaveError::Deserialization)?;

    if snapshot.version > SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            found: snapshot.version,
            expected: SNAPSHOT_VERSION,
        });
    }

    Ok(snapshot)
}

pub fn current_timestamp() -> u64 {
    (OffsetDateTime::now_utc().unix_timestamp_nanos() / 1_000_000) as u64
}
