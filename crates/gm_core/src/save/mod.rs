//! League snapshot save/load.
//!
//! MessagePack + LZ4 compression with a SHA-256 trailer and a version
//! check, written atomically through a temp file.

pub mod error;
pub mod format;
pub mod manager;

pub use error::SaveError;
pub use format::{decompress_and_deserialize, serialize_and_compress, LeagueSnapshot};
pub use manager::SnapshotManager;

pub const SNAPSHOT_VERSION: u32 = 1;
