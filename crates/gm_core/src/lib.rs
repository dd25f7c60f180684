//! # gm_core - Season engine for a franchise GM simulator
//!
//! This library owns the season lifecycle of a simulated sports league:
//! schedule generation, the phase state machine, the contract market,
//! the free-agency day loop, game days and playoffs, auto play and
//! league snapshots.
//!
//! ## Features
//! - Deterministic: every random draw comes from one seeded stream
//! - Canonical 30-team schedules with stratified opponent counts
//! - Pluggable game simulator and UI bridge
//! - Compressed, checksummed snapshots

// Phase handlers and simulators take the full league context plus settings
#![allow(clippy::too_many_arguments)]
#![allow(clippy::type_complexity)]

pub mod autoplay;
pub mod config;
pub mod context;
pub mod draft;
pub mod error;
pub mod events;
pub mod free_agency;
pub mod league;
pub mod market;
pub mod models;
pub mod phase;
pub mod players;
pub mod save;
pub mod schedule;
pub mod season;
pub mod store;

#[cfg(test)]
mod test_support;

pub use error::{GmError, Result};
pub use league::League;

// Re-export the season lifecycle
pub use autoplay::{AutoPlay, AutoPlayReport, AutoPlaySettings, StopReason, Task};
pub use config::{LeagueConfig, Sport};
pub use context::LeagueContext;
pub use phase::{AdvanceConditions, PhaseHandler, PhaseMachine, PhaseOutcome, Transition};

// Re-export the market and free agency
pub use free_agency::{DayLoopOutcome, FreeAgencyDayLoop, StopHandle};
pub use market::{normalize, normalize_league, MarketContext, MarketPlayer, NormalizeMode};

// Re-export data types
pub use events::{LogBridge, NullBridge, RecordingBridge, UiBridge, UiMessage, UpdateTag};
pub use models::{Contract, Phase, Player, PlayerId, ScheduleEntry, Season, Team, TeamId};
pub use save::{LeagueSnapshot, SaveError, SnapshotManager};
pub use season::{GameResult, GameSimulator, RatingSimulator};
pub use store::{LeagueStore, LeagueStoreExt, MemoryStore};
