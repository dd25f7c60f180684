use crate::models::{Phase, TeamId};
use crate::save::SaveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GmError {
    #[error("Invalid league configuration: {0}")]
    InvalidConfig(String),

    #[error("Schedule constraints unsatisfiable after {attempts} attempts")]
    ScheduleUnsatisfiable { attempts: u32 },

    #[error("Invalid phase transition: {from} -> {to}")]
    InvalidTransition { from: Phase, to: Phase },

    #[error("Operation requires the {expected} phase, league is in the {actual} phase")]
    WrongPhase { expected: Phase, actual: Phase },

    #[error("The {phase} phase is not finished: {detail}")]
    PhaseIncomplete { phase: Phase, detail: String },

    #[error("Team {tid} has {count} players, roster must hold between {min} and {max}")]
    RosterSize { tid: TeamId, count: usize, min: usize, max: usize },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),
}

impl GmError {
    /// Errors caused by the league configuration rather than by league state.
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, GmError::InvalidConfig(_) | GmError::ScheduleUnsatisfiable { .. })
    }
}

pub type Result<T> = std::result::Result<T, GmError>;
