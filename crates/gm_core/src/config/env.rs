use super::LeagueConfig;
use crate::error::{GmError, Result};
use std::{env, fs};

pub const CONFIG_PATH_ENV: &str = "GM_CONFIG_PATH";

/// Load a league config from the file named by `GM_CONFIG_PATH`.
///
/// Returns `Ok(None)` when the variable is unset or blank.
pub fn load_from_env() -> Result<Option<LeagueConfig>> {
    let Ok(path) = env::var(CONFIG_PATH_ENV) else {
        return Ok(None);
    };

    let path = path.trim();
    if path.is_empty() {
        return Ok(None);
    }

    let content = fs::read_to_string(path).map_err(|e| {
        GmError::InvalidConfig(format!("Failed to read config from {CONFIG_PATH_ENV}='{path}': {e}"))
    })?;

    let config = LeagueConfig::from_json(&content).map_err(|e| {
        GmError::InvalidConfig(format!("Failed to parse config from {CONFIG_PATH_ENV}='{path}': {e}"))
    })?;

    config.validate()?;
    tracing::info!(path, sport = ?config.sport, teams = config.num_teams, "Loaded league config");
    Ok(Some(config))
}
