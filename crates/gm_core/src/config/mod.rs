//! # League configuration
//!
//! League-wide tunables consumed by the season core. A `LeagueConfig` is an
//! explicit context object: every entry point takes it by reference, nothing
//! reads it from a global.
//!
//! ```rust
//! use gm_core::config::LeagueConfig;
//!
//! let config = LeagueConfig::basketball();
//! assert!(config.validate().is_ok());
//! ```

mod env;

pub use env::{load_from_env, CONFIG_PATH_ENV};

use crate::error::{GmError, Result};
use crate::models::Season;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Sport {
    #[default]
    Basketball,
    Football,
    Hockey,
}

impl Sport {
    /// Games per team of the sport's standard league.
    pub fn canonical_games(self) -> u32 {
        match self {
            Sport::Basketball => 82,
            Sport::Football => 17,
            Sport::Hockey => 82,
        }
    }

    pub fn allows_ties(self) -> bool {
        matches!(self, Sport::Football)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CapType {
    #[default]
    Soft,
    Hard,
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conference {
    pub cid: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub did: u32,
    pub cid: u32,
    pub name: String,
}

/// Salary cap and contract bounds. Amounts in thousands.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalaryCapConfig {
    pub salary_cap: u32,
    pub cap_type: CapType,
    pub min_contract: u32,
    pub max_contract: u32,
    /// Contract length bounds in seasons
    pub min_contract_length: u32,
    pub max_contract_length: u32,
    /// Rookie pay scale by overall pick; picks past the end get the last entry
    #[serde(default)]
    pub rookie_scale: Option<Vec<u32>>,
}

impl Default for SalaryCapConfig {
    fn default() -> Self {
        Self {
            salary_cap: 140_000,
            cap_type: CapType::Soft,
            min_contract: 1_100,
            max_contract: 47_000,
            min_contract_length: 1,
            max_contract_length: 5,
            rookie_scale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterConfig {
    pub min_roster_size: usize,
    pub max_roster_size: usize,
    /// Players per team when a new league is created
    pub initial_roster_size: usize,
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self { min_roster_size: 13, max_roster_size: 15, initial_roster_size: 14 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftConfig {
    pub num_rounds: u8,
    /// Prospects generated per draft class
    pub class_size: usize,
    /// Draft classes kept ahead of the current season
    pub future_classes: usize,
    /// Picks decided by the weighted lottery
    pub lottery_picks: usize,
}

impl Default for DraftConfig {
    fn default() -> Self {
        Self { num_rounds: 2, class_size: 70, future_classes: 3, lottery_picks: 4 }
    }
}

/// Contract auction tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketConfig {
    /// 0 = skip the auction and use the closed-form contract formula
    pub auction_rounds: u32,
    /// Softmax temperature for picking which player a team bids on
    pub temperature: f64,
    /// Demand adjustment in the first round; cools linearly to 0
    pub max_step: f64,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self { auction_rounds: 30, temperature: 0.25, max_step: 0.2 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FreeAgencyConfig {
    /// Day budget of the free-agency phase
    pub days: u32,
    /// Fraction of the demand above the minimum contract lost per day
    pub daily_demand_decay: f64,
    /// Largest discount a long-unsigned free agent accepts
    pub max_mood_discount: f64,
}

impl Default for FreeAgencyConfig {
    fn default() -> Self {
        Self { days: 30, daily_demand_decay: 0.0075, max_mood_discount: 0.15 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueConfig {
    pub sport: Sport,
    pub starting_season: Season,
    pub num_teams: usize,
    pub num_games: u32,
    pub conferences: Vec<Conference>,
    pub divisions: Vec<Division>,
    #[serde(default)]
    pub salary: SalaryCapConfig,
    #[serde(default)]
    pub roster: RosterConfig,
    /// Games per playoff round; 2^rounds teams qualify
    pub playoff_series_lengths: Vec<u32>,
    #[serde(default)]
    pub draft: DraftConfig,
    #[serde(default)]
    pub market: MarketConfig,
    #[serde(default)]
    pub free_agency: FreeAgencyConfig,
    /// Seasons of played games kept before they are purged
    #[serde(default = "default_keep_game_seasons")]
    pub keep_game_seasons: u32,
    /// Chance per preseason of the age fraud retcon event
    #[serde(default = "default_age_fraud_probability")]
    pub age_fraud_probability: f64,
}

fn default_keep_game_seasons() -> u32 {
    2
}

fn default_age_fraud_probability() -> f64 {
    0.01
}

impl Default for LeagueConfig {
    fn default() -> Self {
        Self::basketball()
    }
}

impl LeagueConfig {
    /// Standard 30-team, 82-game league: 2 conferences of 3 divisions of 5.
    pub fn basketball() -> Self {
        let conferences = vec![
            Conference { cid: 0, name: "Eastern".to_string() },
            Conference { cid: 1, name: "Western".to_string() },
        ];
        let divisions = ["Atlantic", "Central", "Southeast", "Northwest", "Pacific", "Southwest"]
            .iter()
            .enumerate()
            .map(|(i, name)| Division { did: i as u32, cid: (i / 3) as u32, name: name.to_string() })
            .collect();

        // Linear slide from 5000 for the first pick down to 1500 for the 30th,
        // second-rounders get the minimum.
        let mut rookie_scale: Vec<u32> =
            (0..30).map(|i| crate::models::round_amount(5_000.0 - 3_500.0 * i as f64 / 29.0)).collect();
        rookie_scale.push(1_100);

        Self {
            sport: Sport::Basketball,
            starting_season: 2025,
            num_teams: 30,
            num_games: 82,
            conferences,
            divisions,
            salary: SalaryCapConfig { rookie_scale: Some(rookie_scale), ..SalaryCapConfig::default() },
            roster: RosterConfig::default(),
            playoff_series_lengths: vec![7, 7, 7, 7],
            draft: DraftConfig::default(),
            market: MarketConfig::default(),
            free_agency: FreeAgencyConfig::default(),
            keep_game_seasons: default_keep_game_seasons(),
            age_fraud_probability: default_age_fraud_probability(),
        }
    }

    /// 32 teams, 17 games, 2 conferences of 4 divisions of 4, hard cap.
    pub fn football() -> Self {
        let conferences = vec![
            Conference { cid: 0, name: "AFC".to_string() },
            Conference { cid: 1, name: "NFC".to_string() },
        ];
        let divisions = ["East", "North", "South", "West"]
            .iter()
            .enumerate()
            .flat_map(|(i, name)| {
                [
                    Division { did: i as u32, cid: 0, name: format!("AFC {}", name) },
                    Division { did: (i + 4) as u32, cid: 1, name: format!("NFC {}", name) },
                ]
            })
            .collect();

        Self {
            sport: Sport::Football,
            starting_season: 2025,
            num_teams: 32,
            num_games: 17,
            conferences,
            divisions,
            salary: SalaryCapConfig {
                salary_cap: 200_000,
                cap_type: CapType::Hard,
                min_contract: 500,
                max_contract: 30_000,
                min_contract_length: 1,
                max_contract_length: 5,
                rookie_scale: None,
            },
            roster: RosterConfig { min_roster_size: 45, max_roster_size: 53, initial_roster_size: 50 },
            playoff_series_lengths: vec![1, 1, 1, 1],
            draft: DraftConfig { num_rounds: 7, class_size: 256, future_classes: 3, lottery_picks: 0 },
            market: MarketConfig::default(),
            free_agency: FreeAgencyConfig::default(),
            keep_game_seasons: default_keep_game_seasons(),
            age_fraud_probability: default_age_fraud_probability(),
        }
    }

    /// Small league for tests: one conference, one division.
    pub fn test_league(num_teams: usize, num_games: u32) -> Self {
        let mut config = Self::basketball();
        config.num_teams = num_teams;
        config.num_games = num_games;
        config.conferences = vec![Conference { cid: 0, name: "League".to_string() }];
        config.divisions = vec![Division { did: 0, cid: 0, name: "League".to_string() }];
        config.playoff_series_lengths = if num_teams >= 4 { vec![1, 1] } else { vec![1] };
        config.draft.class_size = num_teams * config.draft.num_rounds as usize + 5;
        config
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: LeagueConfig = serde_json::from_str(json)?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Division a newly created team with index `index` is placed in.
    pub fn division_for_team(&self, index: usize) -> Option<&Division> {
        if self.divisions.is_empty() {
            return None;
        }
        self.divisions.get(index % self.divisions.len())
    }

    pub fn num_playoff_teams(&self) -> usize {
        1usize << self.playoff_series_lengths.len()
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(GmError::InvalidConfig(msg));

        if self.num_teams < 2 {
            return invalid(format!("num_teams must be at least 2, got {}", self.num_teams));
        }
        if self.num_games == 0 {
            return invalid("num_games must be positive".to_string());
        }
        if self.conferences.is_empty() || self.divisions.is_empty() {
            return invalid("at least one conference and one division are required".to_string());
        }
        for division in &self.divisions {
            if !self.conferences.iter().any(|c| c.cid == division.cid) {
                return invalid(format!(
                    "division {} references unknown conference {}",
                    division.name, division.cid
                ));
            }
        }

        let salary = &self.salary;
        if salary.min_contract == 0 {
            return invalid("min_contract must be positive".to_string());
        }
        if salary.min_contract > salary.max_contract {
            return invalid(format!(
                "min_contract {} exceeds max_contract {}",
                salary.min_contract, salary.max_contract
            ));
        }
        if salary.min_contract_length == 0 || salary.min_contract_length > salary.max_contract_length {
            return invalid(format!(
                "contract length bounds [{}, {}] are invalid",
                salary.min_contract_length, salary.max_contract_length
            ));
        }

        let roster = &self.roster;
        if roster.min_roster_size > roster.max_roster_size {
            return invalid(format!(
                "min_roster_size {} exceeds max_roster_size {}",
                roster.min_roster_size, roster.max_roster_size
            ));
        }
        if roster.initial_roster_size < roster.min_roster_size
            || roster.initial_roster_size > roster.max_roster_size
        {
            return invalid(format!(
                "initial_roster_size {} outside [{}, {}]",
                roster.initial_roster_size, roster.min_roster_size, roster.max_roster_size
            ));
        }

        if self.playoff_series_lengths.is_empty() {
            return invalid("at least one playoff round is required".to_string());
        }
        if self.playoff_series_lengths.iter().any(|&games| games == 0 || games % 2 == 0) {
            return invalid("playoff series lengths must be odd".to_string());
        }
        if self.num_playoff_teams() > self.num_teams {
            return invalid(format!(
                "{} playoff rounds need {} teams, league has {}",
                self.playoff_series_lengths.len(),
                self.num_playoff_teams(),
                self.num_teams
            ));
        }

        if self.draft.num_rounds == 0 {
            return invalid("draft needs at least one round".to_string());
        }
        if !(self.market.temperature > 0.0) {
            return invalid("market temperature must be positive".to_string());
        }
        if !(0.0..1.0).contains(&self.market.max_step) {
            return invalid("market max_step must be in [0, 1)".to_string());
        }
        if !(0.0..1.0).contains(&self.free_agency.daily_demand_decay) {
            return invalid("daily_demand_decay must be in [0, 1)".to_string());
        }
        if !(0.0..=1.0).contains(&self.age_fraud_probability) {
            return invalid("age_fraud_probability must be in [0, 1]".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets_validate() {
        assert!(LeagueConfig::basketball().validate().is_ok());
        assert!(LeagueConfig::football().validate().is_ok());
        assert!(LeagueConfig::test_league(6, 10).validate().is_ok());
    }

    #[test]
    fn test_basketball_topology() {
        let config = LeagueConfig::basketball();
        assert_eq!(config.conferences.len(), 2);
        assert_eq!(config.divisions.iter().filter(|d| d.cid == 0).count(), 3);
        assert_eq!(config.divisions.iter().filter(|d| d.cid == 1).count(), 3);
        assert_eq!(config.num_playoff_teams(), 16);

        let scale = config.salary.rookie_scale.as_ref().unwrap();
        assert_eq!(scale[0], 5_000);
        assert_eq!(scale[29], 1_500);
    }

    #[test]
    fn test_invalid_contract_bounds() {
        let mut config = LeagueConfig::basketball();
        config.salary.min_contract = 50_000;
        let err = config.validate().unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_too_many_playoff_rounds() {
        let mut config = LeagueConfig::test_league(6, 10);
        config.playoff_series_lengths = vec![1, 1, 1];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_roundtrip_keeps_defaults() {
        let json = r#"{
            "sport": "basketball",
            "starting_season": 2030,
            "num_teams": 4,
            "num_games": 6,
            "conferences": [{"cid": 0, "name": "Only"}],
            "divisions": [{"did": 0, "cid": 0, "name": "Only"}],
            "playoff_series_lengths": [3]
        }"#;
        let config = LeagueConfig::from_json(json).unwrap();
        assert_eq!(config.starting_season, 2030);
        assert_eq!(config.salary, SalaryCapConfig::default());
        assert_eq!(config.keep_game_seasons, 2);
        assert!(config.validate().is_ok());
    }
}
