use super::{Season, TeamId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TeamStrategy {
    #[default]
    Contending,
    Rebuilding,
}

/// Win/loss record of one season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonRecord {
    pub season: Season,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// -1 = missed the playoffs, 0 = lost in the first round, ...
    pub playoff_rounds_won: i32,
    /// Payroll at the start of the season (thousands)
    pub payroll: u32,
}

impl SeasonRecord {
    pub fn new(season: Season) -> Self {
        Self { season, wins: 0, losses: 0, ties: 0, playoff_rounds_won: -1, payroll: 0 }
    }

    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.ties
    }

    /// Ties count as half a win.
    pub fn win_pct(&self) -> f64 {
        let gp = self.games_played();
        if gp == 0 {
            return 0.0;
        }
        (self.wins as f64 + 0.5 * self.ties as f64) / gp as f64
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub tid: TeamId,
    pub region: String,
    pub name: String,
    pub abbrev: String,
    /// Conference id
    pub cid: u32,
    /// Division id
    pub did: u32,
    #[serde(default)]
    pub strategy: TeamStrategy,
    pub record: SeasonRecord,
    #[serde(default)]
    pub history: Vec<SeasonRecord>,
}

impl Team {
    pub fn new(tid: TeamId, region: &str, name: &str, cid: u32, did: u32, season: Season) -> Self {
        let abbrev: String =
            region.chars().filter(|c| c.is_ascii_alphabetic()).take(3).collect::<String>().to_uppercase();
        Self {
            tid,
            region: region.to_string(),
            name: name.to_string(),
            abbrev,
            cid,
            did,
            strategy: TeamStrategy::Contending,
            record: SeasonRecord::new(season),
            history: Vec::new(),
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.region, self.name)
    }

    /// Archive the current record and start a fresh one.
    pub fn start_season(&mut self, season: Season, payroll: u32) {
        let previous = std::mem::replace(&mut self.record, SeasonRecord::new(season));
        if previous.season < season {
            self.history.push(previous);
        }
        self.record.payroll = payroll;
    }

    pub fn made_playoffs(&self) -> bool {
        self.record.playoff_rounds_won >= 0
    }
}

/// Compact cap view handed to the contract market.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeamCapInfo {
    pub tid: TeamId,
    /// Remaining room under the salary cap (thousands, may be negative)
    pub cap_space: f64,
    /// How many more players the roster can take
    pub roster_spots: usize,
}
