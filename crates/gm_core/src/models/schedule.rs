use super::{Season, TeamId};
use serde::{Deserialize, Serialize};

/// One scheduled (not yet played) game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub gid: u32,
    pub day: u32,
    pub home: TeamId,
    pub away: TeamId,
}

impl ScheduleEntry {
    pub fn new(home: TeamId, away: TeamId) -> Self {
        Self { gid: 0, day: 0, home, away }
    }

    pub fn involves(&self, tid: TeamId) -> bool {
        self.home == tid || self.away == tid
    }
}

/// A played game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub gid: u32,
    pub season: Season,
    pub day: u32,
    pub home: TeamId,
    pub away: TeamId,
    pub home_score: u32,
    pub away_score: u32,
    pub playoffs: bool,
}

impl GameRecord {
    pub fn winner(&self) -> Option<TeamId> {
        match self.home_score.cmp(&self.away_score) {
            std::cmp::Ordering::Greater => Some(self.home),
            std::cmp::Ordering::Less => Some(self.away),
            std::cmp::Ordering::Equal => None,
        }
    }
}
