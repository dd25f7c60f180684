use super::{Contract, PlayerId, Season, TeamId};
use serde::{Deserialize, Serialize};

/// Where a player currently belongs. Doubles as the store's player index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterStatus {
    Team(TeamId),
    FreeAgent,
    Undrafted,
    Retired,
}

impl RosterStatus {
    pub fn team(self) -> Option<TeamId> {
        match self {
            RosterStatus::Team(tid) => Some(tid),
            _ => None,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, RosterStatus::Team(_) | RosterStatus::FreeAgent)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ratings {
    /// Current overall rating (0-100)
    pub ovr: u8,
    /// Projected peak rating (0-100, >= ovr)
    pub pot: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Injury {
    pub kind: String,
    pub games_remaining: u32,
}

impl Injury {
    pub fn healthy() -> Self {
        Self { kind: "Healthy".to_string(), games_remaining: 0 }
    }

    pub fn is_injured(&self) -> bool {
        self.games_remaining > 0
    }

    /// Heal by `days`; returns true when the player became healthy.
    pub fn heal(&mut self, days: u32) -> bool {
        if self.games_remaining == 0 {
            return false;
        }
        self.games_remaining = self.games_remaining.saturating_sub(days);
        if self.games_remaining == 0 {
            self.kind = "Healthy".to_string();
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftInfo {
    /// Draft class the player entered the league with
    pub year: Season,
    /// 0 = undrafted
    pub round: u8,
    /// Overall pick number within the round, 0 = undrafted
    pub pick: u16,
    pub tid: Option<TeamId>,
}

impl DraftInfo {
    pub fn prospect(year: Season) -> Self {
        Self { year, round: 0, pick: 0, tid: None }
    }

    pub fn was_drafted(&self) -> bool {
        self.round > 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pid: PlayerId,
    pub name: String,
    pub born_year: Season,
    pub status: RosterStatus,
    pub ratings: Ratings,
    /// Skill proxy combining ovr and pot with an age adjustment
    pub value: f64,
    /// Current contract, or the asking contract for free agents and prospects
    pub contract: Contract,
    /// Re-signing demand of a rostered player whose contract is expiring
    #[serde(default)]
    pub demand: Option<Contract>,
    #[serde(default)]
    pub injury: Injury,
    pub draft: DraftInfo,
    /// Days spent unsigned; free agents grow more willing to sign below demand
    #[serde(default)]
    pub free_agent_days: u32,
    #[serde(default)]
    pub retired_year: Option<Season>,
    #[serde(default)]
    pub awards: Vec<String>,
}

impl Player {
    pub fn age(&self, season: Season) -> i32 {
        season - self.born_year
    }

    pub fn tid(&self) -> Option<TeamId> {
        self.status.team()
    }

    pub fn is_free_agent(&self) -> bool {
        self.status == RosterStatus::FreeAgent
    }

    /// Release to the free-agent pool with the given asking contract.
    pub fn release(&mut self, asking: Contract) {
        self.status = RosterStatus::FreeAgent;
        self.contract = asking;
        self.demand = None;
        self.free_agent_days = 0;
    }

    /// Sign with a team.
    pub fn sign(&mut self, tid: TeamId, contract: Contract) {
        self.status = RosterStatus::Team(tid);
        self.contract = contract;
        self.demand = None;
        self.free_agent_days = 0;
    }

    pub fn retire(&mut self, season: Season) {
        self.status = RosterStatus::Retired;
        self.retired_year = Some(season);
        self.demand = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Player {
        Player {
            pid: 1,
            name: "Test Player".to_string(),
            born_year: 2000,
            status: RosterStatus::Team(3),
            ratings: Ratings { ovr: 55, pot: 60 },
            value: 57.0,
            contract: Contract::new(2000, 2025),
            demand: None,
            injury: Injury::healthy(),
            draft: DraftInfo::prospect(2019),
            free_agent_days: 0,
            retired_year: None,
            awards: Vec::new(),
        }
    }

    #[test]
    fn test_release_and_sign() {
        let mut player = sample();
        player.demand = Some(Contract::new(3000, 2028));
        player.release(Contract::new(3000, 2028));
        assert!(player.is_free_agent());
        assert!(player.demand.is_none());

        player.free_agent_days = 12;
        player.sign(7, Contract::new(2500, 2027));
        assert_eq!(player.tid(), Some(7));
        assert_eq!(player.free_agent_days, 0);
    }

    #[test]
    fn test_injury_heal() {
        let mut injury = Injury { kind: "Sprained Ankle".to_string(), games_remaining: 2 };
        assert!(!injury.heal(1));
        assert!(injury.heal(1));
        assert_eq!(injury.kind, "Healthy");
        assert!(!injury.heal(1));
    }

    #[test]
    fn test_age() {
        assert_eq!(sample().age(2025), 25);
    }
}
