//! Small league records: attributes, draft picks, negotiations, awards and
//! the playoff bracket.

use super::{Phase, PlayerId, Season, TeamId};
use serde::{Deserialize, Serialize};

/// League-wide key/value state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameAttributes {
    pub season: Season,
    pub starting_season: Season,
    pub phase: Phase,
    /// Phase to resume when an alternate track (fantasy/expansion draft) ends
    #[serde(default)]
    pub return_phase: Option<Phase>,
    /// Teams controlled by the user
    #[serde(default)]
    pub user_tids: Vec<TeamId>,
    /// Remaining free-agency days before the preseason
    #[serde(default)]
    pub free_agency_days_left: u32,
    pub next_pid: PlayerId,
    pub next_gid: u32,
}

impl GameAttributes {
    pub fn new(season: Season) -> Self {
        Self {
            season,
            starting_season: season,
            phase: Phase::Preseason,
            return_phase: None,
            user_tids: Vec::new(),
            free_agency_days_left: 0,
            next_pid: 0,
            next_gid: 0,
        }
    }

    pub fn is_user_team(&self, tid: TeamId) -> bool {
        self.user_tids.contains(&tid)
    }

    pub fn allocate_pid(&mut self) -> PlayerId {
        let pid = self.next_pid;
        self.next_pid += 1;
        pid
    }

    pub fn allocate_gid(&mut self) -> u32 {
        let gid = self.next_gid;
        self.next_gid += 1;
        gid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftPick {
    pub season: Season,
    pub round: u8,
    /// Pick number within the round, starting at 1
    pub pick: u16,
    pub tid: TeamId,
    /// Selected player once the pick has been used
    pub pid: Option<PlayerId>,
}

impl DraftPick {
    pub fn overall(&self, num_teams: usize) -> usize {
        (self.round as usize - 1) * num_teams + self.pick as usize
    }
}

/// Pending contract talks between a user team and a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Negotiation {
    pub pid: PlayerId,
    pub tid: TeamId,
    pub resigning: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonAwards {
    pub season: Season,
    pub champion: Option<TeamId>,
    pub best_record: Option<TeamId>,
    pub mvp: Option<PlayerId>,
    pub rookie_of_the_year: Option<PlayerId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesTeam {
    pub tid: TeamId,
    pub seed: u32,
    pub wins: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayoffSeries {
    /// Higher seed, hosts game 1
    pub home: SeriesTeam,
    pub away: SeriesTeam,
}

impl PlayoffSeries {
    pub fn new(home: SeriesTeam, away: SeriesTeam) -> Self {
        Self { home, away }
    }

    pub fn winner(&self, wins_needed: u32) -> Option<SeriesTeam> {
        if self.home.wins >= wins_needed {
            Some(self.home)
        } else if self.away.wins >= wins_needed {
            Some(self.away)
        } else {
            None
        }
    }

    pub fn games_played(&self) -> u32 {
        self.home.wins + self.away.wins
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayoffBracket {
    pub season: Season,
    /// Series length per round (odd numbers)
    pub series_lengths: Vec<u32>,
    pub rounds: Vec<Vec<PlayoffSeries>>,
    pub champion: Option<TeamId>,
}

impl PlayoffBracket {
    pub fn current_round(&self) -> usize {
        self.rounds.len().saturating_sub(1)
    }

    pub fn wins_needed(&self, round: usize) -> u32 {
        let games = self.series_lengths.get(round).copied().unwrap_or(1).max(1);
        games / 2 + 1
    }

    pub fn is_complete(&self) -> bool {
        self.champion.is_some()
    }
}
