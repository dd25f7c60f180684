//! Record store collaborator.
//!
//! The season core reads and writes league records through [`LeagueStore`],
//! a get-all / get-by-index / put / delete interface per entity kind. It
//! makes no assumption about the storage engine behind it; [`MemoryStore`]
//! is the in-process implementation used by the CLI and tests.

mod memory;

pub use memory::MemoryStore;

use crate::models::{
    DraftPick, GameAttributes, GameRecord, Negotiation, Player, PlayerId, PlayoffBracket,
    RosterStatus, ScheduleEntry, Season, SeasonAwards, Team, TeamId,
};

pub trait LeagueStore {
    // Attributes
    fn attributes(&self) -> &GameAttributes;
    fn put_attributes(&mut self, attributes: GameAttributes);

    // Teams
    fn teams(&self) -> Vec<Team>;
    fn team(&self, tid: TeamId) -> Option<Team>;
    fn put_team(&mut self, team: Team);

    // Players
    fn players(&self) -> Vec<Player>;
    fn players_by_status(&self, status: RosterStatus) -> Vec<Player>;
    fn player(&self, pid: PlayerId) -> Option<Player>;
    fn put_player(&mut self, player: Player);
    fn delete_player(&mut self, pid: PlayerId);

    // Schedule
    fn schedule(&self) -> Vec<ScheduleEntry>;
    fn put_schedule_entry(&mut self, entry: ScheduleEntry);
    fn delete_schedule_entry(&mut self, gid: u32);
    fn clear_schedule(&mut self);

    // Played games
    fn games_by_season(&self, season: Season) -> Vec<GameRecord>;
    fn put_game(&mut self, game: GameRecord);
    /// Delete every game from a season before `season`. Returns the count.
    fn delete_games_before(&mut self, season: Season) -> usize;

    // Draft picks
    fn draft_picks(&self) -> Vec<DraftPick>;
    fn put_draft_pick(&mut self, pick: DraftPick);
    fn delete_draft_picks(&mut self, season: Season);

    // Negotiations
    fn negotiations(&self) -> Vec<Negotiation>;
    fn put_negotiation(&mut self, negotiation: Negotiation);
    fn delete_negotiation(&mut self, pid: PlayerId);

    // Awards
    fn awards(&self) -> Vec<SeasonAwards>;
    fn put_awards(&mut self, awards: SeasonAwards);

    // Playoffs
    fn playoffs(&self) -> Option<PlayoffBracket>;
    fn put_playoffs(&mut self, bracket: PlayoffBracket);
}

/// Helpers built only on the trait surface.
pub trait LeagueStoreExt: LeagueStore {
    fn season(&self) -> Season {
        self.attributes().season
    }

    fn roster(&self, tid: TeamId) -> Vec<Player> {
        self.players_by_status(RosterStatus::Team(tid))
    }

    fn roster_size(&self, tid: TeamId) -> usize {
        self.players_by_status(RosterStatus::Team(tid)).len()
    }

    fn payroll(&self, tid: TeamId) -> u32 {
        self.roster(tid).iter().map(|p| p.contract.amount).sum()
    }

    fn free_agents(&self) -> Vec<Player> {
        self.players_by_status(RosterStatus::FreeAgent)
    }

    fn update_attributes(&mut self, f: impl FnOnce(&mut GameAttributes)) {
        let mut attributes = self.attributes().clone();
        f(&mut attributes);
        self.put_attributes(attributes);
    }

    fn allocate_pid(&mut self) -> PlayerId {
        let mut attributes = self.attributes().clone();
        let pid = attributes.allocate_pid();
        self.put_attributes(attributes);
        pid
    }
}

impl<S: LeagueStore + ?Sized> LeagueStoreExt for S {}
