//! Fixtures shared by unit tests.

use crate::config::LeagueConfig;
use crate::models::{
    Contract, DraftInfo, GameAttributes, Injury, Player, PlayerId, Ratings, RosterStatus, Season,
    Team,
};
use crate::players::compute_value;
use crate::store::{LeagueStore, LeagueStoreExt, MemoryStore};

pub fn player(pid: PlayerId, status: RosterStatus, ovr: u8, pot: u8, born_year: Season) -> Player {
    let ratings = Ratings { ovr, pot };
    Player {
        pid,
        name: format!("Player {}", pid),
        born_year,
        status,
        ratings,
        value: compute_value(ratings, 2025 - born_year),
        contract: Contract::new(2_000, 2026),
        demand: None,
        injury: Injury::healthy(),
        draft: DraftInfo::prospect(born_year + 20),
        free_agent_days: 0,
        retired_year: None,
        awards: Vec::new(),
    }
}

/// Store with the config's teams and no players.
pub fn store_with_teams(config: &LeagueConfig) -> MemoryStore {
    let season = config.starting_season;
    let mut store = MemoryStore::new(GameAttributes::new(season));
    for i in 0..config.num_teams {
        let (cid, did) = config.division_for_team(i).map(|d| (d.cid, d.did)).unwrap_or((0, 0));
        store.put_team(Team::new(i as u32, &format!("City {}", i), "Team", cid, did, season));
    }
    store
}

/// Add `count` players to every team, contracts running through `exp`.
pub fn fill_rosters(store: &mut MemoryStore, count: usize, amount: u32, exp: Season) {
    for team in store.teams() {
        for k in 0..count {
            let pid = store.allocate_pid();
            let ovr = 40 + ((pid as usize + k) % 30) as u8;
            let mut p = player(pid, RosterStatus::Team(team.tid), ovr, ovr + 5, 1998);
            p.contract = Contract::new(amount, exp);
            store.put_player(p);
        }
    }
}

/// Add free agents with the given asking amount.
pub fn add_free_agents(store: &mut MemoryStore, count: usize, amount: u32) -> Vec<PlayerId> {
    (0..count)
        .map(|k| {
            let pid = store.allocate_pid();
            let ovr = 45 + (k % 25) as u8;
            let mut p = player(pid, RosterStatus::FreeAgent, ovr, ovr + 3, 1997);
            p.contract = Contract::new(amount, 2026);
            store.put_player(p);
            pid
        })
        .collect()
}
