//! # Draft
//!
//! Draft order, pick bookkeeping and player selection. Picks for a season
//! are created at the lottery and consumed in overall order; drafted players
//! sign rookie contracts, undrafted prospects become free agents.

pub mod lottery;

pub use lottery::draft_order;

use crate::config::LeagueConfig;
use crate::error::{GmError, Result};
use crate::market::formula;
use crate::models::{Contract, DraftPick, Player, PlayerId, RosterStatus, Season, TeamId};
use crate::store::{LeagueStore, LeagueStoreExt};
use tracing::{debug, info};

/// Replace the season's picks with `num_rounds` rounds in `order`.
pub fn create_picks(store: &mut dyn LeagueStore, season: Season, num_rounds: u8, order: &[TeamId]) {
    store.delete_draft_picks(season);
    for round in 1..=num_rounds {
        for (i, &tid) in order.iter().enumerate() {
            store.put_draft_pick(DraftPick { season, round, pick: i as u16 + 1, tid, pid: None });
        }
    }
}

/// Unused picks of the season in overall order.
pub fn remaining_picks(store: &dyn LeagueStore, season: Season) -> Vec<DraftPick> {
    let mut picks: Vec<DraftPick> =
        store.draft_picks().into_iter().filter(|p| p.season == season && p.pid.is_none()).collect();
    picks.sort_by_key(|p| (p.round, p.pick));
    picks
}

/// Prospects of the season's class, best first.
pub fn available_prospects(store: &dyn LeagueStore, season: Season) -> Vec<Player> {
    let mut prospects: Vec<Player> = store
        .players_by_status(RosterStatus::Undrafted)
        .into_iter()
        .filter(|p| p.draft.year == season)
        .collect();
    prospects.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.pid.cmp(&b.pid)));
    prospects
}

/// Use `pick` on `pid`: the player joins the team on a rookie contract.
pub fn select(
    store: &mut dyn LeagueStore,
    config: &LeagueConfig,
    pick: DraftPick,
    pid: PlayerId,
) -> Result<()> {
    let mut player =
        store.player(pid).ok_or_else(|| GmError::NotFound(format!("draft prospect {}", pid)))?;
    if player.status != RosterStatus::Undrafted {
        return Err(GmError::NotFound(format!("player {} is not an undrafted prospect", pid)));
    }

    let num_teams = store.teams().len();
    let overall = (pick.round as usize - 1) * num_teams + pick.pick as usize - 1;
    let index = formula::scale_pick(overall, num_teams, config.num_teams);
    let contract =
        formula::rookie_contract(index, pick.round, player.value, &config.salary, pick.season);

    player.draft.round = pick.round;
    player.draft.pick = pick.pick;
    player.draft.tid = Some(pick.tid);
    player.sign(pick.tid, contract);
    store.put_player(player);

    store.put_draft_pick(DraftPick { pid: Some(pid), ..pick });
    debug!(round = pick.round, pick = pick.pick, tid = pick.tid, pid, "Draft pick");
    Ok(())
}

/// Make picks in order, each team taking the best available prospect.
/// With `stop_at_user`, stops before the first pick owned by a user team.
/// Returns the number of picks made.
pub fn run_picks(store: &mut dyn LeagueStore, config: &LeagueConfig, stop_at_user: bool) -> Result<usize> {
    let season = store.season();
    let user_tids = store.attributes().user_tids.clone();
    let mut made = 0;

    for pick in remaining_picks(&*store, season) {
        if stop_at_user && user_tids.contains(&pick.tid) {
            break;
        }
        let Some(best) = available_prospects(&*store, season).into_iter().next() else {
            break;
        };
        select(store, config, pick, best.pid)?;
        made += 1;
    }

    Ok(made)
}

/// Release the class's undrafted prospects to free agency with asking
/// contracts from the value formula.
pub fn release_undrafted(store: &mut dyn LeagueStore, config: &LeagueConfig) -> usize {
    let attributes = store.attributes().clone();
    let season = attributes.season;
    let undrafted = available_prospects(&*store, season);
    let count = undrafted.len();

    for mut player in undrafted {
        let amount = formula::amount_from_value(player.value, &config.salary);
        let exp = formula::expiration(
            player.age(season),
            player.ratings.ovr,
            player.ratings.pot,
            &config.salary,
            season,
            attributes.phase,
        );
        player.release(Contract::new(amount, exp));
        store.put_player(player);
    }

    if count > 0 {
        info!(season, count, "Undrafted prospects released to free agency");
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Phase, Team};
    use crate::players::generate_draft_class;
    use crate::test_support;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn draft_league() -> (LeagueConfig, crate::store::MemoryStore) {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = test_support::store_with_teams(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        generate_draft_class(&mut store, &config, 2025, &mut rng);
        create_picks(&mut store, 2025, config.draft.num_rounds, &[3, 2, 1, 0]);
        (config, store)
    }

    #[test]
    fn test_create_picks() {
        let (_, store) = draft_league();
        let picks = remaining_picks(&store, 2025);
        assert_eq!(picks.len(), 8);
        assert_eq!(picks[0].tid, 3);
        assert_eq!((picks[4].round, picks[4].pick), (2, 1));
    }

    #[test]
    fn test_run_all_picks() {
        let (config, mut store) = draft_league();
        let best = available_prospects(&store, 2025)[0].pid;

        assert_eq!(run_picks(&mut store, &config, false).unwrap(), 8);
        assert!(remaining_picks(&store, 2025).is_empty());

        let first = store.player(best).unwrap();
        assert_eq!(first.tid(), Some(3));
        assert!(first.contract.rookie);
        assert_eq!(first.contract.amount, 5_000);
        assert_eq!(first.contract.exp, 2028);
        assert_eq!(store.roster_size(0), 2);
    }

    #[test]
    fn test_stop_at_user_pick() {
        let (config, mut store) = draft_league();
        store.update_attributes(|a| a.user_tids = vec![1]);

        assert_eq!(run_picks(&mut store, &config, true).unwrap(), 2);
        assert_eq!(remaining_picks(&store, 2025)[0].tid, 1);
    }

    #[test]
    fn test_release_undrafted() {
        let (config, mut store) = draft_league();
        store.update_attributes(|a| a.phase = Phase::AfterDraft);
        run_picks(&mut store, &config, false).unwrap();

        let released = release_undrafted(&mut store, &config);
        assert_eq!(released, config.draft.class_size - 8);
        for p in store.free_agents() {
            assert!(p.contract.amount >= config.salary.min_contract);
            assert!(p.contract.exp > 2025);
        }
    }

    #[test]
    fn test_expanded_league_first_round_pay() {
        let (mut config, mut store) = draft_league();
        config.salary.rookie_scale = Some(vec![5_000, 4_000, 3_000, 2_000, 1_100]);
        for tid in [4, 5] {
            store.put_team(Team::new(tid, "New", "Team", 0, 0, 2025));
        }
        create_picks(&mut store, 2025, config.draft.num_rounds, &[0, 1, 2, 3, 4, 5]);

        assert_eq!(run_picks(&mut store, &config, false).unwrap(), 12);
        for pick in store.draft_picks() {
            let pid = pick.pid.unwrap();
            let amount = store.player(pid).unwrap().contract.amount;
            if pick.round == 1 {
                assert!(amount >= 2_000, "pick {} got {}", pick.pick, amount);
            } else {
                assert_eq!(amount, 1_100, "pick {} got {}", pick.pick, amount);
            }
        }
        let last_first_rounder = store.draft_picks().into_iter().find(|p| p.round == 1 && p.pick == 6);
        let pid = last_first_rounder.and_then(|p| p.pid).unwrap();
        assert_eq!(store.player(pid).unwrap().contract.amount, 2_000);
    }

    #[test]
    fn test_select_rejects_rostered_player() {
        let (config, mut store) = draft_league();
        let pick = remaining_picks(&store, 2025)[0];
        let pid = store.allocate_pid();
        store.put_player(test_support::player(pid, RosterStatus::Team(0), 50, 50, 2000));
        assert!(select(&mut store, &config, pick, pid).is_err());
    }
}
