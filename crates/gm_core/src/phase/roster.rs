//! Roster upkeep shared by the phase handlers.

use crate::config::LeagueConfig;
use crate::free_agency::autosign::can_afford;
use crate::market::formula;
use crate::models::{Contract, Phase, Player, RosterStatus, Season, TeamId};
use crate::players::{generate_player, PlayerTemplate};
use crate::store::{LeagueStore, LeagueStoreExt};
use rand::Rng;
use tracing::debug;

/// Closed-form asking contract for a player entering free agency.
pub fn asking_contract(player: &Player, config: &LeagueConfig, season: Season, phase: Phase) -> Contract {
    let amount = formula::amount_from_value(player.value, &config.salary);
    let exp = formula::expiration(
        player.age(season),
        player.ratings.ovr,
        player.ratings.pot,
        &config.salary,
        season,
        phase,
    );
    Contract::new(amount, exp)
}

/// Release to free agency. A priced re-signing demand becomes the asking
/// contract, otherwise the closed form is used.
pub fn release_player(store: &mut dyn LeagueStore, config: &LeagueConfig, mut player: Player) {
    let attributes = store.attributes();
    let (season, phase) = (attributes.season, attributes.phase);
    let asking = player.demand.unwrap_or_else(|| asking_contract(&player, config, season, phase));
    debug!(pid = player.pid, tid = ?player.tid(), amount = asking.amount, "Player released");
    player.release(asking);
    store.put_player(player);
}

/// Release the least valuable players until the roster fits the maximum.
pub fn prune_roster(store: &mut dyn LeagueStore, config: &LeagueConfig, tid: TeamId) -> usize {
    let mut roster = store.roster(tid);
    let excess = roster.len().saturating_sub(config.roster.max_roster_size);
    roster.sort_by(|a, b| a.value.total_cmp(&b.value).then(b.pid.cmp(&a.pid)));

    for player in roster.into_iter().take(excess) {
        release_player(store, config, player);
    }
    excess
}

/// Sign free agents until the roster reaches the minimum. Players the team
/// can't afford come at the minimum contract; when the pool runs dry a
/// replacement-level veteran is generated.
pub fn fill_roster(
    store: &mut dyn LeagueStore,
    config: &LeagueConfig,
    tid: TeamId,
    rng: &mut impl Rng,
) -> usize {
    let attributes = store.attributes().clone();
    let season = attributes.season;
    let first_season = formula::first_contract_season(season, attributes.phase);
    let mut signed = 0;

    while store.roster_size(tid) < config.roster.min_roster_size {
        let mut pool = store.free_agents();
        pool.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.pid.cmp(&b.pid)));

        let payroll = store.payroll(tid);
        let roster_size = store.roster_size(tid);
        let affordable = pool.iter().position(|p| can_afford(payroll, roster_size, p.contract.amount, config));

        let (mut player, amount) = match affordable {
            Some(index) => {
                let player = pool.swap_remove(index);
                let amount = player.contract.amount;
                (player, amount)
            }
            None if !pool.is_empty() => (pool.swap_remove(0), config.salary.min_contract),
            None => {
                let pid = store.allocate_pid();
                let mut player = generate_player(
                    pid,
                    PlayerTemplate::veteran(),
                    RosterStatus::FreeAgent,
                    season,
                    season,
                    &config.salary,
                    rng,
                );
                player.draft.year = player.born_year + 20;
                (player, config.salary.min_contract)
            }
        };

        let exp = player.contract.exp.max(first_season);
        player.sign(tid, Contract::new(amount, exp));
        debug!(tid, pid = player.pid, amount, "Roster spot filled");
        store.put_player(player);
        signed += 1;
    }
    signed
}
