//! # Free agency
//!
//! Daily free-agent upkeep: demands decay toward the minimum contract,
//! injuries heal, unsigned days accumulate (making players more willing to
//! sign below their asking price) and AI teams sign players.
//!
//! [`FreeAgencyDayLoop`] drives these ticks through the free-agency phase.

pub mod autosign;
pub mod day_loop;

pub use autosign::{autosign, skip_probability, Signing};
pub use day_loop::{DayLoopOutcome, FreeAgencyDayLoop, LoopState, StopHandle};

use crate::config::LeagueConfig;
use crate::models::round_amount;
use crate::store::{LeagueStore, LeagueStoreExt};
use rand::Rng;

/// Decay every free agent's asking amount by `days` of market time, heal
/// injuries and count the days unsigned.
pub fn decay_demands(store: &mut dyn LeagueStore, config: &LeagueConfig, days: u32) {
    let min = config.salary.min_contract as f64;
    let factor = (1.0 - config.free_agency.daily_demand_decay).powi(days as i32);

    for mut player in store.free_agents() {
        let amount = player.contract.amount as f64;
        if amount > min {
            let decayed = min + (amount - min) * factor;
            player.contract.amount = round_amount(decayed).max(config.salary.min_contract);
        }
        player.injury.heal(days);
        player.free_agent_days += days;
        store.put_player(player);
    }
}

/// One day of free agency: decay, then AI signings.
pub fn daily_tick(
    store: &mut dyn LeagueStore,
    config: &LeagueConfig,
    auto_play: bool,
    rng: &mut impl Rng,
) -> Vec<Signing> {
    decay_demands(store, config, 1);
    autosign(store, config, auto_play, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;

    #[test]
    fn test_decay_floors_at_minimum() {
        let config = LeagueConfig::test_league(2, 2);
        let mut store = test_support::store_with_teams(&config);
        let pids = test_support::add_free_agents(&mut store, 2, 20_000);
        let mut cheap = store.player(pids[1]).unwrap();
        cheap.contract.amount = config.salary.min_contract;
        cheap.injury.games_remaining = 3;
        cheap.injury.kind = "Sore Knee".to_string();
        store.put_player(cheap);

        decay_demands(&mut store, &config, 30);

        let rich = store.player(pids[0]).unwrap();
        assert!(rich.contract.amount < 20_000);
        assert!(rich.contract.amount > config.salary.min_contract);
        assert_eq!(rich.free_agent_days, 30);

        let cheap = store.player(pids[1]).unwrap();
        assert_eq!(cheap.contract.amount, config.salary.min_contract);
        assert!(!cheap.injury.is_injured());
    }

    #[test]
    fn test_one_day_of_decay() {
        let config = LeagueConfig::test_league(2, 2);
        let mut store = test_support::store_with_teams(&config);
        let pids = test_support::add_free_agents(&mut store, 1, 21_100);

        decay_demands(&mut store, &config, 1);
        // 20_000 above the minimum loses 0.75%
        assert_eq!(store.player(pids[0]).unwrap().contract.amount, 20_950);
    }
}
