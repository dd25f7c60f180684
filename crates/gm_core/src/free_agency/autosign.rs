use crate::config::{CapType, LeagueConfig};
use crate::market::formula;
use crate::models::{Contract, Phase, PlayerId, TeamId, TeamStrategy};
use crate::store::{LeagueStore, LeagueStoreExt};
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Signing {
    pub tid: TeamId,
    pub pid: PlayerId,
    pub amount: u32,
}

/// Chance a team sits out a day of signings. Teams are pickier once the
/// season is underway, rebuilding teams more than contenders.
pub fn skip_probability(strategy: TeamStrategy, phase: Phase) -> f64 {
    let in_season = matches!(phase, Phase::RegularSeason | Phase::Playoffs);
    match (strategy, in_season) {
        (TeamStrategy::Contending, false) => 0.5,
        (TeamStrategy::Rebuilding, false) => 0.7,
        (TeamStrategy::Contending, true) => 0.9,
        (TeamStrategy::Rebuilding, true) => 0.95,
    }
}

/// Whether a team can add `amount` to its payroll. Over the cap only
/// minimum contracts fit, and under a hard cap only to reach the minimum
/// roster size.
pub fn can_afford(payroll: u32, roster_size: usize, amount: u32, config: &LeagueConfig) -> bool {
    let salary = &config.salary;
    if salary.cap_type == CapType::None || payroll + amount <= salary.salary_cap {
        return true;
    }
    if amount > salary.min_contract {
        return false;
    }
    match salary.cap_type {
        CapType::Hard => roster_size < config.roster.min_roster_size,
        CapType::Soft | CapType::None => true,
    }
}

/// AI teams sign at most one free agent each, best value first among the
/// players they can afford. User teams only sign when `auto_play` is set.
pub fn autosign(
    store: &mut dyn LeagueStore,
    config: &LeagueConfig,
    auto_play: bool,
    rng: &mut impl Rng,
) -> Vec<Signing> {
    let attributes = store.attributes().clone();
    let mut pool = store.free_agents();
    if pool.is_empty() {
        return Vec::new();
    }
    pool.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.pid.cmp(&b.pid)));

    let mut teams = store.teams();
    teams.shuffle(rng);

    let first_season = formula::first_contract_season(attributes.season, attributes.phase);
    let mut signings = Vec::new();

    for team in teams {
        if pool.is_empty() {
            break;
        }
        if attributes.is_user_team(team.tid) && !auto_play {
            continue;
        }

        let roster_size = store.roster_size(team.tid);
        if roster_size >= config.roster.max_roster_size {
            continue;
        }
        let must_fill = roster_size < config.roster.min_roster_size;
        if !must_fill && rng.gen_bool(skip_probability(team.strategy, attributes.phase)) {
            continue;
        }

        let payroll = store.payroll(team.tid);
        let choice = pool.iter().position(|p| {
            let asking = formula::willing_amount(
                p.contract.amount,
                p.free_agent_days,
                &config.free_agency,
                &config.salary,
            );
            can_afford(payroll, roster_size, asking, config)
        });
        let Some(index) = choice else {
            continue;
        };

        let mut player = pool.remove(index);
        let amount = formula::willing_amount(
            player.contract.amount,
            player.free_agent_days,
            &config.free_agency,
            &config.salary,
        );
        let contract = Contract::new(amount, player.contract.exp.max(first_season));
        player.sign(team.tid, contract);
        info!(tid = team.tid, pid = player.pid, amount, exp = contract.exp, "Free agent signed");
        signings.push(Signing { tid: team.tid, pid: player.pid, amount });
        store.put_player(player);
    }

    signings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_can_afford_rules() {
        let mut config = LeagueConfig::basketball();
        let cap = config.salary.salary_cap;
        let min = config.salary.min_contract;

        assert!(can_afford(cap - 5_000, 14, 5_000, &config));
        assert!(!can_afford(cap - 5_000, 14, 5_010, &config));
        assert!(can_afford(cap + 10_000, 14, min, &config));

        config.salary.cap_type = CapType::Hard;
        assert!(!can_afford(cap, 14, min, &config));
        assert!(can_afford(cap, 12, min, &config));

        config.salary.cap_type = CapType::None;
        assert!(can_afford(cap * 2, 15, 40_000, &config));
    }

    #[test]
    fn test_short_rosters_always_sign() {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = test_support::store_with_teams(&config);
        test_support::fill_rosters(&mut store, 10, 3_000, 2027);
        test_support::add_free_agents(&mut store, 10, 2_000);

        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let signings = autosign(&mut store, &config, false, &mut rng);
        assert_eq!(signings.len(), 4);
        for tid in 0..4 {
            assert_eq!(store.roster_size(tid), 11);
        }
        assert_eq!(store.free_agents().len(), 6);
    }

    #[test]
    fn test_user_team_skipped_unless_auto_play() {
        let config = LeagueConfig::test_league(2, 2);
        let mut store = test_support::store_with_teams(&config);
        store.update_attributes(|a| a.user_tids = vec![0]);
        test_support::add_free_agents(&mut store, 4, 2_000);
        let mut rng = ChaCha8Rng::seed_from_u64(11);

        let signings = autosign(&mut store, &config, false, &mut rng);
        assert!(signings.iter().all(|s| s.tid != 0));
        assert_eq!(signings.len(), 1);

        let signings = autosign(&mut store, &config, true, &mut rng);
        assert_eq!(signings.len(), 2);
    }

    #[test]
    fn test_best_affordable_player_signed() {
        let config = LeagueConfig::test_league(2, 2);
        let mut store = test_support::store_with_teams(&config);
        test_support::fill_rosters(&mut store, 5, 27_000, 2027);
        let pids = test_support::add_free_agents(&mut store, 3, 2_000);
        // The best player asks for more than either team has left.
        let mut star = store.player(pids[2]).unwrap();
        star.contract.amount = 40_000;
        store.put_player(star);

        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let signings = autosign(&mut store, &config, false, &mut rng);
        assert_eq!(signings.len(), 2);
        assert!(signings.iter().all(|s| s.pid != pids[2]));
        assert!(store.player(pids[2]).unwrap().is_free_agent());
    }

    #[test]
    fn test_signed_contract_starts_next_season_in_offseason() {
        let config = LeagueConfig::test_league(2, 2);
        let mut store = test_support::store_with_teams(&config);
        store.update_attributes(|a| a.phase = Phase::FreeAgency);
        let pids = test_support::add_free_agents(&mut store, 1, 2_000);
        let mut p = store.player(pids[0]).unwrap();
        p.contract.exp = 2025;
        store.put_player(p);

        let mut rng = ChaCha8Rng::seed_from_u64(13);
        autosign(&mut store, &config, false, &mut rng);
        let p = store.player(pids[0]).unwrap();
        assert!(p.tid().is_some());
        assert_eq!(p.contract.exp, 2026);
    }
}
