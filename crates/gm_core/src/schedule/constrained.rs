//! Constrained generator for the canonical league shape.
//!
//! Home games per ordered pair (host, visitor):
//! - same division: 2
//! - other conference: 1
//! - same conference, other division: 1, plus 1 more for the pairs picked by
//!   the quota assignment below, so every team gets exactly
//!   `extra_home_games` extra home games and as many extra away games.
//!
//! The quota assignment is a small directed-degree problem solved per
//! conference with randomized greedy construction, local repair swaps and
//! full restarts. When the quota is more than half the out-of-division
//! opponents, the complement is built instead (pairs that do *not* get the
//! extra game), which keeps the search sparse.

use super::CanonicalShape;
use crate::error::{GmError, Result};
use crate::models::{ScheduleEntry, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

/// Full restarts before the shape is declared unsatisfiable.
pub const MAX_ATTEMPTS: u32 = 1_000;
/// Repair swaps inside one attempt before it is discarded.
const MAX_REPAIRS: u32 = 500;

pub fn generate(shape: &CanonicalShape, rng: &mut impl Rng) -> Result<Vec<ScheduleEntry>> {
    let mut division_of: BTreeMap<TeamId, (u32, usize)> = BTreeMap::new();
    for conf in &shape.conferences {
        for (d, division) in conf.divisions.iter().enumerate() {
            for &tid in division {
                division_of.insert(tid, (conf.cid, d));
            }
        }
    }

    let others = shape.conferences[0].size() - shape.division_size;
    let quota = shape.extra_home_games;
    let complement = quota * 2 > others;
    let degree = if complement { others - quota } else { quota };

    let mut marked: BTreeSet<(TeamId, TeamId)> = BTreeSet::new();
    for conf in &shape.conferences {
        let teams: Vec<TeamId> = conf.teams().collect();
        let edges = assign_quota(&teams, &division_of, degree, rng)?;
        marked.extend(edges);
    }

    let tids: Vec<TeamId> = division_of.keys().copied().collect();
    let mut matchups = Vec::new();
    for &home in &tids {
        for &away in &tids {
            if home == away {
                continue;
            }
            let (home_conf, home_div) = division_of[&home];
            let (away_conf, away_div) = division_of[&away];

            let count = if home_conf != away_conf {
                1
            } else if home_div == away_div {
                2
            } else if marked.contains(&(home, away)) != complement {
                2
            } else {
                1
            };

            for _ in 0..count {
                matchups.push(ScheduleEntry::new(home, away));
            }
        }
    }

    Ok(matchups)
}

/// Pick directed pairs (host, visitor) inside one conference so every team
/// is host in exactly `degree` pairs and visitor in exactly `degree` pairs,
/// never against a division mate and never in both directions.
pub(crate) fn assign_quota(
    teams: &[TeamId],
    division_of: &BTreeMap<TeamId, (u32, usize)>,
    degree: usize,
    rng: &mut impl Rng,
) -> Result<BTreeSet<(TeamId, TeamId)>> {
    if degree == 0 {
        return Ok(BTreeSet::new());
    }

    for attempt in 1..=MAX_ATTEMPTS {
        if let Some(edges) = try_assign(teams, division_of, degree, rng) {
            if attempt > 1 {
                debug!(attempt, "Quota assignment succeeded after restarts");
            }
            return Ok(edges);
        }
    }

    warn!(attempts = MAX_ATTEMPTS, teams = teams.len(), degree, "Quota assignment failed");
    Err(GmError::ScheduleUnsatisfiable { attempts: MAX_ATTEMPTS })
}

fn try_assign(
    teams: &[TeamId],
    division_of: &BTreeMap<TeamId, (u32, usize)>,
    degree: usize,
    rng: &mut impl Rng,
) -> Option<BTreeSet<(TeamId, TeamId)>> {
    let allowed = |a: TeamId, b: TeamId| a != b && division_of[&a].1 != division_of[&b].1;

    let mut out_need: BTreeMap<TeamId, usize> = teams.iter().map(|&t| (t, degree)).collect();
    let mut in_need = out_need.clone();
    let mut edges: BTreeSet<(TeamId, TeamId)> = BTreeSet::new();
    let mut repairs = 0;

    loop {
        let mut pending: Vec<TeamId> =
            teams.iter().copied().filter(|t| out_need[t] > 0).collect();
        if pending.is_empty() {
            return Some(edges);
        }
        pending.shuffle(rng);

        for host in pending {
            if out_need[&host] == 0 {
                continue;
            }

            let open = |v: &TeamId| {
                allowed(host, *v) && !edges.contains(&(host, *v)) && !edges.contains(&(*v, host))
            };

            let mut candidates: Vec<TeamId> =
                teams.iter().copied().filter(|v| open(v) && in_need[v] > 0).collect();

            if !candidates.is_empty() {
                // Most constrained visitor first, random among equals.
                candidates.shuffle(rng);
                let best = candidates.iter().map(|v| in_need[v]).max().unwrap_or(0);
                let visitor = candidates.into_iter().find(|v| in_need[v] == best)?;
                edges.insert((host, visitor));
                *out_need.get_mut(&host)? -= 1;
                *in_need.get_mut(&visitor)? -= 1;
                continue;
            }

            // Stuck: steal a visitor that is already full from another host.
            repairs += 1;
            if repairs > MAX_REPAIRS {
                return None;
            }
            let full: Vec<TeamId> = teams.iter().copied().filter(|v| open(v)).collect();
            let visitor = *full.choose(rng)?;
            let donors: Vec<TeamId> = edges
                .iter()
                .filter(|(h, v)| *v == visitor && *h != host)
                .map(|(h, _)| *h)
                .collect();
            let donor = *donors.choose(rng)?;

            edges.remove(&(donor, visitor));
            *out_need.get_mut(&donor)? += 1;
            edges.insert((host, visitor));
            *out_need.get_mut(&host)? -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::models::Team;
    use crate::schedule::CanonicalShape;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn canonical() -> CanonicalShape {
        let config = LeagueConfig::basketball();
        let teams: Vec<Team> = (0..30)
            .map(|i| {
                let div = config.division_for_team(i).unwrap();
                Team::new(i as u32, "City", "Team", div.cid, div.did, 2025)
            })
            .collect();
        CanonicalShape::detect(&teams, &config).unwrap()
    }

    #[test]
    fn test_quota_degrees() {
        let shape = canonical();
        let mut division_of = BTreeMap::new();
        for conf in &shape.conferences {
            for (d, div) in conf.divisions.iter().enumerate() {
                for &t in div {
                    division_of.insert(t, (conf.cid, d));
                }
            }
        }

        let teams: Vec<TeamId> = shape.conferences[0].teams().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(99);
        let edges = assign_quota(&teams, &division_of, 2, &mut rng).unwrap();

        assert_eq!(edges.len(), 30);
        for &t in &teams {
            assert_eq!(edges.iter().filter(|(h, _)| *h == t).count(), 2);
            assert_eq!(edges.iter().filter(|(_, v)| *v == t).count(), 2);
        }
        for &(h, v) in &edges {
            assert!(!edges.contains(&(v, h)), "mutual pair {}-{}", h, v);
            assert_ne!(division_of[&h].1, division_of[&v].1);
        }
    }

    #[test]
    fn test_home_away_split_is_exact() {
        let shape = canonical();
        for seed in 0..5 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let matchups = generate(&shape, &mut rng).unwrap();
            assert_eq!(matchups.len(), 1230);
            for tid in 0..30u32 {
                let home = matchups.iter().filter(|m| m.home == tid).count();
                let away = matchups.iter().filter(|m| m.away == tid).count();
                assert_eq!((home, away), (41, 41), "team {} seed {}", tid, seed);
            }
        }
    }

    #[test]
    fn test_unsatisfiable_quota_errors() {
        // Two teams in different divisions cannot each host and visit 2 pairs.
        let teams = vec![0, 1];
        let division_of: BTreeMap<TeamId, (u32, usize)> =
            [(0, (0, 0)), (1, (0, 1))].into_iter().collect();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let err = assign_quota(&teams, &division_of, 2, &mut rng).unwrap_err();
        assert!(matches!(err, GmError::ScheduleUnsatisfiable { .. }));
    }
}
