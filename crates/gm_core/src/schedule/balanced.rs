//! Round-robin generator for arbitrary team and game counts.
//!
//! Pairings come from the circle method. The flattened pairing list is swept
//! until the per-team game counters run out, so teams never differ by more
//! than one game played at any point of the construction. When
//! `teams * games` is odd exactly one team finishes one game short.

use crate::models::{ScheduleEntry, TeamId};
use rand::Rng;
use std::collections::HashMap;

/// Balancing flips per team before giving up on a perfect home/away split.
const FLIPS_PER_TEAM: usize = 50;

pub fn generate(tids: &[TeamId], num_games: u32, rng: &mut impl Rng) -> Vec<ScheduleEntry> {
    let pairings = round_robin(tids);
    if pairings.is_empty() || num_games == 0 {
        return Vec::new();
    }

    let mut remaining: HashMap<TeamId, u32> = tids.iter().map(|&t| (t, num_games)).collect();
    let mut used: Vec<(TeamId, TeamId)> = Vec::new();

    loop {
        let mut progressed = false;
        for &(a, b) in &pairings {
            if remaining[&a] == 0 || remaining[&b] == 0 {
                continue;
            }
            used.push((a, b));
            progressed = true;
            if let Some(left) = remaining.get_mut(&a) {
                *left -= 1;
            }
            if let Some(left) = remaining.get_mut(&b) {
                *left -= 1;
            }
        }

        let unfinished = remaining.values().filter(|&&left| left > 0).count();
        if unfinished <= 1 || !progressed {
            break;
        }
    }

    let mut matchups: Vec<ScheduleEntry> = used
        .into_iter()
        .map(|(a, b)| if rng.gen_bool(0.5) { ScheduleEntry::new(a, b) } else { ScheduleEntry::new(b, a) })
        .collect();

    balance_home_away(&mut matchups, tids, rng);
    matchups
}

/// Unique pairings by the circle method, in round order. Odd team counts
/// get a bye slot whose pairings are dropped.
pub fn round_robin(tids: &[TeamId]) -> Vec<(TeamId, TeamId)> {
    let mut slots: Vec<Option<TeamId>> = tids.iter().copied().map(Some).collect();
    if slots.len() % 2 == 1 {
        slots.push(None);
    }
    let n = slots.len();
    if n < 2 {
        return Vec::new();
    }

    let mut pairings = Vec::with_capacity(n * (n - 1) / 2);
    for _ in 0..n - 1 {
        for i in 0..n / 2 {
            if let (Some(a), Some(b)) = (slots[i], slots[n - 1 - i]) {
                pairings.push((a, b));
            }
        }
        // Slot 0 stays put, the rest rotate by one.
        slots[1..].rotate_right(1);
    }
    pairings
}

/// Flip matchups until every team's home-away differential is as small as
/// its game count allows (0 for even, ±1 for odd). Bounded, so a perfect
/// split is not guaranteed.
fn balance_home_away(matchups: &mut [ScheduleEntry], tids: &[TeamId], rng: &mut impl Rng) {
    let mut diff: HashMap<TeamId, i32> = tids.iter().map(|&t| (t, 0)).collect();
    for m in matchups.iter() {
        *diff.entry(m.home).or_default() += 1;
        *diff.entry(m.away).or_default() -= 1;
    }

    let max_iterations = tids.len() * FLIPS_PER_TEAM;
    for _ in 0..max_iterations {
        // Parity floor: an odd number of games can't split evenly.
        let worst = tids
            .iter()
            .copied()
            .filter(|t| diff[t].abs() > 1)
            .max_by_key(|t| (diff[t].abs(), std::cmp::Reverse(*t)));
        let Some(team) = worst else {
            break;
        };
        let too_many_home = diff[&team] > 0;

        // Games the team could flip to move its differential toward zero.
        let flippable: Vec<usize> = matchups
            .iter()
            .enumerate()
            .filter(|(_, m)| if too_many_home { m.home == team } else { m.away == team })
            .map(|(i, _)| i)
            .collect();
        if flippable.is_empty() {
            break;
        }

        // Prefer an opponent that is unbalanced the other way.
        let helpful: Vec<usize> = flippable
            .iter()
            .copied()
            .filter(|&i| {
                let opponent = if too_many_home { matchups[i].away } else { matchups[i].home };
                if too_many_home {
                    diff[&opponent] < 0
                } else {
                    diff[&opponent] > 0
                }
            })
            .collect();

        let index = if !helpful.is_empty() {
            helpful[rng.gen_range(0..helpful.len())]
        } else if rng.gen_bool(0.5) {
            flippable[rng.gen_range(0..flippable.len())]
        } else {
            continue;
        };

        let m = &mut matchups[index];
        std::mem::swap(&mut m.home, &mut m.away);
        *diff.entry(m.home).or_default() += 2;
        *diff.entry(m.away).or_default() -= 2;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::games_per_team;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_round_robin_unique_pairs() {
        for n in 2..=9u32 {
            let tids: Vec<TeamId> = (0..n).collect();
            let pairs = round_robin(&tids);
            assert_eq!(pairs.len(), (n * (n - 1) / 2) as usize, "n = {}", n);

            let mut seen = std::collections::HashSet::new();
            for (a, b) in pairs {
                assert_ne!(a, b);
                assert!(seen.insert((a.min(b), a.max(b))));
            }
        }
    }

    #[test]
    fn test_five_teams_three_games() {
        let tids: Vec<TeamId> = (0..5).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let matchups = generate(&tids, 3, &mut rng);
        assert_eq!(matchups.len(), 7);

        let counts = games_per_team(&matchups);
        let mut totals: Vec<u32> = tids
            .iter()
            .map(|t| counts.get(t).map(|(h, a)| h + a).unwrap_or(0))
            .collect();
        totals.sort_unstable();
        assert_eq!(totals, vec![2, 3, 3, 3, 3]);
    }

    #[test]
    fn test_even_product_is_exact() {
        let tids: Vec<TeamId> = (0..8).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let matchups = generate(&tids, 20, &mut rng);
        assert_eq!(matchups.len(), 80);
        for (_, (home, away)) in games_per_team(&matchups) {
            assert_eq!(home + away, 20);
        }
    }

    #[test]
    fn test_home_away_balanced() {
        let tids: Vec<TeamId> = (0..10).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let matchups = generate(&tids, 16, &mut rng);
        for (tid, (home, away)) in games_per_team(&matchups) {
            assert!((home as i32 - away as i32).abs() <= 1, "team {} {}-{}", tid, home, away);
        }
    }

    #[test]
    fn test_zero_games() {
        let tids: Vec<TeamId> = (0..4).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(generate(&tids, 0, &mut rng).is_empty());
    }
}
