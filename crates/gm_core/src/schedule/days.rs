use crate::models::{ScheduleEntry, TeamId};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

/// Spread matchups over days so no team plays twice on the same day.
///
/// Matchups are shuffled, packed first-fit into day buckets, the buckets are
/// shuffled and flattened. Days start at 1 and `gid` runs from 0 in the
/// returned order.
pub fn assign_days(mut matchups: Vec<ScheduleEntry>, rng: &mut impl Rng) -> Vec<ScheduleEntry> {
    matchups.shuffle(rng);

    let mut days: Vec<(HashSet<TeamId>, Vec<ScheduleEntry>)> = Vec::new();
    for matchup in matchups {
        let slot = days
            .iter()
            .position(|(busy, _)| !busy.contains(&matchup.home) && !busy.contains(&matchup.away));
        let index = match slot {
            Some(index) => index,
            None => {
                days.push((HashSet::new(), Vec::new()));
                days.len() - 1
            }
        };
        let (busy, games) = &mut days[index];
        busy.insert(matchup.home);
        busy.insert(matchup.away);
        games.push(matchup);
    }

    days.shuffle(rng);

    let mut schedule = Vec::new();
    for (day, (_, games)) in days.into_iter().enumerate() {
        for mut entry in games {
            entry.day = day as u32 + 1;
            entry.gid = schedule.len() as u32;
            schedule.push(entry);
        }
    }
    schedule
}
