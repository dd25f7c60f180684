use crate::models::{Team, TeamId};
use rand::Rng;

/// Draft order for one round, first pick first.
///
/// Non-playoff teams are sorted worst record first. The first
/// `lottery_picks` picks are drawn among all of them without replacement,
/// the i-th worst team weighted `n - i`. Remaining non-playoff teams follow
/// by record, then playoff teams by how far they went and by record.
pub fn draft_order(teams: &[Team], lottery_picks: usize, rng: &mut impl Rng) -> Vec<TeamId> {
    let by_record = |a: &&Team, b: &&Team| {
        a.record
            .win_pct()
            .total_cmp(&b.record.win_pct())
            .then(a.record.wins.cmp(&b.record.wins))
            .then(a.tid.cmp(&b.tid))
    };

    let mut missed: Vec<&Team> = teams.iter().filter(|t| !t.made_playoffs()).collect();
    missed.sort_by(by_record);
    let mut made: Vec<&Team> = teams.iter().filter(|t| t.made_playoffs()).collect();
    made.sort_by(|a, b| a.record.playoff_rounds_won.cmp(&b.record.playoff_rounds_won).then(by_record(a, b)));

    let n = missed.len();
    let mut pool: Vec<(TeamId, u64)> =
        missed.iter().enumerate().map(|(i, t)| (t.tid, (n - i) as u64)).collect();

    let mut order = Vec::with_capacity(teams.len());
    for _ in 0..lottery_picks.min(n) {
        let total: u64 = pool.iter().map(|(_, w)| w).sum();
        if total == 0 {
            break;
        }
        let mut ticket = rng.gen_range(0..total);
        let index = pool
            .iter()
            .position(|(_, w)| {
                if ticket < *w {
                    true
                } else {
                    ticket -= w;
                    false
                }
            })
            .unwrap_or(0);
        order.push(pool.remove(index).0);
    }

    // Lottery losers keep their record order.
    order.extend(pool.into_iter().map(|(tid, _)| tid));
    order.extend(made.into_iter().map(|t| t.tid));
    order
}
