//! Multi-round simulated auction over player demands.

use super::MarketPlayer;
use crate::config::{MarketConfig, SalaryCapConfig};
use crate::models::TeamCapInfo;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashMap;
use tracing::debug;

/// Bids one team may place on the same player in one round.
pub const MAX_BIDS_PER_PLAYER: u8 = 2;

/// Sign-preserving square of the player value.
pub fn bid_weight(value: f64) -> f64 {
    value.signum() * value * value
}

/// Pick an index with probability proportional to `exp(score / temp)`.
/// Scores are shifted by their maximum before exponentiation.
pub fn sample_softmax<R: Rng + ?Sized>(rng: &mut R, scores: &[f64], temp: f64) -> Option<usize> {
    if scores.is_empty() {
        return None;
    }
    let t = temp.max(1e-3);

    let maxv = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let weights: Vec<f64> = scores.iter().map(|s| ((s - maxv) / t).exp()).collect();
    let sum: f64 = weights.iter().sum();
    if !(sum > 0.0) {
        return Some(0);
    }

    let mut r = rng.gen::<f64>() * sum;
    for (i, w) in weights.iter().enumerate() {
        r -= *w;
        if r <= 0.0 {
            return Some(i);
        }
    }
    Some(weights.len() - 1)
}

/// Per-round demand adjustment, cooling linearly from `max_step` to 0.
pub fn round_step(round: u32, rounds: u32, max_step: f64) -> f64 {
    if rounds == 0 {
        return 0.0;
    }
    max_step * (1.0 - round as f64 / rounds as f64)
}

/// Bid counts of one round, indexed like `players`.
pub fn run_round(
    players: &[MarketPlayer],
    teams: &[TeamCapInfo],
    normalized_weights: &[f64],
    salary: &SalaryCapConfig,
    market: &MarketConfig,
    rng: &mut impl Rng,
) -> Vec<u32> {
    let mut bids = vec![0u32; players.len()];
    let mut order: Vec<&TeamCapInfo> = teams.iter().collect();
    order.shuffle(rng);

    let min_contract = salary.min_contract as f64;

    for team in order {
        let mut cap_space = team.cap_space;
        let mut spots = team.roster_spots;
        let mut placed: HashMap<usize, u8> = HashMap::new();

        while cap_space >= min_contract && spots > 0 {
            let available: Vec<usize> = (0..players.len())
                .filter(|&i| {
                    placed.get(&i).copied().unwrap_or(0) < MAX_BIDS_PER_PLAYER
                        && players[i].amount <= cap_space
                })
                .collect();

            let scores: Vec<f64> = available.iter().map(|&i| normalized_weights[i]).collect();
            let Some(pick) = sample_softmax(rng, &scores, market.temperature) else {
                break;
            };
            let i = available[pick];

            bids[i] += 1;
            *placed.entry(i).or_default() += 1;
            cap_space -= players[i].amount;
            spots -= 1;
        }
    }

    bids
}

/// Run the auction, adjusting `amount` of every player in place.
pub fn run(
    players: &mut [MarketPlayer],
    teams: &[TeamCapInfo],
    salary: &SalaryCapConfig,
    market: &MarketConfig,
    rng: &mut impl Rng,
) {
    if players.is_empty() {
        return;
    }

    let weights: Vec<f64> = players.iter().map(|p| bid_weight(p.value)).collect();
    let max_abs = weights.iter().fold(0.0f64, |acc, w| acc.max(w.abs()));
    let normalized: Vec<f64> =
        if max_abs > 0.0 { weights.iter().map(|w| w / max_abs).collect() } else { vec![0.0; weights.len()] };

    let min = salary.min_contract as f64;
    let max = salary.max_contract as f64;

    for round in 0..market.auction_rounds {
        let step = round_step(round, market.auction_rounds, market.max_step);
        let bids = run_round(players, teams, &normalized, salary, market, rng);

        for (player, count) in players.iter_mut().zip(&bids) {
            let factor = match *count {
                0 => 1.0 - step,
                1 => 1.0,
                _ => 1.0 + step,
            };
            player.amount = (player.amount * factor).clamp(min, max);
        }

        if round == 0 || round + 1 == market.auction_rounds {
            let unbid = bids.iter().filter(|&&b| b == 0).count();
            let contested = bids.iter().filter(|&&b| b >= 2).count();
            debug!(round, step, unbid, contested, "Auction round");
        }
    }
}
