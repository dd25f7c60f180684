//! Game results. Play-by-play is out of scope; results come from a
//! [`GameSimulator`], by default a rating-based coin flip.

use crate::config::Sport;
use crate::models::Player;
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};

/// Players counted towards team strength.
const ROTATION_SIZE: usize = 10;
/// Strength of a team that cannot field anyone.
const EMPTY_STRENGTH: f64 = 30.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub home_score: u32,
    pub away_score: u32,
}

pub trait GameSimulator {
    /// `home` and `away` are the full rosters, injured players included.
    fn simulate(&mut self, home: &[Player], away: &[Player], sport: Sport, rng: &mut ChaCha8Rng) -> GameResult;
}

/// Mean overall of the best healthy players.
pub fn team_strength(roster: &[Player]) -> f64 {
    let mut ovrs: Vec<u8> =
        roster.iter().filter(|p| !p.injury.is_injured()).map(|p| p.ratings.ovr).collect();
    if ovrs.is_empty() {
        return EMPTY_STRENGTH;
    }
    ovrs.sort_unstable_by(|a, b| b.cmp(a));
    ovrs.truncate(ROTATION_SIZE);
    ovrs.iter().map(|&o| o as f64).sum::<f64>() / ovrs.len() as f64
}

/// Logistic win probability with home advantage in rating points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSimulator {
    pub home_advantage: f64,
    /// Rating gap that turns even odds into ~73%
    pub scale: f64,
}

impl Default for RatingSimulator {
    fn default() -> Self {
        Self { home_advantage: 1.5, scale: 5.0 }
    }
}

impl RatingSimulator {
    pub fn home_win_probability(&self, home_strength: f64, away_strength: f64) -> f64 {
        let diff = home_strength - away_strength + self.home_advantage;
        1.0 / (1.0 + (-diff / self.scale).exp())
    }
}

/// Typical losing score and margin spread per sport.
fn score_profile(sport: Sport) -> (f64, f64) {
    match sport {
        Sport::Basketball => (100.0, 9.0),
        Sport::Football => (17.0, 8.0),
        Sport::Hockey => (2.0, 1.5),
    }
}

impl GameSimulator for RatingSimulator {
    fn simulate(&mut self, home: &[Player], away: &[Player], sport: Sport, rng: &mut ChaCha8Rng) -> GameResult {
        let p_home = self.home_win_probability(team_strength(home), team_strength(away));
        let (base, spread) = score_profile(sport);

        let loser = Normal::new(base, spread / 2.0).map(|n| n.sample(rng)).unwrap_or(base).round().max(0.0) as u32;
        let margin = if sport.allows_ties() && rng.gen_bool(0.005) {
            0
        } else {
            let raw = Normal::new(0.0, spread).map(|n| n.sample(rng)).unwrap_or(1.0);
            (raw.abs().round() as u32).max(1)
        };

        if rng.gen_bool(p_home.clamp(0.0, 1.0)) {
            GameResult { home_score: loser + margin, away_score: loser }
        } else {
            GameResult { home_score: loser, away_score: loser + margin }
        }
    }
}
