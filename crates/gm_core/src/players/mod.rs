//! Player lifecycle outside of contracts: value, yearly development,
//! generation of new players and retirement.

pub mod generate;
pub mod lifecycle;

pub use generate::{generate_draft_class, generate_player, PlayerTemplate};
pub use lifecycle::{age_fraud, develop, should_retire};

use crate::models::{Player, Ratings, Season};

/// Skill proxy used for pricing, signings and awards. Young players are
/// valued partly on potential, players past 29 lose value each year.
pub fn compute_value(ratings: Ratings, age: i32) -> f64 {
    let ovr = ratings.ovr as f64;
    let pot = ratings.pot.max(ratings.ovr) as f64;

    let pot_weight = match age {
        i32::MIN..=19 => 0.7,
        20..=22 => 0.5,
        23..=25 => 0.25,
        _ => 0.0,
    };
    let mut value = pot_weight * pot + (1.0 - pot_weight) * ovr;

    if age >= 30 {
        value *= (1.0 - 0.025 * (age - 29) as f64).max(0.5);
    }
    value
}

pub fn refresh_value(player: &mut Player, season: Season) {
    player.value = compute_value(player.ratings, player.age(season));
}
