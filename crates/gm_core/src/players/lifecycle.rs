use super::refresh_value;
use crate::models::{Player, Season};
use rand::Rng;
use rand_distr::{Distribution, Normal};

/// Mean and spread of the yearly overall change by age.
fn progression(age: i32) -> (f64, f64) {
    match age {
        i32::MIN..=21 => (4.0, 3.0),
        22..=25 => (2.0, 2.5),
        26..=29 => (0.0, 2.0),
        30..=32 => (-2.0, 2.0),
        _ => (-4.0, 2.5),
    }
}

/// One offseason of development. Call after the season counter moved on.
pub fn develop(player: &mut Player, season: Season, rng: &mut impl Rng) {
    let age = player.age(season);
    let (mean, sd) = progression(age);
    let delta = Normal::new(mean, sd).map(|n| n.sample(rng)).unwrap_or(mean);

    let ovr = (player.ratings.ovr as f64 + delta).round().clamp(0.0, 100.0) as u8;
    let pot = if age >= 29 {
        ovr
    } else {
        let drift = Normal::new(0.0, 2.0).map(|n| n.sample(rng)).unwrap_or(0.0);
        ((player.ratings.pot as f64 + drift).round().clamp(0.0, 100.0) as u8).max(ovr)
    };

    player.ratings.ovr = ovr;
    player.ratings.pot = pot;
    refresh_value(player, season);
}

/// Retirement roll at the end of a season.
pub fn should_retire(player: &Player, season: Season, rng: &mut impl Rng) -> bool {
    let age = player.age(season);
    if age > 40 {
        return true;
    }

    let chance = if age >= 35 {
        0.2 + 0.1 * (age - 35) as f64 - 0.01 * (player.value - 50.0)
    } else if player.is_free_agent() && age >= 30 && player.value < 45.0 {
        0.5
    } else {
        0.0
    };
    chance > 0.0 && rng.gen_bool(chance.min(1.0))
}

/// Reveal a player as older than listed. Returns the years added.
pub fn age_fraud(player: &mut Player, season: Season, rng: &mut impl Rng) -> i32 {
    let years = rng.gen_range(1..=3);
    player.born_year -= years;
    player.awards.push(format!("{} age revision", season));
    refresh_value(player, season);
    years
}
