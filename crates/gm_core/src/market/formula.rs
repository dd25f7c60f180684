//! Closed-form contract pricing.
//!
//! Used when the auction is skipped (zero rounds or collapsed bounds), for
//! undrafted prospects, and for the expiration of every priced contract.

use crate::config::{FreeAgencyConfig, SalaryCapConfig};
use crate::models::{round_amount, Contract, Phase, Season};

/// Fitted expected contract length in seasons.
pub fn contract_years(age: i32, ovr: u8, pot: u8) -> f64 {
    4.2 - 0.2 * (age - 27) as f64 + 0.02 * (ovr as f64 - 50.0) - 0.03 * (pot as f64 - ovr as f64)
}

/// First season a contract signed during `phase` pays for.
pub fn first_contract_season(season: Season, phase: Phase) -> Season {
    if phase.is_offseason() {
        season + 1
    } else {
        season
    }
}

/// Last season covered by a contract of the fitted length, clamped to the
/// league's contract length bounds.
pub fn expiration(
    age: i32,
    ovr: u8,
    pot: u8,
    salary: &SalaryCapConfig,
    season: Season,
    phase: Phase,
) -> Season {
    let years = contract_years(age, ovr, pot)
        .round()
        .clamp(salary.min_contract_length as f64, salary.max_contract_length as f64)
        as Season;
    first_contract_season(season, phase) + years - 1
}

/// Amount from player value alone: scales linearly from the minimum around
/// value 46 up to the maximum around value 76.
pub fn amount_from_value(value: f64, salary: &SalaryCapConfig) -> u32 {
    let min = salary.min_contract as f64;
    let max = salary.max_contract as f64;
    let raw = min + ((value - 1.0) / 100.0 - 0.45) * 3.3 * (max - min);
    clamp_amount(round_amount(raw.clamp(min, max)), salary)
}

/// Clamp to [min, max] after rounding, so rounding never escapes the bounds.
pub fn clamp_amount(amount: u32, salary: &SalaryCapConfig) -> u32 {
    amount.clamp(salary.min_contract, salary.max_contract)
}

/// Rookie scale amount for a 0-based overall pick. Picks past the end of
/// the scale get its last entry; without a scale, `None`.
pub fn rookie_scale_amount(overall: usize, salary: &SalaryCapConfig) -> Option<u32> {
    let scale = salary.rookie_scale.as_ref()?;
    let amount = scale.get(overall).or_else(|| scale.last())?;
    Some(clamp_amount(*amount, salary))
}

/// Position on a rookie scale laid out for `scale_teams` picks per round of
/// a pick made in a league of `num_teams`. Leagues that grew or shrank since
/// the scale was written keep first-rounders on first-round pay.
pub fn scale_pick(overall: usize, num_teams: usize, scale_teams: usize) -> usize {
    if num_teams == 0 || num_teams == scale_teams {
        return overall;
    }
    overall * scale_teams / num_teams
}

/// Contract for a drafted player. First-rounders sign for three seasons,
/// later rounds for two.
pub fn rookie_contract(
    overall: usize,
    round: u8,
    value: f64,
    salary: &SalaryCapConfig,
    season: Season,
) -> Contract {
    let amount =
        rookie_scale_amount(overall, salary).unwrap_or_else(|| amount_from_value(value, salary));
    let years = if round <= 1 { 3 } else { 2 };
    let years = years.clamp(salary.min_contract_length, salary.max_contract_length) as Season;
    Contract::rookie(amount, season + years)
}

/// Fraction a free agent knocks off the asking price after `days` unsigned.
pub fn mood_discount(days: u32, fa: &FreeAgencyConfig) -> f64 {
    if fa.days == 0 {
        return 0.0;
    }
    fa.max_mood_discount * days.min(fa.days) as f64 / fa.days as f64
}

/// Lowest amount the player accepts today.
pub fn willing_amount(asking: u32, days: u32, fa: &FreeAgencyConfig, salary: &SalaryCapConfig) -> u32 {
    let discounted = asking as f64 * (1.0 - mood_discount(days, fa));
    clamp_amount(round_amount(discounted), salary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_from_value_bounds() {
        let salary = SalaryCapConfig::default();
        assert_eq!(amount_from_value(10.0, &salary), salary.min_contract);
        assert_eq!(amount_from_value(99.0, &salary), salary.max_contract);

        let mid = amount_from_value(60.0, &salary);
        assert!(mid > salary.min_contract && mid < salary.max_contract);
        assert_eq!(mid % 10, 0);
    }

    #[test]
    fn test_amount_monotonic_in_value() {
        let salary = SalaryCapConfig::default();
        let mut last = 0;
        for v in 0..100 {
            let amount = amount_from_value(v as f64, &salary);
            assert!(amount >= last);
            last = amount;
        }
    }

    #[test]
    fn test_expiration_phase_offset() {
        let salary = SalaryCapConfig::default();
        // 27-year-old average player: 4 seasons
        assert_eq!(expiration(27, 50, 50, &salary, 2025, Phase::FreeAgency), 2029);
        assert_eq!(expiration(27, 50, 50, &salary, 2025, Phase::RegularSeason), 2028);
    }

    #[test]
    fn test_expiration_clamped() {
        let salary = SalaryCapConfig::default();
        // Old players get the minimum length, young stars the maximum.
        assert_eq!(expiration(42, 45, 45, &salary, 2025, Phase::ResignPlayers), 2026);
        assert_eq!(expiration(19, 80, 80, &salary, 2025, Phase::ResignPlayers), 2030);
    }

    #[test]
    fn test_rookie_contract() {
        let salary = SalaryCapConfig {
            rookie_scale: Some(vec![5_000, 4_000, 1_100]),
            ..SalaryCapConfig::default()
        };
        let first = rookie_contract(0, 1, 70.0, &salary, 2025);
        assert_eq!(first, Contract::rookie(5_000, 2028));

        let late = rookie_contract(40, 2, 70.0, &salary, 2025);
        assert_eq!(late, Contract::rookie(1_100, 2027));

        let unscaled = rookie_contract(0, 1, 40.0, &SalaryCapConfig::default(), 2025);
        assert_eq!(unscaled.amount, 1_100);
    }

    #[test]
    fn test_scale_pick_maps_expanded_league() {
        assert_eq!(scale_pick(7, 30, 30), 7);
        // 32 teams on a 30-team scale: the last first-rounders stay in round one.
        assert_eq!(scale_pick(30, 32, 30), 28);
        assert_eq!(scale_pick(31, 32, 30), 29);
        assert_eq!(scale_pick(32, 32, 30), 30);
        assert_eq!(scale_pick(3, 0, 30), 3);
    }

    #[test]
    fn test_mood_discount_caps_at_budget() {
        let fa = FreeAgencyConfig::default();
        assert_eq!(mood_discount(0, &fa), 0.0);
        assert!((mood_discount(15, &fa) - 0.075).abs() < 1e-9);
        assert!((mood_discount(300, &fa) - fa.max_mood_discount).abs() < 1e-9);

        let salary = SalaryCapConfig::default();
        assert_eq!(willing_amount(10_000, 30, &fa, &salary), 8_500);
        assert_eq!(willing_amount(1_100, 30, &fa, &salary), 1_100);
    }
}
