use super::Season;
use serde::{Deserialize, Serialize};

/// Player contract. `amount` is in thousands per season, `exp` is the last
/// season the contract covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub amount: u32,
    pub exp: Season,
    #[serde(default)]
    pub rookie: bool,
}

impl Contract {
    pub fn new(amount: u32, exp: Season) -> Self {
        Self { amount, exp, rookie: false }
    }

    pub fn rookie(amount: u32, exp: Season) -> Self {
        Self { amount, exp, rookie: true }
    }

    /// Contract runs out at the end of `season`.
    pub fn expires_after(&self, season: Season) -> bool {
        self.exp <= season
    }

    pub fn years_remaining(&self, season: Season) -> i32 {
        (self.exp - season).max(0)
    }
}

/// Round a contract amount to the nearest 10 (thousand).
pub fn round_amount(amount: f64) -> u32 {
    if amount <= 0.0 {
        return 0;
    }
    ((amount / 10.0).round() * 10.0) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_amount() {
        assert_eq!(round_amount(1234.0), 1230);
        assert_eq!(round_amount(1235.0), 1240);
        assert_eq!(round_amount(-5.0), 0);
    }

    #[test]
    fn test_expiry() {
        let contract = Contract::new(5000, 2025);
        assert!(contract.expires_after(2025));
        assert!(!contract.expires_after(2024));
        assert_eq!(contract.years_remaining(2023), 2);
    }
}
