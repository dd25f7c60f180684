use super::compute_value;
use crate::config::{LeagueConfig, SalaryCapConfig};
use crate::market::formula::amount_from_value;
use crate::models::{Contract, DraftInfo, Injury, Player, PlayerId, Ratings, RosterStatus, Season};
use crate::store::{LeagueStore, LeagueStoreExt};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use tracing::debug;

const FIRST_NAMES: &[&str] = &[
    "Aaron", "Andre", "Ben", "Calvin", "Chris", "Damon", "Derek", "Eli", "Felix", "Grant", "Hakeem",
    "Isaiah", "Jalen", "Jamal", "Kevin", "Lamar", "Marcus", "Nate", "Omar", "Paul", "Quinn",
    "Reggie", "Sam", "Terrence", "Tyrese", "Victor", "Wes", "Xavier", "Zach",
];

const LAST_NAMES: &[&str] = &[
    "Allen", "Brooks", "Carter", "Davis", "Ellis", "Fox", "Green", "Harris", "Irving", "Johnson",
    "King", "Lewis", "Moore", "Nash", "Owens", "Parker", "Reed", "Smith", "Thomas", "Walker",
    "Young", "Bridges", "Murray", "Holiday", "Mitchell", "Porter", "Wallace",
];

/// Rating and age ranges for a batch of generated players.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerTemplate {
    pub ovr_mean: f64,
    pub ovr_sd: f64,
    /// Upper bound of the random potential headroom above ovr
    pub max_headroom: u8,
    pub age_range: (i32, i32),
}

impl PlayerTemplate {
    /// Established league player.
    pub fn veteran() -> Self {
        Self { ovr_mean: 50.0, ovr_sd: 8.0, max_headroom: 10, age_range: (21, 34) }
    }

    /// Draft prospect.
    pub fn prospect() -> Self {
        Self { ovr_mean: 38.0, ovr_sd: 7.0, max_headroom: 30, age_range: (19, 22) }
    }
}

fn random_name(rng: &mut impl Rng) -> String {
    let first = FIRST_NAMES.choose(rng).copied().unwrap_or("Player");
    let last = LAST_NAMES.choose(rng).copied().unwrap_or("One");
    format!("{} {}", first, last)
}

/// Generate one player. Ratings are drawn around the template mean; the
/// contract is priced from value alone and runs out after `season`.
pub fn generate_player(
    pid: PlayerId,
    template: PlayerTemplate,
    status: RosterStatus,
    draft_year: Season,
    season: Season,
    salary: &SalaryCapConfig,
    rng: &mut impl Rng,
) -> Player {
    let ovr = Normal::new(template.ovr_mean, template.ovr_sd)
        .map(|n| n.sample(rng))
        .unwrap_or(template.ovr_mean)
        .round()
        .clamp(20.0, 85.0) as u8;
    let pot = ovr.saturating_add(rng.gen_range(0..=template.max_headroom)).min(100);
    let age = rng.gen_range(template.age_range.0..=template.age_range.1);

    let ratings = Ratings { ovr, pot };
    let value = compute_value(ratings, age);

    Player {
        pid,
        name: random_name(rng),
        born_year: season - age,
        status,
        ratings,
        value,
        contract: Contract::new(amount_from_value(value, salary), season),
        demand: None,
        injury: Injury::healthy(),
        draft: DraftInfo::prospect(draft_year),
        free_agent_days: 0,
        retired_year: None,
        awards: Vec::new(),
    }
}

/// Fill the draft class of `year` up to the configured class size.
/// Returns how many prospects were added.
pub fn generate_draft_class(
    store: &mut dyn LeagueStore,
    config: &LeagueConfig,
    year: Season,
    rng: &mut impl Rng,
) -> usize {
    let existing = store
        .players_by_status(RosterStatus::Undrafted)
        .iter()
        .filter(|p| p.draft.year == year)
        .count();
    let missing = config.draft.class_size.saturating_sub(existing);
    let season = store.season();

    for _ in 0..missing {
        let pid = store.allocate_pid();
        let mut prospect = generate_player(
            pid,
            PlayerTemplate::prospect(),
            RosterStatus::Undrafted,
            year,
            season,
            &config.salary,
            rng,
        );
        // Prospects of later classes are younger today.
        prospect.born_year = year - (season - prospect.born_year);
        prospect.contract.exp = year;
        store.put_player(prospect);
    }

    if missing > 0 {
        debug!(year, added = missing, "Generated draft class");
    }
    missing
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GameAttributes;
    use crate::store::MemoryStore;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_generate_player_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let salary = SalaryCapConfig::default();
        for pid in 0..200 {
            let p = generate_player(
                pid,
                PlayerTemplate::veteran(),
                RosterStatus::FreeAgent,
                2015,
                2025,
                &salary,
                &mut rng,
            );
            assert!(p.ratings.pot >= p.ratings.ovr);
            assert!((21..=34).contains(&p.age(2025)));
            assert!(p.contract.amount >= salary.min_contract);
            assert!(p.contract.amount <= salary.max_contract);
        }
    }

    #[test]
    fn test_draft_class_is_topped_up() {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = MemoryStore::new(GameAttributes::new(2025));
        let mut rng = ChaCha8Rng::seed_from_u64(3);

        let added = generate_draft_class(&mut store, &config, 2027, &mut rng);
        assert_eq!(added, config.draft.class_size);
        assert_eq!(generate_draft_class(&mut store, &config, 2027, &mut rng), 0);

        let class = store.players_by_status(RosterStatus::Undrafted);
        assert!(class.iter().all(|p| p.draft.year == 2027));
        assert!(class.iter().all(|p| (19..=22).contains(&p.age(2027))));
    }
}
