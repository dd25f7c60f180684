//! # Schedule generation
//!
//! Two generators produce the raw list of home/away pairings:
//! - [`constrained`] for the canonical league shape (2 conferences, equal
//!   divisions, the sport's standard game count). Game counts per opponent
//!   are stratified by division and conference membership.
//! - [`balanced`] for every other team/game count: circle-method round robin
//!   with per-team game counters and a home/away balancing pass.
//!
//! Both outputs go through [`days::assign_days`], which spreads the games
//! over days with no team playing twice on the same day.

pub mod balanced;
pub mod constrained;
pub mod days;

use crate::config::LeagueConfig;
use crate::error::{GmError, Result};
use crate::models::{ScheduleEntry, Team, TeamId};
use rand::Rng;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Teams of one conference grouped by division.
#[derive(Debug, Clone, PartialEq)]
pub struct ConferenceShape {
    pub cid: u32,
    pub divisions: Vec<Vec<TeamId>>,
}

impl ConferenceShape {
    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.divisions.iter().flatten().copied()
    }

    pub fn size(&self) -> usize {
        self.divisions.iter().map(Vec::len).sum()
    }
}

/// Canonical league shape and the derived quota of extra home games each
/// team gets against same-conference, other-division opponents.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalShape {
    pub conferences: [ConferenceShape; 2],
    pub division_size: usize,
    pub extra_home_games: usize,
}

impl CanonicalShape {
    /// Detect the canonical shape. Returns `None` for any other league.
    pub fn detect(teams: &[Team], config: &LeagueConfig) -> Option<Self> {
        if config.num_games != config.sport.canonical_games() {
            return None;
        }

        let mut by_conf: BTreeMap<u32, BTreeMap<u32, Vec<TeamId>>> = BTreeMap::new();
        for team in teams {
            by_conf.entry(team.cid).or_default().entry(team.did).or_default().push(team.tid);
        }
        if by_conf.len() != 2 {
            return None;
        }

        let shapes: Vec<ConferenceShape> = by_conf
            .into_iter()
            .map(|(cid, divs)| ConferenceShape { cid, divisions: divs.into_values().collect() })
            .collect();

        let num_divs = shapes[0].divisions.len();
        if num_divs == 0 || shapes[1].divisions.len() != num_divs {
            return None;
        }
        let division_size = shapes[0].divisions[0].len();
        if division_size == 0
            || shapes.iter().flat_map(|s| s.divisions.iter()).any(|d| d.len() != division_size)
        {
            return None;
        }

        let conf_size = division_size * num_divs;
        let others_in_conf = conf_size - division_size;
        // 2 home games each way in division, 1 home each way elsewhere.
        let fixed = 4 * (division_size - 1) + 2 * conf_size + 2 * others_in_conf;
        let games = config.num_games as usize;
        if games < fixed || (games - fixed) % 2 != 0 {
            return None;
        }
        let extra_home_games = (games - fixed) / 2;
        if extra_home_games > others_in_conf {
            return None;
        }

        let [first, second]: [ConferenceShape; 2] = shapes.try_into().ok()?;
        Some(Self { conferences: [first, second], division_size, extra_home_games })
    }
}

/// Generate a full season schedule for `teams`.
///
/// The entries come back day-ordered with `day` starting at 1 and `gid`
/// numbered from 0; callers offset the ids into their own id space.
pub fn generate(
    teams: &[Team],
    config: &LeagueConfig,
    rng: &mut impl Rng,
) -> Result<Vec<ScheduleEntry>> {
    if teams.len() < 2 {
        return Err(GmError::InvalidConfig(format!(
            "a schedule needs at least 2 teams, got {}",
            teams.len()
        )));
    }

    let matchups = match CanonicalShape::detect(teams, config) {
        Some(shape) => {
            debug!(
                division_size = shape.division_size,
                extra_home_games = shape.extra_home_games,
                "Using constrained schedule generator"
            );
            constrained::generate(&shape, rng)?
        }
        None => {
            debug!(teams = teams.len(), games = config.num_games, "Using balanced schedule generator");
            let tids: Vec<TeamId> = teams.iter().map(|t| t.tid).collect();
            balanced::generate(&tids, config.num_games, rng)
        }
    };

    let schedule = days::assign_days(matchups, rng);
    info!(
        games = schedule.len(),
        days = schedule.last().map(|e| e.day).unwrap_or(0),
        "Generated schedule"
    );
    Ok(schedule)
}

/// Games per team in a schedule, keyed by team id.
pub fn games_per_team(schedule: &[ScheduleEntry]) -> BTreeMap<TeamId, (u32, u32)> {
    let mut counts: BTreeMap<TeamId, (u32, u32)> = BTreeMap::new();
    for entry in schedule {
        counts.entry(entry.home).or_default().0 += 1;
        counts.entry(entry.away).or_default().1 += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Conference, Division};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn league_teams(config: &LeagueConfig) -> Vec<Team> {
        (0..config.num_teams)
            .map(|i| {
                let div = config.division_for_team(i).unwrap();
                Team::new(i as u32, &format!("City {}", i), "Team", div.cid, div.did, 2025)
            })
            .collect()
    }

    #[test]
    fn test_detect_canonical_basketball() {
        let config = LeagueConfig::basketball();
        let teams = league_teams(&config);
        let shape = CanonicalShape::detect(&teams, &config).expect("canonical shape");
        assert_eq!(shape.division_size, 5);
        assert_eq!(shape.extra_home_games, 8);
        assert_eq!(shape.conferences[0].size(), 15);
    }

    #[test]
    fn test_detect_rejects_non_canonical_games() {
        let mut config = LeagueConfig::basketball();
        config.num_games = 60;
        let teams = league_teams(&config);
        assert!(CanonicalShape::detect(&teams, &config).is_none());
    }

    #[test]
    fn test_detect_rejects_uneven_divisions() {
        let mut config = LeagueConfig::basketball();
        config.num_teams = 29;
        let teams = league_teams(&config);
        assert!(CanonicalShape::detect(&teams, &config).is_none());
    }

    #[test]
    fn test_detect_rejects_single_conference() {
        let mut config = LeagueConfig::basketball();
        config.conferences = vec![Conference { cid: 0, name: "All".to_string() }];
        config.divisions =
            (0..6).map(|i| Division { did: i, cid: 0, name: format!("D{}", i) }).collect();
        let teams = league_teams(&config);
        assert!(CanonicalShape::detect(&teams, &config).is_none());
    }

    #[test]
    fn test_generate_canonical_total() {
        let config = LeagueConfig::basketball();
        let teams = league_teams(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let schedule = generate(&teams, &config, &mut rng).unwrap();
        assert_eq!(schedule.len(), 1230);
        assert!(schedule.iter().all(|e| e.home != e.away));
    }

    #[test]
    fn test_generate_canonical_same_seed_same_schedule() {
        let config = LeagueConfig::basketball();
        let teams = league_teams(&config);
        for seed in 0..8 {
            let a = generate(&teams, &config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            let b = generate(&teams, &config, &mut ChaCha8Rng::seed_from_u64(seed)).unwrap();
            assert_eq!(a, b, "seed {}", seed);
        }
    }

    #[test]
    fn test_generate_small_league() {
        let config = LeagueConfig::test_league(5, 3);
        let teams = league_teams(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let schedule = generate(&teams, &config, &mut rng).unwrap();
        assert_eq!(schedule.len(), 7);
    }

    #[test]
    fn test_generate_rejects_single_team() {
        let config = LeagueConfig::test_league(2, 3);
        let teams = league_teams(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(generate(&teams[..1], &config, &mut rng).is_err());
    }
}
