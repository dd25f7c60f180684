//! League facade: owns the store, config, random stream, UI bridge and game
//! simulator, and lends them to the season operations as a
//! [`LeagueContext`].

use crate::autoplay::{AutoPlay, AutoPlayReport, AutoPlaySettings};
use crate::config::LeagueConfig;
use crate::context::LeagueContext;
use crate::error::Result;
use crate::events::{LogBridge, UiBridge};
use crate::free_agency::{DayLoopOutcome, FreeAgencyDayLoop, StopHandle};
use crate::market::{normalize_league, NormalizeMode};
use crate::models::{Contract, GameAttributes, Phase, RosterStatus, Season, Team, TeamId, TeamStrategy};
use crate::phase::{AdvanceConditions, PhaseMachine, PhaseOutcome};
use crate::players::{generate_draft_class, generate_player, PlayerTemplate};
use crate::save::{LeagueSnapshot, SnapshotManager};
use crate::season::{self, DayReport, GameSimulator, RatingSimulator};
use crate::store::{LeagueStore, LeagueStoreExt, MemoryStore};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::Path;
use tracing::info;

const REGIONS: &[&str] = &[
    "Atlanta", "Boston", "Brooklyn", "Charlotte", "Chicago", "Cleveland", "Dallas", "Denver",
    "Detroit", "Houston", "Indiana", "Kansas City", "Las Vegas", "Los Angeles", "Memphis", "Miami",
    "Milwaukee", "Minneapolis", "New Orleans", "New York", "Oklahoma City", "Orlando",
    "Philadelphia", "Phoenix", "Portland", "Sacramento", "San Antonio", "San Diego", "Seattle",
    "St. Louis", "Toronto", "Vancouver", "Washington",
];

const NICKNAMES: &[&str] = &[
    "Aces", "Bears", "Comets", "Dragons", "Eagles", "Falcons", "Giants", "Hawks", "Knights",
    "Lions", "Monarchs", "Owls", "Pilots", "Raptors", "Sharks", "Titans", "Vipers", "Wolves",
];

/// Free agents created with a new league, per team.
const INITIAL_FREE_AGENTS_PER_TEAM: usize = 2;

pub struct League {
    store: MemoryStore,
    config: LeagueConfig,
    rng: ChaCha8Rng,
    bridge: Box<dyn UiBridge>,
    sim: Box<dyn GameSimulator>,
}

impl League {
    /// Create a league in the preseason of the configured starting season:
    /// teams over the conference/division topology, initial rosters under
    /// contract, a small free-agent pool and the upcoming draft classes.
    pub fn new(config: LeagueConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let season = config.starting_season;
        let mut store = MemoryStore::new(GameAttributes::new(season));

        for i in 0..config.num_teams {
            let (cid, did) = config.division_for_team(i).map(|d| (d.cid, d.did)).unwrap_or((0, 0));
            let region = REGIONS.get(i).map(|r| r.to_string()).unwrap_or_else(|| format!("City {}", i + 1));
            let name = NICKNAMES[i % NICKNAMES.len()];
            let mut team = Team::new(i as TeamId, &region, name, cid, did, season);
            if rng.gen_bool(0.5) {
                team.strategy = TeamStrategy::Rebuilding;
            }
            store.put_team(team);
        }

        let max_years = config.salary.max_contract_length as Season;
        for tid in 0..config.num_teams as TeamId {
            for _ in 0..config.roster.initial_roster_size {
                let pid = store.allocate_pid();
                let mut player = generate_player(
                    pid,
                    PlayerTemplate::veteran(),
                    RosterStatus::Team(tid),
                    season,
                    season,
                    &config.salary,
                    &mut rng,
                );
                player.draft.year = player.born_year + 20;
                player.contract = Contract::new(player.contract.amount, season + rng.gen_range(0..max_years));
                store.put_player(player);
            }
        }

        for _ in 0..config.num_teams * INITIAL_FREE_AGENTS_PER_TEAM {
            let pid = store.allocate_pid();
            let mut player = generate_player(
                pid,
                PlayerTemplate::veteran(),
                RosterStatus::FreeAgent,
                season,
                season,
                &config.salary,
                &mut rng,
            );
            player.draft.year = player.born_year + 20;
            store.put_player(player);
        }

        for offset in 0..config.draft.future_classes as Season {
            generate_draft_class(&mut store, &config, season + offset, &mut rng);
        }
        normalize_league(&mut store, &config, NormalizeMode::FreeAgentsOnly, &mut rng);

        info!(
            season,
            teams = config.num_teams,
            players = store.player_count(),
            seed,
            "Created new league"
        );
        Ok(Self {
            store,
            config,
            rng,
            bridge: Box::new(LogBridge),
            sim: Box::new(RatingSimulator::default()),
        })
    }

    pub fn with_bridge(mut self, bridge: Box<dyn UiBridge>) -> Self {
        self.bridge = bridge;
        self
    }

    pub fn with_simulator(mut self, sim: Box<dyn GameSimulator>) -> Self {
        self.sim = sim;
        self
    }

    pub fn store(&self) -> &MemoryStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut MemoryStore {
        &mut self.store
    }

    pub fn config(&self) -> &LeagueConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.store.attributes().phase
    }

    pub fn season(&self) -> Season {
        self.store.season()
    }

    pub fn set_user_teams(&mut self, tids: Vec<TeamId>) {
        self.store.update_attributes(|a| a.user_tids = tids);
    }

    fn parts(&mut self) -> (LeagueContext<'_>, &mut dyn GameSimulator) {
        let ctx = LeagueContext::new(&mut self.store, &self.config, &mut self.rng, self.bridge.as_mut());
        (ctx, self.sim.as_mut())
    }

    pub fn advance(&mut self, target: Phase) -> Result<PhaseOutcome> {
        self.advance_with(target, &AdvanceConditions::default())
    }

    pub fn advance_with(&mut self, target: Phase, conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let (mut ctx, _) = self.parts();
        PhaseMachine::advance(&mut ctx, target, conditions)
    }

    /// Advance to the next phase of the linear order.
    pub fn advance_to_next(&mut self) -> Result<PhaseOutcome> {
        let attributes = self.store.attributes();
        let target = attributes.return_phase.filter(|_| attributes.phase.is_alternate());
        let target = target.or_else(|| attributes.phase.next()).unwrap_or(Phase::Preseason);
        self.advance(target)
    }

    pub fn play_day(&mut self) -> Result<Option<DayReport>> {
        let (mut ctx, sim) = self.parts();
        season::play_day(&mut ctx, sim, &AdvanceConditions::default())
    }

    pub fn play_free_agency_days(&mut self, days: u32, stop: StopHandle) -> Result<DayLoopOutcome> {
        let mut day_loop = FreeAgencyDayLoop::new(stop);
        let (mut ctx, _) = self.parts();
        day_loop.run(&mut ctx, days, &AdvanceConditions::default())
    }

    pub fn auto_play(&mut self, settings: AutoPlaySettings, stop: StopHandle) -> Result<AutoPlayReport> {
        let mut driver = AutoPlay::new(settings, stop);
        let (mut ctx, sim) = self.parts();
        driver.run(&mut ctx, sim)
    }

    /// Snapshot of the league. The random stream is re-keyed from a fresh
    /// seed that goes into the snapshot, so this league and one loaded from
    /// the snapshot continue identically.
    pub fn snapshot(&mut self) -> LeagueSnapshot {
        let seed: u64 = self.rng.gen();
        self.rng = ChaCha8Rng::seed_from_u64(seed);
        LeagueSnapshot::new(self.config.clone(), self.store.clone(), seed)
    }

    pub fn from_snapshot(snapshot: LeagueSnapshot) -> Self {
        Self {
            store: snapshot.store,
            config: snapshot.config,
            rng: ChaCha8Rng::seed_from_u64(snapshot.rng_seed),
            bridge: Box::new(LogBridge),
            sim: Box::new(RatingSimulator::default()),
        }
    }

    pub fn save(&mut self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot();
        SnapshotManager::save_to_path(path, &snapshot)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let snapshot = SnapshotManager::load_from_path(path)?;
        info!(season = snapshot.store.attributes().season, "Loaded league snapshot");
        Ok(Self::from_snapshot(snapshot))
    }
}
