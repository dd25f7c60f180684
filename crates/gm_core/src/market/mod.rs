//! # Contract market
//!
//! Prices contract demands by simulating an auction between all teams
//! rather than reading them off a formula, so prices reflect how much cap
//! space the league has and how many comparable players compete for it.
//!
//! [`normalize`] works on plain market views and returns the priced
//! contracts. [`normalize_league`] gathers the participants from the record
//! store according to a [`NormalizeMode`] and writes the results back.

pub mod auction;
pub mod formula;

use crate::config::{CapType, LeagueConfig, MarketConfig, SalaryCapConfig};
use crate::models::{round_amount, Contract, Phase, Player, PlayerId, RosterStatus, Season, TeamCapInfo, TeamId};
use crate::store::{LeagueStore, LeagueStoreExt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizeMode {
    /// Free agents, plus this year's draft prospects when a rookie scale is set
    FreeAgentsOnly,
    /// Also price rostered players whose contract expires this season
    IncludeExpiringContracts,
    /// Expiring rostered players bid as dummies: they absorb cap space but
    /// keep their current demand
    DummyExpiringContracts,
}

/// Auction view of a player.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketPlayer {
    pub pid: PlayerId,
    pub value: f64,
    pub age: i32,
    pub ovr: u8,
    pub pot: u8,
    /// Working demand, adjusted every round
    pub amount: f64,
    /// Takes part in bidding but its price is discarded
    pub dummy: bool,
    /// Projected overall pick for draft prospects
    pub rookie_rank: Option<usize>,
}

impl MarketPlayer {
    pub fn from_player(player: &Player, season: Season, amount: u32) -> Self {
        Self {
            pid: player.pid,
            value: player.value,
            age: player.age(season),
            ovr: player.ratings.ovr,
            pot: player.ratings.pot,
            amount: amount as f64,
            dummy: false,
            rookie_rank: None,
        }
    }
}

/// League settings one pricing run reads.
#[derive(Debug, Clone, Copy)]
pub struct MarketContext<'a> {
    pub salary: &'a SalaryCapConfig,
    pub market: &'a MarketConfig,
    /// Teams currently in the league
    pub num_teams: usize,
    /// Teams the rookie scale was laid out for
    pub scale_teams: usize,
    pub season: Season,
    pub phase: Phase,
}

impl<'a> MarketContext<'a> {
    pub fn new(config: &'a LeagueConfig, season: Season, phase: Phase) -> Self {
        Self {
            salary: &config.salary,
            market: &config.market,
            num_teams: config.num_teams,
            scale_teams: config.num_teams,
            season,
            phase,
        }
    }

    pub fn with_num_teams(mut self, num_teams: usize) -> Self {
        self.num_teams = num_teams;
        self
    }

    /// Auction skipped: no rounds configured or nothing to negotiate.
    pub fn uses_formula(&self) -> bool {
        self.market.auction_rounds == 0 || self.salary.min_contract == self.salary.max_contract
    }
}

/// Price every non-dummy player. Working amounts in `players` are updated
/// in place; the returned map holds the final contracts.
pub fn normalize(
    players: &mut [MarketPlayer],
    teams: &[TeamCapInfo],
    ctx: &MarketContext<'_>,
    rng: &mut impl Rng,
) -> BTreeMap<PlayerId, Contract> {
    if ctx.uses_formula() {
        for player in players.iter_mut() {
            player.amount = formula::amount_from_value(player.value, ctx.salary) as f64;
        }
    } else {
        auction::run(players, teams, ctx.salary, ctx.market, rng);
    }

    players.iter().filter(|p| !p.dummy).map(|p| (p.pid, finalize(p, ctx))).collect()
}

fn finalize(player: &MarketPlayer, ctx: &MarketContext<'_>) -> Contract {
    if let Some(rank) = player.rookie_rank {
        if ctx.salary.rookie_scale.is_some() {
            let round = if rank < ctx.num_teams.max(1) { 1 } else { 2 };
            let index = formula::scale_pick(rank, ctx.num_teams, ctx.scale_teams);
            return formula::rookie_contract(index, round, player.value, ctx.salary, ctx.season);
        }
    }

    let amount = formula::clamp_amount(round_amount(player.amount), ctx.salary);
    let exp = formula::expiration(player.age, player.ovr, player.pot, ctx.salary, ctx.season, ctx.phase);
    Contract::new(amount, exp)
}

/// Cap view of every team, optionally ignoring the contracts in `released`.
pub fn team_cap_info(
    store: &dyn LeagueStore,
    config: &LeagueConfig,
    released: &HashMap<TeamId, (u32, usize)>,
) -> Vec<TeamCapInfo> {
    store
        .teams()
        .iter()
        .map(|team| {
            let (released_pay, released_spots) = released.get(&team.tid).copied().unwrap_or((0, 0));
            let payroll = store.payroll(team.tid).saturating_sub(released_pay);
            let roster = store.roster_size(team.tid).saturating_sub(released_spots);
            let cap_space = match config.salary.cap_type {
                CapType::None => f64::INFINITY,
                CapType::Soft | CapType::Hard => config.salary.salary_cap as f64 - payroll as f64,
            };
            TeamCapInfo {
                tid: team.tid,
                cap_space,
                roster_spots: config.roster.max_roster_size.saturating_sub(roster),
            }
        })
        .collect()
}

/// Gather participants from the store, run [`normalize`] and write the
/// results back: asking contracts for free agents and prospects, re-signing
/// demands for rostered players. Returns how many players were priced.
pub fn normalize_league(
    store: &mut dyn LeagueStore,
    config: &LeagueConfig,
    mode: NormalizeMode,
    rng: &mut impl Rng,
) -> usize {
    let attributes = store.attributes().clone();
    let season = attributes.season;
    let ctx = MarketContext::new(config, season, attributes.phase).with_num_teams(store.teams().len());

    let mut participants = Vec::new();
    let mut prospects = Vec::new();
    let mut released: HashMap<TeamId, (u32, usize)> = HashMap::new();

    for player in store.players() {
        match player.status {
            RosterStatus::FreeAgent => {
                participants.push(MarketPlayer::from_player(&player, season, player.contract.amount));
            }
            RosterStatus::Undrafted
                if player.draft.year == season && config.salary.rookie_scale.is_some() =>
            {
                prospects.push(player);
            }
            RosterStatus::Team(tid)
                if mode != NormalizeMode::FreeAgentsOnly && player.contract.expires_after(season) =>
            {
                let asking = player
                    .demand
                    .map(|d| d.amount)
                    .unwrap_or_else(|| formula::amount_from_value(player.value, &config.salary));
                let mut view = MarketPlayer::from_player(&player, season, asking);
                view.dummy = mode == NormalizeMode::DummyExpiringContracts;
                participants.push(view);

                let entry = released.entry(tid).or_default();
                entry.0 += player.contract.amount;
                entry.1 += 1;
            }
            _ => {}
        }
    }

    prospects.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.pid.cmp(&b.pid)));
    for (rank, prospect) in prospects.iter().enumerate() {
        let mut view = MarketPlayer::from_player(prospect, season, prospect.contract.amount);
        view.rookie_rank = Some(rank);
        participants.push(view);
    }

    let teams = team_cap_info(&*store, config, &released);
    let contracts = normalize(&mut participants, &teams, &ctx, rng);

    for (pid, contract) in &contracts {
        let Some(mut player) = store.player(*pid) else {
            continue;
        };
        match player.status {
            RosterStatus::Team(_) => player.demand = Some(*contract),
            _ => player.contract = *contract,
        }
        store.put_player(player);
    }

    let dummies = participants.iter().filter(|p| p.dummy).count();
    info!(
        ?mode,
        priced = contracts.len(),
        dummies,
        teams = teams.len(),
        formula = ctx.uses_formula(),
        "Normalized contract demands"
    );
    contracts.len()
}
