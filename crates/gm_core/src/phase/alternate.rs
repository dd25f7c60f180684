//! Alternate tracks. Both drafts move existing players between teams and
//! keep their contracts.

use super::roster::release_player;
use super::{AdvanceConditions, PhaseHandler, PhaseOutcome};
use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::models::{Phase, Player, RosterStatus, Team, TeamId};
use crate::store::LeagueStoreExt;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use tracing::info;

fn by_value_desc(players: &mut [Player]) {
    players.sort_by(|a, b| b.value.total_cmp(&a.value).then(a.pid.cmp(&b.pid)));
}

/// Pick order of `round` in a snake draft.
fn snake_order(order: &[TeamId], round: usize) -> Vec<TeamId> {
    if round % 2 == 0 {
        order.to_vec()
    } else {
        order.iter().rev().copied().collect()
    }
}

/// Every rostered player goes into one pool and teams take turns picking
/// in a random snake order. Players left over once a full round can no
/// longer be made become free agents.
pub struct FantasyDraft;

impl PhaseHandler for FantasyDraft {
    fn phase(&self) -> Phase {
        Phase::FantasyDraft
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let mut order: Vec<TeamId> = ctx.store.teams().iter().map(|t| t.tid).collect();
        order.shuffle(ctx.rng);

        let mut pool: Vec<Player> =
            ctx.store.players().into_iter().filter(|p| p.tid().is_some()).collect();
        by_value_desc(&mut pool);

        let rounds = if order.is_empty() { 0 } else { pool.len() / order.len() };
        let mut pool = pool.into_iter();
        for round in 0..rounds {
            for tid in snake_order(&order, round) {
                let Some(mut player) = pool.next() else {
                    break;
                };
                player.status = RosterStatus::Team(tid);
                ctx.store.put_player(player);
            }
        }

        let mut leftover = 0;
        for player in pool {
            release_player(ctx.store, ctx.config, player);
            leftover += 1;
        }

        info!(teams = order.len(), rounds, leftover, "Fantasy draft complete");
        Ok(PhaseOutcome::refresh(&[UpdateTag::PlayerMovement, UpdateTag::TeamFinances])
            .with_redirect("/draft"))
    }
}

/// New teams join and draft unprotected players from the existing teams.
pub struct ExpansionDraft;

impl PhaseHandler for ExpansionDraft {
    fn phase(&self) -> Phase {
        Phase::ExpansionDraft
    }

    fn precheck(&self, ctx: &LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<()> {
        let Some(settings) = conditions.expansion.as_ref().filter(|s| !s.teams.is_empty()) else {
            return Err(GmError::InvalidConfig("expansion draft needs at least one new team".to_string()));
        };
        for team in &settings.teams {
            let known = ctx.config.divisions.iter().any(|d| d.did == team.did && d.cid == team.cid);
            if !known {
                return Err(GmError::InvalidConfig(format!(
                    "expansion team {} {} references unknown division {} in conference {}",
                    team.region, team.name, team.did, team.cid
                )));
            }
        }
        Ok(())
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let settings = conditions
            .expansion
            .as_ref()
            .ok_or_else(|| GmError::InvalidConfig("expansion draft settings missing".to_string()))?;
        let season = ctx.store.season();
        let existing = ctx.store.teams();

        let mut next_tid = existing.iter().map(|t| t.tid + 1).max().unwrap_or(0);
        let mut new_tids = Vec::with_capacity(settings.teams.len());
        for spec in &settings.teams {
            let team = Team::new(next_tid, &spec.region, &spec.name, spec.cid, spec.did, season);
            info!(tid = team.tid, name = %team.full_name(), "Expansion team added");
            ctx.store.put_team(team);
            new_tids.push(next_tid);
            next_tid += 1;
        }

        let mut pool = Vec::new();
        for team in &existing {
            let mut roster = ctx.store.roster(team.tid);
            by_value_desc(&mut roster);
            pool.extend(roster.into_iter().skip(settings.protected_per_team));
        }
        by_value_desc(&mut pool);

        let mut lost: HashMap<TeamId, usize> = HashMap::new();
        let mut drafted = 0;
        'rounds: for round in 0..ctx.config.roster.min_roster_size {
            for tid in snake_order(&new_tids, round) {
                let eligible = pool.iter().position(|p| {
                    p.tid().map_or(false, |from| {
                        lost.get(&from).copied().unwrap_or(0) < settings.max_lost_per_team
                    })
                });
                let Some(index) = eligible else {
                    break 'rounds;
                };

                let mut player = pool.remove(index);
                if let Some(from) = player.tid() {
                    *lost.entry(from).or_default() += 1;
                }
                player.status = RosterStatus::Team(tid);
                ctx.store.put_player(player);
                drafted += 1;
            }
        }

        info!(teams = new_tids.len(), drafted, "Expansion draft complete");
        Ok(PhaseOutcome::refresh(&[UpdateTag::PlayerMovement, UpdateTag::TeamFinances])
            .with_redirect("/draft"))
    }
}
