use super::roster::{asking_contract, release_player};
use super::{AdvanceConditions, PhaseHandler, PhaseOutcome};
use crate::config::{CapType, LeagueConfig};
use crate::context::LeagueContext;
use crate::draft::{self, draft_order};
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::market::{normalize_league, NormalizeMode};
use crate::models::{Negotiation, Phase, Player, RosterStatus, Season, TeamId, TeamStrategy};
use crate::players::should_retire;
use crate::season::{awards, playoffs};
use crate::store::LeagueStoreExt;
use rand::Rng;
use std::collections::HashMap;
use tracing::info;

/// Awards, retirements and the draft order.
pub struct DraftLottery;

impl PhaseHandler for DraftLottery {
    fn phase(&self) -> Phase {
        Phase::DraftLottery
    }

    fn precheck(&self, ctx: &LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<()> {
        if !playoffs::is_complete(&*ctx.store) {
            return Err(GmError::PhaseIncomplete {
                phase: Phase::Playoffs,
                detail: "no champion yet".to_string(),
            });
        }
        Ok(())
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let season = ctx.store.season();
        awards::compute(ctx.store, season);

        // Only players who are free to leave retire.
        let mut retired = 0;
        for mut player in ctx.store.players() {
            let eligible = match player.status {
                RosterStatus::FreeAgent => true,
                RosterStatus::Team(_) => player.contract.expires_after(season),
                RosterStatus::Undrafted | RosterStatus::Retired => false,
            };
            if eligible && should_retire(&player, season, ctx.rng) {
                player.retire(season);
                ctx.store.put_player(player);
                retired += 1;
            }
        }

        let teams = ctx.store.teams();
        let order = draft_order(&teams, ctx.config.draft.lottery_picks, ctx.rng);
        draft::create_picks(ctx.store, season, ctx.config.draft.num_rounds, &order);

        info!(season, retired, first_pick = ?order.first(), "Draft lottery held");
        Ok(PhaseOutcome::refresh(&[UpdateTag::Draft, UpdateTag::PlayerMovement])
            .with_redirect("/draft_lottery"))
    }
}

/// AI picks up to the first user pick; every pick in auto-play.
pub struct Draft;

impl PhaseHandler for Draft {
    fn phase(&self) -> Phase {
        Phase::Draft
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let made = draft::run_picks(ctx.store, ctx.config, !conditions.auto_play)?;
        info!(picks = made, "Draft started");
        Ok(PhaseOutcome::refresh(&[UpdateTag::Draft, UpdateTag::PlayerMovement]).with_redirect("/draft"))
    }
}

/// Leftover picks are made automatically, the rest of the class goes to
/// free agency.
pub struct AfterDraft;

impl PhaseHandler for AfterDraft {
    fn phase(&self) -> Phase {
        Phase::AfterDraft
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let made = draft::run_picks(ctx.store, ctx.config, false)?;
        let released = draft::release_undrafted(ctx.store, ctx.config);
        info!(picks = made, released, "Draft finished");
        Ok(PhaseOutcome::refresh(&[UpdateTag::Draft, UpdateTag::PlayerMovement]))
    }
}

/// Chance an AI team re-signs a player at his demand.
pub fn resign_probability(player: &Player, strategy: TeamStrategy, season: Season) -> f64 {
    let adjust = match strategy {
        TeamStrategy::Rebuilding if player.age(season) >= 29 => -0.25,
        TeamStrategy::Rebuilding => 0.1,
        TeamStrategy::Contending => 0.0,
    };
    (player.value / 100.0 + adjust).clamp(0.05, 0.95)
}

/// Under a hard cap a team can't re-sign past the cap; otherwise it always
/// can.
fn cap_allows(payroll: u32, old_amount: u32, new_amount: u32, config: &LeagueConfig) -> bool {
    match config.salary.cap_type {
        CapType::Hard => payroll.saturating_sub(old_amount) + new_amount <= config.salary.salary_cap,
        CapType::Soft | CapType::None => true,
    }
}

/// Every expiring contract is resolved: user players go to negotiation,
/// AI teams decide on the spot.
pub struct ResignPlayers;

impl PhaseHandler for ResignPlayers {
    fn phase(&self) -> Phase {
        Phase::ResignPlayers
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        normalize_league(ctx.store, ctx.config, NormalizeMode::IncludeExpiringContracts, ctx.rng);

        let attributes = ctx.store.attributes().clone();
        let season = attributes.season;
        let strategies: HashMap<TeamId, TeamStrategy> =
            ctx.store.teams().iter().map(|t| (t.tid, t.strategy)).collect();

        let (mut negotiations, mut re_signed, mut released) = (0, 0, 0);
        for mut player in ctx.store.players() {
            let RosterStatus::Team(tid) = player.status else {
                continue;
            };
            if !player.contract.expires_after(season) {
                continue;
            }

            if attributes.is_user_team(tid) && !conditions.auto_play {
                ctx.store.put_negotiation(Negotiation { pid: player.pid, tid, resigning: true });
                negotiations += 1;
                continue;
            }

            let demand = player
                .demand
                .unwrap_or_else(|| asking_contract(&player, ctx.config, season, attributes.phase));
            let strategy = strategies.get(&tid).copied().unwrap_or_default();
            let payroll = ctx.store.payroll(tid);
            let keep = cap_allows(payroll, player.contract.amount, demand.amount, ctx.config)
                && ctx.rng.gen_bool(resign_probability(&player, strategy, season));

            if keep {
                player.sign(tid, demand);
                ctx.store.put_player(player);
                re_signed += 1;
            } else {
                release_player(ctx.store, ctx.config, player);
                released += 1;
            }
        }

        info!(season, negotiations, re_signed, released, "Expiring contracts resolved");
        let outcome = PhaseOutcome::refresh(&[
            UpdateTag::PlayerMovement,
            UpdateTag::Negotiation,
            UpdateTag::TeamFinances,
        ]);
        Ok(if negotiations > 0 { outcome.with_redirect("/negotiation") } else { outcome })
    }
}

/// Open negotiations are cancelled (unsigned players leave), demands are
/// repriced and the day budget reset.
pub struct FreeAgency;

impl PhaseHandler for FreeAgency {
    fn phase(&self) -> Phase {
        Phase::FreeAgency
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let season = ctx.store.season();

        let mut released = 0;
        for negotiation in ctx.store.negotiations() {
            ctx.store.delete_negotiation(negotiation.pid);
            let Some(player) = ctx.store.player(negotiation.pid) else {
                continue;
            };
            if player.tid() == Some(negotiation.tid) && player.contract.expires_after(season) {
                release_player(ctx.store, ctx.config, player);
                released += 1;
            }
        }

        let priced = normalize_league(ctx.store, ctx.config, NormalizeMode::FreeAgentsOnly, ctx.rng);
        let days = ctx.config.free_agency.days;
        ctx.store.update_attributes(|a| a.free_agency_days_left = days);

        info!(season, released, priced, days, "Free agency opened");
        Ok(PhaseOutcome::refresh(&[
            UpdateTag::PlayerMovement,
            UpdateTag::Negotiation,
            UpdateTag::GameAttributes,
        ])
        .with_redirect("/free_agents"))
    }
}
