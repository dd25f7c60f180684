//! # Phase state machine
//!
//! The league moves through [`Phase::LINEAR`] one step at a time, with the
//! fantasy and expansion drafts as alternate tracks that are entered from
//! specific phases and left by resuming the phase they interrupted.
//!
//! Every phase has one [`PhaseHandler`] in the table returned by
//! [`handler`]. [`PhaseMachine::advance`] validates the transition, runs the
//! handler's precheck, writes the new phase to the store and only then runs
//! the handler's side effects. A failure inside `enter` leaves the league
//! in the new phase with the side effects incomplete.

mod alternate;
mod offseason;
mod roster;
mod season;

pub use alternate::{ExpansionDraft, FantasyDraft};
pub use offseason::{resign_probability, AfterDraft, Draft, DraftLottery, FreeAgency, ResignPlayers};
pub use roster::{asking_contract, fill_roster, prune_roster, release_player};
pub use season::{Playoffs, Preseason, RegularSeason};

use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::models::{GameAttributes, Phase};
use crate::store::LeagueStoreExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::info;

/// Team added by an expansion draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionTeam {
    pub region: String,
    pub name: String,
    pub cid: u32,
    pub did: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpansionDraftSettings {
    pub teams: Vec<ExpansionTeam>,
    /// Players each existing team keeps out of the pool
    pub protected_per_team: usize,
    /// Most players a single existing team can lose
    pub max_lost_per_team: usize,
}

/// Caller-supplied switches for one transition.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdvanceConditions {
    /// Unattended run: user teams are managed like AI teams
    pub auto_play: bool,
    /// Required when entering the expansion draft
    pub expansion: Option<ExpansionDraftSettings>,
}

impl AdvanceConditions {
    pub fn auto_play() -> Self {
        Self { auto_play: true, ..Self::default() }
    }
}

/// Navigation target and coarse invalidation tags of a transition.
/// No redirect means "stay on the current view and refresh".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseOutcome {
    pub redirect: Option<String>,
    pub refresh: BTreeSet<UpdateTag>,
}

impl PhaseOutcome {
    pub fn refresh(tags: &[UpdateTag]) -> Self {
        Self { redirect: None, refresh: tags.iter().copied().collect() }
    }

    pub fn with_redirect(mut self, url: &str) -> Self {
        self.redirect = Some(url.to_string());
        self
    }
}

/// Entry logic of one phase.
pub trait PhaseHandler {
    fn phase(&self) -> Phase;

    /// Runs before the phase is written. An error aborts the transition
    /// with the league untouched.
    fn precheck(&self, _ctx: &LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<()> {
        Ok(())
    }

    /// Side effects of entering the phase. Not safe to run twice.
    fn enter(&self, ctx: &mut LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<PhaseOutcome>;
}

/// The handler table.
pub fn handler(phase: Phase) -> &'static dyn PhaseHandler {
    match phase {
        Phase::ExpansionDraft => &ExpansionDraft,
        Phase::FantasyDraft => &FantasyDraft,
        Phase::Preseason => &Preseason,
        Phase::RegularSeason => &RegularSeason,
        Phase::Playoffs => &Playoffs,
        Phase::DraftLottery => &DraftLottery,
        Phase::Draft => &Draft,
        Phase::AfterDraft => &AfterDraft,
        Phase::ResignPlayers => &ResignPlayers,
        Phase::FreeAgency => &FreeAgency,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Next phase of the linear order
    Linear,
    /// Onto an alternate track; the current phase is recorded for the return
    EnterAlternate,
    /// Back from an alternate track; no handler runs
    Resume,
}

pub struct PhaseMachine;

impl PhaseMachine {
    /// Classify `current -> target` or reject it.
    pub fn check(attributes: &GameAttributes, target: Phase) -> Result<Transition> {
        let current = attributes.phase;
        let invalid = || GmError::InvalidTransition { from: current, to: target };

        if current.is_alternate() {
            return match attributes.return_phase {
                Some(resume) if resume == target => Ok(Transition::Resume),
                _ => Err(invalid()),
            };
        }
        if current.next() == Some(target) {
            return Ok(Transition::Linear);
        }
        if target.is_alternate() && target.alternate_entry_points().contains(&current) {
            return Ok(Transition::EnterAlternate);
        }
        Err(invalid())
    }

    /// Move the league to `target`. The outcome is also sent to the bridge.
    pub fn advance(
        ctx: &mut LeagueContext<'_>,
        target: Phase,
        conditions: &AdvanceConditions,
    ) -> Result<PhaseOutcome> {
        let attributes = ctx.store.attributes().clone();
        let from = attributes.phase;
        let transition = Self::check(&attributes, target)?;

        let mut outcome = match transition {
            Transition::Resume => {
                ctx.store.update_attributes(|a| {
                    a.phase = target;
                    a.return_phase = None;
                });
                PhaseOutcome::refresh(&[UpdateTag::PlayerMovement])
            }
            Transition::Linear | Transition::EnterAlternate => {
                let handler = handler(target);
                handler.precheck(&*ctx, conditions)?;
                ctx.store.update_attributes(|a| {
                    a.phase = target;
                    if transition == Transition::EnterAlternate {
                        a.return_phase = Some(from);
                    }
                });
                handler.enter(ctx, conditions)?
            }
        };
        outcome.refresh.insert(UpdateTag::NewPhase);

        ctx.bridge.refresh(&outcome.refresh, outcome.redirect.as_deref());
        ctx.bridge.status(&format!("Phase: {}", target));
        info!(
            from = %from,
            to = %target,
            season = ctx.store.season(),
            redirect = outcome.redirect.as_deref().unwrap_or("-"),
            "Phase advanced"
        );
        Ok(outcome)
    }
}
