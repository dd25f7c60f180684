//! # Auto-play
//!
//! Lets the league play itself for a number of seasons. Work is an explicit
//! queue of [`Task`]s: after every phase transition the new phase's driving
//! action is queued (play the schedule, run free agency, advance again), and
//! multi-day work re-queues its own continuation one day at a time. The stop
//! flag is polled between tasks, so cancellation lands on a day or phase
//! boundary.

use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::free_agency::{DayLoopOutcome, FreeAgencyDayLoop, StopHandle};
use crate::models::{GameAttributes, Phase};
use crate::phase::{AdvanceConditions, PhaseMachine};
use crate::season::{self, GameSimulator};
use crate::store::LeagueStoreExt;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Days a single season can use before the run gives up. Far above any
/// real schedule plus playoffs plus free agency.
pub const DAYS_PER_SEASON_LIMIT: u32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Task {
    Advance(Phase),
    /// Play up to n days of the current phase
    PlayDays(u32),
    /// Play days until the regular season or playoffs are over
    PlayUntilPhaseEnd,
    /// Run up to n free-agency days
    FreeAgencyDays(u32),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPlaySettings {
    /// Seasons to play; a season ends on entering the next preseason
    pub seasons: u32,
    /// Most days (game days and free-agency days) the run may play
    pub day_budget: u32,
}

impl AutoPlaySettings {
    pub fn seasons(seasons: u32) -> Self {
        Self { seasons, day_budget: seasons.saturating_mul(DAYS_PER_SEASON_LIMIT) }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    SeasonsComplete,
    StopRequested,
    DayBudgetExhausted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutoPlayReport {
    pub reason: StopReason,
    pub seasons_completed: u32,
    pub days_played: u32,
    pub transitions: u32,
}

/// Driving action of `phase`: what auto-play does once the league is in it.
pub fn driving_tasks(attributes: &GameAttributes) -> Vec<Task> {
    match attributes.phase {
        Phase::RegularSeason => vec![Task::PlayUntilPhaseEnd, Task::Advance(Phase::Playoffs)],
        Phase::Playoffs => vec![Task::PlayUntilPhaseEnd, Task::Advance(Phase::DraftLottery)],
        Phase::FreeAgency => vec![
            Task::FreeAgencyDays(attributes.free_agency_days_left),
            Task::Advance(Phase::Preseason),
        ],
        Phase::ExpansionDraft | Phase::FantasyDraft => {
            attributes.return_phase.map(Task::Advance).into_iter().collect()
        }
        phase => phase.next().map(Task::Advance).into_iter().collect(),
    }
}

pub struct AutoPlay {
    queue: VecDeque<Task>,
    settings: AutoPlaySettings,
    stop: StopHandle,
    conditions: AdvanceConditions,
    seasons_completed: u32,
    days_played: u32,
    transitions: u32,
}

impl AutoPlay {
    pub fn new(settings: AutoPlaySettings, stop: StopHandle) -> Self {
        Self {
            queue: VecDeque::new(),
            settings,
            stop,
            conditions: AdvanceConditions::auto_play(),
            seasons_completed: 0,
            days_played: 0,
            transitions: 0,
        }
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn pending(&self) -> &VecDeque<Task> {
        &self.queue
    }

    fn report(&self, reason: StopReason) -> AutoPlayReport {
        AutoPlayReport {
            reason,
            seasons_completed: self.seasons_completed,
            days_played: self.days_played,
            transitions: self.transitions,
        }
    }

    /// Run until the requested seasons are played, a stop is requested or
    /// the day budget runs out. Pending work stays queued after a stop, so
    /// a later `run` resumes where this one ended.
    pub fn run(&mut self, ctx: &mut LeagueContext<'_>, sim: &mut dyn GameSimulator) -> Result<AutoPlayReport> {
        if self.seasons_completed >= self.settings.seasons {
            return Ok(self.report(StopReason::SeasonsComplete));
        }
        if self.queue.is_empty() {
            self.queue.extend(driving_tasks(ctx.store.attributes()));
        }
        info!(
            seasons = self.settings.seasons,
            day_budget = self.settings.day_budget,
            phase = %ctx.store.attributes().phase,
            "Auto play started"
        );

        while let Some(task) = self.queue.pop_front() {
            if self.stop.is_stop_requested() {
                self.queue.push_front(task);
                info!(days = self.days_played, "Auto play stopped on request");
                return Ok(self.report(StopReason::StopRequested));
            }
            let is_day_task = !matches!(task, Task::Advance(_));
            if is_day_task && self.days_played >= self.settings.day_budget {
                self.queue.push_front(task);
                info!(days = self.days_played, "Auto play day budget exhausted");
                return Ok(self.report(StopReason::DayBudgetExhausted));
            }

            debug!(?task, "Auto play task");
            match task {
                Task::Advance(target) => {
                    PhaseMachine::advance(ctx, target, &self.conditions)?;
                    self.transitions += 1;

                    if target == Phase::Preseason {
                        self.seasons_completed += 1;
                        let season = ctx.store.season();
                        ctx.bridge.status(&format!("Auto play: season {} begins", season));
                        if self.seasons_completed >= self.settings.seasons {
                            self.queue.clear();
                            info!(seasons = self.seasons_completed, days = self.days_played, "Auto play complete");
                            return Ok(self.report(StopReason::SeasonsComplete));
                        }
                    }
                    // Driving action goes ahead of anything already queued.
                    for next in driving_tasks(ctx.store.attributes()).into_iter().rev() {
                        self.queue.push_front(next);
                    }
                }
                Task::PlayDays(days) => {
                    if days > 0 && season::play_day(ctx, sim, &self.conditions)?.is_some() {
                        self.days_played += 1;
                        if days > 1 {
                            self.queue.push_front(Task::PlayDays(days - 1));
                        }
                    }
                }
                Task::PlayUntilPhaseEnd => {
                    if season::play_day(ctx, sim, &self.conditions)?.is_some() {
                        self.days_played += 1;
                        self.queue.push_front(Task::PlayUntilPhaseEnd);
                    }
                }
                Task::FreeAgencyDays(days) => {
                    if days == 0 {
                        continue;
                    }
                    let mut day_loop = FreeAgencyDayLoop::new(self.stop.clone());
                    let outcome = day_loop.run(ctx, 1, &self.conditions)?;
                    self.days_played += outcome.days_played();
                    match outcome {
                        DayLoopOutcome::DaysPlayed { .. } if days > 1 => {
                            self.queue.push_front(Task::FreeAgencyDays(days - 1));
                        }
                        DayLoopOutcome::Stopped { .. } => {
                            self.queue.push_front(Task::FreeAgencyDays(days));
                        }
                        _ => {}
                    }
                }
            }
        }

        // Only an alternate track without a recorded return phase leaves nothing
        // to queue.
        Err(GmError::NotFound("phase to resume after the alternate track".to_string()))
    }
}
