use super::daily_tick;
use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::models::Phase;
use crate::phase::AdvanceConditions;
use crate::store::LeagueStoreExt;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

/// Where the loop stands between calls to [`FreeAgencyDayLoop::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// Not started, or free agency has no days left
    Idle,
    /// Free agency is under way with days left to play
    Running,
    /// The last run ended on a stop request
    StopRequested,
}

/// Shared cancellation flag. Cloning shares the flag.
///
/// A request stays set until [`StopHandle::reset`], so every loop and
/// auto-play driver holding the handle sees it; callers reset before
/// resuming.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request_stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stop_requested(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayLoopOutcome {
    /// Stop requested before the budget ran out
    Stopped { days_played: u32 },
    /// Requested number of days played, free agency continues
    DaysPlayed { days_played: u32 },
    /// No free-agency days left; the league can move to the preseason
    PhaseComplete { days_played: u32 },
}

impl DayLoopOutcome {
    pub fn days_played(&self) -> u32 {
        match *self {
            DayLoopOutcome::Stopped { days_played }
            | DayLoopOutcome::DaysPlayed { days_played }
            | DayLoopOutcome::PhaseComplete { days_played } => days_played,
        }
    }
}

/// Day-by-day driver of the free-agency phase.
///
/// A stop request is honored at the top of the next tick; a tick in
/// progress always completes.
#[derive(Debug)]
pub struct FreeAgencyDayLoop {
    state: LoopState,
    stop: StopHandle,
}

impl FreeAgencyDayLoop {
    pub fn new(stop: StopHandle) -> Self {
        Self { state: LoopState::Idle, stop }
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Play up to `days` days of free agency. The returned outcome is
    /// mirrored in [`FreeAgencyDayLoop::state`].
    pub fn run(
        &mut self,
        ctx: &mut LeagueContext<'_>,
        days: u32,
        conditions: &AdvanceConditions,
    ) -> Result<DayLoopOutcome> {
        let phase = ctx.store.attributes().phase;
        if phase != Phase::FreeAgency {
            return Err(GmError::WrongPhase { expected: Phase::FreeAgency, actual: phase });
        }

        self.state = LoopState::Running;
        let mut days_played = 0;
        let outcome = loop {
            if self.stop.is_stop_requested() {
                break DayLoopOutcome::Stopped { days_played };
            }
            if ctx.store.attributes().free_agency_days_left == 0 {
                break DayLoopOutcome::PhaseComplete { days_played };
            }
            if days_played >= days {
                break DayLoopOutcome::DaysPlayed { days_played };
            }

            self.tick(ctx, conditions);
            days_played += 1;
        };

        self.state = match outcome {
            DayLoopOutcome::Stopped { .. } => {
                info!(days_played, "Free agency stopped on request");
                LoopState::StopRequested
            }
            DayLoopOutcome::DaysPlayed { .. } => LoopState::Running,
            DayLoopOutcome::PhaseComplete { .. } => LoopState::Idle,
        };
        Ok(outcome)
    }

    fn tick(&mut self, ctx: &mut LeagueContext<'_>, conditions: &AdvanceConditions) {
        let signings = daily_tick(ctx.store, ctx.config, conditions.auto_play, ctx.rng);

        let mut days_left = 0;
        ctx.store.update_attributes(|a| {
            a.free_agency_days_left = a.free_agency_days_left.saturating_sub(1);
            days_left = a.free_agency_days_left;
        });

        debug!(days_left, signings = signings.len(), "Free agency day");
        let tags: BTreeSet<UpdateTag> = [UpdateTag::PlayerMovement, UpdateTag::GameAttributes].into();
        ctx.bridge.refresh(&tags, None);
        ctx.bridge.status(&format!("Free agency: {} days left", days_left));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::events::RecordingBridge;
    use crate::store::LeagueStore;
    use crate::test_support;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn setup(days_left: u32) -> (LeagueConfig, crate::store::MemoryStore) {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = test_support::store_with_teams(&config);
        test_support::fill_rosters(&mut store, 13, 3_000, 2027);
        test_support::add_free_agents(&mut store, 20, 5_000);
        store.update_attributes(|a| {
            a.phase = Phase::FreeAgency;
            a.free_agency_days_left = days_left;
        });
        (config, store)
    }

    #[test]
    fn test_runs_requested_days() {
        let (config, mut store) = setup(30);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);

        let mut day_loop = FreeAgencyDayLoop::new(StopHandle::new());
        let outcome = day_loop.run(&mut ctx, 5, &AdvanceConditions::default()).unwrap();
        assert_eq!(outcome, DayLoopOutcome::DaysPlayed { days_played: 5 });
        assert_eq!(day_loop.state(), LoopState::Running);
        assert_eq!(store.attributes().free_agency_days_left, 25);
        assert_eq!(bridge.statuses().last(), Some(&"Free agency: 25 days left"));
    }

    #[test]
    fn test_phase_complete_when_budget_exhausted() {
        let (config, mut store) = setup(3);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);

        let mut day_loop = FreeAgencyDayLoop::new(StopHandle::new());
        let outcome = day_loop.run(&mut ctx, 100, &AdvanceConditions::default()).unwrap();
        assert_eq!(outcome, DayLoopOutcome::PhaseComplete { days_played: 3 });
        assert_eq!(day_loop.state(), LoopState::Idle);
        assert!(store.free_agents().iter().all(|p| p.free_agent_days == 3));
    }

    #[test]
    fn test_stop_request_honored_before_tick() {
        let (config, mut store) = setup(30);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);

        let stop = StopHandle::new();
        let mut day_loop = FreeAgencyDayLoop::new(stop.clone());
        stop.request_stop();
        let outcome = day_loop.run(&mut ctx, 10, &AdvanceConditions::default()).unwrap();
        assert_eq!(outcome, DayLoopOutcome::Stopped { days_played: 0 });
        assert_eq!(outcome.days_played(), 0);
        assert_eq!(day_loop.state(), LoopState::StopRequested);
        assert!(bridge.messages.is_empty());
        assert_eq!(store.attributes().free_agency_days_left, 30);
    }

    #[test]
    fn test_stop_request_holds_until_reset() {
        let (config, mut store) = setup(30);
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);

        let mut day_loop = FreeAgencyDayLoop::new(StopHandle::new());
        let stop = day_loop.stop_handle();
        stop.request_stop();
        let conditions = AdvanceConditions::default();
        assert_eq!(day_loop.run(&mut ctx, 2, &conditions).unwrap(), DayLoopOutcome::Stopped { days_played: 0 });
        assert_eq!(day_loop.run(&mut ctx, 2, &conditions).unwrap(), DayLoopOutcome::Stopped { days_played: 0 });

        stop.reset();
        assert_eq!(day_loop.run(&mut ctx, 2, &conditions).unwrap(), DayLoopOutcome::DaysPlayed { days_played: 2 });
        assert_eq!(day_loop.state(), LoopState::Running);
        assert_eq!(store.attributes().free_agency_days_left, 28);
    }

    #[test]
    fn test_wrong_phase() {
        let (config, mut store) = setup(30);
        store.update_attributes(|a| a.phase = Phase::Draft);
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);

        let mut day_loop = FreeAgencyDayLoop::new(StopHandle::new());
        let err = day_loop.run(&mut ctx, 1, &AdvanceConditions::default()).unwrap_err();
        assert!(matches!(err, GmError::WrongPhase { .. }));
    }
}
