//! # Season play
//!
//! Plays scheduled games one day at a time, updates team records and
//! stores the results. Playoff days are handled by [`playoffs`].

pub mod awards;
pub mod playoffs;
pub mod simulator;

pub use simulator::{GameResult, GameSimulator, RatingSimulator};

use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::free_agency;
use crate::models::{GameRecord, Injury, Phase, Player, ScheduleEntry, SeasonRecord, TeamId};
use crate::phase::AdvanceConditions;
use crate::store::{LeagueStore, LeagueStoreExt};
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

/// Chance per team per game that someone gets hurt.
const INJURY_RATE: f64 = 0.03;
const INJURY_KINDS: &[&str] =
    &["Sprained Ankle", "Hamstring Strain", "Bruised Knee", "Back Spasms", "Concussion", "Broken Finger"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayReport {
    pub day: u32,
    pub games: usize,
    pub playoffs: bool,
}

/// Apply one game to a season record.
pub fn record_result(record: &mut SeasonRecord, scored: u32, allowed: u32) {
    match scored.cmp(&allowed) {
        std::cmp::Ordering::Greater => record.wins += 1,
        std::cmp::Ordering::Less => record.losses += 1,
        std::cmp::Ordering::Equal => record.ties += 1,
    }
}

/// Heal one game for everyone on the roster and maybe injure someone new.
pub(crate) fn roster_game_played(store: &mut dyn LeagueStore, tid: TeamId, rng: &mut impl Rng) {
    let mut roster = store.roster(tid);
    for player in roster.iter_mut() {
        if player.injury.heal(1) {
            debug!(pid = player.pid, "Player recovered from injury");
        }
    }

    if rng.gen_bool(INJURY_RATE) {
        let healthy: Vec<usize> =
            (0..roster.len()).filter(|&i| !roster[i].injury.is_injured()).collect();
        if let Some(&i) = healthy.choose(rng) {
            let kind = INJURY_KINDS.choose(rng).copied().unwrap_or("Injury");
            roster[i].injury =
                Injury { kind: kind.to_string(), games_remaining: rng.gen_range(1..=15) };
            debug!(pid = roster[i].pid, kind, "Player injured");
        }
    }

    for player in roster {
        store.put_player(player);
    }
}

/// Simulate one game and write everything it touches.
pub(crate) fn play_game(
    ctx: &mut LeagueContext<'_>,
    sim: &mut dyn GameSimulator,
    entry: ScheduleEntry,
    playoffs: bool,
) -> Result<GameRecord> {
    let home_roster: Vec<Player> = ctx.store.roster(entry.home);
    let away_roster: Vec<Player> = ctx.store.roster(entry.away);
    let result = sim.simulate(&home_roster, &away_roster, ctx.config.sport, ctx.rng);

    let season = ctx.store.season();
    let game = GameRecord {
        gid: entry.gid,
        season,
        day: entry.day,
        home: entry.home,
        away: entry.away,
        home_score: result.home_score,
        away_score: result.away_score,
        playoffs,
    };

    if !playoffs {
        for (tid, scored, allowed) in
            [(entry.home, game.home_score, game.away_score), (entry.away, game.away_score, game.home_score)]
        {
            let mut team =
                ctx.store.team(tid).ok_or_else(|| GmError::NotFound(format!("team {}", tid)))?;
            record_result(&mut team.record, scored, allowed);
            ctx.store.put_team(team);
        }
    }

    roster_game_played(ctx.store, entry.home, ctx.rng);
    roster_game_played(ctx.store, entry.away, ctx.rng);
    ctx.store.put_game(game);
    Ok(game)
}

/// Play the next day of the regular season or the playoffs. Returns `None`
/// when nothing is left to play in the current phase.
pub fn play_day(
    ctx: &mut LeagueContext<'_>,
    sim: &mut dyn GameSimulator,
    conditions: &AdvanceConditions,
) -> Result<Option<DayReport>> {
    match ctx.store.attributes().phase {
        Phase::RegularSeason => play_regular_season_day(ctx, sim, conditions),
        Phase::Playoffs => playoffs::play_day(ctx, sim),
        actual => Err(GmError::WrongPhase { expected: Phase::RegularSeason, actual }),
    }
}

fn play_regular_season_day(
    ctx: &mut LeagueContext<'_>,
    sim: &mut dyn GameSimulator,
    conditions: &AdvanceConditions,
) -> Result<Option<DayReport>> {
    let schedule = ctx.store.schedule();
    let Some(day) = schedule.first().map(|e| e.day) else {
        return Ok(None);
    };
    let todays: Vec<ScheduleEntry> = schedule.into_iter().take_while(|e| e.day == day).collect();

    for entry in &todays {
        play_game(ctx, sim, *entry, false)?;
        ctx.store.delete_schedule_entry(entry.gid);
    }

    let signings = free_agency::daily_tick(ctx.store, ctx.config, conditions.auto_play, ctx.rng);

    let mut tags: BTreeSet<UpdateTag> = [UpdateTag::GameSim].into();
    if !signings.is_empty() {
        tags.insert(UpdateTag::PlayerMovement);
    }
    ctx.bridge.refresh(&tags, None);
    ctx.bridge.status(&format!("Played day {}", day));
    debug!(day, games = todays.len(), signings = signings.len(), "Played regular season day");

    Ok(Some(DayReport { day, games: todays.len(), playoffs: false }))
}

/// Days of regular season left on the schedule.
pub fn days_remaining(store: &dyn LeagueStore) -> usize {
    store.schedule().iter().map(|e| e.day).collect::<BTreeSet<_>>().len()
}
