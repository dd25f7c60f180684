use super::roster::{fill_roster, prune_roster};
use super::{AdvanceConditions, PhaseHandler, PhaseOutcome};
use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::market::{normalize_league, NormalizeMode};
use crate::models::{Phase, RosterStatus, Season, TeamStrategy};
use crate::players::{age_fraud, develop, generate_draft_class};
use crate::schedule;
use crate::season::playoffs;
use crate::store::LeagueStoreExt;
use rand::seq::SliceRandom;
use rand::Rng;
use tracing::info;

/// New season: records archived, payroll snapshot, player development,
/// draft classes topped up.
pub struct Preseason;

impl PhaseHandler for Preseason {
    fn phase(&self) -> Phase {
        Phase::Preseason
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let season = ctx.store.season() + 1;
        ctx.store.update_attributes(|a| a.season = season);

        for mut team in ctx.store.teams() {
            let payroll = ctx.store.payroll(team.tid);
            team.start_season(season, payroll);
            if let Some(last) = team.history.last() {
                team.strategy = if last.win_pct() >= 0.5 {
                    TeamStrategy::Contending
                } else {
                    TeamStrategy::Rebuilding
                };
            }
            ctx.store.put_team(team);
        }

        let mut developed = 0;
        for mut player in ctx.store.players() {
            if player.status == RosterStatus::Retired {
                continue;
            }
            develop(&mut player, season, ctx.rng);
            ctx.store.put_player(player);
            developed += 1;
        }

        let mut prospects = 0;
        for offset in 0..ctx.config.draft.future_classes as Season {
            prospects += generate_draft_class(ctx.store, ctx.config, season + offset, ctx.rng);
        }

        if ctx.rng.gen_bool(ctx.config.age_fraud_probability) {
            let active: Vec<_> =
                ctx.store.players().into_iter().filter(|p| p.status.is_active()).collect();
            if let Some(player) = active.choose(ctx.rng) {
                let mut player = player.clone();
                let years = age_fraud(&mut player, season, ctx.rng);
                ctx.bridge.status(&format!(
                    "{} is actually {} years older than listed",
                    player.name, years
                ));
                info!(pid = player.pid, years, "Age fraud revealed");
                ctx.store.put_player(player);
            }
        }

        info!(season, developed, prospects, "Preseason started");
        Ok(PhaseOutcome::refresh(&[
            UpdateTag::PlayerMovement,
            UpdateTag::TeamFinances,
            UpdateTag::GameAttributes,
        ]))
    }
}

/// Rosters made legal, schedule generated, old games purged, free-agent
/// demands repriced against the cap space teams will actually have.
pub struct RegularSeason;

impl PhaseHandler for RegularSeason {
    fn phase(&self) -> Phase {
        Phase::RegularSeason
    }

    fn precheck(&self, ctx: &LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<()> {
        if conditions.auto_play {
            return Ok(());
        }
        let roster = &ctx.config.roster;
        for &tid in &ctx.store.attributes().user_tids {
            let count = ctx.store.roster_size(tid);
            if count < roster.min_roster_size || count > roster.max_roster_size {
                return Err(GmError::RosterSize {
                    tid,
                    count,
                    min: roster.min_roster_size,
                    max: roster.max_roster_size,
                });
            }
        }
        Ok(())
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let attributes = ctx.store.attributes().clone();
        let season = attributes.season;

        let (mut released, mut signed) = (0, 0);
        for team in ctx.store.teams() {
            if attributes.is_user_team(team.tid) && !conditions.auto_play {
                continue;
            }
            released += prune_roster(ctx.store, ctx.config, team.tid);
            signed += fill_roster(ctx.store, ctx.config, team.tid, ctx.rng);
        }

        ctx.store.clear_schedule();
        let teams = ctx.store.teams();
        let entries = schedule::generate(&teams, ctx.config, ctx.rng)?;
        let offset = ctx.store.attributes().next_gid;
        let games = entries.len() as u32;
        for mut entry in entries {
            entry.gid += offset;
            ctx.store.put_schedule_entry(entry);
        }
        ctx.store.update_attributes(|a| a.next_gid += games);

        let oldest_kept = season - ctx.config.keep_game_seasons as Season + 1;
        let purged = ctx.store.delete_games_before(oldest_kept);

        normalize_league(ctx.store, ctx.config, NormalizeMode::DummyExpiringContracts, ctx.rng);

        info!(season, games, released, signed, purged, "Regular season started");
        Ok(PhaseOutcome::refresh(&[
            UpdateTag::GameSim,
            UpdateTag::PlayerMovement,
            UpdateTag::TeamFinances,
        ]))
    }
}

pub struct Playoffs;

impl PhaseHandler for Playoffs {
    fn phase(&self) -> Phase {
        Phase::Playoffs
    }

    fn precheck(&self, ctx: &LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<()> {
        let left = ctx.store.schedule().len();
        if left > 0 {
            return Err(GmError::PhaseIncomplete {
                phase: Phase::RegularSeason,
                detail: format!("{} games left to play", left),
            });
        }
        Ok(())
    }

    fn enter(&self, ctx: &mut LeagueContext<'_>, _conditions: &AdvanceConditions) -> Result<PhaseOutcome> {
        let season = ctx.store.season();
        playoffs::start(ctx.store, &ctx.config.playoff_series_lengths, season);
        Ok(PhaseOutcome::refresh(&[UpdateTag::Playoffs, UpdateTag::TeamFinances]).with_redirect("/playoffs"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::events::RecordingBridge;
    use crate::models::{GameRecord, ScheduleEntry};
    use crate::store::LeagueStore;
    use crate::test_support;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_preseason_advances_season() {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = test_support::store_with_teams(&config);
        test_support::fill_rosters(&mut store, 13, 2_000, 2027);
        let mut team = store.team(2).unwrap();
        team.record.wins = 1;
        team.record.losses = 5;
        store.put_team(team);

        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);
        Preseason.enter(&mut ctx, &AdvanceConditions::default()).unwrap();

        assert_eq!(store.season(), 2026);
        let team = store.team(2).unwrap();
        assert_eq!(team.record.season, 2026);
        assert_eq!(team.record.payroll, 13 * 2_000);
        assert_eq!(team.strategy, TeamStrategy::Rebuilding);

        let classes: Vec<Season> = store
            .players_by_status(RosterStatus::Undrafted)
            .iter()
            .map(|p| p.draft.year)
            .collect();
        for year in 2026..2029 {
            assert_eq!(classes.iter().filter(|&&y| y == year).count(), config.draft.class_size);
        }
    }

    #[test]
    fn test_regular_season_entry() {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = test_support::store_with_teams(&config);
        test_support::fill_rosters(&mut store, 14, 2_000, 2027);
        test_support::add_free_agents(&mut store, 10, 3_000);
        store.put_schedule_entry(ScheduleEntry { gid: 99, day: 1, home: 0, away: 1 });
        store.put_game(GameRecord {
            gid: 1,
            season: 2020,
            day: 1,
            home: 0,
            away: 1,
            home_score: 3,
            away_score: 2,
            playoffs: false,
        });
        // One AI team over the limit, one under.
        for pid in store.roster(1).iter().take(3).map(|p| p.pid) {
            let mut player = store.player(pid).unwrap();
            player.status = RosterStatus::Team(2);
            store.put_player(player);
        }
        store.update_attributes(|a| a.next_gid = 50);

        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut bridge = RecordingBridge::new();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);
        RegularSeason.enter(&mut ctx, &AdvanceConditions::default()).unwrap();

        for team in store.teams() {
            let size = store.roster_size(team.tid);
            assert!((13..=15).contains(&size), "team {} has {}", team.tid, size);
        }
        let schedule = store.schedule();
        assert_eq!(schedule.len(), 12);
        assert!(schedule.iter().all(|e| e.gid >= 50 && e.gid < 62));
        assert_eq!(store.attributes().next_gid, 62);
        assert!(store.games_by_season(2020).is_empty());
    }

    #[test]
    fn test_playoffs_require_finished_schedule() {
        let config = LeagueConfig::test_league(4, 6);
        let mut store = test_support::store_with_teams(&config);
        store.put_schedule_entry(ScheduleEntry { gid: 0, day: 1, home: 0, away: 1 });

        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut bridge = RecordingBridge::new();
        let ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);
        let err = Playoffs.precheck(&ctx, &AdvanceConditions::default()).unwrap_err();
        assert!(matches!(err, GmError::PhaseIncomplete { phase: Phase::RegularSeason, .. }));
    }
}
