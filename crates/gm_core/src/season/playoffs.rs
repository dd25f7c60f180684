use super::{play_game, DayReport, GameSimulator};
use crate::context::LeagueContext;
use crate::error::{GmError, Result};
use crate::events::UpdateTag;
use crate::models::{PlayoffBracket, PlayoffSeries, ScheduleEntry, Season, SeriesTeam, Team};
use crate::store::{LeagueStore, LeagueStoreExt};
use std::collections::BTreeSet;
use tracing::info;

/// Higher seed hosts games 1, 2, 5 and 7.
fn higher_seed_hosts(game_index: u32) -> bool {
    matches!(game_index, 0 | 1 | 4 | 6)
}

/// Teams ordered by regular season record, best first.
pub fn standings(teams: &[Team]) -> Vec<Team> {
    let mut sorted = teams.to_vec();
    sorted.sort_by(|a, b| {
        b.record
            .win_pct()
            .total_cmp(&a.record.win_pct())
            .then(b.record.wins.cmp(&a.record.wins))
            .then(a.tid.cmp(&b.tid))
    });
    sorted
}

/// Seed the bracket: the best `2^rounds` teams, seed i meets seed n-1-i.
/// Qualifiers get `playoff_rounds_won = 0`, everyone else -1.
pub fn start(store: &mut dyn LeagueStore, series_lengths: &[u32], season: Season) -> PlayoffBracket {
    let num_teams = 1usize << series_lengths.len();
    let ranked = standings(&store.teams());
    let qualifiers: Vec<SeriesTeam> = ranked
        .iter()
        .take(num_teams)
        .enumerate()
        .map(|(i, t)| SeriesTeam { tid: t.tid, seed: i as u32 + 1, wins: 0 })
        .collect();

    for (i, mut team) in ranked.into_iter().enumerate() {
        team.record.playoff_rounds_won = if i < qualifiers.len() { 0 } else { -1 };
        store.put_team(team);
    }

    let n = qualifiers.len();
    let first_round: Vec<PlayoffSeries> =
        (0..n / 2).map(|i| PlayoffSeries::new(qualifiers[i], qualifiers[n - 1 - i])).collect();

    let bracket = PlayoffBracket {
        season,
        series_lengths: series_lengths.to_vec(),
        rounds: vec![first_round],
        champion: None,
    };
    store.put_playoffs(bracket.clone());
    info!(season, teams = n, rounds = series_lengths.len(), "Playoffs seeded");
    bracket
}

fn current_bracket(store: &dyn LeagueStore) -> Result<PlayoffBracket> {
    let season = store.season();
    store
        .playoffs()
        .filter(|b| b.season == season)
        .ok_or_else(|| GmError::NotFound(format!("playoff bracket for {}", season)))
}

pub fn is_complete(store: &dyn LeagueStore) -> bool {
    current_bracket(store).map(|b| b.is_complete()).unwrap_or(false)
}

/// One game in every undecided series of the current round.
pub fn play_day(ctx: &mut LeagueContext<'_>, sim: &mut dyn GameSimulator) -> Result<Option<DayReport>> {
    let mut bracket = current_bracket(&*ctx.store)?;
    if bracket.is_complete() {
        return Ok(None);
    }

    let round = bracket.current_round();
    let wins_needed = bracket.wins_needed(round);
    let day = ctx.store.games_by_season(bracket.season).iter().map(|g| g.day).max().unwrap_or(0) + 1;

    let mut games = 0;
    for i in 0..bracket.rounds[round].len() {
        let series = bracket.rounds[round][i];
        if series.winner(wins_needed).is_some() {
            continue;
        }

        let (home, away) = if higher_seed_hosts(series.games_played()) {
            (series.home.tid, series.away.tid)
        } else {
            (series.away.tid, series.home.tid)
        };
        let mut gid = 0;
        ctx.store.update_attributes(|a| gid = a.allocate_gid());
        let entry = ScheduleEntry { gid, day, home, away };

        let game = play_game(ctx, sim, entry, true)?;
        let series = &mut bracket.rounds[round][i];
        // A tied game doesn't count toward the series.
        match game.winner() {
            Some(tid) if tid == series.home.tid => series.home.wins += 1,
            Some(_) => series.away.wins += 1,
            None => {}
        }
        games += 1;
    }

    advance_round(ctx.store, &mut bracket)?;
    ctx.store.put_playoffs(bracket);

    let tags: BTreeSet<UpdateTag> = [UpdateTag::GameSim, UpdateTag::Playoffs].into();
    ctx.bridge.refresh(&tags, None);
    ctx.bridge.status(&format!("Playoffs: played day {}", day));

    Ok(Some(DayReport { day, games, playoffs: true }))
}

/// When every series of the current round is decided, credit the winners
/// and either pair them up for the next round or crown the champion.
fn advance_round(store: &mut dyn LeagueStore, bracket: &mut PlayoffBracket) -> Result<()> {
    let round = bracket.current_round();
    let wins_needed = bracket.wins_needed(round);
    let winners: Option<Vec<SeriesTeam>> =
        bracket.rounds[round].iter().map(|s| s.winner(wins_needed)).collect();
    let Some(winners) = winners else {
        return Ok(());
    };

    for winner in &winners {
        let mut team = store
            .team(winner.tid)
            .ok_or_else(|| GmError::NotFound(format!("team {}", winner.tid)))?;
        team.record.playoff_rounds_won += 1;
        store.put_team(team);
    }

    if round + 1 >= bracket.series_lengths.len() || winners.len() < 2 {
        if let Some(champion) = winners.first() {
            bracket.champion = Some(champion.tid);
            info!(season = bracket.season, tid = champion.tid, "Champion crowned");
        }
        return Ok(());
    }

    let n = winners.len();
    let next: Vec<PlayoffSeries> = (0..n / 2)
        .map(|k| {
            let (a, b) = (winners[k], winners[n - 1 - k]);
            let (high, low) = if a.seed <= b.seed { (a, b) } else { (b, a) };
            PlayoffSeries::new(SeriesTeam { wins: 0, ..high }, SeriesTeam { wins: 0, ..low })
        })
        .collect();
    bracket.rounds.push(next);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::events::RecordingBridge;
    use crate::season::RatingSimulator;
    use crate::test_support;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn league(wins: &[u32]) -> (LeagueConfig, crate::store::MemoryStore) {
        let mut config = LeagueConfig::test_league(wins.len(), 6);
        config.playoff_series_lengths = vec![3, 1];
        let mut store = test_support::store_with_teams(&config);
        test_support::fill_rosters(&mut store, 13, 3_000, 2027);
        for (tid, &w) in wins.iter().enumerate() {
            let mut team = store.team(tid as u32).unwrap();
            team.record.wins = w;
            team.record.losses = 10 - w;
            store.put_team(team);
        }
        (config, store)
    }

    #[test]
    fn test_seeding() {
        let (config, mut store) = league(&[3, 9, 5, 7, 1]);
        let bracket = start(&mut store, &config.playoff_series_lengths, 2025);

        let first = &bracket.rounds[0];
        assert_eq!(first.len(), 2);
        assert_eq!((first[0].home.tid, first[0].away.tid), (1, 0));
        assert_eq!((first[1].home.tid, first[1].away.tid), (3, 2));
        assert_eq!(store.team(4).unwrap().record.playoff_rounds_won, -1);
        assert_eq!(store.team(1).unwrap().record.playoff_rounds_won, 0);
    }

    #[test]
    fn test_playoffs_run_to_champion() {
        let (config, mut store) = league(&[3, 9, 5, 7]);
        start(&mut store, &config.playoff_series_lengths, 2025);
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut bridge = RecordingBridge::new();
        let mut sim = RatingSimulator::default();
        let mut ctx = LeagueContext::new(&mut store, &config, &mut rng, &mut bridge);

        let mut days = 0;
        while play_day(&mut ctx, &mut sim).unwrap().is_some() {
            days += 1;
            assert!(days <= 4);
        }

        let bracket = store.playoffs().unwrap();
        let champion = bracket.champion.expect("champion");
        assert_eq!(bracket.rounds.len(), 2);
        assert_eq!(store.team(champion).unwrap().record.playoff_rounds_won, 2);
        assert!(is_complete(&store));

        let games = store.games_by_season(2025);
        assert!(games.iter().all(|g| g.playoffs));
        assert!(games.len() >= 5 && games.len() <= 7);
    }
}
