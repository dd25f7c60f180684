use super::playoffs::standings;
use crate::models::{Player, RosterStatus, Season, SeasonAwards, TeamId};
use crate::store::LeagueStore;
use std::collections::HashMap;
use tracing::info;

/// Team success folded into the MVP score.
const MVP_TEAM_WEIGHT: f64 = 10.0;

fn best_by<F>(players: &[Player], score: F) -> Option<&Player>
where
    F: Fn(&Player) -> f64,
{
    players.iter().max_by(|a, b| score(a).total_cmp(&score(b)).then(b.pid.cmp(&a.pid)))
}

/// Decide the season's awards, note them on the winners and store them.
pub fn compute(store: &mut dyn LeagueStore, season: Season) -> SeasonAwards {
    let teams = store.teams();
    let win_pct: HashMap<TeamId, f64> = teams.iter().map(|t| (t.tid, t.record.win_pct())).collect();

    let champion = store.playoffs().filter(|b| b.season == season).and_then(|b| b.champion);
    let best_record = standings(&teams).first().map(|t| t.tid);

    let rostered: Vec<Player> =
        store.players().into_iter().filter(|p| matches!(p.status, RosterStatus::Team(_))).collect();

    let mvp = best_by(&rostered, |p| {
        let team = p.tid().and_then(|tid| win_pct.get(&tid)).copied().unwrap_or(0.0);
        p.value + MVP_TEAM_WEIGHT * team
    })
    .map(|p| p.pid);

    let rookies: Vec<Player> =
        rostered.iter().filter(|p| p.draft.year == season - 1).cloned().collect();
    let rookie_of_the_year = best_by(&rookies, |p| p.value).map(|p| p.pid);

    for (pid, label) in [(mvp, "Most Valuable Player"), (rookie_of_the_year, "Rookie of the Year")] {
        if let Some(mut player) = pid.and_then(|pid| store.player(pid)) {
            player.awards.push(format!("{} {}", season, label));
            store.put_player(player);
        }
    }

    let awards = SeasonAwards { season, champion, best_record, mvp, rookie_of_the_year };
    info!(season, ?champion, ?mvp, ?rookie_of_the_year, "Awards decided");
    store.put_awards(awards.clone());
    awards
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LeagueConfig;
    use crate::models::PlayoffBracket;
    use crate::store::LeagueStoreExt;
    use crate::test_support;

    #[test]
    fn test_awards() {
        let config = LeagueConfig::test_league(2, 2);
        let mut store = test_support::store_with_teams(&config);

        let mut team = store.team(1).unwrap();
        team.record.wins = 2;
        store.put_team(team);
        let mut team = store.team(0).unwrap();
        team.record.losses = 2;
        store.put_team(team);

        let star = test_support::player(store.allocate_pid(), RosterStatus::Team(0), 80, 85, 1996);
        let rookie = test_support::player(store.allocate_pid(), RosterStatus::Team(1), 55, 75, 2004);
        let mut rookie = rookie;
        rookie.draft.year = 2024;
        let prospect = test_support::player(store.allocate_pid(), RosterStatus::Undrafted, 99, 99, 2006);
        let (star_pid, rookie_pid) = (star.pid, rookie.pid);
        store.put_player(star);
        store.put_player(rookie);
        store.put_player(prospect);
        store.put_playoffs(PlayoffBracket {
            season: 2025,
            series_lengths: vec![1],
            rounds: Vec::new(),
            champion: Some(1),
        });

        let awards = compute(&mut store, 2025);
        assert_eq!(awards.champion, Some(1));
        assert_eq!(awards.best_record, Some(1));
        assert_eq!(awards.mvp, Some(star_pid));
        assert_eq!(awards.rookie_of_the_year, Some(rookie_pid));
        assert_eq!(store.awards().len(), 1);
        assert_eq!(store.player(star_pid).unwrap().awards, vec!["2025 Most Valuable Player".to_string()]);
    }
}
