use super::LeagueStore;
use crate::models::{
    DraftPick, GameAttributes, GameRecord, Negotiation, Player, PlayerId, PlayoffBracket,
    RosterStatus, ScheduleEntry, Season, SeasonAwards, Team, TeamId,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// In-memory record store. Ordered maps keep iteration deterministic so a
/// seeded league replays identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemoryStore {
    attributes: GameAttributes,
    teams: BTreeMap<TeamId, Team>,
    players: BTreeMap<PlayerId, Player>,
    schedule: BTreeMap<u32, ScheduleEntry>,
    games: Vec<GameRecord>,
    draft_picks: Vec<DraftPick>,
    negotiations: BTreeMap<PlayerId, Negotiation>,
    awards: Vec<SeasonAwards>,
    playoffs: Option<PlayoffBracket>,
}

impl MemoryStore {
    pub fn new(attributes: GameAttributes) -> Self {
        Self {
            attributes,
            teams: BTreeMap::new(),
            players: BTreeMap::new(),
            schedule: BTreeMap::new(),
            games: Vec::new(),
            draft_picks: Vec::new(),
            negotiations: BTreeMap::new(),
            awards: Vec::new(),
            playoffs: None,
        }
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn game_count(&self) -> usize {
        self.games.len()
    }
}

impl LeagueStore for MemoryStore {
    fn attributes(&self) -> &GameAttributes {
        &self.attributes
    }

    fn put_attributes(&mut self, attributes: GameAttributes) {
        self.attributes = attributes;
    }

    fn teams(&self) -> Vec<Team> {
        self.teams.values().cloned().collect()
    }

    fn team(&self, tid: TeamId) -> Option<Team> {
        self.teams.get(&tid).cloned()
    }

    fn put_team(&mut self, team: Team) {
        self.teams.insert(team.tid, team);
    }

    fn players(&self) -> Vec<Player> {
        self.players.values().cloned().collect()
    }

    fn players_by_status(&self, status: RosterStatus) -> Vec<Player> {
        self.players.values().filter(|p| p.status == status).cloned().collect()
    }

    fn player(&self, pid: PlayerId) -> Option<Player> {
        self.players.get(&pid).cloned()
    }

    fn put_player(&mut self, player: Player) {
        self.players.insert(player.pid, player);
    }

    fn delete_player(&mut self, pid: PlayerId) {
        self.players.remove(&pid);
    }

    fn schedule(&self) -> Vec<ScheduleEntry> {
        let mut entries: Vec<ScheduleEntry> = self.schedule.values().copied().collect();
        entries.sort_by_key(|e| (e.day, e.gid));
        entries
    }

    fn put_schedule_entry(&mut self, entry: ScheduleEntry) {
        self.schedule.insert(entry.gid, entry);
    }

    fn delete_schedule_entry(&mut self, gid: u32) {
        self.schedule.remove(&gid);
    }

    fn clear_schedule(&mut self) {
        self.schedule.clear();
    }

    fn games_by_season(&self, season: Season) -> Vec<GameRecord> {
        self.games.iter().filter(|g| g.season == season).copied().collect()
    }

    fn put_game(&mut self, game: GameRecord) {
        self.games.push(game);
    }

    fn delete_games_before(&mut self, season: Season) -> usize {
        let before = self.games.len();
        self.games.retain(|g| g.season >= season);
        before - self.games.len()
    }

    fn draft_picks(&self) -> Vec<DraftPick> {
        self.draft_picks.clone()
    }

    fn put_draft_pick(&mut self, pick: DraftPick) {
        if let Some(existing) = self
            .draft_picks
            .iter_mut()
            .find(|p| p.season == pick.season && p.round == pick.round && p.pick == pick.pick)
        {
            *existing = pick;
        } else {
            self.draft_picks.push(pick);
        }
    }

    fn delete_draft_picks(&mut self, season: Season) {
        self.draft_picks.retain(|p| p.season != season);
    }

    fn negotiations(&self) -> Vec<Negotiation> {
        self.negotiations.values().copied().collect()
    }

    fn put_negotiation(&mut self, negotiation: Negotiation) {
        self.negotiations.insert(negotiation.pid, negotiation);
    }

    fn delete_negotiation(&mut self, pid: PlayerId) {
        self.negotiations.remove(&pid);
    }

    fn awards(&self) -> Vec<SeasonAwards> {
        self.awards.clone()
    }

    fn put_awards(&mut self, awards: SeasonAwards) {
        self.awards.retain(|a| a.season != awards.season);
        self.awards.push(awards);
    }

    fn playoffs(&self) -> Option<PlayoffBracket> {
        self.playoffs.clone()
    }

    fn put_playoffs(&mut self, bracket: PlayoffBracket) {
        self.playoffs = Some(bracket);
    }
}
