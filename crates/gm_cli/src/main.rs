//! gm CLI
//!
//! Create a league, let it play itself for a few seasons, inspect a
//! generated schedule or print where a saved league stands.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gm_core::config::load_from_env;
use gm_core::schedule::{self, games_per_team};
use gm_core::season::playoffs::standings;
use gm_core::{
    AutoPlayReport, AutoPlaySettings, League, LeagueConfig, LeagueStore, StopHandle, Team, TeamId,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "gm")]
#[command(about = "Run and inspect simulated league seasons", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Basketball,
    Football,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new league and save it
    New {
        /// Output snapshot path
        #[arg(long)]
        out: PathBuf,

        /// League config JSON; falls back to GM_CONFIG_PATH, then the preset
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "basketball")]
        preset: Preset,

        #[arg(long, default_value = "1")]
        seed: u64,

        /// Teams controlled by the user (comma separated ids)
        #[arg(long, value_delimiter = ',')]
        user_teams: Vec<TeamId>,
    },

    /// Let a saved league play itself
    Autoplay {
        /// Snapshot to load
        #[arg(long)]
        file: PathBuf,

        #[arg(long, default_value = "1")]
        seasons: u32,

        /// Where to save the result; defaults to overwriting the input
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Generate one season schedule and print per-team counts
    Schedule {
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "basketball")]
        preset: Preset,

        #[arg(long, default_value = "1")]
        seed: u64,

        /// Print the full schedule as JSON instead of the summary
        #[arg(long, default_value = "false")]
        json: bool,
    },

    /// Print season, phase and standings of a saved league
    Status {
        #[arg(long)]
        file: PathBuf,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::New { out, config, preset, seed, user_teams } => {
            let config = resolve_config(config.as_deref(), preset)?;
            let num_teams = config.num_teams;
            if let Some(tid) = user_teams.iter().find(|&&tid| tid as usize >= num_teams) {
                bail!("user team {} does not exist in a {}-team league", tid, num_teams);
            }

            let mut league = League::new(config, seed).context("creating league")?;
            if !user_teams.is_empty() {
                league.set_user_teams(user_teams);
            }
            league.save(&out).with_context(|| format!("saving {}", out.display()))?;

            println!("Created league: {} teams, season {}", num_teams, league.season());
            println!("   Saved to: {}", out.display());
        }

        Commands::Autoplay { file, seasons, out } => {
            let mut league = load(&file)?;
            let start = league.season();
            let report = autoplay(&mut league, seasons)?;

            let out = out.unwrap_or(file);
            league.save(&out).with_context(|| format!("saving {}", out.display()))?;

            println!("Played seasons {}..{} ({:?})", start, league.season(), report.reason);
            println!("   Days played:  {}", report.days_played);
            println!("   Transitions:  {}", report.transitions);
            for awards in league.store().awards().iter().filter(|a| a.season >= start) {
                println!("   {} champion: {}", awards.season, team_name(league.store(), awards.champion));
            }
            println!("   Saved to: {}", out.display());
        }

        Commands::Schedule { config, preset, seed, json } => {
            let config = resolve_config(config.as_deref(), preset)?;
            let teams: Vec<Team> = (0..config.num_teams)
                .map(|i| {
                    let (cid, did) = config.division_for_team(i).map(|d| (d.cid, d.did)).unwrap_or((0, 0));
                    Team::new(i as TeamId, &format!("Team {}", i + 1), "", cid, did, config.starting_season)
                })
                .collect();

            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let entries = schedule::generate(&teams, &config, &mut rng)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else {
                let days = entries.last().map(|e| e.day).unwrap_or(0);
                println!("{} games over {} days", entries.len(), days);
                for (tid, (home, away)) in games_per_team(&entries) {
                    println!("   team {:>2}: {:>3} home {:>3} away", tid, home, away);
                }
            }
        }

        Commands::Status { file } => {
            let league = load(&file)?;
            let store = league.store();
            println!("Season {} - {}", league.season(), league.phase());

            let table = standings(&store.teams());
            for (rank, team) in table.iter().enumerate() {
                let record = match team.record.games_played() {
                    0 => team.history.last().copied().unwrap_or(team.record),
                    _ => team.record,
                };
                println!(
                    "   {:>2}. {:<24} {:>3}-{:<3} ({})",
                    rank + 1,
                    team.full_name(),
                    record.wins,
                    record.losses,
                    record.season
                );
            }
            if let Some(last) = store.awards().last() {
                println!("   Last champion: {} ({})", team_name(store, last.champion), last.season);
            }
        }
    }

    Ok(())
}

fn resolve_config(path: Option<&Path>, preset: Preset) -> Result<LeagueConfig> {
    if let Some(path) = path {
        let content =
            std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        let config = LeagueConfig::from_json(&content)?;
        config.validate()?;
        return Ok(config);
    }
    if let Some(config) = load_from_env()? {
        return Ok(config);
    }
    Ok(match preset {
        Preset::Basketball => LeagueConfig::basketball(),
        Preset::Football => LeagueConfig::football(),
    })
}

/// Auto play with the league's default bridge, which sends progress to the
/// log.
fn autoplay(league: &mut League, seasons: u32) -> Result<AutoPlayReport> {
    let report = league.auto_play(AutoPlaySettings::seasons(seasons), StopHandle::new())?;
    info!(reason = ?report.reason, days = report.days_played, "Auto play finished");
    Ok(report)
}

fn team_name(store: &dyn LeagueStore, tid: Option<TeamId>) -> String {
    tid.and_then(|tid| store.team(tid)).map(|t| t.full_name()).unwrap_or_else(|| "-".to_string())
}

fn load(path: &Path) -> Result<League> {
    League::load(path).with_context(|| format!("loading {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gm_core::models::GameAttributes;
    use gm_core::{MemoryStore, StopReason};

    #[test]
    fn test_team_name_resolves_champion() {
        let mut store = MemoryStore::new(GameAttributes::new(2025));
        store.put_team(Team::new(3, "Boston", "Harbor", 0, 0, 2025));

        assert_eq!(team_name(&store, Some(3)), "Boston Harbor");
        assert_eq!(team_name(&store, Some(9)), "-");
        assert_eq!(team_name(&store, None), "-");
    }

    #[test]
    fn test_autoplay_logs_progress() {
        let mut league = League::new(LeagueConfig::test_league(4, 6), 3).unwrap();
        let report = autoplay(&mut league, 1).unwrap();

        assert_eq!(report.reason, StopReason::SeasonsComplete);
        assert_eq!(league.store().awards().len(), 1);
    }
}
