use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the league's yearly cycle.
///
/// The two draft variants are alternate tracks entered from a specific
/// phase and left by resuming it. Everything else follows [`Phase::LINEAR`]
/// and wraps from `FreeAgency` back to `Preseason`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ExpansionDraft,
    FantasyDraft,
    Preseason,
    RegularSeason,
    Playoffs,
    DraftLottery,
    Draft,
    AfterDraft,
    ResignPlayers,
    FreeAgency,
}

impl Phase {
    pub const LINEAR: [Phase; 8] = [
        Phase::Preseason,
        Phase::RegularSeason,
        Phase::Playoffs,
        Phase::DraftLottery,
        Phase::Draft,
        Phase::AfterDraft,
        Phase::ResignPlayers,
        Phase::FreeAgency,
    ];

    pub const ALL: [Phase; 10] = [
        Phase::ExpansionDraft,
        Phase::FantasyDraft,
        Phase::Preseason,
        Phase::RegularSeason,
        Phase::Playoffs,
        Phase::DraftLottery,
        Phase::Draft,
        Phase::AfterDraft,
        Phase::ResignPlayers,
        Phase::FreeAgency,
    ];

    /// Numeric code, alternate tracks negative.
    pub fn code(self) -> i8 {
        match self {
            Phase::ExpansionDraft => -2,
            Phase::FantasyDraft => -1,
            Phase::Preseason => 0,
            Phase::RegularSeason => 1,
            Phase::Playoffs => 2,
            Phase::DraftLottery => 3,
            Phase::Draft => 4,
            Phase::AfterDraft => 5,
            Phase::ResignPlayers => 6,
            Phase::FreeAgency => 7,
        }
    }

    pub fn is_alternate(self) -> bool {
        self.code() < 0
    }

    /// Next phase on the linear track. Alternate tracks have none; they
    /// resume the phase they were entered from.
    pub fn next(self) -> Option<Phase> {
        match self {
            Phase::ExpansionDraft | Phase::FantasyDraft => None,
            Phase::Preseason => Some(Phase::RegularSeason),
            Phase::RegularSeason => Some(Phase::Playoffs),
            Phase::Playoffs => Some(Phase::DraftLottery),
            Phase::DraftLottery => Some(Phase::Draft),
            Phase::Draft => Some(Phase::AfterDraft),
            Phase::AfterDraft => Some(Phase::ResignPlayers),
            Phase::ResignPlayers => Some(Phase::FreeAgency),
            Phase::FreeAgency => Some(Phase::Preseason),
        }
    }

    /// Phases an alternate track may be started from.
    pub fn alternate_entry_points(self) -> &'static [Phase] {
        match self {
            Phase::FantasyDraft => &[Phase::Preseason],
            Phase::ExpansionDraft => &[Phase::Preseason, Phase::DraftLottery],
            _ => &[],
        }
    }

    /// True once the regular season and playoffs of the current season are
    /// over. Contracts signed from here on start next season.
    pub fn is_offseason(self) -> bool {
        self.code() > Phase::Playoffs.code()
    }

    pub fn name(self) -> &'static str {
        match self {
            Phase::ExpansionDraft => "expansion draft",
            Phase::FantasyDraft => "fantasy draft",
            Phase::Preseason => "preseason",
            Phase::RegularSeason => "regular season",
            Phase::Playoffs => "playoffs",
            Phase::DraftLottery => "draft lottery",
            Phase::Draft => "draft",
            Phase::AfterDraft => "after draft",
            Phase::ResignPlayers => "re-sign players",
            Phase::FreeAgency => "free agency",
        }
    }

    pub fn parse(s: &str) -> Option<Phase> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Phase::ALL.iter().copied().find(|phase| {
            let candidate = phase.name().replace(['-', ' '], "_");
            candidate == normalized || format!("{:?}", phase).to_ascii_lowercase() == normalized.replace('_', "")
        })
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
