pub mod contract;
pub mod phase;
pub mod player;
pub mod records;
pub mod schedule;
pub mod team;

pub use contract::{round_amount, Contract};
pub use phase::Phase;
pub use player::{DraftInfo, Injury, Player, Ratings, RosterStatus};
pub use records::{
    DraftPick, GameAttributes, Negotiation, PlayoffBracket, PlayoffSeries, SeasonAwards,
    SeriesTeam,
};
pub use schedule::{GameRecord, ScheduleEntry};
pub use team::{SeasonRecord, Team, TeamCapInfo, TeamStrategy};

pub type TeamId = u32;
pub type PlayerId = u32;
pub type Season = i32;
