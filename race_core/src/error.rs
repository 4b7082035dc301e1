use thiserror::Error;

use crate::controller::RacePhase;

/// Why a roster text was rejected. Every variant that concerns a single
/// group carries the offending entry as typed by the user.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RosterError {
    #[error("no players entered")]
    Empty,

    #[error("malformed entry \"{entry}\": expected name*count")]
    MalformedEntry { entry: String },

    #[error("count must be a number of at least 1: \"{entry}\"")]
    InvalidCount { entry: String },

    #[error("at most {max} players per name: \"{entry}\"")]
    GroupTooLarge { entry: String, max: u32 },

    #[error("total player count exceeds {max} (currently {total})")]
    TooManyPlayers { total: u64, max: u32 },
}

#[derive(Error, Debug)]
pub enum MapError {
    #[error("map JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid map \"{id}\": {reason}")]
    Invalid { id: String, reason: String },

    #[error("unknown map: {0}")]
    UnknownMap(String),
}

#[derive(Error, Debug)]
pub enum RaceError {
    #[error(transparent)]
    Roster(#[from] RosterError),

    #[error(transparent)]
    Map(#[from] MapError),

    #[error("invalid settings: {0}")]
    Settings(String),

    #[error("gravity {0} is outside the allowed range")]
    GravityOutOfRange(f64),

    #[error("operation not allowed while {0:?}")]
    WrongPhase(RacePhase),
}
