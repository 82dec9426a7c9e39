//! Error types for evtc decoding

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading and decoding an evtc log.
#[derive(Debug, Error)]
pub enum EvtcError {
    #[error("log file {path} does not exist")]
    FileNotFound { path: PathBuf },

    #[error("unsupported file extension on {path}, expected .evtc, .zevtc or .evtc.zip")]
    UnsupportedExtension { path: PathBuf },

    #[error("failed to open log file {path}")]
    OpenFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to memory map file {path}")]
    MemoryMap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt archive wrapper: {reason}")]
    InvalidArchive { reason: String },

    #[error("truncated stream while reading {what} at offset {offset}")]
    Truncated { what: &'static str, offset: usize },

    #[error("no combat events found")]
    NoCombatEvents,

    #[error("fight duration {duration_ms}ms is below the configured minimum of {limit_ms}ms")]
    TooShort { duration_ms: i64, limit_ms: i64 },

    #[error("fight duration exceeds the 24 hour ceiling")]
    TooLong,

    #[error("no player agents found")]
    NoPlayersFound,

    #[error("no encounter targets found")]
    MissingKeyActors,
}

/// Errors raised while resolving ids against embedded game-data tables.
#[derive(Debug, Error)]
pub enum LookupError {
    #[error("unknown elite specialization id {0}, embedded specialization table is outdated")]
    UnknownEliteSpec(u32),

    #[error("unknown profession id {0}")]
    UnknownProfession(u32),
}
