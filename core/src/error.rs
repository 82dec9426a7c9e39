//! Crate-wide error taxonomy.
//!
//! Every failure is fatal to the single log being processed and is
//! surfaced as one structured `ParseError`; a failed parse never returns
//! a partial result object.

use thiserror::Error;

use crate::buffs::BuffSimulationError;
use crate::evtc::{EvtcError, LookupError};
use crate::operation::Cancelled;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("evtc decoding failed")]
    Evtc(#[from] EvtcError),

    #[error("game data lookup failed")]
    Lookup(#[from] LookupError),

    #[error("buff simulation inconsistency")]
    BuffSimulation(#[from] BuffSimulationError),

    #[error("parse cancelled")]
    Cancelled(#[from] Cancelled),
}
