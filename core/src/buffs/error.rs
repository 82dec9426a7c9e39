//! Buff simulation consistency errors.
//!
//! The id-tracked duration model trusts the log to reference stacks it has
//! previously announced. A dangling stack id means the stream is corrupt or
//! the layout decode went wrong, and the simulation cannot continue.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuffSimulationError {
    #[error("buff extension at {time}ms referenced unknown stack id {stack_id}")]
    ExtendUnknownStack { stack_id: u32, time: i64 },

    #[error("buff removal at {time}ms referenced unknown stack id {stack_id}")]
    RemoveUnknownStack { stack_id: u32, time: i64 },

    #[error("stack activation at {time}ms referenced unknown stack id {stack_id}")]
    ActivateUnknownStack { stack_id: u32, time: i64 },

    #[error("stack reset at {time}ms referenced unknown stack id {stack_id}")]
    ResetUnknownStack { stack_id: u32, time: i64 },

    #[error("removal at {time}ms asked for {requested} stacks but only {present} were present")]
    RemoveOverflow {
        requested: usize,
        present: usize,
        time: i64,
    },
}
