//! Queued simulator for intensity-stacked buffs.
//!
//! Every stack ticks down concurrently. Applications join the queue,
//! removals take the oldest entries first, and an entry that runs out on
//! its own leaves without touching the waste ledger.

use crate::agents::AgentId;

use super::stack::{BuffStackItem, SegmentRecorder, SimulationLedger, SimulationResult};
use super::{RemovalKind, TIME_TOLERANCE_MS};

#[derive(Debug, Default)]
pub struct IntensitySimulator {
    stacks: Vec<BuffStackItem>,
    recorder: SegmentRecorder,
    ledger: SimulationLedger,
    active_ms: i64,
    now: i64,
}

impl IntensitySimulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance simulation time, recording presence segments and retiring
    /// stacks at their natural expiry.
    fn advance(&mut self, to: i64) {
        while self.now < to {
            let next_expiry = self
                .stacks
                .iter()
                .map(|s| self.now + s.remaining())
                .min()
                .unwrap_or(to);
            let step_end = next_expiry.clamp(self.now, to);
            self.recorder.record(
                self.now,
                step_end,
                self.stacks.len() as u32,
                self.stacks.iter().map(|s| s.src).collect(),
            );
            let dt = step_end - self.now;
            for stack in &mut self.stacks {
                let consumed = dt.min(stack.remaining());
                stack.consumed += consumed;
                self.active_ms += consumed;
            }
            self.stacks.retain(|s| s.remaining() > 0);
            if step_end == self.now {
                // Expired stack at the current instant, retained filter above
                // already dropped it.
                if self.stacks.is_empty() {
                    self.recorder
                        .record(self.now, to, 0, Vec::new());
                    self.now = to;
                    break;
                }
            } else {
                self.now = step_end;
            }
        }
        self.now = to;
    }

    pub fn apply(&mut self, src: Option<AgentId>, time: i64, duration: i64) {
        self.advance(time);
        self.ledger.credit_generated(src, duration);
        self.stacks.push(BuffStackItem::new(time, duration, src));
    }

    /// Extensions are not id-addressed in this model, the oldest stack
    /// absorbs them. An extension with nothing to land on is pure waste.
    pub fn extend(&mut self, src: Option<AgentId>, time: i64, amount: i64) {
        self.advance(time);
        self.ledger.credit_generated(src, amount);
        match self.stacks.first_mut() {
            Some(stack) => stack.extend(src, amount),
            None => self.ledger.credit_wasted(src, amount),
        }
    }

    pub fn remove(&mut self, time: i64, removal: RemovalKind) {
        self.advance(time);
        match removal {
            RemovalKind::Full => self.stacks.clear(),
            RemovalKind::Partial(count) => {
                let count = (count as usize).min(self.stacks.len());
                for stack in self.stacks.drain(..count) {
                    let remaining = stack.remaining();
                    if remaining > TIME_TOLERANCE_MS {
                        self.ledger.credit_wasted(stack.src, remaining);
                    } else {
                        // Natural expiry racing the removal, close the books
                        // as consumed rather than wasted.
                        self.active_ms += remaining;
                    }
                }
            }
        }
    }

    pub fn finish(mut self, end: i64) -> SimulationResult {
        self.advance(end);
        for stack in self.stacks.drain(..) {
            self.ledger.credit_wasted(stack.src, stack.remaining());
        }
        SimulationResult {
            segments: self.recorder.into_segments(),
            ledger: self.ledger,
            active_ms: self.active_ms,
        }
    }
}
