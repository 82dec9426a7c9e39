//! Actor presence windows derived from status events.

use crate::agents::AgentId;
use crate::events::{Event, StatusKind};

/// Time windows the actor was dead or not present, used to turn overall
/// uptimes into active-time-only uptimes. Downed time still counts as
/// active.
#[derive(Debug, Clone, Default)]
pub struct ActorStatus {
    absent: Vec<(i64, i64)>,
}

impl ActorStatus {
    pub fn compute(events: &[Event], actor: AgentId, end: i64) -> Self {
        let mut absent = Vec::new();
        let mut open: Option<i64> = None;
        for event in events {
            let Event::Status(e) = event else { continue };
            if e.agent != actor {
                continue;
            }
            match e.kind {
                StatusKind::Dead | StatusKind::Despawn => {
                    if open.is_none() {
                        open = Some(e.time);
                    }
                }
                StatusKind::Alive | StatusKind::Spawn => {
                    if let Some(start) = open.take() {
                        absent.push((start, e.time));
                    }
                }
                _ => {}
            }
        }
        if let Some(start) = open {
            absent.push((start, end));
        }
        Self { absent }
    }

    /// Milliseconds of `[start, end)` the actor was dead or away.
    pub fn absent_in(&self, start: i64, end: i64) -> i64 {
        self.absent
            .iter()
            .map(|&(s, e)| (e.min(end) - s.max(start)).max(0))
            .sum()
    }

    /// Milliseconds of `[start, end)` the actor could act in.
    pub fn active_in(&self, start: i64, end: i64) -> i64 {
        (end - start).max(0) - self.absent_in(start, end)
    }
}
