//! Stack bookkeeping shared by both simulation models.

use crate::agents::AgentId;

/// One live application of a buff.
#[derive(Debug, Clone)]
pub struct BuffStackItem {
    /// Simulation time the stack entered the list.
    pub start: i64,
    /// Duration carried by the original application, in milliseconds.
    pub duration: i64,
    /// Applying agent, `None` when the source could not be resolved.
    pub src: Option<AgentId>,
    /// Duration added after the fact, attributed to the extending agent.
    pub extensions: Vec<(Option<AgentId>, i64)>,
    /// Time already consumed from this stack.
    pub consumed: i64,
}

impl BuffStackItem {
    pub fn new(start: i64, duration: i64, src: Option<AgentId>) -> Self {
        Self {
            start,
            duration,
            src,
            extensions: Vec::new(),
            consumed: 0,
        }
    }

    /// Original duration plus every extension.
    pub fn total_duration(&self) -> i64 {
        self.duration + self.extensions.iter().map(|(_, d)| d).sum::<i64>()
    }

    /// Duration not yet consumed.
    pub fn remaining(&self) -> i64 {
        (self.total_duration() - self.consumed).max(0)
    }

    pub fn extend(&mut self, src: Option<AgentId>, amount: i64) {
        self.extensions.push((src, amount));
    }

    /// Rebase the stack on the timeline. The duration delta is applied to
    /// the base duration, not the extensions.
    pub fn shift(&mut self, start_delta: i64, duration_delta: i64) {
        self.start += start_delta;
        self.duration += duration_delta;
    }
}

/// Constant-stack-count span of the presence graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuffSegment {
    pub start: i64,
    pub end: i64,
    pub stacks: u32,
    /// Sources of the stacks alive during the span, one entry per stack.
    pub sources: Vec<Option<AgentId>>,
}

/// Generation and waste totals per source agent.
#[derive(Debug, Clone, Default)]
pub struct SimulationLedger {
    /// Duration granted by applies and extensions, per source.
    pub generated: Vec<(Option<AgentId>, i64)>,
    /// Duration thrown away by overrides, cleanses and teardown, per source.
    pub wasted: Vec<(Option<AgentId>, i64)>,
}

impl SimulationLedger {
    pub fn credit_generated(&mut self, src: Option<AgentId>, amount: i64) {
        if amount > 0 {
            self.generated.push((src, amount));
        }
    }

    pub fn credit_wasted(&mut self, src: Option<AgentId>, amount: i64) {
        if amount > 0 {
            self.wasted.push((src, amount));
        }
    }

    pub fn generated_total(&self) -> i64 {
        self.generated.iter().map(|(_, d)| d).sum()
    }

    pub fn wasted_total(&self) -> i64 {
        self.wasted.iter().map(|(_, d)| d).sum()
    }
}

/// Builds the presence graph, merging adjacent spans with identical state.
#[derive(Debug, Default)]
pub(crate) struct SegmentRecorder {
    segments: Vec<BuffSegment>,
}

impl SegmentRecorder {
    pub fn record(&mut self, start: i64, end: i64, stacks: u32, sources: Vec<Option<AgentId>>) {
        if end <= start {
            return;
        }
        if let Some(last) = self.segments.last_mut()
            && last.end == start
            && last.stacks == stacks
            && last.sources == sources
        {
            last.end = end;
            return;
        }
        self.segments.push(BuffSegment {
            start,
            end,
            stacks,
            sources,
        });
    }

    pub fn into_segments(self) -> Vec<BuffSegment> {
        self.segments
    }
}

/// Everything a finished simulation hands back.
#[derive(Debug, Clone)]
pub struct SimulationResult {
    pub segments: Vec<BuffSegment>,
    pub ledger: SimulationLedger,
    /// Duration actually consumed while stacks were ticking.
    pub active_ms: i64,
}

impl SimulationResult {
    /// Stack count at an instant, 0 outside every segment.
    pub fn stacks_at(&self, time: i64) -> u32 {
        self.segments
            .iter()
            .find(|s| s.start <= time && time < s.end)
            .map_or(0, |s| s.stacks)
    }

    /// Milliseconds within `[start, end)` during which at least one stack
    /// was present.
    pub fn presence_in(&self, start: i64, end: i64) -> i64 {
        self.segments
            .iter()
            .filter(|s| s.stacks > 0)
            .map(|s| (s.end.min(end) - s.start.max(start)).max(0))
            .sum()
    }

    /// Stack-milliseconds within `[start, end)`, the integral the average
    /// stack count is derived from.
    pub fn stack_time_in(&self, start: i64, end: i64) -> i64 {
        self.segments
            .iter()
            .map(|s| i64::from(s.stacks) * (s.end.min(end) - s.start.max(start)).max(0))
            .sum()
    }
}
