//! Time-keyed task queue
//!
//! Delayed work (telegraph follow-through, staggered volleys, bomb fuses) is
//! queued here instead of captured in callbacks. Tasks are never cancelled;
//! the engine checks each task's target is still live when it comes due.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::core::types::{EntityHandle, Millis};
use crate::patterns::PatternId;

/// Work to perform when a task comes due
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskAction {
    /// Gated pattern execution after a telegraph
    ExecutePattern(PatternId),
    /// One shot of a spread volley, aimed when the volley began
    SpreadShot { direction_deg: f32 },
    /// Lead-predicted shell, aimed when it fires
    ArtilleryShot { shot: u32 },
    ThrowBomb { shot: u32 },
    /// Phase-shift teleport after its lead delay
    Relocate,
    /// Bomb fuse burning down
    DetonateFuse(EntityHandle),
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduledTask {
    pub due: Millis,
    seq: u64,
    pub action: TaskAction,
}

// Ordered by due time, then insertion order
impl PartialEq for ScheduledTask {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl Eq for ScheduledTask {}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> Ordering {
        self.due.cmp(&other.due).then(self.seq.cmp(&other.seq))
    }
}

#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    heap: BinaryHeap<Reverse<ScheduledTask>>,
    next_seq: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: Millis, action: TaskAction) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(ScheduledTask { due, seq, action }));
    }

    /// Pop the earliest task if it is due at `now`
    pub fn pop_due(&mut self, now: Millis) -> Option<ScheduledTask> {
        if self.heap.peek().is_some_and(|Reverse(t)| t.due <= now) {
            self.heap.pop().map(|Reverse(t)| t)
        } else {
            None
        }
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.heap.peek().map(|Reverse(t)| t.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
