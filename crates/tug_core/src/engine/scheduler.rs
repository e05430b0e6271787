//! Deferred match actions.
//!
//! Freeze releases and scripted-opponent answers are data in this queue,
//! not callbacks: the engine pops due entries while it replays elapsed
//! time, so everything fires on the host thread in virtual-time order.
//! Every entry is stamped with the match generation it was scheduled
//! under; entries from a stale generation are dropped unfired.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use crate::models::Player;

/// What a scheduled entry does when it fires.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskKind {
    /// Lift a wrong-streak freeze.
    Unfreeze { player: Player },
    /// Scripted opponent submits its decided answer. Only fires while
    /// `question_id` is still the active question.
    OpponentAnswer { question_id: String, value: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledTask {
    /// Virtual due time, milliseconds since match start.
    pub due_ms: u64,
    /// Match generation this task belongs to.
    pub generation: u64,
    /// Monotonic id; doubles as the FIFO tie-breaker for equal due times.
    pub task_id: u64,
    pub kind: TaskKind,
}

impl PartialOrd for ScheduledTask {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledTask {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Earlier due time first; equal due times fire in scheduling order
        match self.due_ms.cmp(&other.due_ms) {
            std::cmp::Ordering::Equal => self.task_id.cmp(&other.task_id),
            ord => ord,
        }
    }
}

/// Min-queue of pending tasks.
#[derive(Debug, Default)]
pub struct TaskQueue {
    pending: BinaryHeap<Reverse<ScheduledTask>>,
    next_task_id: u64,
}

impl TaskQueue {
    pub fn new() -> Self {
        Self { pending: BinaryHeap::new(), next_task_id: 0 }
    }

    /// Schedule a task, returning its id.
    pub fn schedule(&mut self, due_ms: u64, generation: u64, kind: TaskKind) -> u64 {
        let task_id = self.next_task_id;
        self.next_task_id += 1;
        self.pending.push(Reverse(ScheduledTask { due_ms, generation, task_id, kind }));
        task_id
    }

    /// Due time of the earliest pending task, if any.
    ///
    /// May point at a stale-generation task; popping it is still a no-op,
    /// so callers only waste a visit to that virtual instant.
    pub fn next_due(&self) -> Option<u64> {
        self.pending.peek().map(|r| r.0.due_ms)
    }

    /// Pop the earliest task due at or before `now_ms`.
    ///
    /// Tasks from other generations are silently discarded along the way.
    pub fn pop_due(&mut self, now_ms: u64, current_generation: u64) -> Option<ScheduledTask> {
        while let Some(Reverse(task)) = self.pending.peek() {
            if task.due_ms > now_ms {
                return None;
            }
            let Reverse(task) = self.pending.pop()?;
            if task.generation == current_generation {
                return Some(task);
            }
            // Stale generation: drop and keep scanning
        }
        None
    }

    /// Cancel every pending opponent answer (the question changed or the
    /// opponent froze).
    pub fn cancel_opponent_answers(&mut self) {
        let mut remaining = BinaryHeap::new();
        while let Some(Reverse(task)) = self.pending.pop() {
            if !matches!(task.kind, TaskKind::OpponentAnswer { .. }) {
                remaining.push(Reverse(task));
            }
        }
        self.pending = remaining;
    }

    /// Drop everything (match ended).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}
