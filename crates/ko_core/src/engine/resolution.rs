//! Delayed resolution queue.
//!
//! Two-phase events (a penalty award and its later outcome) park their
//! second phase here. Timers run on real time, independent of the tick
//! cadence and of the pause state. Entries are keyed by fire time and
//! tagged with the match generation they were scheduled under, so a
//! resolution firing after a reset is silently discarded.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::TeamSide;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum ResolutionKind {
    /// Outcome decided at schedule time, revealed when the timer fires.
    Penalty { scored: bool },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingResolution {
    pub kind: ResolutionKind,
    pub side: TeamSide,
    pub player: String,
    pub fire_at_ms: u64,
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Queued {
    fire_at_ms: u64,
    /// Insertion order tie-break so same-instant entries fire FIFO.
    seq: u64,
    resolution: PendingResolution,
}

impl Ord for Queued {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (self.fire_at_ms, self.seq).cmp(&(other.fire_at_ms, other.seq))
    }
}

impl PartialOrd for Queued {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default)]
pub struct ResolutionQueue {
    heap: BinaryHeap<Reverse<Queued>>,
    next_seq: u64,
}

impl ResolutionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, resolution: PendingResolution) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Reverse(Queued { fire_at_ms: resolution.fire_at_ms, seq, resolution }));
    }

    /// Pops every resolution due at `now_ms`, in fire-time order. Entries
    /// scheduled under a different match generation are dropped.
    pub fn drain(&mut self, now_ms: u64, generation: u64) -> Vec<PendingResolution> {
        let mut fired = Vec::new();
        while let Some(Reverse(next)) = self.heap.peek() {
            if next.fire_at_ms > now_ms {
                break;
            }
            let Reverse(queued) = self.heap.pop().expect("peeked entry exists");
            if queued.resolution.generation != generation {
                debug!(
                    scheduled_gen = queued.resolution.generation,
                    current_gen = generation,
                    "discarding stale resolution"
                );
                continue;
            }
            fired.push(queued.resolution);
        }
        fired
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
