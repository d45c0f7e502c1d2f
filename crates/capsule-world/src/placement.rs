//! Incremental, budgeted replay of placement plans.
//!
//! Producers on any thread push tasks through a [`PlacementQueue`]. The
//! scheduling context owns the [`PlacementScheduler`] and calls
//! [`PlacementScheduler::step`] once per cycle. Only the head task is serviced
//! and a task that finishes mid-step never lets the next one start in the
//! same step.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use capsule_core::{rotate_position, BlockPos, DimensionId, Facing};

use crate::access::{BlockStateTransform, WorldMutator};
use crate::plan::PlacementPlan;

/// Identifier handed out when a task is enqueued. Increases monotonically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaskId(pub u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Per-task counters accumulated across steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskStats {
    pub placed: u64,
    pub skipped_unavailable: u64,
    pub failed: u64,
}

/// One structure being replayed into a world.
#[derive(Debug)]
pub struct PlacementTask<S> {
    pub id: TaskId,
    pub dimension: DimensionId,
    pub origin: BlockPos,
    pub plan: Arc<PlacementPlan<S>>,
    pub facing: Facing,
    /// Index of the next plan entry to process.
    pub cursor: usize,
    pub stats: TaskStats,
}

impl<S> PlacementTask<S> {
    pub fn is_finished(&self) -> bool {
        self.cursor >= self.plan.blocks.len()
    }

    pub fn remaining(&self) -> usize {
        self.plan.blocks.len().saturating_sub(self.cursor)
    }
}

/// Outcome of one scheduling cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub placed: u32,
    pub skipped: u32,
    pub failed: u32,
    /// Set when the head task finished during this step.
    pub completed: Option<TaskId>,
}

/// Cloneable producer handle. Safe to use from any thread while the
/// scheduler is stepping.
pub struct PlacementQueue<S> {
    sender: Sender<PlacementTask<S>>,
    next_id: Arc<AtomicU64>,
}

impl<S> Clone for PlacementQueue<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
            next_id: Arc::clone(&self.next_id),
        }
    }
}

impl<S> PlacementQueue<S> {
    /// Append a task for `plan`. The task starts at cursor 0 and is picked
    /// up by the scheduler on its next step.
    pub fn enqueue(
        &self,
        dimension: DimensionId,
        origin: BlockPos,
        plan: Arc<PlacementPlan<S>>,
        facing: Facing,
    ) -> TaskId {
        let id = TaskId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let task = PlacementTask {
            id,
            dimension,
            origin,
            plan,
            facing,
            cursor: 0,
            stats: TaskStats::default(),
        };
        // The scheduler owns the receiver; if it is gone nothing will ever
        // run the task.
        if self.sender.send(task).is_err() {
            log::warn!("placement {id} dropped: scheduler has shut down");
        }
        id
    }
}

/// Owns the FIFO of placement tasks and advances the head task each cycle.
pub struct PlacementScheduler<S> {
    queue: PlacementQueue<S>,
    incoming: Receiver<PlacementTask<S>>,
    tasks: VecDeque<PlacementTask<S>>,
}

impl<S> Default for PlacementScheduler<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> PlacementScheduler<S> {
    pub fn new() -> Self {
        let (sender, incoming) = mpsc::channel();
        Self {
            queue: PlacementQueue {
                sender,
                next_id: Arc::new(AtomicU64::new(1)),
            },
            incoming,
            tasks: VecDeque::new(),
        }
    }

    /// A producer handle feeding this scheduler.
    pub fn queue(&self) -> PlacementQueue<S> {
        self.queue.clone()
    }

    pub fn enqueue(
        &self,
        dimension: DimensionId,
        origin: BlockPos,
        plan: Arc<PlacementPlan<S>>,
        facing: Facing,
    ) -> TaskId {
        self.queue.enqueue(dimension, origin, plan, facing)
    }

    /// Tasks waiting or in progress, including ones not yet drained from
    /// producers.
    pub fn pending(&mut self) -> usize {
        self.drain_incoming();
        self.tasks.len()
    }

    pub fn is_idle(&mut self) -> bool {
        self.pending() == 0
    }

    /// The task currently being serviced.
    pub fn head(&self) -> Option<&PlacementTask<S>> {
        self.tasks.front()
    }

    fn drain_incoming(&mut self) {
        self.tasks.extend(self.incoming.try_iter());
    }
}

impl<S: Clone> PlacementScheduler<S> {
    /// Run one scheduling cycle with `budget` placements.
    ///
    /// Entries whose region is unavailable are skipped without charge, so a
    /// step may advance past more than `budget` entries. A failed mutation is
    /// logged, counted and charged, and the task carries on. Budget left over
    /// when the head task finishes is discarded.
    pub fn step<W, T>(&mut self, budget: u32, world: &mut W, transform: &T) -> StepReport
    where
        W: WorldMutator<S> + ?Sized,
        T: BlockStateTransform<S> + ?Sized,
    {
        self.drain_incoming();

        let mut report = StepReport::default();
        let Some(task) = self.tasks.front_mut() else {
            return report;
        };

        let plan = Arc::clone(&task.plan);
        let rotation = task.facing.rotation();
        let mut remaining = budget;

        while remaining > 0 && task.cursor < plan.blocks.len() {
            let (relative, state) = &plan.blocks[task.cursor];
            let absolute =
                task.origin + rotate_position(*relative, task.facing, plan.size.x, plan.size.z);
            task.cursor += 1;

            if !world.is_region_available(&task.dimension, absolute) {
                task.stats.skipped_unavailable += 1;
                report.skipped += 1;
                continue;
            }

            let rotated = transform.rotate(state.clone(), rotation);
            match world.set_block_state(&task.dimension, absolute, rotated, true) {
                Ok(()) => {
                    task.stats.placed += 1;
                    report.placed += 1;
                }
                Err(e) => {
                    log::warn!("placement {} at {absolute}: {e}", task.id);
                    task.stats.failed += 1;
                    report.failed += 1;
                }
            }
            remaining -= 1;
        }

        log::debug!(
            "placement {}: {}/{} entries, placed {} skipped {} failed {}",
            task.id,
            task.cursor,
            plan.blocks.len(),
            report.placed,
            report.skipped,
            report.failed
        );

        if task.is_finished() {
            if let Some(done) = self.tasks.pop_front() {
                log::info!(
                    "placement {} of '{}' finished at {}: {} placed, {} skipped, {} failed",
                    done.id,
                    plan.name,
                    done.origin,
                    done.stats.placed,
                    done.stats.skipped_unavailable,
                    done.stats.failed
                );
                report.completed = Some(done.id);
            }
        }

        report
    }
}
