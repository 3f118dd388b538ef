//! Timer scheduling abstraction.
//!
//! The simulator never sleeps. It asks a [`Scheduler`] to deliver a
//! [`TimerId`] after a delay, and the host hands that id back through
//! [`CapSimulator::on_timer`](crate::CapSimulator::on_timer) when it fires:
//! - Production: [`TokioScheduler`] spawns a sleeping task per timer
//! - Tests and synchronous drivers: [`ManualScheduler`] keeps a virtual clock

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Identifies one scheduled delay. Ids are never reused by a simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

/// Abstraction for scheduling and cancelling timers, plus the clock they run on.
pub trait Scheduler {
    /// Time elapsed since the scheduler started.
    fn now(&self) -> Duration;
    fn schedule(&mut self, id: TimerId, delay: Duration);
    /// Cancelling an unknown or already-fired timer is a no-op.
    fn cancel(&mut self, id: TimerId);
}

/// Deterministic virtual-time scheduler.
///
/// Time only moves when the caller fires timers or advances the clock.
/// Timers due at the same instant fire in scheduling order.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    seq: u64,
    queue: Vec<(Duration, u64, TimerId)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the clock to the earliest pending timer and returns it.
    pub fn fire_next(&mut self) -> Option<TimerId> {
        let idx = self
            .queue
            .iter()
            .enumerate()
            .min_by_key(|(_, (due, seq, _))| (*due, *seq))
            .map(|(i, _)| i)?;
        let (due, _, id) = self.queue.remove(idx);
        self.now = self.now.max(due);
        Some(id)
    }

    /// Advances the clock by `by`, returning every timer that came due, in order.
    pub fn advance(&mut self, by: Duration) -> Vec<TimerId> {
        let target = self.now + by;
        let mut fired = Vec::new();
        while self.next_due().is_some_and(|due| due <= target) {
            if let Some(id) = self.fire_next() {
                fired.push(id);
            }
        }
        self.now = target;
        fired
    }

    /// Number of timers waiting to fire.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Delay until the earliest pending timer.
    pub fn next_due_in(&self) -> Option<Duration> {
        self.next_due().map(|due| due.saturating_sub(self.now))
    }

    fn next_due(&self) -> Option<Duration> {
        self.queue.iter().map(|(due, _, _)| *due).min()
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.seq += 1;
        self.queue.push((self.now + delay, self.seq, id));
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|(_, _, t)| *t != id);
    }
}

/// Tokio-backed scheduler.
///
/// Each timer is a spawned task that sleeps and then sends its id on the
/// channel returned by [`TokioScheduler::new`]. Must be used from within a
/// Tokio runtime. Dropping the scheduler aborts every outstanding timer.
pub struct TokioScheduler {
    started: Instant,
    tx: mpsc::UnboundedSender<TimerId>,
    tasks: HashMap<TimerId, JoinHandle<()>>,
}

impl TokioScheduler {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = Self {
            started: Instant::now(),
            tx,
            tasks: HashMap::new(),
        };
        (scheduler, rx)
    }
}

impl Scheduler for TokioScheduler {
    fn now(&self) -> Duration {
        self.started.elapsed()
    }

    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.tasks.retain(|_, task| !task.is_finished());
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Receiver gone means the host stopped listening; nothing to deliver to.
            let _ = tx.send(id);
        });
        self.tasks.insert(id, task);
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(task) = self.tasks.remove(&id) {
            task.abort();
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.drain() {
            task.abort();
        }
    }
}

impl fmt::Debug for TokioScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokioScheduler")
            .field("elapsed", &self.started.elapsed())
            .field("outstanding", &self.tasks.len())
            .finish()
    }
}
