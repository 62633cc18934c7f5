use anyhow::{Context, Result};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::services::error_handling::LogHelper;

/// Work that runs once after its delay elapses.
pub type DeferredTask = Box<dyn FnOnce() + Send + 'static>;

/// Work a [`LiveLoop`] runs once per interval.
pub type RepeatingTask = Arc<dyn Fn() + Send + Sync + 'static>;

/// Source of simulated latency. Deferred tasks always resolve; nothing here
/// retries, times out or fails.
pub trait Scheduler: Send + Sync {
    fn defer(&self, delay: Duration, label: &str, task: DeferredTask);

    /// Time elapsed since the scheduler was created.
    fn now(&self) -> Duration;
}

struct Pending {
    due: Duration,
    seq: u64,
    label: String,
    task: DeferredTask,
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_seq: u64,
    pending: Vec<Pending>,
}

/// Virtual-time scheduler. Nothing fires until the owner calls [`advance`].
///
/// Tasks become due at `now + delay` and fire in due-time order, ties broken
/// by scheduling order. A task that schedules another task sees `now` equal
/// to its own due time.
///
/// [`advance`]: ManualScheduler::advance
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves virtual time forward, firing every task due on the way.
    /// Returns the number of tasks fired.
    pub fn advance(&self, by: Duration) -> usize {
        let target = self.state.lock().now + by;
        let mut fired = 0;

        loop {
            // The lock is released before the task runs so it can defer more work.
            let next = {
                let mut state = self.state.lock();
                let earliest = state
                    .pending
                    .iter()
                    .enumerate()
                    .filter(|(_, p)| p.due <= target)
                    .min_by_key(|(_, p)| (p.due, p.seq))
                    .map(|(index, _)| index);

                match earliest {
                    Some(index) => {
                        let pending = state.pending.remove(index);
                        state.now = state.now.max(pending.due);
                        Some(pending)
                    }
                    None => {
                        state.now = target;
                        None
                    }
                }
            };

            match next {
                Some(pending) => {
                    debug!(label = %pending.label, due_ms = pending.due.as_millis() as u64, "Deferred task fired");
                    (pending.task)();
                    fired += 1;
                }
                None => break,
            }
        }

        fired
    }

    pub fn advance_ms(&self, millis: u64) -> usize {
        self.advance(Duration::from_millis(millis))
    }

    /// Fires everything, including tasks scheduled by fired tasks.
    pub fn run_until_idle(&self) -> usize {
        let mut fired = 0;
        loop {
            let horizon = {
                let state = self.state.lock();
                state.pending.iter().map(|p| p.due).max().map(|due| due.saturating_sub(state.now))
            };
            match horizon {
                Some(by) => fired += self.advance(by),
                None => return fired,
            }
        }
    }

    pub fn pending(&self) -> usize {
        self.state.lock().pending.len()
    }

    pub fn pending_labels(&self) -> Vec<String> {
        let state = self.state.lock();
        let mut pending: Vec<&Pending> = state.pending.iter().collect();
        pending.sort_by_key(|p| (p.due, p.seq));
        pending.into_iter().map(|p| p.label.clone()).collect()
    }

    /// Drops every pending task without running it. Returns how many were dropped.
    pub fn cancel_all(&self) -> usize {
        let mut state = self.state.lock();
        let dropped = state.pending.len();
        state.pending.clear();
        dropped
    }
}

impl Scheduler for ManualScheduler {
    fn defer(&self, delay: Duration, label: &str, task: DeferredTask) {
        LogHelper::log_deferred(label, delay.as_millis() as u64);
        let mut state = self.state.lock();
        let seq = state.next_seq;
        state.next_seq += 1;
        let due = state.now + delay;
        state.pending.push(Pending {
            due,
            seq,
            label: label.to_string(),
            task,
        });
    }

    fn now(&self) -> Duration {
        self.state.lock().now
    }
}

/// Wall-clock scheduler backed by a tokio runtime.
pub struct TokioScheduler {
    handle: Handle,
    started: Instant,
    in_flight: Mutex<Vec<JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            started: Instant::now(),
            in_flight: Mutex::new(Vec::new()),
        }
    }

    /// Uses the runtime the caller is running on.
    pub fn current() -> Result<Self> {
        let handle = Handle::try_current().context("TokioScheduler requires a tokio runtime")?;
        Ok(Self::new(handle))
    }

    pub fn in_flight(&self) -> usize {
        let mut tasks = self.in_flight.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.len()
    }

    /// Aborts every task that has not fired yet. Pages never call this on
    /// their own; it exists for callers that want cancel-on-teardown.
    pub fn shutdown(&self) -> usize {
        let mut tasks = self.in_flight.lock();
        let mut aborted = 0;
        for task in tasks.drain(..) {
            if !task.is_finished() {
                task.abort();
                aborted += 1;
            }
        }
        aborted
    }
}

impl Scheduler for TokioScheduler {
    fn defer(&self, delay: Duration, label: &str, task: DeferredTask) {
        LogHelper::log_deferred(label, delay.as_millis() as u64);
        let label = label.to_string();
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            debug!(label = %label, "Deferred task fired");
            task();
        });

        let mut tasks = self.in_flight.lock();
        tasks.retain(|task| !task.is_finished());
        tasks.push(join);
    }

    fn now(&self) -> Duration {
        self.started.elapsed()
    }
}

/// A task that re-defers itself every interval until stopped.
///
/// Each start opens a new generation; ticks left over from an earlier
/// generation fire once and do nothing, so a stop followed by a quick
/// restart never runs two chains side by side.
#[derive(Clone, Default)]
pub struct LiveLoop {
    live: Arc<AtomicBool>,
    generation: Arc<AtomicU64>,
}

impl LiveLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }

    /// Returns false when the loop already runs or `interval` is zero.
    pub fn start(
        &self,
        scheduler: Arc<dyn Scheduler>,
        interval: Duration,
        label: &str,
        tick: RepeatingTask,
    ) -> bool {
        if interval.is_zero() {
            warn!(label, "Live refresh interval is zero, loop stays off");
            return false;
        }
        if self.live.swap(true, Ordering::SeqCst) {
            return false;
        }
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(label, generation, interval_ms = interval.as_millis() as u64, "Live refresh started");
        schedule_every(self.clone(), generation, scheduler, interval, label.to_string(), tick);
        true
    }

    /// The pending tick still fires once but neither runs nor reschedules.
    pub fn stop(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    fn is_current(&self, generation: u64) -> bool {
        self.is_live() && self.generation.load(Ordering::SeqCst) == generation
    }
}

fn schedule_every(
    live: LiveLoop,
    generation: u64,
    scheduler: Arc<dyn Scheduler>,
    interval: Duration,
    label: String,
    tick: RepeatingTask,
) {
    let next = scheduler.clone();
    let task_label = label.clone();
    scheduler.defer(
        interval,
        &label,
        Box::new(move || {
            if !live.is_current(generation) {
                return;
            }
            tick();
            schedule_every(live, generation, next, interval, task_label, tick);
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) -> DeferredTask) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        let make = move |name: &str| -> DeferredTask {
            let sink = sink.clone();
            let name = name.to_string();
            Box::new(move || sink.lock().push(name))
        };
        (log, make)
    }

    #[test]
    fn test_tasks_fire_only_when_due() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.defer(Duration::from_millis(2000), "sync", task("sync"));

        assert_eq!(scheduler.advance_ms(1999), 0);
        assert!(log.lock().is_empty());
        assert_eq!(scheduler.advance_ms(1), 1);
        assert_eq!(*log.lock(), vec!["sync"]);
        assert_eq!(scheduler.now(), Duration::from_millis(2000));
    }

    #[test]
    fn test_due_order_then_insertion_order() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.defer(Duration::from_millis(4000), "audit", task("audit"));
        scheduler.defer(Duration::from_millis(2000), "export", task("export"));
        scheduler.defer(Duration::from_millis(2000), "clean", task("clean"));

        assert_eq!(scheduler.pending_labels(), vec!["export", "clean", "audit"]);
        assert_eq!(scheduler.advance_ms(5000), 3);
        assert_eq!(*log.lock(), vec!["export", "clean", "audit"]);
    }

    #[test]
    fn test_task_can_schedule_followup() {
        let scheduler = Arc::new(ManualScheduler::new());
        let (log, task) = recorder();

        let inner = scheduler.clone();
        let followup = task("second");
        scheduler.defer(
            Duration::from_millis(1000),
            "first",
            Box::new(move || inner.defer(Duration::from_millis(500), "second", followup)),
        );

        assert_eq!(scheduler.advance_ms(1200), 1);
        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance_ms(300), 1);
        assert_eq!(*log.lock(), vec!["second"]);
    }

    #[test]
    fn test_run_until_idle_and_cancel() {
        let scheduler = ManualScheduler::new();
        let (log, task) = recorder();

        scheduler.defer(Duration::from_millis(800), "autosave", task("autosave"));
        scheduler.defer(Duration::from_millis(3000), "backup", task("backup"));
        assert_eq!(scheduler.run_until_idle(), 2);
        assert_eq!(log.lock().len(), 2);

        scheduler.defer(Duration::from_millis(10), "dropped", task("dropped"));
        assert_eq!(scheduler.cancel_all(), 1);
        assert_eq!(scheduler.run_until_idle(), 0);
        assert_eq!(log.lock().len(), 2);
    }

    fn counter() -> (Arc<AtomicU64>, RepeatingTask) {
        let count = Arc::new(AtomicU64::new(0));
        let sink = count.clone();
        let tick: RepeatingTask = Arc::new(move || {
            sink.fetch_add(1, Ordering::SeqCst);
        });
        (count, tick)
    }

    #[test]
    fn test_live_loop_ticks_every_interval() {
        let scheduler = Arc::new(ManualScheduler::new());
        let (count, tick) = counter();
        let live = LiveLoop::new();

        assert!(live.start(scheduler.clone(), Duration::from_millis(3000), "drift", tick.clone()));
        assert!(!live.start(scheduler.clone(), Duration::from_millis(3000), "drift", tick));

        scheduler.advance_ms(2999);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        scheduler.advance_ms(6001);
        assert_eq!(count.load(Ordering::SeqCst), 3);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_live_loop_restart_keeps_one_chain() {
        let scheduler = Arc::new(ManualScheduler::new());
        let (count, tick) = counter();
        let live = LiveLoop::new();

        live.start(scheduler.clone(), Duration::from_millis(1000), "stats", tick.clone());
        scheduler.advance_ms(500);
        live.stop();
        assert!(live.start(scheduler.clone(), Duration::from_millis(1000), "stats", tick));

        scheduler.advance_ms(500);
        assert_eq!(count.load(Ordering::SeqCst), 0);
        scheduler.advance_ms(500);
        assert_eq!(count.load(Ordering::SeqCst), 1);
        scheduler.advance_ms(3000);
        assert_eq!(count.load(Ordering::SeqCst), 4);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn test_live_loop_zero_interval_stays_off() {
        let scheduler = Arc::new(ManualScheduler::new());
        let (count, tick) = counter();
        let live = LiveLoop::new();

        assert!(!live.start(scheduler.clone(), Duration::ZERO, "stats", tick));
        assert!(!live.is_live());
        assert_eq!(scheduler.run_until_idle(), 0);
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_fires_after_delay() {
        let scheduler = TokioScheduler::current().unwrap();
        let (log, task) = recorder();

        scheduler.defer(Duration::from_millis(1500), "refresh", task("refresh"));
        assert_eq!(scheduler.in_flight(), 1);

        tokio::time::sleep(Duration::from_millis(1600)).await;
        assert_eq!(*log.lock(), vec!["refresh"]);
        assert_eq!(scheduler.in_flight(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_shutdown_aborts_pending() {
        let scheduler = TokioScheduler::current().unwrap();
        let (log, task) = recorder();

        scheduler.defer(Duration::from_millis(4000), "audit", task("audit"));
        assert_eq!(scheduler.shutdown(), 1);

        tokio::time::sleep(Duration::from_millis(5000)).await;
        assert!(log.lock().is_empty());
    }
}
