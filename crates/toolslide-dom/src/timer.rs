//! Host timers
//!
//! The widget never sleeps; it asks the host for a single-shot deferred
//! callback and may cancel it before it fires. Two hosts are provided:
//! - [`ManualScheduler`]: virtual clock advanced explicitly
//! - [`TokioScheduler`]: one `tokio::time::sleep` task per timer

use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use std::time::Duration;

pub type TimerTask = Box<dyn FnOnce() + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

impl std::fmt::Display for TimerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "timer#{}", self.0)
    }
}

pub trait Scheduler: Send + Sync {
    /// Run `task` once after `delay`
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId;

    /// Cancel a pending timer. Returns false if it already fired or was
    /// cancelled.
    fn cancel(&self, id: TimerId) -> bool;

    /// Number of timers that have not fired yet
    fn pending(&self) -> usize;
}

#[derive(Default)]
struct ManualState {
    now: Duration,
    next_id: u64,
    /// Ordered by (due time, id) so equal deadlines fire in schedule order
    queue: BTreeMap<(Duration, u64), TimerTask>,
    due: HashMap<u64, Duration>,
}

/// Virtual clock. Nothing fires until [`ManualScheduler::advance`] is called.
#[derive(Default)]
pub struct ManualScheduler {
    state: Mutex<ManualState>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock
    pub fn now(&self) -> Duration {
        self.state.lock().now
    }

    /// Move the clock forward, firing every timer that falls due on the way.
    ///
    /// Tasks run without the scheduler lock held, so they may schedule or
    /// cancel timers; newly scheduled timers that fall inside the window
    /// fire during the same call. Returns the number of tasks run.
    pub fn advance(&self, delta: Duration) -> usize {
        let target = self.state.lock().now.saturating_add(delta);
        let mut fired = 0;

        loop {
            let task = {
                let mut state = self.state.lock();
                let next = state.queue.keys().next().copied();
                match next {
                    Some((due, id)) if due <= target => {
                        state.now = due;
                        state.due.remove(&id);
                        state.queue.remove(&(due, id))
                    }
                    _ => None,
                }
            };

            match task {
                Some(task) => {
                    task();
                    fired += 1;
                }
                None => break,
            }
        }

        let mut state = self.state.lock();
        if state.now < target {
            state.now = target;
        }

        tracing::trace!(fired, now_ms = state.now.as_millis() as u64, "Advanced manual clock");
        fired
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        let due = state.now.saturating_add(delay);
        state.queue.insert((due, id), task);
        state.due.insert(id, due);
        TimerId(id)
    }

    fn cancel(&self, id: TimerId) -> bool {
        let mut state = self.state.lock();
        match state.due.remove(&id.0) {
            Some(due) => state.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.state.lock().queue.len()
    }
}

#[derive(Default)]
struct TokioTimers {
    next_id: u64,
    tasks: HashMap<u64, tokio::task::AbortHandle>,
}

/// Real-time timers on a tokio runtime
pub struct TokioScheduler {
    handle: tokio::runtime::Handle,
    timers: Arc<Mutex<TokioTimers>>,
}

impl TokioScheduler {
    pub fn new(handle: tokio::runtime::Handle) -> Self {
        Self {
            handle,
            timers: Arc::new(Mutex::new(TokioTimers::default())),
        }
    }

    /// Scheduler bound to the runtime of the calling context, if any
    pub fn try_current() -> Option<Self> {
        tokio::runtime::Handle::try_current().ok().map(Self::new)
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: TimerTask) -> TimerId {
        // Held across spawn so the task cannot finish before it is tracked
        let mut timers = self.timers.lock();
        timers.next_id += 1;
        let id = timers.next_id;

        let registry = Arc::clone(&self.timers);
        let join = self.handle.spawn(async move {
            tokio::time::sleep(delay).await;
            if registry.lock().tasks.remove(&id).is_some() {
                task();
            }
        });
        timers.tasks.insert(id, join.abort_handle());

        TimerId(id)
    }

    fn cancel(&self, id: TimerId) -> bool {
        match self.timers.lock().tasks.remove(&id.0) {
            Some(handle) => {
                handle.abort();
                true
            }
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.timers.lock().tasks.len()
    }
}

impl Clone for TokioScheduler {
    fn clone(&self) -> Self {
        Self {
            handle: self.handle.clone(),
            timers: Arc::clone(&self.timers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter_task(counter: &Arc<AtomicUsize>) -> TimerTask {
        let counter = Arc::clone(counter);
        Box::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_manual_fires_when_due() {
        let clock = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        clock.schedule(Duration::from_millis(100), counter_task(&fired));
        assert_eq!(clock.pending(), 1);

        assert_eq!(clock.advance(Duration::from_millis(99)), 0);
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        assert_eq!(clock.advance(Duration::from_millis(1)), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(clock.pending(), 0);
        assert_eq!(clock.now(), Duration::from_millis(100));
    }

    #[test]
    fn test_manual_saturates_far_deadlines() {
        let clock = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        clock.advance(Duration::from_millis(1));
        clock.schedule(Duration::MAX, counter_task(&fired));
        assert_eq!(clock.advance(Duration::from_secs(3600)), 0);
        assert_eq!(clock.pending(), 1);

        assert_eq!(clock.advance(Duration::MAX), 1);
        assert_eq!(clock.now(), Duration::MAX);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_manual_cancel() {
        let clock = ManualScheduler::new();
        let fired = Arc::new(AtomicUsize::new(0));

        let id = clock.schedule(Duration::from_millis(50), counter_task(&fired));
        assert!(clock.cancel(id));
        assert!(!clock.cancel(id));

        clock.advance(Duration::from_secs(1));
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_manual_task_can_reschedule() {
        let clock = Arc::new(ManualScheduler::new());
        let fired = Arc::new(AtomicUsize::new(0));

        let inner_clock = Arc::clone(&clock);
        let inner_task = counter_task(&fired);
        clock.schedule(
            Duration::from_millis(10),
            Box::new(move || {
                inner_clock.schedule(Duration::from_millis(10), inner_task);
            }),
        );

        assert_eq!(clock.advance(Duration::from_millis(25)), 2);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_fires() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        scheduler.schedule(Duration::from_millis(100), counter_task(&fired));
        assert_eq!(scheduler.pending(), 1);

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_scheduler_cancel() {
        let scheduler = TokioScheduler::try_current().unwrap();
        let fired = Arc::new(AtomicUsize::new(0));

        let id = scheduler.schedule(Duration::from_millis(100), counter_task(&fired));
        assert!(scheduler.cancel(id));

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }
}
