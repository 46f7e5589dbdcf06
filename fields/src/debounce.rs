// Timer and request bookkeeping shared by the field controllers.
use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;

/// Runs a task once no new `schedule` call arrived for `wait`.
///
/// Each `schedule` cancels the pending timer. When the timer fires the task is
/// detached into its own tokio task, so a later `schedule` or `cancel` no
/// longer stops a task that already started.
///
/// In leading mode the task runs immediately if no quiet window is open, and
/// calls inside the window only extend it.
///
/// Tasks go to the runtime the debouncer was created in (or the one given to
/// [`Debouncer::on`]), so `schedule` works from threads outside any runtime.
#[derive(Debug)]
pub struct Debouncer {
    wait: Duration,
    leading: bool,
    runtime: Option<Handle>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(wait: Duration) -> Self {
        Self {
            wait,
            leading: false,
            runtime: Handle::try_current().ok(),
            pending: Mutex::new(None),
        }
    }

    /// Spawns timers and tasks on `runtime`.
    pub fn on(mut self, runtime: Handle) -> Self {
        self.runtime = Some(runtime);
        self
    }

    pub fn leading(mut self, leading: bool) -> Self {
        self.leading = leading;
        self
    }

    pub fn wait(&self) -> Duration {
        self.wait
    }

    /// Panics when the debouncer has no runtime and the caller is not inside one.
    pub fn schedule<F>(&self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.lock();
        let window_open = pending.as_ref().is_some_and(|handle| !handle.is_finished());
        if let Some(handle) = pending.take() {
            handle.abort();
        }

        let wait = self.wait;
        let timer = if self.leading {
            if !window_open {
                self.spawn(task);
            }
            self.spawn(async move {
                tokio::time::sleep(wait).await;
            })
        } else {
            self.spawn(async move {
                tokio::time::sleep(wait).await;
                tokio::spawn(task);
            })
        };
        *pending = Some(timer);
    }

    pub fn cancel(&self) {
        if let Some(handle) = self.lock().take() {
            handle.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock().as_ref().is_some_and(|handle| !handle.is_finished())
    }

    fn spawn<F>(&self, task: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match &self.runtime {
            Some(runtime) => runtime.spawn(task),
            None => tokio::spawn(task),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Monotonic counter identifying a field's newest input event.
///
/// A response is only applied while the ticket it was issued under is still
/// current.
#[derive(Debug, Default)]
pub struct RequestTicket {
    current: AtomicU64,
}

impl RequestTicket {
    pub fn issue(&self) -> u64 {
        self.current.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn is_current(&self, ticket: u64) -> bool {
        self.current.load(Ordering::SeqCst) == ticket
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;
    use std::sync::Arc;

    fn counting_task(counter: &Arc<AtomicUsize>) -> impl Future<Output = ()> + Send + 'static {
        let counter = Arc::clone(counter);
        async move {
            counter.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_schedule_runs() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        for _ in 0..5 {
            debouncer.schedule(counting_task(&runs));
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(60)).await;
        tokio::task::yield_now().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_pending_run() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100));

        debouncer.schedule(counting_task(&runs));
        debouncer.cancel();
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leading_runs_first_call_only_within_window() {
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(100)).leading(true);

        debouncer.schedule(counting_task(&runs));
        tokio::task::yield_now().await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(50)).await;
        debouncer.schedule(counting_task(&runs));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_millis(100)).await;
        debouncer.schedule(counting_task(&runs));
        tokio::task::yield_now().await;
        assert_eq!(runs.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_schedule_from_thread_outside_runtime() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let runs = Arc::new(AtomicUsize::new(0));
        let debouncer = Debouncer::new(Duration::from_millis(10)).on(runtime.handle().clone());

        let task = counting_task(&runs);
        std::thread::scope(|scope| {
            scope.spawn(|| debouncer.schedule(task));
        });

        for _ in 0..200 {
            if runs.load(Ordering::SeqCst) == 1 {
                break;
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_request_ticket() {
        let ticket = RequestTicket::default();
        let first = ticket.issue();
        assert!(ticket.is_current(first));
        let second = ticket.issue();
        assert!(second > first);
        assert!(!ticket.is_current(first));
        assert!(ticket.is_current(second));
    }
}
