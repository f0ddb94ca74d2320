use std::any::Any;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::oneshot::{self, error::TryRecvError};
use tracing::{debug, trace, warn};

use crate::EngineError;

/// Message used when [`OperationController::abort`] is called without one.
pub const DEFAULT_ABORT_MESSAGE: &str = "Operation aborted";

/// Handle passed to the work function on every tick.
///
/// The first call to [`complete`](Tick::complete) or [`fail`](Tick::fail)
/// settles the operation; any later call is ignored.
#[derive(Debug)]
pub struct Tick<T> {
    number: u64,
    outcome: Option<Result<T, EngineError>>,
}

impl<T> Tick<T> {
    fn new() -> Self {
        Self {
            number: 0,
            outcome: None,
        }
    }

    pub fn complete(&mut self, value: T) {
        if self.outcome.is_none() {
            self.outcome = Some(Ok(value));
        }
    }

    pub fn fail(&mut self, error: EngineError) {
        if self.outcome.is_none() {
            self.outcome = Some(Err(error));
        }
    }

    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.outcome.is_some()
    }

    /// Zero-based index of the current tick.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }
}

/// Runs one chunked, tick-driven task at a time.
///
/// [`start`](Self::start) cancels whatever this controller was running and
/// returns a future that drives the new task: it calls the work function,
/// waits `interval`, and repeats until the work function settles its
/// [`Tick`]. Nothing runs on another thread; the only suspension point is the
/// wait between ticks, and a cancellation delivered there is observed before
/// the next tick.
///
/// Dropping an unfinished operation future releases the controller.
#[derive(Clone)]
pub struct OperationController {
    inner: Rc<Inner>,
}

struct Inner {
    name: &'static str,
    superseded: fn() -> EngineError,
    generation: Cell<u64>,
    active: RefCell<Option<Active>>,
}

struct Active {
    generation: u64,
    cancel: oneshot::Sender<EngineError>,
}

impl OperationController {
    /// `superseded` builds the error a running operation receives when a new
    /// one is started on this controller.
    #[must_use]
    pub fn new(name: &'static str, superseded: fn() -> EngineError) -> Self {
        Self {
            inner: Rc::new(Inner {
                name,
                superseded,
                generation: Cell::new(0),
                active: RefCell::new(None),
            }),
        }
    }

    /// Whether an operation is registered and not yet finished.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.active.borrow().is_some()
    }

    /// Generation of the most recently started operation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.get()
    }

    /// Start a new operation, superseding the active one.
    ///
    /// The supersession happens now, not when the returned future is first
    /// polled. Work only advances while the future is polled.
    pub fn start<T, F>(
        &self,
        interval: Duration,
        work: F,
    ) -> impl Future<Output = Result<T, EngineError>> + use<T, F>
    where
        T: 'static,
        F: FnMut(&mut Tick<T>) -> Result<(), EngineError> + 'static,
    {
        if self.inner.cancel_active((self.inner.superseded)()) {
            debug!(operation = self.inner.name, "superseded in-flight operation");
        }

        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);
        let (cancel, cancelled) = oneshot::channel();
        *self.inner.active.borrow_mut() = Some(Active { generation, cancel });
        debug!(operation = self.inner.name, generation, ?interval, "operation started");

        let registration = Registration {
            inner: Rc::clone(&self.inner),
            generation,
        };
        drive(registration, interval, work, cancelled)
    }

    /// Cancel the active operation, if any. Its future resolves with
    /// [`EngineError::Cancelled`] carrying `message`.
    pub fn abort(&self, message: Option<&str>) -> bool {
        let message = message.unwrap_or(DEFAULT_ABORT_MESSAGE);
        let aborted = self.cancel_with(EngineError::Cancelled(message.to_owned()));
        if aborted {
            debug!(operation = self.inner.name, message, "operation aborted");
        }
        aborted
    }

    pub(crate) fn cancel_with(&self, reason: EngineError) -> bool {
        self.inner.cancel_active(reason)
    }
}

impl Inner {
    fn cancel_active(&self, reason: EngineError) -> bool {
        match self.active.borrow_mut().take() {
            Some(active) => {
                // The receiver is gone only if the future was dropped mid-flight.
                let _ = active.cancel.send(reason);
                true
            }
            None => false,
        }
    }

    fn release(&self, generation: u64) {
        let mut active = self.active.borrow_mut();
        if active.as_ref().is_some_and(|a| a.generation == generation) {
            *active = None;
        }
    }
}

/// Ties an operation future to its controller slot.
struct Registration {
    inner: Rc<Inner>,
    generation: u64,
}

impl Drop for Registration {
    fn drop(&mut self) {
        self.inner.release(self.generation);
    }
}

async fn drive<T, F>(
    registration: Registration,
    interval: Duration,
    mut work: F,
    mut cancelled: oneshot::Receiver<EngineError>,
) -> Result<T, EngineError>
where
    F: FnMut(&mut Tick<T>) -> Result<(), EngineError>,
{
    let name = registration.inner.name;
    let generation = registration.generation;
    let mut tick = Tick::new();

    loop {
        match cancelled.try_recv() {
            Ok(reason) => return Err(reason),
            Err(TryRecvError::Closed) => {
                return Err(EngineError::Cancelled(DEFAULT_ABORT_MESSAGE.to_owned()));
            }
            Err(TryRecvError::Empty) => {}
        }

        trace!(operation = name, generation, tick = tick.number, "tick");
        match panic::catch_unwind(AssertUnwindSafe(|| work(&mut tick))) {
            Ok(Ok(())) => {}
            Ok(Err(err)) => tick.fail(err),
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                warn!(operation = name, generation, %message, "tick panicked");
                tick.fail(EngineError::Unexpected(message));
            }
        }

        if let Some(outcome) = tick.outcome.take() {
            debug!(
                operation = name,
                generation,
                ticks = tick.number + 1,
                ok = outcome.is_ok(),
                "operation finished"
            );
            return outcome;
        }
        tick.number += 1;

        tokio::select! {
            biased;
            reason = &mut cancelled => {
                return Err(reason.unwrap_or_else(|_| {
                    EngineError::Cancelled(DEFAULT_ABORT_MESSAGE.to_owned())
                }));
            }
            () = pause(interval) => {}
        }
    }
}

async fn pause(interval: Duration) {
    if interval.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(interval).await;
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "tick panicked".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;
    use std::time::Duration;

    use super::*;

    fn controller() -> OperationController {
        OperationController::new("test", || EngineError::Superseded)
    }

    /// Work that counts ticks and completes with the count after `n` ticks.
    fn count_to(
        n: u64,
        seen: Rc<RefCell<Vec<u64>>>,
    ) -> impl FnMut(&mut Tick<u64>) -> Result<(), EngineError> {
        move |tick: &mut Tick<u64>| {
            seen.borrow_mut().push(tick.number());
            if tick.number() + 1 == n {
                tick.complete(n);
            }
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn runs_until_complete() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let ctl = controller();
        let result = ctl.start(Duration::from_millis(5), count_to(4, seen.clone())).await;
        assert_eq!(result, Ok(4));
        assert_eq!(*seen.borrow(), vec![0, 1, 2, 3]);
        assert!(!ctl.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn ticks_are_spaced_by_interval() {
        let start = tokio::time::Instant::now();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let result = controller()
            .start(Duration::from_millis(10), count_to(3, seen))
            .await;
        assert_eq!(result, Ok(3));
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(20), "finished after {elapsed:?}");
        assert!(elapsed < Duration::from_millis(30), "finished after {elapsed:?}");
    }

    #[tokio::test]
    async fn complete_is_idempotent() {
        let result = controller()
            .start(Duration::ZERO, |tick: &mut Tick<&str>| {
                tick.complete("first");
                tick.complete("second");
                tick.fail(EngineError::Unexpected("late".into()));
                assert!(tick.is_settled());
                Ok(())
            })
            .await;
        assert_eq!(result, Ok("first"));
    }

    #[tokio::test]
    async fn fail_wins_when_first() {
        let result = controller()
            .start(Duration::ZERO, |tick: &mut Tick<()>| {
                tick.fail(EngineError::Unexpected("bad".into()));
                tick.complete(());
                Ok(())
            })
            .await;
        assert_eq!(result, Err(EngineError::Unexpected("bad".into())));
    }

    #[tokio::test]
    async fn returned_error_fails_the_operation() {
        let result = controller()
            .start(Duration::ZERO, |_: &mut Tick<()>| {
                Err(EngineError::Unexpected("io".into()))
            })
            .await;
        assert_eq!(result, Err(EngineError::Unexpected("io".into())));
    }

    #[tokio::test]
    async fn panic_becomes_unexpected_error() {
        let result = controller()
            .start(Duration::ZERO, |_: &mut Tick<()>| -> Result<(), EngineError> {
                panic!("kaboom")
            })
            .await;
        assert_eq!(result, Err(EngineError::Unexpected("kaboom".into())));
    }

    #[tokio::test(start_paused = true)]
    async fn start_supersedes_previous() {
        let ctl = controller();
        let seen_first = Rc::new(RefCell::new(Vec::new()));
        let first = ctl.start(Duration::from_millis(1), count_to(10, seen_first.clone()));
        let second = ctl.start(Duration::from_millis(1), count_to(2, Rc::default()));

        assert_eq!(first.await, Err(EngineError::Superseded));
        assert!(seen_first.borrow().is_empty());
        assert_eq!(second.await, Ok(2));
        assert_eq!(ctl.generation(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn abort_stops_further_ticks() {
        let ctl = controller();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let op = ctl.start(Duration::from_millis(5), count_to(100, seen.clone()));
        let aborter = ctl.clone();
        let watcher = seen.clone();

        let (result, ()) = tokio::join!(op, async move {
            while watcher.borrow().len() < 3 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
            assert!(aborter.abort(Some("stop")));
        });

        assert_eq!(result, Err(EngineError::Cancelled("stop".into())));
        assert_eq!(seen.borrow().len(), 3);
        assert!(!ctl.abort(None));
    }

    #[tokio::test]
    async fn abort_without_operation_is_false() {
        assert!(!controller().abort(None));
    }

    #[tokio::test]
    async fn abort_default_message() {
        let ctl = controller();
        let op = ctl.start(Duration::ZERO, |_: &mut Tick<()>| Ok(()));
        assert!(ctl.abort(None));
        assert_eq!(
            op.await,
            Err(EngineError::Cancelled(DEFAULT_ABORT_MESSAGE.into()))
        );
    }

    #[tokio::test]
    async fn dropping_the_future_releases_the_controller() {
        let ctl = controller();
        let op = ctl.start(Duration::ZERO, |_: &mut Tick<()>| Ok(()));
        assert!(ctl.is_active());
        drop(op);
        assert!(!ctl.is_active());
    }
}
