//! # Gurubook Runtime
//!
//! Store runtime for the Gurubook client state layer.
//!
//! The [`Store`](store::Store) owns a feature's state and coordinates the
//! action → reducer → effects → action feedback loop:
//!
//! - **State** lives behind a `RwLock`; the reducer runs under the write lock
//! - **Effects** are handed to an injected [`EffectRunner`] in spawned tasks
//! - **Feedback**: actions produced by effects are reduced, then broadcast to
//!   observers (request/response callers, UI subscribers)
//!
//! ## Example
//!
//! ```ignore
//! use gurubook_runtime::Store;
//!
//! let store = Store::new(initial_state, reducer, environment, runner);
//!
//! // Send an action
//! store.send(Action::DoSomething).await?;
//!
//! // Read state
//! let value = store.state(|s| s.some_field).await;
//! ```

use gurubook_core::{effect::EffectRunner, reducer::Reducer};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::{RwLock, watch};

pub use store::Store;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, Clone, PartialEq, Eq)]
    pub enum StoreError {
        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,

        /// Shutdown timed out waiting for effects to complete
        #[error("Shutdown timed out with {0} effects still running")]
        ShutdownTimeout(usize),

        /// Timeout waiting for a matching action
        ///
        /// Returned by `send_and_wait_for`. The effect that would have produced
        /// the action keeps running.
        #[error("Timeout waiting for action")]
        Timeout,

        /// Action broadcast channel closed
        #[error("Action broadcast channel closed")]
        ChannelClosed,
    }
}

pub use error::StoreError;

/// Handle for tracking effect completion
///
/// Returned by [`Store::send()`]. Effects started by the action, and the
/// effects of every action they feed back, share one counter; [`wait`]
/// resolves once the whole cascade has finished.
///
/// [`wait`]: EffectHandle::wait
#[derive(Clone)]
pub struct EffectHandle {
    effects: Arc<AtomicUsize>,
    completion: watch::Receiver<()>,
}

impl EffectHandle {
    fn new() -> (Self, EffectTracking) {
        let counter = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = watch::channel(());

        let handle = Self {
            effects: Arc::clone(&counter),
            completion: rx,
        };

        let tracking = EffectTracking {
            counter,
            notifier: Arc::new(tx),
        };

        (handle, tracking)
    }

    /// Create a handle that's already complete
    #[must_use]
    pub fn completed() -> Self {
        let (_tx, rx) = watch::channel(());

        Self {
            effects: Arc::new(AtomicUsize::new(0)),
            completion: rx,
        }
    }

    /// Number of effects still running for this handle
    #[must_use]
    pub fn pending(&self) -> usize {
        self.effects.load(Ordering::SeqCst)
    }

    /// Wait for all effects (including fed-back cascades) to complete
    pub async fn wait(&mut self) {
        while self.effects.load(Ordering::SeqCst) > 0 {
            if self.completion.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait for all effects to complete with a timeout
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Timeout`] if the timeout expires first.
    pub async fn wait_with_timeout(&mut self, timeout: Duration) -> Result<(), StoreError> {
        tokio::time::timeout(timeout, self.wait())
            .await
            .map_err(|_| StoreError::Timeout)
    }
}

impl std::fmt::Debug for EffectHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectHandle")
            .field("pending_effects", &self.effects.load(Ordering::SeqCst))
            .finish_non_exhaustive()
    }
}

/// Internal: tracking context shared by every effect of one cascade
#[derive(Clone)]
struct EffectTracking {
    counter: Arc<AtomicUsize>,
    notifier: Arc<watch::Sender<()>>,
}

impl EffectTracking {
    fn increment(&self) {
        self.counter.fetch_add(1, Ordering::SeqCst);
    }

    fn decrement(&self) {
        if self.counter.fetch_sub(1, Ordering::SeqCst) == 1 {
            let _ = self.notifier.send(());
        }
    }
}

/// Internal: RAII guard that decrements the effect counter on drop
///
/// Runs even if the effect task panics.
struct DecrementGuard(EffectTracking);

impl Drop for DecrementGuard {
    fn drop(&mut self) {
        self.0.decrement();
    }
}

/// Guard that decrements an atomic counter on drop (for shutdown tracking)
struct AtomicCounterGuard(Arc<AtomicUsize>);

impl Drop for AtomicCounterGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Store module - the runtime for reducers
pub mod store {
    use super::{
        Arc, AtomicBool, AtomicCounterGuard, AtomicUsize, DecrementGuard, Duration,
        EffectHandle, EffectRunner, EffectTracking, Ordering, Reducer, RwLock, StoreError,
    };
    use tokio::sync::broadcast;

    /// Default capacity of the action broadcast channel
    const DEFAULT_BROADCAST_CAPACITY: usize = 64;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (pure transition logic)
    /// 3. Environment (read-only configuration for the reducer)
    /// 4. Effect runner (the only place side effects happen)
    ///
    /// Cloning a store is cheap; clones share the same state.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     Session::default(),
    ///     AuthReducer::new(),
    ///     AuthEnvironment::new(Locale::Hy),
    ///     AuthEffectRunner::new(transport, notifier),
    /// );
    ///
    /// store.send(AuthAction::SignOut).await?;
    /// ```
    pub struct Store<R, X>
    where
        R: Reducer,
    {
        state: Arc<RwLock<R::State>>,
        reducer: Arc<R>,
        environment: Arc<R::Environment>,
        runner: Arc<X>,
        shutdown: Arc<AtomicBool>,
        pending_effects: Arc<AtomicUsize>,
        /// Actions produced by effects, broadcast after they are reduced.
        action_broadcast: broadcast::Sender<R::Action>,
    }

    impl<R, X> Store<R, X>
    where
        R: Reducer + Send + Sync + 'static,
        R::State: Send + Sync + 'static,
        R::Action: Clone + Send + Sync + std::fmt::Debug + 'static,
        R::Effect: Send + 'static,
        R::Environment: Send + Sync + 'static,
        X: EffectRunner<Effect = R::Effect, Action = R::Action> + 'static,
    {
        /// Create a new store with initial state, reducer, environment and effect runner
        #[must_use]
        pub fn new(initial_state: R::State, reducer: R, environment: R::Environment, runner: X) -> Self {
            Self::with_broadcast_capacity(
                initial_state,
                reducer,
                environment,
                runner,
                DEFAULT_BROADCAST_CAPACITY,
            )
        }

        /// Create a store with a custom action broadcast capacity
        ///
        /// Increase the capacity when many observers subscribe or when
        /// bursts of fed-back actions are expected.
        #[must_use]
        pub fn with_broadcast_capacity(
            initial_state: R::State,
            reducer: R,
            environment: R::Environment,
            runner: X,
            capacity: usize,
        ) -> Self {
            let (action_broadcast, _) = broadcast::channel(capacity.max(1));

            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                runner: Arc::new(runner),
                shutdown: Arc::new(AtomicBool::new(false)),
                pending_effects: Arc::new(AtomicUsize::new(0)),
                action_broadcast,
            }
        }

        /// Send an action to the store
        ///
        /// 1. Acquires write lock on state
        /// 2. Calls reducer with (state, action, environment)
        /// 3. Spawns every returned effect on the effect runner
        /// 4. Effects may produce more actions (feedback loop)
        ///
        /// `send()` returns once the reducer has run and effects are started,
        /// not when they complete. Use the returned [`EffectHandle`] to wait.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownInProgress`] if the store is shutting down.
        #[tracing::instrument(skip(self, action), name = "store_send")]
        pub async fn send(&self, action: R::Action) -> Result<EffectHandle, StoreError> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            let (handle, tracking) = EffectHandle::new();
            self.dispatch(action, &tracking).await;
            Ok(handle)
        }

        /// Send an action and wait for a matching fed-back action
        ///
        /// Designed for request/response use: subscribes to the action
        /// broadcast *before* sending, then returns the first action produced
        /// by an effect that satisfies `predicate`. By the time it is
        /// returned, the matching action has already been reduced.
        ///
        /// The timeout only bounds the wait. Effects keep running.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Timeout`]: no matching action before the timeout
        /// - [`StoreError::ChannelClosed`]: the broadcast channel closed
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        pub async fn send_and_wait_for<F>(
            &self,
            action: R::Action,
            predicate: F,
            timeout: Duration,
        ) -> Result<R::Action, StoreError>
        where
            F: Fn(&R::Action) -> bool,
        {
            let mut rx = self.action_broadcast.subscribe();

            self.send(action).await?;

            tokio::time::timeout(timeout, async {
                loop {
                    match rx.recv().await {
                        Ok(action) if predicate(&action) => return Ok(action),
                        Ok(_) => {},
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::warn!(skipped, "Action observer lagged");
                        },
                        Err(broadcast::error::RecvError::Closed) => {
                            return Err(StoreError::ChannelClosed);
                        },
                    }
                }
            })
            .await
            .map_err(|_| StoreError::Timeout)?
        }

        /// Subscribe to actions produced by effects
        ///
        /// Only fed-back actions are broadcast, not the actions passed to
        /// [`send`](Self::send).
        #[must_use]
        pub fn subscribe_actions(&self) -> broadcast::Receiver<R::Action> {
            self.action_broadcast.subscribe()
        }

        /// Read current state via a closure
        ///
        /// ```ignore
        /// let loading = store.state(|s| s.loading).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Number of effects currently running across all actions
        #[must_use]
        pub fn pending_effects(&self) -> usize {
            self.pending_effects.load(Ordering::Acquire)
        }

        /// Gracefully shut the store down
        ///
        /// New actions are refused immediately; running effects get until
        /// `timeout` to finish. Actions fed back by those effects are still
        /// reduced and broadcast, so every started cascade reaches its end.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::ShutdownTimeout`] if effects are still
        /// running when the timeout expires.
        pub async fn shutdown(&self, timeout: Duration) -> Result<(), StoreError> {
            tracing::info!("Initiating graceful shutdown");
            self.shutdown.store(true, Ordering::Release);

            let start = std::time::Instant::now();
            let poll_interval = Duration::from_millis(10);

            loop {
                let pending = self.pending_effects.load(Ordering::Acquire);

                if pending == 0 {
                    tracing::info!("All effects completed, shutdown successful");
                    return Ok(());
                }

                if start.elapsed() >= timeout {
                    tracing::error!(pending_effects = pending, "Shutdown timeout");
                    return Err(StoreError::ShutdownTimeout(pending));
                }

                tokio::time::sleep(poll_interval).await;
            }
        }

        /// Reduce one action and start its effects under `tracking`
        async fn dispatch(&self, action: R::Action, tracking: &EffectTracking) {
            tracing::debug!(?action, "Processing action");
            metrics::counter!("store.actions.processed").increment(1);

            let effects = {
                let mut state = self.state.write().await;
                self.reducer.reduce(&mut *state, action, &*self.environment)
            };

            tracing::trace!("Reducer returned {} effects", effects.len());
            for effect in effects {
                self.execute_effect(effect, tracking.clone());
            }
        }

        /// Execute an effect in a spawned task
        ///
        /// If the runner produces an action, it is reduced under the same
        /// tracking (so [`EffectHandle::wait`] covers the cascade) and then
        /// broadcast to observers.
        #[allow(clippy::needless_pass_by_value)] // tracking moves into the task
        fn execute_effect(&self, effect: R::Effect, tracking: EffectTracking) {
            metrics::counter!("store.effects.executed").increment(1);
            tracking.increment();

            self.pending_effects.fetch_add(1, Ordering::SeqCst);
            let pending_guard = AtomicCounterGuard(Arc::clone(&self.pending_effects));

            let store = self.clone();

            tokio::spawn(async move {
                let _guard = DecrementGuard(tracking.clone());
                let _pending_guard = pending_guard;

                let Some(action) = store.runner.run(effect).await else {
                    tracing::trace!("Effect completed with no action");
                    return;
                };

                tracing::trace!("Effect produced an action, feeding back");
                store.dispatch(action.clone(), &tracking).await;
                let _ = store.action_broadcast.send(action);
            });
        }
    }

    impl<R, X> Clone for Store<R, X>
    where
        R: Reducer,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                runner: Arc::clone(&self.runner),
                shutdown: Arc::clone(&self.shutdown),
                pending_effects: Arc::clone(&self.pending_effects),
                action_broadcast: self.action_broadcast.clone(),
            }
        }
    }
}
