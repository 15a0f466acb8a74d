//! # Gurubook Core
//!
//! Core traits for the Gurubook client state layer.
//!
//! Client state is modelled as a pure state machine driven by actions:
//!
//! - **State**: the data a feature owns (for example the auth session)
//! - **Action**: every input to a reducer, both user intent and the results of
//!   asynchronous work
//! - **Reducer**: `(State, Action, Environment) → (State, Effects)`
//! - **Effect**: a plain value describing a side effect (an HTTP call, a
//!   notification, a header change). Reducers never perform I/O themselves.
//! - **Effect runner**: the imperative shell that interprets effect values and
//!   may feed a resulting action back into the reducer
//!
//! ## Example
//!
//! ```ignore
//! use gurubook_core::{reducer::Reducer, smallvec, SmallVec};
//!
//! impl Reducer for CounterReducer {
//!     type State = u32;
//!     type Action = CounterAction;
//!     type Effect = CounterEffect;
//!     type Environment = ();
//!
//!     fn reduce(
//!         &self,
//!         state: &mut u32,
//!         action: CounterAction,
//!         _env: &(),
//!     ) -> SmallVec<[CounterEffect; 4]> {
//!         *state += 1;
//!         smallvec![CounterEffect::Log(*state)]
//!     }
//! }
//! ```

pub use smallvec::{smallvec, SmallVec};

/// Reducer module - the core trait for state transitions
///
/// Reducers are pure functions: `(State, Action, Environment) → (State, Effects)`.
/// They are deterministic and can be exercised without a runtime.
pub mod reducer {
    use smallvec::SmallVec;

    /// The Reducer trait - core abstraction for state transitions
    ///
    /// # Type Parameters
    ///
    /// - `State`: The state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Effect`: The effect descriptions this reducer emits
    /// - `Environment`: Read-only configuration the reducer consults
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The effect description type this reducer emits
        type Effect;

        /// The environment type with injected configuration
        type Environment;

        /// Reduce an action into state changes and effects
        ///
        /// Implementations update `state` in place and return the effects to
        /// be executed by an [`EffectRunner`](crate::effect::EffectRunner).
        /// An empty vector means "no side effects".
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> SmallVec<[Self::Effect; 4]>;
    }
}

/// Effect module - interpreting effect descriptions
///
/// Effects are values returned from reducers. The runtime hands each one to
/// an [`EffectRunner`](effect::EffectRunner), which performs the I/O and
/// optionally produces a follow-up action.
pub mod effect {
    use std::future::Future;

    /// Executes effect descriptions produced by a reducer.
    ///
    /// The runner is the only place where side effects happen. It is
    /// injected into the store alongside the reducer so the reducer itself
    /// stays pure and testable.
    ///
    /// # Example
    ///
    /// ```ignore
    /// impl EffectRunner for LogRunner {
    ///     type Effect = CounterEffect;
    ///     type Action = CounterAction;
    ///
    ///     fn run(&self, effect: CounterEffect) -> impl Future<Output = Option<CounterAction>> + Send {
    ///         async move {
    ///             tracing::info!(?effect, "running");
    ///             None
    ///         }
    ///     }
    /// }
    /// ```
    pub trait EffectRunner: Send + Sync {
        /// The effect description type this runner interprets
        type Effect;

        /// The action type fed back into the store
        type Action;

        /// Execute one effect.
        ///
        /// Returns `Some(action)` when the effect's outcome must be reduced
        /// (for example the response of a network call), `None` for
        /// fire-and-forget effects.
        fn run(&self, effect: Self::Effect) -> impl Future<Output = Option<Self::Action>> + Send;
    }
}
