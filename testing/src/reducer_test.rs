//! Ergonomic testing utilities for reducers
//!
//! This module provides a fluent API for testing reducers with readable Given-When-Then syntax.

#![allow(clippy::module_name_repetitions)] // ReducerTest is the natural name

use gurubook_core::reducer::Reducer;

/// Type alias for state assertion functions
type StateAssertion<S> = Box<dyn FnOnce(&S)>;

/// Type alias for effect assertion functions
type EffectAssertion<F> = Box<dyn FnOnce(&[F])>;

/// Fluent API for testing reducers with Given-When-Then syntax
///
/// # Example
///
/// ```ignore
/// use gurubook_testing::ReducerTest;
///
/// ReducerTest::new(AuthReducer::new())
///     .with_env(AuthEnvironment::default())
///     .given_state(Session::default())
///     .given_actions(vec![login_action.clone()])
///     .when_action(fulfilled_action)
///     .then_state(|session| assert!(session.is_logged_in))
///     .then_effects(|effects| assert_eq!(effects.len(), 2))
///     .run();
/// ```
pub struct ReducerTest<R>
where
    R: Reducer,
{
    reducer: R,
    environment: Option<R::Environment>,
    initial_state: Option<R::State>,
    history: Vec<R::Action>,
    action: Option<R::Action>,
    state_assertions: Vec<StateAssertion<R::State>>,
    effect_assertions: Vec<EffectAssertion<R::Effect>>,
}

impl<R> ReducerTest<R>
where
    R: Reducer,
{
    /// Create a new reducer test with the given reducer
    #[must_use]
    pub const fn new(reducer: R) -> Self {
        Self {
            reducer,
            environment: None,
            initial_state: None,
            history: Vec::new(),
            action: None,
            state_assertions: Vec::new(),
            effect_assertions: Vec::new(),
        }
    }

    /// Set the environment for the test
    #[must_use]
    pub fn with_env(mut self, env: R::Environment) -> Self {
        self.environment = Some(env);
        self
    }

    /// Set the initial state (Given)
    #[must_use]
    pub fn given_state(mut self, state: R::State) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Actions reduced before the action under test (Given)
    ///
    /// Their effects are discarded; only the state they leave behind matters.
    #[must_use]
    pub fn given_actions(mut self, actions: Vec<R::Action>) -> Self {
        self.history = actions;
        self
    }

    /// Set the action to test (When)
    #[must_use]
    pub fn when_action(mut self, action: R::Action) -> Self {
        self.action = Some(action);
        self
    }

    /// Add an assertion about the resulting state (Then)
    #[must_use]
    pub fn then_state<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&R::State) + 'static,
    {
        self.state_assertions.push(Box::new(assertion));
        self
    }

    /// Add an assertion about the effects of the action under test (Then)
    #[must_use]
    pub fn then_effects<F>(mut self, assertion: F) -> Self
    where
        F: FnOnce(&[R::Effect]) + 'static,
    {
        self.effect_assertions.push(Box::new(assertion));
        self
    }

    /// Run the test and execute all assertions
    ///
    /// # Panics
    ///
    /// Panics if initial state, action, or environment is not set,
    /// or if any assertions fail.
    #[allow(clippy::expect_used)] // Test code can use expect
    pub fn run(self) {
        let mut state = self
            .initial_state
            .expect("Initial state must be set with given_state()");

        let action = self.action.expect("Action must be set with when_action()");

        let env = self
            .environment
            .expect("Environment must be set with with_env()");

        for earlier in self.history {
            let _ = self.reducer.reduce(&mut state, earlier, &env);
        }

        let effects = self.reducer.reduce(&mut state, action, &env);

        for assertion in self.state_assertions {
            assertion(&state);
        }

        for assertion in self.effect_assertions {
            assertion(&effects);
        }
    }
}

/// Helper assertions for effects
pub mod assertions {
    /// Assert that there are no effects
    ///
    /// # Panics
    ///
    /// Panics if effects is not empty.
    pub fn assert_no_effects<F: std::fmt::Debug>(effects: &[F]) {
        assert!(
            effects.is_empty(),
            "Expected no effects, but found {}: {:?}",
            effects.len(),
            effects
        );
    }

    /// Assert the number of effects
    ///
    /// # Panics
    ///
    /// Panics if the number of effects doesn't match expected.
    pub fn assert_effects_count<F: std::fmt::Debug>(effects: &[F], expected: usize) {
        assert_eq!(
            effects.len(),
            expected,
            "Expected {expected} effects, but found {}: {effects:?}",
            effects.len(),
        );
    }

    /// Assert that at least one effect matches `predicate`
    ///
    /// # Panics
    ///
    /// Panics if no effect matches; `what` names the expected effect in the message.
    pub fn assert_has_effect<F, P>(effects: &[F], what: &str, predicate: P)
    where
        F: std::fmt::Debug,
        P: Fn(&F) -> bool,
    {
        assert!(
            effects.iter().any(predicate),
            "Expected {what} effect, but found: {effects:?}"
        );
    }

    /// Assert that no effect matches `predicate`
    ///
    /// # Panics
    ///
    /// Panics if any effect matches.
    pub fn assert_lacks_effect<F, P>(effects: &[F], what: &str, predicate: P)
    where
        F: std::fmt::Debug,
        P: Fn(&F) -> bool,
    {
        assert!(
            !effects.iter().any(predicate),
            "Expected no {what} effect, but found: {effects:?}"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gurubook_core::{smallvec, SmallVec};

    #[derive(Clone, Debug)]
    struct TestState {
        count: i32,
    }

    #[derive(Clone, Debug)]
    enum TestAction {
        Increment,
        Decrement,
    }

    #[derive(Clone, Debug, PartialEq)]
    enum TestEffect {
        Overflowed,
    }

    struct TestReducer;

    impl Reducer for TestReducer {
        type State = TestState;
        type Action = TestAction;
        type Effect = TestEffect;
        type Environment = i32;

        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            limit: &i32,
        ) -> SmallVec<[TestEffect; 4]> {
            match action {
                TestAction::Increment => {
                    state.count += 1;
                    if state.count > *limit {
                        return smallvec![TestEffect::Overflowed];
                    }
                    SmallVec::new()
                },
                TestAction::Decrement => {
                    state.count -= 1;
                    SmallVec::new()
                },
            }
        }
    }

    #[test]
    fn test_reducer_test_increment() {
        ReducerTest::new(TestReducer)
            .with_env(10)
            .given_state(TestState { count: 0 })
            .when_action(TestAction::Increment)
            .then_state(|state| {
                assert_eq!(state.count, 1);
            })
            .then_effects(|effects| {
                assertions::assert_no_effects(effects);
            })
            .run();
    }

    #[test]
    fn test_history_is_applied_first() {
        ReducerTest::new(TestReducer)
            .with_env(2)
            .given_state(TestState { count: 0 })
            .given_actions(vec![TestAction::Increment, TestAction::Increment])
            .when_action(TestAction::Increment)
            .then_state(|state| assert_eq!(state.count, 3))
            .then_effects(|effects| {
                assertions::assert_effects_count(effects, 1);
                assertions::assert_has_effect(effects, "overflow", |e| *e == TestEffect::Overflowed);
            })
            .run();
    }

    #[test]
    fn test_reducer_test_decrement() {
        ReducerTest::new(TestReducer)
            .with_env(10)
            .given_state(TestState { count: 5 })
            .when_action(TestAction::Decrement)
            .then_state(|state| {
                assert_eq!(state.count, 4);
            })
            .then_effects(|effects| {
                assertions::assert_lacks_effect(effects, "overflow", |e| *e == TestEffect::Overflowed);
            })
            .run();
    }
}
