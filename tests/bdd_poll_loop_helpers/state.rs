//! Shared behavioural-test state for poll-loop scenarios.

use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use rstest::fixture;
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;

/// Step result type for poll-loop BDD tests.
pub type StepResult<T> = Result<T, String>;

/// How the scenario's probe behaves on each invocation.
#[derive(Clone, Copy)]
pub enum ProbeBehaviour {
    /// Retries until the given 1-based attempt, then succeeds.
    SucceedOnAttempt(usize),
    /// Fails terminally on the first attempt.
    FailTerminally,
    /// Retries forever.
    NeverSettle,
}

/// High-level outcome observed after polling.
#[derive(Clone)]
pub enum PollOutcome {
    /// The loop returned success.
    Success,
    /// The loop surfaced a terminal probe failure with this message.
    ProbeFailure(String),
    /// The loop gave up when the deadline fired.
    DeadlineExceeded,
}

/// State shared across poll-loop test scenarios.
#[derive(Default, ScenarioState)]
pub struct PollLoopState {
    /// The configured probe behaviour.
    pub(crate) behaviour: Slot<ProbeBehaviour>,
    /// Number of times the probe ran.
    pub(crate) invocations: Slot<Arc<AtomicUsize>>,
    /// The outcome observed by the polling step.
    pub(crate) outcome: Slot<PollOutcome>,
}

/// Fixture providing a fresh poll-loop state.
#[fixture]
pub fn poll_loop_state() -> PollLoopState {
    let state = PollLoopState::default();
    state.invocations.set(Arc::new(AtomicUsize::new(0)));
    state
}
