//! Step definitions for poll-loop behavioural scenarios.

use std::sync::Arc;
use std::sync::atomic::Ordering;
use std::time::Duration;

use rstest_bdd_macros::{given, then, when};
use testrig::error::PollError;
use testrig::poll::{ProbeOutcome, try_until_success};

use super::state::{PollLoopState, PollOutcome, ProbeBehaviour, StepResult};

/// Tick cadence for scenarios; generous enough to absorb scheduler jitter
/// when asserting invocation counts.
const TICK: Duration = Duration::from_millis(20);

/// Deadline comfortably beyond any terminal tick these scenarios need.
const GENEROUS_DEADLINE: Duration = Duration::from_secs(5);

/// Deadline that fires midway through the third tick.
const SHORT_DEADLINE: Duration = Duration::from_millis(50);

// Given step definitions

#[given("a probe that succeeds on attempt {attempt}")]
fn a_probe_that_succeeds_on_attempt(
    poll_loop_state: &PollLoopState,
    attempt: String,
) -> StepResult<()> {
    let terminal_attempt = attempt
        .parse::<usize>()
        .map_err(|_| format!("step expected a numeric attempt, got {attempt}"))?;
    poll_loop_state
        .behaviour
        .set(ProbeBehaviour::SucceedOnAttempt(terminal_attempt));
    Ok(())
}

#[given("a probe that fails terminally")]
fn a_probe_that_fails_terminally(poll_loop_state: &PollLoopState) {
    poll_loop_state.behaviour.set(ProbeBehaviour::FailTerminally);
}

#[given("a probe that never reaches a terminal state")]
fn a_probe_that_never_settles(poll_loop_state: &PollLoopState) {
    poll_loop_state.behaviour.set(ProbeBehaviour::NeverSettle);
}

// When step definitions

#[when("the probe is polled under a generous deadline")]
fn the_probe_is_polled_generously(poll_loop_state: &PollLoopState) -> StepResult<()> {
    poll(poll_loop_state, GENEROUS_DEADLINE)
}

#[when("the probe is polled under a deadline shorter than three ticks")]
fn the_probe_is_polled_under_a_short_deadline(poll_loop_state: &PollLoopState) -> StepResult<()> {
    poll(poll_loop_state, SHORT_DEADLINE)
}

/// Installs a test-writer subscriber so poll-loop diagnostics surface in
/// captured test output when `RUST_LOG` asks for them.
fn init_tracing() {
    drop(
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init(),
    );
}

/// Runs the poll loop on a scratch runtime and records the outcome.
fn poll(state: &PollLoopState, deadline: Duration) -> StepResult<()> {
    init_tracing();
    let behaviour = state
        .behaviour
        .get()
        .ok_or_else(|| String::from("probe behaviour should be configured"))?;
    let invocations = state
        .invocations
        .get()
        .ok_or_else(|| String::from("invocation counter should be initialised"))?;

    let counter = Arc::clone(&invocations);
    let probe = move || {
        let attempt = counter.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = probe_outcome(behaviour, attempt);
        async move { outcome }
    };

    let runtime =
        tokio::runtime::Runtime::new().map_err(|_| String::from("failed to create tokio runtime"))?;
    let result = runtime
        .block_on(async { try_until_success(tokio::time::sleep(deadline), TICK, probe).await });

    state.outcome.set(match result {
        Ok(()) => PollOutcome::Success,
        Err(PollError::DeadlineExceeded) => PollOutcome::DeadlineExceeded,
        Err(PollError::ProbeFailed { source }) => PollOutcome::ProbeFailure(source.to_string()),
    });
    Ok(())
}

/// Maps the configured behaviour to this attempt's outcome.
fn probe_outcome(behaviour: ProbeBehaviour, attempt: usize) -> ProbeOutcome {
    match behaviour {
        ProbeBehaviour::SucceedOnAttempt(terminal_attempt) if attempt >= terminal_attempt => {
            ProbeOutcome::Success
        }
        ProbeBehaviour::SucceedOnAttempt(_) => ProbeOutcome::Retry,
        ProbeBehaviour::FailTerminally => {
            ProbeOutcome::Failure(String::from("data not sync").into())
        }
        ProbeBehaviour::NeverSettle => ProbeOutcome::Retry,
    }
}

// Then step definitions

#[then("polling succeeds")]
fn polling_succeeds(poll_loop_state: &PollLoopState) -> StepResult<()> {
    match observed_outcome(poll_loop_state)? {
        PollOutcome::Success => Ok(()),
        PollOutcome::ProbeFailure(message) => {
            Err(format!("expected success, got probe failure: {message}"))
        }
        PollOutcome::DeadlineExceeded => Err(String::from("expected success, hit the deadline")),
    }
}

#[then("polling fails with the probe's own error")]
fn polling_fails_with_probe_error(poll_loop_state: &PollLoopState) -> StepResult<()> {
    match observed_outcome(poll_loop_state)? {
        PollOutcome::ProbeFailure(message) if message == "data not sync" => Ok(()),
        PollOutcome::ProbeFailure(message) => Err(format!("unexpected failure text: {message}")),
        PollOutcome::Success => Err(String::from("expected a probe failure, got success")),
        PollOutcome::DeadlineExceeded => {
            Err(String::from("expected a probe failure, hit the deadline"))
        }
    }
}

#[then("polling fails with a deadline error")]
fn polling_fails_with_deadline_error(poll_loop_state: &PollLoopState) -> StepResult<()> {
    match observed_outcome(poll_loop_state)? {
        PollOutcome::DeadlineExceeded => Ok(()),
        PollOutcome::Success => Err(String::from("expected the deadline to fire, got success")),
        PollOutcome::ProbeFailure(message) => Err(format!(
            "expected the deadline to fire, got probe failure: {message}"
        )),
    }
}

#[then("the probe ran {count} times")]
fn the_probe_ran_n_times(poll_loop_state: &PollLoopState, count: String) -> StepResult<()> {
    let expected = count
        .parse::<usize>()
        .map_err(|_| format!("step expected a numeric count, got {count}"))?;
    let invocations = poll_loop_state
        .invocations
        .get()
        .ok_or_else(|| String::from("invocation counter should be initialised"))?;
    let observed = invocations.load(Ordering::SeqCst);
    if observed == expected {
        Ok(())
    } else {
        Err(format!("expected {expected} probe runs, observed {observed}"))
    }
}

/// Helper to get the recorded outcome.
fn observed_outcome(state: &PollLoopState) -> StepResult<PollOutcome> {
    state
        .outcome
        .get()
        .ok_or_else(|| String::from("poll outcome should be recorded by a when step"))
}
