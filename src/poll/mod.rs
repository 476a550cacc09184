//! Eventually-consistent retry loop ("try until success").
//!
//! Assertion steps frequently race asynchronous propagation: a "create"
//! step's side effects land in read replicas, sync pipelines, and GraphQL
//! caches some time after the call returns. [`try_until_success`] wraps
//! such an assertion in a probe that is re-evaluated on a fixed cadence
//! until it reaches a terminal state or the caller's deadline fires.
//!
//! The loop never invents its own timeout: every call site supplies the
//! deadline, typically `tokio::time::sleep` of the suite's configured poll
//! deadline. Cancelling that future early has the same observable effect
//! as the deadline firing.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{self, Instant};
use tracing::{debug, trace};

use crate::error::{BoxError, PollError};

/// How long the background task keeps trying to hand its terminal result
/// to a caller that may already have returned. Best-effort cleanup: under
/// pathological scheduling the task can outlive the caller by up to this
/// window plus one in-flight probe.
const DELIVERY_GRACE: Duration = Duration::from_secs(1);

/// Outcome of one probe invocation.
#[derive(Debug)]
pub enum ProbeOutcome {
    /// The condition is not observable yet; try again on the next tick.
    /// Any error encountered this tick is discarded.
    Retry,
    /// Terminal success: stop polling and report `Ok`.
    Success,
    /// Terminal failure: stop polling and surface this error verbatim.
    Failure(BoxError),
}

/// Repeatedly invokes `probe` on a fixed `interval` until it reaches a
/// terminal state or `deadline` completes.
///
/// The first invocation happens one full interval after entry, and the
/// probe runs at most once per tick. Ticking and probing happen on a
/// dedicated background task; the calling task blocks until either a
/// terminal result arrives or the deadline fires. When the deadline wins,
/// the background task notices the caller is gone and stops at the next
/// suspension point; a probe that is mid-flight is not aborted, so its
/// side effects may still land afterwards.
///
/// # Errors
///
/// Returns [`PollError::DeadlineExceeded`] when `deadline` completes (or
/// is cancelled) before a terminal tick, and [`PollError::ProbeFailed`]
/// when the probe reports [`ProbeOutcome::Failure`].
///
/// # Panics
///
/// Panics in tokio's timer when `interval` is zero. A sane positive
/// interval is a caller precondition, not something this loop defaults.
pub async fn try_until_success<D, P, F>(
    deadline: D,
    interval: Duration,
    mut probe: P,
) -> Result<(), PollError>
where
    D: Future<Output = ()>,
    P: FnMut() -> F + Send + 'static,
    F: Future<Output = ProbeOutcome> + Send + 'static,
{
    let (result_tx, mut result_rx) = mpsc::channel::<Result<(), BoxError>>(1);

    tokio::spawn(async move {
        // Matches ticker semantics: no immediate first tick.
        let mut ticker = time::interval_at(Instant::now() + interval, interval);
        let mut attempts: u64 = 0;
        let terminal = loop {
            tokio::select! {
                // The caller dropping its receiver (deadline fired) is the
                // cleanup signal; a probe already in flight still completes.
                () = result_tx.closed() => {
                    debug!(attempts, "caller gone before a terminal tick, stopping probe task");
                    return;
                }
                _ = ticker.tick() => {}
            }
            attempts += 1;
            match probe().await {
                ProbeOutcome::Retry => {
                    trace!(attempts, "probe not terminal yet, waiting for next tick");
                }
                ProbeOutcome::Success => break Ok(()),
                ProbeOutcome::Failure(source) => break Err(source),
            }
        };
        debug!(attempts, ok = terminal.is_ok(), "probe reached terminal state");
        if result_tx
            .send_timeout(terminal, DELIVERY_GRACE)
            .await
            .is_err()
        {
            // Caller's deadline fired first; drop the result on the floor.
            debug!("terminal probe result undeliverable, caller already gone");
        }
    });

    tokio::pin!(deadline);
    tokio::select! {
        () = &mut deadline => Err(PollError::DeadlineExceeded),
        received = result_rx.recv() => match received {
            Some(Ok(())) => Ok(()),
            Some(Err(source)) => Err(PollError::ProbeFailed { source }),
            // The background task died without delivering (probe panicked).
            None => Err(PollError::ProbeFailed {
                source: String::from("probe task exited without delivering a result").into(),
            }),
        },
    }
}
