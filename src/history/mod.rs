//! Call-history stacks recording the scenario's outbound traffic.
//!
//! Every side-effecting call a step performs is pushed onto a pair of
//! stacks (one for requests, one for responses) so that later steps can
//! look back at prior actions without re-threading state through every
//! step function's signature. The two stacks are locked independently:
//! pairing a request with its response is a caller convention (push both
//! within the same step), not an enforced invariant.
//!
//! Payload shapes are heterogeneous by design: a scenario multiplexes many
//! unrelated request/response types through one stack, and only the
//! producing and consuming step pair knows the concrete type. The
//! [`Payload`] alias boxes values behind `Any`; [`downcast_payload`]
//! recovers the concrete type at the consuming site.

use std::any::Any;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::StackError;

/// Untyped payload stored on the suite's request/response stacks.
///
/// `Arc` rather than `Box` so that peeking clones cheaply and background
/// polling tasks can hold a payload beyond the lock's critical section.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// Wraps a value into a [`Payload`] for pushing onto a stack.
#[must_use]
pub fn payload<T: Send + Sync + 'static>(value: T) -> Payload {
    Arc::new(value)
}

/// Recovers a concrete reference from a [`Payload`].
///
/// Returns `None` when the payload holds a different type; the producing
/// and consuming step pair own the contract, so a `None` here is a caller
/// bug surfaced at the assertion site.
#[must_use]
pub fn downcast_payload<T: 'static>(value: &Payload) -> Option<&T> {
    value.downcast_ref::<T>()
}

/// A mutex-guarded LIFO stack of call payloads.
///
/// One instance records requests, a sibling instance records responses;
/// both are owned by the scenario's [`Suite`](crate::suite::Suite). Every
/// operation acquires the instance's exclusive lock for the duration of
/// the call, making the stack safe for concurrent use by background
/// polling tasks reading the latest entry while the main step flow
/// continues.
///
/// A poisoned lock (a panic while holding it) is absorbed rather than
/// propagated: each operation leaves the underlying vector consistent, so
/// the recovered state is usable.
#[derive(Debug, Default)]
pub struct CallStack<T> {
    items: Mutex<Vec<T>>,
}

impl<T> CallStack<T> {
    /// Creates an empty stack.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
        }
    }

    /// Acquires the lock, recovering from poisoning.
    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a value at the logical top of the stack. Never fails.
    pub fn push(&self, value: T) {
        self.lock().push(value);
    }

    /// Removes and returns the most recently pushed value.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] when the stack has no elements.
    pub fn pop(&self) -> Result<T, StackError> {
        self.lock().pop().ok_or(StackError::Empty)
    }

    /// Returns the number of elements currently on the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns whether the stack has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<T: Clone> CallStack<T> {
    /// Returns the most recently pushed value without removing it.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::Empty`] when the stack has no elements.
    pub fn peek(&self) -> Result<T, StackError> {
        self.lock().last().cloned().ok_or(StackError::Empty)
    }

    /// Returns the last `n` values in original push order (oldest of the
    /// `n` first) without removing them.
    ///
    /// Repeated calls observe the same values. `peek_multi(0)` succeeds on
    /// any stack and returns an empty vector.
    ///
    /// # Errors
    ///
    /// Returns [`StackError::InsufficientDepth`] when fewer than `n`
    /// elements exist; a partial slice is never returned.
    pub fn peek_multi(&self, n: usize) -> Result<Vec<T>, StackError> {
        let items = self.lock();
        let start = items
            .len()
            .checked_sub(n)
            .ok_or(StackError::InsufficientDepth)?;
        let Some(tail) = items.get(start..) else {
            return Err(StackError::InsufficientDepth);
        };
        Ok(tail.to_vec())
    }
}
