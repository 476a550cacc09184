//! Credentials issued to scenario actors and their per-scenario cache.
//!
//! A scenario signs actors in ("a signed-in school admin", "a signed-in
//! student named Alice") and later issues calls on their behalf. The cache
//! maps a logical actor key — usually one of the [`user_group`] constants,
//! sometimes a literal actor name — to the credential minted for it. The
//! cache is a plain keyed store with replace-on-write semantics: no expiry
//! tracking, no revocation, discarded with the suite at scenario end.
//!
//! The cache is mutated only from the scenario's main task (the runner
//! executes a scenario's steps sequentially), so it takes `&mut self` for
//! writes and carries no lock. Background polling tasks must not hold a
//! reference to it; pass any needed token by value into the probe closure.

mod exchange;

pub use exchange::{TokenExchangeRequest, TokenExchanger};

#[cfg(test)]
pub(crate) use exchange::MockTokenExchanger;

use std::collections::HashMap;

use crate::error::CredentialError;

/// Well-known user-group keys used by sign-in steps.
///
/// These mirror the role vocabulary of the backend under test; steps that
/// sign in a named actor instead of a role use the actor's name as the
/// cache key directly.
pub mod user_group {
    /// Platform administrator.
    pub const ADMIN: &str = "USER_GROUP_ADMIN";
    /// Student actor.
    pub const STUDENT: &str = "USER_GROUP_STUDENT";
    /// Teacher actor.
    pub const TEACHER: &str = "USER_GROUP_TEACHER";
    /// Parent actor.
    pub const PARENT: &str = "USER_GROUP_PARENT";
    /// Tenant-scoped administrator.
    pub const SCHOOL_ADMIN: &str = "USER_GROUP_SCHOOL_ADMIN";
}

/// An authentication token issued to one scenario actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    /// The backend user the token was minted for.
    pub user_id: String,
    /// The session token presented on subsequent calls.
    pub auth_token: String,
    /// The user group the actor was signed in under.
    pub user_group: String,
}

/// Per-scenario store of issued credentials, keyed by logical actor.
///
/// At most one live credential exists per key: inserting under an existing
/// key silently replaces the previous entry (last-write-wins).
#[derive(Debug, Default)]
pub struct CredentialCache {
    entries: HashMap<String, Credential>,
}

impl CredentialCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Unconditionally stores `credential` under `actor`, replacing any
    /// prior entry.
    pub fn set(&mut self, actor: &str, credential: Credential) {
        self.entries.insert(actor.to_owned(), credential);
    }

    /// Looks up the credential cached for `actor`.
    #[must_use]
    pub fn get(&self, actor: &str) -> Option<&Credential> {
        self.entries.get(actor)
    }

    /// Looks up the credential for `actor`, treating absence as a failure.
    ///
    /// Assertion steps use this form: an actor that was never signed in is
    /// a scenario bug, not an expected state.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Missing`] when no prior sign-in step
    /// populated an entry under `actor`.
    pub fn require(&self, actor: &str) -> Result<&Credential, CredentialError> {
        self.entries.get(actor).ok_or_else(|| CredentialError::Missing {
            actor: actor.to_owned(),
        })
    }

    /// Returns the number of cached credentials.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no credential has been cached yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
