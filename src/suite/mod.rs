//! Per-scenario composition root.
//!
//! A [`Suite`] is constructed fresh in the runner's "before scenario" hook
//! and aggregates everything a scenario's steps share: the credential
//! cache, the request/response call-history stacks, the mutable scalars
//! steps thread between each other, and a non-owning handle to the
//! suite-lifetime connection bundle. Nothing is reused across scenarios,
//! which is what keeps scenarios isolated from one another.
//!
//! There is no teardown method: the owned sub-resources are plain
//! in-memory structures, so dropping the suite at scenario end is the
//! whole cleanup. The shared connections are dialled once before any
//! scenario runs and closed once by the suite-level "after suite" hook —
//! never by a scenario.
//!
//! # Single-writer convention
//!
//! The runner executes one scenario's steps strictly sequentially, so the
//! scalar fields and the credential cache are mutated only through `&mut`
//! from that main flow. Steps that spawn background polling tasks must
//! copy any scalar they need into the probe closure; the stacks are the
//! only suite state a background task may touch directly.

use std::sync::Arc;

use tracing::debug;
use ulid::Ulid;

use crate::credential::{Credential, CredentialCache, TokenExchangeRequest, TokenExchanger};
use crate::error::{CredentialError, ExchangeError};
use crate::history::{CallStack, Payload};

/// Tenant granted to scenarios that never chose one explicitly.
pub const DEFAULT_TENANT_ID: i64 = 1;

/// Per-scenario aggregate of fixture state.
///
/// `B` is the suite-level bundle of pre-established connection handles
/// (service clients, database pools, admin endpoints). The suite copies
/// the shared handle, it never clones or closes the connections
/// themselves.
pub struct Suite<B> {
    /// Identifier of the scenario this suite belongs to.
    pub scenario_id: String,
    /// Shared, suite-lifetime connection handles. Read-only: scenarios
    /// must not close or rebind them.
    pub connections: Arc<B>,
    /// Credentials issued by this scenario's sign-in steps.
    pub credentials: CredentialCache,
    /// Trace of outbound requests, most recent last.
    pub requests: CallStack<Payload>,
    /// Trace of responses, aligned with `requests` by caller convention
    /// (both pushed within the same step).
    pub responses: CallStack<Payload>,
    /// Tenant currently in scope; `0` means the scenario has not chosen
    /// one and [`Suite::tenant_id`] falls back to [`DEFAULT_TENANT_ID`].
    pub current_tenant_id: i64,
    /// Resource path scoping subsequent requests.
    pub resource_path: String,
    /// User group the next request is issued as.
    pub user_group_in_context: String,
}

impl<B> Suite<B> {
    /// Creates a fresh suite for one scenario.
    ///
    /// The credential cache and both stacks start empty; the scalars start
    /// at their zero values.
    pub fn new(scenario_id: impl Into<String>, connections: Arc<B>) -> Self {
        let scenario_id = scenario_id.into();
        debug!(%scenario_id, "scenario suite initialised");
        Self {
            scenario_id,
            connections,
            credentials: CredentialCache::new(),
            requests: CallStack::new(),
            responses: CallStack::new(),
            current_tenant_id: 0,
            resource_path: String::new(),
            user_group_in_context: String::new(),
        }
    }

    /// The tenant requests should be scoped to.
    ///
    /// Falls back to [`DEFAULT_TENANT_ID`] while the scenario has not set
    /// [`Suite::current_tenant_id`].
    #[must_use]
    pub const fn tenant_id(&self) -> i64 {
        if self.current_tenant_id == 0 {
            DEFAULT_TENANT_ID
        } else {
            self.current_tenant_id
        }
    }

    /// Signs an actor in: mints a fresh user id, exchanges the raw
    /// identity-provider token for a session token scoped to the suite's
    /// tenant, and caches the credential under `actor`.
    ///
    /// `actor` is the cache key — one of the
    /// [`user_group`](crate::credential::user_group) constants for role
    /// sign-ins, or a literal actor name. Signing the same actor in again
    /// replaces the cached credential.
    ///
    /// # Errors
    ///
    /// Surfaces the [`ExchangeError`] verbatim when the exchange
    /// collaborator refuses or cannot be reached; the cache is left
    /// untouched in that case.
    pub fn sign_in_as<E: TokenExchanger>(
        &mut self,
        actor: &str,
        user_group: &str,
        raw_token: &str,
        applicant_id: &str,
        exchanger: &E,
    ) -> Result<Credential, ExchangeError> {
        let user_id = Ulid::new().to_string();
        let request = TokenExchangeRequest {
            raw_token: raw_token.to_owned(),
            user_id: user_id.clone(),
            user_group: user_group.to_owned(),
            applicant_id: applicant_id.to_owned(),
            tenant_id: self.tenant_id(),
        };
        let auth_token = exchanger.exchange_token(&request)?;
        debug!(%actor, %user_id, %user_group, "actor signed in");
        let credential = Credential {
            user_id,
            auth_token,
            user_group: user_group.to_owned(),
        };
        self.credentials.set(actor, credential.clone());
        Ok(credential)
    }

    /// Looks up the credential for `actor`, failing when the actor was
    /// never signed in.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Missing`] when no prior sign-in step
    /// populated an entry under `actor`.
    pub fn credential_for(&self, actor: &str) -> Result<&Credential, CredentialError> {
        self.credentials.require(actor)
    }
}
