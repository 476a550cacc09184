//! Seam for the external token-exchange collaborator.
//!
//! Sign-in steps first obtain a raw identity-provider token (issued by the
//! auth emulator, outside this crate), then exchange it for a backend
//! session token scoped to a user, group, and tenant. The exchange service
//! itself is a system under test; this crate only defines the contract it
//! is called through, so suites can wire the real client in and unit tests
//! can substitute a mock.

use crate::error::ExchangeError;

/// Inputs to a single token exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenExchangeRequest {
    /// Raw identity-provider token obtained for the user.
    pub raw_token: String,
    /// The backend user the session token is minted for.
    pub user_id: String,
    /// The user group the session is scoped to.
    pub user_group: String,
    /// The applicant identity the harness presents to the exchange service.
    pub applicant_id: String,
    /// The tenant the session is scoped to.
    pub tenant_id: i64,
}

/// External collaborator that swaps a raw identity token for a backend
/// session token.
///
/// Implementations wrap a pre-established client handle from the shared
/// connection bundle; the call blocks until the exchange service responds.
#[cfg_attr(test, mockall::automock)]
pub trait TokenExchanger {
    /// Performs one exchange, returning the issued session token.
    ///
    /// # Errors
    ///
    /// Returns [`ExchangeError::Rejected`] when the service refuses to
    /// issue a token for the request, or [`ExchangeError::Transport`] when
    /// the service cannot be reached.
    fn exchange_token(&self, request: &TokenExchangeRequest) -> Result<String, ExchangeError>;
}
