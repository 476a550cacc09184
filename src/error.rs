//! Semantic error types for the testrig fixture core.
//!
//! This module defines the error hierarchy for testrig, following the
//! principle of using semantic error enums (via `thiserror`) for conditions
//! the calling step definition might inspect or map to a scenario failure,
//! while leaving opaque report types to the enclosing test runner's boundary.
//!
//! Diagnostic texts for stack failures are deliberately terse ("empty
//! stack", "not enough items in stack"): step definitions surface them
//! verbatim in scenario failure output.

use thiserror::Error;

/// Boxed error type carried by terminal probe failures.
///
/// Probes call into arbitrary external collaborators (gRPC clients, GraphQL
/// admin endpoints, repositories), so their failures are surfaced as-is
/// rather than forced into a fixed taxonomy.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file was not found at the expected path.
    #[error("configuration file not found: {path}")]
    FileNotFound {
        /// The path where the configuration file was expected.
        path: camino::Utf8PathBuf,
    },

    /// The configuration file could not be read or parsed.
    #[error("failed to parse configuration file: {message}")]
    ParseError {
        /// A description of the parse error.
        message: String,
    },

    /// A configuration value failed validation.
    #[error("invalid configuration value for '{field}': {reason}")]
    InvalidValue {
        /// The name of the invalid field.
        field: String,
        /// The reason the value is invalid.
        reason: String,
    },

    /// A required configuration value is missing.
    #[error("missing required configuration: {field}")]
    MissingRequired {
        /// The name of the missing field.
        field: String,
    },
}

/// Errors that can occur on a call-history stack.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// A pop or peek was attempted on a stack with zero elements.
    #[error("empty stack")]
    Empty,

    /// A multi-element peek asked for more elements than the stack holds.
    #[error("not enough items in stack")]
    InsufficientDepth,
}

/// Errors that can occur when looking up cached credentials.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    /// A step looked up an actor that was never signed in.
    #[error("no credential cached for actor '{actor}'")]
    Missing {
        /// The cache key the lookup used (user group or literal actor name).
        actor: String,
    },
}

/// Errors reported by the external token-exchange collaborator.
#[derive(Debug, Error)]
pub enum ExchangeError {
    /// The exchange service refused to issue a token.
    #[error("token exchange rejected for user '{user_id}': {message}")]
    Rejected {
        /// The user the exchange was attempted for.
        user_id: String,
        /// The refusal reason reported by the collaborator.
        message: String,
    },

    /// The exchange service could not be reached.
    #[error("token exchange transport failure: {message}")]
    Transport {
        /// A description of the transport failure.
        message: String,
    },
}

/// Errors produced by the eventually-consistent poll loop.
#[derive(Debug, Error)]
pub enum PollError {
    /// The externally supplied deadline fired before the probe reached a
    /// terminal state. External cancellation of the deadline future surfaces
    /// through this same variant: the loop only observes one signal.
    #[error("poll deadline exceeded before the probe reached a terminal state")]
    DeadlineExceeded,

    /// The probe reported a terminal, non-retryable failure.
    #[error("probe failed: {source}")]
    ProbeFailed {
        /// The probe's own error, surfaced verbatim.
        source: BoxError,
    },
}

/// Top-level error type for the testrig fixture core.
///
/// This enum aggregates all domain-specific errors into a single type that
/// step definitions can return directly. The enclosing BDD runner reports
/// any error returned from a step together with the step text, so variants
/// carry precise, actionable messages rather than classification metadata.
#[derive(Debug, Error)]
pub enum RigError {
    /// An error occurred during configuration loading.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// An error occurred on a call-history stack.
    #[error(transparent)]
    Stack(#[from] StackError),

    /// A credential lookup failed.
    #[error(transparent)]
    Credential(#[from] CredentialError),

    /// The token-exchange collaborator reported a failure.
    #[error(transparent)]
    Exchange(#[from] ExchangeError),

    /// The poll loop terminated without success.
    #[error(transparent)]
    Poll(#[from] PollError),
}

/// A specialised `Result` type for testrig operations.
pub type Result<T> = std::result::Result<T, RigError>;
