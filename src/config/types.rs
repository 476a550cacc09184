//! Configuration data types for the testrig fixture core.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;

/// Addresses of the externally-dialled collaborators.
///
/// The harness never dials these itself: suite setup opens every
/// connection once before the first scenario and packs the resulting
/// handles into the bundle injected into each [`Suite`](crate::suite::Suite).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct EndpointsConfig {
    /// gRPC addresses keyed by service name.
    pub services: BTreeMap<String, String>,

    /// GraphQL admin endpoints keyed by service name.
    pub graphql_admin: BTreeMap<String, String>,

    /// Identity-emulator address used for raw token issuance.
    pub identity_emulator: Option<String>,
}

/// Authentication settings presented during token exchange.
#[derive(Debug, Clone, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Applicant identity the harness presents to the exchange service.
    pub applicant_id: Option<String>,

    /// Tenant granted to scenarios that never chose one explicitly.
    #[default = 1]
    pub default_tenant_id: i64,
}

impl AuthConfig {
    /// Validates that the fields sign-in steps depend on are present.
    ///
    /// Call this before the first sign-in, not at load time: scenarios
    /// that never sign anyone in run fine without an applicant identity.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRequired` when `applicant_id` is unset
    /// or empty.
    pub fn validate(&self) -> crate::error::Result<()> {
        let configured = self
            .applicant_id
            .as_deref()
            .is_some_and(|value| !value.is_empty());
        if configured {
            Ok(())
        } else {
            Err(crate::error::ConfigError::MissingRequired {
                field: String::from("auth.applicant_id"),
            }
            .into())
        }
    }
}

/// Cadence of the eventually-consistent poll loop.
///
/// The defaults mirror what sign-in verification uses against the slowest
/// sync pipelines: probe every 200 ms, give up after two minutes.
#[derive(Debug, Clone, SmartDefault, Deserialize, Serialize)]
#[serde(default)]
pub struct PollConfig {
    /// Milliseconds between probe attempts.
    #[default = 200]
    pub interval_ms: u64,

    /// Overall deadline for one polled assertion, in milliseconds.
    #[default = 120_000]
    pub deadline_ms: u64,
}

impl PollConfig {
    /// The interval between probe attempts.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// The deadline for one polled assertion.
    #[must_use]
    pub const fn deadline(&self) -> Duration {
        Duration::from_millis(self.deadline_ms)
    }

    /// Validates the cadence.
    ///
    /// A zero interval would panic in the poll loop's timer, so it is
    /// rejected at load time instead.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `interval_ms` is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.interval_ms == 0 {
            return Err(crate::error::ConfigError::InvalidValue {
                field: String::from("poll.interval_ms"),
                reason: String::from("interval must be positive"),
            }
            .into());
        }
        Ok(())
    }
}

/// Root harness configuration.
///
/// Loaded with layered precedence (lowest to highest): application
/// defaults, TOML configuration file, `TESTRIG_*` environment variables.
/// See [`load_config`](crate::config::load_config).
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct RigConfig {
    /// Collaborator endpoints.
    pub endpoints: EndpointsConfig,

    /// Token-exchange settings.
    pub auth: AuthConfig,

    /// Poll-loop cadence.
    pub poll: PollConfig,
}

impl RigConfig {
    /// Validates the load-time invariants (currently the poll cadence).
    ///
    /// # Errors
    ///
    /// Propagates [`PollConfig::validate`] failures.
    pub fn validate(&self) -> crate::error::Result<()> {
        self.poll.validate()
    }
}
