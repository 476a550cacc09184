//! Configuration system for the testrig fixture core.
//!
//! Harness settings are loaded with layered precedence: application
//! defaults, then a TOML configuration file, then `TESTRIG_*` environment
//! variables. The configuration carries the endpoints suite setup dials
//! (the resulting handles become the per-scenario connection bundle), the
//! auth settings presented during token exchange, and the poll-loop
//! cadence.
//!
//! # Example Configuration
//!
//! ```toml
//! [endpoints.services]
//! user_management = "localhost:6150"
//! entry_exit_management = "localhost:6160"
//!
//! [endpoints.graphql_admin]
//! user_management = "http://localhost:8085"
//!
//! [auth]
//! applicant_id = "applicant-local"
//! default_tenant_id = 1
//!
//! [poll]
//! interval_ms = 200
//! deadline_ms = 120000
//! ```

mod loader;
mod types;

pub use loader::{CONFIG_PATH_ENV_VAR, env_var_names, load_config};
pub use types::{AuthConfig, EndpointsConfig, PollConfig, RigConfig};
