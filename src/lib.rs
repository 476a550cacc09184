//! Per-scenario fixture orchestration for behaviour-driven end-to-end suites.
//!
//! `testrig` is the state a BDD scenario's step definitions compose
//! against while driving a multi-tenant backend through its gRPC and
//! GraphQL surfaces: a cache of the credentials signed-in actors hold, a
//! pair of mutex-guarded stacks recording every outbound request and its
//! response, and a bounded retry loop for asserting against eventually
//! consistent reads. One [`suite::Suite`] is built per scenario and
//! dropped with it, so scenarios never leak state into each other; the
//! expensive connection handles live at suite level and are shared
//! read-only.
//!
//! # Modules
//!
//! - [`config`]: Harness configuration with layered precedence (file > env > defaults)
//! - [`credential`]: Actor credentials, their per-scenario cache, and the token-exchange seam
//! - [`error`]: Semantic error types for the fixture core
//! - [`history`]: Call-history stacks recording the scenario's outbound traffic
//! - [`poll`]: Eventually-consistent retry loop ("try until success")
//! - [`suite`]: The per-scenario composition root

pub mod config;
pub mod credential;
pub mod error;
pub mod history;
pub mod poll;
pub mod suite;
