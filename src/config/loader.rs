//! Configuration loading with layered precedence.
//!
//! Precedence order (lowest to highest): application defaults, TOML
//! configuration file, `TESTRIG_*` environment variables. The file path
//! comes from `TESTRIG_CONFIG_PATH` when set (missing file is then an
//! error), falling back to `./testrig.toml` (missing file is then fine).
//!
//! # Environment Variable Handling
//!
//! Environment variables with unparseable values (e.g.
//! `TESTRIG_POLL_INTERVAL_MS=fast` instead of a number) return an error
//! immediately. This fail-fast approach ensures misconfigurations are
//! visible rather than silently falling back to defaults. Environment
//! access goes through the `mockable::Env` seam so tests can exercise the
//! layering without touching the process environment.

use camino::Utf8PathBuf;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use mockable::Env;

use crate::config::RigConfig;
use crate::error::{ConfigError, Result};

/// Environment variable naming the configuration file path.
pub const CONFIG_PATH_ENV_VAR: &str = "TESTRIG_CONFIG_PATH";

/// Configuration file looked up in the working directory when
/// [`CONFIG_PATH_ENV_VAR`] is not set.
const DEFAULT_CONFIG_FILE: &str = "testrig.toml";

/// Specification for a single environment variable override.
struct EnvVarSpec {
    /// The environment variable name (e.g. `TESTRIG_POLL_INTERVAL_MS`).
    env_var: &'static str,
    /// Parses the raw value and applies it to the configuration, or
    /// reports why the value is unusable.
    apply: fn(&mut RigConfig, &str) -> std::result::Result<(), String>,
}

/// Table of all environment variable overrides.
///
/// Adding or modifying an override is a single entry here. The order
/// doesn't matter as the table is processed in a single pass.
const ENV_VAR_SPECS: &[EnvVarSpec] = &[
    EnvVarSpec {
        env_var: "TESTRIG_APPLICANT_ID",
        apply: apply_applicant_id,
    },
    EnvVarSpec {
        env_var: "TESTRIG_DEFAULT_TENANT_ID",
        apply: apply_default_tenant_id,
    },
    EnvVarSpec {
        env_var: "TESTRIG_POLL_INTERVAL_MS",
        apply: apply_poll_interval_ms,
    },
    EnvVarSpec {
        env_var: "TESTRIG_POLL_DEADLINE_MS",
        apply: apply_poll_deadline_ms,
    },
    EnvVarSpec {
        env_var: "TESTRIG_IDENTITY_EMULATOR",
        apply: apply_identity_emulator,
    },
];

fn apply_applicant_id(config: &mut RigConfig, raw: &str) -> std::result::Result<(), String> {
    config.auth.applicant_id = Some(raw.to_owned());
    Ok(())
}

fn apply_default_tenant_id(config: &mut RigConfig, raw: &str) -> std::result::Result<(), String> {
    raw.parse::<i64>()
        .map(|tenant_id| config.auth.default_tenant_id = tenant_id)
        .map_err(|_| format!("expected integer, got '{raw}'"))
}

fn apply_poll_interval_ms(config: &mut RigConfig, raw: &str) -> std::result::Result<(), String> {
    raw.parse::<u64>()
        .map(|millis| config.poll.interval_ms = millis)
        .map_err(|_| format!("expected unsigned integer, got '{raw}'"))
}

fn apply_poll_deadline_ms(config: &mut RigConfig, raw: &str) -> std::result::Result<(), String> {
    raw.parse::<u64>()
        .map(|millis| config.poll.deadline_ms = millis)
        .map_err(|_| format!("expected unsigned integer, got '{raw}'"))
}

fn apply_identity_emulator(config: &mut RigConfig, raw: &str) -> std::result::Result<(), String> {
    config.endpoints.identity_emulator = Some(raw.to_owned());
    Ok(())
}

/// Returns the list of environment variable names recognised by the
/// config loader.
///
/// This is primarily useful for tests that need to clear all `TESTRIG_*`
/// environment variables to ensure isolation. Using this function instead
/// of a hard-coded list ensures the test stays in sync with the loader's
/// actual environment variable mappings.
#[must_use]
pub fn env_var_names() -> Vec<&'static str> {
    ENV_VAR_SPECS.iter().map(|spec| spec.env_var).collect()
}

/// Reads and parses a TOML configuration file.
///
/// Uses `cap_std::fs_utf8` for capability-oriented filesystem access: the
/// parent directory is opened first and the file is read from there.
fn load_config_file(path: &Utf8PathBuf) -> Result<RigConfig> {
    let current_dir = Utf8PathBuf::from(".");
    let parent = path.parent().unwrap_or_else(|| current_dir.as_ref());
    let file_name = path.file_name().unwrap_or(path.as_str());

    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        ConfigError::ParseError {
            message: format!("failed to open directory {parent}: {e}"),
        }
    })?;

    let content = dir
        .read_to_string(file_name)
        .map_err(|e| ConfigError::ParseError {
            message: format!("failed to read {path}: {e}"),
        })?;

    let config = toml::from_str::<RigConfig>(&content).map_err(|e| ConfigError::ParseError {
        message: format!("failed to parse {path}: {e}"),
    })?;

    Ok(config)
}

/// Resolves the configuration file to load, if any.
///
/// An explicitly configured path must exist; the working-directory
/// fallback is optional.
fn resolve_config_path(env: &impl Env) -> Result<Option<Utf8PathBuf>> {
    if let Some(configured) = env.string(CONFIG_PATH_ENV_VAR) {
        let path = Utf8PathBuf::from(configured);
        if path.exists() {
            return Ok(Some(path));
        }
        return Err(ConfigError::FileNotFound { path }.into());
    }

    let fallback = Utf8PathBuf::from(DEFAULT_CONFIG_FILE);
    if fallback.exists() {
        Ok(Some(fallback))
    } else {
        Ok(None)
    }
}

/// Loads configuration with full layer precedence.
///
/// 1. Application defaults defined on the types
/// 2. TOML configuration file (path from `TESTRIG_CONFIG_PATH`, falling
///    back to `./testrig.toml`)
/// 3. `TESTRIG_*` environment variables
///
/// Later sources override earlier ones. The merged configuration is
/// validated before it is returned.
///
/// # Errors
///
/// Returns `ConfigError` when an explicitly configured file is missing or
/// malformed, when a typed environment variable holds an unparseable
/// value, or when the merged configuration fails validation (e.g. a zero
/// poll interval).
pub fn load_config(env: &impl Env) -> Result<RigConfig> {
    // Layers 1+2: defaults, overridden wholesale by any file fields
    // present (every field is `serde(default)`).
    let mut config = match resolve_config_path(env)? {
        Some(path) => load_config_file(&path)?,
        None => RigConfig::default(),
    };

    // Layer 3: environment overrides, parsed fail-fast.
    for spec in ENV_VAR_SPECS {
        let Some(raw_value) = env.string(spec.env_var) else {
            continue;
        };
        (spec.apply)(&mut config, &raw_value).map_err(|reason| ConfigError::InvalidValue {
            field: spec.env_var.to_owned(),
            reason,
        })?;
    }

    config.validate()?;
    Ok(config)
}
