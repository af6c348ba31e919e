//! Runtime settings.
//!
//! Resolves the store path and the key derivation cost from the environment.
//! Command-line flags are layered on top by the CLI.

use std::path::PathBuf;

use tracing::{debug, warn};

use crate::core::cipher::KdfParams;
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Resolved settings for one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Store file path
    pub path: PathBuf,
    /// Cost parameters for fresh key derivations
    pub kdf: KdfParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::DEFAULT_FILE),
            kdf: KdfParams::default(),
        }
    }
}

impl Settings {
    /// Settings from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if an override is not a number or
    /// is rejected by the KDF.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(path) = lookup(constants::ENV_FILE).filter(|p| !p.is_empty()) {
            settings.path = PathBuf::from(path);
        }

        let kdf = &mut settings.kdf;
        if let Some(v) = parse_u32(&lookup, constants::ENV_KDF_MEMORY_KIB, "kdf memory")? {
            kdf.memory_kib = v;
        }
        if let Some(v) = parse_u32(&lookup, constants::ENV_KDF_ITERATIONS, "kdf iterations")? {
            kdf.iterations = v;
        }
        if let Some(v) = parse_u32(&lookup, constants::ENV_KDF_PARALLELISM, "kdf parallelism")? {
            kdf.parallelism = v;
        }

        settings.kdf.validate().map_err(|e| ConfigError::InvalidValue {
            field: "kdf parameters",
            reason: e.to_string(),
        })?;
        if settings.kdf.is_below_recommended() {
            warn!(
                memory_kib = settings.kdf.memory_kib,
                iterations = settings.kdf.iterations,
                parallelism = settings.kdf.parallelism,
                "key derivation cost is below the recommended minimum"
            );
        }

        debug!(path = %settings.path.display(), "settings resolved");
        Ok(settings)
    }

    /// Replace the store path
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }
}

fn parse_u32<F>(lookup: &F, key: &str, field: &'static str) -> Result<Option<u32>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<u32>()
        .map(Some)
        .map_err(|_| {
            ConfigError::InvalidValue {
                field,
                reason: format!("{}={:?} is not a positive integer", key, raw),
            }
            .into()
        })
}
