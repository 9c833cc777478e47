use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Byte ceilings applied to every read admission check.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReadLimits {
    /// Ceiling for files owned by the superuser.
    #[serde(default = "default_max_read_bytes")]
    pub max_read_bytes: u64,
    /// Stricter ceiling applied when the file (or symlink target) is not
    /// owned by the superuser.
    #[serde(default = "default_max_user_read_bytes")]
    pub max_user_read_bytes: u64,
    /// Block size for streamed reads of unknown-length sources.
    #[serde(default = "default_block_size")]
    pub block_size: usize,
}

const fn default_max_read_bytes() -> u64 {
    50 * 1024 * 1024
}

const fn default_max_user_read_bytes() -> u64 {
    10 * 1024 * 1024
}

const fn default_block_size() -> usize {
    4096
}

// Hard caps are guardrails against misconfiguration: an instrumentation
// agent has no business slurping gigabytes in one call.
const MAX_READ_BYTES_HARD_CAP: u64 = 1024 * 1024 * 1024;
pub(crate) const MAX_BLOCK_SIZE_HARD_CAP: usize = 16 * 1024 * 1024;

impl Default for ReadLimits {
    fn default() -> Self {
        Self {
            max_read_bytes: default_max_read_bytes(),
            max_user_read_bytes: default_max_user_read_bytes(),
            block_size: default_block_size(),
        }
    }
}

/// Process-wide configuration, immutable once a [`Context`] is built.
///
/// Safe to share across threads; nothing here is mutated after construction.
///
/// [`Context`]: crate::ops::Context
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProbeConfig {
    #[serde(default)]
    pub limits: ReadLimits,
    /// Escape hatch: skip every permission check in `safe_permissions`.
    /// Only sensible for deployments that fully trust their filesystem.
    #[serde(default)]
    pub allow_unsafe_permissions: bool,
    /// Enable atime/mtime restoration for preserve-time reads. Off by
    /// default; individual requests still opt in per call.
    #[serde(default)]
    pub preserve_forensic_times: bool,
}

fn validate_u64_limit(value: u64, field: &str, hard_cap: u64) -> Result<()> {
    if value == 0 {
        return Err(Error::InvalidConfig(format!("{field} must be > 0")));
    }
    if value > hard_cap {
        return Err(Error::InvalidConfig(format!(
            "{field} must be <= {hard_cap}"
        )));
    }
    Ok(())
}

impl ProbeConfig {
    /// Structural validation: limit values only, no filesystem IO.
    pub fn validate(&self) -> Result<()> {
        validate_u64_limit(
            self.limits.max_read_bytes,
            "limits.max_read_bytes",
            MAX_READ_BYTES_HARD_CAP,
        )?;
        validate_u64_limit(
            self.limits.max_user_read_bytes,
            "limits.max_user_read_bytes",
            MAX_READ_BYTES_HARD_CAP,
        )?;
        if self.limits.max_user_read_bytes > self.limits.max_read_bytes {
            return Err(Error::InvalidConfig(
                "limits.max_user_read_bytes must be <= limits.max_read_bytes".to_string(),
            ));
        }
        if self.limits.block_size == 0 {
            return Err(Error::InvalidConfig(
                "limits.block_size must be > 0".to_string(),
            ));
        }
        if self.limits.block_size > MAX_BLOCK_SIZE_HARD_CAP {
            return Err(Error::InvalidConfig(format!(
                "limits.block_size must be <= {MAX_BLOCK_SIZE_HARD_CAP}"
            )));
        }
        Ok(())
    }
}
