//! Loading [`ProbeConfig`] from disk.
//!
//! An instrumentation agent's config file decides how much it will read and
//! whether permission checks apply, so the loader is as suspicious of its
//! input as the rest of the crate: the path must name a regular file reached
//! without a symlink, the file is read under a byte ceiling, and the parsed
//! config is structurally validated before anyone sees it.

use std::io::Read;
use std::path::Path;

use crate::{Error, ProbeConfig, Result};

/// Configs are small; anything bigger is a mistake or mischief.
const DEFAULT_MAX_CONFIG_BYTES: u64 = 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Pick the format from a path's extension. Extensionless paths are
    /// treated as TOML; any other extension is rejected up front, before the
    /// file is touched.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") | None => Ok(Self::Toml),
            Some(other) => Err(Error::InvalidConfig(format!(
                "unsupported config format {other:?}; expected .toml or .json"
            ))),
        }
    }

    /// Parse `raw` as a [`ProbeConfig`]. Unknown fields are errors in both
    /// formats; a typo must not silently become a default.
    pub fn parse(self, raw: &str) -> Result<ProbeConfig> {
        match self {
            Self::Json => serde_json::from_str(raw)
                .map_err(|err| Error::InvalidConfig(format!("invalid json config: {err}"))),
            Self::Toml => toml::from_str(raw)
                .map_err(|err| Error::InvalidConfig(format!("invalid toml config: {err}"))),
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ProbeConfig> {
    load_config_limited(path, DEFAULT_MAX_CONFIG_BYTES)
}

/// Load, parse, and validate a config file with an explicit byte ceiling.
pub fn load_config_limited(path: impl AsRef<Path>, max_bytes: u64) -> Result<ProbeConfig> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let raw = read_small_regular_file(path, max_bytes)?;
    let config = format.parse(&raw)?;
    config.validate()?;
    Ok(config)
}

/// Read a config file's text, enforcing that the path names a plain regular
/// file and that the content fits under `max_bytes`.
///
/// A symlink or special node where the config should be is treated as
/// tampering, not as configuration: following a link here would let anyone
/// who can write a link redirect the agent to a file of their choosing, and
/// opening a FIFO would block the process. The read stops one byte past the
/// ceiling so an oversized file is detected without draining it.
fn read_small_regular_file(path: &Path, max_bytes: u64) -> Result<String> {
    if max_bytes == 0 {
        return Err(Error::InvalidConfig(
            "max config bytes must be > 0".to_string(),
        ));
    }

    let meta =
        std::fs::symlink_metadata(path).map_err(|err| Error::io_path("metadata", path, err))?;
    if meta.file_type().is_symlink() {
        return Err(Error::InvalidConfig(format!(
            "refusing to load config through symlink {}",
            path.display()
        )));
    }
    if !meta.is_file() {
        return Err(Error::InvalidConfig(format!(
            "config path {} does not name a regular file",
            path.display()
        )));
    }

    let mut raw = String::new();
    std::fs::File::open(path)
        .map_err(|err| Error::io_path("open", path, err))?
        .take(max_bytes.saturating_add(1))
        .read_to_string(&mut raw)
        .map_err(|err| match err.kind() {
            std::io::ErrorKind::InvalidData => Error::InvalidUtf8(path.to_path_buf()),
            _ => Error::io_path("read", path, err),
        })?;
    if raw.len() as u64 > max_bytes {
        return Err(Error::InputTooLarge {
            size_bytes: raw.len() as u64,
            max_bytes,
        });
    }
    Ok(raw)
}
