#![allow(dead_code)]

use probe_fs::{Context, ProbeConfig};

pub fn test_config() -> ProbeConfig {
    ProbeConfig::default()
}

pub fn test_context() -> Context {
    Context::new(test_config()).expect("context")
}

/// Config with both read ceilings pinned to `max_bytes`, so the same limit
/// applies whether or not the test file ends up root-owned.
pub fn test_config_with_ceiling(max_bytes: u64) -> ProbeConfig {
    let mut config = ProbeConfig::default();
    config.limits.max_read_bytes = max_bytes;
    config.limits.max_user_read_bytes = max_bytes;
    config
}
