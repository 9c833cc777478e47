use crate::config::ProbeConfig;

mod context;
mod glob;
mod permissions;
mod read;

pub use glob::{
    list_directories_in_directory, list_files_in_directory, resolve_file_pattern, GlobLimits,
    GlobRequest, GlobResponse, MAX_RECURSIVE_GLOBS,
};
pub use permissions::safe_permissions;
pub use read::{
    forensic_read_file, probe_read_file, read_file, read_file_chunks, stream_file, ReadRequest,
    ReadResponse, ReadStream, ReadSummary,
};

/// Shared entry point for all operations, carrying the immutable process
/// configuration (read ceilings, unsafe-permission override, forensic
/// toggle). Cheap to clone and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Context {
    config: ProbeConfig,
}
