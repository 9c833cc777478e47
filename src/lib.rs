//! `probe-fs` provides privilege-aware, resource-bounded file access and
//! pattern-based filesystem traversal for host-instrumentation tooling that
//! queries arbitrary, attacker-influenced paths on a live system.
//!
//! Three concerns make up the crate: bounded file reads (size ceilings tiered
//! by file ownership, streaming via a single-pass chunk sequence, forensic
//! timestamp preservation), recursive glob resolution built on a
//! non-recursive platform primitive, and a fail-closed permission policy for
//! loadable/executable content. All operations are single synchronous units
//! of work over one path or pattern; file handles never outlive a call.

pub mod config;
pub mod config_io;
mod error;
mod open;
pub mod ops;
mod platform;

pub use config::{ProbeConfig, ReadLimits};
pub use error::{Error, Result};
pub use open::open_readable;

pub use ops::{
    forensic_read_file, list_directories_in_directory, list_files_in_directory, probe_read_file,
    read_file, read_file_chunks, resolve_file_pattern, safe_permissions, stream_file, Context,
    GlobLimits, GlobRequest, GlobResponse, ReadRequest, ReadResponse, ReadStream, ReadSummary,
    MAX_RECURSIVE_GLOBS,
};
