//! Trusted read-only opens.

use std::fs::{File, OpenOptions};
use std::path::Path;

use crate::error::{Error, Result};
use crate::platform::privileges::with_privileges_for;

#[cfg(unix)]
fn open_readonly(path: &Path, blocking: bool) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.read(true);
    if !blocking {
        // Pipes and devices must not stall the caller indefinitely.
        options.custom_flags(libc::O_NONBLOCK);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_readonly(path: &Path, blocking: bool) -> std::io::Result<File> {
    let _ = blocking;
    OpenOptions::new().read(true).open(path)
}

/// Open `path` read-only with elevated privileges dropped to the identity
/// implied by the path's parent directory for the duration of the open.
///
/// The opener never creates, truncates, or writes. Every failure mode (path
/// missing, permission denied, failed privilege drop) collapses into one
/// opaque [`Error::CannotOpen`] so callers cannot distinguish probe
/// outcomes, and no handle is left open on the error path.
pub fn open_readable(path: &Path, blocking: bool) -> Result<File> {
    with_privileges_for(path, || open_readonly(path, blocking))
        .and_then(|opened| opened)
        .map_err(|err| {
            tracing::debug!(path = %path.display(), error = %err, "open for reading failed");
            Error::CannotOpen(path.to_path_buf())
        })
}
