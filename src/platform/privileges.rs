//! Scoped privilege drop for reads on behalf of unprivileged identities.
//!
//! A process holding root must not read a user's file while still carrying
//! administrative rights acquired for another purpose. Before an open, the
//! effective identity is dropped to the owner of the target's parent
//! directory and restored on every exit path of the scope.

use std::path::Path;

/// Run `f` with effective credentials dropped to the owner of `path`'s
/// parent directory.
///
/// Not running as root, or a root-owned parent, means there is nothing to
/// drop and `f` runs directly. A failed stat of the parent or a failed drop
/// is an error and `f` is never invoked.
#[cfg(unix)]
pub(crate) fn with_privileges_for<T>(
    path: &Path,
    f: impl FnOnce() -> T,
) -> std::io::Result<T> {
    use std::os::unix::fs::MetadataExt;

    // SAFETY: geteuid only reads process credentials and cannot fail.
    if unsafe { libc::geteuid() } != 0 {
        return Ok(f());
    }

    let parent = path.parent().unwrap_or_else(|| Path::new("/"));
    let meta = std::fs::metadata(parent)?;
    let uid = meta.uid();
    let gid = meta.gid();
    if uid == 0 {
        return Ok(f());
    }

    // Group first: setegid requires the effective uid to still be root.
    // SAFETY: setegid/seteuid take plain integers and only alter this
    // process's credentials.
    if unsafe { libc::setegid(gid) } != 0 {
        return Err(std::io::Error::last_os_error());
    }
    if unsafe { libc::seteuid(uid) } != 0 {
        let err = std::io::Error::last_os_error();
        restore_root();
        return Err(err);
    }

    // The guard restores on unwind as well, so a panicking `f` cannot leave
    // the process half-dropped.
    let guard = RestoreRoot;
    let value = f();
    drop(guard);
    Ok(value)
}

#[cfg(unix)]
struct RestoreRoot;

#[cfg(unix)]
impl Drop for RestoreRoot {
    fn drop(&mut self) {
        restore_root();
    }
}

#[cfg(unix)]
fn restore_root() {
    // SAFETY: restores the saved root credentials; plain integer arguments.
    let euid_rc = unsafe { libc::seteuid(0) };
    let egid_rc = unsafe { libc::setegid(0) };
    if euid_rc != 0 || egid_rc != 0 {
        // Continuing with dropped credentials only loses capability, never
        // grants it; surface the condition and carry on.
        tracing::error!("failed to restore elevated credentials after scoped drop");
    }
}

#[cfg(not(unix))]
pub(crate) fn with_privileges_for<T>(
    path: &Path,
    f: impl FnOnce() -> T,
) -> std::io::Result<T> {
    let _ = path;
    Ok(f())
}
