//! Metadata probes backing read admission and the permission policy.
//!
//! Everything here operates on an already-fetched [`std::fs::Metadata`] so
//! callers decide whether symlinks were followed.

use std::fs::Metadata;

/// True for device nodes, FIFOs, and sockets. Special files report
/// unreliable (often zero) sizes, so callers must treat any size hint as
/// authoritative instead of trusting filesystem metadata.
#[cfg(unix)]
pub(crate) fn is_special_file(meta: &Metadata) -> bool {
    use std::os::unix::fs::FileTypeExt;

    let file_type = meta.file_type();
    file_type.is_fifo()
        || file_type.is_socket()
        || file_type.is_char_device()
        || file_type.is_block_device()
}

#[cfg(not(unix))]
pub(crate) fn is_special_file(meta: &Metadata) -> bool {
    let _ = meta;
    false
}

#[cfg(unix)]
pub(crate) fn is_owner_root(meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    meta.uid() == 0
}

/// Without uid semantics the privileged/unprivileged split does not exist;
/// report non-root so the stricter ceiling applies.
#[cfg(not(unix))]
pub(crate) fn is_owner_root(meta: &Metadata) -> bool {
    let _ = meta;
    false
}

#[cfg(unix)]
pub(crate) fn is_owner_current_user(meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    // SAFETY: geteuid only reads process credentials and cannot fail.
    meta.uid() == unsafe { libc::geteuid() }
}

#[cfg(not(unix))]
pub(crate) fn is_owner_current_user(meta: &Metadata) -> bool {
    let _ = meta;
    false
}

/// Sticky-bit or world-writable directories (`/tmp` and friends): anyone can
/// plant or swap content there.
#[cfg(unix)]
pub(crate) fn is_tmp_like_dir(meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    meta.mode() & (libc::S_ISVTX as u32 | 0o002) != 0
}

#[cfg(not(unix))]
pub(crate) fn is_tmp_like_dir(meta: &Metadata) -> bool {
    let _ = meta;
    false
}

#[cfg(unix)]
pub(crate) fn is_owner_executable(meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    meta.mode() & 0o100 != 0
}

#[cfg(not(unix))]
pub(crate) fn is_owner_executable(meta: &Metadata) -> bool {
    let _ = meta;
    false
}

#[cfg(unix)]
pub(crate) fn is_group_or_world_writable(meta: &Metadata) -> bool {
    use std::os::unix::fs::MetadataExt;

    meta.mode() & 0o022 != 0
}

#[cfg(not(unix))]
pub(crate) fn is_group_or_world_writable(meta: &Metadata) -> bool {
    let _ = meta;
    false
}
