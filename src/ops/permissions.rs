//! Executable-trust policy.

use std::path::Path;

use crate::platform::metadata;

use super::Context;

/// Decide whether `path` is safe to treat as loadable/executable content.
///
/// This is deliberately a plain boolean, not a `Result`: every internal
/// failure collapses to "unsafe" with no detail surfaced. Checks run in
/// order and short-circuit on the first failure (fail-closed):
///
/// 1. the path resolves without excessive symlink indirection;
/// 2. the `allow_unsafe_permissions` override, if set, short-circuits the
///    rest to `true`;
/// 3. the containing directory is not a world-writable/temporary-style
///    location;
/// 4. the path opens read-only and is a regular file, not a directory;
/// 5. the owner is the effective user or the superuser;
/// 6. with `require_executable`, the owner-executable bit is set and the
///    file is not group/world-writable; a correctly-owned executable that
///    others can overwrite is still rejected.
pub fn safe_permissions(ctx: &Context, dir: &Path, path: &Path, require_executable: bool) -> bool {
    // Follows symlinks; ELOOP and any other resolution failure reject.
    let meta = match std::fs::metadata(path) {
        Ok(meta) => meta,
        Err(_) => return false,
    };

    if ctx.config().allow_unsafe_permissions {
        return true;
    }

    let dir_meta = match std::fs::metadata(dir) {
        Ok(dir_meta) => dir_meta,
        Err(_) => return false,
    };
    if metadata::is_tmp_like_dir(&dir_meta) {
        // Never load content anyone can plant or swap.
        return false;
    }

    if !meta.is_file() {
        // Only file-like nodes are loadable, never directories or special
        // files.
        return false;
    }
    if std::fs::File::open(path).is_err() {
        return false;
    }

    if !(metadata::is_owner_current_user(&meta) || metadata::is_owner_root(&meta)) {
        // Ownership failure rejects regardless of any other attribute.
        return false;
    }

    if require_executable
        && (!metadata::is_owner_executable(&meta) || metadata::is_group_or_world_writable(&meta))
    {
        return false;
    }

    true
}
