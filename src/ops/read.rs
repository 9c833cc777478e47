//! Bounded file reads.
//!
//! Every read passes an admission check against a byte ceiling tiered by
//! file ownership before the first byte is touched; unknown-length sources
//! are streamed in blocks with a running total enforced against the same
//! ceiling. Timestamp save/restore is scoped to one call and unsynchronized:
//! concurrent reads of the same path may interleave capture and restore.
//! That is an accepted limitation, not a bug to fix here.

use std::io::Read;
use std::path::PathBuf;

use filetime::FileTime;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::open::open_readable;
use crate::platform::metadata;

use super::Context;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadRequest {
    pub path: PathBuf,
    /// Authoritative size for special files (devices, pipes), whose
    /// filesystem metadata reports unreliable or zero sizes.
    #[serde(default)]
    pub size_hint: Option<u64>,
    /// Block size for streamed reads; defaults to the configured value.
    #[serde(default)]
    pub block_size: Option<usize>,
    /// Canonicalize and check ceilings only; never read a byte.
    #[serde(default)]
    pub dry_run: bool,
    /// Restore atime/mtime after the read, subject to the process-wide
    /// forensic toggle.
    #[serde(default)]
    pub preserve_time: bool,
    /// Open special files in blocking mode. Leave false unless the source is
    /// known to eventually produce data.
    #[serde(default)]
    pub blocking: bool,
}

impl ReadRequest {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size_hint: None,
            block_size: None,
            dry_run: false,
            preserve_time: false,
            blocking: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadResponse {
    pub path: PathBuf,
    pub bytes_read: u64,
    pub content: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReadSummary {
    /// Canonical path for dry runs, the requested path otherwise.
    pub path: PathBuf,
    pub bytes_read: u64,
}

/// Access/modification times captured after open, before any byte is read.
#[derive(Debug, Clone, Copy)]
struct FileTimesSnapshot {
    accessed: FileTime,
    modified: FileTime,
}

impl FileTimesSnapshot {
    fn capture(meta: &std::fs::Metadata) -> Self {
        Self {
            accessed: FileTime::from_last_access_time(meta),
            modified: FileTime::from_last_modification_time(meta),
        }
    }

    fn restore(&self, file: &std::fs::File) {
        // A failed restore leaves correct content with perturbed metadata;
        // not worth failing the read over.
        if let Err(err) =
            filetime::set_file_handle_times(file, Some(self.accessed), Some(self.modified))
        {
            tracing::debug!(error = %err, "failed to restore file times");
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamState {
    /// Known nonzero size: one read of exactly that many bytes.
    SingleShot { size: u64 },
    /// Unknown-length source: fixed-size blocks under a running total.
    Streamed,
    Finished,
}

/// A finite, single-pass sequence of byte chunks from one admitted read.
///
/// Yields exactly one chunk for known-size files and block-sized chunks for
/// streamed sources. Not restartable; dropping it mid-stream skips the
/// timestamp restoration that only a completed read performs.
pub struct ReadStream {
    file: std::fs::File,
    path: PathBuf,
    resolved: PathBuf,
    read_max: u64,
    block_size: usize,
    total: u64,
    state: StreamState,
    times: Option<FileTimesSnapshot>,
}

impl ReadStream {
    pub fn summary(&self) -> ReadSummary {
        ReadSummary {
            path: self.resolved.clone(),
            bytes_read: self.total,
        }
    }

    fn finish(&mut self) {
        self.state = StreamState::Finished;
        if let Some(times) = self.times.take() {
            times.restore(&self.file);
        }
    }
}

impl Iterator for ReadStream {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            StreamState::Finished => None,
            StreamState::SingleShot { size } => {
                let mut content = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
                match (&self.file).take(size).read_to_end(&mut content) {
                    Ok(_) => {
                        self.total = content.len() as u64;
                        self.finish();
                        Some(Ok(content))
                    }
                    Err(err) => {
                        self.state = StreamState::Finished;
                        Some(Err(Error::io_path("read", &self.path, err)))
                    }
                }
            }
            StreamState::Streamed => loop {
                let mut block = vec![0_u8; self.block_size];
                match (&self.file).read(&mut block) {
                    Ok(0) => {
                        self.finish();
                        return None;
                    }
                    Ok(part) => {
                        self.total += part as u64;
                        if self.total >= self.read_max {
                            self.state = StreamState::Finished;
                            return Some(Err(Error::ReadLimitExceeded {
                                path: self.path.clone(),
                                size_bytes: self.total,
                                max_bytes: self.read_max,
                            }));
                        }
                        block.truncate(part);
                        return Some(Ok(block));
                    }
                    Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                    // A drained non-blocking special file reports WouldBlock;
                    // treat it as end of stream.
                    Err(err) if err.kind() == std::io::ErrorKind::WouldBlock => {
                        self.finish();
                        return None;
                    }
                    Err(err) => {
                        self.state = StreamState::Finished;
                        return Some(Err(Error::io_path("read", &self.path, err)));
                    }
                }
            },
        }
    }
}

/// Open a path and run the admission check, returning the lazy chunk stream.
///
/// For dry-run requests the stream is already finished: only
/// canonicalization and the ceiling comparison happen, and the summary
/// carries the canonical path.
pub fn stream_file(ctx: &Context, request: &ReadRequest) -> Result<ReadStream> {
    let path = request.path.as_path();
    let file = open_readable(path, request.blocking)?;
    let meta = file
        .metadata()
        .map_err(|err| Error::io_path("metadata", path, err))?;

    let mut file_size = meta.len();
    if metadata::is_special_file(&meta) {
        if let Some(hint) = request.size_hint.filter(|hint| *hint > 0) {
            file_size = hint;
        }
    }

    // The stricter non-root ceiling applies unless the file (or the symlink
    // target the open followed) is owned by the superuser.
    let read_max = ctx.effective_read_max(metadata::is_owner_root(&meta));
    if file_size > read_max {
        tracing::debug!(
            path = %path.display(),
            size_bytes = file_size,
            max_bytes = read_max,
            "size exceeds read limit"
        );
        return Err(Error::ReadLimitExceeded {
            path: path.to_path_buf(),
            size_bytes: file_size,
            max_bytes: read_max,
        });
    }

    let block_size = effective_block_size(request, &ctx.config().limits);

    if request.dry_run {
        // Canonicalization failure is not fatal for a probe.
        let resolved = std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        return Ok(ReadStream {
            file,
            path: path.to_path_buf(),
            resolved,
            read_max,
            block_size,
            total: 0,
            state: StreamState::Finished,
            times: None,
        });
    }

    let times = (request.preserve_time && ctx.config().preserve_forensic_times)
        .then(|| FileTimesSnapshot::capture(&meta));

    let state = if file_size == 0 {
        StreamState::Streamed
    } else {
        StreamState::SingleShot { size: file_size }
    };

    Ok(ReadStream {
        file,
        path: path.to_path_buf(),
        resolved: path.to_path_buf(),
        read_max,
        block_size,
        total: 0,
        state,
        times,
    })
}

/// The per-request block-size override must not escape the hard cap that
/// config validation enforces; a wild value would otherwise drive a matching
/// per-chunk allocation.
fn effective_block_size(request: &ReadRequest, limits: &crate::config::ReadLimits) -> usize {
    request
        .block_size
        .unwrap_or(limits.block_size)
        .clamp(1, crate::config::MAX_BLOCK_SIZE_HARD_CAP)
}

/// Bounded read delivering chunks to a caller-supplied callback.
pub fn read_file_chunks(
    ctx: &Context,
    request: &ReadRequest,
    mut on_chunk: impl FnMut(&[u8]),
) -> Result<ReadSummary> {
    let mut stream = stream_file(ctx, request)?;
    for chunk in stream.by_ref() {
        on_chunk(&chunk?);
    }
    Ok(stream.summary())
}

/// Whole-buffer bounded read.
pub fn read_file(ctx: &Context, request: ReadRequest) -> Result<ReadResponse> {
    let mut content = Vec::new();
    let summary = read_file_chunks(ctx, &request, |chunk| content.extend_from_slice(chunk))?;
    Ok(ReadResponse {
        path: summary.path,
        bytes_read: summary.bytes_read,
        content,
    })
}

/// Read with atime/mtime restored afterward so the read leaves no trace in
/// file metadata (subject to the process-wide forensic toggle).
pub fn forensic_read_file(
    ctx: &Context,
    path: impl Into<PathBuf>,
    blocking: bool,
) -> Result<ReadResponse> {
    let mut request = ReadRequest::new(path);
    request.preserve_time = true;
    request.blocking = blocking;
    read_file(ctx, request)
}

/// Validate that a read of `path` would be admitted, without touching file
/// content or timestamps. Returns the canonical path.
pub fn probe_read_file(ctx: &Context, path: impl Into<PathBuf>, blocking: bool) -> Result<PathBuf> {
    let mut request = ReadRequest::new(path);
    request.dry_run = true;
    request.blocking = blocking;
    let summary = read_file_chunks(ctx, &request, |_chunk| {})?;
    Ok(summary.path)
}
