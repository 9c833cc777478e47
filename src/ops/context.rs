use std::path::{Path, PathBuf};

use crate::config::ProbeConfig;
use crate::error::Result;

use super::{
    Context, GlobRequest, GlobResponse, ReadRequest, ReadResponse, ReadStream, ReadSummary,
};

impl Context {
    pub fn new(config: ProbeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn from_config_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::new(crate::config_io::load_config(path)?)
    }

    pub fn config(&self) -> &ProbeConfig {
        &self.config
    }

    pub fn read_file(&self, request: ReadRequest) -> Result<ReadResponse> {
        super::read_file(self, request)
    }

    pub fn read_file_chunks(
        &self,
        request: &ReadRequest,
        on_chunk: impl FnMut(&[u8]),
    ) -> Result<ReadSummary> {
        super::read_file_chunks(self, request, on_chunk)
    }

    pub fn stream_file(&self, request: &ReadRequest) -> Result<ReadStream> {
        super::stream_file(self, request)
    }

    pub fn forensic_read_file(
        &self,
        path: impl Into<PathBuf>,
        blocking: bool,
    ) -> Result<ReadResponse> {
        super::forensic_read_file(self, path, blocking)
    }

    pub fn probe_read_file(&self, path: impl Into<PathBuf>, blocking: bool) -> Result<PathBuf> {
        super::probe_read_file(self, path, blocking)
    }

    pub fn resolve_file_pattern(&self, request: GlobRequest) -> Result<GlobResponse> {
        super::resolve_file_pattern(request)
    }

    pub fn list_files_in_directory(&self, path: &Path, recursive: bool) -> Result<Vec<String>> {
        super::list_files_in_directory(path, recursive)
    }

    pub fn list_directories_in_directory(
        &self,
        path: &Path,
        recursive: bool,
    ) -> Result<Vec<String>> {
        super::list_directories_in_directory(path, recursive)
    }

    pub fn safe_permissions(&self, dir: &Path, path: &Path, require_executable: bool) -> bool {
        super::safe_permissions(self, dir, path, require_executable)
    }

    /// Ceiling selection: root-owned files get the global maximum, anything
    /// else the stricter of the two limits.
    pub(super) fn effective_read_max(&self, owner_root: bool) -> u64 {
        if owner_root {
            self.config.limits.max_read_bytes
        } else {
            self.config
                .limits
                .max_read_bytes
                .min(self.config.limits.max_user_read_bytes)
        }
    }
}
