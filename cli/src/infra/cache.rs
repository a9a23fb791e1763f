//! Local command cache: implementation of the `ArtifactCache` port.
//!
//! Artifacts become visible only through a rename of a fully written temp
//! file from the same directory, so concurrent installers of the same
//! version never expose a partial file. The last rename wins.

use std::io::Write;
use std::path::{Path, PathBuf};

use sd_cmd_common::CommandSpec;
use tempfile::NamedTempFile;

use crate::application::ports::{Artifact, ArtifactCache};
use crate::domain::cache::cache_path;
use crate::domain::error::CmdError;

/// Mode for cache directories and installed artifacts.
const INSTALL_MODE: u32 = 0o777;

pub struct LocalCache {
    root: PathBuf,
}

impl LocalCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ArtifactCache for LocalCache {
    fn path_for(&self, spec: &CommandSpec) -> Result<PathBuf, CmdError> {
        cache_path(&self.root, spec)
    }

    fn is_installed(&self, spec: &CommandSpec) -> bool {
        let Ok(path) = self.path_for(spec) else {
            return false;
        };
        std::fs::metadata(&path).is_ok_and(|m| m.is_file() && m.len() > 0)
    }

    fn install(&self, spec: &CommandSpec, artifact: &Artifact) -> Result<PathBuf, CmdError> {
        let path = self.path_for(spec)?;
        let dir = path
            .parent()
            .ok_or_else(|| CmdError::InvalidSpec(format!("{} has no parent", path.display())))?;
        create_dir_all(dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".download-")
            .tempfile_in(dir)
            .map_err(|source| install_error("create temp file in", dir, source))?;

        if let Err(e) = write_executable(&mut tmp, &artifact.body) {
            let temp_path = tmp.path().to_path_buf();
            discard(tmp);
            return Err(install_error("write", &temp_path, e));
        }

        match tmp.persist(&path) {
            Ok(_) => Ok(path),
            Err(e) => {
                discard(e.file);
                Err(install_error("rename temp file onto", &path, e.error))
            }
        }
    }
}

fn install_error(action: &'static str, path: &Path, source: std::io::Error) -> CmdError {
    CmdError::Install {
        action,
        path: path.to_path_buf(),
        source,
    }
}

fn create_dir_all(dir: &Path) -> Result<(), CmdError> {
    let mut builder = std::fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(INSTALL_MODE);
    }
    builder
        .create(dir)
        .map_err(|source| install_error("create directory", dir, source))
}

fn write_executable(tmp: &mut NamedTempFile, body: &[u8]) -> std::io::Result<()> {
    tmp.as_file_mut().write_all(body)?;
    tmp.as_file().sync_all()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(tmp.path(), std::fs::Permissions::from_mode(INSTALL_MODE))?;
    }
    Ok(())
}

/// Best-effort removal of an abandoned temp file.
fn discard(tmp: NamedTempFile) {
    let path = tmp.path().to_path_buf();
    if let Err(e) = tmp.close() {
        tracing::warn!(path = %path.display(), error = %e, "failed to remove temp file");
    }
}
