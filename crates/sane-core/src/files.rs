use crate::CoreError;
use sane_schema::ConfigDescriptor;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Where the previous contents of `target` are kept while a config is applied.
pub fn backup_path(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".backup");
    PathBuf::from(name)
}

fn failed(path: &Path, e: &std::io::Error) -> CoreError {
    CoreError::FileTransactionFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    }
}

/// Install each file of `desc` from `checkout` over its target, moving the
/// existing target aside to `<target>.backup` first.
///
/// The target must already exist. Mappings are processed in order and the
/// first failure aborts. This is not atomic: if the copy fails after the
/// backup rename, the target is left missing with its `.backup` in place.
pub fn apply_files(desc: &ConfigDescriptor, checkout: &Path) -> Result<(), CoreError> {
    for mapping in &desc.files {
        let target = Path::new(&mapping.target);
        let backup = backup_path(target);
        let source = checkout.join(&mapping.source);

        info!("applying {} -> {}", mapping.source, target.display());
        fs::rename(target, &backup).map_err(|e| failed(target, &e))?;
        debug!("backed up {} to {}", target.display(), backup.display());
        fs::copy(&source, target).map_err(|e| failed(&source, &e))?;
    }
    Ok(())
}

/// Undo [`apply_files`]: delete each target and move its `.backup` back.
pub fn remove_files(desc: &ConfigDescriptor) -> Result<(), CoreError> {
    for mapping in &desc.files {
        let target = Path::new(&mapping.target);
        let backup = backup_path(target);

        info!("restoring {}", target.display());
        fs::remove_file(target).map_err(|e| failed(target, &e))?;
        fs::rename(&backup, target).map_err(|e| failed(&backup, &e))?;
    }
    Ok(())
}
