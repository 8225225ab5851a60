//! Filesystem side of a rename decision.
//!
//! [`RenameExecutor::execute_rename`] never returns an error: every failure
//! is folded into a [`RenameOutcome`] so the caller can keep going with the
//! next item.

mod audit;

pub use audit::AuditLog;

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use retitle_model::{RenameOutcome, RenameStatus};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimal filesystem surface used by the executor.
pub trait RenameFs {
    fn exists(&self, path: &Path) -> bool;
    /// Whether both paths resolve to the same underlying file.
    fn same_file(&self, a: &Path, b: &Path) -> io::Result<bool>;
    fn rename(&self, from: &Path, to: &Path) -> io::Result<()>;
}

/// The real filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdFs;

impl RenameFs for StdFs {
    fn exists(&self, path: &Path) -> bool {
        path.try_exists().unwrap_or(false)
    }

    #[cfg(unix)]
    fn same_file(&self, a: &Path, b: &Path) -> io::Result<bool> {
        use std::os::unix::fs::MetadataExt;

        let a = fs::metadata(a)?;
        let b = fs::metadata(b)?;
        Ok(a.dev() == b.dev() && a.ino() == b.ino())
    }

    #[cfg(not(unix))]
    fn same_file(&self, a: &Path, b: &Path) -> io::Result<bool> {
        Ok(fs::canonicalize(a)? == fs::canonicalize(b)?)
    }

    fn rename(&self, from: &Path, to: &Path) -> io::Result<()> {
        fs::rename(from, to)
    }
}

/// Performs renames and records them in the optional audit log.
#[derive(Debug, Clone, Default)]
pub struct RenameExecutor<F: RenameFs = StdFs> {
    fs: F,
    audit: Option<AuditLog>,
}

impl RenameExecutor<StdFs> {
    pub fn new(audit: Option<AuditLog>) -> Self {
        Self::with_fs(StdFs, audit)
    }
}

impl<F: RenameFs> RenameExecutor<F> {
    pub fn with_fs(fs: F, audit: Option<AuditLog>) -> Self {
        Self { fs, audit }
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    pub fn audit_log(&self) -> Option<&AuditLog> {
        self.audit.as_ref()
    }

    /// Same directory, new stem, original extension.
    pub fn target_path(old_path: &Path, proposed_name: &str) -> PathBuf {
        let mut file_name = OsString::from(proposed_name);
        if let Some(ext) = old_path.extension() {
            file_name.push(".");
            file_name.push(ext);
        }
        match old_path.parent() {
            Some(parent) => parent.join(file_name),
            None => PathBuf::from(file_name),
        }
    }

    /// Rename `old_path` to `proposed_name` plus its original extension.
    ///
    /// `confirmed` authorizes replacing an existing, different destination.
    pub fn execute_rename(
        &self,
        old_path: &Path,
        proposed_name: &str,
        confirmed: bool,
    ) -> RenameOutcome {
        let target = Self::target_path(old_path, proposed_name);
        let outcome = self.rename_to(old_path, &target, confirmed);

        match outcome.status {
            RenameStatus::Renamed => {
                info!("renamed {:?} -> {:?}", outcome.old_path, outcome.new_path)
            }
            RenameStatus::Failed => warn!(
                "rename {:?} -> {:?} failed: {}",
                outcome.old_path,
                outcome.new_path,
                outcome.detail.as_deref().unwrap_or("unknown error")
            ),
            _ => debug!(
                status = %outcome.status,
                "no rename for {:?}",
                outcome.old_path
            ),
        }

        if outcome.is_auditable()
            && let Some(audit) = &self.audit
            && let Err(err) = audit.append(&outcome)
        {
            warn!("failed to write audit entry to {:?}: {err}", audit.path());
        }

        outcome
    }

    fn rename_to(
        &self,
        old_path: &Path,
        target: &Path,
        confirmed: bool,
    ) -> RenameOutcome {
        if old_path.as_os_str() == target.as_os_str() {
            return RenameOutcome::new(old_path, target, RenameStatus::AlreadyCorrect);
        }

        if !self.fs.exists(old_path) {
            return RenameOutcome::new(old_path, target, RenameStatus::Failed)
                .with_detail("source file no longer exists");
        }

        if self.fs.exists(target) {
            if self.is_case_only_change(old_path, target) {
                return self.rename_via_temp(old_path, target);
            }
            if !confirmed {
                return RenameOutcome::new(old_path, target, RenameStatus::SkippedExists)
                    .with_detail("destination already exists");
            }
            debug!("overwriting existing {:?}", target);
        }

        match self.fs.rename(old_path, target) {
            Ok(()) => RenameOutcome::new(old_path, target, RenameStatus::Renamed),
            Err(err) => RenameOutcome::new(old_path, target, RenameStatus::Failed)
                .with_detail(format!(
                    "failed to move {:?} -> {:?}: {err}",
                    old_path, target
                )),
        }
    }

    /// Paths that differ only by letter case and resolve to one file.
    fn is_case_only_change(&self, old_path: &Path, target: &Path) -> bool {
        let old_lower = old_path.to_string_lossy().to_lowercase();
        let target_lower = target.to_string_lossy().to_lowercase();
        if old_lower != target_lower {
            return false;
        }
        match self.fs.same_file(old_path, target) {
            Ok(same) => same,
            Err(err) => {
                debug!("could not compare {:?} and {:?}: {err}", old_path, target);
                false
            }
        }
    }

    /// Two-step rename through an intermediate name. Case-insensitive
    /// backends treat a direct case-only rename as a no-op.
    fn rename_via_temp(&self, old_path: &Path, target: &Path) -> RenameOutcome {
        let tmp = temp_path_for(target);
        debug!("case-only rename {:?} via {:?}", old_path, tmp);

        if let Err(err) = self.fs.rename(old_path, &tmp) {
            return RenameOutcome::new(old_path, target, RenameStatus::Failed)
                .with_detail(format!(
                    "failed to move {:?} -> {:?}: {err}",
                    old_path, tmp
                ));
        }

        match self.fs.rename(&tmp, target) {
            Ok(()) => RenameOutcome::new(old_path, target, RenameStatus::Renamed),
            Err(err) => {
                let restored = match self.fs.rename(&tmp, old_path) {
                    Ok(()) => "original name restored".to_string(),
                    Err(restore_err) => format!(
                        "restore failed, file left at {:?}: {restore_err}",
                        tmp
                    ),
                };
                RenameOutcome::new(old_path, target, RenameStatus::Failed)
                    .with_detail(format!(
                        "failed to move {:?} -> {:?}: {err}; {restored}",
                        tmp, target
                    ))
            }
        }
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = target
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(format!(".retitle-tmp-{}", Uuid::new_v4().simple()));
    target.with_file_name(name)
}
