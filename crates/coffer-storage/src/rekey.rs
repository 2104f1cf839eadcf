// SPDX-FileCopyrightText: 2026 Coffer Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-phase replacement of several encrypted files.
//!
//! Phase one writes every new file to `<file>.staged`. Phase two moves each
//! current file to `<file>.bak` and renames its staged file into place. Any
//! failure restores the backups and removes the staged files, so either
//! every file carries the new contents or none does.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use coffer_core::CofferError;
use tracing::{debug, warn};

use crate::store::write_atomic;

/// New contents for one file.
#[derive(Debug)]
pub(crate) struct RekeyJob {
    pub target: PathBuf,
    pub contents: String,
}

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}

fn staged_path(target: &Path) -> PathBuf {
    with_suffix(target, ".staged")
}

fn backup_path(target: &Path) -> PathBuf {
    with_suffix(target, ".bak")
}

fn remove_quietly(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "failed to remove leftover file");
    }
}

/// Replace every job's target, all or nothing.
pub(crate) fn commit_all(jobs: &[RekeyJob]) -> Result<(), CofferError> {
    stage(jobs)?;
    let swapped = swap(jobs)?;

    for (target, had_original) in swapped {
        if had_original {
            remove_quietly(&backup_path(target));
        }
    }
    debug!(files = jobs.len(), "re-key committed");
    Ok(())
}

fn stage(jobs: &[RekeyJob]) -> Result<(), CofferError> {
    for (index, job) in jobs.iter().enumerate() {
        if let Err(e) = write_atomic(&staged_path(&job.target), &job.contents) {
            for done in &jobs[..index] {
                remove_quietly(&staged_path(&done.target));
            }
            return Err(e);
        }
    }
    Ok(())
}

/// Returns each target with whether an original file was backed up.
fn swap(jobs: &[RekeyJob]) -> Result<Vec<(&Path, bool)>, CofferError> {
    let mut swapped: Vec<(&Path, bool)> = Vec::with_capacity(jobs.len());

    for job in jobs {
        match swap_one(&job.target) {
            Ok(had_original) => swapped.push((job.target.as_path(), had_original)),
            Err(e) => {
                warn!(
                    path = %job.target.display(),
                    error = %e,
                    "re-key commit failed -- restoring previous files"
                );
                roll_back(&swapped);
                for other in jobs {
                    remove_quietly(&staged_path(&other.target));
                }
                return Err(e);
            }
        }
    }
    Ok(swapped)
}

fn swap_one(target: &Path) -> Result<bool, CofferError> {
    let backup = backup_path(target);
    let had_original = target.exists();

    if had_original {
        std::fs::rename(target, &backup).map_err(|e| {
            CofferError::storage(format!("failed to back up {}", target.display()), e)
        })?;
    }

    if let Err(e) = std::fs::rename(staged_path(target), target) {
        if had_original && let Err(restore) = std::fs::rename(&backup, target) {
            warn!(path = %target.display(), error = %restore, "failed to restore backup");
        }
        return Err(CofferError::storage(
            format!("failed to move new {} into place", target.display()),
            e,
        ));
    }
    Ok(had_original)
}

fn roll_back(swapped: &[(&Path, bool)]) {
    for (target, had_original) in swapped.iter().rev() {
        let result = if *had_original {
            std::fs::rename(backup_path(target), target)
        } else {
            std::fs::remove_file(target)
        };
        if let Err(e) = result {
            warn!(path = %target.display(), error = %e, "failed to roll back re-keyed file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn commit_replaces_every_target_and_cleans_up() {
        let dir = tempdir().unwrap();
        let existing = dir.path().join("passwords.enc");
        let fresh = dir.path().join("bookmarks.enc");
        std::fs::write(&existing, "old").unwrap();

        let jobs = vec![
            RekeyJob {
                target: existing.clone(),
                contents: "new passwords".into(),
            },
            RekeyJob {
                target: fresh.clone(),
                contents: "new bookmarks".into(),
            },
        ];
        commit_all(&jobs).unwrap();

        assert_eq!(std::fs::read_to_string(&existing).unwrap(), "new passwords");
        assert_eq!(std::fs::read_to_string(&fresh).unwrap(), "new bookmarks");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .filter(|n| n.ends_with(".staged") || n.ends_with(".bak"))
            .collect();
        assert!(leftovers.is_empty(), "leftover files: {leftovers:?}");
    }

    #[test]
    fn staging_failure_changes_nothing() {
        let dir = tempdir().unwrap();
        let good = dir.path().join("passwords.enc");
        std::fs::write(&good, "old").unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let jobs = vec![
            RekeyJob {
                target: good.clone(),
                contents: "new".into(),
            },
            RekeyJob {
                target: blocker.join("bookmarks.enc"),
                contents: "new".into(),
            },
        ];
        assert!(commit_all(&jobs).is_err());

        assert_eq!(std::fs::read_to_string(&good).unwrap(), "old");
        assert!(!staged_path(&good).exists());
    }

    #[test]
    fn roll_back_restores_backups_and_removes_new_files() {
        let dir = tempdir().unwrap();
        let replaced = dir.path().join("a.enc");
        let created = dir.path().join("b.enc");
        std::fs::write(backup_path(&replaced), "original").unwrap();
        std::fs::write(&replaced, "new").unwrap();
        std::fs::write(&created, "new").unwrap();

        roll_back(&[(replaced.as_path(), true), (created.as_path(), false)]);

        assert_eq!(std::fs::read_to_string(&replaced).unwrap(), "original");
        assert!(!created.exists());
        assert!(!backup_path(&replaced).exists());
    }
}
