use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info};
use thiserror::Error;
use walkdir::WalkDir;

use crate::git::{FetchCache, FetchError, GitRunner};

#[derive(Error, Debug)]
pub enum MaterializeError {
    #[error(transparent)]
    Fetch(#[from] Arc<FetchError>),
    #[error("Could not resolve destination {path}: {source}")]
    Destination { path: String, source: io::Error },
    #[error("Error while copying {from} to {to}: {source}")]
    Copy {
        from: String,
        to: String,
        source: io::Error,
    },
    #[error("Copy task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Fetches `repo` at `branch`/`commit` through the cache and copies the clone
/// to `destination`.
///
/// The destination is always a private copy, changes made there never reach
/// the cached clone or other destinations of the same identity.
pub async fn materialize<R: GitRunner>(
    cache: &FetchCache<R>,
    repo: &str,
    commit: &str,
    branch: &str,
    destination: &Path,
) -> Result<(), MaterializeError> {
    let clone_dir = cache.fetch(repo, branch, commit).wait().await?;

    let destination = absolute(destination).map_err(|source| MaterializeError::Destination {
        path: destination.to_string_lossy().to_string(),
        source,
    })?;

    info!("Copying {} => {}", clone_dir.display(), destination.display());
    let (from, to) = (clone_dir.clone(), destination.clone());
    tokio::task::spawn_blocking(move || copy_tree(&from, &to))
        .await?
        .map_err(|source| MaterializeError::Copy {
            from: clone_dir.to_string_lossy().to_string(),
            to: destination.to_string_lossy().to_string(),
            source,
        })
}

fn absolute(path: &Path) -> io::Result<PathBuf> {
    if path.is_absolute() {
        Ok(path.to_path_buf())
    } else {
        Ok(std::env::current_dir()?.join(path))
    }
}

/// Recursively copies `from` into `to`, keeping permissions. Symbolic links
/// are recreated, not followed.
pub fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    // Applied last, a read-only directory would otherwise reject its own
    // contents.
    let mut directory_permissions = Vec::new();

    for entry in WalkDir::new(from).follow_links(false) {
        let entry = entry?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(|error| io::Error::new(io::ErrorKind::InvalidInput, error))?;
        let target = to.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            fs::create_dir_all(&target)?;
            directory_permissions.push((target, entry.metadata()?.permissions()));
        } else if file_type.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            debug!("Copying {}", relative.display());
            fs::copy(entry.path(), &target)?;
        }
    }

    for (directory, permissions) in directory_permissions.into_iter().rev() {
        fs::set_permissions(directory, permissions)?;
    }
    Ok(())
}

#[cfg(unix)]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    if target.symlink_metadata().is_ok() {
        fs::remove_file(target)?;
    }
    std::os::unix::fs::symlink(fs::read_link(source)?, target)
}

#[cfg(not(unix))]
fn copy_symlink(source: &Path, target: &Path) -> io::Result<()> {
    fs::copy(source, target).map(|_| ())
}
