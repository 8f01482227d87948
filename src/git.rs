//! Git integration: reads the committed (HEAD) version of a file so it can be
//! compared against the working copy.

use crate::buffer::normalize_newlines;
use crate::error::GitError;
use git2::Repository;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Absolute, symlink-resolved path. Only the parent directory has to exist,
/// so a file deleted from the working copy still resolves.
fn resolve(path: &Path) -> Result<PathBuf, GitError> {
    let abs_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(|_| GitError::NotARepo)?
    };

    if let Ok(canonical) = abs_path.canonicalize() {
        return Ok(canonical);
    }
    // Canonicalize the parent (macOS /var -> /private/var) and re-attach the name
    let parent = abs_path.parent().ok_or(GitError::NotARepo)?;
    let name = abs_path.file_name().ok_or(GitError::NotARepo)?;
    let parent = parent.canonicalize().map_err(|_| GitError::NotARepo)?;
    Ok(parent.join(name))
}

/// Get the content of a file as committed in HEAD.
pub fn get_head_content(path: &Path) -> Result<String, GitError> {
    let result = read_head_blob(path);
    if let Err(ref err) = result {
        warn!("no HEAD version of {}: {}", path.display(), err);
    }
    result
}

fn read_head_blob(path: &Path) -> Result<String, GitError> {
    let abs_path = resolve(path)?;
    let start = abs_path.parent().unwrap_or(&abs_path);
    let repo = Repository::discover(start).map_err(|_| GitError::NotARepo)?;

    let workdir = repo.workdir().ok_or(GitError::NotARepo)?;
    let workdir = workdir.canonicalize().unwrap_or_else(|_| workdir.to_path_buf());
    let relative_path = abs_path
        .strip_prefix(&workdir)
        .map_err(|_| GitError::NotARepo)?;

    let in_index = repo
        .index()
        .map(|index| index.get_path(relative_path, 0).is_some())
        .unwrap_or(false);
    let not_found = if in_index {
        GitError::NotInHead
    } else {
        GitError::NotTracked
    };

    // No commits yet means nothing is in HEAD
    let tree = match repo.head().and_then(|head| head.peel_to_tree()) {
        Ok(tree) => tree,
        Err(_) => return Err(not_found),
    };
    let entry = tree.get_path(relative_path).map_err(|_| not_found)?;

    let blob = repo.find_blob(entry.id())?;
    debug!(
        "read {} bytes of {} from HEAD",
        blob.content().len(),
        relative_path.display()
    );
    Ok(normalize_newlines(&String::from_utf8_lossy(blob.content())))
}
