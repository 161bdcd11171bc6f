use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::WalkDir;

use crate::error::{Error, Result};

/// Ensures the output directory is safe to write to.
///
/// # Errors
/// * `Error::OutputDirectoryExistsError` if the directory exists and `force` is false
pub fn ensure_output_dir<P: AsRef<Path>>(output_dir: P, force: bool) -> Result<PathBuf> {
    let output_dir = output_dir.as_ref();
    if output_dir.exists() && !force {
        return Err(Error::OutputDirectoryExistsError {
            output_dir: output_dir.display().to_string(),
        });
    }
    Ok(output_dir.to_path_buf())
}

fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
    move |source| Error::WriteError { path: path.display().to_string(), source }
}

/// Writes `content` to `dest_path`, creating missing parent directories.
///
/// A newline is appended unless `content` already ends with one. Existing files
/// are overwritten.
///
/// # Returns
/// * `Result<usize>` - Number of bytes written
pub fn write_file<P: AsRef<Path>>(dest_path: P, content: &str) -> Result<usize> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }

    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }

    fs::write(dest_path, &text).map_err(write_error(dest_path))?;
    Ok(text.len())
}

pub fn copy_file<P: AsRef<Path>, Q: AsRef<Path>>(source_path: P, dest_path: Q) -> Result<()> {
    let dest_path = dest_path.as_ref();
    if let Some(parent) = dest_path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }
    fs::copy(source_path, dest_path).map(|_| ()).map_err(write_error(dest_path))
}

/// Moves the directory `from` to `to`, replacing `to` if it exists.
///
/// A plain rename is tried first. When that fails (e.g. `to` is on another
/// filesystem) the tree is copied and the source removed afterwards.
pub fn move_dir<P: AsRef<Path>, Q: AsRef<Path>>(from: P, to: Q) -> Result<()> {
    let (from, to) = (from.as_ref(), to.as_ref());
    let move_error = |source| Error::MoveError {
        from: from.display().to_string(),
        to: to.display().to_string(),
        source,
    };

    if to.exists() {
        debug!("Removing existing directory '{}'.", to.display());
        fs::remove_dir_all(to).map_err(move_error)?;
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(move_error)?;
    }

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) => {
            debug!("Rename failed ({}), copying '{}' instead.", e, from.display());
            copy_dir(from, to)?;
            fs::remove_dir_all(from).map_err(move_error)
        }
    }
}

fn copy_dir(from: &Path, to: &Path) -> Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(|e| Error::IoError(e.into()))?;
        let relative = entry.path().strip_prefix(from).map_err(|e| {
            Error::ValidationError(format!("unexpected path during copy: {e}"))
        })?;
        let target = to.join(relative);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(write_error(&target))?;
        } else {
            copy_file(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Removes `dir` only when it is empty; anything still inside is left alone.
pub fn remove_dir_if_empty<P: AsRef<Path>>(dir: P) -> Result<bool> {
    let dir = dir.as_ref();
    let is_empty = fs::read_dir(dir)?.next().is_none();
    if is_empty {
        fs::remove_dir(dir)?;
    } else {
        debug!("Leaving non-empty scratch root '{}' in place.", dir.display());
    }
    Ok(is_empty)
}
