//! IO utilities.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use crate::error::{with_err_context, ErrorContext, Result};

/// File extension of Magic layout files.
pub const LAYOUT_EXTENSION: &str = "mag";

pub fn create_dir_all(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    with_err_context(std::fs::create_dir_all(path), || {
        ErrorContext::CreateDir(path.to_path_buf())
    })?;
    Ok(())
}

pub fn create_file(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    let file = with_err_context(File::create(path), || {
        ErrorContext::CreateFile(path.to_path_buf())
    })?;
    Ok(file)
}

/// Opens `path` for appending, creating it if it does not exist.
pub fn open_append(path: impl AsRef<Path>) -> Result<File> {
    let path = path.as_ref();
    let file = with_err_context(
        OpenOptions::new().create(true).append(true).open(path),
        || ErrorContext::CreateFile(path.to_path_buf()),
    )?;
    Ok(file)
}

pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let data = with_err_context(std::fs::read_to_string(path), || {
        ErrorContext::ReadFile(path.to_path_buf())
    })?;
    Ok(data)
}

/// Lists the layout files in `dir`, sorted by file name.
pub fn layout_files(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let entries = with_err_context(std::fs::read_dir(dir), || {
        ErrorContext::ReadFile(dir.to_path_buf())
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = with_err_context(entry, || ErrorContext::ReadFile(dir.to_path_buf()))?.path();
        if path.is_file() && path.extension().map_or(false, |ext| ext == LAYOUT_EXTENSION) {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
