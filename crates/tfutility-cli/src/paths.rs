//! Expands command-line paths into the list of Terraform files to process.
//!
//! Files named on the command line are taken as given. Directories are
//! searched recursively for `*.tf` files, skipping hidden entries such as
//! `.terraform`. The result is sorted and free of duplicates.

use std::fs;
use std::io;
use std::path::PathBuf;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

const TERRAFORM_EXTENSION: &str = "tf";

/// Errors raised while expanding input paths.
#[derive(Debug, Error)]
pub enum PathError {
    /// A path named on the command line does not exist.
    #[error("path {path} does not exist")]
    NotFound {
        /// The missing path.
        path: Utf8PathBuf,
    },
    /// A path could not be inspected or a directory could not be listed.
    #[error("failed to read {path}: {source}")]
    Io {
        /// The path being read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A directory entry's path is not valid UTF-8.
    #[error("path {} is not valid UTF-8", path.display())]
    NonUtf8 {
        /// The offending path.
        path: PathBuf,
    },
}

/// Collects the Terraform files named by, or found beneath, `paths`.
///
/// # Errors
///
/// Returns an error when a path does not exist, cannot be read, or contains
/// an entry whose name is not valid UTF-8.
pub fn collect_tf_files(paths: &[Utf8PathBuf]) -> Result<Vec<Utf8PathBuf>, PathError> {
    let mut files = Vec::new();
    for path in paths {
        let metadata = fs::metadata(path).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                PathError::NotFound { path: path.clone() }
            } else {
                PathError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        if metadata.is_dir() {
            collect_from_directory(path, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn collect_from_directory(root: &Utf8Path, out: &mut Vec<Utf8PathBuf>) -> Result<(), PathError> {
    let read_error = |source| PathError::Io {
        path: root.to_owned(),
        source,
    };
    for entry in fs::read_dir(root).map_err(read_error)? {
        let entry = entry.map_err(read_error)?;
        let path = Utf8PathBuf::from_path_buf(entry.path())
            .map_err(|path| PathError::NonUtf8 { path })?;
        if path.file_name().is_some_and(|name| name.starts_with('.')) {
            continue;
        }

        let file_type = entry.file_type().map_err(read_error)?;
        if file_type.is_dir() {
            collect_from_directory(&path, out)?;
            continue;
        }
        if path.extension() == Some(TERRAFORM_EXTENSION) && path.is_file() {
            out.push(path);
        }
    }
    Ok(())
}
