use std::path::{Path, PathBuf};

use crate::errors::CatalogError;

pub fn validate_dir(path: &str) -> Result<PathBuf, String> {
    let pb = PathBuf::from(path);
    if pb.is_dir() {
        Ok(pb)
    } else {
        Err(format!("{} is not a valid directory", path))
    }
}

/// Names of the regular, non-hidden files directly inside `path`.
pub fn list_update_files(path: &Path) -> Result<Vec<String>, CatalogError> {
    let read_dir_err = |source| CatalogError::ReadDir {
        path: path.to_path_buf(),
        source,
    };

    let mut names = Vec::new();
    for entry in std::fs::read_dir(path).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if !entry.file_type().map_err(read_dir_err)?.is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        names.push(name);
    }
    Ok(names)
}
