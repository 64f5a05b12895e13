use std::{
    ffi::OsStr,
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::error::{Error, Result};

pub fn is_elf(path: &Path) -> bool {
    path.extension() == Some(OsStr::new("elf"))
}

/// Entries of `dir` with an `elf` extension, in directory order.
pub fn elf_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let read_err = |source| Error::ReadElfDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut elves = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        if is_elf(&path) {
            elves.push(path);
        } else {
            debug!("skipping {}", path.display());
        }
    }
    Ok(elves)
}
