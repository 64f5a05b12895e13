use std::{
    ffi::OsStr,
    path::{Path, PathBuf},
};

use crate::error::{Error, Result};

/// File name of the image builder inside the tool directory.
pub const MKBIN_NAME: &str = "esp-mkbin";

/// The three inputs of a batch run, checked once up front.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    mkbin_dir: PathBuf,
    arg_path: PathBuf,
    elf_dir: PathBuf,
}

impl Settings {
    /// Fails on a config path without a `.json` extension, before touching the filesystem.
    pub fn new(
        mkbin_dir: impl Into<PathBuf>,
        arg_path: impl Into<PathBuf>,
        elf_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        let arg_path = arg_path.into();
        check_json_path(&arg_path)?;
        Ok(Self {
            mkbin_dir: mkbin_dir.into(),
            arg_path,
            elf_dir: elf_dir.into(),
        })
    }

    pub fn mkbin(&self) -> PathBuf {
        self.mkbin_dir.join(MKBIN_NAME)
    }

    pub fn arg_path(&self) -> &Path {
        &self.arg_path
    }

    pub fn elf_dir(&self) -> &Path {
        &self.elf_dir
    }
}

pub fn check_json_path(path: &Path) -> Result<()> {
    if path.extension() == Some(OsStr::new("json")) {
        Ok(())
    } else {
        Err(Error::ConfigExtension(path.to_path_buf()))
    }
}
