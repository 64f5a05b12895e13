use std::{io, path::PathBuf};

/// Everything that can stop a batch before `esp-mkbin` itself reports a failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("only json file is available, got {}", .0.display())]
    ConfigExtension(PathBuf),
    #[error("could not read config {}", .path.display())]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("could not parse config {}", .path.display())]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not list elf directory {}", .path.display())]
    ReadElfDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{file} has no entry in {}", .config.display())]
    MissingEntry { file: String, config: PathBuf },
    #[error("entry for {file} in {} is not a map of flag names to strings", .config.display())]
    InvalidEntry {
        file: String,
        config: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("could not launch {}", .program.display())]
    Launch {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("unknown chip {0}, possible values: ESP32, ESP32S2, ESP32C3, ESP32S3, ESP32C2")]
    UnknownChip(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
