//! Turns a directory of ELF files into firmware images, one `esp-mkbin` run per file.
//!
//! The flags for each file come from a JSON object keyed by ELF file name:
//!
//! ```json
//! { "app.elf": { "--chip": "ESP32C3", "--flash-param": "dio" } }
//! ```

mod batch;
mod command;
mod config;
pub mod error;
mod runner;
mod scan;
mod settings;

#[cfg(any(test, feature = "test-util"))]
pub mod scratch;

pub use batch::{build_command, convert_all, Outcome};
pub use command::{bin_name, BuildCommand};
pub use config::{Chip, ConfigSkeleton, InvocationConfig, ToolArgs};
pub use error::{Error, Result};
pub use runner::{ToolOutput, ToolRunner};
pub use scan::{elf_files, is_elf};
pub use settings::{check_json_path, Settings, MKBIN_NAME};
