use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::{
    command::BuildCommand,
    config::InvocationConfig,
    error::{Error, Result},
    runner::{ToolOutput, ToolRunner},
    scan,
    settings::Settings,
};

/// How a batch ended when nothing went wrong on our side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every ELF file was turned into an image.
    Completed { converted: usize },
    /// `esp-mkbin` failed on `elf`; files after it were not attempted.
    ToolFailed { elf: PathBuf, output: ToolOutput },
}

impl Outcome {
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Completed { .. } => 0,
            Outcome::ToolFailed { output, .. } => output.code,
        }
    }
}

/// Looks up the flags for `elf` and composes its command line.
pub fn build_command(
    config: &InvocationConfig,
    config_path: &Path,
    mkbin: &Path,
    elf: &Path,
) -> Result<BuildCommand> {
    let file = elf
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let extra = match config.args_for(&file) {
        Some(Ok(extra)) => extra,
        Some(Err(source)) => {
            return Err(Error::InvalidEntry {
                file,
                config: config_path.to_path_buf(),
                source,
            })
        }
        None => {
            return Err(Error::MissingEntry {
                file,
                config: config_path.to_path_buf(),
            })
        }
    };
    Ok(BuildCommand::new(mkbin, elf, &extra))
}

/// Builds one image per ELF file in `settings.elf_dir()`, stopping at the first failure.
pub async fn convert_all<R: ToolRunner>(settings: &Settings, runner: &mut R) -> Result<Outcome> {
    let config = InvocationConfig::load(settings.arg_path())?;
    debug!(
        "{} entries in {}",
        config.len(),
        settings.arg_path().display()
    );

    let elves = scan::elf_files(settings.elf_dir())?;
    let mkbin = settings.mkbin();

    let mut converted = 0;
    for elf in elves {
        let command = build_command(&config, settings.arg_path(), &mkbin, &elf)?;
        info!(
            "building {} from {}",
            command.output().to_string_lossy(),
            elf.display()
        );
        debug!("{command}");

        let output = runner
            .run(&command)
            .await
            .map_err(|source| Error::Launch {
                program: mkbin.clone(),
                source,
            })?;

        if !output.success() {
            error!("{} exited with {} on {}", mkbin.display(), output.code, elf.display());
            return Ok(Outcome::ToolFailed { elf, output });
        }
        if !output.stdout.is_empty() {
            debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
        }
        converted += 1;
    }

    info!("built {converted} images");
    Ok(Outcome::Completed { converted })
}
