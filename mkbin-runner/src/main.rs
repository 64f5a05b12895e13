use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use mkbin_batch::{check_json_path, convert_all, Outcome, Settings, ToolRunner};
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod process;

/// Build a firmware image for every ELF file in a directory with `esp-mkbin`.
#[derive(Parser, Debug)]
#[command(name = "run-mkbin", version)]
struct Args {
    /// Directory containing the esp-mkbin executable
    #[arg(long)]
    mkbin_dir: PathBuf,

    /// JSON file mapping each ELF file name to its extra esp-mkbin flags
    #[arg(long, value_parser = json_file)]
    arg_dir: PathBuf,

    /// Directory scanned for .elf files
    #[arg(long)]
    elf_dir: PathBuf,

    /// Show debug messages
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn settings(self) -> mkbin_batch::Result<Settings> {
        Settings::new(self.mkbin_dir, self.arg_dir, self.elf_dir)
    }
}

fn json_file(arg: &str) -> mkbin_batch::Result<PathBuf> {
    let path = PathBuf::from(arg);
    check_json_path(&path)?;
    Ok(path)
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run<R: ToolRunner>(args: Args, runner: &mut R) -> eyre::Result<Outcome> {
    let settings = args.settings()?;
    debug!("{settings:?}");
    Ok(convert_all(&settings, runner).await?)
}

/// Echoes what a failed `esp-mkbin` printed and picks the process exit status.
fn finish(outcome: &Outcome) -> io::Result<u8> {
    match outcome {
        Outcome::Completed { .. } => Ok(0),
        Outcome::ToolFailed { output, .. } => {
            io::stdout().write_all(&output.stdout)?;
            io::stderr().write_all(&output.stderr)?;
            Ok(exit_status(output.code))
        }
    }
}

/// Codes outside `0..=255` map to 1 so a failure never wraps around to success.
fn exit_status(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> eyre::Result<ExitCode> {
    color_eyre::install()?;
    let args = Args::parse();
    init_tracing(args.verbose);

    let outcome = run(args, &mut process::ProcessRunner).await?;
    Ok(ExitCode::from(finish(&outcome)?))
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use clap::error::ErrorKind;
    use mkbin_batch::{scratch::ScratchDir, BuildCommand, ToolOutput};

    use super::*;

    #[derive(Default)]
    struct Spy {
        calls: Vec<String>,
        code: i32,
    }

    impl ToolRunner for Spy {
        async fn run(&mut self, command: &BuildCommand) -> io::Result<ToolOutput> {
            self.calls.push(command.to_string());
            Ok(ToolOutput {
                code: self.code,
                ..Default::default()
            })
        }
    }

    #[test]
    fn required_flags() {
        let args = Args::try_parse_from([
            "run-mkbin",
            "--mkbin-dir=/t",
            "--arg-dir=cfg.json",
            "--elf-dir=/e",
        ])
        .unwrap();
        assert_eq!(args.mkbin_dir, Path::new("/t"));
        assert_eq!(args.arg_dir, Path::new("cfg.json"));
        assert_eq!(args.elf_dir, Path::new("/e"));
        assert!(!args.verbose);

        let err = Args::try_parse_from(["run-mkbin", "--mkbin-dir", "/t", "--elf-dir", "/e"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn non_json_config_is_a_usage_error() {
        let err = Args::try_parse_from([
            "run-mkbin",
            "--mkbin-dir=/t",
            "--arg-dir=cfg.yaml",
            "--elf-dir=/e",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }

    #[tokio::test]
    async fn single_elf_run() {
        let cfg = ScratchDir::new("cfg");
        let elves = ScratchDir::new("elves");
        let arg_path = cfg.write("cfg.json", r#"{"a.elf": {}}"#);
        elves.write("a.elf", "");
        elves.write("notes.txt", "");

        let args = Args::try_parse_from([
            "run-mkbin".into(),
            "--mkbin-dir=/t".into(),
            format!("--arg-dir={}", arg_path.display()),
            format!("--elf-dir={}", elves.path().display()),
        ])
        .unwrap();

        let mut spy = Spy::default();
        let outcome = run(args, &mut spy).await.unwrap();
        assert_eq!(outcome, Outcome::Completed { converted: 1 });
        assert_eq!(finish(&outcome).unwrap(), 0);
        assert_eq!(
            spy.calls,
            [format!(
                "/t/esp-mkbin --file {} --output a.bin",
                elves.path().join("a.elf").display()
            )]
        );
    }

    #[tokio::test]
    async fn tool_code_becomes_exit_status() {
        let cfg = ScratchDir::new("cfg");
        let elves = ScratchDir::new("elves");
        let arg_path = cfg.write("cfg.json", r#"{"a.elf": {"--chip": "ESP32"}}"#);
        elves.write("a.elf", "");

        let args = Args {
            mkbin_dir: "/t".into(),
            arg_dir: arg_path,
            elf_dir: elves.path().into(),
            verbose: false,
        };
        let mut spy = Spy {
            code: 42,
            ..Default::default()
        };
        let outcome = run(args, &mut spy).await.unwrap();
        assert_eq!(outcome.exit_code(), 42);
        assert_eq!(finish(&outcome).unwrap(), 42);
        assert_eq!(spy.calls.len(), 1);
    }

    #[test]
    fn exit_status_never_zero_on_failure() {
        assert_eq!(exit_status(0), 0);
        assert_eq!(exit_status(3), 3);
        assert_eq!(exit_status(255), 255);
        assert_eq!(exit_status(256), 1);
        assert_eq!(exit_status(-1), 1);
    }
}
