use std::{io, process::ExitStatus};

use mkbin_batch::{BuildCommand, ToolOutput, ToolRunner};
use tokio::process::Command;
use tracing::debug;

/// Spawns `esp-mkbin` for real and waits for it, capturing both output streams.
pub(crate) struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&mut self, command: &BuildCommand) -> io::Result<ToolOutput> {
        let output = Command::new(command.program())
            .args(command.args())
            .output()
            .await?;
        debug!("{} finished: {}", command.program().display(), output.status);

        Ok(ToolOutput {
            code: exit_code(output.status),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// A process killed by a signal reports `128 + signal`, as shells do.
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }
    1
}
