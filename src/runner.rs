use std::{future::Future, io};

use crate::command::BuildCommand;

/// What came back from one finished `esp-mkbin` process.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Runs a build command to completion.
///
/// An `Err` means the process could not be started at all; a tool that ran
/// and failed is an `Ok` with a non-zero `code`.
pub trait ToolRunner {
    fn run(&mut self, command: &BuildCommand) -> impl Future<Output = io::Result<ToolOutput>>;
}
