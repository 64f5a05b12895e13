use std::{
    ffi::{OsStr, OsString},
    fmt,
    path::{Path, PathBuf},
};

use crate::config::ToolArgs;

/// `<file stem>.bin`, relative to wherever `esp-mkbin` runs.
pub fn bin_name(elf: &Path) -> OsString {
    let mut name = elf.file_stem().unwrap_or_default().to_os_string();
    name.push(".bin");
    name
}

/// One `esp-mkbin` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl BuildCommand {
    pub fn new(mkbin: &Path, elf: &Path, extra: &ToolArgs) -> Self {
        let mut args = Vec::with_capacity(4 + 2 * extra.len());
        args.push("--file".into());
        args.push(elf.into());
        args.push("--output".into());
        args.push(bin_name(elf));
        for (flag, value) in extra.iter() {
            args.push(flag.into());
            args.push(value.into());
        }

        Self {
            program: mkbin.to_path_buf(),
            args,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    pub fn output(&self) -> &OsStr {
        &self.args[3]
    }

    /// Program followed by its arguments.
    pub fn tokens(&self) -> impl Iterator<Item = &OsStr> {
        std::iter::once(self.program.as_os_str()).chain(self.args.iter().map(OsString::as_os_str))
    }
}

impl fmt::Display for BuildCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut tokens = self.tokens();
        if let Some(program) = tokens.next() {
            write!(f, "{}", program.to_string_lossy())?;
        }
        for token in tokens {
            write!(f, " {}", token.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::InvocationConfig;

    #[test]
    fn bin_names() {
        assert_eq!(bin_name(Path::new("/e/app.elf")), "app.bin");
        assert_eq!(bin_name(Path::new("boot.loader.elf")), "boot.loader.bin");
    }

    #[test]
    fn chip_flag_follows_prefix() {
        let config = InvocationConfig::from_json(r#"{"app.elf": {"--chip": "esp32"}}"#).unwrap();
        let elf = Path::new("/firmware/app.elf");
        let cmd = BuildCommand::new(
            Path::new("/tools/esp-mkbin"),
            elf,
            &config.args_for("app.elf").unwrap().unwrap(),
        );

        let tokens: Vec<_> = cmd.tokens().collect();
        assert_eq!(
            tokens,
            [
                "/tools/esp-mkbin",
                "--file",
                "/firmware/app.elf",
                "--output",
                "app.bin",
                "--chip",
                "esp32"
            ]
        );
        assert_eq!(cmd.program(), Path::new("/tools/esp-mkbin"));
        assert_eq!(cmd.output(), "app.bin");
        assert_eq!(
            cmd.to_string(),
            "/tools/esp-mkbin --file /firmware/app.elf --output app.bin --chip esp32"
        );
    }

    #[test]
    fn no_extra_flags() {
        let cmd = BuildCommand::new(
            Path::new("/t/esp-mkbin"),
            Path::new("/e/a.elf"),
            &ToolArgs::default(),
        );
        assert_eq!(cmd.args().len(), 4);
        assert_eq!(cmd.to_string(), "/t/esp-mkbin --file /e/a.elf --output a.bin");
    }
}
