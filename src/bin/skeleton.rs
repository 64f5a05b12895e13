use std::{
    env,
    ffi::OsString,
    io::{self, ErrorKind, Write},
    path::PathBuf,
};

use mkbin_batch::{Chip, ConfigSkeleton};

/// `<elf-dir> [chip]`, the chip defaulting to ESP32.
fn parse_args(
    mut args: impl Iterator<Item = OsString>,
) -> Result<(PathBuf, Chip), Box<dyn std::error::Error>> {
    let elf_dir = args
        .next()
        .map(PathBuf::from)
        .ok_or(io::Error::new(ErrorKind::Other, "need an elf directory"))?;
    let chip = match args.next() {
        Some(chip) => chip.to_string_lossy().parse()?,
        None => Chip::Esp32,
    };
    Ok((elf_dir, chip))
}

pub fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (elf_dir, chip) = parse_args(env::args_os().skip(1))?;

    let skeleton = ConfigSkeleton::scan(&elf_dir, chip)?;
    let mut ser = serde_json::to_vec_pretty(&skeleton)?;
    ser.push(b'\n');

    io::stdout().write_all(&ser)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = OsString> {
        list.iter()
            .map(OsString::from)
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn chip_defaults_to_esp32() {
        let (dir, chip) = parse_args(args(&["/e"])).unwrap();
        assert_eq!(dir, Path::new("/e"));
        assert_eq!(chip, Chip::Esp32);
    }

    #[test]
    fn explicit_chip() {
        let (_, chip) = parse_args(args(&["/e", "ESP32S3"])).unwrap();
        assert_eq!(chip, Chip::Esp32S3);
    }

    #[test]
    fn bad_args() {
        let err = parse_args(args(&[])).unwrap_err();
        assert_eq!(err.to_string(), "need an elf directory");

        let err = parse_args(args(&["/e", "esp8266"])).unwrap_err();
        assert!(err.to_string().starts_with("unknown chip esp8266"));
    }
}
