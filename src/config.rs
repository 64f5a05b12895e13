use std::{collections::BTreeMap, fmt, fs, path::Path, str::FromStr};

use serde::{
    de::{MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};
use serde_json::value::RawValue;

use crate::error::{Error, Result};

/// Extra `esp-mkbin` flags for one ELF file, in the order the config lists them.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ToolArgs(Vec<(String, String)>);

impl ToolArgs {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(flag, value)| (flag.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<F: Into<String>, V: Into<String>> FromIterator<(F, V)> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = (F, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(flag, value)| (flag.into(), value.into()))
                .collect(),
        )
    }
}

impl From<Chip> for ToolArgs {
    fn from(value: Chip) -> Self {
        [("--chip", value.name())].into_iter().collect()
    }
}

impl Serialize for ToolArgs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (flag, value) in &self.0 {
            map.serialize_entry(flag, value)?;
        }
        map.end()
    }
}

struct ToolArgsVisitor;

impl<'de> Visitor<'de> for ToolArgsVisitor {
    type Value = ToolArgs;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping flag names to string values")
    }

    // serde_json hands entries over in document order
    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut args: Vec<(String, String)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((flag, value)) = map.next_entry::<String, String>()? {
            // a repeated flag keeps its first position and takes the last value
            match args.iter_mut().find(|(seen, _)| *seen == flag) {
                Some((_, old)) => *old = value,
                None => args.push((flag, value)),
            }
        }
        Ok(ToolArgs(args))
    }
}

impl<'de> Deserialize<'de> for ToolArgs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(ToolArgsVisitor)
    }
}

/// ELF file name (with extension) to the flags its image is built with.
///
/// Entries stay raw until looked up, so an entry for a file that is not being
/// built is never inspected.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(transparent)]
pub struct InvocationConfig {
    entries: BTreeMap<String, Box<RawValue>>,
}

impl InvocationConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::ReadConfig {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content).map_err(|source| Error::ParseConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// `None` when there is no entry; `Some(Err(_))` when the entry is not a flag map.
    pub fn args_for(&self, file_name: &str) -> Option<serde_json::Result<ToolArgs>> {
        self.entries
            .get(file_name)
            .map(|raw| serde_json::from_str(raw.get()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Starting point for a config: one entry per ELF file, each selecting a chip.
#[derive(Serialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(transparent)]
pub struct ConfigSkeleton {
    entries: BTreeMap<String, ToolArgs>,
}

impl ConfigSkeleton {
    pub fn scan(elf_dir: &Path, chip: Chip) -> Result<Self> {
        let mut entries = BTreeMap::new();
        for elf in crate::scan::elf_files(elf_dir)? {
            if let Some(name) = elf.file_name() {
                entries.insert(name.to_string_lossy().into_owned(), chip.into());
            }
        }
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Chip names `esp-mkbin --chip` accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chip {
    Esp32,
    Esp32S2,
    Esp32C3,
    Esp32S3,
    Esp32C2,
}

impl Chip {
    pub const ALL: [Chip; 5] = [
        Chip::Esp32,
        Chip::Esp32S2,
        Chip::Esp32C3,
        Chip::Esp32S3,
        Chip::Esp32C2,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Chip::Esp32 => "ESP32",
            Chip::Esp32S2 => "ESP32S2",
            Chip::Esp32C3 => "ESP32C3",
            Chip::Esp32S3 => "ESP32S3",
            Chip::Esp32C2 => "ESP32C2",
        }
    }
}

impl fmt::Display for Chip {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Chip {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Chip::ALL
            .into_iter()
            .find(|chip| chip.name() == s)
            .ok_or_else(|| Error::UnknownChip(s.to_string()))
    }
}
