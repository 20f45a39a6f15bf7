//! Level file access.
//!
//! Level documents are embedded into the binary at build time. A directory on disk can be used
//! instead, which is how level authors test changes without rebuilding.

use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::PathBuf;

use rust_embed::Embed;

use crate::constants::{LEVEL_FILE_EXTENSION, LEVEL_FILE_PREFIX};
use crate::error::AssetError;

#[derive(Embed)]
#[folder = "assets/levels/"]
struct EmbeddedLevels;

/// File name of the `index`-th level (1-based).
pub fn level_file_name(index: u32) -> String {
    format!("{LEVEL_FILE_PREFIX}{index}.{LEVEL_FILE_EXTENSION}")
}

/// Where level documents are read from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LevelSource {
    #[default]
    Embedded,
    Directory(PathBuf),
}

impl LevelSource {
    pub fn contains(&self, name: &str) -> bool {
        match self {
            LevelSource::Embedded => EmbeddedLevels::get(name).is_some(),
            LevelSource::Directory(dir) => dir.join(name).is_file(),
        }
    }

    pub fn read(&self, name: &str) -> Result<Cow<'static, [u8]>, AssetError> {
        match self {
            LevelSource::Embedded => EmbeddedLevels::get(name)
                .map(|file| file.data)
                .ok_or_else(|| AssetError::NotFound(name.to_string())),
            LevelSource::Directory(dir) => match fs::read(dir.join(name)) {
                Ok(bytes) => Ok(Cow::Owned(bytes)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Err(AssetError::NotFound(name.to_string())),
                Err(e) => Err(e.into()),
            },
        }
    }
}
