//! Level documents and the catalog of playable levels.

use std::rc::Rc;

use tracing::info;

use crate::asset::{level_file_name, LevelSource};
use crate::constants::LEVEL_FILE_PREFIX;
use crate::error::{GameResult, LevelDataError};

pub mod data;

pub use data::{EnemySpawn, LevelData};

/// Every level loaded at startup, indexed from 1.
///
/// The number of loaded levels is the highest playable level.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<Rc<LevelData>>,
}

impl LevelCatalog {
    /// Loads `level1`, `level2`, ... until the next file is missing.
    pub fn load(source: &LevelSource) -> GameResult<Self> {
        let mut levels = Vec::new();

        loop {
            let index = levels.len() as u32 + 1;
            let name = level_file_name(index);
            if !source.contains(&name) {
                break;
            }

            let bytes = source.read(&name)?;
            let key = format!("{LEVEL_FILE_PREFIX}{index}");
            levels.push(LevelData::from_json(&key, &bytes)?);
        }

        let catalog = Self::from_levels(levels)?;
        info!(levels = catalog.max_level(), source = ?source, "Loaded level catalog");
        Ok(catalog)
    }

    pub fn embedded() -> GameResult<Self> {
        Self::load(&LevelSource::Embedded)
    }

    pub fn from_levels(levels: Vec<LevelData>) -> Result<Self, LevelDataError> {
        if levels.is_empty() {
            return Err(LevelDataError::NoLevels);
        }
        Ok(Self {
            levels: levels.into_iter().map(Rc::new).collect(),
        })
    }

    pub fn get(&self, level: u32) -> Result<Rc<LevelData>, LevelDataError> {
        level
            .checked_sub(1)
            .and_then(|i| self.levels.get(i as usize))
            .cloned()
            .ok_or(LevelDataError::MissingLevel(level))
    }

    pub fn max_level(&self) -> u32 {
        self.levels.len() as u32
    }
}
