//! Typed view over a level document.
//!
//! Level files are Tiled map exports. The raw document is deserialized into private mirror structs
//! and validated once into [`LevelData`]; scenes only ever see the validated form.

use std::str::FromStr;

use glam::{IVec2, Vec2};
use micromap::Map;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::constants::{layers, properties};
use crate::entity::enemy::EnemyKind;
use crate::entity::power_up::PowerUpKind;
use crate::error::LevelDataError;
use crate::physics::{CollisionMap, Rect};

/// Tiled stores flip/rotation flags in the top bits of a gid.
const GID_MASK: u32 = 0x1FFF_FFFF;

#[derive(Debug, Deserialize)]
struct RawMap {
    width: u32,
    height: u32,
    #[serde(rename = "tilewidth")]
    tile_width: u32,
    #[serde(rename = "tileheight")]
    tile_height: u32,
    #[serde(default)]
    properties: Vec<RawProperty>,
    #[serde(default)]
    tilesets: Vec<RawTileset>,
    #[serde(default)]
    layers: Vec<RawLayer>,
}

#[derive(Debug, Deserialize)]
struct RawProperty {
    name: String,
    value: Value,
}

#[derive(Debug, Deserialize)]
struct RawTileset {
    #[serde(rename = "firstgid")]
    first_gid: u32,
    #[serde(default)]
    tiles: Vec<RawTile>,
}

#[derive(Debug, Deserialize)]
struct RawTile {
    id: u32,
    #[serde(default)]
    properties: Vec<RawProperty>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum RawLayer {
    #[serde(rename = "tilelayer")]
    Tiles {
        name: String,
        width: u32,
        height: u32,
        data: Vec<u32>,
    },
    #[serde(rename = "objectgroup")]
    Objects {
        name: String,
        #[serde(default)]
        objects: Vec<RawObject>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct RawObject {
    x: f32,
    y: f32,
    #[serde(default)]
    width: f32,
    #[serde(default)]
    height: f32,
    /// Tile objects carry a gid and are anchored at their bottom-left corner.
    #[serde(default)]
    gid: Option<u32>,
    #[serde(default, rename = "type", alias = "class")]
    kind: String,
}

impl RawObject {
    /// The object's rectangle with a top-left origin; zero sizes fall back to one tile.
    fn rect(&self, tile_size: Vec2) -> Rect {
        let width = if self.width > 0.0 { self.width } else { tile_size.x };
        let height = if self.height > 0.0 { self.height } else { tile_size.y };
        let top = if self.gid.is_some() { self.y - height } else { self.y };
        Rect::new(self.x, top, width, height)
    }
}

/// Where an enemy starts and what it is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpawn {
    pub kind: EnemyKind,
    pub rect: Rect,
}

/// A validated level.
#[derive(Debug, Clone)]
pub struct LevelData {
    /// `level{n}`, used in logs.
    pub key: String,
    /// Size of the whole map, in pixels.
    pub size: Vec2,
    pub tile_size: Vec2,
    pub collision: CollisionMap,
    pub exit: Rect,
    pub enemies: Vec<EnemySpawn>,
    pub player_start: Option<Vec2>,
    /// Text of the introduction overlay; levels with instructions wait for the player to start.
    pub instructions: Option<String>,
    power_ups: Map<PowerUpKind, u32, 3>,
}

impl LevelData {
    pub fn from_json(key: &str, bytes: &[u8]) -> Result<Self, LevelDataError> {
        let raw: RawMap = serde_json::from_slice(bytes).map_err(|source| LevelDataError::Json {
            level: key.to_string(),
            source,
        })?;
        Self::validate(key, raw)
    }

    fn validate(key: &str, raw: RawMap) -> Result<Self, LevelDataError> {
        let level = || key.to_string();
        let invalid = |what: &'static str, width: u32, height: u32| LevelDataError::InvalidDimensions {
            level: level(),
            what,
            width,
            height,
        };

        if raw.tile_width == 0 || raw.tile_height == 0 {
            return Err(invalid("tile size", raw.tile_width, raw.tile_height));
        }
        let pixel_width = raw.width.checked_mul(raw.tile_width).filter(|&w| w > 0);
        let pixel_height = raw.height.checked_mul(raw.tile_height).filter(|&h| h > 0);
        let (Some(pixel_width), Some(pixel_height)) = (pixel_width, pixel_height) else {
            return Err(invalid("map size", raw.width, raw.height));
        };
        let tile_size = Vec2::new(raw.tile_width as f32, raw.tile_height as f32);

        let collision = {
            let solid_gids = solid_gids(&raw.tilesets);
            let (width, height, data) = raw
                .layers
                .iter()
                .find_map(|layer| match layer {
                    RawLayer::Tiles {
                        name,
                        width,
                        height,
                        data,
                    } if name == layers::PLATFORMS => Some((*width, *height, data)),
                    _ => None,
                })
                .ok_or_else(|| LevelDataError::MissingLayer {
                    level: level(),
                    layer: layers::PLATFORMS,
                })?;

            let expected = width
                .checked_mul(height)
                .and_then(|count| usize::try_from(count).ok())
                .ok_or_else(|| invalid("tile layer size", width, height))?;
            if data.len() != expected {
                return Err(LevelDataError::InvalidTileData {
                    level: level(),
                    layer: layers::PLATFORMS.to_string(),
                    expected,
                    found: data.len(),
                });
            }

            let mut map = CollisionMap::new(tile_size);
            for (i, gid) in data.iter().enumerate() {
                let gid = gid & GID_MASK;
                if gid != 0 && solid_gids.contains(&gid) {
                    map.insert(IVec2::new((i as u32 % width) as i32, (i as u32 / width) as i32));
                }
            }
            map
        };

        let exit = objects(&raw.layers, layers::EXIT)
            .ok_or_else(|| LevelDataError::MissingLayer {
                level: level(),
                layer: layers::EXIT,
            })?
            .first()
            .ok_or_else(|| LevelDataError::MissingObject {
                level: level(),
                layer: layers::EXIT,
            })?
            .rect(tile_size);

        let enemies = objects(&raw.layers, layers::ENEMIES)
            .unwrap_or_default()
            .iter()
            .map(|object| {
                let kind = EnemyKind::from_str(&object.kind).map_err(|_| LevelDataError::UnknownEnemyType {
                    level: level(),
                    found: object.kind.clone(),
                })?;
                Ok(EnemySpawn {
                    kind,
                    rect: object.rect(tile_size),
                })
            })
            .collect::<Result<Vec<_>, LevelDataError>>()?;

        let player_start = objects(&raw.layers, layers::START)
            .and_then(|objects| objects.first())
            .map(|object| object.rect(tile_size).min);

        let mut power_ups = Map::new();
        let mut instructions = None;
        for property in &raw.properties {
            let kind = match property.name.as_str() {
                properties::FLY_NUMBER => PowerUpKind::Fly,
                properties::SPEED_NUMBER => PowerUpKind::Speed,
                properties::SHOOT_NUMBER => PowerUpKind::Shoot,
                properties::INSTRUCTIONS => {
                    let text = property.value.as_str().ok_or_else(|| LevelDataError::InvalidProperty {
                        level: level(),
                        name: property.name.clone(),
                        expected: "a string",
                    })?;
                    instructions = Some(text.to_string()).filter(|t| !t.trim().is_empty());
                    continue;
                }
                _ => continue,
            };

            let count = property
                .value
                .as_u64()
                .and_then(|v| u32::try_from(v).ok())
                .ok_or_else(|| LevelDataError::InvalidProperty {
                    level: level(),
                    name: property.name.clone(),
                    expected: "a non-negative integer",
                })?;
            power_ups.insert(kind, count);
        }

        let data = Self {
            key: key.to_string(),
            size: Vec2::new(pixel_width as f32, pixel_height as f32),
            tile_size,
            collision,
            exit,
            enemies,
            player_start,
            instructions,
            power_ups,
        };

        debug!(
            level = key,
            solids = data.collision.solids.len(),
            enemies = data.enemies.len(),
            instructions = data.instructions.is_some(),
            "Validated level"
        );
        Ok(data)
    }

    /// The world rectangle, anchored at the origin.
    pub fn bounds(&self) -> Rect {
        Rect {
            min: Vec2::ZERO,
            size: self.size,
        }
    }

    /// Number of power-ups of `kind` available in this level (0 when unspecified).
    pub fn power_up_count(&self, kind: PowerUpKind) -> u32 {
        self.power_ups.get(&kind).copied().unwrap_or(0)
    }

    pub fn has_instructions(&self) -> bool {
        self.instructions.is_some()
    }
}

fn objects<'a>(layers: &'a [RawLayer], wanted: &str) -> Option<&'a [RawObject]> {
    layers.iter().find_map(|layer| match layer {
        RawLayer::Objects { name, objects } if name == wanted => Some(objects.as_slice()),
        _ => None,
    })
}

/// Global ids of every tileset tile whose `collides` property is true.
fn solid_gids(tilesets: &[RawTileset]) -> Vec<u32> {
    tilesets
        .iter()
        .flat_map(|tileset| {
            tileset
                .tiles
                .iter()
                .filter(|tile| {
                    tile.properties
                        .iter()
                        .any(|p| p.name == properties::COLLIDES && p.value.as_bool() == Some(true))
                })
                .map(move |tile| tileset.first_gid + tile.id)
        })
        .collect()
}
