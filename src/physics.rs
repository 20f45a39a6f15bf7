//! A minimal arcade-style physics stand-in.
//!
//! Bodies are axis-aligned boxes in world space (y grows downwards). A step integrates gravity and
//! velocity, resolves the body against solid tiles one axis at a time and records which sides were
//! blocked. Only the capabilities the level controller needs are present: velocity, "blocked"
//! queries, AABB overlap, static vs. dynamic bodies and world bounds.

use std::collections::HashSet;

use bitflags::bitflags;
use glam::{IVec2, Vec2};

/// Keeps a body's edge from registering as inside the tile it is merely touching.
const SKIN: f32 = 0.001;

/// An axis-aligned rectangle given by its top-left corner and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size * 0.5,
            size,
        }
    }

    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x <= max.x && point.y >= self.min.y && point.y <= max.y
    }

    /// Strict overlap; rectangles that only share an edge do not intersect.
    pub fn intersects(&self, other: &Rect) -> bool {
        let (a_max, b_max) = (self.max(), other.max());
        self.min.x < b_max.x && a_max.x > other.min.x && self.min.y < b_max.y && a_max.y > other.min.y
    }
}

bitflags! {
    /// Sides of a body that were blocked during the last step.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Blocked: u8 {
        const UP = 1 << 0;
        const DOWN = 1 << 1;
        const LEFT = 1 << 2;
        const RIGHT = 1 << 3;
    }
}

/// A physics body owned by an entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Body {
    /// Top-left corner in world space.
    pub position: Vec2,
    pub size: Vec2,
    pub velocity: Vec2,
    pub allow_gravity: bool,
    /// Static bodies never move; they only take part in overlap checks.
    pub immovable: bool,
    pub collide_tiles: bool,
    pub collide_world_bounds: bool,
    /// Disabled bodies are skipped by the step and never overlap anything.
    pub enabled: bool,
    pub blocked: Blocked,
}

impl Body {
    /// A body affected by gravity that lands on solid tiles.
    pub fn dynamic(position: Vec2, size: Vec2) -> Self {
        Self {
            position,
            size,
            velocity: Vec2::ZERO,
            allow_gravity: true,
            immovable: false,
            collide_tiles: true,
            collide_world_bounds: false,
            enabled: true,
            blocked: Blocked::empty(),
        }
    }

    /// A body that never moves.
    pub fn fixed(rect: Rect) -> Self {
        Self {
            position: rect.min,
            size: rect.size,
            velocity: Vec2::ZERO,
            allow_gravity: false,
            immovable: true,
            collide_tiles: false,
            collide_world_bounds: false,
            enabled: true,
            blocked: Blocked::empty(),
        }
    }

    /// A body that moves only by its own velocity, ignoring gravity and tiles.
    pub fn floating(rect: Rect) -> Self {
        Self {
            immovable: false,
            ..Self::fixed(rect)
        }
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: self.position,
            size: self.size,
        }
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn blocked_down(&self) -> bool {
        self.blocked.contains(Blocked::DOWN)
    }

    pub fn overlaps(&self, other: &Body) -> bool {
        self.enabled && other.enabled && self.rect().intersects(&other.rect())
    }

    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(x, y);
    }

    pub fn stop(&mut self) {
        self.velocity = Vec2::ZERO;
    }
}

/// Solid cells of a level's tile layer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollisionMap {
    pub tile_size: Vec2,
    pub solids: HashSet<IVec2>,
}

impl CollisionMap {
    pub fn new(tile_size: Vec2) -> Self {
        Self {
            tile_size,
            solids: HashSet::new(),
        }
    }

    pub fn insert(&mut self, tile: IVec2) {
        self.solids.insert(tile);
    }

    pub fn is_solid(&self, tile: IVec2) -> bool {
        self.solids.contains(&tile)
    }

    fn column(&self, x: f32) -> i32 {
        (x / self.tile_size.x).floor() as i32
    }

    fn row(&self, y: f32) -> i32 {
        (y / self.tile_size.y).floor() as i32
    }

    fn any_solid_in_column(&self, column: i32, rows: (i32, i32)) -> bool {
        (rows.0..=rows.1).any(|row| self.is_solid(IVec2::new(column, row)))
    }

    fn any_solid_in_row(&self, row: i32, columns: (i32, i32)) -> bool {
        (columns.0..=columns.1).any(|column| self.is_solid(IVec2::new(column, row)))
    }
}

/// Steps bodies inside one level.
#[derive(Debug, Clone)]
pub struct ArcadePhysics {
    pub gravity: f32,
    pub bounds: Rect,
    pub tiles: CollisionMap,
}

impl ArcadePhysics {
    pub fn new(gravity: f32, bounds: Rect, tiles: CollisionMap) -> Self {
        Self { gravity, bounds, tiles }
    }

    /// Advances one body by `dt` seconds.
    pub fn step(&self, body: &mut Body, dt: f32) {
        if !body.enabled || body.immovable {
            return;
        }

        body.blocked = Blocked::empty();

        if body.allow_gravity {
            body.velocity.y += self.gravity * dt;
        }

        let mut position = body.position;
        position.x += body.velocity.x * dt;
        if body.collide_tiles {
            self.resolve_horizontal(body, &mut position);
        }

        position.y += body.velocity.y * dt;
        if body.collide_tiles {
            self.resolve_vertical(body, &mut position);
        }

        body.position = position;

        if body.collide_world_bounds {
            self.clamp_to_bounds(body);
        }
    }

    fn resolve_horizontal(&self, body: &mut Body, position: &mut Vec2) {
        let map = &self.tiles;
        let old = body.position;
        let size = body.size;
        let rows = (map.row(old.y + SKIN), map.row(old.y + size.y - SKIN));

        if body.velocity.x > 0.0 {
            let from = map.column(old.x + size.x - SKIN);
            let to = map.column(position.x + size.x - SKIN);
            for column in (from + 1)..=to {
                if map.any_solid_in_column(column, rows) {
                    position.x = column as f32 * map.tile_size.x - size.x;
                    body.velocity.x = 0.0;
                    body.blocked |= Blocked::RIGHT;
                    return;
                }
            }
        } else if body.velocity.x < 0.0 {
            let from = map.column(old.x + SKIN);
            let to = map.column(position.x + SKIN);
            for column in (to..from).rev() {
                if map.any_solid_in_column(column, rows) {
                    position.x = (column + 1) as f32 * map.tile_size.x;
                    body.velocity.x = 0.0;
                    body.blocked |= Blocked::LEFT;
                    return;
                }
            }
        }
    }

    fn resolve_vertical(&self, body: &mut Body, position: &mut Vec2) {
        let map = &self.tiles;
        let old_y = body.position.y;
        let size = body.size;
        let columns = (map.column(position.x + SKIN), map.column(position.x + size.x - SKIN));

        if body.velocity.y > 0.0 {
            let from = map.row(old_y + size.y - SKIN);
            let to = map.row(position.y + size.y - SKIN);
            for row in (from + 1)..=to {
                if map.any_solid_in_row(row, columns) {
                    position.y = row as f32 * map.tile_size.y - size.y;
                    body.velocity.y = 0.0;
                    body.blocked |= Blocked::DOWN;
                    return;
                }
            }
        } else if body.velocity.y < 0.0 {
            let from = map.row(old_y + SKIN);
            let to = map.row(position.y + SKIN);
            for row in (to..from).rev() {
                if map.any_solid_in_row(row, columns) {
                    position.y = (row + 1) as f32 * map.tile_size.y;
                    body.velocity.y = 0.0;
                    body.blocked |= Blocked::UP;
                    return;
                }
            }
        }
    }

    fn clamp_to_bounds(&self, body: &mut Body) {
        let min = self.bounds.min;
        let max = self.bounds.max();

        if body.position.x < min.x {
            body.position.x = min.x;
            body.velocity.x = body.velocity.x.max(0.0);
            body.blocked |= Blocked::LEFT;
        } else if body.position.x + body.size.x > max.x {
            body.position.x = max.x - body.size.x;
            body.velocity.x = body.velocity.x.min(0.0);
            body.blocked |= Blocked::RIGHT;
        }

        if body.position.y < min.y {
            body.position.y = min.y;
            body.velocity.y = body.velocity.y.max(0.0);
            body.blocked |= Blocked::UP;
        } else if body.position.y + body.size.y >= max.y {
            body.position.y = max.y - body.size.y;
            body.velocity.y = body.velocity.y.min(0.0);
            body.blocked |= Blocked::DOWN;
        }
    }

    /// True when a body has fallen clear of the world.
    pub fn is_below_world(&self, body: &Body, margin: f32) -> bool {
        body.position.y > self.bounds.max().y + margin
    }
}
