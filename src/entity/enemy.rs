//! Level hazards. Touching any enemy kills the player.

use strum_macros::{Display, EnumString};

use crate::config::GameOptions;
use crate::entity::{Frame, GameEntity};
use crate::level::EnemySpawn;
use crate::physics::{Body, Rect};
use crate::presentation::Cue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum EnemyKind {
    /// Static, with a hitbox covering only the lower half of its tile.
    Spike,
    /// Hovers up and down around its spawn point.
    Bat,
    Moving,
}

#[derive(Debug)]
pub struct Enemy {
    kind: EnemyKind,
    body: Body,
    origin_y: f32,
    travel_up: f32,
    travel_down: f32,
    speed: f32,
    cues: Vec<Cue>,
}

impl Enemy {
    pub fn new(spawn: &EnemySpawn, options: &GameOptions) -> Self {
        let rect = spawn.rect;
        let (w, h) = (rect.size.x, rect.size.y);

        let mut cues = Vec::new();
        let (hitbox, travel, speed) = match spawn.kind {
            EnemyKind::Spike => (Rect::new(rect.min.x, rect.min.y + h * 0.5, w, h * 0.5), 0.0, 0.0),
            EnemyKind::Bat => {
                cues.push(Cue::Animate("bat-idle"));
                let hitbox = Rect::new(rect.min.x + w * 0.0625, rect.min.y + h * 0.25, w * 0.875, h * 0.56);
                (hitbox, options.bat_up_down, options.bat_speed)
            }
            EnemyKind::Moving => (rect, 0.0, 0.0),
        };

        let mut body = Body::floating(hitbox);
        // Every enemy starts moving down.
        body.velocity.y = speed;

        Self {
            kind: spawn.kind,
            body,
            origin_y: hitbox.min.y,
            travel_up: travel,
            travel_down: travel,
            speed,
            cues,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }
}

impl GameEntity for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn update(&mut self, _frame: &Frame) {
        let y = self.body.position.y;
        if y >= self.origin_y + self.travel_down {
            self.body.velocity.y = -self.speed;
        } else if y <= self.origin_y - self.travel_up {
            self.body.velocity.y = self.speed;
        }
    }

    fn take_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }
}
