use glam::Vec2;

/// The fixed platform in the UI that power-ups drop from.
///
/// Its position is in screen coordinates; the level scene converts it to the world when a
/// power-up is requested.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spawner {
    position: Vec2,
}

impl Spawner {
    pub const ANIMATION: &'static str = "you-idle";

    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    pub fn position(&self) -> Vec2 {
        self.position
    }
}
