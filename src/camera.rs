//! Horizontal follow camera and the end-of-level fade.

use std::time::Duration;

use glam::Vec2;

use crate::physics::Rect;

/// A side-scrolling camera.
///
/// The view keeps the followed target `left_offset` pixels from its left edge and never shows
/// anything outside `bounds`.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub bounds: Rect,
    pub view_size: Vec2,
    pub left_offset: f32,
    pub scroll: Vec2,
}

impl Camera {
    pub fn new(bounds: Rect, view_size: Vec2, left_offset: f32) -> Self {
        Self {
            bounds,
            view_size,
            left_offset,
            scroll: bounds.min,
        }
    }

    fn max_scroll_x(&self) -> f32 {
        (self.bounds.max().x - self.view_size.x).max(self.bounds.min.x)
    }

    /// Scrolls so that `target_x` sits at the left offset, clamped to the bounds.
    pub fn follow(&mut self, target_x: f32) {
        self.scroll.x = (target_x - self.left_offset).clamp(self.bounds.min.x, self.max_scroll_x());
    }

    /// The part of the world currently on screen.
    pub fn world_view(&self) -> Rect {
        Rect {
            min: self.scroll,
            size: self.view_size,
        }
    }

    /// True once the view has reached the right edge of the world.
    pub fn at_right_edge(&self) -> bool {
        self.scroll.x >= self.max_scroll_x()
    }

    pub fn screen_to_world(&self, screen: Vec2) -> Vec2 {
        screen + self.scroll
    }
}

/// A one-shot fade to black.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fade {
    duration: Duration,
    elapsed: Duration,
    running: bool,
    completed: bool,
}

impl Fade {
    /// Starts the fade. Calling this on a fade that already started has no effect.
    pub fn start(&mut self, duration: Duration) {
        if self.running || self.completed {
            return;
        }
        self.duration = duration;
        self.elapsed = Duration::ZERO;
        self.running = true;
    }

    /// Advances the fade; returns true on exactly the tick it completes.
    pub fn tick(&mut self, delta: Duration) -> bool {
        if !self.running {
            return false;
        }

        self.elapsed += delta;
        if self.elapsed >= self.duration {
            self.running = false;
            self.completed = true;
            return true;
        }
        false
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    /// Opacity of the black overlay, 0.0 (clear) to 1.0 (black).
    pub fn alpha(&self) -> f32 {
        if self.completed {
            return 1.0;
        }
        if !self.running || self.duration.is_zero() {
            return 0.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}
