use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::clock::{Clock, ManualClock, SystemClock};
use crate::config::GameOptions;
use crate::constants::LOOP_TIME;
use crate::formatter;
use crate::input::InputScript;
use crate::level::LevelCatalog;
use crate::presentation::TracingPresenter;
use crate::scene::{Director, SceneKey};

/// Ten minutes at 60 frames per second.
pub const DEFAULT_FRAME_LIMIT: u64 = 60 * 60 * 10;

/// How the loop keeps time.
enum Pacing {
    /// Frames run back to back; the game clock advances by one frame each iteration.
    Simulated(Rc<ManualClock>),
    /// Frames are paced to the wall clock.
    Realtime,
}

/// Headless fixed-timestep loop feeding a replay script into the game.
pub struct App {
    director: Director,
    script: InputScript,
    pacing: Pacing,
    frame_limit: u64,
    frame: u64,
}

impl App {
    pub fn new(options: GameOptions, levels: LevelCatalog, script: InputScript, realtime: bool) -> Result<Self> {
        let (clock, pacing): (Rc<dyn Clock>, Pacing) = if realtime {
            let clock: Rc<dyn Clock> = Rc::new(SystemClock::new());
            (clock, Pacing::Realtime)
        } else {
            let clock = Rc::new(ManualClock::new());
            let shared: Rc<dyn Clock> = clock.clone();
            (shared, Pacing::Simulated(clock))
        };

        let mut director = Director::new(Rc::new(options), clock, Rc::new(levels), Box::new(TracingPresenter::new()));
        director.boot()?;

        Ok(Self {
            director,
            script,
            pacing,
            frame_limit: DEFAULT_FRAME_LIMIT,
            frame: 0,
        })
    }

    pub fn with_frame_limit(mut self, frame_limit: u64) -> Self {
        self.frame_limit = frame_limit;
        self
    }

    pub fn director(&self) -> &Director {
        &self.director
    }

    /// Runs until the script is over and the game is back on a menu, or the frame limit is hit.
    ///
    /// Returns the number of frames run.
    pub fn run(&mut self) -> Result<u64> {
        info!(loop_time = ?LOOP_TIME, script = self.script.len(), "Starting game loop");

        while self.frame < self.frame_limit {
            if self.is_idle() {
                info!(frame = self.frame, scenes = ?self.director.active_scenes(), "Script finished");
                return Ok(self.frame);
            }
            self.tick()?;
        }

        warn!(frames = self.frame_limit, "Frame limit reached");
        Ok(self.frame)
    }

    /// Runs a single frame.
    pub fn tick(&mut self) -> Result<()> {
        let start = Instant::now();
        formatter::advance_frame();

        for event in self.script.events_at(self.frame) {
            debug!(frame = self.frame, ?event, "Scripted input");
            self.director.input(event)?;
        }

        if let Pacing::Simulated(clock) = &self.pacing {
            clock.advance(LOOP_TIME);
        }
        self.director.update(LOOP_TIME)?;
        self.frame += 1;

        if let Pacing::Realtime = self.pacing {
            let elapsed = start.elapsed();
            if elapsed < LOOP_TIME {
                spin_sleep::sleep(LOOP_TIME - elapsed);
            } else if elapsed > LOOP_TIME + Duration::from_millis(1) {
                warn!(behind = ?(elapsed - LOOP_TIME), "Game loop behind schedule");
            }
        }
        Ok(())
    }

    fn is_idle(&self) -> bool {
        self.script.is_exhausted(self.frame)
            && [SceneKey::Home, SceneKey::Win, SceneKey::Credits]
                .iter()
                .any(|key| self.director.is_active(*key))
    }
}
