//! Rendering backend that simulates frames without opening a window.

use anyhow::Result as AnyResult;
use fish_hunt_core::FRAME;
use fish_hunt_rendering::{FrameInput, Presentation, RenderingBackend, Scene};
use std::time::Duration;
use tracing::debug;

/// Backend that drives a fixed number of frames with empty input.
#[derive(Clone, Copy, Debug)]
pub(crate) struct HeadlessBackend {
    frames: u32,
}

impl HeadlessBackend {
    pub(crate) fn new(frames: u32) -> Self {
        Self { frames }
    }
}

impl RenderingBackend for HeadlessBackend {
    fn run<F>(self, presentation: Presentation, mut update_scene: F) -> AnyResult<()>
    where
        F: FnMut(Duration, FrameInput, &mut Scene),
    {
        let mut scene = presentation.scene;
        debug!(title = %presentation.window_title, frames = self.frames, "headless run");
        for _ in 0..self.frames {
            update_scene(FRAME, FrameInput::default(), &mut scene);
        }
        debug!(
            fish = scene.fish.len(),
            projectiles = scene.projectiles.len(),
            effects = scene.effects.len(),
            "final scene"
        );
        Ok(())
    }
}
