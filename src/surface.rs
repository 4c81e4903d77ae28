use glam::IVec2;

use crate::error::Result;
use crate::monitor::Monitor;

/// What the tick loop asks the window to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderCommand {
    /// Top-left of the sprite on screen.
    pub position: IVec2,
    /// Whether a monitor was found under the creature this tick.
    pub resolved: bool,
}

/// Everything the creature needs from the window that shows it.
pub trait PresentationSurface {
    /// Current display layout. Called every tick; implementations must not
    /// cache.
    fn query_monitors(&self) -> Vec<Monitor>;

    fn set_window_position(&mut self, position: IVec2);

    /// Draws one frame. Blocks until the swap completes.
    fn present(&mut self, command: &RenderCommand) -> Result<()>;
}
