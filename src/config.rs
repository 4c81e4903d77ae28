use std::path::PathBuf;

use clap::Parser;
use glam::IVec2;

use crate::creature::DEFAULT_START;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "dorimeji",
    version,
    about = "A small creature that falls onto your screen edges and wanders around"
)]
pub struct Config {
    /// Sprite image shown by the creature (png or jpeg).
    #[arg(
        long,
        env = "DORIMEJI_SPRITE",
        default_value = "assets/test_shime/shime1.png"
    )]
    pub sprite: PathBuf,

    /// Window title.
    #[arg(long, default_value = "Dorimeji")]
    pub title: String,

    /// Initial x of the sprite's top-left corner, in screen pixels.
    #[arg(long, default_value_t = DEFAULT_START.x, allow_negative_numbers = true)]
    pub start_x: i32,

    /// Initial y of the sprite's top-left corner, in screen pixels.
    #[arg(long, default_value_t = DEFAULT_START.y, allow_negative_numbers = true)]
    pub start_y: i32,
}

impl Config {
    pub fn start(&self) -> IVec2 {
        IVec2::new(self.start_x, self.start_y)
    }
}
