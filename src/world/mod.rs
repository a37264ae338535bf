pub mod angle;
mod camera;
mod grid;
mod level;
pub mod maze;
mod texture;

pub use camera::CameraPose;
pub use grid::{EMPTY, GridError, Probe, TileGrid};
pub use level::{BarrelSpawn, Level, LevelError};
pub use texture::{Texture, TextureBank, TextureError, TextureId};
