pub mod billboard;
#[allow(clippy::module_inception)]
mod engine;
pub mod raycast;
pub mod scene;
pub mod types;

pub use billboard::SpriteSnapshot;
pub use engine::{Engine, FrameReport};
pub use raycast::{Axis, RayCast, RayIntersection};
pub use scene::build_scene;
pub use types::{Screen, View};
