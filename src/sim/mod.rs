mod components;
mod movement;
mod systems;
mod tic;
mod weapon;

pub use components::{Billboard, Buttons, Health, InputCmd, Invincible, Knockback, Position};
pub use movement::{MoveOutcome, move_camera, wish_delta};
pub use systems::{INVINCIBLE_SECS, Strike, strike_target};
pub use tic::{BARREL_HP, Sim};
pub use weapon::{FRAME_INTERVAL, Weapon, WeaponEvent, WeaponState};
