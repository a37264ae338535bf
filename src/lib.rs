//! Wolfenstein-style ray casting over a square tile grid.
//!
//! Every frame builds a flat list of draw items (one wall slice per screen
//! column plus one billboard per visible entity), sorts it farthest first
//! and paints it with a [`renderer::Renderer`].

pub mod config;
pub mod engine;
pub mod renderer;
pub mod sim;
pub mod world;
