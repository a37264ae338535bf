use glam::Vec2;
use hecs::{Entity, World};

use super::{Billboard, Health, Knockback, Position, Strike, systems};
use crate::{
    engine::billboard::SpriteSnapshot,
    renderer::DrawItem,
    world::{BarrelSpawn, Level, TextureId, TileGrid},
};

/// Hit points of a fresh barrel; one damage frame per point lost.
pub const BARREL_HP: u8 = 3;

/// Owns the ECS world and drives all game-logic systems.
#[derive(Default)]
pub struct Sim {
    world: World,
}

impl Sim {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh world holding every barrel the level places.
    pub fn from_level(level: &Level) -> Self {
        let mut sim = Self::new();
        for spawn in &level.barrels {
            sim.spawn_barrel(spawn);
        }
        tracing::debug!(barrels = sim.world.len(), "entities spawned");
        sim
    }

    #[inline]
    pub fn world(&self) -> &World {
        &self.world
    }

    #[inline]
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Spawn a destructible barrel. A spawn that starts on a later damage
    /// frame starts with correspondingly fewer hit points.
    pub fn spawn_barrel(&mut self, spawn: &BarrelSpawn) -> Entity {
        let lost = spawn.texture.min((BARREL_HP - 1) as TextureId) as u8;
        let health = Health {
            hp: BARREL_HP - lost,
            max: BARREL_HP,
        };
        self.world.spawn((
            Position(spawn.pos()),
            Billboard {
                texture: health.frame(),
            },
            health,
        ))
    }

    /// Snapshot every billboard for the scene builder.
    ///
    /// Billboards without a position are skipped and logged.
    pub fn sprites(&self, out: &mut Vec<SpriteSnapshot>) {
        out.clear();
        for (entity, (billboard, pos)) in self.world.query::<(&Billboard, Option<&Position>)>().iter() {
            match pos {
                Some(p) => out.push(SpriteSnapshot {
                    entity,
                    pos: p.0,
                    texture: billboard.texture,
                }),
                None => tracing::warn!(?entity, "billboard without position skipped"),
            }
        }
    }

    /// Positions of everything the player can bump into.
    pub fn obstacles(&self, out: &mut Vec<Vec2>) {
        out.clear();
        out.extend(
            self.world
                .query::<(&Position, &Health)>()
                .iter()
                .map(|(_, (p, _))| p.0)
                .filter(|p| p.is_finite()),
        );
    }

    pub fn live_count(&self) -> usize {
        self.world.query::<&Health>().iter().count()
    }

    /// Melee strike against the sprites painted this frame.
    pub fn strike(
        &mut self,
        items: &[DrawItem],
        column: i32,
        reach: f32,
        from: Vec2,
        cell_size: f32,
    ) -> Strike {
        systems::strike(&mut self.world, items, column, reach, from, cell_size)
    }

    /// Advance timers and pushes by `dt` seconds.
    pub fn tick(&mut self, dt: f32, grid: &TileGrid, cell_size: f32) {
        systems::invincibility(&mut self.world, dt);
        systems::knockback(&mut self.world, grid, cell_size, dt);
        systems::reap(&mut self.world);
    }

    /// True while anything is still being pushed.
    pub fn settling(&self) -> bool {
        self.world.query::<&Knockback>().iter().next().is_some()
    }
}
