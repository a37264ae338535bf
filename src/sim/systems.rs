use glam::Vec2;
use hecs::{Entity, World};
use smallvec::SmallVec;

use super::{Billboard, Health, Invincible, Knockback, Position};
use crate::{renderer::DrawItem, world::TileGrid};

/// Seconds a barrel ignores further strikes after being hit.
pub const INVINCIBLE_SECS: f32 = 0.3;
/// Initial push speed of a struck barrel, in cells per second.
pub const KNOCKBACK_CELLS_PER_SEC: f32 = 1.5;
/// Fraction of knockback speed left after one second.
const KNOCKBACK_DAMPING: f32 = 0.02;
/// Below this speed (world units / s) a push is dropped.
const STOP_SPEED: f32 = 1.0;

/// Result of one melee strike.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Strike {
    /// Nothing drawn in the central column within reach.
    Missed,
    /// Target found but still invincible.
    Shrugged(Entity),
    Hit { entity: Entity, hp: u8 },
    Destroyed(Entity),
}

/// Nearest sprite whose quad covers `column`, lies within `reach` and is
/// not behind that column's wall.
pub fn strike_target(items: &[DrawItem], column: i32, reach: f32) -> Option<(Entity, f32)> {
    let wall = items
        .iter()
        .filter(|i| i.is_wall() && i.column() == column)
        .map(DrawItem::depth)
        .fold(f32::INFINITY, f32::min);
    let reach = reach.min(wall);
    items
        .iter()
        .filter_map(|item| match *item {
            DrawItem::Sprite {
                column: c,
                depth,
                height,
                entity,
                ..
            } => {
                let half = (height * 0.5).max(0.5);
                let covers = (column as f32 - c as f32).abs() <= half;
                (covers && depth <= reach).then_some((entity, depth))
            }
            _ => None,
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}

/* ── Strike ───────────────────────────────────────────────────────── */
pub fn strike(
    world: &mut World,
    items: &[DrawItem],
    column: i32,
    reach: f32,
    from: Vec2,
    cell_size: f32,
) -> Strike {
    let Some((entity, _)) = strike_target(items, column, reach) else {
        return Strike::Missed;
    };
    if world.get::<&Invincible>(entity).is_ok() {
        return Strike::Shrugged(entity);
    }

    let (hp, push) =
        match world.query_one_mut::<(&mut Health, &mut Billboard, Option<&Position>)>(entity) {
            Ok((health, billboard, pos)) => {
                health.hp = health.hp.saturating_sub(1);
                billboard.texture = health.frame();
                let push = pos.map_or(Vec2::ZERO, |p| (p.0 - from).normalize_or_zero());
                (health.hp, push)
            }
            Err(_) => {
                tracing::debug!(?entity, "strike target has no health");
                return Strike::Missed;
            }
        };

    if hp == 0 {
        reap(world);
        tracing::debug!(?entity, "barrel destroyed");
        return Strike::Destroyed(entity);
    }
    // only fails for a despawned entity
    let _ = world.insert(
        entity,
        (
            Invincible {
                secs: INVINCIBLE_SECS,
            },
            Knockback(push * KNOCKBACK_CELLS_PER_SEC * cell_size),
        ),
    );
    tracing::debug!(?entity, hp, "barrel hit");
    Strike::Hit { entity, hp }
}

/* ── Invincibility countdown ──────────────────────────────────────── */
pub fn invincibility(world: &mut World, dt: f32) {
    let mut expired: SmallVec<[Entity; 8]> = SmallVec::new();
    for (e, inv) in world.query_mut::<&mut Invincible>() {
        inv.secs -= dt;
        if inv.secs <= 0.0 {
            expired.push(e);
        }
    }
    for e in expired {
        let _ = world.remove_one::<Invincible>(e);
    }
}

/* ── Knockback ────────────────────────────────────────────────────── */
pub fn knockback(world: &mut World, grid: &TileGrid, cell_size: f32, dt: f32) {
    let mut settled: SmallVec<[Entity; 8]> = SmallVec::new();
    for (e, (pos, kb)) in world.query_mut::<(&mut Position, &mut Knockback)>() {
        let step = kb.0 * dt;
        // slide per axis like the player
        let x = Vec2::new(pos.0.x + step.x, pos.0.y);
        if !grid.blocks(x, cell_size) {
            pos.0 = x;
        }
        let y = Vec2::new(pos.0.x, pos.0.y + step.y);
        if !grid.blocks(y, cell_size) {
            pos.0 = y;
        }
        kb.0 *= KNOCKBACK_DAMPING.powf(dt);
        if kb.0.length() < STOP_SPEED {
            settled.push(e);
        }
    }
    for e in settled {
        let _ = world.remove_one::<Knockback>(e);
    }
}

/* ── Reaper ───────────────────────────────────────────────────────── */
/// Despawn everything whose health reached zero.
pub fn reap(world: &mut World) -> usize {
    let dead: SmallVec<[Entity; 4]> = world
        .query_mut::<&Health>()
        .into_iter()
        .filter(|(_, h)| h.hp == 0)
        .map(|(e, _)| e)
        .collect();
    for &e in &dead {
        let _ = world.despawn(e);
    }
    dead.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CELL: f32 = 64.0;

    fn barrel(world: &mut World, pos: Vec2) -> Entity {
        world.spawn((
            Position(pos),
            Billboard { texture: 0 },
            Health::full(3),
        ))
    }

    fn sprite_item(entity: Entity, column: i32, depth: f32) -> DrawItem {
        DrawItem::Sprite {
            column,
            depth,
            texture: 0,
            height: 40.0,
            entity,
        }
    }

    #[test]
    fn target_prefers_nearest_in_column() {
        let mut w = World::new();
        let far = barrel(&mut w, Vec2::ZERO);
        let near = barrel(&mut w, Vec2::ZERO);
        let off = barrel(&mut w, Vec2::ZERO);
        let items = [
            sprite_item(far, 150, 80.0),
            sprite_item(near, 160, 60.0),
            sprite_item(off, 10, 20.0),
        ];
        assert_eq!(strike_target(&items, 149, 100.0).map(|t| t.0), Some(near));
        assert_eq!(strike_target(&items, 149, 50.0), None);

        // a wall in front of the column hides everything behind it
        let mut walled = items.to_vec();
        walled.push(DrawItem::FlatWall {
            column: 149,
            depth: 55.0,
            height: 10.0,
            colour: 0,
        });
        assert_eq!(strike_target(&walled, 149, 100.0), None);
    }

    #[test]
    fn three_hits_destroy_with_invincibility_between() {
        let mut w = World::new();
        let e = barrel(&mut w, Vec2::new(100.0, 160.0));
        let items = [sprite_item(e, 149, 60.0)];
        let from = Vec2::new(100.0, 100.0);
        let grid = TileGrid::new(8, vec![0; 64]).unwrap();

        assert_eq!(strike(&mut w, &items, 149, 90.0, from, CELL), Strike::Hit { entity: e, hp: 2 });
        assert_eq!(w.get::<&Billboard>(e).unwrap().texture, 1);
        assert_eq!(strike(&mut w, &items, 149, 90.0, from, CELL), Strike::Shrugged(e));

        invincibility(&mut w, INVINCIBLE_SECS + 0.01);
        assert!(w.get::<&Invincible>(e).is_err());
        assert_eq!(strike(&mut w, &items, 149, 90.0, from, CELL), Strike::Hit { entity: e, hp: 1 });

        invincibility(&mut w, 1.0);
        knockback(&mut w, &grid, CELL, 0.1);
        assert_eq!(strike(&mut w, &items, 149, 90.0, from, CELL), Strike::Destroyed(e));
        assert!(!w.contains(e));
    }

    #[test]
    fn knockback_pushes_away_and_settles() {
        let mut w = World::new();
        let from = Vec2::new(2.5 * CELL, 1.5 * CELL);
        let e = barrel(&mut w, Vec2::new(2.5 * CELL, 2.5 * CELL));
        let items = [sprite_item(e, 149, CELL)];
        strike(&mut w, &items, 149, 2.0 * CELL, from, CELL);

        let grid = TileGrid::bordered(4, 1).unwrap();
        for _ in 0..60 {
            knockback(&mut w, &grid, CELL, 1.0 / 30.0);
        }
        let pos = w.get::<&Position>(e).unwrap().0;
        assert!(pos.y > 2.5 * CELL);
        assert!(pos.y < 3.0 * CELL, "barrel left the room: {pos:?}");
        assert!(w.get::<&Knockback>(e).is_err());
    }

    #[test]
    fn reap_only_takes_the_dead() {
        let mut w = World::new();
        let a = barrel(&mut w, Vec2::ZERO);
        let b = w.spawn((Position(Vec2::ONE), Health { hp: 0, max: 3 }));
        assert_eq!(reap(&mut w), 1);
        assert!(w.contains(a));
        assert!(!w.contains(b));
    }
}
