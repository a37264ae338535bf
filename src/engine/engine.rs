use glam::Vec2;

use crate::{
    config::{Config, ConfigError},
    engine::{
        billboard::SpriteSnapshot,
        scene::build_scene,
        types::{Screen, View},
    },
    renderer::{
        DrawItem, Renderer, RendererExt, Rgba,
        overlay::{draw_minimap, draw_weapon},
    },
    sim::{InputCmd, MoveOutcome, Sim, Strike, Weapon, WeaponEvent, move_camera},
    world::{CameraPose, Level, TextureBank},
};

/// What happened during one call to [`Engine::frame`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Items painted, walls and sprites together.
    pub items: usize,
    pub moved: MoveOutcome,
    /// Set on the frame a swing connects.
    pub strike: Option<Strike>,
}

/// Owns everything a frame needs and runs it start to finish.
pub struct Engine<R: Renderer> {
    pub renderer: R,
    pub level: Level,
    pub camera: CameraPose,
    pub sim: Sim,
    pub texture_bank: TextureBank,
    pub config: Config,
    pub screen: Screen,
    pub view: View,
    pub weapon: Weapon,
    pub show_map: bool,
    items: Vec<DrawItem>,
    sprites: Vec<SpriteSnapshot>,
    obstacles: Vec<Vec2>,
}

impl<R: Renderer> Engine<R> {
    pub fn new(
        renderer: R,
        level: Level,
        texture_bank: TextureBank,
        config: Config,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let r = &config.render;
        let screen = Screen::new(r.width, r.height);
        let view = View::from_config(r);
        let camera = CameraPose::new(level.start, level.heading);
        let sim = Sim::from_level(&level);
        let weapon = Weapon::new(texture_bank.weapon_frames());

        tracing::info!(
            level = %level.name,
            grid = level.grid.size(),
            width = screen.w,
            height = screen.h,
            "engine ready"
        );

        Ok(Self {
            renderer,
            level,
            camera,
            sim,
            texture_bank,
            config,
            screen,
            view,
            weapon,
            show_map: false,
            items: Vec::with_capacity(screen.w * 2),
            sprites: Vec::new(),
            obstacles: Vec::new(),
        })
    }

    /// Draw items of the last frame, in the order they were painted.
    #[inline]
    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Run one frame: build the depth buffer, composite it, draw the HUD,
    /// apply `cmd`, then hand the finished buffer to `submit`.
    ///
    /// Kinematics runs after compositing, so the pixels submitted show the
    /// pose the frame started with.
    pub fn frame<F>(&mut self, cmd: &InputCmd, dt: f32, submit: F) -> FrameReport
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let cfg = &self.config.render;

        self.sim.sprites(&mut self.sprites);
        build_scene(
            &self.level.grid,
            &self.camera,
            &self.sprites,
            cfg,
            &mut self.items,
        );

        self.renderer.begin_frame(self.screen.w, self.screen.h);
        self.renderer
            .composite(&mut self.items, &self.texture_bank, cfg);

        draw_weapon(
            &mut self.renderer,
            &self.texture_bank,
            self.weapon.frame(),
            self.screen.w,
            self.screen.h,
        );
        if self.show_map {
            draw_minimap(&mut self.renderer, &self.level.grid, &self.camera, cfg.cell_size);
        }

        let mut report = FrameReport {
            items: self.items.len(),
            ..FrameReport::default()
        };
        self.update(cmd, dt, &mut report);

        self.renderer.end_frame(submit);
        report
    }

    /* ---------------------------------------------------------------- */
    /* internal: input, weapon, player and entity motion                 */
    /* ---------------------------------------------------------------- */
    fn update(&mut self, cmd: &InputCmd, dt: f32, report: &mut FrameReport) {
        let cell = self.config.render.cell_size;

        if cmd.toggle_map() {
            self.show_map = !self.show_map;
        }
        if cmd.fire() && self.weapon.trigger() {
            tracing::trace!("swing");
        }
        if self.weapon.advance(dt) == Some(WeaponEvent::Impact) {
            report.strike = Some(self.sim.strike(
                &self.items,
                self.view.central_column as i32,
                self.config.movement.reach,
                self.camera.pos,
                cell,
            ));
        }

        self.sim.obstacles(&mut self.obstacles);
        report.moved = move_camera(
            &mut self.camera,
            cmd,
            &self.level.grid,
            &self.obstacles,
            &self.config.movement,
            cell,
        );

        self.sim.tick(dt, &self.level.grid, cell);
    }
}
