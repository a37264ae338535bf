//! Interactive viewer.
//!
//! ```bash
//! cargo run --release -- --level levels/demo.toml
//! cargo run --release -- --maze 7 --flat
//! ```

use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use anyhow::Context;
use clap::Parser;
use minifb::{Key, KeyRepeat, MouseMode, Window, WindowOptions};
use rand::{SeedableRng, rngs::StdRng};
use tracing_subscriber::EnvFilter;

use raycast_rs::{
    config::Config,
    engine::Engine,
    renderer::Software,
    sim::{Buttons, InputCmd},
    world::{Level, TextureBank, maze},
};

const MAZE_SIZE: usize = 21;
const TARGET_FPS: usize = 60;
const REPORT_EVERY: Duration = Duration::from_secs(3);

#[derive(Parser, Debug)]
#[command(version, about = "Ray-casting tile-grid viewer")]
struct Args {
    /// TOML level to load.
    #[arg(long, conflicts_with = "maze")]
    level: Option<PathBuf>,

    /// Generate a maze from this seed instead of loading a level.
    #[arg(long)]
    maze: Option<u64>,

    /// TOML file with `[render]` / `[movement]` overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    width: Option<usize>,

    #[arg(long)]
    height: Option<usize>,

    /// Two-tone walls instead of textures.
    #[arg(long)]
    flat: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("raycast_rs=info")),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => Config::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(w) = args.width {
        config.render.width = w;
    }
    if let Some(h) = args.height {
        config.render.height = h;
    }
    if args.flat {
        config.render.textured_walls = false;
    }
    config.validate()?;

    let cell = config.render.cell_size;
    let level = match (&args.level, args.maze) {
        (Some(path), _) => Level::from_file(path, cell)
            .with_context(|| format!("loading level {}", path.display()))?,
        (None, seed) => {
            let seed = seed.unwrap_or_else(rand::random);
            tracing::info!(seed, "generating maze");
            maze::generate(MAZE_SIZE, cell, &mut StdRng::seed_from_u64(seed))?
        }
    };

    let (w, h) = (config.render.width, config.render.height);
    let mut engine = Engine::new(Software::default(), level, TextureBank::builtin(), config)?;

    let mut win = Window::new(
        "raycast_rs",
        w,
        h,
        WindowOptions {
            scale: minifb::Scale::X2,
            ..WindowOptions::default()
        },
    )?;
    win.set_target_fps(TARGET_FPS);

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();
    let mut last_mouse: Option<f32> = None;

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let dt = t0.duration_since(last_frame).as_secs_f32();
        last_frame = t0;

        let cmd = read_input(&win, &mut last_mouse);

        let mut present = Ok(());
        let report = engine.frame(&cmd, dt, |fb, fw, fh| {
            acc_time += t0.elapsed();
            acc_frames += 1;
            present = win.update_with_buffer(fb, fw, fh);
        });
        present?;

        if let Some(strike) = report.strike {
            tracing::debug!(?strike, "swing landed");
        }

        if last_print.elapsed() >= REPORT_EVERY && acc_frames > 0 {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames as f64;
            tracing::info!(
                "avg frame: {:.2} ms ({:.1} FPS), {} barrels left",
                avg_ms,
                1000.0 / avg_ms,
                engine.sim.live_count()
            );
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}

/// Sample keyboard and pointer into one command for this frame.
fn read_input(win: &Window, last_mouse: &mut Option<f32>) -> InputCmd {
    let mut cmd = InputCmd::default();

    /* movement --------------------------------------------------------- */
    if win.is_key_down(Key::Up) || win.is_key_down(Key::W) {
        cmd.forward += 1.0;
    }
    if win.is_key_down(Key::Down) || win.is_key_down(Key::S) {
        cmd.forward -= 1.0;
    }

    let alt = win.is_key_down(Key::LeftAlt) || win.is_key_down(Key::RightAlt);
    if alt {
        /* Alt + ←/→  = strafe */
        if win.is_key_down(Key::Left) {
            cmd.strafe -= 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.strafe += 1.0;
        }
    } else {
        /* plain ←/→   = turn   */
        if win.is_key_down(Key::Left) {
            cmd.turn += 1.0;
        }
        if win.is_key_down(Key::Right) {
            cmd.turn -= 1.0;
        }
    }

    /* WASD strafing mirrors arrow-key strafing */
    if win.is_key_down(Key::A) {
        cmd.strafe -= 1.0;
    }
    if win.is_key_down(Key::D) {
        cmd.strafe += 1.0;
    }

    /* pointer: moving right turns right ------------------------------- */
    let mouse_x = win.get_mouse_pos(MouseMode::Pass).map(|(x, _)| x);
    if let (Some(x), Some(prev)) = (mouse_x, *last_mouse) {
        cmd.look_dx = prev - x;
    }
    *last_mouse = mouse_x;

    /* actions ---------------------------------------------------------- */
    if win.is_key_pressed(Key::Space, KeyRepeat::No)
        || win.is_key_down(Key::LeftCtrl)
        || win.is_key_down(Key::RightCtrl)
    {
        cmd.buttons |= Buttons::FIRE;
    }
    if win.is_key_pressed(Key::M, KeyRepeat::No) || win.is_key_pressed(Key::Tab, KeyRepeat::No) {
        cmd.buttons |= Buttons::TOGGLE_MAP;
    }
    cmd
}
