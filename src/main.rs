use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{info, warn};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use teacup::config::{self, Config};
use teacup::input::{window_to_unit, Injection, PointerTracker};
use teacup::renderer::{self, ColorMap, VizMode};
use teacup::solver::diagnostics;
use teacup::Solver;

struct Defaults;

impl Defaults {
    const HEADLESS_STEPS: usize = 200;
    const LOG_EVERY: usize = 10;
    /// Density poured in while the left button is held.
    const POUR_DENSITY: f64 = 1.0;
    /// Frame times above this are treated as a stall and capped.
    const MAX_FRAME_DT: f64 = 0.1;
}

fn is_headless() -> bool {
    std::env::args().any(|a| a == "--headless")
}

/// Parse `--headless <steps>` from CLI args.
fn parse_headless_steps() -> usize {
    let args: Vec<String> = std::env::args().collect();
    args.windows(2)
        .find(|w| w[0] == "--headless")
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(Defaults::HEADLESS_STEPS)
}

fn create_solver(cfg: &Config) -> Solver {
    let mut solver = Solver::with_params(cfg.sim.n, cfg.sim.solver_params());
    solver.seed_gradient(&ColorMap::initial_density());
    solver
}

fn apply_injection(solver: &mut Solver, inj: Injection) {
    if let Err(e) = solver.inject(inj.x, inj.y, inj.density, inj.force, inj.dir_x, inj.dir_y) {
        warn!("dropped pointer injection: {e}");
    }
}

fn format_title(solver: &Solver, viz: VizMode, fps: u32) -> String {
    let p = solver.params();
    format!(
        "teacup [{}] n={} visc={:.4} diff={:.4} | {} fps | r=restart v=viz esc=quit",
        viz.label(),
        solver.n(),
        p.visc,
        p.diff,
        fps,
    )
}

fn log_diagnostics(step: usize, solver: &Solver) {
    info!(
        "step={} mass={:.4} ke={:.6e} max|v|={:.4} div={:.4e}",
        step,
        diagnostics::total_density(solver.density()),
        diagnostics::kinetic_energy(solver.u(), solver.v()),
        diagnostics::max_speed(solver.u(), solver.v()),
        diagnostics::divergence_norm(solver.u(), solver.v()),
    );
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = config::load();
    if is_headless() {
        run_headless(&cfg, parse_headless_steps());
        Ok(())
    } else {
        run_gui(&cfg)
    }
}

/// Run the solver without a window, stirring a circle around the centre.
fn run_headless(cfg: &Config, steps: usize) {
    let mut solver = create_solver(cfg);
    let n = solver.n();
    let dt = cfg.sim.dt;
    let mut tracker = PointerTracker::new(cfg.pointer.force, 1.0, None);

    info!("headless run: n={n} steps={steps} dt={dt}");
    let start = Instant::now();
    for step in 0..steps {
        let angle = step as f64 * 0.1;
        let (ux, uy) = (0.5 + 0.25 * angle.cos(), 0.5 + 0.25 * angle.sin());
        if let Some(inj) = tracker.on_move(ux, uy, n) {
            apply_injection(&mut solver, inj);
        }
        solver.step(dt);
        if step % Defaults::LOG_EVERY == 0 {
            log_diagnostics(step, &solver);
        }
    }
    let elapsed = start.elapsed().as_secs_f64();
    info!("done: {:.2} ms/step", 1000.0 * elapsed / steps.max(1) as f64);
}

fn run_gui(cfg: &Config) -> Result<()> {
    let width = cfg.display.width;
    let height = cfg.display.height;

    let mut window = Window::new(
        "teacup",
        width,
        height,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )
    .context("failed to create window")?;
    window.set_target_fps(cfg.display.target_fps);

    // Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to set Ctrl+C handler")?;

    let mut solver = create_solver(cfg);
    let n = solver.n();
    let viz_map = ColorMap::milk_tea();
    let speed_map = ColorMap::initial_density();
    let mut tracker = cfg.pointer.tracker();
    let mut viz = VizMode::default();

    let (mut w, mut h) = (width, height);
    let mut framebuf = vec![0u32; w * h];
    let mut texture: Vec<f32> = Vec::new();

    let mut last_frame = Instant::now();
    let mut last_fps_time = Instant::now();
    let mut frame_count = 0u32;
    let mut step_count = 0usize;

    while window.is_open() && running.load(Ordering::SeqCst) {
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }

        // R: restart from the initial gradient
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            solver.seed_gradient(&ColorMap::initial_density());
            tracker.release();
            info!("restart");
        }

        // V: cycle visualization mode
        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            viz = viz.next();
        }

        // --- Pointer ---
        match window.get_mouse_pos(MouseMode::Discard) {
            Some((px, py)) => {
                let (ux, uy) = window_to_unit(px, py, w, h);
                if let Some(mut inj) = tracker.on_move(ux, uy, n) {
                    if window.get_mouse_down(MouseButton::Left) {
                        inj.density = Defaults::POUR_DENSITY;
                    }
                    apply_injection(&mut solver, inj);
                }
            }
            None => tracker.release(),
        }

        // --- Step ---
        let now = Instant::now();
        let dt = if cfg.sim.fixed_dt {
            cfg.sim.dt
        } else {
            now.duration_since(last_frame).as_secs_f64().min(Defaults::MAX_FRAME_DT)
        };
        last_frame = now;
        solver.step(dt);
        step_count += 1;

        // --- Render ---
        let (new_w, new_h) = window.get_size();
        if new_w != w || new_h != h {
            w = new_w.max(1);
            h = new_h.max(1);
            framebuf = vec![0u32; w * h];
        }
        match viz {
            VizMode::Density => renderer::density_texture(solver.density(), &viz_map, &mut texture),
            VizMode::Speed => renderer::speed_texture(solver.u(), solver.v(), &speed_map, &mut texture),
        }
        renderer::texture_to_argb(&texture, n, w, h, &mut framebuf);
        window
            .update_with_buffer(&framebuf, w, h)
            .context("failed to present frame")?;

        frame_count += 1;
        let since = last_fps_time.elapsed();
        if since.as_secs_f64() >= 1.0 {
            let fps = (frame_count as f64 / since.as_secs_f64()).round() as u32;
            window.set_title(&format_title(&solver, viz, fps));
            log::debug!("step={step_count} fps={fps}");
            frame_count = 0;
            last_fps_time = Instant::now();
        }
    }

    info!("exiting after {step_count} steps");
    Ok(())
}
