use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use annularium::config::{self, Config};
use annularium::error::RunError;
use annularium::renderer::{self, RenderConfig, VizMode};
use annularium::solver::Simulation;
use annularium::solver::diagnostics::{divergence_l2, first_non_finite, kinetic_energy, total_density};
use annularium::solver::forcing::Emitter;
use annularium::state::FrameSnapshot;
use minifb::{Key, KeyRepeat, Window, WindowOptions};

fn is_headless(args: &[String]) -> bool {
    args.iter().any(|a| a == "--headless")
}

/// Value of `--config <path>`, if given.
fn config_path(args: &[String]) -> Result<Option<&str>, RunError> {
    match args.iter().position(|a| a == "--config") {
        None => Ok(None),
        Some(k) => args.get(k + 1).map(|p| Some(p.as_str())).ok_or(RunError::MissingConfigPath),
    }
}

/// An explicit `--config` must load; the implicit file falls back to defaults.
fn load_config(args: &[String]) -> Result<Config, RunError> {
    match config_path(args)? {
        Some(path) => Ok(config::load_from(path)?),
        None => Ok(config::load()),
    }
}

/// Simulation plus the emitter that drives it, advanced in lockstep.
struct Host {
    sim: Simulation,
    emitter: Option<Emitter>,
    steps_per_frame: usize,
    time: f32,
}

impl Host {
    fn new(cfg: &Config) -> Result<Self, RunError> {
        let geometry = cfg.geometry()?;
        let params = cfg.solver_params()?;
        Ok(Self {
            emitter: cfg.emitter(&geometry),
            sim: Simulation::new(geometry, params)?,
            steps_per_frame: cfg.display.steps_per_frame.max(1),
            time: 0.0,
        })
    }

    fn advance(&mut self) {
        let dt = self.sim.params().dt;
        for _ in 0..self.steps_per_frame {
            if let Some(emitter) = &self.emitter {
                emitter.apply(&mut self.sim, self.time);
            }
            self.sim.frame_step();
            self.time += dt;
        }
    }

    fn reset(&mut self) {
        self.sim.reset();
        self.time = 0.0;
    }

    fn check_finite(&self) -> Result<(), RunError> {
        let fields = [("density", self.sim.density()), ("ur", self.sim.ur()), ("utheta", self.sim.utheta())];
        for (field, grid) in fields {
            if let Some((i, j)) = first_non_finite(grid) {
                return Err(RunError::NonFinite { field, frame: self.sim.frame(), i, j });
            }
        }
        Ok(())
    }

    fn report(&self) -> String {
        let sim = &self.sim;
        format!(
            "frame={} mass={:.4} div={:.3e} KE={:.4e}",
            sim.frame(),
            total_density(sim.density()),
            divergence_l2(sim.ur(), sim.utheta(), sim.geometry()),
            kinetic_energy(sim.ur(), sim.utheta()),
        )
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Ctrl+C ends either loop after the current frame
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    if let Err(e) = ctrlc::set_handler(move || r.store(false, Ordering::SeqCst)) {
        log::warn!("no Ctrl+C handler: {e}");
    }

    let args: Vec<String> = std::env::args().collect();
    let result = load_config(&args).and_then(|cfg| {
        if is_headless(&args) { run_headless(&cfg, &running) } else { run_gui(&cfg, &running) }
    });
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run_headless(cfg: &Config, running: &AtomicBool) -> Result<(), RunError> {
    let mut host = Host::new(cfg)?;
    let every = cfg.display.report_every.max(1);
    log::info!("headless run: {} frames", cfg.display.frames);

    let start = Instant::now();
    for frame in 1..=cfg.display.frames {
        if !running.load(Ordering::SeqCst) {
            log::info!("interrupted");
            break;
        }
        host.advance();
        host.check_finite()?;
        if frame % every == 0 {
            log::info!("{}", host.report());
        }
    }
    log::info!("done in {:.2?}: {}", start.elapsed(), host.report());
    Ok(())
}

fn run_gui(cfg: &Config, running: &AtomicBool) -> Result<(), RunError> {
    let mut host = Host::new(cfg)?;
    let mut viz_mode = VizMode::Density;
    let mut paused = false;

    let (mut w, mut h) = (cfg.display.width, cfg.display.height);
    let mut render_cfg = RenderConfig::fit(w, h);
    let mut window = Window::new(
        "annularium",
        w,
        h,
        WindowOptions {
            resize: true,
            ..WindowOptions::default()
        },
    )?;
    window.set_target_fps(cfg.display.target_fps);

    let mut snap = FrameSnapshot::new_empty(*host.sim.geometry());
    let mut framebuf = vec![0u32; w * h];
    let mut rgba_buf: Vec<u8> = Vec::new();
    let mut frame_count = 0u32;
    let mut last_fps_time = Instant::now();

    while window.is_open() && running.load(Ordering::SeqCst) {
        if window.is_key_pressed(Key::Escape, KeyRepeat::No) {
            break;
        }
        if window.is_key_pressed(Key::Space, KeyRepeat::No) {
            paused = !paused;
            log::info!("{}", if paused { "paused" } else { "resumed" });
        }
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            host.reset();
            log::info!("reset");
        }
        if window.is_key_pressed(Key::V, KeyRepeat::No) {
            viz_mode = viz_mode.next();
            log::info!("view: {}", viz_mode.label());
        }

        let (win_w, win_h) = window.get_size();
        if (win_w, win_h) != (w, h) && win_w > 0 && win_h > 0 {
            (w, h) = (win_w, win_h);
            render_cfg = RenderConfig::fit(w, h);
            framebuf = vec![0u32; w * h];
        }

        if !paused {
            host.advance();
            host.check_finite()?;
        }

        render_cfg.scale = match viz_mode {
            VizMode::Density => cfg.display.density_scale,
            VizMode::Speed => cfg.display.speed_scale,
        };
        host.sim.snapshot_into(&mut snap);
        renderer::render_into(&mut rgba_buf, &snap, &render_cfg, viz_mode);
        renderer::rgba_to_argb(&rgba_buf, &mut framebuf);
        window.update_with_buffer(&framebuf, w, h)?;

        frame_count += 1;
        let now = Instant::now();
        if now.duration_since(last_fps_time) >= Duration::from_secs(1) {
            window.set_title(&format!("annularium - {frame_count} fps - frame {}", host.sim.frame()));
            log::debug!("{}", host.report());
            frame_count = 0;
            last_fps_time = now;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_is_headless() {
        assert!(is_headless(&args(&["annularium", "--headless"])));
        assert!(!is_headless(&args(&["annularium"])));
    }

    #[test]
    fn test_config_path() {
        assert_eq!(config_path(&args(&["annularium"])).unwrap(), None);
        assert_eq!(config_path(&args(&["annularium", "--config", "a.yaml"])).unwrap(), Some("a.yaml"));
        assert!(matches!(config_path(&args(&["annularium", "--config"])), Err(RunError::MissingConfigPath)));
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let err = load_config(&args(&["annularium", "--config", "no/such/file.yaml"])).unwrap_err();
        assert!(matches!(err, RunError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_pipeline_no_panic() {
        let mut cfg = Config::default();
        cfg.grid.nr = 16;
        cfg.grid.ntheta = 32;
        let mut host = Host::new(&cfg).unwrap();
        let render_cfg = RenderConfig::fit(64, 48);
        let mut snap = FrameSnapshot::new_empty(*host.sim.geometry());

        for _ in 0..3 {
            host.advance();
            host.check_finite().unwrap();
            host.sim.snapshot_into(&mut snap);
            let rgba = renderer::render(&snap, &render_cfg, VizMode::Density);
            assert_eq!(rgba.len(), 64 * 48 * 4);
        }
        assert_eq!(host.sim.frame(), 3);
        assert!(total_density(host.sim.density()) > 0.0, "emitter should have injected dye");
        assert!(host.report().starts_with("frame=3 "));
    }

    #[test]
    fn test_host_reset_restarts_clock() {
        let mut host = Host::new(&Config::default()).unwrap();
        host.advance();
        host.reset();
        assert_eq!(host.time, 0.0);
        assert_eq!(host.sim.frame(), 0);
    }
}
