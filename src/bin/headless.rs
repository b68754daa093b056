//! Headless driver.
//!
//! Runs a scripted session without a window and logs pool statistics:
//! a click in the middle of the world, a held button that keeps spawning,
//! then a mouse sweep along the floor that kicks settled rectangles back up.
//!
//! Usage: `confetti-headless [config.json] [frames]`
//!
//! Log level defaults to `info`; set `RUST_LOG=debug` for migrations.

use confetti::prelude::*;
use env_logger::Env;
use std::process::ExitCode;

const DT: f32 = 1.0 / 60.0;

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) if path.ends_with(".json") => match SandboxConfig::load(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path);
                config
            }
            Err(e) => {
                log::error!("{}", e);
                return ExitCode::FAILURE;
            }
        },
        _ => SandboxConfig::default().with_seed(1),
    };
    let frames: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(600);

    let mut sandbox = match Sandbox::new(config) {
        Ok(sandbox) => sandbox,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let world = sandbox.viewport().world_size();
    let center = world * 0.5;
    let floor = world.y - 2.0;

    for frame in 0..frames {
        let now = frame as f32 * DT;
        let phase = frame as f32 / frames.max(1) as f32;

        // Script: press at 5%, release at 20%, sweep the floor from 60% to 90%.
        if frame == frames / 20 {
            sandbox.cursor_moved(center, now);
            sandbox.mouse_button(MouseButton::Left, true);
        }
        if frame == frames / 5 {
            sandbox.mouse_button(MouseButton::Left, false);
        }
        if (0.6..0.9).contains(&phase) {
            let t = (phase - 0.6) / 0.3;
            sandbox.cursor_moved(Vec2::new(t * world.x, floor), now);
        }

        let report = sandbox.frame_at(now, DT);
        if report.spawned > 0 || report.reactivated > 0 {
            log::debug!("frame {}: {:?}", frame, report);
        }
        if frame % 60 == 0 {
            log::info!("t={:.1}s {}", now, sandbox.stats());
        }
    }

    log::info!("Finished {} frames: {}", frames, sandbox.stats());
    log::info!(
        "Last batch: {} instances, {} bytes",
        sandbox.instances().len(),
        sandbox.instances().as_bytes().len()
    );
    ExitCode::SUCCESS
}
