//! Headless demo runner.
//!
//! Drives a full level attempt without a window: a scripted player walks the
//! obstacle course at a fixed 60 Hz on a synthetic clock, jumping over the
//! gaps, until the level is won or the clock runs out. Run with
//! `RUST_LOG=info` for per-second HUD lines.

use abyss_game::{
    GameConfig, GamePhase, GameSession, KeyInput, Level, MouseDelta, Settings,
};

const DT: f32 = 1.0 / 60.0;

/// Scripted input for one frame of the demo run.
///
/// The course runs straight along the spawn's facing direction, so the
/// script mostly holds forward and taps jump in bursts timed to clear the
/// gaps. Two short strafe windows line the player up with the side-step
/// platforms.
fn scripted_input(frame: u64) -> KeyInput {
    let jump = matches!(frame % 90, 0..=3);
    let second = frame / 60;

    let mut keys = KeyInput {
        forward: true,
        jump,
        ..Default::default()
    };

    // Side-step platforms sit right and then left of the course line
    match second {
        7..=8 => keys.right = true,
        10..=11 => keys.left = true,
        _ => {}
    }

    keys
}

fn main() {
    env_logger::init();

    let settings = Settings::load_or_default("assets/settings.json");
    log::info!(
        "{} ({}x{}, fov {})",
        settings.window.title,
        settings.window.width,
        settings.window.height,
        settings.camera.fov
    );

    let config = GameConfig {
        time_limit_secs: settings.game.time_limit_secs,
        ..Default::default()
    };

    let mut session = GameSession::new(config, Level::obstacle_course(), 0.0);
    session.set_projection(
        settings.camera.fov,
        settings.camera.far,
        settings.camera.near,
        settings.window.aspect_ratio(),
    );

    let mut now = 0.0_f64;
    let mut last_logged_second = u64::MAX;

    loop {
        let keys = scripted_input(session.frame_count());
        now += f64::from(DT);

        let hud = session.frame(&keys, MouseDelta::default(), now, DT);

        let second = now as u64;
        if second != last_logged_second {
            last_logged_second = second;
            let pose = session.pose();
            log::info!(
                "{} | fps {} | pos ({:.1}, {:.1}, {:.1})",
                hud.time_display(),
                hud.fps,
                pose.position.x,
                pose.position.y,
                pose.position.z
            );
        }

        match session.phase() {
            GamePhase::Playing => {}
            GamePhase::Won | GamePhase::Lost => {
                if let Some(message) = hud.message() {
                    println!("{}", message);
                }
                println!(
                    "finished in {:.1}s over {} frames",
                    session.monitor().elapsed(now),
                    session.frame_count()
                );
                break;
            }
        }
    }
}
