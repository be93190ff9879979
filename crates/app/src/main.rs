//! Entry point: headless Minesweeper 3D session.
//! Flies the camera, clicks pixels, logs the board.

mod config;
mod session;

use anyhow::Result;

use config::AppConfig;
use session::Session;

const FRAME_DT: f32 = 1.0 / 60.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cfg = AppConfig::from_env()?;
    log::info!(
        "Starting minesweep3d. board={}x{} mines={} seed={:?} screen={}x{} aim={:?}",
        cfg.board_x,
        cfg.board_y,
        cfg.mines,
        cfg.seed,
        cfg.width,
        cfg.height,
        cfg.aim
    );

    let mut session = Session::new(&cfg)?;

    for step in &cfg.fly {
        let frames = (step.seconds / FRAME_DT).round() as u32;
        for _ in 0..frames {
            session.frame(&step.keys, (0.0, 0.0), FRAME_DT);
        }
        let cam = session.camera();
        log::info!(
            "Flew {:?} for {:.2}s -> pos={:?} forward={:?}",
            step.keys,
            step.seconds,
            cam.position(),
            cam.forward()
        );
    }

    if let Some((w, h)) = cfg.resize {
        session.resize(w, h)?;
    }

    for click in &cfg.clicks {
        session.click(click.button, click.x, click.y);
    }

    let frame = session.frame(&[], (0.0, 0.0), FRAME_DT);
    log::info!(
        "Final frame: {} vertices, status={:?}",
        frame.vertices.len(),
        session.status()
    );
    println!("{}", session.board().render_text(false));

    log::info!("Graceful shutdown. Bye!");
    Ok(())
}
