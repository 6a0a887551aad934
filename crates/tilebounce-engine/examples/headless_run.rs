//! Headless level run -- plays a level with scripted input and prints events.
//!
//! Run with:
//!   cargo run --example headless_run -p tilebounce-engine -- [LEVEL] [CONFIG]
//!
//! Without arguments a small built-in level is played. Set `RUST_LOG=debug`
//! to see routing and sweep logs.

use anyhow::Context;
use tilebounce_engine::prelude::*;

const DEMO_LEVEL: &str = "\
XXXXXXXXXXXXXXXX
X11111111111111X
X1Y11E115118612X
XZZZZZZZZZZZZZZX";

const MAX_TICKS: u64 = 60 * 30;

fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let level = args.next();
    let config = match args.next() {
        Some(path) => GameConfig::load(&path).with_context(|| format!("loading config {path}"))?,
        None => GameConfig::default(),
    };

    let mut game = match level {
        Some(path) => Game::load(&path, config).with_context(|| format!("loading level {path}"))?,
        None => Game::new(Grid::parse(DEMO_LEVEL)?, config)?,
    };

    let mut status = GameStatus::Playing;
    while status == GameStatus::Playing && game.tick_count() < MAX_TICKS {
        let input = PlayerInput {
            right: true,
            jump: game.tick_count() % 90 == 0,
            ..Default::default()
        };
        let report = game.tick(input);
        for event in &report.events {
            println!("{:>5} {}", report.tick, serde_json::to_string(event)?);
        }
        status = report.status;
    }

    let mut frame: Vec<DrawCommand> = Vec::new();
    let drawn = game.render(&mut frame);
    let ball = game.ball();
    println!(
        "finished: {status:?} after {} ticks, score {}, lives {}, {drawn} draw commands",
        game.tick_count(),
        ball.score(),
        ball.lives(),
    );
    Ok(())
}
