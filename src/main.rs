use anyhow::{Context, Result};
use clap::Parser;
use snake_arcade::audio::SoundBoard;
use snake_arcade::game::GameConfig;
use snake_arcade::modes::HumanMode;
use std::fs::File;

/// Log records go here; the terminal itself belongs to the game screen
const LOG_FILE: &str = "snake.log";

#[derive(Parser)]
#[command(name = "snake-arcade")]
#[command(
    version,
    about = "Classic snake in the terminal",
    long_about = "Classic snake in the terminal.\n\n\
        Steer with the arrow keys or WASD, R restarts, Q or Esc quits.\n\
        Sound cues are read from eat_sound.wav and game_over_sound.wav in the \
        current directory when present. Set RUST_LOG to change the verbosity of snake.log."
)]
struct Cli {}

fn init_logging() -> Result<()> {
    let file = File::create(LOG_FILE).with_context(|| format!("Failed to create {LOG_FILE}"))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let _cli = Cli::parse();

    if let Err(err) = init_logging() {
        eprintln!("warning: logging disabled: {err:#}");
    }

    let sounds = SoundBoard::load_default();
    let mut human_mode = HumanMode::new(GameConfig::default(), sounds);
    human_mode.run().await?;

    Ok(())
}
