/// Critter Terminal Demo - Articulated creature
///
/// Poses and animates the creature as ASCII art.
/// Controls:
///   - [ / ]: Select joint, + / -: Bend it
///   - A/D / Arrow Keys: Turn the camera
///   - Mouse drag: Rotate freely
///   - Space: Walk cycle on/off
///   - Tab: Paint canvas, ':' for a command prompt
///   - Q/ESC: Quit
use std::path::PathBuf;

use critter_terminal::config::{Config, CONFIG_ENV};
use critter_terminal::TerminalApp;
use log::info;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os(CONFIG_ENV))
        .map(PathBuf::from);
    let config = Config::load(path.as_deref())?;
    info!("config: {:?}", config);

    let mut app = TerminalApp::new(config)?;
    app.run()?;

    println!("Thank you for using Critter Terminal!");
    Ok(())
}
