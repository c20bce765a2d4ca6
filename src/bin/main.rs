use anyhow::{Context, Result};
use std::path::Path;
use tilewm::bar::XftSurface;
use tilewm::window_manager::WindowManager;
use tilewm::xserver::X11Display;
use tilewm::{Config, config, spawn};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => {}
        [flag] if flag == "-v" => {
            println!("tilewm-{}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        _ => {
            eprintln!("usage: tilewm [-v]");
            std::process::exit(1);
        }
    }

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match config::default_path() {
        Some(path) if path.exists() => load_config(&path)?,
        _ => {
            info!("no configuration file, using the defaults");
            Config::default()
        }
    };

    if let Err(error) = run(config) {
        error!(%error, "tilewm exited with an error");
        return Err(error);
    }
    Ok(())
}

fn load_config(path: &Path) -> Result<Config> {
    let input = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = config::parse_config(&input)
        .with_context(|| format!("failed to parse {}", path.display()))?;
    info!(path = %path.display(), "loaded configuration");
    Ok(config)
}

fn run(config: Config) -> Result<()> {
    let display = X11Display::connect().context("failed to take over the display")?;
    let surface = XftSurface::new(&config.font, config.scheme_normal, config.scheme_selected)
        .with_context(|| format!("failed to set up the bar font {}", config.font))?;

    if let Err(error) = spawn::ignore_children() {
        warn!(%error, "child processes will not be reaped automatically");
    }
    let autostart = config.autostart.clone();

    let mut wm = WindowManager::new(config, display, surface)
        .context("failed to initialise the window manager")?;
    spawn::autostart(&autostart);
    wm.scan().context("failed to adopt existing windows")?;

    let result = wm.run();
    let cleanup = wm.cleanup();
    result.context("the event loop failed")?;
    cleanup.context("failed to release the display")?;
    Ok(())
}
