use clap::Parser;
use fandial::config;
use fandial::gui::app::{AppInit, AppModel};
use fandial::gui::dial::Dial;
use fandial::sys::runtime;
use fandial::sys::state::{self, WindowState};
use relm4::prelude::*;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Config file to use instead of the default location
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start at Off and ignore any saved dial state
    #[arg(long)]
    no_restore: bool,

    /// Write the default config file (if missing), print its path and exit
    #[arg(long)]
    write_default_config: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config_required = args.config.is_some();
    let config_path = match args.config {
        Some(path) => path,
        None => config::get_config_path()?,
    };

    if args.write_default_config {
        config::write_default_config(&config_path)?;
        println!("{}", config_path.display());
        return Ok(());
    }

    let config = config::load_or_default(&config_path, config_required)?;

    let state_path = state::get_state_path()
        .inspect_err(|e| log::warn!("Dial state will not be saved: {}", e))
        .ok();
    let snapshot = if args.no_restore {
        None
    } else {
        state_path.as_deref().and_then(state::load_snapshot)
    };

    let mut dial = Dial::new();
    dial.restore(snapshot.as_ref());

    let window = snapshot
        .as_ref()
        .and_then(state::window_state)
        .unwrap_or(WindowState {
            width: config.window.width,
            height: config.window.height,
        });

    let (tx, rx) = async_channel::bounded(32);

    // Start Background Services
    runtime::start_background_services(config_path.clone(), tx);

    // clap owns the command line, so GTK gets none of it
    let app = RelmApp::new("org.fandial.fandial").with_args(Vec::new());

    app.run::<AppModel>(AppInit {
        dial,
        config,
        config_path,
        config_required,
        state_path,
        window,
        events: rx,
    });

    Ok(())
}
