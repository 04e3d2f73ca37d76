use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod controller;
mod domain;
mod loader;
mod model;
mod pipeline;
mod records;
mod search_input;
mod ui;

use controller::Controller;
use domain::{AtvConfig, AtvError, DEFAULT_URL};
use model::{Model, Status};

/// A tui viewer for remote application records.
#[derive(Debug, Parser)]
#[command(version, about)]
struct Args {
    /// Endpoint returning the applications as a JSON array.
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// Write logs to this file (stderr belongs to the UI).
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Terminal event poll interval in milliseconds.
    #[arg(long, default_value_t = 100)]
    poll_ms: u64,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(&args) {
        eprintln!("Error: {e:?}");
        return ExitCode::FAILURE;
    }

    let result = run(args);
    ratatui::restore();
    match result {
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

fn init_logging(args: &Args) -> Result<(), AtvError> {
    if let Some(path) = &args.log_file {
        let file = std::fs::File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_writer(file)
            .with_ansi(false)
            .init();
    }
    Ok(())
}

fn run(args: Args) -> Result<(), AtvError> {
    info!("Starting atv against {}", args.url);

    let cfg = AtvConfig {
        event_poll_time: args.poll_ms,
    };

    // The UI loop stays synchronous; the runtime only carries the fetch task.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let _guard = runtime.enter();
    let load_rx = loader::spawn_fetch(args.url);

    let mut model = Model::new();
    let mut controller = Controller::new(&cfg, load_rx);
    let mut terminal = ratatui::init();

    while model.status != Status::Quitting {
        terminal.draw(|f| ui::draw(model.get_uidata(), f))?;

        if let Some(message) = controller.handle_event(&model)? {
            model.update(message)?;
        }
    }

    Ok(())
}
