use anyhow::Result;
use clap::{Parser, Subcommand};
use log::*;
use simple_logger::SimpleLogger;
use std::future::Future;
use std::path::PathBuf;
use tokio::sync::mpsc;

mod config;
mod delta;
mod measurement;
mod schedule;
mod status;
mod store;
mod tick;

use config::Config;
use store::JsonFileStore;
use tick::{TickEvent, TickHandler, Trigger};

/// Publish the heating curve delta for the current outdoor temperature
#[derive(Parser, Debug)]
#[command(version, about)]
struct Cli {
    /// State file shared with the home automation host
    #[arg(long)]
    state: Option<PathBuf>,

    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum Command {
    /// Recompute on schedule until stopped (default)
    Run,
    /// Recompute once and exit
    Recalc,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    SimpleLogger::new()
        .with_level(cli.log_level)
        .with_utc_timestamps()
        .init()?;

    let config = Config::read().with_state_file(cli.state);
    let mut store = JsonFileStore::new(config.state_file.clone());
    info!("Using state file {}", store.path().display());

    match cli.command.unwrap_or(Command::Run) {
        Command::Recalc => {
            TickHandler::new(config).handle(TickEvent::new(Trigger::Manual), &mut store)?;
            Ok(())
        }
        Command::Run => run(config, store).await,
    }
}

async fn run(config: Config, mut store: JsonFileStore) -> Result<()> {
    let (ticks, mut events) = mpsc::channel::<TickEvent>(8);

    spawn_trigger(
        "schedule",
        schedule::run_schedule(config.tick_interval, ticks.clone()),
    );

    #[cfg(unix)]
    spawn_trigger("manual", schedule::run_manual_trigger(ticks.clone()));

    if let Some(interval) = config.watch_interval {
        spawn_trigger(
            "outdoor temperature watch",
            schedule::watch_outdoor_temperature(
                store.clone(),
                config.entities.outdoor_temperature,
                interval,
                ticks.clone(),
            ),
        );
    }
    drop(ticks);

    info!(
        "Publishing {} every {} minutes",
        config.entities.delta,
        config.tick_interval.as_secs() / 60
    );

    let handler = TickHandler::new(config);

    // Single consumer, so writes to the store never interleave
    while let Some(event) = events.recv().await {
        let outcome = tokio::task::block_in_place(|| handler.handle(event, &mut store));
        if let Err(error) = outcome {
            error!("Tick via {} failed: {:#}", event.trigger, error);
        }
    }
    Ok(())
}

fn spawn_trigger<F>(name: &'static str, trigger: F)
where
    F: Future<Output = Result<()>> + Send + 'static,
{
    tokio::spawn(async move {
        if let Err(error) = trigger.await {
            error!("Trigger {} stopped: {:#}", name, error);
        }
    });
}
