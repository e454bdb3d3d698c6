use anyhow::Context;
use clap::Parser;

use aqi::SnapshotStore;
use station::{
    config::Args,
    face::AsciiFace,
    shutdown::Shutdown,
    source::{FileSource, NullSource, ReadingSource},
    surface::{attach, JsonLinesSurface, LogSurface},
    Station,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    aqi::tables::validate_all().context("breakpoint tables are inconsistent")?;

    let shutdown = Shutdown::new();
    {
        let shutdown = shutdown.clone();
        ctrlc::set_handler(move || {
            tracing::info!("got SIGINT, stopping");
            shutdown.trigger();
        })
        .context("could not set SIGINT handler")?;
    }

    let store = SnapshotStore::new();
    attach(&store, LogSurface);
    if args.json {
        attach(&store, JsonLinesSurface::new(std::io::stdout()));
    }
    if args.face {
        attach(&store, AsciiFace::new(std::io::stdout()));
    }

    let source: Box<dyn ReadingSource> = match &args.source {
        Some(path) => {
            tracing::info!("reading payloads from {}", path.display());
            Box::new(FileSource::new(path))
        }
        None => {
            tracing::warn!("no source configured; snapshots will be empty");
            Box::new(NullSource {})
        }
    };

    let mut station = Station::new(source, store, args.settings());
    station.run(&shutdown);
    Ok(())
}
