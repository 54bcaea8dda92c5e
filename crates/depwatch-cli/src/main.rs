use std::path::PathBuf;
use std::sync::Arc;

use anyhow::bail;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use depwatch_poller::{ContextLifecycle, FileResolver, PollConfig, Poller};
use depwatch_store::{FsSnapshotStore, SnapshotStore};

#[derive(Parser)]
#[command(name = "depwatch", version)]
struct Cli {
    /// Directory holding depwatch.toml (defaults to the current directory)
    #[arg(long)]
    root: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write a default depwatch.toml and create the state directory
    Init {
        /// Identifier of the monitored entity
        #[arg(long, default_value = "default")]
        entity: String,
    },

    /// Print a summary of the last recorded snapshot
    Status,

    /// Run one poll cycle against the configured resolved output
    Poll,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let root = match cli.root {
        Some(root) => root,
        None => std::env::current_dir()?,
    };

    match cli.cmd {
        Command::Init { entity } => {
            let path = PollConfig::config_path(&root);
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            let cfg = PollConfig::default_for(&entity);
            cfg.save_to(&path)?;
            std::fs::create_dir_all(cfg.state_dir(&root))?;
            println!("Initialized depwatch in {}", root.display());
        }
        Command::Status => {
            let cfg = PollConfig::load_from(&PollConfig::config_path(&root))?;
            match FsSnapshotStore::new().load(&cfg.snapshot_path(&root)) {
                Ok(snapshot) => {
                    println!("Entity: {}", cfg.entity.id);
                    println!("Recorded dependencies: {}", snapshot.len());
                    for (id, record) in &snapshot.dependencies {
                        println!("- {} ({} artifacts)", id.as_str(), record.artifacts.len());
                    }
                }
                Err(err) => println!("No recorded snapshot: {err}"),
            }
        }
        Command::Poll => {
            let cfg = PollConfig::load_from(&PollConfig::config_path(&root))?;
            let store: Arc<dyn SnapshotStore> = Arc::new(FsSnapshotStore::new());
            let lifecycle = ContextLifecycle::new(
                store,
                cfg.snapshot_path(&root),
                cfg.polling.persist_to_disk,
            );
            let resolver = FileResolver::new(cfg.resolved_path(&root));
            let poller = Poller::new(lifecycle, Box::new(resolver), &cfg.polling);

            let changed = poller.poll();
            println!("{}", if changed { "changed" } else { "unchanged" });
        }
    }

    Ok(())
}
