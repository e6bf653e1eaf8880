use anyhow::Context;
use blocksim::{shell, FileSystemManager, FsConfig};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "blocksim",
    version = "0.1.0",
    about = "Contiguous block allocation simulator"
)]
struct Cli {
    /// TOML file with `system_size` and `block_size`
    #[arg(long, short)]
    config: Option<PathBuf>,
    /// Total storage size in bytes
    #[arg(long, short)]
    system_size: Option<usize>,
    /// Size of each block in bytes
    #[arg(long, short)]
    block_size: Option<usize>,
    /// Log allocator decisions to stderr
    #[arg(long, short)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(io::stderr)
        .init();

    let config = match &cli.config {
        Some(path) => FsConfig::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => FsConfig::default(),
    }
    .with_overrides(cli.system_size, cli.block_size);

    let mut manager =
        FileSystemManager::from_config(&config).context("Failed to initialize filesystem")?;
    info!(
        system_size = config.system_size,
        block_size = config.block_size,
        "starting session"
    );

    let stdin = io::stdin();
    let prompt = stdin.is_terminal();
    if prompt {
        println!(
            "{} blocks of {} bytes. Commands: add <name> <size>, delete <name>, print, reset, quit, help.",
            config.block_count(),
            config.block_size
        );
    }

    let mut stdout = io::stdout();
    shell::run(&mut manager, stdin.lock(), &mut stdout, prompt)
        .context("Simulator stopped on an internal error")?;
    Ok(())
}
