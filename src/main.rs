use album_market::builder::{self, BuildOptions};
use album_market::{config, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "album-market")]
#[command(about = "Build JSON manifests for a directory of album folders")]
#[command(long_about = "\
Build JSON manifests for a directory of album folders

Every non-hidden directory in the working directory is an album. Files are
classified by content, not extension: audio files become songs, an image
becomes the album cover, anything else is ignored.

Layout:

  ./
  ├── market.toml          # Optional config (see gen-config)
  ├── index.json           # Written: one cover per album
  ├── Jazz/
  │   ├── album.json       # Written: cover + songs, read back next run
  │   ├── cover.jpg
  │   ├── 01 Intro.mp3
  │   └── 02 Theme.flac
  └── Rock/
      └── ...

Re-running keeps every recorded song with its id and URL and appends new
ones. Removing or renaming files never rewrites recorded entries.

Run with no arguments to build in the current directory.")]
#[command(version)]
struct Cli {
    /// Directory holding the album folders
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Debug-level logging (overridden by RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Reconcile every album and write album and index manifests (default)
    Build,
    /// Reconcile every album and report, without writing anything
    Check,
    /// Print a stock market.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "album_market=debug".to_string()
        } else {
            "album_market=info".to_string()
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    match cli.command.unwrap_or(Command::Build) {
        Command::Build => {
            let summary = builder::run(&cli.root, BuildOptions::default())?;
            output::print_build_output(&summary);
        }
        Command::Check => {
            let summary = builder::run(&cli.root, BuildOptions { dry_run: true })?;
            output::print_build_output(&summary);
            println!("==> Dry run, nothing written");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
