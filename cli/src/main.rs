use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use engine::ColorVariant;
use initdeco::{commands, config, logger};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

#[derive(Parser, Debug)]
#[clap(
    name = "initdeco",
    version = env!("CARGO_PKG_VERSION"),
    about = "Color __init__.py files by whether they are empty"
)]
struct Cli {
    /// Configuration file (defaults to ./initdeco.toml when present)
    #[clap(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List every __init__.py below ROOT with its decoration
    List {
        /// Directory to scan (defaults to the working directory)
        root: Option<PathBuf>,
    },
    /// List, then follow changes until interrupted
    Watch {
        /// Directory to watch (defaults to the working directory)
        root: Option<PathBuf>,
    },
    /// Set the color for empty or non-empty files
    Set {
        variant: VariantArg,
        /// Hex color (#RRGGBB or #RRGGBBAA) or a theme token name; empty resets
        value: String,
        /// Write to the workspace settings instead of the user settings
        #[clap(long)]
        workspace: bool,
        /// Workspace directory (defaults to the working directory)
        #[clap(long)]
        root: Option<PathBuf>,
    },
    /// Show configured values and what they resolve to
    Show {
        /// Workspace directory (defaults to the working directory)
        root: Option<PathBuf>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum VariantArg {
    Empty,
    NonEmpty,
}

impl From<VariantArg> for ColorVariant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Empty => ColorVariant::Empty,
            VariantArg::NonEmpty => ColorVariant::NonEmpty,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let app_config = config::load_config(cli.config.as_deref())?;
    logger::setup_logger(app_config.logging()).context("Failed to set up logging")?;

    let mut stdout = std::io::stdout();

    match cli.command {
        Command::List { root } => {
            let root = commands::resolve_root(root.as_deref()).await?;
            commands::list(&app_config, &root, &mut stdout).await?;
        }
        Command::Watch { root } => {
            let root = commands::resolve_root(root.as_deref()).await?;
            let shutdown = CancellationToken::new();
            let on_signal = shutdown.clone();
            tokio::spawn(async move {
                match tokio::signal::ctrl_c().await {
                    Ok(()) => {
                        log::info!("Interrupt received, shutting down");
                        on_signal.cancel();
                    }
                    Err(e) => log::error!("Failed to listen for Ctrl-C: {e}"),
                }
            });
            commands::watch(&app_config, &root, &mut stdout, shutdown).await?;
        }
        Command::Set {
            variant,
            value,
            workspace,
            root,
        } => {
            let root = commands::resolve_root(root.as_deref()).await?;
            commands::set(
                &app_config,
                &root,
                variant.into(),
                &value,
                workspace,
                &mut stdout,
            )
            .await?;
        }
        Command::Show { root } => {
            let root = commands::resolve_root(root.as_deref()).await?;
            commands::show(&app_config, &root, &mut stdout).await?;
        }
    }

    Ok(())
}
