//! postgate CLI
//!
//! # Commands
//! - `postgate route [post-id] [--user <id>]` - Load a demo post through the router and print the screen
//! - `postgate schematic` - Print the router's slot dependency graph as JSON
//! - `postgate grid <items>... --count <n>` - Pack items into fixed-width rows

mod demo;
mod grid;
mod route;
mod schematic;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use postgate::router::RouterConfig;
use postgate_observe::LogFormat;
use std::path::{Path, PathBuf};

/// postgate CLI
#[derive(Parser)]
#[command(name = "postgate")]
#[command(author, version, about = "Multi-source async gate and post router")]
struct Cli {
    /// Router configuration file (TOML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log output format (plain, json)
    #[arg(long, global = true, default_value = "plain")]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a demo post through the router and print what it renders
    Route {
        /// Post id (demo posts: t3_drawing, t3_collection, t3_pinned, t3_widget)
        #[arg(default_value = demo::DRAWING_POST)]
        post_id: String,

        /// Viewer user id (default: anonymous)
        #[arg(short, long)]
        user: Option<String>,

        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the router's slot dependency graph as JSON
    Schematic {
        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Pack items into rows of a fixed width
    Grid {
        /// Items to lay out, in order
        items: Vec<String>,

        /// Cells per row
        #[arg(short = 'n', long, default_value_t = 3)]
        count: usize,
    },
}

fn load_config(path: Option<&Path>) -> Result<RouterConfig> {
    let config = match path {
        Some(path) => RouterConfig::from_file(path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?,
        None => RouterConfig::default(),
    };
    config
        .with_env_overrides()
        .context("Invalid environment override")
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    postgate_observe::init_tracing(cli.log_format)?;

    match cli.command {
        Commands::Route {
            post_id,
            user,
            pretty,
        } => {
            let config = load_config(cli.config.as_deref())?;
            route::run_route_command(&post_id, user.as_deref(), &config, pretty)
        }
        Commands::Schematic { output } => {
            let config = load_config(cli.config.as_deref())?;
            schematic::run_schematic_command(&config, output.as_deref())
        }
        Commands::Grid { items, count } => grid::run_grid_command(&items, count),
    }
}
