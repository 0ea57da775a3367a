//! taskdeck - Task manager ↔ kanban board sync
//!
//! Mirrors available tasks (due by a date, or flagged) onto a kanban
//! board as backlog cards, and closes tasks whose cards reached a
//! completed lane. Run with no flags to see usage.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use std::collections::HashSet;
use taskdeck_common::config::Config;
use taskdeck_common::datex;
use taskdeck_sync::board::BoardClient;
use taskdeck_sync::taskman::TaskManagerClient;
use taskdeck_sync::{BoardRules, PassOptions, SyncRunner};
use tracing::info;

/// Command-line arguments for taskdeck
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(about = "Sync a personal task manager with a kanban board")]
#[command(version)]
struct Args {
    /// Sync available tasks due by EXPR (+Nd, +Nw or YYYY-MM-DD; no
    /// value means today)
    #[arg(short = 'd', long = "due", value_name = "EXPR", num_args = 0..=1, default_missing_value = "")]
    due: Option<String>,

    /// Sync flagged and available tasks
    #[arg(short, long)]
    flagged: bool,

    /// Close tasks for cards done on the board
    #[arg(short, long)]
    completed: bool,

    /// Report the board URL
    #[arg(short, long)]
    open_board: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    if args.due.is_none() && !args.flagged && !args.completed && !args.open_board {
        Args::command().print_help()?;
        return Ok(());
    }

    info!("Starting taskdeck v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load().context("Failed to load configuration")?;
    let today = chrono::Local::now().date_naive();

    if args.open_board {
        info!("Board URL: {}", config.board.url);
    }

    let due_by = match args.due.as_deref() {
        Some(expr) => {
            let date = datex::parse(expr, today)?;
            info!("Due date is {}", date);
            Some(date)
        }
        None => None,
    };

    let opts = PassOptions {
        due_by,
        flagged: args.flagged,
        pull_completed: args.completed,
    };
    if !opts.any() {
        return Ok(());
    }

    let tasks = TaskManagerClient::new(&config.taskman)?;
    let board = BoardClient::new(&config.board)?;
    let rules = BoardRules::from_config(&config.board);
    let completed_lanes: HashSet<String> = config.board.completed_lanes.iter().cloned().collect();

    let runner = SyncRunner::new(tasks, board, rules, completed_lanes);
    let summary = runner
        .run(&opts, today)
        .await
        .context("Sync pass aborted")?;

    info!(
        "Pass complete: {} closed, {} created, {} already on board, {} deferred",
        summary.tasks_closed, summary.created, summary.synced, summary.deferred
    );
    Ok(())
}
