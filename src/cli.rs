use clap::{Parser, Subcommand};
use std::path::PathBuf;

const LONG_ABOUT: &str = r#"
Task Dispatch - dependency-aware next-task scheduler

Works on a single JSON task document named by TASK_CONFIG_PATH (or --config).
The document holds top-level tasks, each optionally with subtasks. Items are
addressed by key or by number ("3", "2.1").

Workflow:
  td next                       ← What should I work on now?
  td status 2.1 in-progress     ← Claim it
  td status 2.1 done            ← Finish it
  td status setup,build done    ← Several at once (keys or numbers)
  td reset                      ← Everything back to pending

Scheduling rules:
  • Subtasks of in-progress tasks are picked before any top-level task
  • Only pending or in-progress items with completed preconditions qualify
  • Ties break on priority, then fewer preconditions, then lower number

Statuses: pending, in-progress, done, review, deferred, cancelled
"#;

#[derive(Parser, Clone)]
#[command(name = "td")]
#[command(about = "Dependency-aware task scheduler over a JSON task document")]
#[command(long_about = LONG_ABOUT)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output (-q)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output logs in JSON format
    #[arg(long)]
    pub json: bool,

    /// Task document path (overrides TASK_CONFIG_PATH; must be absolute)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Clone, Debug, PartialEq)]
pub enum Commands {
    /// Show the next task or subtask to work on
    ///
    /// Read-only. Prints {"status":"success","data":{...}} with the selected
    /// item, or a message when nothing is eligible.
    Next,

    /// Set the status of one or more tasks or subtasks
    ///
    /// Examples:
    ///   td status 3 in-progress
    ///   td status 2.1 done
    ///   td status setup,build done
    Status {
        /// Task key or number; separate several with commas
        identifier: String,

        /// New status: pending, done, in-progress, review, deferred, cancelled
        status: String,
    },

    /// Reset every task and subtask to pending and clear all results
    Reset,

    /// Show the task document location and a summary of its contents
    Info,

    /// Serve the scheduler as MCP tools over stdio
    #[command(name = "mcp-server")]
    McpServer,
}
