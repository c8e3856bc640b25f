//! claude-mcp - Claude Desktop filesystem allow-list manager
//!
//! Usage:
//!   claude-mcp add [-d <dir>] [-f]       # Allow a directory (default: current)
//!   claude-mcp list [-v]                 # Show allowed directories
//!   claude-mcp remove [-d <dir> | -i <n>]
//!   claude-mcp restart [-w <ms>]         # Restart Claude Desktop

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use claude_mcp_core::commands::{
    AddOptions, DebugCommand, DebugReport, DirectoryCommand, RemoveTarget, ServerSummary,
};
use claude_mcp_core::config::ConfigStore;
use claude_mcp_core::config::paths::CONFIG_PATH_ENV;
use claude_mcp_core::desktop::DesktopApp;
use claude_mcp_core::directory::DirectoryRecord;

const RESTART_HINT: &str = "Run 'claude-mcp restart' to apply the changes.";

#[derive(Parser, Debug)]
#[command(name = "claude-mcp", version)]
#[command(about = "Manage the directories Claude Desktop's filesystem MCP server may access", long_about = None)]
struct Cli {
    /// Path to claude_desktop_config.json (defaults to the per-user location)
    #[arg(long, global = true, env = CONFIG_PATH_ENV, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Allow a directory
    Add {
        /// Directory to allow (defaults to the current directory)
        #[arg(short, long, value_name = "DIR")]
        directory: Option<PathBuf>,

        /// Do not fail if the directory is already allowed
        #[arg(short, long)]
        force: bool,
    },

    /// List allowed directories
    List {
        /// Show creation dates and the server command line
        #[arg(short, long)]
        verbose: bool,

        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },

    /// Remove an allowed directory
    ///
    /// Without options the current directory is removed.
    #[command(alias = "rm")]
    Remove {
        /// Directory to remove
        #[arg(short, long, value_name = "DIR", conflicts_with = "index")]
        directory: Option<PathBuf>,

        /// 1-based position as shown by `list`
        #[arg(short, long, value_name = "N")]
        index: Option<usize>,
    },

    /// Stop Claude Desktop and start it again
    Restart {
        /// Milliseconds to wait between stop and start
        #[arg(short, long, value_name = "MS", default_value_t = 2000)]
        wait: u64,
    },

    /// Create a timestamped backup of the config file
    Backup,

    /// Restore the config file from a backup
    Restore {
        /// Backup file to restore
        #[arg(required_unless_present = "list", conflicts_with = "list")]
        backup: Option<PathBuf>,

        /// List available backups instead of restoring
        #[arg(long)]
        list: bool,
    },

    /// Show what claude-mcp sees in the config file
    Debug {
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum, Default, PartialEq, Eq)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "claude_mcp=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            // Help and version go to stdout and are not failures
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run_cli(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run_cli(cli: Cli) -> Result<()> {
    let config = cli.config;
    match cli.command {
        Commands::Add { directory, force } => run_add(config, directory, force),
        Commands::List { verbose, format } => run_list(config, verbose, format),
        Commands::Remove { directory, index } => run_remove(config, directory, index),
        Commands::Restart { wait } => run_restart(Duration::from_millis(wait)),
        Commands::Backup => run_backup(config),
        Commands::Restore { backup, list } => run_restore(config, backup, list),
        Commands::Debug { format } => run_debug(config, format),
    }
}

/// Print the failure once. The log line only shows up when `RUST_LOG`
/// enables debug output.
fn report_error(err: &anyhow::Error) {
    tracing::debug!(error = %err, recoverable = is_recoverable(err), "command failed");
    eprintln!("{}", error_line(err));
}

fn is_recoverable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<claude_mcp_core::Error>()
        .is_some_and(claude_mcp_core::Error::is_recoverable)
}

fn error_line(err: &anyhow::Error) -> String {
    format!("{} {err}", style("✗").for_stderr().red().bold())
}

fn directory_command(config: Option<PathBuf>) -> Result<DirectoryCommand> {
    Ok(DirectoryCommand::new(ConfigStore::from_override(config)?))
}

fn current_dir_or(directory: Option<PathBuf>) -> PathBuf {
    directory.unwrap_or_else(|| PathBuf::from("."))
}

fn run_add(config: Option<PathBuf>, directory: Option<PathBuf>, force: bool) -> Result<()> {
    let cmd = directory_command(config)?;
    let options = AddOptions::new(current_dir_or(directory)).with_force(force);
    let report = cmd.add(&options)?;

    if report.changed {
        println!("{} Added directory: {}", style("✓").green(), report.path);
    } else {
        println!("• Directory is already allowed: {}", report.path);
    }
    println!("{RESTART_HINT}");
    Ok(())
}

fn run_remove(
    config: Option<PathBuf>,
    directory: Option<PathBuf>,
    index: Option<usize>,
) -> Result<()> {
    let target = match index {
        Some(index) => RemoveTarget::Index(index),
        None => RemoveTarget::Path(current_dir_or(directory)),
    };

    let cmd = directory_command(config)?;
    let report = cmd.remove(&target)?;

    println!("{} Removed directory: {}", style("✓").green(), report.path);
    println!("{RESTART_HINT}");
    Ok(())
}

fn run_list(config: Option<PathBuf>, verbose: bool, format: OutputFormat) -> Result<()> {
    let cmd = directory_command(config)?;
    let summary = cmd.server_summary()?;
    let records = cmd.list_detailed()?;

    match format {
        OutputFormat::Table => {
            print_directory_table(&records, summary.as_ref(), verbose, cmd.store());
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "config_path": cmd.store().config_path(),
                "configured": summary.is_some(),
                "command": summary.as_ref().map(|s| s.command.clone()),
                "args": summary.as_ref().map(|s| s.args.clone()),
                "directories": records,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn print_directory_table(
    records: &[DirectoryRecord],
    summary: Option<&ServerSummary>,
    verbose: bool,
    store: &ConfigStore,
) {
    println!("=== Claude Desktop MCP allowed directories ===");
    println!();

    let Some(summary) = summary else {
        println!("{}", style("The filesystem server is not configured.").yellow());
        return;
    };
    if records.is_empty() {
        println!("{}", style("No directories are allowed yet.").yellow());
        return;
    }

    for record in records {
        let marker = if record.exists {
            style("✓").green()
        } else {
            style("✗").red()
        };
        let mut line = format!("{:>2}. {} {}", record.index, marker, record.path);
        if !record.exists {
            line.push_str(&style(" (missing)").dim().to_string());
        } else if verbose && let Some(created) = record.created {
            let created = format!(" (created {})", created.format("%Y-%m-%d"));
            line.push_str(&style(created).dim().to_string());
        }
        println!("{line}");
    }

    println!();
    println!("Total: {} directories", records.len());

    if verbose {
        println!();
        println!("Config file: {}", store.config_path().display());
        println!("Command: {}", summary.command);
        println!("Args: {}", summary.args.join(" "));
    }
}

fn run_restart(wait: Duration) -> Result<()> {
    println!("Restarting Claude Desktop...");

    let mut app = DesktopApp::system();
    let report = app.restart(wait)?;

    if report.stopped.is_empty() {
        println!("• Claude Desktop was not running");
    }
    for pid in &report.stopped {
        println!("  Stopped process (PID: {pid})");
    }
    println!(
        "{} Claude Desktop restarted from {}",
        style("✓").green(),
        report.launched.display()
    );
    Ok(())
}

fn run_backup(config: Option<PathBuf>) -> Result<()> {
    let store = ConfigStore::from_override(config)?;
    let path = store.create_backup()?;
    println!("{} Backup created: {}", style("✓").green(), path.display());
    Ok(())
}

fn run_restore(config: Option<PathBuf>, backup: Option<PathBuf>, list: bool) -> Result<()> {
    let store = ConfigStore::from_override(config)?;

    if list {
        let backups = store.list_backups()?;
        if backups.is_empty() {
            println!("No backups found next to {}", store.config_path().display());
        }
        for path in backups {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let backup = backup.ok_or_else(|| anyhow::anyhow!("Missing required argument: BACKUP"))?;
    store.restore_from_backup(&backup)?;
    println!(
        "{} Restored {} from {}",
        style("✓").green(),
        store.config_path().display(),
        backup.display()
    );
    println!("{RESTART_HINT}");
    Ok(())
}

fn run_debug(config: Option<PathBuf>, format: OutputFormat) -> Result<()> {
    let store = ConfigStore::from_override(config)?;
    let report = DebugCommand::new(store).execute()?;

    match format {
        OutputFormat::Table => print_debug_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(())
}

fn print_debug_report(report: &DebugReport) {
    println!("Config file: {}", report.config_path.display());
    match report.size_bytes {
        Some(size) if report.exists => println!("Exists:      yes ({size} bytes)"),
        _ => println!("Exists:      no"),
    }
    if let Some(error) = &report.parse_error {
        println!("Parse error: {}", style(error).red());
    }

    println!();
    if report.servers.is_empty() {
        println!("MCP servers: (none)");
    } else {
        println!("MCP servers:");
        for name in &report.servers {
            println!("  - {name}");
        }
    }
    if !report.extra_keys.is_empty() {
        println!("Other keys:  {}", report.extra_keys.join(", "));
    }

    if let Some(command) = &report.filesystem_command {
        println!();
        println!("filesystem command: {command}");
        println!("filesystem args:    {}", report.filesystem_args.join(" "));
        println!("Directories:        {}", report.directories.len());
    }

    println!();
    println!("Backups: {}", report.backups.len());
    for path in &report.backups {
        println!("  {}", path.display());
    }
}
