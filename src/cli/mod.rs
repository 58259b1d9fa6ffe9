mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use athon_fmt_plugin::config::PluginConfig;
use athon_fmt_plugin::logging;

#[derive(Parser)]
#[command(name = "athon-fmt", version, about = "Athōn formatter plugin backed by athon-format.py")]
pub struct Cli {
    /// Config file (default: ~/.athon/fmt.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Format Athōn source from stdin or files
    Format {
        /// Files to format (reads stdin when empty)
        files: Vec<PathBuf>,
        /// Read source from stdin and print the result
        #[arg(long, conflicts_with_all = ["files", "check", "write"])]
        stdin: bool,
        /// Report files that need formatting without changing them
        #[arg(long, conflicts_with = "write", requires = "files")]
        check: bool,
        /// Write formatted output back to the files
        #[arg(short, long, requires = "files")]
        write: bool,
    },
    /// Print the plugin descriptor as JSON
    Describe,
    /// Show which athon-format.py would be used
    Locate,
    /// Print the effective configuration
    Config,
}

pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = match cli.config {
        Some(ref path) => PluginConfig::load_from(path)?,
        None => PluginConfig::load()?,
    };
    let _guard = logging::init_logging(&config, cli.verbose)?;

    match cli.command {
        Command::Format {
            files,
            stdin,
            check,
            write,
        } => {
            if stdin || files.is_empty() {
                commands::format_stdin(&config).await
            } else {
                commands::format_files(&config, &files, check, write).await
            }
        }
        Command::Describe => commands::describe(&config),
        Command::Locate => commands::locate(&config),
        Command::Config => commands::show_config(&config),
    }
}
