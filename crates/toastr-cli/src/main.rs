mod logging;
mod script;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use toastr_shared::config;
use toastr_shared::models::Severity;

#[derive(Parser)]
#[command(name = "toastr", about = "toastr - toast notification stack driver")]
struct Cli {
    /// Log debug messages to stderr
    #[arg(short = 'v', long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a JSON-lines script of toast operations and print the resulting state
    Run {
        /// Script file (reads stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Show a single toast and print the resulting state
    Show {
        /// Severity: success, error, info, warning
        #[arg(short = 's', long, default_value = "info")]
        severity: String,

        /// Toast title
        #[arg(short = 't', long)]
        title: Option<String>,

        /// Toast message
        message: String,
    },

    /// Open config file in editor, or inspect and update it
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the resolved [toastr] settings as JSON
    Show,
    /// Set a [toastr] value, keeping the rest of the file intact
    Set {
        /// Setting name, e.g. max_opened
        key: String,
        /// New value
        value: String,
    },
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose, cli.log_file.as_deref()) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    match cli.command {
        Commands::Run { file } => script::handle_run(file.as_deref()),
        Commands::Show {
            severity,
            title,
            message,
        } => {
            let severity: Severity = severity.parse().unwrap_or_else(|e: String| {
                eprintln!("{} Use 'success', 'error', 'info', or 'warning'.", e);
                std::process::exit(1);
            });
            script::handle_show(severity, message, title);
        }
        Commands::Config { action: None } => {
            let config_path = config::ensure_config_file().unwrap_or_else(|e| {
                eprintln!("Failed to create config file: {}", e);
                std::process::exit(1);
            });

            let editor = config::resolve_editor();

            let status = std::process::Command::new("sh")
                .arg("-c")
                .arg(format!("{} \"{}\"", editor, config_path.display()))
                .status()
                .unwrap_or_else(|e| {
                    eprintln!("Failed to launch editor '{}': {}", editor, e);
                    std::process::exit(1);
                });

            if !status.success() {
                std::process::exit(status.code().unwrap_or(1));
            }
        }
        Commands::Config {
            action: Some(ConfigAction::Show),
        } => {
            let toastr = config::load_config().toastr;
            match serde_json::to_string_pretty(&toastr) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Failed to serialize config: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::Config {
            action: Some(ConfigAction::Set { key, value }),
        } => {
            let value = config::parse_setting(&key, &value).unwrap_or_else(|e| {
                eprintln!("{}", e);
                std::process::exit(1);
            });
            if let Err(e) = config::save_toastr_value(&key, value) {
                eprintln!("Failed to update config.toml: {}", e);
                std::process::exit(1);
            }
            println!("Updated {} in {}", key, config::config_path().display());
        }
    }
}
