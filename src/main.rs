//! remplay - a terminal client for RemGlk-speaking interpreters
//!
//! remplay spawns an interactive-fiction interpreter that talks the
//! RemGlk JSON protocol on its stdio, renders its window updates as
//! markup text on stdout, and sends each typed line back as the response
//! the interpreter's pending input request expects.
//!
//! # Quick Start
//!
//! ```text
//! remplay glulxe story.ulx          # play a Glulx story
//! remplay -W 80 -H 30 fizmo game.z8 # custom display metrics
//! ```
//!
//! Grid (status) windows are printed with a leading `] ` marker; buffer
//! (story) windows are printed as plain markup lines.

mod config;
mod core;
mod input;
mod ui;

use std::env;
use std::io::{self, BufRead, Write};

use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::core::proto::Metrics;
use crate::core::session::{Session, Turn};

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command-line options
struct CliArgs {
    /// Display width override
    width: Option<u32>,
    /// Display height override
    height: Option<u32>,
    /// Interpreter command line
    command: Vec<String>,
}

fn print_version() {
    eprintln!("remplay {}", VERSION);
}

fn print_help() {
    eprintln!("remplay {} - a terminal client for RemGlk interpreters", VERSION);
    eprintln!();
    eprintln!("Usage: remplay [OPTIONS] [--] <interpreter> [args...]");
    eprintln!();
    eprintln!("Display options:");
    eprintln!("  -W, --width <COLS>    Display width sent to the interpreter (default: 70)");
    eprintln!("  -H, --height <ROWS>   Display height sent to the interpreter (default: 24)");
    eprintln!();
    eprintln!("Other options:");
    eprintln!("  -v, --version         Show version");
    eprintln!("  -h, --help            Show this help");
    eprintln!();
    eprintln!("With no interpreter on the command line, the `interpreter` entry of");
    eprintln!("~/.remplay/config.toml is used.");
    eprintln!();
    eprintln!("At a char-input prompt, a leading slash escapes special keys:");
    eprintln!("  /space                Send a space");
    eprintln!("  /up, /down, ...       Send a keyword key");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  remplay glulxe story.ulx");
    eprintln!("  remplay -W 80 -- fizmo game.z8");
    eprintln!();
    eprintln!("Configuration: ~/.remplay/config.toml");
    eprintln!("Log file:      ~/.remplay/remplay.log");
}

fn parse_args() -> Result<CliArgs, String> {
    let args: Vec<String> = env::args().collect();
    let mut cli = CliArgs {
        width: None,
        height: None,
        command: Vec::new(),
    };
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-v" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            "-W" | "--width" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing width argument".to_string());
                }
                cli.width = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid width: {}", args[i]))?,
                );
            }
            "-H" | "--height" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing height argument".to_string());
                }
                cli.height = Some(
                    args[i]
                        .parse()
                        .map_err(|_| format!("Invalid height: {}", args[i]))?,
                );
            }
            // Everything after "--" is the interpreter command line
            "--" => {
                cli.command.extend(args[i + 1..].iter().cloned());
                break;
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown argument: {}. Use -h for help.", arg));
            }
            // First bare argument starts the interpreter command line
            _ => {
                cli.command.extend(args[i..].iter().cloned());
                break;
            }
        }
        i += 1;
    }

    Ok(cli)
}

fn main() -> anyhow::Result<()> {
    let cli = match parse_args() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Use --help for usage information");
            std::process::exit(1);
        }
    };

    // Initialize logging to file; stdout belongs to the story text
    let log_path = config::home_dir()
        .map(|home| home.join(".remplay").join("remplay.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("remplay.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    info!("remplay {} starting...", VERSION);

    let file_config = Config::load();

    // Command line overrides the config file
    let command = if !cli.command.is_empty() {
        cli.command
    } else if let Some(ref interpreter) = file_config.interpreter {
        interpreter.split_whitespace().map(str::to_string).collect()
    } else {
        eprintln!("Error: no interpreter command given");
        eprintln!("Use --help for usage information");
        std::process::exit(1);
    };

    let (program, args) = match command.split_first() {
        Some(split) => split,
        None => {
            eprintln!("Error: empty interpreter command");
            std::process::exit(1);
        }
    };

    let metrics = Metrics {
        width: cli.width.unwrap_or(file_config.metrics.width),
        height: cli.height.unwrap_or(file_config.metrics.height),
    };

    info!("interpreter: {} {:?}", program, args);
    info!("metrics: {}x{}", metrics.width, metrics.height);

    let mut session = Session::new(metrics);
    if let Err(e) = session.start(program, args) {
        error!("failed to start interpreter: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let result = run_client(&mut session);
    if let Err(ref e) = result {
        error!("session failed: {}", e);
    }
    result
}

/// Main turn loop: render interpreter output, read one command, respond.
fn run_client(session: &mut Session) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut out = io::stdout();

    while session.is_running() {
        match session.advance(&mut out)? {
            Turn::Exited => break,
            Turn::AwaitingInput => {}
        }
        out.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            info!("stdin closed");
            break;
        }
        let raw = line.trim_end_matches(&['\r', '\n'][..]);
        session.submit(raw)?;
    }

    info!("session ended");
    Ok(())
}
