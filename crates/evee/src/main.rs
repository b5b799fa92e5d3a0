mod cli;
mod trace;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use log::error;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

/// Evee: inspect and exercise event subscription manifests
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct CliArgs {
    /// Simple ping command for testing
    #[arg(long)]
    ping: bool,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered listeners in dispatch order
    Listeners {
        /// Subscription manifest (.json, .yaml, .yml or .toml)
        manifest: PathBuf,
        /// Only show listeners for this event
        #[arg(long)]
        event: Option<String>,
    },
    /// Dispatch an event through the manifest's subscribers
    Dispatch {
        /// Subscription manifest (.json, .yaml, .yml or .toml)
        manifest: PathBuf,
        /// Name of the event to dispatch
        event: String,
        /// Event argument as KEY=VALUE; VALUE is parsed as JSON when possible
        #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = cli::parse_argument)]
        arguments: Vec<(String, Value)>,
    },
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Already initialized is not fatal
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Commands) -> cli::CliResult<()> {
    match command {
        Commands::Listeners { manifest, event } => cli::list_listeners(&manifest, event.as_deref()),
        Commands::Dispatch {
            manifest,
            event,
            arguments,
        } => cli::dispatch(&manifest, &event, arguments),
    }
}

fn main() -> ExitCode {
    let args = CliArgs::parse();

    if args.ping {
        println!("pong");
        return ExitCode::SUCCESS;
    }

    init_logging(args.verbose);

    let Some(command) = args.command else {
        println!("No command specified. Run with --help for usage.");
        return ExitCode::SUCCESS;
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
