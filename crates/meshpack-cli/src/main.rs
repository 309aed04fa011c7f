//! Meshpack CLI - Convert patterns into packaged Helm charts

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod error;
mod exit_codes;
mod util;

use error::CliError;

#[derive(Parser)]
#[command(name = "meshpack")]
#[command(author = "Meshpack Contributors")]
#[command(version)]
#[command(about = "Convert patterns into packaged Helm charts", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug output
    #[arg(long, global = true)]
    debug: bool,

    /// Working area for intermediate chart files (default: ~/.meshery)
    #[arg(long, global = true, env = "MESHPACK_WORK_DIR")]
    work_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a pattern into a packaged Helm chart
    Convert {
        /// Pattern file
        pattern: PathBuf,

        /// Output file (default: <name>-<version>.tgz)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Print the conversion report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the Kubernetes manifests a pattern renders to
    Render {
        /// Pattern file
        pattern: PathBuf,
    },

    /// Show the metadata and file list of a chart archive
    Inspect {
        /// Archive path (.tgz)
        archive: PathBuf,
    },
}

fn init_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> error::Result<()> {
    match cli.command {
        Commands::Convert {
            pattern,
            output,
            json,
        } => commands::convert::run(&pattern, output.as_deref(), cli.work_dir.as_deref(), json),

        Commands::Render { pattern } => commands::render::run(&pattern),

        Commands::Inspect { archive } => commands::inspect::run(&archive),
    }
}

fn main() {
    // Setup miette for nice error display
    miette::set_panic_hook();

    let cli = Cli::parse();

    if cli.debug {
        // SAFETY: We're the only thread at this point (start of main)
        unsafe { std::env::set_var("RUST_BACKTRACE", "1") };
    }
    init_logging(cli.debug);

    if let Err(err) = run(cli) {
        let code = err.exit_code();
        tracing::debug!(code, "command failed");
        eprintln!("{:?}", miette::Report::new::<CliError>(err));
        std::process::exit(code);
    }
}
