mod cli;

use clap::{Parser, Subcommand};
use tracing::{error, Level};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbosity of the program:
    /// -v for info, -vv for debug, and -vvv for trace
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Residue-pair interface labels from bound and unbound structures
    Labels(cli::labels::Args),
    /// Homology-aware train/val/test split of a set of structures
    Split(cli::split::Args),
}

fn main() {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Labels(args) => cli::labels::run(args),
        Commands::Split(args) => cli::split::run(args),
    };
    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}
