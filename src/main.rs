use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueHint};
use tracing_subscriber::EnvFilter;

use lap_delta::align::DEFAULT_RESOLUTION;
use lap_delta::config::CompareConfig;
use lap_delta::model::SessionType;

#[derive(Parser, Debug)]
#[command(author, version, about = "Compare two F1 drivers' fastest laps.", long_about = None)]
struct Cli {
    /// Year of the Grand Prix
    #[arg(long)]
    year: u16,

    /// Grand Prix name (e.g. "Monaco")
    #[arg(long)]
    event: String,

    /// Session type
    #[arg(long, value_enum, ignore_case = true)]
    session: SessionType,

    /// First driver code (e.g. "VER"); deltas are driver1 minus driver2
    #[arg(long)]
    driver1: String,

    /// Second driver code (e.g. "HAM")
    #[arg(long)]
    driver2: String,

    /// Directory holding the session archives
    #[arg(long, default_value = "data", value_hint = ValueHint::DirPath)]
    data_dir: PathBuf,

    /// Output figure path; a .svg extension selects vector output
    #[arg(short, long, default_value = "comparison.png", value_hint = ValueHint::FilePath)]
    output: PathBuf,

    /// Distance grid resolution for the delta curve
    #[arg(long, default_value_t = DEFAULT_RESOLUTION)]
    resolution: usize,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let cfg = CompareConfig {
        year: cli.year,
        event: cli.event,
        session: cli.session,
        driver1: cli.driver1.to_ascii_uppercase(),
        driver2: cli.driver2.to_ascii_uppercase(),
        data_dir: cli.data_dir,
        output: cli.output,
        resolution: cli.resolution,
    };

    if let Err(err) = lap_delta::run(&cfg) {
        eprintln!("\nError: {:#}", err);
        eprintln!("Check your inputs and try again. Common issues:");
        eprintln!("- Invalid driver codes (use 3-letter abbreviations)");
        eprintln!("- Session not found (Q, R, FP1, FP2, FP3)");
        eprintln!("- Grand Prix name must match the archive's event name");
        eprintln!(
            "- No session archive under {} for that year/event/session",
            cfg.data_dir.display()
        );
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
