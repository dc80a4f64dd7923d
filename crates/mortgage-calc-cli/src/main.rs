mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::env;
use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use commands::dscr::DscrArgs;
use commands::refinance::RefinanceArgs;
use commands::schedule::ScheduleArgs;

/// DSCR and refinance mortgage calculators
#[derive(Parser)]
#[command(
    name = "mcalc",
    version,
    about = "DSCR and refinance mortgage calculators",
    long_about = "Evaluate rental-property DSCR qualification and compare a refinance \
                  against the current loan, with decimal precision. Field values are \
                  accepted as free text (\"$2,500\") and normalized the same way the \
                  website calculators do."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Calculator configuration file (JSON, or YAML by extension)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Debt Service Coverage Ratio and qualification tier
    Dscr(DscrArgs),
    /// Compare a refinance against the current loan
    Refinance(RefinanceArgs),
    /// Month-by-month amortization schedule
    Schedule(ScheduleArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

/// Logs go to stderr so stdout stays machine-readable. `MCALC_LOG` sets the
/// filter (default `warn`); `MCALC_LOG_JSON=1` switches to JSON lines.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("MCALC_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let log_json = matches!(
        env::var("MCALC_LOG_JSON").as_deref(),
        Ok("1") | Ok("true") | Ok("TRUE") | Ok("yes")
    );

    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    let config = match input::config::load_config(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Dscr(args) => commands::dscr::run_dscr(args, &config),
        Commands::Refinance(args) => commands::refinance::run_refinance(args, &config),
        Commands::Schedule(args) => commands::schedule::run_schedule(args),
        Commands::Version => {
            println!("mcalc {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            tracing::debug!(error = %e, "command failed");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
