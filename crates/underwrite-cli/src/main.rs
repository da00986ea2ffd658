mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::irr::IrrArgs;
use commands::underwriting::{CashflowArgs, SensitivityArgs, UnderwriteArgs};

/// Real-estate acquisition underwriting
#[derive(Parser)]
#[command(
    name = "uw",
    version,
    about = "Real-estate acquisition underwriting",
    long_about = "Project levered and unlevered cashflows for a property acquisition, \
                  derive IRR, equity multiple, cash-on-cash and DSCR, and sweep \
                  exit cap rate against rent growth. All figures use decimal precision."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Full underwriting: cashflows, exit, metrics and sensitivity grid
    Underwrite(UnderwriteArgs),
    /// Year-by-year cashflow projection with loan schedule
    Cashflows(CashflowArgs),
    /// Exit cap rate x rent growth sensitivity grid
    Sensitivity(SensitivityArgs),
    /// Solve IRR for an explicit cash-flow series
    Irr(IrrArgs),
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

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Underwrite(args) => commands::underwriting::run_underwrite(args),
        Commands::Cashflows(args) => commands::underwriting::run_cashflows(args),
        Commands::Sensitivity(args) => commands::underwriting::run_sensitivity(args),
        Commands::Irr(args) => commands::irr::run_irr(args),
        Commands::Version => {
            println!("uw {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {e:?}");
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
