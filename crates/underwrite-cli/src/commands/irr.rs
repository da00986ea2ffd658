use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use underwrite_core::real_estate::underwriting;

use crate::input;

/// Arguments for IRR on an explicit series
#[derive(Args)]
pub struct IrrArgs {
    /// Path to JSON/YAML input file with a `cash_flows` array
    #[arg(long)]
    pub input: Option<String>,

    /// Periodic cash flows, t=0 first (comma-separated, e.g. "-100,30,30,130")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub cash_flows: Option<Vec<Decimal>>,
}

#[derive(Deserialize)]
struct IrrInput {
    cash_flows: Vec<Decimal>,
}

pub fn run_irr(args: IrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let flows: Vec<Decimal> = if let Some(ref path) = args.input {
        input::file::read_document::<IrrInput>(path)?.cash_flows
    } else if let Some(flows) = args.cash_flows {
        flows
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value::<IrrInput>(data)?.cash_flows
    } else {
        return Err("--cash-flows, --input <file> or stdin required for IRR".into());
    };

    let result = underwriting::solve_irr(&flows)?;
    Ok(serde_json::to_value(result)?)
}
