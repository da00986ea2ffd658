use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};

use underwrite_core::real_estate::underwriting::{self, UnderwritingInput};

use crate::input;

/// Deal assumptions as flags. Anything left out takes the schema default.
#[derive(Args)]
pub struct DealFlags {
    /// Path to JSON/YAML input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Hold period in whole years (1-30)
    #[arg(long)]
    pub hold_years: Option<i32>,

    /// Acquisition costs as a fraction of price (e.g. 0.03)
    #[arg(long)]
    pub acquisition_costs: Option<Decimal>,

    /// Annual gross potential rent
    #[arg(long)]
    pub gross_rent: Option<Decimal>,

    /// Vacancy and collection loss fraction
    #[arg(long)]
    pub vacancy: Option<Decimal>,

    /// Annual rent growth fraction
    #[arg(long, allow_hyphen_values = true)]
    pub rent_growth: Option<Decimal>,

    /// Operating expenses as a fraction of EGI
    #[arg(long)]
    pub opex_pct: Option<Decimal>,

    /// Capital reserve as a fraction of EGI
    #[arg(long)]
    pub capex_reserve: Option<Decimal>,

    /// Loan-to-value against total cost
    #[arg(long)]
    pub ltv: Option<Decimal>,

    /// Annual loan interest rate
    #[arg(long)]
    pub interest_rate: Option<Decimal>,

    /// Amortization term in years (1-30)
    #[arg(long)]
    pub amortization_years: Option<u32>,

    /// Interest-only loan
    #[arg(long)]
    pub interest_only: bool,

    /// Exit capitalisation rate
    #[arg(long)]
    pub exit_cap: Option<Decimal>,

    /// Selling costs at exit as a fraction of value
    #[arg(long)]
    pub exit_costs: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CapRateBasisArg {
    EquityHeuristic,
    PurchasePrice,
}

/// Arguments for full underwriting
#[derive(Args)]
pub struct UnderwriteArgs {
    #[command(flatten)]
    pub deal: DealFlags,

    /// Skip the sensitivity grid
    #[arg(long)]
    pub no_sensitivity: bool,

    /// Denominator for the implied cap rate
    #[arg(long)]
    pub cap_rate_basis: Option<CapRateBasisArg>,
}

/// Arguments for the cashflow projection
#[derive(Args)]
pub struct CashflowArgs {
    #[command(flatten)]
    pub deal: DealFlags,
}

/// Arguments for the sensitivity grid
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub deal: DealFlags,
}

pub fn run_underwrite(args: UnderwriteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let mut uw_input = resolve_input(&args.deal)?;
    if args.no_sensitivity {
        uw_input.include_sensitivity = false;
    }
    if let Some(basis) = args.cap_rate_basis {
        uw_input.cap_rate_basis = match basis {
            CapRateBasisArg::EquityHeuristic => underwriting::CapRateSource::EquityHeuristic,
            CapRateBasisArg::PurchasePrice => underwriting::CapRateSource::PurchasePrice,
        };
    }
    let result = underwriting::underwrite(&uw_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_cashflows(args: CashflowArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let uw_input = resolve_input(&args.deal)?;
    let result = underwriting::project_cashflows(&uw_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let uw_input = resolve_input(&args.deal)?;
    let result = underwriting::sensitivity_analysis(&uw_input)?;
    Ok(serde_json::to_value(result)?)
}

/// File first, then flags when the required ones are present, then stdin.
fn resolve_input(flags: &DealFlags) -> Result<UnderwritingInput, Box<dyn std::error::Error>> {
    if let Some(ref path) = flags.input {
        return input::file::read_document(path);
    }
    if flags.purchase_price.is_some() || flags.gross_rent.is_some() {
        return from_flags(flags);
    }
    if let Some(data) = input::stdin::read_stdin()? {
        return Ok(UnderwritingInput::from_value(data)?);
    }
    Err("--input <file>, stdin, or --purchase-price/--hold-years/--gross-rent required".into())
}

fn from_flags(flags: &DealFlags) -> Result<UnderwritingInput, Box<dyn std::error::Error>> {
    let purchase_price = flags
        .purchase_price
        .ok_or("--purchase-price is required (or provide --input)")?;
    let hold_years = flags
        .hold_years
        .ok_or("--hold-years is required (or provide --input)")?;
    let gross_rent = flags
        .gross_rent
        .ok_or("--gross-rent is required (or provide --input)")?;

    let mut deal = Map::new();
    deal.insert("purchase_price".into(), json!(purchase_price));
    deal.insert("hold_period_years".into(), json!(hold_years));
    put(&mut deal, "acquisition_costs_pct", flags.acquisition_costs);

    let mut income = Map::new();
    income.insert("gross_rent".into(), json!(gross_rent));
    put(&mut income, "vacancy_pct", flags.vacancy);
    put(&mut income, "rent_growth_pct", flags.rent_growth);

    let mut operating = Map::new();
    put(&mut operating, "opex_pct_of_egi", flags.opex_pct);

    let mut capex = Map::new();
    put(&mut capex, "capex_reserve_pct", flags.capex_reserve);

    let mut financing = Map::new();
    put(&mut financing, "ltv_pct", flags.ltv);
    put(&mut financing, "interest_rate_pct", flags.interest_rate);
    if let Some(years) = flags.amortization_years {
        financing.insert("amortization_years".into(), json!(years));
    }
    financing.insert("interest_only".into(), json!(flags.interest_only));

    let mut exit = Map::new();
    put(&mut exit, "exit_cap_rate_pct", flags.exit_cap);
    put(&mut exit, "exit_costs_pct", flags.exit_costs);

    let document = json!({
        "deal": deal,
        "income": income,
        "operating": operating,
        "capex": capex,
        "financing": financing,
        "exit": exit,
    });
    Ok(UnderwritingInput::from_value(document)?)
}

fn put(section: &mut Map<String, Value>, key: &str, value: Option<Decimal>) {
    if let Some(v) = value {
        section.insert(key.into(), json!(v));
    }
}
