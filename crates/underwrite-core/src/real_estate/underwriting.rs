use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::UnderwritingError;
use crate::real_estate::assumptions::{CapitalStructure, DealAssumptions};
use crate::real_estate::cashflow::{project, PeriodSnapshot};
use crate::real_estate::exit::calculate_exit;
use crate::real_estate::metrics::{compute_metrics_with_basis, CapRateBasis, InvestmentMetrics};
use crate::time_value::{self, IrrSolution, DEFAULT_IRR_GUESS};
use crate::types::{to_pct, with_metadata, ComputationOutput, Money, Multiple, Rate};
use crate::UnderwritingResult;

#[cfg(feature = "sensitivity")]
use crate::real_estate::sensitivity::{self, SensitivityPoint};

// ---------------------------------------------------------------------------
// Input schema
// ---------------------------------------------------------------------------

/// Deal setup assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DealSetup {
    pub purchase_price: Money,
    pub hold_period_years: i32,
    #[serde(default = "default_acquisition_costs")]
    pub acquisition_costs_pct: Rate,
}

/// Income assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeAssumptions {
    pub gross_rent: Money,
    #[serde(default = "default_vacancy")]
    pub vacancy_pct: Rate,
    #[serde(default = "default_rent_growth")]
    pub rent_growth_pct: Rate,
}

/// Operating cost assumptions. Only `opex_pct_of_egi` feeds the projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatingCostAssumptions {
    #[serde(default)]
    pub opex_per_sf: Money,
    #[serde(default = "default_opex_pct")]
    pub opex_pct_of_egi: Rate,
    #[serde(default = "default_inflation")]
    pub inflation_pct: Rate,
}

/// Capital expenditure assumptions. `capex_timing` is accepted but unused.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CapexAssumptions {
    #[serde(default = "default_capex_reserve")]
    pub capex_reserve_pct: Rate,
    #[serde(default)]
    pub capex_timing: Vec<Money>,
}

impl Default for CapexAssumptions {
    fn default() -> Self {
        Self {
            capex_reserve_pct: default_capex_reserve(),
            capex_timing: Vec::new(),
        }
    }
}

/// Financing assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinancingAssumptions {
    #[serde(default = "default_ltv")]
    pub ltv_pct: Rate,
    #[serde(default = "default_interest_rate")]
    pub interest_rate_pct: Rate,
    #[serde(default = "default_amortization")]
    pub amortization_years: u32,
    #[serde(default)]
    pub interest_only: bool,
}

/// Exit assumptions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExitAssumptions {
    #[serde(default = "default_exit_cap")]
    pub exit_cap_rate_pct: Rate,
    #[serde(default = "default_exit_costs")]
    pub exit_costs_pct: Rate,
}

/// How the implied cap rate metric reconstructs the property value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CapRateSource {
    /// |equity| / 0.35
    #[default]
    EquityHeuristic,
    /// The deal's purchase price
    PurchasePrice,
}

/// Full underwriting request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwritingInput {
    pub deal: DealSetup,
    pub income: IncomeAssumptions,
    pub operating: OperatingCostAssumptions,
    #[serde(default)]
    pub capex: CapexAssumptions,
    pub financing: FinancingAssumptions,
    pub exit: ExitAssumptions,
    /// Run the exit-cap x rent-growth sweep
    #[serde(default = "default_true")]
    pub include_sensitivity: bool,
    #[serde(default)]
    pub cap_rate_basis: CapRateSource,
}

fn default_acquisition_costs() -> Rate {
    dec!(0.03)
}
fn default_vacancy() -> Rate {
    dec!(0.05)
}
fn default_rent_growth() -> Rate {
    dec!(0.03)
}
fn default_opex_pct() -> Rate {
    dec!(0.35)
}
fn default_inflation() -> Rate {
    dec!(0.025)
}
fn default_capex_reserve() -> Rate {
    dec!(0.05)
}
fn default_ltv() -> Rate {
    dec!(0.65)
}
fn default_interest_rate() -> Rate {
    dec!(0.055)
}
fn default_amortization() -> u32 {
    30
}
fn default_exit_cap() -> Rate {
    dec!(0.05)
}
fn default_exit_costs() -> Rate {
    dec!(0.04)
}
fn default_true() -> bool {
    true
}

impl UnderwritingInput {
    /// Parse a JSON document, applying schema defaults. Malformed input is a
    /// `SerializationError`.
    pub fn from_json(document: &str) -> UnderwritingResult<Self> {
        Ok(serde_json::from_str(document)?)
    }

    pub fn from_value(document: serde_json::Value) -> UnderwritingResult<Self> {
        Ok(serde_json::from_value(document)?)
    }

    /// Flatten the validated sections into engine assumptions.
    pub fn to_assumptions(&self) -> DealAssumptions {
        DealAssumptions {
            purchase_price: self.deal.purchase_price,
            hold_period_years: self.deal.hold_period_years,
            acquisition_cost_pct: self.deal.acquisition_costs_pct,
            gross_rent: self.income.gross_rent,
            vacancy_pct: self.income.vacancy_pct,
            rent_growth_pct: self.income.rent_growth_pct,
            opex_pct: self.operating.opex_pct_of_egi,
            capex_reserve_pct: self.capex.capex_reserve_pct,
            ltv_pct: self.financing.ltv_pct,
            interest_rate: self.financing.interest_rate_pct,
            amortization_years: self.financing.amortization_years,
            interest_only: self.financing.interest_only,
            exit_cap_rate: self.exit.exit_cap_rate_pct,
            exit_cost_pct: self.exit.exit_costs_pct,
        }
    }
}

// ---------------------------------------------------------------------------
// Output schema
// ---------------------------------------------------------------------------

/// Equity / debt split in percent, 1 dp.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquityDebtRatio {
    pub equity_pct: Decimal,
    pub debt_pct: Decimal,
}

/// Full underwriting result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwritingOutput {
    pub cashflows: Vec<PeriodSnapshot>,
    pub metrics: InvestmentMetrics,
    pub purchase_price: Money,
    pub equity_investment: Money,
    pub debt_amount: Money,
    pub exit_value: Money,
    pub exit_proceeds: Money,
    pub net_to_equity: Money,
    pub equity_debt_ratio: EquityDebtRatio,
    #[cfg(feature = "sensitivity")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sensitivity: Option<Vec<SensitivityPoint>>,
}

/// Projection only, with the sources of funds it was built on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionOutput {
    pub capital_structure: CapitalStructure,
    pub cashflows: Vec<PeriodSnapshot>,
}

/// Result of solving IRR over an explicit cash-flow series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrrOutput {
    pub solution: IrrSolution,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr_pct: Option<Decimal>,
    /// NPV at the solved rate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub npv_at_irr: Option<Money>,
    pub multiple: Multiple,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Underwrite an acquisition: validate, project, exit, metrics and
/// (optionally) the exit-cap x rent-growth sensitivity grid.
pub fn underwrite(
    input: &UnderwritingInput,
) -> UnderwritingResult<ComputationOutput<UnderwritingOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    let assumptions = input.to_assumptions();
    let capital = assumptions.capital_structure();
    let periods = project(&assumptions)?;
    collect_projection_warnings(&assumptions, &periods, &mut warnings);

    let (final_noi, loan_balance_at_exit) = match periods.last() {
        Some(last) => (last.noi, last.loan_balance_end),
        None => (Decimal::ZERO, capital.loan_amount),
    };
    let exit = calculate_exit(
        final_noi,
        assumptions.exit_cap_rate,
        assumptions.exit_cost_pct,
        loan_balance_at_exit,
    )?;

    let basis = match input.cap_rate_basis {
        CapRateSource::EquityHeuristic => CapRateBasis::EquityHeuristic,
        CapRateSource::PurchasePrice => CapRateBasis::PurchasePrice(assumptions.purchase_price),
    };
    let metrics = compute_metrics_with_basis(&periods, -capital.equity, exit.net_to_equity, basis);

    if let Some(IrrSolution::Failed { reason, iterations }) = metrics.irr {
        warnings.push(format!(
            "IRR did not converge ({reason} after {iterations} iterations); irr_pct reported as 0"
        ));
    }
    if metrics.dscr > Decimal::ZERO && metrics.dscr < dec!(1.2) {
        warnings.push(format!(
            "Year-1 DSCR of {:.2}x is below 1.20x; lender covenant risk",
            metrics.dscr
        ));
    }
    if exit.net_to_equity < Decimal::ZERO {
        warnings.push(format!(
            "Net proceeds to equity at exit are negative ({:.0}); loan exceeds sale proceeds",
            exit.net_to_equity
        ));
    }

    let equity_debt_ratio = EquityDebtRatio {
        equity_pct: to_pct(Decimal::ONE - assumptions.ltv_pct).round_dp(1),
        debt_pct: to_pct(assumptions.ltv_pct).round_dp(1),
    };

    #[cfg(feature = "sensitivity")]
    let sensitivity = if input.include_sensitivity {
        let points = sensitivity::sweep(&assumptions)?;
        if points.len() < sensitivity::SensitivityGrid::default().cells().len() {
            warnings.push(format!(
                "Sensitivity grid returned {} of 16 cells",
                points.len()
            ));
        }
        Some(points.into_iter().map(round_for_display).collect())
    } else {
        None
    };

    let output = UnderwritingOutput {
        cashflows: periods,
        metrics,
        purchase_price: assumptions.purchase_price,
        equity_investment: capital.equity,
        debt_amount: capital.loan_amount,
        exit_value: exit.exit_value,
        exit_proceeds: exit.exit_proceeds,
        net_to_equity: exit.net_to_equity,
        equity_debt_ratio,
        #[cfg(feature = "sensitivity")]
        sensitivity,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Levered Acquisition Underwriting (Annual Cashflow Projection, Newton-Raphson IRR)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Validate and project without exit or metrics.
pub fn project_cashflows(
    input: &UnderwritingInput,
) -> UnderwritingResult<ComputationOutput<ProjectionOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    let assumptions = input.to_assumptions();
    let cashflows = project(&assumptions)?;
    collect_projection_warnings(&assumptions, &cashflows, &mut warnings);

    let output = ProjectionOutput {
        capital_structure: assumptions.capital_structure(),
        cashflows,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Annual Cashflow Projection with Loan Schedule",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Validate and run only the sensitivity grid, rounded for display.
#[cfg(feature = "sensitivity")]
pub fn sensitivity_analysis(
    input: &UnderwritingInput,
) -> UnderwritingResult<ComputationOutput<Vec<SensitivityPoint>>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input, &mut warnings)?;

    let points: Vec<SensitivityPoint> = sensitivity::sweep(&input.to_assumptions())?
        .into_iter()
        .map(round_for_display)
        .collect();

    let unsolved = points.iter().filter(|p| !p.irr_converged).count();
    if unsolved > 0 {
        warnings.push(format!(
            "IRR did not converge in {unsolved} sensitivity cell(s); those report 0"
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Exit Cap Rate x Rent Growth Sensitivity",
        &serde_json::json!({
            "exit_cap_rates": sensitivity::EXIT_CAP_RATES,
            "rent_growth_rates": sensitivity::RENT_GROWTH_RATES,
        }),
        warnings,
        elapsed,
        points,
    ))
}

/// Solve IRR for an explicit series where `cash_flows[0]` is at t=0.
pub fn solve_irr(cash_flows: &[Money]) -> UnderwritingResult<ComputationOutput<IrrOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if cash_flows.len() < 2 {
        return Err(UnderwritingError::InvalidInput {
            field: "cash_flows".into(),
            reason: "IRR requires at least 2 cash flows".into(),
        });
    }

    let solution = time_value::irr(cash_flows, DEFAULT_IRR_GUESS);
    let npv_at_irr = match solution.rate() {
        Some(rate) => Some(time_value::npv(rate, cash_flows)?),
        None => {
            warnings.push(format!("IRR did not converge: {solution:?}"));
            None
        }
    };

    let invested: Money = cash_flows
        .iter()
        .filter(|cf| cf.is_sign_negative())
        .map(|cf| cf.abs())
        .sum();
    let returned: Money = cash_flows.iter().filter(|cf| cf.is_sign_positive()).sum();
    let multiple = if invested.is_zero() {
        Decimal::ZERO
    } else {
        returned / invested
    };

    let output = IrrOutput {
        solution,
        irr_pct: solution.rate().map(to_pct),
        npv_at_irr,
        multiple,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Newton-Raphson IRR (guess 10%, |NPV| < 1e-6, 100 iterations)",
        &serde_json::json!({ "cash_flows": cash_flows }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_input(input: &UnderwritingInput, warnings: &mut Vec<String>) -> UnderwritingResult<()> {
    check_positive("deal.purchase_price", input.deal.purchase_price)?;
    if !(1..=30).contains(&input.deal.hold_period_years) {
        return Err(UnderwritingError::InvalidInput {
            field: "deal.hold_period_years".into(),
            reason: "Hold period must be between 1 and 30 years".into(),
        });
    }
    check_range(
        "deal.acquisition_costs_pct",
        input.deal.acquisition_costs_pct,
        Decimal::ZERO,
        dec!(0.10),
    )?;

    check_positive("income.gross_rent", input.income.gross_rent)?;
    check_range("income.vacancy_pct", input.income.vacancy_pct, Decimal::ZERO, dec!(0.30))?;
    check_range(
        "income.rent_growth_pct",
        input.income.rent_growth_pct,
        dec!(-0.10),
        dec!(0.15),
    )?;

    if input.operating.opex_per_sf < Decimal::ZERO {
        return Err(UnderwritingError::InvalidInput {
            field: "operating.opex_per_sf".into(),
            reason: "Must be non-negative".into(),
        });
    }
    check_range(
        "operating.opex_pct_of_egi",
        input.operating.opex_pct_of_egi,
        Decimal::ZERO,
        dec!(0.60),
    )?;
    check_range(
        "operating.inflation_pct",
        input.operating.inflation_pct,
        Decimal::ZERO,
        dec!(0.10),
    )?;

    check_range(
        "capex.capex_reserve_pct",
        input.capex.capex_reserve_pct,
        Decimal::ZERO,
        dec!(0.15),
    )?;

    check_range("financing.ltv_pct", input.financing.ltv_pct, Decimal::ZERO, dec!(0.90))?;
    check_range(
        "financing.interest_rate_pct",
        input.financing.interest_rate_pct,
        Decimal::ZERO,
        dec!(0.15),
    )?;
    if !(1..=30).contains(&input.financing.amortization_years) {
        return Err(UnderwritingError::InvalidInput {
            field: "financing.amortization_years".into(),
            reason: "Amortization must be between 1 and 30 years".into(),
        });
    }

    check_range(
        "exit.exit_cap_rate_pct",
        input.exit.exit_cap_rate_pct,
        dec!(0.02),
        dec!(0.12),
    )?;
    check_range("exit.exit_costs_pct", input.exit.exit_costs_pct, Decimal::ZERO, dec!(0.10))?;

    // --- Accepted but not modelled ---
    if !input.operating.opex_per_sf.is_zero() {
        warnings.push(
            "operating.opex_per_sf is not applied; expenses use opex_pct_of_egi only".into(),
        );
    }
    if input.operating.inflation_pct != default_inflation() {
        warnings.push(
            "operating.inflation_pct is not applied; expenses scale with EGI growth".into(),
        );
    }
    if !input.capex.capex_timing.is_empty() {
        warnings.push("capex.capex_timing is not applied; reserve uses capex_reserve_pct".into());
    }

    Ok(())
}

fn check_positive(field: &str, value: Decimal) -> UnderwritingResult<()> {
    if value <= Decimal::ZERO {
        return Err(UnderwritingError::InvalidInput {
            field: field.into(),
            reason: "Must be positive".into(),
        });
    }
    Ok(())
}

fn check_range(field: &str, value: Decimal, min: Decimal, max: Decimal) -> UnderwritingResult<()> {
    if value < min || value > max {
        return Err(UnderwritingError::InvalidInput {
            field: field.into(),
            reason: format!("Must be between {min} and {max}, got {value}"),
        });
    }
    Ok(())
}

fn collect_projection_warnings(
    assumptions: &DealAssumptions,
    periods: &[PeriodSnapshot],
    warnings: &mut Vec<String>,
) {
    if assumptions.interest_only || assumptions.capital_structure().loan_amount.is_zero() {
        return;
    }
    if let Some(paid_off) = periods
        .iter()
        .find(|p| p.loan_balance_end.is_zero() && p.period < periods.len() as u32)
    {
        warnings.push(format!(
            "Loan is fully repaid in year {}; later years still carry the fixed debt service",
            paid_off.period
        ));
    }
}

#[cfg(feature = "sensitivity")]
fn round_for_display(point: SensitivityPoint) -> SensitivityPoint {
    SensitivityPoint {
        irr_pct: point.irr_pct.round_dp(2),
        equity_multiple: point.equity_multiple.round_dp(2),
        cash_on_cash_pct: point.cash_on_cash_pct.round_dp(1),
        net_profit: point.net_profit.round_dp(0),
        ..point
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> UnderwritingInput {
        serde_json::from_value(serde_json::json!({
            "deal": { "purchase_price": "1000000", "hold_period_years": 5 },
            "income": { "gross_rent": "100000" },
            "operating": {},
            "financing": {},
            "exit": {}
        }))
        .unwrap()
    }

    #[test]
    fn test_malformed_document_is_serialization_error() {
        let err = UnderwritingInput::from_json(r#"{"deal": {"purchase_price": "1000000"}}"#)
            .unwrap_err();
        assert!(matches!(err, UnderwritingError::SerializationError(_)), "{err:?}");
        assert!(UnderwritingInput::from_json("not json").is_err());
    }

    #[test]
    fn test_from_value_applies_defaults() {
        let input = UnderwritingInput::from_value(serde_json::json!({
            "deal": { "purchase_price": "1000000", "hold_period_years": 5 },
            "income": { "gross_rent": "100000" },
            "operating": {},
            "financing": {},
            "exit": {}
        }))
        .unwrap();
        assert_eq!(input.financing.ltv_pct, dec!(0.65));
    }

    #[test]
    fn test_defaults_fill_missing_sections() {
        let input = sample_input();
        assert_eq!(input.deal.acquisition_costs_pct, dec!(0.03));
        assert_eq!(input.income.vacancy_pct, dec!(0.05));
        assert_eq!(input.operating.opex_pct_of_egi, dec!(0.35));
        assert_eq!(input.capex.capex_reserve_pct, dec!(0.05));
        assert_eq!(input.financing.ltv_pct, dec!(0.65));
        assert_eq!(input.financing.amortization_years, 30);
        assert!(!input.financing.interest_only);
        assert_eq!(input.exit.exit_cap_rate_pct, dec!(0.05));
        assert!(input.include_sensitivity);
        assert_eq!(input.cap_rate_basis, CapRateSource::EquityHeuristic);
    }

    #[test]
    fn test_underwrite_headline_figures() {
        let result = underwrite(&sample_input()).unwrap();
        let out = &result.result;
        assert_eq!(out.equity_investment, dec!(360500));
        assert_eq!(out.debt_amount, dec!(669500));
        assert_eq!(out.cashflows.len(), 5);
        assert_eq!(out.equity_debt_ratio.equity_pct, dec!(35.0));
        assert_eq!(out.equity_debt_ratio.debt_pct, dec!(65.0));
        assert_eq!(
            out.exit_value,
            out.cashflows.last().unwrap().noi / dec!(0.05)
        );
        assert_eq!(
            out.net_to_equity,
            out.exit_proceeds - out.cashflows.last().unwrap().loan_balance_end
        );
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
    }

    #[cfg(feature = "sensitivity")]
    #[test]
    fn test_sensitivity_is_rounded_for_display() {
        let result = underwrite(&sample_input()).unwrap();
        let points = result.result.sensitivity.as_ref().unwrap();
        assert_eq!(points.len(), 16);
        for p in points {
            assert_eq!(p.irr_pct, p.irr_pct.round_dp(2));
            assert_eq!(p.cash_on_cash_pct, p.cash_on_cash_pct.round_dp(1));
            assert_eq!(p.net_profit, p.net_profit.round_dp(0));
        }
    }

    #[cfg(feature = "sensitivity")]
    #[test]
    fn test_sensitivity_can_be_disabled() {
        let mut input = sample_input();
        input.include_sensitivity = false;
        let result = underwrite(&input).unwrap();
        assert!(result.result.sensitivity.is_none());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json["result"].get("sensitivity").is_none());
    }

    #[test]
    fn test_purchase_price_cap_rate_basis() {
        let mut input = sample_input();
        input.cap_rate_basis = CapRateSource::PurchasePrice;
        let out = underwrite(&input).unwrap().result;
        // 63,602.5 / 1,000,000
        assert_eq!(out.metrics.cap_rate_pct, dec!(6.36025));
    }

    #[test]
    fn test_rejects_out_of_range_ltv() {
        let mut input = sample_input();
        input.financing.ltv_pct = dec!(0.95);
        match underwrite(&input) {
            Err(UnderwritingError::InvalidInput { field, .. }) => {
                assert_eq!(field, "financing.ltv_pct")
            }
            other => panic!("expected InvalidInput, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_hold_period_outside_bounds() {
        for hold in [0, 31] {
            let mut input = sample_input();
            input.deal.hold_period_years = hold;
            assert!(underwrite(&input).is_err());
        }
    }

    #[test]
    fn test_rejects_low_exit_cap() {
        let mut input = sample_input();
        input.exit.exit_cap_rate_pct = dec!(0.01);
        assert!(underwrite(&input).is_err());
    }

    #[test]
    fn test_unmodelled_inputs_warn() {
        let mut input = sample_input();
        input.operating.opex_per_sf = dec!(4.5);
        input.capex.capex_timing = vec![dec!(10000)];
        let result = underwrite(&input).unwrap();
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_early_payoff_warns() {
        let mut input = sample_input();
        input.financing.amortization_years = 2;
        input.deal.hold_period_years = 5;
        let result = project_cashflows(&input).unwrap();
        assert!(result
            .warnings
            .iter()
            .any(|w| w.contains("fully repaid")));
    }

    #[test]
    fn test_solve_irr_requires_two_flows() {
        assert!(solve_irr(&[dec!(-100)]).is_err());
    }

    #[test]
    fn test_solve_irr_reports_rate_and_multiple() {
        let out = solve_irr(&[dec!(-100), dec!(0), dec!(121)]).unwrap().result;
        let pct = out.irr_pct.unwrap();
        assert!((pct - dec!(10)).abs() < dec!(0.01), "irr {pct}");
        assert_eq!(out.multiple, dec!(1.21));
        assert!(out.npv_at_irr.unwrap().abs() < dec!(0.000001));
    }
}
