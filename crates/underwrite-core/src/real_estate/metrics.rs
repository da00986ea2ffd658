use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::real_estate::cashflow::{total_levered_cashflow, PeriodSnapshot};
use crate::time_value::{self, IrrSolution, DEFAULT_IRR_GUESS};
use crate::types::{to_pct, Money, Multiple};

/// Equity share assumed when reconstructing a purchase price from equity alone.
const HEURISTIC_EQUITY_SHARE: Decimal = dec!(0.35);

/// Denominator used for the implied cap rate.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum CapRateBasis {
    /// |equity| / 0.35, an approximation kept for output parity
    #[default]
    EquityHeuristic,
    /// The actual purchase price
    PurchasePrice(Money),
}

/// Return metrics for one projection. Percent fields are ratio * 100.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// Levered IRR in percent; 0 when the solver failed (see `irr`)
    pub irr_pct: Decimal,
    /// Solver outcome; absent when there were no periods to solve
    #[serde(skip_serializing_if = "Option::is_none")]
    pub irr: Option<IrrSolution>,
    /// Rounded to 2 dp
    pub equity_multiple: Multiple,
    /// Year-1 levered cashflow over equity
    pub cash_on_cash_pct: Decimal,
    /// Year-1 NOI over year-1 debt service, rounded to 2 dp
    pub dscr: Multiple,
    pub noi_yield_pct: Decimal,
    pub cap_rate_pct: Decimal,
}

/// Metrics with the implied cap rate on the equity heuristic.
///
/// `initial_equity` follows the outflow-negative convention; only its absolute
/// value is used. `exit_proceeds` is appended as its own terminal flow one
/// period after the last year.
pub fn compute_metrics(
    periods: &[PeriodSnapshot],
    initial_equity: Money,
    exit_proceeds: Money,
) -> InvestmentMetrics {
    compute_metrics_with_basis(
        periods,
        initial_equity,
        exit_proceeds,
        CapRateBasis::EquityHeuristic,
    )
}

pub fn compute_metrics_with_basis(
    periods: &[PeriodSnapshot],
    initial_equity: Money,
    exit_proceeds: Money,
    basis: CapRateBasis,
) -> InvestmentMetrics {
    let Some(first) = periods.first() else {
        return InvestmentMetrics::default();
    };

    let equity = initial_equity.abs();

    // t=0 outlay, one flow per year, then exit proceeds as an extra period
    let mut flows = Vec::with_capacity(periods.len() + 2);
    flows.push(-equity);
    flows.extend(periods.iter().map(|p| p.levered_cf));
    flows.push(exit_proceeds);
    let irr = time_value::irr(&flows, DEFAULT_IRR_GUESS);

    let total_proceeds = total_levered_cashflow(periods) + exit_proceeds;
    let equity_multiple = ratio_or_zero(total_proceeds, equity).round_dp(2);
    let cash_on_cash = ratio_or_zero(first.levered_cf, equity);
    let dscr = ratio_or_zero(first.noi, first.debt_service).round_dp(2);
    let noi_yield = ratio_or_zero(first.noi, equity);

    let price = match basis {
        CapRateBasis::EquityHeuristic => equity / HEURISTIC_EQUITY_SHARE,
        CapRateBasis::PurchasePrice(p) => p,
    };
    let cap_rate = ratio_or_zero(first.noi, price);

    InvestmentMetrics {
        irr_pct: to_pct(irr.rate_or_zero()),
        irr: Some(irr),
        equity_multiple,
        cash_on_cash_pct: to_pct(cash_on_cash),
        dscr,
        noi_yield_pct: to_pct(noi_yield),
        cap_rate_pct: to_pct(cap_rate),
    }
}

fn ratio_or_zero(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        Decimal::ZERO
    } else {
        numerator / denominator
    }
}
