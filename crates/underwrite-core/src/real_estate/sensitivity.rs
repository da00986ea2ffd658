use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::real_estate::assumptions::DealAssumptions;
use crate::real_estate::cashflow::{project, total_levered_cashflow};
use crate::real_estate::exit::calculate_exit;
use crate::real_estate::metrics::compute_metrics;
use crate::types::{Money, Multiple, Rate};
use crate::UnderwritingResult;

pub const EXIT_CAP_RATES: [Rate; 4] = [dec!(0.04), dec!(0.05), dec!(0.06), dec!(0.07)];
pub const RENT_GROWTH_RATES: [Rate; 4] = [dec!(0.02), dec!(0.03), dec!(0.04), dec!(0.05)];

/// The two axes of the sweep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityGrid {
    /// Outer axis
    pub exit_cap_rates: Vec<Rate>,
    /// Inner axis
    pub rent_growth_rates: Vec<Rate>,
}

impl Default for SensitivityGrid {
    fn default() -> Self {
        Self {
            exit_cap_rates: EXIT_CAP_RATES.to_vec(),
            rent_growth_rates: RENT_GROWTH_RATES.to_vec(),
        }
    }
}

impl SensitivityGrid {
    /// (exit cap, rent growth) pairs, exit cap outermost.
    pub fn cells(&self) -> Vec<(Rate, Rate)> {
        self.exit_cap_rates
            .iter()
            .flat_map(|&exit| self.rent_growth_rates.iter().map(move |&growth| (exit, growth)))
            .collect()
    }
}

/// Outcome of one grid cell at full precision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub exit_cap_rate: Rate,
    pub rent_growth: Rate,
    pub irr_pct: Decimal,
    /// False when the IRR solver failed and `irr_pct` is the 0 sentinel
    pub irr_converged: bool,
    pub equity_multiple: Multiple,
    pub cash_on_cash_pct: Decimal,
    /// Levered cashflows plus net exit equity, less equity invested
    pub net_profit: Money,
}

/// Sweep the default 4x4 grid of exit cap rates and rent growth.
pub fn sweep(assumptions: &DealAssumptions) -> UnderwritingResult<Vec<SensitivityPoint>> {
    sweep_grid(assumptions, &SensitivityGrid::default())
}

/// Re-run projection, exit and metrics for every cell of `grid`.
///
/// Cells whose projection is empty are left out. Results are in grid order
/// regardless of how the cells were scheduled.
pub fn sweep_grid(
    assumptions: &DealAssumptions,
    grid: &SensitivityGrid,
) -> UnderwritingResult<Vec<SensitivityPoint>> {
    let cells = grid.cells();

    #[cfg(feature = "parallel")]
    let evaluated: Vec<Option<SensitivityPoint>> = cells
        .par_iter()
        .map(|&(exit, growth)| evaluate_cell(assumptions, exit, growth))
        .collect::<UnderwritingResult<_>>()?;

    #[cfg(not(feature = "parallel"))]
    let evaluated: Vec<Option<SensitivityPoint>> = cells
        .iter()
        .map(|&(exit, growth)| evaluate_cell(assumptions, exit, growth))
        .collect::<UnderwritingResult<_>>()?;

    Ok(evaluated.into_iter().flatten().collect())
}

/// One independent pipeline run with the cell's exit cap and rent growth.
pub fn evaluate_cell(
    assumptions: &DealAssumptions,
    exit_cap_rate: Rate,
    rent_growth: Rate,
) -> UnderwritingResult<Option<SensitivityPoint>> {
    let scenario = assumptions.with_scenario(exit_cap_rate, rent_growth);
    let periods = project(&scenario)?;
    let Some(last) = periods.last() else {
        log::trace!("sensitivity cell ({exit_cap_rate}, {rent_growth}) has no periods; skipped");
        return Ok(None);
    };

    let equity = scenario.capital_structure().equity;
    let exit = calculate_exit(
        last.noi,
        exit_cap_rate,
        scenario.exit_cost_pct,
        last.loan_balance_end,
    )?;
    let metrics = compute_metrics(&periods, -equity, exit.net_to_equity);
    let net_profit = total_levered_cashflow(&periods) + exit.net_to_equity - equity;

    log::trace!(
        "sensitivity cell ({exit_cap_rate}, {rent_growth}): irr {}%, net profit {net_profit}",
        metrics.irr_pct
    );

    Ok(Some(SensitivityPoint {
        exit_cap_rate,
        rent_growth,
        irr_pct: metrics.irr_pct,
        irr_converged: metrics.irr.is_some_and(|s| s.is_converged()),
        equity_multiple: metrics.equity_multiple,
        cash_on_cash_pct: metrics.cash_on_cash_pct,
        net_profit,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_deal() -> DealAssumptions {
        DealAssumptions {
            purchase_price: dec!(1000000),
            hold_period_years: 5,
            acquisition_cost_pct: dec!(0.03),
            gross_rent: dec!(100000),
            vacancy_pct: dec!(0.05),
            rent_growth_pct: dec!(0.03),
            opex_pct: dec!(0.35),
            capex_reserve_pct: dec!(0.05),
            ltv_pct: dec!(0.65),
            interest_rate: dec!(0.055),
            amortization_years: 30,
            interest_only: false,
            exit_cap_rate: dec!(0.05),
            exit_cost_pct: dec!(0.04),
        }
    }

    #[test]
    fn test_cells_order_exit_outer_growth_inner() {
        let cells = SensitivityGrid::default().cells();
        assert_eq!(cells.len(), 16);
        assert_eq!(cells[0], (dec!(0.04), dec!(0.02)));
        assert_eq!(cells[1], (dec!(0.04), dec!(0.03)));
        assert_eq!(cells[4], (dec!(0.05), dec!(0.02)));
        assert_eq!(cells[15], (dec!(0.07), dec!(0.05)));
    }

    #[test]
    fn test_full_grid_for_valid_deal() {
        let points = sweep(&sample_deal()).unwrap();
        assert_eq!(points.len(), 16);
        let order: Vec<(Rate, Rate)> = points
            .iter()
            .map(|p| (p.exit_cap_rate, p.rent_growth))
            .collect();
        assert_eq!(order, SensitivityGrid::default().cells());
    }

    #[test]
    fn test_empty_projection_skips_every_cell() {
        let mut deal = sample_deal();
        deal.hold_period_years = 0;
        assert!(sweep(&deal).unwrap().is_empty());
    }

    #[test]
    fn test_cell_matches_manual_pipeline() {
        let deal = sample_deal();
        let point = evaluate_cell(&deal, dec!(0.05), dec!(0.03)).unwrap().unwrap();

        // The base deal already uses 5% exit / 3% growth
        let periods = project(&deal).unwrap();
        let last = periods.last().unwrap();
        let exit = calculate_exit(last.noi, dec!(0.05), dec!(0.04), last.loan_balance_end).unwrap();
        let equity = deal.capital_structure().equity;
        let metrics = compute_metrics(&periods, -equity, exit.net_to_equity);

        assert_eq!(point.irr_pct, metrics.irr_pct);
        assert_eq!(point.equity_multiple, metrics.equity_multiple);
        assert_eq!(
            point.net_profit,
            total_levered_cashflow(&periods) + exit.net_to_equity - equity
        );
        assert!(point.irr_converged);
    }

    #[test]
    fn test_lower_exit_cap_raises_profit() {
        let points = sweep(&sample_deal()).unwrap();
        // Same growth (2%), exit cap 4% vs 7%
        assert!(points[0].net_profit > points[12].net_profit);
        assert!(points[0].irr_pct > points[12].irr_pct);
    }

    #[test]
    fn test_higher_growth_raises_profit() {
        let points = sweep(&sample_deal()).unwrap();
        for row in points.chunks(4) {
            for pair in row.windows(2) {
                assert!(pair[1].net_profit > pair[0].net_profit);
            }
        }
    }

    #[test]
    fn test_custom_grid() {
        let grid = SensitivityGrid {
            exit_cap_rates: vec![dec!(0.055)],
            rent_growth_rates: vec![dec!(0.0), dec!(0.01)],
        };
        let points = sweep_grid(&sample_deal(), &grid).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[1].rent_growth, dec!(0.01));
    }
}
