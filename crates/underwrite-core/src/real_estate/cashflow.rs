use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::real_estate::assumptions::DealAssumptions;
use crate::real_estate::loan::{amortize_year, annual_debt_service, LoanTerms};
use crate::types::Money;
use crate::UnderwritingResult;

/// One hold-period year of the projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSnapshot {
    /// 1-based year index
    pub period: u32,
    /// Effective gross income (rent after vacancy, grown)
    pub egi: Money,
    pub opex: Money,
    pub noi: Money,
    pub debt_service: Money,
    pub interest_expense: Money,
    pub principal_amortization: Money,
    pub loan_balance_begin: Money,
    pub loan_balance_end: Money,
    /// Capital reserve outflow
    pub capex: Money,
    /// NOI - debt service - capex
    pub levered_cf: Money,
    /// NOI - capex
    pub unlevered_cf: Money,
    /// Running equity position, starting from -(equity + acquisition costs)
    pub cumulative_equity: Money,
}

/// Project levered and unlevered cashflows with the loan schedule.
///
/// EGI is grown before each year is reported, so year 1 already carries one
/// year of growth. The capital reserve compounds off the un-grown EGI base one
/// step behind income. A hold period of zero or less gives an empty sequence.
pub fn project(assumptions: &DealAssumptions) -> UnderwritingResult<Vec<PeriodSnapshot>> {
    if assumptions.hold_period_years <= 0 {
        return Ok(Vec::new());
    }

    let capital = assumptions.capital_structure();
    let terms = LoanTerms {
        principal: capital.loan_amount,
        annual_rate: assumptions.interest_rate,
        amortization_years: assumptions.amortization_years,
        interest_only: assumptions.interest_only,
    };
    let debt_service = annual_debt_service(&terms)?;

    let growth = Decimal::ONE + assumptions.rent_growth_pct;
    let base_egi = assumptions.gross_rent * (Decimal::ONE - assumptions.vacancy_pct);
    let base_capex = base_egi * assumptions.capex_reserve_pct;

    let mut cumulative_equity = -capital.equity - assumptions.acquisition_costs();
    let mut egi = base_egi;
    let mut capex_growth = Decimal::ONE;
    let mut balance = capital.loan_amount;

    let hold = assumptions.hold_period_years as u32;
    let mut periods = Vec::with_capacity(hold as usize);

    for period in 1..=hold {
        egi *= growth;
        let opex = egi * assumptions.opex_pct;
        let noi = egi - opex;
        let capex = base_capex * capex_growth;
        capex_growth *= growth;

        let loan = amortize_year(
            balance,
            assumptions.interest_rate,
            debt_service,
            assumptions.interest_only,
        );
        balance = loan.balance_end;

        let levered_cf = noi - loan.debt_service - capex;
        let unlevered_cf = noi - capex;
        cumulative_equity += levered_cf;

        periods.push(PeriodSnapshot {
            period,
            egi,
            opex,
            noi,
            debt_service: loan.debt_service,
            interest_expense: loan.interest,
            principal_amortization: loan.principal,
            loan_balance_begin: loan.balance_begin,
            loan_balance_end: loan.balance_end,
            capex,
            levered_cf,
            unlevered_cf,
            cumulative_equity,
        });
    }

    Ok(periods)
}

/// Sum of levered cashflows across the hold.
pub fn total_levered_cashflow(periods: &[PeriodSnapshot]) -> Money {
    periods.iter().map(|p| p.levered_cf).sum()
}
