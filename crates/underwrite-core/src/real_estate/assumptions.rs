use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, Rate};

/// Flat, already-validated assumptions for one projection run.
///
/// Range checks live in the underwriting boundary; the engine only relies on
/// the values being finite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealAssumptions {
    pub purchase_price: Money,
    /// Whole years. Zero or negative yields an empty projection.
    pub hold_period_years: i32,
    /// Closing costs as a fraction of purchase price
    pub acquisition_cost_pct: Rate,
    /// Annual gross potential rent at acquisition
    pub gross_rent: Money,
    pub vacancy_pct: Rate,
    pub rent_growth_pct: Rate,
    /// Operating expenses as a fraction of effective gross income
    pub opex_pct: Rate,
    /// Capital reserve as a fraction of un-grown effective gross income
    pub capex_reserve_pct: Rate,
    /// Loan-to-value against total acquisition cost
    pub ltv_pct: Rate,
    pub interest_rate: Rate,
    pub amortization_years: u32,
    pub interest_only: bool,
    pub exit_cap_rate: Rate,
    pub exit_cost_pct: Rate,
}

/// Sources of funds at closing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapitalStructure {
    /// Purchase price plus acquisition costs
    pub total_cost: Money,
    pub equity: Money,
    pub loan_amount: Money,
}

impl DealAssumptions {
    pub fn capital_structure(&self) -> CapitalStructure {
        let total_cost = self.purchase_price * (Decimal::ONE + self.acquisition_cost_pct);
        CapitalStructure {
            total_cost,
            equity: total_cost * (Decimal::ONE - self.ltv_pct),
            loan_amount: total_cost * self.ltv_pct,
        }
    }

    pub fn acquisition_costs(&self) -> Money {
        self.purchase_price * self.acquisition_cost_pct
    }

    /// Same deal under a different exit cap rate and rent growth.
    pub fn with_scenario(&self, exit_cap_rate: Rate, rent_growth_pct: Rate) -> Self {
        Self {
            exit_cap_rate,
            rent_growth_pct,
            ..self.clone()
        }
    }
}
