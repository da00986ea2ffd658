use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::UnderwritingError;
use crate::types::{Money, Rate};
use crate::UnderwritingResult;

/// Sale at the end of the hold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExitResult {
    /// Final NOI capitalised at the exit cap rate
    pub exit_value: Money,
    /// Exit value net of selling costs
    pub exit_proceeds: Money,
    /// Proceeds after loan payoff; negative when the loan exceeds proceeds
    pub net_to_equity: Money,
}

/// Capitalise final-year NOI and pay off the remaining loan.
///
/// A zero exit cap rate has no meaningful value and is rejected with
/// `InvalidExitAssumptions` instead of producing a non-finite figure.
pub fn calculate_exit(
    final_noi: Money,
    exit_cap_rate: Rate,
    exit_cost_pct: Rate,
    remaining_loan_balance: Money,
) -> UnderwritingResult<ExitResult> {
    if exit_cap_rate.is_zero() {
        return Err(UnderwritingError::InvalidExitAssumptions {
            reason: "exit cap rate must be non-zero to capitalise final NOI".into(),
        });
    }

    let exit_value = final_noi / exit_cap_rate;
    let exit_proceeds = exit_value * (Decimal::ONE - exit_cost_pct);
    let net_to_equity = exit_proceeds - remaining_loan_balance;

    Ok(ExitResult {
        exit_value,
        exit_proceeds,
        net_to_equity,
    })
}
