use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwritingError;
use crate::types::{Money, Rate};
use crate::UnderwritingResult;

/// Terms of the single acquisition loan.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub annual_rate: Rate,
    pub amortization_years: u32,
    pub interest_only: bool,
}

/// One year of the loan schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LoanYear {
    pub balance_begin: Money,
    pub interest: Money,
    pub principal: Money,
    pub balance_end: Money,
    /// Always `interest + principal`
    pub debt_service: Money,
}

/// Fixed annual debt service for the life of the loan.
///
/// Interest-only: principal * rate. Amortizing: twelve monthly annuity
/// payments. The figure does not change when the hold period is shorter
/// than the amortization term.
pub fn annual_debt_service(terms: &LoanTerms) -> UnderwritingResult<Money> {
    if terms.interest_only {
        return Ok(terms.principal * terms.annual_rate);
    }

    let monthly_rate = terms.annual_rate / dec!(12);
    let total_months = terms.amortization_years * 12;
    let payment = monthly_payment(terms.principal, monthly_rate, total_months)?;
    Ok(payment * dec!(12))
}

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
pub fn monthly_payment(
    principal: Money,
    monthly_rate: Rate,
    total_months: u32,
) -> UnderwritingResult<Money> {
    if principal.is_zero() {
        return Ok(Decimal::ZERO);
    }

    if total_months == 0 {
        return Err(UnderwritingError::DivisionByZero {
            context: "monthly payment with zero amortization months".into(),
        });
    }

    if monthly_rate.is_zero() {
        // Interest-free: straight-line amortisation
        return Ok(principal / Decimal::from(total_months));
    }

    // (1 + r)^n via iterative multiplication
    let mut compound = Decimal::ONE;
    for _ in 0..total_months {
        compound *= Decimal::ONE + monthly_rate;
    }

    let numerator = principal * monthly_rate * compound;
    let denominator = compound - Decimal::ONE;

    if denominator.is_zero() {
        return Err(UnderwritingError::DivisionByZero {
            context: "mortgage payment denominator".into(),
        });
    }

    Ok(numerator / denominator)
}

/// Roll the balance forward one year against a fixed annual payment.
///
/// Interest accrues on the opening balance at the annual rate; the rest of the
/// payment retires principal. The closing balance is floored at zero, but once
/// it reaches zero later years still report `principal = annual_debt_service`.
pub fn amortize_year(
    balance_begin: Money,
    annual_rate: Rate,
    annual_debt_service: Money,
    interest_only: bool,
) -> LoanYear {
    let interest = balance_begin * annual_rate;
    let principal = if interest_only {
        Decimal::ZERO
    } else {
        annual_debt_service - interest
    };
    let balance_end = (balance_begin - principal).max(Decimal::ZERO);

    LoanYear {
        balance_begin,
        interest,
        principal,
        balance_end,
        debt_service: interest + principal,
    }
}
