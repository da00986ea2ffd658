use std::fmt;

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::UnderwritingError;
use crate::types::{Money, Rate};
use crate::UnderwritingResult;

const NPV_TOLERANCE: f64 = 1e-6;
const DERIVATIVE_FLOOR: f64 = 1e-6;
const MAX_IRR_ITERATIONS: u32 = 100;

/// Starting point for the Newton-Raphson search.
pub const DEFAULT_IRR_GUESS: Rate = dec!(0.10);

/// Why the IRR solver stopped without a root.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IrrFailure {
    /// |dNPV/dr| fell below the floor before NPV reached tolerance
    FlatDerivative,
    /// Iteration cap reached without convergence
    IterationLimit,
    /// NPV, its derivative or the next rate was not finite (rate at -100% or runaway)
    NumericOverflow,
}

impl fmt::Display for IrrFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IrrFailure::FlatDerivative => write!(f, "derivative vanished"),
            IrrFailure::IterationLimit => write!(f, "iteration limit reached"),
            IrrFailure::NumericOverflow => write!(f, "numeric overflow while discounting"),
        }
    }
}

/// Outcome of an IRR solve. A failed solve is never reported as a 0% return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IrrSolution {
    Converged { rate: Rate, iterations: u32 },
    Failed { reason: IrrFailure, iterations: u32 },
}

impl IrrSolution {
    pub fn rate(&self) -> Option<Rate> {
        match self {
            IrrSolution::Converged { rate, .. } => Some(*rate),
            IrrSolution::Failed { .. } => None,
        }
    }

    /// Solved rate, or the legacy 0 sentinel when the solver failed.
    pub fn rate_or_zero(&self) -> Rate {
        self.rate().unwrap_or(Decimal::ZERO)
    }

    pub fn is_converged(&self) -> bool {
        matches!(self, IrrSolution::Converged { .. })
    }
}

/// Net Present Value of a series of cash flows (index 0 is undiscounted).
pub fn npv(rate: Rate, cash_flows: &[Money]) -> UnderwritingResult<Money> {
    if rate <= dec!(-1) {
        return Err(UnderwritingError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let mut result = Decimal::ZERO;
    let one_plus_r = Decimal::ONE + rate;
    let mut discount = Decimal::ONE;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount *= one_plus_r;
        }
        if discount.is_zero() {
            return Err(UnderwritingError::DivisionByZero {
                context: format!("NPV discount factor at period {t}"),
            });
        }
        result += cf / discount;
    }

    Ok(result)
}

/// Internal Rate of Return using Newton-Raphson.
///
/// `cash_flows[0]` sits at t=0 (typically the negative equity outlay). Stops as
/// soon as |NPV| < 1e-6; gives up when |dNPV/dr| < 1e-6 or after 100 steps.
/// There is no clamping or bisection fallback.
///
/// The search runs in f64: intermediate steps can visit rates near -100%, where
/// discount factors over a long hold fall far below Decimal's 1e-28 resolution.
/// Only the converged rate is brought back into Decimal.
pub fn irr(cash_flows: &[Money], guess: Rate) -> IrrSolution {
    let (Some(flows), Some(mut rate)) = (to_f64_flows(cash_flows), guess.to_f64()) else {
        return failed(IrrFailure::NumericOverflow, 0);
    };

    for i in 0..MAX_IRR_ITERATIONS {
        let (value, slope) = npv_and_derivative(&flows, rate);
        if !value.is_finite() || !slope.is_finite() {
            return failed(IrrFailure::NumericOverflow, i);
        }

        if value.abs() < NPV_TOLERANCE {
            return match Decimal::from_f64(rate) {
                Some(rate) => IrrSolution::Converged {
                    rate,
                    iterations: i,
                },
                None => failed(IrrFailure::NumericOverflow, i),
            };
        }

        if slope.abs() < DERIVATIVE_FLOOR {
            return failed(IrrFailure::FlatDerivative, i);
        }

        rate -= value / slope;
        if !rate.is_finite() {
            return failed(IrrFailure::NumericOverflow, i);
        }
    }

    failed(IrrFailure::IterationLimit, MAX_IRR_ITERATIONS)
}

fn failed(reason: IrrFailure, iterations: u32) -> IrrSolution {
    log::debug!("IRR solver stopped after {iterations} iterations: {reason}");
    IrrSolution::Failed { reason, iterations }
}

fn to_f64_flows(cash_flows: &[Money]) -> Option<Vec<f64>> {
    cash_flows.iter().map(|cf| cf.to_f64()).collect()
}

/// NPV(r) = sum CF_t / (1+r)^t and dNPV/dr = sum -t * CF_t / (1+r)^(t+1).
/// Non-finite results are left for the caller to detect.
fn npv_and_derivative(cash_flows: &[f64], rate: f64) -> (f64, f64) {
    let one_plus_r = 1.0 + rate;
    let mut value = 0.0;
    let mut slope = 0.0;

    for (t, cf) in cash_flows.iter().enumerate() {
        let compound = one_plus_r.powi(t as i32);
        value += cf / compound;
        if t > 0 {
            slope -= t as f64 * cf / (compound * one_plus_r);
        }
    }

    (value, slope)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_npv_known_value() {
        // -1000 + 1100/1.1 = 0
        let v = npv(dec!(0.10), &[dec!(-1000), dec!(1100)]).unwrap();
        assert_eq!(v, Decimal::ZERO);
    }

    #[test]
    fn test_npv_rejects_rate_at_minus_one() {
        assert!(npv(dec!(-1), &[dec!(-1), dec!(2)]).is_err());
    }

    #[test]
    fn test_irr_single_outflow_single_inflow_recovers_rate() {
        for target in [dec!(0.03), dec!(0.07), dec!(0.18), dec!(0.42)] {
            let flows = [dec!(-250000), dec!(250000) * (Decimal::ONE + target)];
            let rate = irr(&flows, DEFAULT_IRR_GUESS).rate().unwrap();
            assert!(
                (rate - target).abs() < dec!(0.0001),
                "expected {target}, got {rate}"
            );
        }
    }

    #[test]
    fn test_irr_even_annuity() {
        // -1000, +400 x 3 => IRR ~9.70%
        let flows = [dec!(-1000), dec!(400), dec!(400), dec!(400)];
        let solution = irr(&flows, DEFAULT_IRR_GUESS);
        let rate = solution.rate().unwrap();
        assert!((rate - dec!(0.0970)).abs() < dec!(0.001), "got {rate}");
        assert!(npv(rate, &flows).unwrap().abs() < dec!(0.000001));
    }

    #[test]
    fn test_irr_converges_immediately_on_exact_guess() {
        let solution = irr(&[dec!(-100), dec!(110)], dec!(0.10));
        let IrrSolution::Converged { rate, iterations } = solution else {
            panic!("expected convergence, got {solution:?}");
        };
        assert_eq!(iterations, 0);
        assert!((rate - dec!(0.10)).abs() < dec!(0.000000000001), "got {rate}");
    }

    #[test]
    fn test_irr_flat_derivative_fails() {
        // No inflows at all: NPV is constant, derivative is zero
        let solution = irr(&[dec!(-100), dec!(0), dec!(0)], DEFAULT_IRR_GUESS);
        assert_eq!(
            solution,
            IrrSolution::Failed {
                reason: IrrFailure::FlatDerivative,
                iterations: 0
            }
        );
        assert_eq!(solution.rate_or_zero(), Decimal::ZERO);
    }

    #[test]
    fn test_irr_no_sign_change_does_not_converge() {
        let solution = irr(&[dec!(-1), dec!(-1)], DEFAULT_IRR_GUESS);
        assert!(!solution.is_converged());
    }

    #[test]
    fn test_irr_rate_at_minus_one_reports_overflow() {
        let solution = irr(&[dec!(-100), dec!(50)], dec!(-1));
        assert_eq!(
            solution,
            IrrSolution::Failed {
                reason: IrrFailure::NumericOverflow,
                iterations: 0
            }
        );
    }

    #[test]
    fn test_irr_survives_steps_near_minus_one_over_long_series() {
        // 30 years of decaying income; Newton's first step lands near r = -0.84
        let mut flows = vec![dec!(-1100000)];
        let mut income = dec!(50000);
        let mut reserve = dec!(7500);
        for _ in 0..30 {
            income *= dec!(0.9);
            flows.push(income - reserve);
            reserve *= dec!(0.9);
        }
        flows.push(income / dec!(0.12) * dec!(0.9));

        let solution = irr(&flows, DEFAULT_IRR_GUESS);
        let rate = solution.rate().expect("long series should converge");
        assert!(
            (rate - dec!(-0.0792161)).abs() < dec!(0.00001),
            "got {rate} after {solution:?}"
        );
    }

    #[test]
    fn test_solution_serializes_with_status_tag() {
        let json = serde_json::to_value(IrrSolution::Failed {
            reason: IrrFailure::IterationLimit,
            iterations: 100,
        })
        .unwrap();
        assert_eq!(json["status"], "failed");
        assert_eq!(json["reason"], "iteration_limit");
    }
}
