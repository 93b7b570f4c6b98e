//! Numerical inversion of the annuity formula: recover the interest rate when
//! only the installment is known.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{DebtError, Result};

const INITIAL_GUESS: f64 = 0.005;
const MIN_RATE: f64 = 0.001;
const DERIVATIVE_FLOOR: f64 = 1e-7;
const STEP_TOLERANCE: f64 = 1e-4;
const MAX_ITERATIONS: u32 = 100;

/// How much to trust a recovered rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RateConfidence {
    /// The inversion converged (or the loan is genuinely zero-interest).
    Reliable,
    /// The installment cannot amortize the loan, the iteration failed to
    /// converge, or the result fell outside [0, 100]%. The rate is reported
    /// as 0% and should not be mistaken for a zero-interest loan.
    Degenerate,
}

/// Result of an installment-to-rate inversion.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateEstimate {
    /// Nominal annual rate in percent.
    pub annual_rate_percent: f64,
    pub confidence: RateConfidence,
}

impl RateEstimate {
    fn reliable(annual_rate_percent: f64) -> Self {
        Self {
            annual_rate_percent,
            confidence: RateConfidence::Reliable,
        }
    }

    fn degenerate() -> Self {
        Self {
            annual_rate_percent: 0.0,
            confidence: RateConfidence::Degenerate,
        }
    }

    pub fn is_reliable(&self) -> bool {
        self.confidence == RateConfidence::Reliable
    }
}

/// Recovers the nominal annual rate from principal, installment, and term by
/// Newton-Raphson on the monthly rate.
///
/// A zero-interest loan is detected without iteration when the installment
/// matches `principal / term` to within a cent. An installment below the
/// straight-line floor can never amortize the loan; the estimate is then 0%
/// with [`RateConfidence::Degenerate`], as it is on non-convergence or an
/// out-of-range result.
pub fn invert_rate(principal: f64, installment: f64, term_months: u32) -> Result<RateEstimate> {
    if term_months == 0 {
        return Err(DebtError::Validation(
            "term must be at least one month".into(),
        ));
    }
    if principal <= 0.0 {
        return Err(DebtError::Validation("principal must be positive".into()));
    }
    if installment <= 0.0 {
        return Err(DebtError::Validation(
            "installment must be positive".into(),
        ));
    }

    let n = term_months as f64;
    let straight_line = principal / n;
    if (installment - straight_line).abs() < 0.01 {
        return Ok(RateEstimate::reliable(0.0));
    }
    if installment <= straight_line * 0.99 {
        warn!(
            installment,
            straight_line, "installment below amortization floor, rate unrecoverable"
        );
        return Ok(RateEstimate::degenerate());
    }

    let mut r = INITIAL_GUESS;
    let mut converged = false;
    for _ in 0..MAX_ITERATIONS {
        let factor = (1.0 + r).powf(n);
        let denominator = factor - 1.0;
        let f = principal * r * factor / denominator - installment;
        // d/dr of P * r (1+r)^n / ((1+r)^n - 1), closed form.
        let d_factor = n * (1.0 + r).powf(n - 1.0);
        let derivative = principal * (factor * denominator - r * d_factor) / denominator.powi(2);
        if derivative.abs() < DERIVATIVE_FLOOR {
            break;
        }
        let step = f / derivative;
        let next = r - step;
        if next <= 0.0 {
            r = MIN_RATE;
            continue;
        }
        r = next;
        if step.abs() < STEP_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(principal, installment, term_months, "rate inversion did not converge");
        return Ok(RateEstimate::degenerate());
    }

    let annual_rate_percent = r * 12.0 * 100.0;
    if !(0.0..=100.0).contains(&annual_rate_percent) {
        warn!(annual_rate_percent, "rate inversion produced out-of-range result");
        return Ok(RateEstimate::degenerate());
    }
    Ok(RateEstimate::reliable(annual_rate_percent))
}
