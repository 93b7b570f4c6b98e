//! Level-installment (annuity) math and payment breakdown.

use serde::{Deserialize, Serialize};

use crate::errors::{DebtError, Result};

/// Principal/interest components of a single payment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PaymentSplit {
    pub principal_paid: f64,
    pub interest_paid: f64,
}

/// Derives the level monthly installment for a loan.
///
/// Uses the annuity formula `P * r * (1+r)^n / ((1+r)^n - 1)` with the
/// monthly rate `r = annual_rate_percent / 100 / 12`. A zero rate degrades to
/// the straight-line installment `P / n`.
pub fn compute_installment(
    principal: f64,
    annual_rate_percent: f64,
    term_months: u32,
) -> Result<f64> {
    if term_months == 0 {
        return Err(DebtError::Validation(
            "term must be at least one month".into(),
        ));
    }
    if principal <= 0.0 {
        return Err(DebtError::Validation("principal must be positive".into()));
    }
    if annual_rate_percent < 0.0 {
        return Err(DebtError::Validation(
            "interest rate cannot be negative".into(),
        ));
    }

    if annual_rate_percent == 0.0 {
        return Ok(principal / term_months as f64);
    }

    let r = annual_rate_percent / 100.0 / 12.0;
    let factor = (1.0 + r).powi(term_months as i32);
    Ok(principal * r * factor / (factor - 1.0))
}

/// Splits a payment into interest and principal against a balance snapshot.
///
/// Interest accrues one month of the nominal annual rate on the outstanding
/// balance; whatever remains of the payment reduces principal. Both parts are
/// floored at zero, so `principal_paid + interest_paid` equals `amount_paid`
/// whenever the payment covers the accrued interest.
pub fn split_payment(
    current_balance: f64,
    annual_rate_percent: f64,
    amount_paid: f64,
) -> PaymentSplit {
    let interest_paid = (current_balance * annual_rate_percent / 100.0 / 12.0).max(0.0);
    let principal_paid = (amount_paid - interest_paid).max(0.0);
    PaymentSplit {
        principal_paid,
        interest_paid,
    }
}
