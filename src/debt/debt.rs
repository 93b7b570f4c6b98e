use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::schedule::months_after;
use crate::errors::{DebtError, Result};
use crate::math::{compute_installment, invert_rate};

/// Balance at or below this threshold counts as paid off.
pub const PAID_OFF_THRESHOLD: f64 = 0.01;

/// Spread added to the nominal rate to approximate the effective annual rate.
const RRSO_SPREAD: f64 = 0.5;

/// A tracked personal debt and its repayment state.
///
/// The balance/lifecycle invariants are maintained by [`Debt::apply_payment`]
/// and [`Debt::reverse_payment`]: `is_active` holds exactly while
/// `current_balance` exceeds [`PAID_OFF_THRESHOLD`], and `next_payment_date`
/// is present only while active.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Debt {
    pub id: Uuid,
    pub name: String,
    pub principal_amount: f64,
    pub current_balance: f64,
    /// Nominal annual rate in percent.
    pub interest_rate: f64,
    /// Effective annual rate in percent (nominal + fee spread).
    pub rrso: f64,
    pub total_installments: u32,
    pub paid_installments: u32,
    pub installment_amount: f64,
    pub start_date: NaiveDate,
    pub next_payment_date: Option<NaiveDate>,
    pub end_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creditor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_account_id: Option<Uuid>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Inputs shared by both debt entry modes.
#[derive(Debug, Clone)]
pub struct NewDebt {
    pub name: String,
    pub principal: f64,
    pub term_months: u32,
    pub start_date: NaiveDate,
    pub creditor: Option<String>,
    pub description: Option<String>,
    pub linked_account_id: Option<Uuid>,
}

impl NewDebt {
    pub fn new(name: impl Into<String>, principal: f64, term_months: u32, start_date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            principal,
            term_months,
            start_date,
            creditor: None,
            description: None,
            linked_account_id: None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(DebtError::Validation("debt name is required".into()));
        }
        if self.principal <= 0.0 {
            return Err(DebtError::Validation("principal must be positive".into()));
        }
        if self.term_months == 0 {
            return Err(DebtError::Validation(
                "term must be at least one month".into(),
            ));
        }
        Ok(())
    }
}

impl Debt {
    /// Creates a debt when the interest rate is known; the installment is
    /// derived from the annuity formula.
    pub fn from_rate(spec: NewDebt, annual_rate_percent: f64, now: DateTime<Utc>) -> Result<Self> {
        spec.validate()?;
        if !(0.0..=100.0).contains(&annual_rate_percent) {
            return Err(DebtError::Validation(
                "interest rate must be between 0 and 100 percent".into(),
            ));
        }
        let installment = compute_installment(spec.principal, annual_rate_percent, spec.term_months)?;
        Ok(Self::assemble(spec, annual_rate_percent, installment, now))
    }

    /// Creates a debt when only the installment is known; the rate is
    /// recovered numerically. A degenerate inversion stores 0%.
    pub fn from_installment(
        spec: NewDebt,
        installment_amount: f64,
        now: DateTime<Utc>,
    ) -> Result<Self> {
        spec.validate()?;
        if installment_amount <= 0.0 {
            return Err(DebtError::Validation(
                "installment must be positive".into(),
            ));
        }
        let estimate = invert_rate(spec.principal, installment_amount, spec.term_months)?;
        Ok(Self::assemble(
            spec,
            estimate.annual_rate_percent,
            installment_amount,
            now,
        ))
    }

    fn assemble(spec: NewDebt, rate: f64, installment: f64, now: DateTime<Utc>) -> Self {
        let next_payment_date = Some(months_after(spec.start_date, 1));
        let end_date = months_after(spec.start_date, spec.term_months as i32);
        Self {
            id: Uuid::new_v4(),
            name: spec.name,
            principal_amount: spec.principal,
            current_balance: spec.principal,
            interest_rate: rate,
            rrso: rate + RRSO_SPREAD,
            total_installments: spec.term_months,
            paid_installments: 0,
            installment_amount: installment,
            start_date: spec.start_date,
            next_payment_date,
            end_date,
            creditor: spec.creditor,
            description: spec.description,
            linked_account_id: spec.linked_account_id,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_paid_off(&self) -> bool {
        self.current_balance <= PAID_OFF_THRESHOLD
    }

    /// Fraction of the original principal already repaid, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.principal_amount <= 0.0 {
            return 1.0;
        }
        (1.0 - self.current_balance / self.principal_amount).clamp(0.0, 1.0)
    }

    /// Applies the principal component of a payment: reduces the balance,
    /// advances the installment counter, and transitions to PaidOff when the
    /// balance falls to the threshold.
    pub fn apply_payment(&mut self, principal_paid: f64, now: DateTime<Utc>) -> Result<()> {
        if principal_paid < 0.0 {
            return Err(DebtError::Validation(
                "principal portion cannot be negative".into(),
            ));
        }
        self.current_balance = (self.current_balance - principal_paid).max(0.0);
        self.paid_installments += 1;
        if self.is_paid_off() {
            self.is_active = false;
            self.next_payment_date = None;
        } else {
            self.reschedule();
        }
        self.updated_at = now;
        Ok(())
    }

    /// Undoes one payment's principal component: restores the balance, rolls
    /// the installment counter back, and reactivates a paid-off debt.
    pub fn reverse_payment(&mut self, principal_paid: f64, now: DateTime<Utc>) -> Result<()> {
        if principal_paid < 0.0 {
            return Err(DebtError::Validation(
                "principal portion cannot be negative".into(),
            ));
        }
        if self.paid_installments == 0 {
            return Err(DebtError::Consistency(
                "no recorded installments to reverse".into(),
            ));
        }
        self.current_balance += principal_paid;
        self.paid_installments -= 1;
        if self.current_balance > PAID_OFF_THRESHOLD {
            self.is_active = true;
            self.reschedule();
        }
        self.updated_at = now;
        Ok(())
    }

    fn reschedule(&mut self) {
        self.next_payment_date = Some(months_after(
            self.start_date,
            self.paid_installments as i32 + 1,
        ));
    }
}
