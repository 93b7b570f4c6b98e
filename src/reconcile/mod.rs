//! Payment reconciliation: persists payments, drives the debt state machine,
//! and keeps linked transactions consistent with their payments.

use chrono::NaiveDate;
use tracing::{info, warn};
use uuid::Uuid;

use crate::debt::{ExternalTransaction, Payment};
use crate::errors::{DebtError, Result};
use crate::math::split_payment;
use crate::storage::{DebtStorage, TransactionGateway};
use crate::time::Clock;

/// Orchestrates payment recording and reversal against the collaborator
/// stores.
///
/// The reconciler performs read-then-write sequences on a debt that are not
/// atomic; callers must serialize access per debt id. A failed persistence
/// write after an in-memory mutation means the mutation was not applied; the
/// caller should re-fetch rather than trust its local copy.
pub struct PaymentReconciler<'a> {
    storage: &'a dyn DebtStorage,
    gateway: Option<&'a dyn TransactionGateway>,
    clock: &'a dyn Clock,
}

impl<'a> PaymentReconciler<'a> {
    pub fn new(storage: &'a dyn DebtStorage, clock: &'a dyn Clock) -> Self {
        Self {
            storage,
            gateway: None,
            clock,
        }
    }

    /// Attaches the transaction/account collaborator enabling companion
    /// expense transactions.
    pub fn with_gateway(mut self, gateway: &'a dyn TransactionGateway) -> Self {
        self.gateway = Some(gateway);
        self
    }

    /// Records a payment against a debt: splits it into principal and
    /// interest, persists the payment, and advances the debt state machine.
    ///
    /// With `create_companion` set, an expense transaction is created through
    /// the gateway, the linked account is debited, and the transaction id is
    /// stored on the payment. The debt must carry a `linked_account_id` and
    /// the reconciler a gateway for that path.
    pub fn record_payment(
        &self,
        debt_id: Uuid,
        payment_date: Option<NaiveDate>,
        amount_paid: f64,
        note: Option<String>,
        create_companion: bool,
    ) -> Result<Payment> {
        if amount_paid <= 0.0 {
            return Err(DebtError::Validation(
                "payment amount must be positive".into(),
            ));
        }
        let mut debt = self.storage.get_debt(debt_id)?;
        let companion = if create_companion {
            let gateway = self.gateway.ok_or_else(|| {
                DebtError::Validation("no transaction gateway configured".into())
            })?;
            let account_id = debt.linked_account_id.ok_or_else(|| {
                DebtError::Validation(
                    "debt has no linked account for a companion transaction".into(),
                )
            })?;
            Some((gateway, account_id))
        } else {
            None
        };

        let date = payment_date.unwrap_or_else(|| self.clock.today());
        let split = split_payment(debt.current_balance, debt.interest_rate, amount_paid);
        // Record interest as the remainder so the payment always reconciles
        // to its amount, even when it fails to cover the accrued interest.
        let interest_recorded = amount_paid - split.principal_paid;
        let payment = Payment::new(
            debt_id,
            date,
            amount_paid,
            split.principal_paid,
            interest_recorded,
        )
        .with_note(note);

        self.storage.insert_payment(&payment)?;
        debt.apply_payment(split.principal_paid, self.clock.now())?;
        self.storage.save_debt(&debt)?;
        info!(
            debt = %debt_id,
            payment = %payment.id,
            amount = amount_paid,
            principal = split.principal_paid,
            balance = debt.current_balance,
            "payment recorded"
        );

        if let Some((gateway, account_id)) = companion {
            let transaction_id =
                gateway.create_expense(account_id, amount_paid, date, &debt.name)?;
            gateway.apply_account_delta(account_id, -amount_paid)?;
            let linked = payment.clone().with_transaction(transaction_id);
            self.storage.update_payment(&linked)?;
            return Ok(linked);
        }
        Ok(payment)
    }

    /// Records a payment sourced from an existing, externally owned
    /// transaction and links the two.
    pub fn link_existing_transaction(
        &self,
        transaction: &ExternalTransaction,
        debt_id: Uuid,
    ) -> Result<Payment> {
        if transaction.amount <= 0.0 {
            return Err(DebtError::Validation(
                "linked transaction amount must be positive".into(),
            ));
        }
        let mut debt = self.storage.get_debt(debt_id)?;
        let split = split_payment(debt.current_balance, debt.interest_rate, transaction.amount);
        let interest_recorded = transaction.amount - split.principal_paid;
        let payment = Payment::new(
            debt_id,
            transaction.date,
            transaction.amount,
            split.principal_paid,
            interest_recorded,
        )
        .with_transaction(transaction.id);

        self.storage.insert_payment(&payment)?;
        debt.apply_payment(split.principal_paid, self.clock.now())?;
        self.storage.save_debt(&debt)?;
        info!(
            debt = %debt_id,
            transaction = %transaction.id,
            amount = transaction.amount,
            "transaction linked as payment"
        );
        Ok(payment)
    }

    /// Reverses the payment linked to a transaction that is about to be
    /// deleted, then removes the payment record.
    ///
    /// Returns `Ok(None)` when no payment references the transaction. The
    /// reversal must complete before the transaction is removed from its own
    /// store; on error the caller should abort the deletion.
    pub fn unlink_on_transaction_delete(&self, transaction_id: Uuid) -> Result<Option<Payment>> {
        let Some(payment) = self.storage.find_payment_by_transaction(transaction_id)? else {
            return Ok(None);
        };
        self.reverse_and_delete(&payment)?;
        Ok(Some(payment))
    }

    /// Explicitly removes a payment, reversing its effect on the debt.
    pub fn remove_payment(&self, payment_id: Uuid) -> Result<()> {
        let payment = self
            .storage
            .get_payment(payment_id)?
            .ok_or(DebtError::PaymentNotFound(payment_id))?;
        self.reverse_and_delete(&payment)
    }

    fn reverse_and_delete(&self, payment: &Payment) -> Result<()> {
        let mut debt = self.storage.get_debt(payment.debt_id)?;
        debt.reverse_payment(payment.principal_paid, self.clock.now())?;
        self.storage.save_debt(&debt)?;
        self.storage.delete_payment(payment.id)?;
        info!(
            debt = %payment.debt_id,
            payment = %payment.id,
            principal = payment.principal_paid,
            balance = debt.current_balance,
            "payment reversed"
        );
        if debt.is_active && debt.current_balance > debt.principal_amount {
            warn!(
                debt = %payment.debt_id,
                balance = debt.current_balance,
                principal = debt.principal_amount,
                "reversal pushed balance above original principal"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::debt::{Debt, NewDebt};
    use crate::storage::MemoryStorage;
    use crate::time::FixedClock;

    #[test]
    fn undersized_payment_is_recorded_as_pure_interest() {
        let storage = MemoryStorage::new();
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let clock = FixedClock::from_date(start);
        let debt =
            Debt::from_rate(NewDebt::new("Loan", 100_000.0, 120, start), 12.0, clock.0).unwrap();
        storage.save_debt(&debt).unwrap();

        // Monthly interest is 1 000; a 300 payment reduces no principal but
        // must still reconcile to its own amount.
        let reconciler = PaymentReconciler::new(&storage, &clock);
        let payment = reconciler
            .record_payment(debt.id, None, 300.0, None, false)
            .unwrap();
        assert_eq!(payment.principal_paid, 0.0);
        assert!((payment.interest_paid - 300.0).abs() < 1e-9);

        let updated = storage.get_debt(debt.id).unwrap();
        assert_eq!(updated.current_balance, 100_000.0);
        assert_eq!(updated.paid_installments, 1);
    }
}
