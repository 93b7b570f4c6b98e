//! In-memory storage backend used by tests and embedding applications that
//! keep their books in process memory.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::NaiveDate;
use uuid::Uuid;

use super::json_backend::DebtBook;
use super::{DebtStorage, TransactionGateway};
use crate::debt::{Debt, Payment};
use crate::errors::{DebtError, Result};

#[derive(Default)]
struct MemoryState {
    debts: HashMap<Uuid, Debt>,
    payments: HashMap<Uuid, Payment>,
    // transaction_id -> payment_id, kept in lockstep with `payments` so
    // reversal lookups stay O(1).
    by_transaction: HashMap<Uuid, Uuid>,
}

/// Mutex-guarded map storage implementing [`DebtStorage`].
#[derive(Default)]
pub struct MemoryStorage {
    state: Mutex<MemoryState>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a storage pre-populated from a book snapshot.
    pub fn from_book(book: DebtBook) -> Self {
        let mut state = MemoryState::default();
        for debt in book.debts {
            state.debts.insert(debt.id, debt);
        }
        for payment in book.payments {
            if let Some(txn) = payment.transaction_id {
                state.by_transaction.insert(txn, payment.id);
            }
            state.payments.insert(payment.id, payment);
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Exports the current contents as a serializable book snapshot.
    pub fn snapshot(&self) -> DebtBook {
        let state = self.lock();
        let mut debts: Vec<_> = state.debts.values().cloned().collect();
        debts.sort_by_key(|d| d.created_at);
        let mut payments: Vec<_> = state.payments.values().cloned().collect();
        payments.sort_by_key(|p| (p.payment_date, p.id));
        DebtBook::new(debts, payments)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryState> {
        // A poisoned lock means a panic mid-write; propagating the panic is
        // the only sound option for an in-memory store.
        self.state.lock().expect("memory storage lock poisoned")
    }
}

impl DebtStorage for MemoryStorage {
    fn get_debt(&self, id: Uuid) -> Result<Debt> {
        self.lock()
            .debts
            .get(&id)
            .cloned()
            .ok_or(DebtError::DebtNotFound(id))
    }

    fn save_debt(&self, debt: &Debt) -> Result<()> {
        self.lock().debts.insert(debt.id, debt.clone());
        Ok(())
    }

    fn insert_payment(&self, payment: &Payment) -> Result<()> {
        let mut state = self.lock();
        if state.payments.contains_key(&payment.id) {
            return Err(DebtError::Storage(format!(
                "payment {} already exists",
                payment.id
            )));
        }
        if let Some(txn) = payment.transaction_id {
            state.by_transaction.insert(txn, payment.id);
        }
        state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    fn get_payment(&self, id: Uuid) -> Result<Option<Payment>> {
        Ok(self.lock().payments.get(&id).cloned())
    }

    fn update_payment(&self, payment: &Payment) -> Result<()> {
        let mut state = self.lock();
        let previous = state
            .payments
            .get(&payment.id)
            .ok_or(DebtError::PaymentNotFound(payment.id))?;
        if let Some(txn) = previous.transaction_id {
            state.by_transaction.remove(&txn);
        }
        if let Some(txn) = payment.transaction_id {
            state.by_transaction.insert(txn, payment.id);
        }
        state.payments.insert(payment.id, payment.clone());
        Ok(())
    }

    fn delete_payment(&self, id: Uuid) -> Result<()> {
        let mut state = self.lock();
        let removed = state
            .payments
            .remove(&id)
            .ok_or(DebtError::PaymentNotFound(id))?;
        if let Some(txn) = removed.transaction_id {
            state.by_transaction.remove(&txn);
        }
        Ok(())
    }

    fn find_payment_by_transaction(&self, transaction_id: Uuid) -> Result<Option<Payment>> {
        let state = self.lock();
        Ok(state
            .by_transaction
            .get(&transaction_id)
            .and_then(|payment_id| state.payments.get(payment_id))
            .cloned())
    }

    fn payments_for_debt(&self, debt_id: Uuid) -> Result<Vec<Payment>> {
        let state = self.lock();
        let mut payments: Vec<_> = state
            .payments
            .values()
            .filter(|p| p.debt_id == debt_id)
            .cloned()
            .collect();
        payments.sort_by_key(|p| (p.payment_date, p.id));
        Ok(payments)
    }
}

/// Recording gateway for tests: remembers created transactions and account
/// deltas instead of talking to a real transaction store.
#[derive(Default)]
pub struct RecordingGateway {
    log: Mutex<GatewayLog>,
}

#[derive(Default)]
struct GatewayLog {
    expenses: Vec<(Uuid, f64, NaiveDate, String)>,
    deltas: Vec<(Uuid, f64)>,
}

impl RecordingGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn expense_count(&self) -> usize {
        self.log.lock().expect("gateway lock poisoned").expenses.len()
    }

    pub fn deltas(&self) -> Vec<(Uuid, f64)> {
        self.log.lock().expect("gateway lock poisoned").deltas.clone()
    }
}

impl TransactionGateway for RecordingGateway {
    fn create_expense(
        &self,
        account_id: Uuid,
        amount: f64,
        date: NaiveDate,
        label: &str,
    ) -> Result<Uuid> {
        let id = Uuid::new_v4();
        self.log
            .lock()
            .expect("gateway lock poisoned")
            .expenses
            .push((account_id, amount, date, label.to_string()));
        Ok(id)
    }

    fn apply_account_delta(&self, account_id: Uuid, delta: f64) -> Result<()> {
        self.log
            .lock()
            .expect("gateway lock poisoned")
            .deltas
            .push((account_id, delta));
        Ok(())
    }
}
