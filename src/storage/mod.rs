pub mod json_backend;
pub mod memory;

use std::collections::HashSet;

use chrono::NaiveDate;
use uuid::Uuid;

use crate::debt::{Debt, Payment};
use crate::errors::Result;

/// Abstraction over persistence collaborators that own the Debt and Payment
/// stores.
///
/// Implementations are single-writer-at-a-time per entity; the engine performs
/// read-then-write sequences on a debt and requires callers to serialize
/// access per debt id.
pub trait DebtStorage: Send + Sync {
    fn get_debt(&self, id: Uuid) -> Result<Debt>;
    fn save_debt(&self, debt: &Debt) -> Result<()>;
    fn insert_payment(&self, payment: &Payment) -> Result<()>;
    fn get_payment(&self, id: Uuid) -> Result<Option<Payment>>;
    fn update_payment(&self, payment: &Payment) -> Result<()>;
    fn delete_payment(&self, id: Uuid) -> Result<()>;
    /// Indexed lookup from a transaction back-reference to its payment.
    fn find_payment_by_transaction(&self, transaction_id: Uuid) -> Result<Option<Payment>>;
    fn payments_for_debt(&self, debt_id: Uuid) -> Result<Vec<Payment>>;
}

/// Optional collaborator that owns transactions and account balances, used
/// when a payment should produce a companion expense transaction.
pub trait TransactionGateway: Send + Sync {
    /// Creates an expense transaction and returns its id.
    fn create_expense(
        &self,
        account_id: Uuid,
        amount: f64,
        date: NaiveDate,
        label: &str,
    ) -> Result<Uuid>;

    /// Applies a signed delta to an account balance.
    fn apply_account_delta(&self, account_id: Uuid, delta: f64) -> Result<()>;
}

/// Detects dangling references and broken invariants within a book snapshot.
pub fn book_warnings(book: &json_backend::DebtBook) -> Vec<String> {
    let debt_ids: HashSet<_> = book.debts.iter().map(|d| d.id).collect();
    let mut warnings = Vec::new();

    for debt in &book.debts {
        if debt.is_active != (debt.current_balance > crate::debt::PAID_OFF_THRESHOLD) {
            warnings.push(format!(
                "debt {} active flag disagrees with balance {:.2}",
                debt.id, debt.current_balance
            ));
        }
        if debt.paid_installments > debt.total_installments {
            warnings.push(format!(
                "debt {} has {} paid installments out of {}",
                debt.id, debt.paid_installments, debt.total_installments
            ));
        }
        if debt.is_active && debt.next_payment_date.is_none() {
            warnings.push(format!("debt {} is active with no next payment date", debt.id));
        }
    }

    for payment in &book.payments {
        if !debt_ids.contains(&payment.debt_id) {
            warnings.push(format!(
                "payment {} references unknown debt {}",
                payment.id, payment.debt_id
            ));
        }
        if (payment.principal_paid + payment.interest_paid - payment.amount_paid).abs() > 1e-6 {
            warnings.push(format!(
                "payment {} breakdown does not sum to its amount",
                payment.id
            ));
        }
    }
    warnings
}

pub use json_backend::{load_book_from_path, save_book_to_path, DebtBook, BOOK_SCHEMA_VERSION};
pub use memory::MemoryStorage;
