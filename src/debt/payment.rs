use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A reconciled payment against a debt, with its principal/interest split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    pub id: Uuid,
    pub debt_id: Uuid,
    pub payment_date: NaiveDate,
    pub amount_paid: f64,
    pub principal_paid: f64,
    pub interest_paid: f64,
    /// Back-reference to an externally owned transaction, when linked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Payment {
    pub fn new(
        debt_id: Uuid,
        payment_date: NaiveDate,
        amount_paid: f64,
        principal_paid: f64,
        interest_paid: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            debt_id,
            payment_date,
            amount_paid,
            principal_paid,
            interest_paid,
            transaction_id: None,
            note: None,
        }
    }

    pub fn with_note(mut self, note: Option<String>) -> Self {
        self.note = note;
        self
    }

    pub fn with_transaction(mut self, transaction_id: Uuid) -> Self {
        self.transaction_id = Some(transaction_id);
        self
    }
}

/// Read-only view of a transaction owned by the surrounding application.
///
/// The engine never creates or mutates these directly; it reads them when
/// linking and reacts to their deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalTransaction {
    pub id: Uuid,
    pub account_id: Uuid,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
