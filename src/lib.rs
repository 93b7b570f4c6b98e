#![doc(test(attr(deny(warnings))))]

//! Debt Core tracks personal debts and reconciles payments against them:
//! level-installment amortization math, numerical rate recovery, payment
//! breakdown, and the debt lifecycle state machine, orchestrated over
//! externally owned transaction and account stores.

pub mod debt;
pub mod errors;
pub mod math;
pub mod reconcile;
pub mod storage;
pub mod time;
pub mod utils;

pub use debt::{Debt, ExternalTransaction, NewDebt, Payment, PAID_OFF_THRESHOLD};
pub use errors::{DebtError, Result};
pub use math::{compute_installment, invert_rate, split_payment, PaymentSplit, RateConfidence, RateEstimate};
pub use reconcile::PaymentReconciler;
pub use storage::{DebtStorage, MemoryStorage, TransactionGateway};
pub use time::{Clock, FixedClock, SystemClock};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Debt Core tracing initialized.");
    });
}
