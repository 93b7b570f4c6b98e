//! Debt and payment domain entities.

pub mod debt;
pub mod payment;
pub mod schedule;

pub use debt::{Debt, NewDebt, PAID_OFF_THRESHOLD};
pub use payment::{ExternalTransaction, Payment};
