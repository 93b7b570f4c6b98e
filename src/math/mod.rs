//! Pure loan math: installment derivation, rate inversion, payment breakdown.

pub mod amortization;
pub mod rate_solver;

pub use amortization::{compute_installment, split_payment, PaymentSplit};
pub use rate_solver::{invert_rate, RateConfidence, RateEstimate};
