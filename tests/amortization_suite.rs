use debt_core::{compute_installment, invert_rate, split_payment, DebtError, RateConfidence};

#[test]
fn scenario_a_reference_installment() {
    // 12 000 at 12% nominal over 12 months.
    let installment = compute_installment(12_000.0, 12.0, 12).unwrap();
    assert!((installment - 1_066.19).abs() < 0.01, "got {installment}");
}

#[test]
fn scenario_b_reference_rate_recovery() {
    let estimate = invert_rate(12_000.0, 1_066.19, 12).unwrap();
    assert_eq!(estimate.confidence, RateConfidence::Reliable);
    assert!(
        (estimate.annual_rate_percent - 12.0).abs() < 0.05,
        "got {}",
        estimate.annual_rate_percent
    );
}

#[test]
fn zero_rate_is_exactly_straight_line() {
    for (principal, term) in [(1_000.0, 12u32), (10_000.0, 60), (100_000.0, 240)] {
        let installment = compute_installment(principal, 0.0, term).unwrap();
        assert!((installment - principal / term as f64).abs() < f64::EPSILON);
    }
}

#[test]
fn rate_round_trips_across_the_grid() {
    // invert_rate(compute_installment(..)) must recover the rate to within
    // 0.05 percentage points over realistic loans.
    let rates = [0.0, 1.0, 2.5, 5.0, 8.0, 12.0, 15.5, 20.0, 25.0, 30.0];
    let terms = [12u32, 24, 60, 120, 240];
    let principals = [1_000.0, 10_000.0, 100_000.0];
    for &rate in &rates {
        for &term in &terms {
            for &principal in &principals {
                let installment = compute_installment(principal, rate, term).unwrap();
                let estimate = invert_rate(principal, installment, term).unwrap();
                assert_eq!(
                    estimate.confidence,
                    RateConfidence::Reliable,
                    "P={principal} rate={rate} n={term}"
                );
                assert!(
                    (estimate.annual_rate_percent - rate).abs() < 0.05,
                    "P={principal} rate={rate} n={term} gave {}",
                    estimate.annual_rate_percent
                );
            }
        }
    }
}

#[test]
fn installment_below_floor_is_flagged_not_zero_interest() {
    // 700/month can never amortize 12 000 over 12 months.
    let estimate = invert_rate(12_000.0, 700.0, 12).unwrap();
    assert_eq!(estimate.confidence, RateConfidence::Degenerate);
    assert_eq!(estimate.annual_rate_percent, 0.0);
    assert!(!estimate.is_reliable());
}

#[test]
fn breakdown_identity_holds_for_covering_payments() {
    let balance = 8_000.0;
    let rate = 9.5;
    let monthly_interest = balance * rate / 100.0 / 12.0;
    for amount in [monthly_interest + 0.01, 100.0, 500.0, 1_250.75, 8_500.0] {
        let split = split_payment(balance, rate, amount);
        assert!(
            (split.principal_paid + split.interest_paid - amount).abs() < 1e-6,
            "identity broken for amount {amount}"
        );
        assert!(split.principal_paid >= 0.0);
        assert!(split.interest_paid >= 0.0);
    }
}

#[test]
fn calculators_reject_invalid_boundaries() {
    assert!(matches!(
        compute_installment(-1.0, 5.0, 12),
        Err(DebtError::Validation(_))
    ));
    assert!(matches!(
        compute_installment(1_000.0, 5.0, 0),
        Err(DebtError::Validation(_))
    ));
    assert!(matches!(
        invert_rate(1_000.0, -5.0, 12),
        Err(DebtError::Validation(_))
    ));
    assert!(matches!(
        invert_rate(1_000.0, 100.0, 0),
        Err(DebtError::Validation(_))
    ));
}
