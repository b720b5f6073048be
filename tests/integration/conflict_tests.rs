use percentile_closure::{compute_closure, ClosureConfig, ClosureError, ConflictPolicy, Measurement};

fn ms(pairs: &[(&str, &str)]) -> Vec<Measurement> {
    pairs.iter().map(|&p| Measurement::from(p)).collect()
}

#[test]
fn disagreeing_repeats_are_rejected_by_default() {
    let err = compute_closure(&ms(&[("p0p50", "0.3"), ("p0p50", "0.4")]), &ClosureConfig::default()).unwrap_err();
    match err {
        ClosureError::ConflictingMeasurement { label, previous, current } => {
            assert_eq!(label, "p0p50");
            assert_eq!(previous, 0.3);
            assert_eq!(current, 0.4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn agreeing_repeats_are_accepted() {
    let out = compute_closure(&ms(&[("p0p50", "0.3"), ("p0p50", "0.30000001")]), &ClosureConfig::default()).unwrap();
    assert_eq!(out.len(), 3);
}

#[test]
fn warn_policy_keeps_the_last_repeat() {
    let cfg = ClosureConfig::default().with_conflicts(ConflictPolicy::Warn);
    let out = compute_closure(&ms(&[("p0p50", "0.3"), ("p0p50", "0.4")]), &cfg).unwrap();
    assert_eq!(out.size_of("p0p50", 'p').unwrap(), Some(0.4));
    assert!((out.size_of("p50p100", 'p').unwrap().unwrap() - 0.6).abs() < 1e-9);
}

#[test]
fn paths_that_disagree_are_rejected() {
    // Bottom and top halves do not add up to the total mass.
    let err = compute_closure(&ms(&[("p0p50", "0.3"), ("p50p100", "0.6")]), &ClosureConfig::default()).unwrap_err();
    assert!(matches!(err, ClosureError::InconsistentPath { .. }));
    assert!(err.to_string().contains("inconsistent"));
}

#[test]
fn warn_policy_keeps_first_assigned_offsets() {
    let cfg = ClosureConfig::default().with_conflicts(ConflictPolicy::Warn);
    let out = compute_closure(&ms(&[("p0p50", "0.3"), ("p50p100", "0.6")]), &cfg).unwrap();
    // Measured edges are never overwritten.
    assert_eq!(out.size_of("p0p50", 'p').unwrap(), Some(0.3));
    assert_eq!(out.size_of("p50p100", 'p').unwrap(), Some(0.6));
    assert_eq!(out.size_of("p0p100", 'p').unwrap(), Some(1.0));
}

#[test]
fn loose_tolerance_accepts_rounded_inputs() {
    let inputs = ms(&[("p0p50", "0.3"), ("p50p100", "0.69")]);
    assert!(compute_closure(&inputs, &ClosureConfig::default()).is_err());
    let cfg = ClosureConfig::default().with_tolerance(0.02);
    assert!(compute_closure(&inputs, &cfg).is_ok());
}
