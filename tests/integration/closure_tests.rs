use percentile_closure::engine::breakpoint::{Breakpoint, Range, ORIGIN};
use percentile_closure::{compute_closure, compute_implicit_ranges, ClosureConfig, ClosureError, Measurement};

fn ms(pairs: &[(&str, &str)]) -> Vec<Measurement> {
    pairs.iter().map(|&p| Measurement::from(p)).collect()
}

fn size(pairs: &[(String, String)], label: &str) -> f64 {
    let (_, text) = pairs
        .iter()
        .find(|(l, _)| l == label)
        .unwrap_or_else(|| panic!("{} missing from closure", label));
    text.parse().unwrap()
}

#[test]
fn single_known_range_closes_to_three() {
    let out = compute_implicit_ranges(&[("p0p50", "0.3")]).unwrap();
    let labels: Vec<&str> = out.iter().map(|(l, _)| l.as_str()).collect();
    assert_eq!(labels, vec!["p0p50", "p0p100", "p50p100"]);
    assert!((size(&out, "p0p50") - 0.3).abs() < 1e-7);
    assert!((size(&out, "p0p100") - 1.0).abs() < 1e-7);
    assert!((size(&out, "p50p100") - 0.7).abs() < 1e-7);
}

/// Every ordering of `items`.
fn permutations<T: Clone>(items: &[T]) -> Vec<Vec<T>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head.clone());
            out.push(tail);
        }
    }
    out
}

#[test]
fn blank_gap_is_recovered_from_neighbours_in_any_order() {
    let inputs = [
        ("p0p90", "0.5"),
        ("p90p99", "0.3"),
        ("p99p99.9", ""),
        ("p99.9p100", "0.08"),
    ];
    let expected = 1.0 - 0.5 - 0.3 - 0.08;
    let orders = permutations(&inputs);
    assert_eq!(orders.len(), 24);

    let reference = compute_implicit_ranges(&inputs).unwrap();
    for order in orders {
        let out = compute_implicit_ranges(&order).unwrap();
        assert_eq!(out.len(), 10, "{:?}", order);
        assert!((size(&out, "p99p99.9") - expected).abs() < 1e-7, "{:?}", order);
        assert!((size(&out, "p90p100") - 0.5).abs() < 1e-7);
        assert!((size(&out, "p0p99.9") - 0.92).abs() < 1e-7);
        for ((label, text), (ref_label, ref_text)) in out.iter().zip(&reference) {
            assert_eq!(label, ref_label);
            let (a, b): (f64, f64) = (text.parse().unwrap(), ref_text.parse().unwrap());
            assert!((a - b).abs() < 1e-7, "{} differs in {:?}", label, order);
        }
    }
}

#[test]
fn output_is_forward_and_unique() {
    let out = compute_closure(
        &ms(&[("p0p10", "0.02"), ("p10p50", "0.18"), ("p90p100", "0.35"), ("p50p90", "")]),
        &ClosureConfig::default(),
    )
    .unwrap();
    let mut seen = std::collections::HashSet::new();
    for r in out.records() {
        assert!(r.range.upper > r.range.lower);
        assert!(seen.insert(r.range), "duplicate {}", r.range);
    }
    // 0, 10, 50, 90, 100 are all reached.
    assert_eq!(out.len(), 10);
    assert!((out.size_of("p50p90", 'p').unwrap().unwrap() - 0.45).abs() < 1e-7);
}

#[test]
fn unreachable_breakpoints_are_left_out() {
    let out = compute_closure(&ms(&[("p0p50", "0.3"), ("p20p30", "0.1")]), &ClosureConfig::default()).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out.stats().unreachable, 2);
    assert!(out.size_of("p20p30", 'p').unwrap().is_none());
    let bps: Vec<f64> = out.breakpoints().into_iter().map(f64::from).collect();
    assert_eq!(bps, vec![0.0, 50.0, 100.0]);
}

#[test]
fn reversed_label_is_malformed() {
    let err = compute_implicit_ranges(&[("p50p0", "0.3")]).unwrap_err();
    assert!(matches!(err, ClosureError::MalformedLabel { .. }));
}

#[test]
fn unparsable_size_is_rejected() {
    let err = compute_implicit_ranges(&[("p0p50", "lots")]).unwrap_err();
    assert!(matches!(err, ClosureError::InvalidSize { .. }));
    assert!(err.to_string().contains("p0p50"));
}

#[test]
fn breakpoint_identity_is_numeric() {
    let out = compute_closure(&ms(&[("p0.0p50", "0.3"), ("p50.00p100", "0.7")]), &ClosureConfig::default()).unwrap();
    assert_eq!(out.len(), 3);
    assert_eq!(out.to_labeled('p')[0].0, "p0p50");
}

#[test]
fn negative_shares_keep_ascending_orientation() {
    let out = compute_closure(&ms(&[("p0p50", "-0.05")]), &ClosureConfig::default()).unwrap();
    let bottom = Range::new(ORIGIN, Breakpoint::new(50.0).unwrap()).unwrap();
    assert_eq!(out.size(&bottom), Some(-0.05));
    assert!((out.size_of("p50p100", 'p').unwrap().unwrap() - 1.05).abs() < 1e-12);
}

#[test]
fn custom_marker_is_honoured() {
    let cfg = ClosureConfig::default().with_marker('q');
    let out = compute_closure(&ms(&[("q0q25", "0.1")]), &cfg).unwrap();
    let labels: Vec<String> = out.to_labeled('q').into_iter().map(|(l, _)| l).collect();
    assert_eq!(labels, vec!["q0q25", "q0q100", "q25q100"]);
}
