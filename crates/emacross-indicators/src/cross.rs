//! Crossover predicates over aligned series.
//!
//! Index 0 never crosses, and a missing value on either side of either
//! sample suppresses the cross.

/// `a` moves from at-or-below `b` to strictly above it.
pub fn crosses_above(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<bool> {
    cross_with(a, b, |prev_a, prev_b, a, b| a > b && prev_a <= prev_b)
}

/// `a` moves from at-or-above `b` to strictly below it.
pub fn crosses_below(a: &[Option<f64>], b: &[Option<f64>]) -> Vec<bool> {
    cross_with(a, b, |prev_a, prev_b, a, b| a < b && prev_a >= prev_b)
}

fn cross_with(
    a: &[Option<f64>],
    b: &[Option<f64>],
    crossed: impl Fn(f64, f64, f64, f64) -> bool,
) -> Vec<bool> {
    let len = a.len().min(b.len());
    let mut result = vec![false; len];

    for i in 1..len {
        if let (Some(prev_a), Some(prev_b), Some(cur_a), Some(cur_b)) =
            (a[i - 1], b[i - 1], a[i], b[i])
        {
            result[i] = crossed(prev_a, prev_b, cur_a, cur_b);
        }
    }

    result
}
