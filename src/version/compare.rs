// src/version/compare.rs

use std::cmp::Ordering;

/// Numeric-aware ordering of two version-like strings.
///
/// Both strings are reduced to their runs of ASCII digits (`v1.10-beta2`
/// becomes `["1", "10", "2"]`) and compared run by run as integers, so
/// `1.10` sorts after `1.9`. Leading and trailing text never takes part in
/// that walk. When one list runs out first, the shorter one is lower
/// (`1.2` < `1.2.0`).
///
/// Equal number lists fall back to a case-insensitive comparison of the
/// full strings, then to a plain byte comparison, so distinct inputs never
/// compare `Equal`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = numeric_segments(a);
    let right = numeric_segments(b);

    let mut i = 0;
    loop {
        match (left.get(i), right.get(i)) {
            (Some(x), Some(y)) => {
                let ord = compare_segment(x, y);
                if ord != Ordering::Equal {
                    return ord;
                }
            }
            (Some(_), None) => return Ordering::Greater,
            (None, Some(_)) => return Ordering::Less,
            (None, None) => break,
        }
        i += 1;
    }

    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn numeric_segments(s: &str) -> Vec<&str> {
    s.split(|c: char| !c.is_ascii_digit())
        .filter(|seg| !seg.is_empty())
        .collect()
}

fn compare_segment(x: &str, y: &str) -> Ordering {
    if x.len() != y.len() {
        compare_numeric(x, y)
    } else if x == y {
        Ordering::Equal
    } else {
        x.cmp(y)
    }
}

/// Integer comparison of two digit strings of any length.
fn compare_numeric(x: &str, y: &str) -> Ordering {
    let x = x.trim_start_matches('0');
    let y = y.trim_start_matches('0');
    x.len().cmp(&y.len()).then_with(|| x.cmp(y))
}
