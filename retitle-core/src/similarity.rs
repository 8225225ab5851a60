//! Case-insensitive title similarity on a 0..=100 scale.
//!
//! The score is the classic matching-characters ratio
//! `200 * LCS(a, b) / (|a| + |b|)`, computed over lowercased Unicode
//! scalar values. It is symmetric and deterministic, identical strings
//! score exactly 100, and two empty strings are treated as identical.

/// Similarity between two titles in `[0, 100]`.
pub fn similarity(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().flat_map(char::to_lowercase).collect();
    let b: Vec<char> = b.chars().flat_map(char::to_lowercase).collect();

    let total = a.len() + b.len();
    if total == 0 {
        return 100.0;
    }

    let common = lcs_len(&a, &b);
    (200.0 * common as f64) / total as f64
}

/// Longest common subsequence length, two rolling rows.
fn lcs_len(a: &[char], b: &[char]) -> usize {
    let (long, short) = if a.len() >= b.len() { (a, b) } else { (b, a) };
    if short.is_empty() {
        return 0;
    }

    let mut prev = vec![0usize; short.len() + 1];
    let mut curr = vec![0usize; short.len() + 1];

    for &lc in long {
        for (j, &sc) in short.iter().enumerate() {
            curr[j + 1] = if lc == sc {
                prev[j] + 1
            } else {
                prev[j + 1].max(curr[j])
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[short.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_is_one_hundred() {
        assert_eq!(similarity("Movie Name", "Movie Name"), 100.0);
        assert_eq!(similarity("", ""), 100.0);
    }

    #[test]
    fn case_insensitive() {
        assert_eq!(similarity("THE MATRIX", "the matrix"), 100.0);
        assert_eq!(similarity("AMÉLIE", "amélie"), 100.0);
    }

    #[test]
    fn disjoint_is_zero() {
        assert_eq!(similarity("abc", "xyz"), 0.0);
        assert_eq!(similarity("abc", ""), 0.0);
    }

    #[test]
    fn symmetric() {
        let pairs = [
            ("Movie Name", "Movie Nam"),
            ("Spider-Man", "Spiderman Homecoming"),
            ("Heat", "Heathers"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a), "{a} / {b}");
        }
    }

    #[test]
    fn partial_overlap() {
        // LCS("heat", "heathers") = 4, total = 12
        let score = similarity("Heat", "Heathers");
        assert!((score - 800.0 / 12.0).abs() < 1e-9, "{score}");

        let near = similarity("Movie Name", "Movie Nam");
        assert!(near > 85.0 && near < 100.0, "{near}");
    }

    #[test]
    fn stays_in_range() {
        for (a, b) in [("a", "aaaa"), ("abcdef", "fedcba"), ("x", "y")] {
            let s = similarity(a, b);
            assert!((0.0..=100.0).contains(&s), "{a} / {b} -> {s}");
        }
    }
}
