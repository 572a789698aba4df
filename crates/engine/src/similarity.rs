//! Levenshtein edit distance and normalized similarity.

/// Minimum single-character insertions, deletions and substitutions turning
/// `left` into `right`. Counts Unicode scalar values.
///
/// The DP table is indexed by prefix lengths and kept one row at a time:
/// `d(s, "") = |s|`, `d("", s) = |s|`.
#[must_use]
pub fn edit_distance(left: &str, right: &str) -> usize {
    let right: Vec<char> = right.chars().collect();
    let mut previous: Vec<usize> = (0..=right.len()).collect();

    for (row, left_char) in left.chars().enumerate() {
        let mut current = Vec::with_capacity(previous.len());
        let mut last = row + 1;
        current.push(last);

        for ((&diagonal, &above), &right_char) in
            previous.iter().zip(previous.iter().skip(1)).zip(&right)
        {
            let substitution = diagonal + usize::from(left_char != right_char);
            last = substitution.min(above + 1).min(last + 1);
            current.push(last);
        }

        previous = current;
    }

    previous.last().copied().unwrap_or_default()
}

/// `(maxLen - distance) / maxLen` where `maxLen` is the longer length.
/// Two empty strings are identical (1.0).
#[must_use]
pub fn similarity(left: &str, right: &str) -> f64 {
    let longest = left.chars().count().max(right.chars().count());
    if longest == 0 {
        return 1.0;
    }
    let distance = edit_distance(left, right);
    as_f64(longest.saturating_sub(distance)) / as_f64(longest)
}

fn as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_distances() {
        assert_eq!(edit_distance("kitten", "sitting"), 3);
        assert_eq!(edit_distance("gmial.com", "gmail.com"), 2);
        assert_eq!(edit_distance("", "abc"), 3);
        assert_eq!(edit_distance("abc", ""), 3);
        assert_eq!(edit_distance("", ""), 0);
    }

    #[test]
    fn distance_counts_characters_not_bytes() {
        assert_eq!(edit_distance("café", "cafe"), 1);
        assert_eq!(edit_distance("日本", "日本語"), 1);
    }

    #[test]
    fn similarity_edges() {
        assert!((similarity("", "") - 1.0).abs() < f64::EPSILON);
        assert!(similarity("abc", "").abs() < f64::EPSILON);
        assert!((similarity("gmial.com", "gmail.com") - 7.0 / 9.0).abs() < 1e-9);
    }

    proptest! {
        #[test]
        fn distance_to_self_is_zero(text in "\\PC{0,24}") {
            prop_assert_eq!(edit_distance(&text, &text), 0);
        }

        #[test]
        fn distance_to_empty_is_length(text in "\\PC{0,24}") {
            let length = text.chars().count();
            prop_assert_eq!(edit_distance(&text, ""), length);
            prop_assert_eq!(edit_distance("", &text), length);
        }

        #[test]
        fn distance_is_symmetric(left in "[a-z.]{0,16}", right in "[a-z.]{0,16}") {
            prop_assert_eq!(edit_distance(&left, &right), edit_distance(&right, &left));
        }

        #[test]
        fn similarity_stays_in_unit_range(left in "[a-z.]{0,16}", right in "[a-z.]{0,16}") {
            let score = similarity(&left, &right);
            prop_assert!((0.0..=1.0).contains(&score));
        }
    }
}
