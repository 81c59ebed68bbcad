//! Shared utility functions
//!
//! Name-similarity helpers for "did you mean" hints on failed lookups.

/// Maximum edit distance for a name to be offered as a suggestion
pub const SUGGESTION_THRESHOLD: usize = 2;

/// Edit distance between `a` and `b`, or `None` once it must exceed `limit`.
/// The scan stops as soon as a whole row of the distance table is past `limit`.
pub fn bounded_edit_distance(a: &str, b: &str, limit: usize) -> Option<usize> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    if a.len().abs_diff(b.len()) > limit {
        return None;
    }

    // row[j]: distance between the prefix of `a` seen so far and b[..j]
    let mut row: Vec<usize> = (0..=b.len()).collect();
    for (i, &ca) in a.iter().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        let mut row_min = row[0];
        for (j, &cb) in b.iter().enumerate() {
            let substitute = diagonal + usize::from(ca != cb);
            diagonal = row[j + 1];
            row[j + 1] = substitute.min(row[j] + 1).min(diagonal + 1);
            row_min = row_min.min(row[j + 1]);
        }
        if row_min > limit {
            return None;
        }
    }

    row.last().copied().filter(|&d| d <= limit)
}

/// Find the closest candidate within `threshold` edits of `name`.
/// Ties keep the first candidate seen.
pub fn find_similar_name<'a>(
    name: &str,
    candidates: impl IntoIterator<Item = &'a str>,
    threshold: usize,
) -> Option<&'a str> {
    let mut best: Option<&str> = None;
    let mut limit = threshold;

    for candidate in candidates {
        let Some(distance) = bounded_edit_distance(name, candidate, limit) else {
            continue;
        };
        best = Some(candidate);
        // Later candidates must be strictly closer to win
        match distance.checked_sub(1) {
            Some(tighter) => limit = tighter,
            None => break,
        }
    }

    best
}

/// Format a "did you mean" suggestion hint for an unknown name.
pub fn format_suggestion_hint(suggestion: Option<&str>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean `{}`?)", name),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distance_within_limit() {
        assert_eq!(bounded_edit_distance("count", "count", 2), Some(0));
        assert_eq!(bounded_edit_distance("count", "cont", 2), Some(1));
        assert_eq!(bounded_edit_distance("cnt", "count", 2), Some(2));
        assert_eq!(bounded_edit_distance("kitten", "sitting", 3), Some(3));
    }

    #[test]
    fn test_distance_over_limit() {
        assert_eq!(bounded_edit_distance("kitten", "sitting", 2), None);
        assert_eq!(bounded_edit_distance("abcd", "wxyz", 2), None);
        assert_eq!(bounded_edit_distance("x", "y", 0), None);
    }

    #[test]
    fn test_distance_length_gap() {
        assert_eq!(bounded_edit_distance("", "abc", 2), None);
        assert_eq!(bounded_edit_distance("", "abc", 3), Some(3));
        assert_eq!(bounded_edit_distance("a", "a_very_long_name", 2), None);
        assert_eq!(bounded_edit_distance("", "", 0), Some(0));
    }

    #[test]
    fn test_distance_counts_chars_not_bytes() {
        assert_eq!(bounded_edit_distance("größe", "grösse", 2), Some(2));
    }

    #[test]
    fn test_find_similar_name_exact_match_wins() {
        assert_eq!(find_similar_name("cat", ["cut", "cat", "cot"], 2), Some("cat"));
    }

    #[test]
    fn test_find_similar_name_tie_keeps_first() {
        assert_eq!(find_similar_name("bat", ["cat", "hat"], 2), Some("cat"));
    }

    #[test]
    fn test_find_similar_name_close() {
        assert_eq!(find_similar_name("helo", ["hello", "world"], 2), Some("hello"));
    }

    #[test]
    fn test_find_similar_name_none() {
        assert_eq!(find_similar_name("xyz", ["hello", "world"], 2), None);
    }

    #[test]
    fn test_find_similar_name_prefers_closest() {
        assert_eq!(find_similar_name("cnt", ["count", "cat", "cent"], 2), Some("cat"));
    }

    #[test]
    fn test_format_suggestion_hint_some() {
        assert_eq!(format_suggestion_hint(Some("hello")), " (did you mean `hello`?)");
    }

    #[test]
    fn test_format_suggestion_hint_none() {
        assert_eq!(format_suggestion_hint(None), "");
    }
}
