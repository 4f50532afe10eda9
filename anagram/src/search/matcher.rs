use std::collections::HashMap;

/// Returns `true` when `b` is a case-insensitive permutation of the characters of `a`.
///
/// Both words are folded with [`char::to_lowercase`], which is Unicode-aware and
/// ignores locale. No other normalization happens: `"é"` and `"e\u{301}"` are
/// different words.
///
/// The histogram is sparse, so any code point is accepted. Counts may go
/// negative while `b` is being subtracted; only the final all-zero check matters.
///
/// # Examples
///
/// ```rust
/// use anagram::search::is_anagram;
/// assert!(is_anagram("Listen", "Silent"));
/// assert!(is_anagram("Listen", "SILENT"));
/// assert!(!is_anagram("abc", "abd"));
/// ```
pub fn is_anagram(a: &str, b: &str) -> bool {
    if a.chars().count() != b.chars().count() {
        return false;
    }

    let mut histogram: HashMap<char, i32> = HashMap::with_capacity(a.len());
    for c in a.chars().flat_map(char::to_lowercase) {
        *histogram.entry(c).or_insert(0) += 1;
    }
    for c in b.chars().flat_map(char::to_lowercase) {
        *histogram.entry(c).or_insert(0) -= 1;
    }

    histogram.values().all(|&count| count == 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_case_folding() {
        assert!(is_anagram("Listen", "Silent"));
        assert!(is_anagram("Listen", "SILENT"));
        assert!(is_anagram("listen", "enlist"));
    }

    #[test]
    fn test_mismatches() {
        assert!(!is_anagram("abc", "abcd"));
        assert!(!is_anagram("abc", "abd"));
        assert!(!is_anagram("aab", "abb"));
    }

    #[test]
    fn test_multibyte_characters() {
        assert!(is_anagram("Šalis", "lisša"));
        assert!(is_anagram("żółw", "ŁÓWŻ"));
        assert!(!is_anagram("ąb", "ab"));
    }

    #[test]
    fn test_character_count_not_byte_length() {
        // Same byte length, different character counts
        assert!(!is_anagram("ąa", "aaa"));
    }

    #[test]
    fn test_empty_words() {
        assert!(is_anagram("", ""));
        assert!(!is_anagram("", "a"));
    }

    #[test]
    fn test_no_normalization() {
        assert!(!is_anagram("é", "e\u{301}"));
    }

    proptest! {
        #[test]
        fn prop_reflexive(a in "\\PC{0,16}") {
            prop_assert!(is_anagram(&a, &a));
        }

        #[test]
        fn prop_symmetric(a in "[a-zA-ZąčęėįšųūžĄČĘĖĮŠŲŪŽ]{0,8}", b in "[a-zA-ZąčęėįšųūžĄČĘĖĮŠŲŪŽ]{0,8}") {
            prop_assert_eq!(is_anagram(&a, &b), is_anagram(&b, &a));
        }

        #[test]
        fn prop_permutation_matches(a in "[a-zA-Zßäöü]{1,12}", seed in any::<u64>()) {
            let mut chars: Vec<char> = a.chars().collect();
            let len = chars.len();
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                chars.swap(i, (state >> 33) as usize % (i + 1));
            }
            let shuffled: String = chars.into_iter().collect();
            prop_assert!(is_anagram(&a, &shuffled));
        }
    }
}
