//! "Did you mean" suggestions for misspelled words.

use itertools::Itertools;

/// The most suggestions offered for one word.
const MAX_SUGGESTIONS: usize = 3;

/// The candidates closest to `word` by edit distance, closest first.
///
/// A candidate is only close enough if it is at most a third of `word`'s
/// length away from it, so short words get few suggestions.
pub fn suggestions<'a>(word: &str, candidates: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let max_distance = (word.chars().count() / 3).max(1);
    candidates
        .into_iter()
        .filter(|candidate| *candidate != word && !candidate.is_empty())
        .map(|candidate| (levenshtein::levenshtein(word, candidate), candidate))
        .filter(|(distance, _)| *distance <= max_distance)
        .sorted()
        .dedup_by(|(_, a), (_, b)| a == b)
        .take(MAX_SUGGESTIONS)
        .map(|(_, candidate)| candidate.to_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closest_first() {
        let candidates = ["explain", "expand", "exit", "declare"];
        assert_eq!(suggestions("explian", candidates), ["explain"]);
        assert_eq!(suggestions("exot", candidates), ["exit"]);
        assert!(suggestions("xyzzy", candidates).is_empty());
    }

    #[test]
    fn at_most_three() {
        let candidates = ["int1", "int2", "int3", "int4", "int"];
        assert_eq!(suggestions("intx", candidates), ["int", "int1", "int2"]);
    }
}
