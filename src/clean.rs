//! Name cleaning pipeline
//!
//! trim -> strip disallowed characters -> collapse whitespace -> lowercase
//! -> uppercase the first letter of every word.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Punctuation removed by [`CleanProfile::StripDigitsPunctuation`].
/// Hyphen and underscore are kept.
const STRIPPED_PUNCTUATION: &[char] = &[
    '.', ',', '!', '?', ';', ':', '\'', '"', '(', ')', '[', ']', '{', '}', '@', '#', '$', '%',
    '^', '&', '*', '/', '\\', '|', '~', '+', '=', '<', '>',
];

/// Which characters survive the strip step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CleanProfile {
    /// Keep ASCII letters and whitespace only
    #[default]
    LettersOnly,
    /// Drop ASCII digits and a fixed punctuation set, keep everything else
    StripDigitsPunctuation,
}

impl CleanProfile {
    fn keeps(self, c: char) -> bool {
        match self {
            Self::LettersOnly => c.is_ascii_alphabetic() || c.is_whitespace(),
            Self::StripDigitsPunctuation => {
                !c.is_ascii_digit() && !STRIPPED_PUNCTUATION.contains(&c)
            }
        }
    }
}

/// Run the full pipeline over `input`
pub fn clean_name(input: &str, profile: CleanProfile) -> String {
    let stripped: String = input
        .trim()
        .chars()
        .filter(|&c| profile.keeps(c))
        .collect();

    // split_whitespace also drops spaces the strip step exposed at either end
    stripped
        .split_whitespace()
        .map(title_case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first letter, lowercase the rest.
///
/// Some letters uppercase to several chars (`ß` -> `SS`, `ﬁ` -> `FI`); only
/// the first of those stays uppercase so a second pass yields the same word.
/// Clean every entry, dropping repeats of an already emitted result.
///
/// First-seen order is kept, so `["ann", "ANN ", "bo"]` gives `["Ann", "Bo"]`.
pub fn clean_batch<I, S>(names: I, profile: CleanProfile) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = HashSet::new();
    names
        .into_iter()
        .map(|name| clean_name(name.as_ref(), profile))
        .filter(|cleaned| seen.insert(cleaned.clone()))
        .collect()
}

fn title_case_word(word: &str) -> String {
    let lower = word.to_lowercase();
    let mut chars = lower.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let mut upper = first.to_uppercase();
    upper
        .next()
        .into_iter()
        .chain(upper.flat_map(char::to_lowercase))
        .chain(chars)
        .collect()
}
