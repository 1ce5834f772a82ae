//! Hint label generation over a fixed two-tier alphabet.
//!
//! Indices below `single_keys.len()` get one character. The rest get a
//! prefix key (any alphabet key that is not a single key) followed by any
//! alphabet key. Because no single key can start a two-character label, the
//! label set is prefix-free and an exact match can fire immediately.

use super::element::UIElement;
use crate::error::HintError;

pub const DEFAULT_SINGLE_KEYS: &str = "ASDFJKL;";
pub const DEFAULT_FULL_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ;";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    single: Vec<char>,
    prefix: Vec<char>,
    full: Vec<char>,
}

impl Alphabet {
    pub fn new(single_keys: &str, full_alphabet: &str) -> Result<Self, HintError> {
        let single: Vec<char> = single_keys.chars().map(normalize).collect();
        let full: Vec<char> = full_alphabet.chars().map(normalize).collect();

        if single.is_empty() || full.is_empty() {
            return Err(HintError::InvalidAlphabet("key sets must not be empty".into()));
        }
        if let Some(dup) = first_duplicate(&single).or_else(|| first_duplicate(&full)) {
            return Err(HintError::InvalidAlphabet(format!("duplicate key `{dup}`")));
        }
        if let Some(stray) = single.iter().find(|c| !full.contains(c)) {
            return Err(HintError::InvalidAlphabet(format!(
                "single key `{stray}` is not in the full alphabet"
            )));
        }

        let prefix: Vec<char> = full.iter().copied().filter(|c| !single.contains(c)).collect();
        if prefix.is_empty() {
            return Err(HintError::InvalidAlphabet(
                "full alphabet leaves no prefix keys".into(),
            ));
        }

        Ok(Self {
            single,
            prefix,
            full,
        })
    }

    pub fn single_keys(&self) -> &[char] {
        &self.single
    }

    pub fn prefix_keys(&self) -> &[char] {
        &self.prefix
    }

    pub fn full_alphabet(&self) -> &[char] {
        &self.full
    }

    pub fn capacity(&self) -> usize {
        self.single.len() + self.prefix.len() * self.full.len()
    }

    pub fn label(&self, index: usize) -> Result<String, HintError> {
        if let Some(key) = self.single.get(index) {
            return Ok(key.to_string());
        }

        let reduced = index - self.single.len();
        let quotient = reduced / self.full.len();
        let remainder = reduced % self.full.len();
        match self.prefix.get(quotient) {
            Some(prefix) => Ok([*prefix, self.full[remainder]].iter().collect()),
            None => Err(HintError::LabelCapacity {
                index,
                capacity: self.capacity(),
            }),
        }
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        let single = DEFAULT_SINGLE_KEYS.chars().collect::<Vec<_>>();
        let full = DEFAULT_FULL_ALPHABET.chars().collect::<Vec<_>>();
        let prefix = full.iter().copied().filter(|c| !single.contains(c)).collect();
        Self {
            single,
            prefix,
            full,
        }
    }
}

/// Fold typed input onto the alphabet's case.
pub fn normalize(c: char) -> char {
    c.to_ascii_uppercase()
}

fn first_duplicate(keys: &[char]) -> Option<char> {
    keys.iter()
        .enumerate()
        .find(|(i, c)| keys[..*i].contains(c))
        .map(|(_, c)| *c)
}

/// Label `elements` in order. Elements beyond the alphabet's capacity are
/// dropped (the list is distance-sorted, so the farthest ones go); the number
/// dropped is returned.
pub fn assign_labels<N>(alphabet: &Alphabet, elements: &mut Vec<UIElement<N>>) -> usize {
    let capacity = alphabet.capacity();
    let dropped = elements.len().saturating_sub(capacity);
    elements.truncate(capacity);

    for (index, element) in elements.iter_mut().enumerate() {
        match alphabet.label(index) {
            Ok(label) => element.label = label,
            Err(err) => {
                tracing::error!(%err, "label generation failed inside capacity");
            }
        }
    }

    if dropped > 0 {
        tracing::warn!(dropped, capacity, "more candidates than labels, dropping farthest");
    }
    dropped
}
