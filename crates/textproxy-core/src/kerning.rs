//! Kerning pairs of the font currently selected into a surface.

use std::collections::HashMap;

use crate::traits::KerningPair;

/// `(previous, current) -> adjustment` in logical units.
///
/// Rebuilt from scratch on every selection so pairs from a previous font never
/// leak into lookups.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KerningTable {
    pairs: HashMap<(char, char), i32>,
}

impl KerningTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rebuild(&mut self, pairs: impl IntoIterator<Item = KerningPair>) {
        self.pairs.clear();
        self.pairs
            .extend(pairs.into_iter().map(|p| ((p.first, p.second), p.amount)));
    }

    pub fn clear(&mut self) {
        self.pairs.clear();
    }

    /// Adjustment for the pair, zero when undefined.
    pub fn get(&self, previous: Option<char>, current: char) -> i32 {
        previous
            .and_then(|prev| self.pairs.get(&(prev, current)).copied())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(first: char, second: char, amount: i32) -> KerningPair {
        KerningPair { first, second, amount }
    }

    #[test]
    fn missing_pairs_are_neutral() {
        let mut table = KerningTable::new();
        table.rebuild([pair('W', 'i', -2)]);
        assert_eq!(table.get(Some('W'), 'i'), -2);
        assert_eq!(table.get(Some('i'), 'W'), 0);
        assert_eq!(table.get(None, 'i'), 0);
    }

    #[test]
    fn rebuild_replaces_previous_font() {
        let mut table = KerningTable::new();
        table.rebuild([pair('A', 'V', -3), pair('T', 'o', -1)]);
        table.rebuild([pair('L', 'T', -4)]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(Some('A'), 'V'), 0);
        assert_eq!(table.get(Some('L'), 'T'), -4);

        table.rebuild(std::iter::empty());
        assert!(table.is_empty());
    }
}
