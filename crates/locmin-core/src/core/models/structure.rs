use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StructureError {
    #[error("Invalid character '{character}' at position {position} (expected '.', '(' or ')')")]
    InvalidCharacter { character: char, position: usize },
    #[error("Unbalanced bracket at position {position}")]
    Unbalanced { position: usize },
    #[error("Structure of length {length} exceeds the supported maximum of {max}")]
    TooLong { length: usize, max: usize },
}

/// A secondary structure stored as a pair table: `pairs[i]` is the partner of position `i`,
/// or `None` when `i` is unpaired.
///
/// Equality, hashing and ordering all act on the pair table alone, so two structures are equal
/// exactly when they pair the same positions. The derived lexicographic ordering (`None` sorts
/// before any partner) is the structural tie-break used by minimum records.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Structure {
    pairs: Vec<Option<u16>>,
}

impl Structure {
    /// The open chain (no pairs) of the given length.
    pub fn open_chain(len: usize) -> Self {
        Self {
            pairs: vec![None; len],
        }
    }

    pub fn from_dot_bracket(s: &str) -> Result<Self, StructureError> {
        let length = s.chars().count();
        if length > u16::MAX as usize {
            return Err(StructureError::TooLong {
                length,
                max: u16::MAX as usize,
            });
        }

        let mut pairs = vec![None; length];
        let mut stack = Vec::new();
        for (position, character) in s.chars().enumerate() {
            match character {
                '.' => {}
                '(' => stack.push(position),
                ')' => {
                    let open = stack.pop().ok_or(StructureError::Unbalanced { position })?;
                    pairs[open] = Some(position as u16);
                    pairs[position] = Some(open as u16);
                }
                _ => {
                    return Err(StructureError::InvalidCharacter {
                        character,
                        position,
                    });
                }
            }
        }
        if let Some(&position) = stack.last() {
            return Err(StructureError::Unbalanced { position });
        }
        Ok(Self { pairs })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    #[inline]
    pub fn partner(&self, position: usize) -> Option<usize> {
        self.pairs[position].map(usize::from)
    }

    #[inline]
    pub fn is_paired(&self, position: usize) -> bool {
        self.pairs[position].is_some()
    }

    /// Base pairs `(i, j)` with `i < j`, in order of the opening position.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.pairs
            .iter()
            .enumerate()
            .filter_map(|(i, p)| p.map(usize::from).filter(|&j| j > i).map(|j| (i, j)))
    }

    pub fn pair_count(&self) -> usize {
        self.pairs().count()
    }

    /// Whether `(i, j)` can be added without touching an existing pair or creating a pseudoknot.
    pub fn can_insert(&self, i: usize, j: usize) -> bool {
        if i >= j || j >= self.len() || self.is_paired(i) || self.is_paired(j) {
            return false;
        }
        (i + 1..j).all(|k| match self.partner(k) {
            Some(p) => p > i && p < j,
            None => true,
        })
    }

    pub fn insert_pair(&mut self, i: usize, j: usize) {
        debug_assert!(self.can_insert(i, j));
        self.pairs[i] = Some(j as u16);
        self.pairs[j] = Some(i as u16);
    }

    /// Removes the pair containing `position`; returns the former partner.
    pub fn remove_pair(&mut self, position: usize) -> Option<usize> {
        let partner = self.partner(position)?;
        self.pairs[position] = None;
        self.pairs[partner] = None;
        Some(partner)
    }

    pub fn has_pair(&self, i: usize, j: usize) -> bool {
        j < self.len() && self.partner(i) == Some(j)
    }

    /// First opening position of a pair that is stacked on neither side.
    pub fn find_lone_pair(&self) -> Option<usize> {
        self.pairs().map(|(i, _)| i).find(|&i| self.is_lone_pair(i))
    }

    fn is_lone_pair(&self, i: usize) -> bool {
        let Some(j) = self.partner(i) else {
            return false;
        };
        let (i, j) = (i.min(j), i.max(j));
        let outer = i > 0 && self.has_pair(i - 1, j + 1);
        let inner = j - i > 2 && self.has_pair(i + 1, j - 1);
        !outer && !inner
    }

    /// Number of pairs present in exactly one of the two structures.
    pub fn pair_distance(&self, other: &Structure) -> usize {
        let only_self = self.pairs().filter(|&(i, j)| !other.has_pair(i, j)).count();
        let only_other = other.pairs().filter(|&(i, j)| !self.has_pair(i, j)).count();
        only_self + only_other
    }

    pub fn to_dot_bracket(&self) -> String {
        self.pairs
            .iter()
            .enumerate()
            .map(|(i, p)| match p {
                None => '.',
                Some(j) if usize::from(*j) > i => '(',
                Some(_) => ')',
            })
            .collect()
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_dot_bracket())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dot_bracket_parses_and_prints_identically() {
        let text = "((..((...))..))..";
        let s = Structure::from_dot_bracket(text).unwrap();
        assert_eq!(s.to_string(), text);
        assert_eq!(s.partner(0), Some(14));
        assert_eq!(s.partner(4), Some(10));
        assert_eq!(s.partner(2), None);
        assert_eq!(s.pair_count(), 4);
    }

    #[test]
    fn unbalanced_brackets_are_rejected() {
        assert_eq!(
            Structure::from_dot_bracket("(()").unwrap_err(),
            StructureError::Unbalanced { position: 0 }
        );
        assert_eq!(
            Structure::from_dot_bracket("())").unwrap_err(),
            StructureError::Unbalanced { position: 2 }
        );
    }

    #[test]
    fn invalid_characters_are_rejected() {
        assert!(matches!(
            Structure::from_dot_bracket("(.x)"),
            Err(StructureError::InvalidCharacter { position: 2, .. })
        ));
    }

    #[test]
    fn can_insert_rejects_crossing_and_occupied_positions() {
        let s = Structure::from_dot_bracket("..(....)..").unwrap();
        assert!(s.can_insert(0, 9));
        assert!(!s.can_insert(3, 7));
        assert!(!s.can_insert(0, 4));
        assert!(!s.can_insert(2, 9));
        assert!(s.can_insert(3, 6));
    }

    #[test]
    fn insert_and_remove_pairs_keep_table_symmetric() {
        let mut s = Structure::open_chain(8);
        s.insert_pair(1, 6);
        assert_eq!(s.to_string(), ".(....).");
        assert_eq!(s.remove_pair(6), Some(1));
        assert_eq!(s, Structure::open_chain(8));
        assert_eq!(s.remove_pair(3), None);
    }

    #[test]
    fn lone_pairs_are_detected() {
        let stacked = Structure::from_dot_bracket("((....))").unwrap();
        assert_eq!(stacked.find_lone_pair(), None);

        let lone = Structure::from_dot_bracket("((....)).(...)").unwrap();
        assert_eq!(lone.find_lone_pair(), Some(9));
    }

    #[test]
    fn ordering_is_lexicographic_on_pair_table() {
        let open = Structure::from_dot_bracket("......").unwrap();
        let paired = Structure::from_dot_bracket("(....)").unwrap();
        let shifted = Structure::from_dot_bracket(".(...)").unwrap();
        assert!(open < shifted);
        assert!(shifted < paired);
    }

    #[test]
    fn pair_distance_counts_symmetric_difference() {
        let a = Structure::from_dot_bracket("((....))").unwrap();
        let b = Structure::from_dot_bracket("(......)").unwrap();
        let c = Structure::from_dot_bracket(".(....).").unwrap();
        assert_eq!(a.pair_distance(&b), 1);
        assert_eq!(b.pair_distance(&c), 2);
        assert_eq!(a.pair_distance(&a), 0);
    }
}
