use crate::core::models::energy::Energy;

/// Symmetric table of saddle energies between selected minima.
///
/// A missing entry means no saddle is known. Each entry also records whether it came from a
/// direct-path estimate rather than from flooding.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierMatrix {
    size: usize,
    saddles: Vec<Option<Energy>>,
    direct_path: Vec<bool>,
}

impl BarrierMatrix {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            saddles: vec![None; size * size],
            direct_path: vec![false; size * size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> usize {
        i * self.size + j
    }

    pub fn set(&mut self, i: usize, j: usize, saddle: Option<Energy>, from_direct_path: bool) {
        let (ij, ji) = (self.at(i, j), self.at(j, i));
        self.saddles[ij] = saddle;
        self.saddles[ji] = saddle;
        self.direct_path[ij] = from_direct_path;
        self.direct_path[ji] = from_direct_path;
    }

    pub fn get(&self, i: usize, j: usize) -> Option<Energy> {
        self.saddles[self.at(i, j)]
    }

    pub fn is_direct_path(&self, i: usize, j: usize) -> bool {
        self.direct_path[self.at(i, j)]
    }

    /// Known entries `(i, j, saddle)` with `i < j`, in row-major order.
    pub fn known_entries(&self) -> Vec<(usize, usize, Energy)> {
        (0..self.size)
            .flat_map(|i| (i + 1..self.size).map(move |j| (i, j)))
            .filter_map(|(i, j)| self.get(i, j).map(|saddle| (i, j, saddle)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_are_symmetric() {
        let mut matrix = BarrierMatrix::new(3);
        matrix.set(2, 0, Some(-40), true);
        assert_eq!(matrix.get(0, 2), Some(-40));
        assert_eq!(matrix.get(2, 0), Some(-40));
        assert!(matrix.is_direct_path(0, 2));
        assert_eq!(matrix.get(0, 1), None);
        assert!(!matrix.is_direct_path(0, 1));
    }

    #[test]
    fn known_entries_are_upper_triangle_in_scan_order() {
        let mut matrix = BarrierMatrix::new(3);
        matrix.set(1, 2, Some(5), false);
        matrix.set(0, 2, Some(7), false);
        assert_eq!(matrix.known_entries(), vec![(0, 2, 7), (1, 2, 5)]);
    }
}
