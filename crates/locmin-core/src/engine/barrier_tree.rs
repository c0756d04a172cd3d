use super::matrix::BarrierMatrix;
use super::union_find::UnionFind;
use crate::core::models::energy::Energy;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeNode {
    pub height: Energy,
    /// `None` for a root.
    pub father: Option<usize>,
    /// Saddle joining this node to its father.
    pub saddle: Option<Energy>,
}

/// A forest over the selected minima, joined at their saddles.
///
/// Built like a minimum spanning forest: saddles are taken lowest first, and each one that
/// connects two components hangs the higher component root (by energy, then index) below the
/// lower one. Each component therefore has its lowest minimum as root, and a node's saddle is
/// never below its own height. Components that no known saddle connects stay separate trees.
#[derive(Debug, Clone, PartialEq)]
pub struct BarrierTree {
    nodes: Vec<TreeNode>,
}

impl BarrierTree {
    pub fn assemble(heights: &[Energy], matrix: &BarrierMatrix) -> Self {
        let mut nodes: Vec<_> = heights
            .iter()
            .map(|&height| TreeNode {
                height,
                father: None,
                saddle: None,
            })
            .collect();

        let mut entries = matrix.known_entries();
        entries.sort_by_key(|&(_, _, saddle)| saddle);

        let mut components = UnionFind::new(nodes.len());
        // tree root of every component, indexed by its union-find representative
        let mut tree_root: Vec<usize> = (0..nodes.len()).collect();

        for (i, j, saddle) in entries {
            let (ci, cj) = (components.find(i), components.find(j));
            if ci == cj {
                continue;
            }
            let (ri, rj) = (tree_root[ci], tree_root[cj]);
            let (lower, higher) = if (nodes[ri].height, ri) <= (nodes[rj].height, rj) {
                (ri, rj)
            } else {
                (rj, ri)
            };
            nodes[higher].father = Some(lower);
            nodes[higher].saddle = Some(saddle.max(nodes[higher].height));

            components.union(ci, cj);
            let merged = components.find(ci);
            tree_root[merged] = lower;
        }

        Self { nodes }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    pub fn father(&self, i: usize) -> Option<usize> {
        self.nodes[i].father
    }

    /// Height of the saddle above the node.
    pub fn barrier(&self, i: usize) -> Option<Energy> {
        let node = &self.nodes[i];
        node.saddle.map(|saddle| saddle - node.height)
    }

    pub fn roots(&self) -> Vec<usize> {
        (0..self.nodes.len())
            .filter(|&i| self.nodes[i].father.is_none())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use itertools::Itertools;

    fn full_matrix(saddles: &[(usize, usize, Energy)], size: usize) -> BarrierMatrix {
        let mut matrix = BarrierMatrix::new(size);
        for &(i, j, s) in saddles {
            matrix.set(i, j, Some(s), false);
        }
        matrix
    }

    #[test]
    fn three_minima_form_a_chain_to_the_lowest() {
        let heights = [10, 20, 30];
        let matrix = full_matrix(&[(0, 1, 25), (0, 2, 40), (1, 2, 35)], 3);
        let tree = BarrierTree::assemble(&heights, &matrix);

        assert_eq!(tree.father(0), None);
        assert_eq!(tree.father(1), Some(0));
        assert_eq!(tree.nodes()[1].saddle, Some(25));
        assert_eq!(tree.father(2), Some(0));
        assert_eq!(tree.nodes()[2].saddle, Some(35));
        assert_eq!(tree.barrier(2), Some(5));
        assert_eq!(tree.roots(), vec![0]);
    }

    #[test]
    fn unconnected_minima_remain_separate_roots() {
        let heights = [0, 5, 7, 9];
        let matrix = full_matrix(&[(0, 1, 12), (2, 3, 15)], 4);
        let tree = BarrierTree::assemble(&heights, &matrix);
        assert_eq!(tree.roots(), vec![0, 2]);
        assert_eq!(tree.father(3), Some(2));
        assert_eq!(tree.barrier(0), None);
    }

    #[test]
    fn equal_saddles_are_taken_in_scan_order() {
        let heights = [0, 0, 0];
        let matrix = full_matrix(&[(0, 1, 10), (0, 2, 10), (1, 2, 10)], 3);
        let tree = BarrierTree::assemble(&heights, &matrix);
        assert_eq!(tree.father(1), Some(0));
        assert_eq!(tree.father(2), Some(0));
    }

    #[test]
    fn forest_properties_hold_on_a_dense_matrix() {
        let heights: Vec<Energy> = vec![-50, -40, -35, -20, -20, -5, 0];
        let n = heights.len();
        let saddles: Vec<_> = (0..n)
            .tuple_combinations()
            .map(|(i, j)| (i, j, heights[i].max(heights[j]) + 3 * (i as Energy + j as Energy)))
            .collect();
        let tree = BarrierTree::assemble(&heights, &full_matrix(&saddles, n));

        assert_eq!(tree.roots().len(), 1);
        for i in 0..n {
            if let Some(f) = tree.father(i) {
                assert!((heights[f], f) < (heights[i], i));
                assert!(tree.nodes()[i].saddle.unwrap() >= heights[i]);
            }
            // following fathers always terminates
            let mut steps = 0;
            let mut node = i;
            while let Some(f) = tree.father(node) {
                node = f;
                steps += 1;
                assert!(steps <= n);
            }
        }
    }
}
