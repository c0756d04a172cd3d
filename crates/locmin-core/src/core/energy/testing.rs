use super::EnergyModel;
use crate::core::models::energy::Energy;
use crate::core::models::minimum::Minimum;
use crate::core::models::sequence::Sequence;
use crate::core::models::structure::Structure;
use std::collections::HashMap;

pub const UNKNOWN_ENERGY: Energy = 10_000;

pub fn st(db: &str) -> Structure {
    Structure::from_dot_bracket(db).unwrap()
}

/// A hand-built landscape: explicit energies and an explicit symmetric adjacency.
#[derive(Debug, Clone)]
pub struct TableModel {
    sequence: Sequence,
    energies: HashMap<Structure, Energy>,
    edges: HashMap<Structure, Vec<Structure>>,
}

impl TableModel {
    pub fn new(len: usize) -> Self {
        Self {
            sequence: "G".repeat(len).parse().unwrap(),
            energies: HashMap::new(),
            edges: HashMap::new(),
        }
    }

    pub fn state(mut self, db: &str, energy: Energy) -> Self {
        self.energies.insert(st(db), energy);
        self
    }

    pub fn edge(mut self, a: &str, b: &str) -> Self {
        self.edges.entry(st(a)).or_default().push(st(b));
        self.edges.entry(st(b)).or_default().push(st(a));
        self
    }
}

impl EnergyModel for TableModel {
    fn sequence(&self) -> &Sequence {
        &self.sequence
    }

    fn energy_of(&self, structure: &Structure) -> Energy {
        self.energies
            .get(structure)
            .copied()
            .unwrap_or(UNKNOWN_ENERGY)
    }

    fn neighbors(&self, structure: &Structure) -> Vec<Minimum> {
        self.edges
            .get(structure)
            .map(|adjacent| adjacent.iter().map(|s| self.evaluate(s.clone())).collect())
            .unwrap_or_default()
    }

    fn admits(&self, structure: &Structure) -> bool {
        self.energies.contains_key(structure)
    }
}
