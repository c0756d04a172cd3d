use super::energy::{Energy, to_kcal};
use super::structure::Structure;
use std::cmp::Ordering;
use std::fmt;

/// A structure paired with its free energy.
///
/// Ordered by energy first and by the pair table second, which is the order of the minima
/// registry. Both keys are fixed once the record exists: the structure is only ever replaced
/// together with its re-evaluated energy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Minimum {
    pub structure: Structure,
    pub energy: Energy,
}

impl Minimum {
    pub fn new(structure: Structure, energy: Energy) -> Self {
        Self { structure, energy }
    }

    pub fn len(&self) -> usize {
        self.structure.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structure.is_empty()
    }
}

impl PartialOrd for Minimum {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Minimum {
    fn cmp(&self, other: &Self) -> Ordering {
        self.energy
            .cmp(&other.energy)
            .then_with(|| self.structure.cmp(&other.structure))
    }
}

impl fmt::Display for Minimum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {:6.2}", self.structure, to_kcal(self.energy))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn min(db: &str, energy: Energy) -> Minimum {
        Minimum::new(Structure::from_dot_bracket(db).unwrap(), energy)
    }

    #[test]
    fn ordering_is_energy_first() {
        let low = min("(....)", -120);
        let high = min("......", 0);
        assert!(low < high);
    }

    #[test]
    fn equal_energies_fall_back_to_structure_order() {
        let a = min("......", -50);
        let b = min("(....)", -50);
        assert!(a < b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
    }

    #[test]
    fn display_prints_structure_and_two_decimal_energy() {
        assert_eq!(min("(....)", -123).to_string(), "(....)  -1.23");
    }
}
