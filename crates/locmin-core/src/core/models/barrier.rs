use super::energy::Energy;

/// Father index used once merged records disagree about their father.
pub const UNRESOLVED_FATHER: i32 = -1;

/// Per-minimum barrier information as read from a barrier listing.
///
/// `father` keeps the file's numbering. `free_energy`, `gradient_basin` and
/// `gradient_free_energy` are carried through to the output; of these only
/// `gradient_basin` takes part in merging.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BarrierAggregate {
    pub father: i32,
    pub e_diff: Energy,
    pub basin_size: i32,
    pub father_basin_size: i32,
    pub free_energy: f32,
    pub gradient_basin: i32,
    pub gradient_free_energy: f32,
}

impl BarrierAggregate {
    /// Absorbs `other` into `self`.
    ///
    /// Basin sizes and gradient basin sizes are summed. A differing father turns the merged
    /// father into [`UNRESOLVED_FATHER`], and an unresolved father is never restored by a later
    /// merge, even when every subsequent record agrees with an earlier one. `e_diff` and the
    /// free energies are kept from `self`, so the result depends on which record came first.
    pub fn merge(self, other: &BarrierAggregate) -> BarrierAggregate {
        BarrierAggregate {
            father: if self.father == other.father {
                self.father
            } else {
                UNRESOLVED_FATHER
            },
            basin_size: self.basin_size + other.basin_size,
            father_basin_size: self.father_basin_size + other.father_basin_size,
            gradient_basin: self.gradient_basin + other.gradient_basin,
            ..self
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.father != UNRESOLVED_FATHER
    }
}
