/// Free energy in fixed-point hundredths of kcal/mol.
///
/// Every comparison in the landscape engine happens on this integer type so that ordering
/// never depends on floating-point rounding.
pub type Energy = i32;

/// Number of fixed-point units per kcal/mol.
pub const ENERGY_SCALE: f64 = 100.0;

/// Converts a physical energy (kcal/mol) to fixed-point, rounding half away from zero.
pub fn from_kcal(kcal: f64) -> Energy {
    let scaled = kcal * ENERGY_SCALE;
    if scaled < 0.0 {
        (scaled - 0.5) as Energy
    } else {
        (scaled + 0.5) as Energy
    }
}

#[inline]
pub fn to_kcal(energy: Energy) -> f64 {
    energy as f64 / ENERGY_SCALE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_kcal_rounds_half_away_from_zero() {
        assert_eq!(from_kcal(0.125), 13);
        assert_eq!(from_kcal(-0.125), -13);
        assert_eq!(from_kcal(2.5), 250);
        assert_eq!(from_kcal(-0.004), 0);
        assert_eq!(from_kcal(-0.006), -1);
    }

    #[test]
    fn to_kcal_inverts_scaling() {
        assert_eq!(to_kcal(-1230), -12.3);
        assert_eq!(to_kcal(0), 0.0);
    }
}
