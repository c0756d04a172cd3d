use crate::core::models::energy::{Energy, to_kcal};
use std::io::{self, Write};

/// Gas constant in kcal/(mol K).
pub const GAS_CONSTANT: f64 = 0.00198717;
pub const ZERO_CELSIUS: f64 = 273.15;

/// Thermal energy `kT` in kcal/mol at `temperature` degrees Celsius.
pub fn thermal_energy(temperature: f64) -> f64 {
    GAS_CONSTANT * (ZERO_CELSIUS + temperature)
}

/// Arrhenius rate for leaving a minimum at `energy` over `saddle`; zero without a saddle.
pub fn transition_rate(energy: Energy, saddle: Option<Energy>, kt: f64) -> f64 {
    match saddle {
        Some(saddle) => (-(to_kcal(saddle) - to_kcal(energy)) / kt).exp(),
        None => 0.0,
    }
}

/// Writes the `n x n` rate matrix for the given minima energies.
///
/// `saddle(i, j)` supplies the saddle between minima `i` and `j`. Entry `(i, j)` is the rate of
/// leaving minimum `i` towards `j`; the diagonal is zero.
pub fn write_rates(
    writer: &mut impl Write,
    energies: &[Energy],
    saddle: impl Fn(usize, usize) -> Option<Energy>,
    temperature: f64,
) -> io::Result<()> {
    let kt = thermal_energy(temperature);
    for (i, &energy) in energies.iter().enumerate() {
        for j in 0..energies.len() {
            let rate = if i == j {
                0.0
            } else {
                transition_rate(energy, saddle(i, j), kt)
            };
            write!(writer, "{rate:10.4e} ")?;
        }
        writeln!(writer)?;
    }
    Ok(())
}
