use crate::core::models::barrier::BarrierAggregate;
use crate::core::models::energy::{Energy, to_kcal};
use crate::core::models::minimum::Minimum;
use crate::core::models::sequence::Sequence;
use crate::core::models::structure::Structure;
use std::io::{self, Write};

/// Barrier columns of a minimum in a barrier-tree report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarrierColumns {
    /// Zero-based index of the father minimum; `None` for a root.
    pub father: Option<usize>,
    /// Saddle height above the minimum; `None` when no saddle connects it to a lower basin.
    pub barrier: Option<Energy>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRow<'a> {
    pub structure: &'a Structure,
    pub energy: Energy,
    pub hits: usize,
    pub barrier: Option<BarrierColumns>,
}

fn write_header(writer: &mut impl Write, sequence: &Sequence) -> io::Result<()> {
    writeln!(writer, "     {sequence}")
}

fn out_of_range(energy: Energy, lowest: Energy, energy_range: Option<Energy>) -> bool {
    energy_range.is_some_and(|range| energy - lowest > range)
}

/// Writes the minima report.
///
/// Rows are numbered from 1 in the given order. With `energy_range` set, output stops at the
/// first row lying more than that far above the first row. Returns the number of rows written.
pub fn write_minima(
    writer: &mut impl Write,
    sequence: &Sequence,
    rows: &[ReportRow<'_>],
    energy_range: Option<Energy>,
) -> io::Result<usize> {
    write_header(writer, sequence)?;
    let Some(lowest) = rows.first().map(|r| r.energy) else {
        return Ok(0);
    };

    let mut written = 0;
    for (i, row) in rows.iter().enumerate() {
        if out_of_range(row.energy, lowest, energy_range) {
            break;
        }
        write!(
            writer,
            "{:4} {} {:6.2}",
            i + 1,
            row.structure,
            to_kcal(row.energy)
        )?;
        match row.barrier {
            Some(columns) => {
                let father = columns.father.map_or(0, |f| f + 1);
                let barrier = columns.barrier.map_or(f64::INFINITY, to_kcal);
                writeln!(writer, " {:4} {:6.2} {:6}", father, barrier, row.hits)?;
            }
            None => writeln!(writer, " {:6}", row.hits)?,
        }
        written += 1;
    }
    Ok(written)
}

/// Writes minima re-derived from a barrier listing, one line per distinct minimum in energy
/// order. The father column is echoed in the numbering of the input listing; merged records
/// that disagree about their father print `0`, as a root does.
pub fn write_fixed_barriers(
    writer: &mut impl Write,
    sequence: &Sequence,
    records: &[(Minimum, BarrierAggregate)],
    energy_range: Option<Energy>,
) -> io::Result<usize> {
    write_header(writer, sequence)?;
    let Some(lowest) = records.first().map(|(m, _)| m.energy) else {
        return Ok(0);
    };

    let mut written = 0;
    for (i, (minimum, info)) in records.iter().enumerate() {
        if out_of_range(minimum.energy, lowest, energy_range) {
            break;
        }
        let father = if info.is_resolved() { info.father } else { 0 };
        writeln!(
            writer,
            "{:4} {} {:6.2} {:4} {:6.2} {:6} {:6} {:10.6} {:6} {:10.6}",
            i + 1,
            minimum.structure,
            to_kcal(minimum.energy),
            father,
            to_kcal(info.e_diff),
            info.basin_size,
            info.father_basin_size,
            info.free_energy,
            info.gradient_basin,
            info.gradient_free_energy
        )?;
        written += 1;
    }
    Ok(written)
}
