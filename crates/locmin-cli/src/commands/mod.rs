pub mod explore;
pub mod fix_barriers;

use crate::error::{CliError, Result};
use rnalocmin::core::energy::nearest_neighbor::NearestNeighborModel;
use rnalocmin::core::energy::params::EnergyParameters;
use rnalocmin::core::models::sequence::Sequence;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;
use tracing::info;

pub(crate) fn open_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| {
        CliError::Io(io::Error::new(
            e.kind(),
            format!("Cannot open '{}': {}", path.display(), e),
        ))
    })?;
    Ok(BufReader::new(file))
}

/// Report destination: the given file, or standard output.
pub(crate) fn open_output(path: Option<&Path>) -> Result<Box<dyn Write>> {
    Ok(match path {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    })
}

pub(crate) fn build_model(
    sequence: Sequence,
    param_file: Option<&Path>,
    no_lone_pairs: bool,
) -> Result<NearestNeighborModel> {
    let params = match param_file {
        Some(path) => {
            info!("Loading energy parameters from {:?}", path);
            EnergyParameters::load(path).map_err(|e| CliError::FileParsing {
                path: path.to_path_buf(),
                source: e.into(),
            })?
        }
        None => EnergyParameters::default(),
    };
    Ok(NearestNeighborModel::new(sequence, params).with_no_lone_pairs(no_lone_pairs))
}
