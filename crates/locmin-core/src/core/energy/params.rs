use crate::core::models::energy::Energy;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const MAX_LOOP_TABLE: usize = 30;

/// Loop free-energy parameters at 37 °C, in fixed-point hundredths of kcal/mol.
///
/// Loop tables are indexed by loop size (number of unpaired nucleotides); sizes beyond
/// [`MAX_LOOP_TABLE`] are extrapolated logarithmically. Stacking is indexed by
/// `[outer pair][inner pair]` using `PairType::index`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct EnergyParameters {
    pub stacking: [[Energy; 6]; 6],
    pub hairpin: [Energy; MAX_LOOP_TABLE + 1],
    pub bulge: [Energy; MAX_LOOP_TABLE + 1],
    pub interior: [Energy; MAX_LOOP_TABLE + 1],
    pub ninio_per_nucleotide: Energy,
    pub ninio_max: Energy,
    pub multiloop_closing: Energy,
    pub multiloop_branch: Energy,
    pub multiloop_unpaired: Energy,
    pub terminal_au: Energy,
    pub mismatch_purine_purine: Energy,
    pub mismatch_purine: Energy,
    /// Coefficient of the logarithmic loop extrapolation (1.75 RT at 37 °C).
    pub loop_extrapolation: f64,
}

impl Default for EnergyParameters {
    fn default() -> Self {
        Self {
            stacking: [
                [-90, -110, -220, -210, -60, -140],
                [-130, -90, -240, -210, -100, -70],
                [-240, -210, -330, -240, -150, -150],
                [-210, -210, -240, -340, -140, -210],
                [-130, -100, -250, -150, -50, -130],
                [-100, -70, -150, -150, -30, -50],
            ],
            hairpin: [
                0, 0, 0, 540, 560, 570, 540, 560, 570, 540, 560, 570, 580, 590, 590, 600, 610,
                610, 620, 620, 630, 630, 630, 640, 640, 640, 650, 650, 650, 650, 660,
            ],
            bulge: [
                0, 380, 280, 320, 360, 400, 440, 460, 470, 480, 490, 500, 510, 520, 530, 540, 540,
                550, 550, 560, 560, 570, 570, 580, 580, 580, 590, 590, 590, 600, 600,
            ],
            interior: [
                0, 0, 0, 0, 110, 200, 200, 210, 230, 240, 250, 260, 270, 280, 290, 290, 300, 310,
                310, 320, 320, 330, 330, 340, 340, 340, 350, 350, 350, 360, 360,
            ],
            ninio_per_nucleotide: 60,
            ninio_max: 300,
            multiloop_closing: 340,
            multiloop_branch: 40,
            multiloop_unpaired: 0,
            terminal_au: 50,
            mismatch_purine_purine: -80,
            mismatch_purine: -40,
            loop_extrapolation: 107.856,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParamLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
}

impl EnergyParameters {
    /// Loads parameters from a TOML file; keys that are absent keep their default values.
    pub fn load(path: &Path) -> Result<Self, ParamLoadError> {
        let content = std::fs::read_to_string(path).map_err(|e| ParamLoadError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ParamLoadError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })
    }

    /// Looks `size` up in `table`, extrapolating beyond the tabulated range.
    pub fn loop_initiation(&self, table: &[Energy; MAX_LOOP_TABLE + 1], size: usize) -> Energy {
        if size <= MAX_LOOP_TABLE {
            table[size]
        } else {
            let ratio = size as f64 / MAX_LOOP_TABLE as f64;
            table[MAX_LOOP_TABLE] + (self.loop_extrapolation * ratio.ln()).round() as Energy
        }
    }
}
