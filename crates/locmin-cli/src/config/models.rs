use rnalocmin::core::models::energy::Energy;
use rnalocmin::engine::config::{ExploreConfig, FixBarriersConfig};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct RatesOutput {
    pub path: PathBuf,
    /// Degrees Celsius.
    pub temperature: f64,
}

#[derive(Debug, Clone)]
pub struct ExploreAppConfig {
    pub sequence_path: Option<PathBuf>,
    pub input_path: Option<PathBuf>,
    pub output_path: Option<PathBuf>,
    pub previous_path: Option<PathBuf>,
    pub param_file: Option<PathBuf>,
    pub rates: Option<RatesOutput>,
    pub energy_range: Option<Energy>,
    pub core_config: ExploreConfig,
}

#[derive(Debug, Clone)]
pub struct FixBarriersAppConfig {
    pub barriers_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub param_file: Option<PathBuf>,
    pub energy_range: Option<Energy>,
    pub core_config: FixBarriersConfig,
}
