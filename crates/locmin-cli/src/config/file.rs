use crate::error::{CliError, Result};
use rnalocmin::engine::config::DescentStrategy;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum FileDescentStrategy {
    Steepest,
    Random,
}

impl From<FileDescentStrategy> for DescentStrategy {
    fn from(p: FileDescentStrategy) -> Self {
        match p {
            FileDescentStrategy::Steepest => DescentStrategy::Steepest,
            FileDescentStrategy::Random => DescentStrategy::Random,
        }
    }
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileDescentConfig {
    pub strategy: Option<FileDescentStrategy>,
    #[serde(rename = "no-lone-pairs")]
    pub no_lone_pairs: Option<bool>,
    #[serde(rename = "max-steps")]
    pub max_steps: Option<usize>,
    #[serde(rename = "plateau-limit")]
    pub plateau_limit: Option<usize>,
    pub seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileFloodConfig {
    /// kcal/mol
    #[serde(rename = "min-height")]
    pub min_height: Option<f64>,
    pub portion: Option<f64>,
    #[serde(rename = "max-visited")]
    pub max_visited: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileBarriersConfig {
    pub bartree: Option<bool>,
    pub rates: Option<bool>,
    #[serde(rename = "rates-file")]
    pub rates_file: Option<PathBuf>,
    pub temperature: Option<f64>,
    #[serde(rename = "search-depth")]
    pub search_depth: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileSelectionConfig {
    #[serde(rename = "find-num")]
    pub find_num: Option<usize>,
    #[serde(rename = "min-num")]
    pub min_num: Option<usize>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileReportConfig {
    #[serde(rename = "no-sort")]
    pub no_sort: Option<bool>,
    /// kcal/mol
    #[serde(rename = "energy-range")]
    pub energy_range: Option<f64>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(rename = "parameter-file")]
    pub parameter_file: Option<PathBuf>,
    pub descent: Option<FileDescentConfig>,
    pub flood: Option<FileFloodConfig>,
    pub barriers: Option<FileBarriersConfig>,
    pub selection: Option<FileSelectionConfig>,
    pub report: Option<FileReportConfig>,
}

impl FileConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn full_file_is_parsed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("locmin.toml");
        fs::write(
            &path,
            r#"
parameter-file = "turner.toml"

[descent]
strategy = "random"
no-lone-pairs = true
max-steps = 500
seed = 42

[flood]
min-height = 0.5
portion = 0.8
max-visited = 2000

[barriers]
bartree = true
rates-file = "out/rates.txt"
temperature = 25.0
search-depth = 5

[selection]
min-num = 20

[report]
no-sort = true
energy-range = 3.5
"#,
        )
        .unwrap();

        let config = FileConfig::from_file(&path).expect("parse ok");
        assert_eq!(config.parameter_file, Some(PathBuf::from("turner.toml")));
        let descent = config.descent.unwrap();
        assert_eq!(descent.strategy, Some(FileDescentStrategy::Random));
        assert_eq!(descent.no_lone_pairs, Some(true));
        assert_eq!(descent.max_steps, Some(500));
        assert_eq!(descent.plateau_limit, None);
        assert_eq!(descent.seed, Some(42));
        let flood = config.flood.unwrap();
        assert_eq!(flood.portion, Some(0.8));
        assert_eq!(flood.max_visited, Some(2000));
        let barriers = config.barriers.unwrap();
        assert_eq!(barriers.bartree, Some(true));
        assert_eq!(barriers.rates, None);
        assert_eq!(barriers.search_depth, Some(5));
        assert_eq!(config.selection.unwrap().min_num, Some(20));
        assert_eq!(config.report.unwrap().energy_range, Some(3.5));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[flood]\nportions = 0.5\n").unwrap();

        let result = FileConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = FileConfig::from_file(Path::new("/nonexistent/locmin.toml"));
        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
