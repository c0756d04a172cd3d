use crate::core::energy::moves::DEFAULT_PLATEAU_LIMIT;
use crate::core::models::energy::Energy;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),
    #[error("Invalid value for parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

/// How a walk picks its next step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DescentStrategy {
    /// Always the lowest improving neighbor.
    #[default]
    Steepest,
    /// A uniformly chosen improving neighbor.
    Random,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DescentConfig {
    pub strategy: DescentStrategy,
    /// Descend only in the lone-pair-free subspace and reject candidates outside it.
    pub no_lone_pairs: bool,
    pub max_steps: usize,
    pub plateau_limit: usize,
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FloodConfig {
    /// Minima whose escape saddle lies at most this far above them are discarded as shallow.
    pub min_height: Option<Energy>,
    /// Fraction of minima (by ascending hit count) that are flooded.
    pub portion: f64,
    /// Upper bound on configurations visited by a single flood.
    pub max_visited: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BarrierConfig {
    pub compute: bool,
    /// Beam width of the direct-path saddle search.
    pub search_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionConfig {
    /// Stop reading candidates once this many distinct minima are known.
    pub find_num: Option<usize>,
    /// Report at most this many minima.
    pub min_num: Option<usize>,
    /// Report minima in discovery order rather than by energy.
    pub keep_insertion_order: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExploreConfig {
    pub descent: DescentConfig,
    pub flood: FloodConfig,
    pub barriers: BarrierConfig,
    pub selection: SelectionConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixBarriersConfig {
    pub descent: DescentConfig,
}

#[derive(Default)]
struct DescentFields {
    strategy: Option<DescentStrategy>,
    no_lone_pairs: bool,
    max_steps: Option<usize>,
    plateau_limit: Option<usize>,
    seed: Option<u64>,
}

impl DescentFields {
    fn build(self) -> Result<DescentConfig, ConfigError> {
        let max_steps = self
            .max_steps
            .ok_or(ConfigError::MissingParameter("max_descent_steps"))?;
        if max_steps == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "max_descent_steps",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(DescentConfig {
            strategy: self
                .strategy
                .ok_or(ConfigError::MissingParameter("descent_strategy"))?,
            no_lone_pairs: self.no_lone_pairs,
            max_steps,
            plateau_limit: self.plateau_limit.unwrap_or(DEFAULT_PLATEAU_LIMIT).max(1),
            seed: self.seed,
        })
    }
}

#[derive(Default)]
pub struct ExploreConfigBuilder {
    descent: DescentFields,
    min_height: Option<Energy>,
    flood_portion: Option<f64>,
    flood_max_visited: Option<usize>,
    compute_barriers: bool,
    search_depth: Option<usize>,
    find_num: Option<usize>,
    min_num: Option<usize>,
    keep_insertion_order: bool,
}

impl ExploreConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descent_strategy(mut self, strategy: DescentStrategy) -> Self {
        self.descent.strategy = Some(strategy);
        self
    }
    pub fn no_lone_pairs(mut self, enabled: bool) -> Self {
        self.descent.no_lone_pairs = enabled;
        self
    }
    pub fn max_descent_steps(mut self, steps: usize) -> Self {
        self.descent.max_steps = Some(steps);
        self
    }
    pub fn plateau_limit(mut self, limit: usize) -> Self {
        self.descent.plateau_limit = Some(limit);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.descent.seed = seed;
        self
    }
    pub fn min_height(mut self, height: Option<Energy>) -> Self {
        self.min_height = height;
        self
    }
    pub fn flood_portion(mut self, portion: f64) -> Self {
        self.flood_portion = Some(portion);
        self
    }
    pub fn flood_max_visited(mut self, max: usize) -> Self {
        self.flood_max_visited = Some(max);
        self
    }
    pub fn compute_barriers(mut self, enabled: bool) -> Self {
        self.compute_barriers = enabled;
        self
    }
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = Some(depth);
        self
    }
    pub fn find_num(mut self, n: Option<usize>) -> Self {
        self.find_num = n;
        self
    }
    pub fn min_num(mut self, n: Option<usize>) -> Self {
        self.min_num = n;
        self
    }
    pub fn keep_insertion_order(mut self, enabled: bool) -> Self {
        self.keep_insertion_order = enabled;
        self
    }

    pub fn build(self) -> Result<ExploreConfig, ConfigError> {
        let descent = self.descent.build()?;

        let portion = self
            .flood_portion
            .ok_or(ConfigError::MissingParameter("flood_portion"))?;
        if !(0.0..=1.0).contains(&portion) {
            return Err(ConfigError::InvalidParameter {
                name: "flood_portion",
                reason: format!("{portion} is outside [0, 1]"),
            });
        }
        let max_visited = self
            .flood_max_visited
            .ok_or(ConfigError::MissingParameter("flood_max_visited"))?;
        if max_visited == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "flood_max_visited",
                reason: "must be at least 1".to_string(),
            });
        }
        let search_depth = self
            .search_depth
            .ok_or(ConfigError::MissingParameter("search_depth"))?;
        if search_depth == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "search_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.find_num == Some(0) {
            return Err(ConfigError::InvalidParameter {
                name: "find_num",
                reason: "must be at least 1".to_string(),
            });
        }

        Ok(ExploreConfig {
            descent,
            flood: FloodConfig {
                min_height: self.min_height.filter(|&h| h > 0),
                portion,
                max_visited,
            },
            barriers: BarrierConfig {
                compute: self.compute_barriers,
                search_depth,
            },
            selection: SelectionConfig {
                find_num: self.find_num,
                // zero means "no limit"
                min_num: self.min_num.filter(|&n| n > 0),
                keep_insertion_order: self.keep_insertion_order,
            },
        })
    }
}

#[derive(Default)]
pub struct FixBarriersConfigBuilder {
    descent: DescentFields,
}

impl FixBarriersConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn descent_strategy(mut self, strategy: DescentStrategy) -> Self {
        self.descent.strategy = Some(strategy);
        self
    }
    pub fn no_lone_pairs(mut self, enabled: bool) -> Self {
        self.descent.no_lone_pairs = enabled;
        self
    }
    pub fn max_descent_steps(mut self, steps: usize) -> Self {
        self.descent.max_steps = Some(steps);
        self
    }
    pub fn plateau_limit(mut self, limit: usize) -> Self {
        self.descent.plateau_limit = Some(limit);
        self
    }
    pub fn seed(mut self, seed: Option<u64>) -> Self {
        self.descent.seed = seed;
        self
    }

    pub fn build(self) -> Result<FixBarriersConfig, ConfigError> {
        Ok(FixBarriersConfig {
            descent: self.descent.build()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> ExploreConfigBuilder {
        ExploreConfigBuilder::new()
            .descent_strategy(DescentStrategy::Steepest)
            .max_descent_steps(1000)
            .flood_portion(0.95)
            .flood_max_visited(1000)
            .search_depth(10)
    }

    #[test]
    fn complete_builder_succeeds_with_defaults() {
        let config = complete().build().unwrap();
        assert_eq!(config.descent.plateau_limit, DEFAULT_PLATEAU_LIMIT);
        assert!(!config.barriers.compute);
        assert_eq!(config.flood.min_height, None);
        assert_eq!(config.selection, SelectionConfig::default());
    }

    #[test]
    fn missing_strategy_is_reported() {
        let result = ExploreConfigBuilder::new()
            .max_descent_steps(10)
            .flood_portion(0.5)
            .flood_max_visited(10)
            .search_depth(1)
            .build();
        assert_eq!(
            result.unwrap_err(),
            ConfigError::MissingParameter("descent_strategy")
        );
    }

    #[test]
    fn flood_portion_must_be_a_fraction() {
        let err = complete().flood_portion(1.5).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "flood_portion", .. }
        ));
    }

    #[test]
    fn zero_limits_mean_unlimited_or_disabled() {
        let config = complete().min_num(Some(0)).min_height(Some(0)).build().unwrap();
        assert_eq!(config.selection.min_num, None);
        assert_eq!(config.flood.min_height, None);
    }

    #[test]
    fn zero_find_num_is_rejected() {
        assert!(complete().find_num(Some(0)).build().is_err());
    }

    #[test]
    fn fix_barriers_requires_descent_parameters() {
        assert_eq!(
            FixBarriersConfigBuilder::new().build().unwrap_err(),
            ConfigError::MissingParameter("max_descent_steps")
        );
        let config = FixBarriersConfigBuilder::new()
            .descent_strategy(DescentStrategy::Random)
            .max_descent_steps(5)
            .seed(Some(3))
            .build()
            .unwrap();
        assert_eq!(config.descent.strategy, DescentStrategy::Random);
        assert_eq!(config.descent.seed, Some(3));
    }
}
