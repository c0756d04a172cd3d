use rnalocmin::core::energy::moves::DEFAULT_PLATEAU_LIMIT;
use rnalocmin::engine::config::DescentStrategy;

pub struct DefaultsConfig {
    pub descent_strategy: DescentStrategy,
    pub no_lone_pairs: bool,
    pub max_descent_steps: usize,
    pub plateau_limit: usize,
    pub min_num: usize,
    pub min_height: f64,
    pub flood_portion: f64,
    pub flood_max_visited: usize,
    pub search_depth: usize,
    pub temperature: f64,
    pub rates_file: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            descent_strategy: DescentStrategy::Steepest,
            no_lone_pairs: false,
            max_descent_steps: 100_000,
            plateau_limit: DEFAULT_PLATEAU_LIMIT,
            min_num: 100,
            min_height: 0.0,
            flood_portion: 0.95,
            flood_max_visited: 1000,
            search_depth: 10,
            temperature: 37.0,
            rates_file: "rates.out".to_string(),
        }
    }
}
