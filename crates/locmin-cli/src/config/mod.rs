mod builder;
mod defaults;
mod file;
mod models;

pub use builder::{build_explore_config, build_fix_barriers_config};
pub use models::{ExploreAppConfig, FixBarriersAppConfig, RatesOutput};
