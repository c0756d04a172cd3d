use super::defaults::DefaultsConfig;
use super::file::{FileConfig, FileDescentConfig, FileDescentStrategy};
use super::models::{ExploreAppConfig, FixBarriersAppConfig, RatesOutput};
use crate::cli::{ExploreArgs, FixBarriersArgs};
use crate::error::{CliError, Result};
use rnalocmin::core::io::rates::ZERO_CELSIUS;
use rnalocmin::core::models::energy::from_kcal;
use rnalocmin::engine::config::{self as core_config, DescentStrategy};
use std::path::{Path, PathBuf};
use std::str::FromStr;

struct ResolvedDescent {
    strategy: DescentStrategy,
    no_lone_pairs: bool,
    max_steps: usize,
    plateau_limit: usize,
    seed: Option<u64>,
}

pub fn build_explore_config(args: &ExploreArgs) -> Result<ExploreAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(args.config.as_deref(), &args.set_values)?;

    let descent = resolve_descent(
        args.rand,
        args.no_lp,
        args.seed,
        file_config.descent.take().unwrap_or_default(),
        &defaults,
    );
    let flood_file = file_config.flood.take().unwrap_or_default();
    let barriers_file = file_config.barriers.take().unwrap_or_default();
    let selection_file = file_config.selection.take().unwrap_or_default();
    let report_file = file_config.report.take().unwrap_or_default();

    let min_height = args
        .min_height
        .or(flood_file.min_height)
        .unwrap_or(defaults.min_height);
    let flood_portion = args
        .flood_portion
        .or(flood_file.portion)
        .unwrap_or(defaults.flood_portion);
    let flood_max_visited = args
        .flood_max
        .or(flood_file.max_visited)
        .unwrap_or(defaults.flood_max_visited);
    let search_depth = args
        .depth
        .or(barriers_file.search_depth)
        .unwrap_or(defaults.search_depth);
    let min_num = args
        .min_num
        .or(selection_file.min_num)
        .unwrap_or(defaults.min_num);
    let find_num = args.find_num.or(selection_file.find_num);

    let bartree = args.bartree || barriers_file.bartree.unwrap_or(false);
    let rates = args.rates || barriers_file.rates.unwrap_or(false);
    let no_sort = args.no_sort || report_file.no_sort.unwrap_or(false);
    let energy_range = args.e_range.or(report_file.energy_range).map(from_kcal);

    let rates = if rates {
        let temperature = args
            .temperature
            .or(barriers_file.temperature)
            .unwrap_or(defaults.temperature);
        if temperature <= -ZERO_CELSIUS {
            return Err(CliError::Config(format!(
                "Temperature {} °C is below absolute zero",
                temperature
            )));
        }
        Some(RatesOutput {
            path: args
                .rates_file
                .clone()
                .or(barriers_file.rates_file)
                .unwrap_or_else(|| PathBuf::from(&defaults.rates_file)),
            temperature,
        })
    } else {
        None
    };

    let core_config = core_config::ExploreConfigBuilder::new()
        .descent_strategy(descent.strategy)
        .no_lone_pairs(descent.no_lone_pairs)
        .max_descent_steps(descent.max_steps)
        .plateau_limit(descent.plateau_limit)
        .seed(descent.seed)
        .min_height(Some(from_kcal(min_height)))
        .flood_portion(flood_portion)
        .flood_max_visited(flood_max_visited)
        .compute_barriers(bartree || rates.is_some())
        .search_depth(search_depth)
        .find_num(find_num)
        .min_num(Some(min_num))
        .keep_insertion_order(no_sort)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(ExploreAppConfig {
        sequence_path: args.sequence.clone(),
        input_path: args.input.clone(),
        output_path: args.output.clone(),
        previous_path: args.previous.clone(),
        param_file: args.param_file.clone().or(file_config.parameter_file),
        rates,
        energy_range,
        core_config,
    })
}

pub fn build_fix_barriers_config(args: &FixBarriersArgs) -> Result<FixBarriersAppConfig> {
    let defaults = DefaultsConfig::default();
    let mut file_config = load_file_config(args.config.as_deref(), &args.set_values)?;

    let descent = resolve_descent(
        args.rand,
        args.no_lp,
        args.seed,
        file_config.descent.take().unwrap_or_default(),
        &defaults,
    );
    let report_file = file_config.report.take().unwrap_or_default();

    let core_config = core_config::FixBarriersConfigBuilder::new()
        .descent_strategy(descent.strategy)
        .no_lone_pairs(descent.no_lone_pairs)
        .max_descent_steps(descent.max_steps)
        .plateau_limit(descent.plateau_limit)
        .seed(descent.seed)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))?;

    Ok(FixBarriersAppConfig {
        barriers_path: args.barriers.clone(),
        output_path: args.output.clone(),
        param_file: args.param_file.clone().or(file_config.parameter_file),
        energy_range: args.e_range.or(report_file.energy_range).map(from_kcal),
        core_config,
    })
}

fn load_file_config(path: Option<&Path>, set_values: &[String]) -> Result<FileConfig> {
    let file_config = match path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    apply_set_values(file_config, set_values)
}

fn resolve_descent(
    cli_rand: bool,
    cli_no_lp: bool,
    cli_seed: Option<u64>,
    file_val: FileDescentConfig,
    defaults: &DefaultsConfig,
) -> ResolvedDescent {
    let strategy = if cli_rand {
        DescentStrategy::Random
    } else {
        file_val
            .strategy
            .map(Into::into)
            .unwrap_or(defaults.descent_strategy)
    };
    ResolvedDescent {
        strategy,
        no_lone_pairs: cli_no_lp || file_val.no_lone_pairs.unwrap_or(defaults.no_lone_pairs),
        max_steps: file_val.max_steps.unwrap_or(defaults.max_descent_steps),
        plateau_limit: file_val.plateau_limit.unwrap_or(defaults.plateau_limit),
        seed: cli_seed.or(file_val.seed),
    }
}

fn parse_value<T: FromStr>(key: &str, value: &str, kind: &str) -> Result<T> {
    value.parse().map_err(|_| {
        CliError::Config(format!("Invalid {} value for {}: {}", kind, key, value))
    })
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let Some((key, value_str)) = kv_pair.split_once('=') else {
            return Err(CliError::Config(format!(
                "Invalid --set format: '{}'. Expected KEY=VALUE.",
                kv_pair
            )));
        };

        match key {
            "parameter-file" => config.parameter_file = Some(PathBuf::from(value_str)),
            "descent.strategy" => {
                let strategy = match value_str {
                    "steepest" => FileDescentStrategy::Steepest,
                    "random" => FileDescentStrategy::Random,
                    _ => {
                        return Err(CliError::Config(format!(
                            "Invalid strategy for {}: {} (expected 'steepest' or 'random')",
                            key, value_str
                        )));
                    }
                };
                config.descent.get_or_insert_with(Default::default).strategy = Some(strategy);
            }
            "descent.no-lone-pairs" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .no_lone_pairs = Some(parse_value(key, value_str, "boolean")?);
            }
            "descent.max-steps" => {
                config.descent.get_or_insert_with(Default::default).max_steps =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "descent.plateau-limit" => {
                config
                    .descent
                    .get_or_insert_with(Default::default)
                    .plateau_limit = Some(parse_value(key, value_str, "integer")?);
            }
            "descent.seed" => {
                config.descent.get_or_insert_with(Default::default).seed =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "flood.min-height" => {
                config.flood.get_or_insert_with(Default::default).min_height =
                    Some(parse_value(key, value_str, "float")?);
            }
            "flood.portion" => {
                config.flood.get_or_insert_with(Default::default).portion =
                    Some(parse_value(key, value_str, "float")?);
            }
            "flood.max-visited" => {
                config.flood.get_or_insert_with(Default::default).max_visited =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "barriers.bartree" => {
                config.barriers.get_or_insert_with(Default::default).bartree =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "barriers.rates" => {
                config.barriers.get_or_insert_with(Default::default).rates =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "barriers.rates-file" => {
                config.barriers.get_or_insert_with(Default::default).rates_file =
                    Some(PathBuf::from(value_str));
            }
            "barriers.temperature" => {
                config.barriers.get_or_insert_with(Default::default).temperature =
                    Some(parse_value(key, value_str, "float")?);
            }
            "barriers.search-depth" => {
                config
                    .barriers
                    .get_or_insert_with(Default::default)
                    .search_depth = Some(parse_value(key, value_str, "integer")?);
            }
            "selection.find-num" => {
                config.selection.get_or_insert_with(Default::default).find_num =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "selection.min-num" => {
                config.selection.get_or_insert_with(Default::default).min_num =
                    Some(parse_value(key, value_str, "integer")?);
            }
            "report.no-sort" => {
                config.report.get_or_insert_with(Default::default).no_sort =
                    Some(parse_value(key, value_str, "boolean")?);
            }
            "report.energy-range" => {
                config.report.get_or_insert_with(Default::default).energy_range =
                    Some(parse_value(key, value_str, "float")?);
            }
            _ => {
                return Err(CliError::Config(format!(
                    "Unsupported configuration key for --set: '{}'",
                    key
                )));
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::{TempDir, tempdir};

    fn base_explore_args() -> ExploreArgs {
        ExploreArgs {
            sequence: Some(PathBuf::from("seq.fa")),
            input: None,
            output: None,
            previous: None,
            config: None,
            param_file: None,
            no_lp: false,
            rand: false,
            seed: None,
            find_num: None,
            min_num: None,
            min_height: None,
            no_sort: false,
            bartree: false,
            rates: false,
            rates_file: None,
            temperature: None,
            flood_portion: None,
            flood_max: None,
            depth: None,
            e_range: None,
            set_values: vec![],
        }
    }

    fn base_fix_args() -> FixBarriersArgs {
        FixBarriersArgs {
            barriers: PathBuf::from("barriers.txt"),
            output: None,
            config: None,
            param_file: None,
            no_lp: false,
            rand: false,
            seed: None,
            e_range: None,
            set_values: vec![],
        }
    }

    fn write_config(content: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().expect("create temp dir");
        let path = dir.path().join("locmin.toml");
        fs::write(&path, content).expect("write config");
        (dir, path)
    }

    #[test]
    fn defaults_fill_every_unset_value() {
        let app = build_explore_config(&base_explore_args()).expect("build ok");
        let cfg = app.core_config;
        assert_eq!(cfg.descent.strategy, DescentStrategy::Steepest);
        assert!(!cfg.descent.no_lone_pairs);
        assert_eq!(cfg.descent.max_steps, 100_000);
        assert_eq!(cfg.flood.portion, 0.95);
        assert_eq!(cfg.flood.max_visited, 1000);
        assert_eq!(cfg.flood.min_height, None);
        assert_eq!(cfg.barriers.search_depth, 10);
        assert!(!cfg.barriers.compute);
        assert_eq!(cfg.selection.min_num, Some(100));
        assert_eq!(cfg.selection.find_num, None);
        assert!(app.rates.is_none());
        assert!(app.energy_range.is_none());
    }

    #[test]
    fn cli_overrides_file_which_overrides_defaults() {
        let (_dir, path) = write_config(
            r#"
[flood]
portion = 0.5
min-height = 1.25

[selection]
min-num = 20
"#,
        );
        let mut args = base_explore_args();
        args.config = Some(path);
        args.flood_portion = Some(0.7);

        let cfg = build_explore_config(&args).expect("build ok").core_config;
        assert_eq!(cfg.flood.portion, 0.7);
        assert_eq!(cfg.flood.min_height, Some(125));
        assert_eq!(cfg.selection.min_num, Some(20));
    }

    #[test]
    fn set_values_override_file_but_not_cli_flags() {
        let (_dir, path) = write_config(
            r#"
[flood]
portion = 0.5
max-visited = 10
"#,
        );
        let mut args = base_explore_args();
        args.config = Some(path);
        args.flood_max = Some(30);
        args.set_values = vec![
            "flood.portion=0.6".to_string(),
            "flood.max-visited=20".to_string(),
            "descent.strategy=random".to_string(),
            "descent.seed=9".to_string(),
        ];

        let cfg = build_explore_config(&args).expect("build ok").core_config;
        assert_eq!(cfg.flood.portion, 0.6);
        assert_eq!(cfg.flood.max_visited, 30);
        assert_eq!(cfg.descent.strategy, DescentStrategy::Random);
        assert_eq!(cfg.descent.seed, Some(9));
    }

    #[test]
    fn rates_enable_barriers_and_use_default_output() {
        let mut args = base_explore_args();
        args.rates = true;

        let app = build_explore_config(&args).expect("build ok");
        assert!(app.core_config.barriers.compute);
        assert_eq!(
            app.rates,
            Some(RatesOutput {
                path: PathBuf::from("rates.out"),
                temperature: 37.0,
            })
        );
    }

    #[test]
    fn bartree_alone_computes_barriers_without_rates() {
        let mut args = base_explore_args();
        args.bartree = true;
        args.no_sort = true;
        args.e_range = Some(2.5);

        let app = build_explore_config(&args).expect("build ok");
        assert!(app.core_config.barriers.compute);
        assert!(app.core_config.selection.keep_insertion_order);
        assert!(app.rates.is_none());
        assert_eq!(app.energy_range, Some(250));
    }

    #[test]
    fn temperature_below_absolute_zero_is_rejected() {
        let mut args = base_explore_args();
        args.rates = true;
        args.temperature = Some(-300.0);
        assert!(matches!(
            build_explore_config(&args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn invalid_core_values_surface_as_config_errors() {
        let mut args = base_explore_args();
        args.flood_portion = Some(1.5);
        assert!(matches!(
            build_explore_config(&args),
            Err(CliError::Config(_))
        ));

        let mut args = base_explore_args();
        args.find_num = Some(0);
        assert!(matches!(
            build_explore_config(&args),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn malformed_set_values_are_rejected() {
        for bad in ["flood.portion", "flood.portion=abc", "no.such.key=1", "descent.strategy=up"] {
            let mut args = base_explore_args();
            args.set_values = vec![bad.to_string()];
            assert!(
                matches!(build_explore_config(&args), Err(CliError::Config(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn fix_barriers_merges_descent_and_report_settings() {
        let (_dir, path) = write_config(
            r#"
parameter-file = "params.toml"

[descent]
max-steps = 250

[report]
energy-range = 1.0
"#,
        );
        let mut args = base_fix_args();
        args.config = Some(path);
        args.no_lp = true;
        args.e_range = Some(2.0);

        let app = build_fix_barriers_config(&args).expect("build ok");
        assert!(app.core_config.descent.no_lone_pairs);
        assert_eq!(app.core_config.descent.max_steps, 250);
        assert_eq!(app.energy_range, Some(200));
        assert_eq!(app.param_file, Some(PathBuf::from("params.toml")));
        assert_eq!(app.barriers_path, PathBuf::from("barriers.txt"));
    }
}
