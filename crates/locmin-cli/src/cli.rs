use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

const HELP_TEMPLATE: &str = "\
{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}
";

#[derive(Parser, Debug)]
#[command(
    author = "RNAlocmin-rs Contributors",
    version,
    about = "locmin - Maps RNA secondary structures onto local minima of the energy landscape and computes barrier trees between them.",
    help_template = HELP_TEMPLATE,
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except for errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Write logs to a specified file in addition to the console output
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Set the number of threads used for pairwise saddle estimation.
    /// Defaults to the number of available logical cores.
    #[arg(short = 'j', long, global = true, value_name = "NUM")]
    pub threads: Option<usize>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Descend sampled structures to local minima, optionally computing barriers and rates.
    Explore(ExploreArgs),
    /// Re-descend the minima of a barrier listing and merge those that coincide.
    FixBarriers(FixBarriersArgs),
}

/// Arguments for the `explore` subcommand.
#[derive(Args, Debug)]
pub struct ExploreArgs {
    // --- Input / Output ---
    /// Sequence file (plain or FASTA). Not needed when resuming with --previous.
    #[arg(short, long, value_name = "PATH", required_unless_present = "previous")]
    pub sequence: Option<PathBuf>,

    /// File with candidate structures, one per line. Reads standard input when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Write the minima report to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Minima report of an earlier run; its minima and hit counts seed this run.
    #[arg(long, value_name = "PATH")]
    pub previous: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Energy parameter file in TOML format. Built-in parameters are used when omitted.
    #[arg(short = 'P', long, value_name = "PATH")]
    pub param_file: Option<PathBuf>,

    // --- Descent ---
    /// Forbid structures with isolated base pairs.
    #[arg(long)]
    pub no_lp: bool,

    /// Use randomized instead of steepest descent.
    #[arg(long)]
    pub rand: bool,

    /// Seed for randomized descent.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    // --- Selection ---
    /// Stop reading input once this many distinct minima have been found.
    #[arg(long, value_name = "INT")]
    pub find_num: Option<usize>,

    /// Number of lowest minima to keep for the report and barrier computation (0 keeps all).
    #[arg(short = 'm', long, value_name = "INT")]
    pub min_num: Option<usize>,

    /// Discard minima whose flood escapes within this height, in kcal/mol (0 disables).
    #[arg(long = "minh", value_name = "FLOAT")]
    pub min_height: Option<f64>,

    /// Report minima in the order they were found instead of by energy.
    #[arg(long)]
    pub no_sort: bool,

    // --- Barriers ---
    /// Compute the barrier tree and report father and barrier height of every minimum.
    #[arg(short, long)]
    pub bartree: bool,

    /// Compute barriers and write the transition-rate matrix.
    #[arg(short, long)]
    pub rates: bool,

    /// Output file for the rate matrix.
    #[arg(long, value_name = "PATH")]
    pub rates_file: Option<PathBuf>,

    /// Temperature in degrees Celsius used for the rates.
    #[arg(short = 'T', long = "temp", value_name = "FLOAT")]
    pub temperature: Option<f64>,

    /// Fraction of the least visited minima that are flooded.
    #[arg(long, value_name = "FLOAT")]
    pub flood_portion: Option<f64>,

    /// Maximum number of structures a single flood may visit.
    #[arg(long, value_name = "INT")]
    pub flood_max: Option<usize>,

    /// Beam width of the direct-path saddle search.
    #[arg(long, value_name = "INT")]
    pub depth: Option<usize>,

    /// Only report minima within this range above the lowest one, in kcal/mol.
    #[arg(short, long, value_name = "FLOAT")]
    pub e_range: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    /// Can be used multiple times. Example: -S flood.portion=0.5
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

/// Arguments for the `fix-barriers` subcommand.
#[derive(Args, Debug)]
pub struct FixBarriersArgs {
    /// Barrier listing whose first line carries the sequence.
    #[arg(value_name = "PATH")]
    pub barriers: PathBuf,

    /// Write the merged listing to this file instead of standard output.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Path to a configuration file in TOML format.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Energy parameter file in TOML format.
    #[arg(short = 'P', long, value_name = "PATH")]
    pub param_file: Option<PathBuf>,

    /// Forbid structures with isolated base pairs.
    #[arg(long)]
    pub no_lp: bool,

    /// Use randomized instead of steepest descent.
    #[arg(long)]
    pub rand: bool,

    /// Seed for randomized descent.
    #[arg(long, value_name = "INT")]
    pub seed: Option<u64>,

    /// Only report minima within this range above the lowest one, in kcal/mol.
    #[arg(short, long, value_name = "FLOAT")]
    pub e_range: Option<f64>,

    /// Set a specific configuration value, overriding the config file.
    #[arg(short = 'S', long = "set", value_name = "KEY=VALUE", num_args(0..))]
    pub set_values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explore_accepts_previous_without_sequence() {
        let cli = Cli::try_parse_from(["locmin", "explore", "--previous", "prev.txt", "-b"])
            .expect("parse ok");
        let Commands::Explore(args) = cli.command else {
            panic!("expected explore");
        };
        assert!(args.sequence.is_none());
        assert!(args.bartree);
        assert_eq!(args.previous, Some(PathBuf::from("prev.txt")));
    }

    #[test]
    fn explore_requires_a_sequence_source() {
        assert!(Cli::try_parse_from(["locmin", "explore"]).is_err());
    }

    #[test]
    fn global_flags_follow_the_subcommand() {
        let cli = Cli::try_parse_from([
            "locmin", "fix-barriers", "barr.txt", "-vv", "-j", "4", "-S", "descent.max-steps=10",
        ])
        .expect("parse ok");
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.threads, Some(4));
        let Commands::FixBarriers(args) = cli.command else {
            panic!("expected fix-barriers");
        };
        assert_eq!(args.barriers, PathBuf::from("barr.txt"));
        assert_eq!(args.set_values, vec!["descent.max-steps=10".to_string()]);
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["locmin", "-q", "-v", "fix-barriers", "b.txt"]).is_err());
    }
}
