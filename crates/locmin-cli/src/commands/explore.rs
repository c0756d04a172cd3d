use super::{build_model, open_output, open_reader};
use crate::cli::ExploreArgs;
use crate::config::{ExploreAppConfig, build_explore_config};
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use rnalocmin::core::energy::EnergyModel;
use rnalocmin::core::io::rates::write_rates;
use rnalocmin::core::io::report::write_minima;
use rnalocmin::core::io::resume::{PreviousMinimum, read_previous};
use rnalocmin::core::io::sequence::read_sequence;
use rnalocmin::core::models::sequence::Sequence;
use rnalocmin::engine::direct_path::DirectPathEstimator;
use rnalocmin::engine::progress::ProgressReporter;
use rnalocmin::workflows::{self, explore::ExploreResult};
use std::fs::File;
use std::io::{self, BufRead, BufWriter, Write};
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: ExploreArgs) -> Result<()> {
    info!("Merging configuration from defaults, file and CLI arguments...");
    let app = build_explore_config(&args)?;

    let (sequence, previous) = load_sequence(&app)?;
    info!("Sequence of length {} loaded.", sequence.len());
    let model = build_model(
        sequence,
        app.param_file.as_deref(),
        app.core_config.descent.no_lone_pairs,
    )?;
    let estimator = DirectPathEstimator::new(&model);

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let mut candidates: Box<dyn BufRead> = match &app.input_path {
        Some(path) => {
            info!("Reading candidate structures from {:?}", path);
            Box::new(open_reader(path)?)
        }
        None => {
            info!("Reading candidate structures from standard input");
            Box::new(io::stdin().lock())
        }
    };

    info!("Invoking the exploration workflow...");
    let result = workflows::explore::run(
        &model,
        &estimator,
        &mut candidates,
        &previous,
        &app.core_config,
        &reporter,
    )?;

    let mut writer = open_output(app.output_path.as_deref())?;
    let written = write_minima(
        &mut writer,
        model.sequence(),
        &result.report_rows(),
        app.energy_range,
    )?;
    writer.flush()?;
    info!("Reported {} of {} minima.", written, result.minima.len());

    if let Some(rates) = &app.rates {
        write_rates_file(&result, &rates.path, rates.temperature)?;
        eprintln!("Rates written to: {}", rates.path.display());
    }

    print_summary(&result);
    Ok(())
}

fn load_sequence(app: &ExploreAppConfig) -> Result<(Sequence, Vec<PreviousMinimum>)> {
    let given = match &app.sequence_path {
        Some(path) => {
            info!("Loading sequence from {:?}", path);
            let named = read_sequence(&mut open_reader(path)?).map_err(|e| {
                CliError::FileParsing {
                    path: path.clone(),
                    source: e.into(),
                }
            })?;
            if let Some(name) = &named.name {
                info!("Sequence name: {}", name);
            }
            Some(named.sequence)
        }
        None => None,
    };

    let Some(path) = &app.previous_path else {
        let sequence = given.ok_or_else(|| {
            CliError::Argument("either --sequence or --previous is required".to_string())
        })?;
        return Ok((sequence, Vec::new()));
    };

    info!("Resuming from previous run {:?}", path);
    let run = read_previous(&mut open_reader(path)?).map_err(|e| CliError::FileParsing {
        path: path.clone(),
        source: e.into(),
    })?;
    if given.as_ref().is_some_and(|s| s != &run.sequence) {
        warn!(
            "Sequence of {:?} differs from the given sequence; using the one from the previous run.",
            path
        );
    }
    info!("{} minima loaded from the previous run.", run.minima.len());
    Ok((run.sequence, run.minima))
}

fn write_rates_file(result: &ExploreResult, path: &Path, temperature: f64) -> Result<()> {
    let Some(barriers) = &result.barriers else {
        return Err(CliError::Other(anyhow::anyhow!(
            "Rates requested but no barriers were computed"
        )));
    };
    info!("Writing rate matrix at {:.2} °C to {:?}", temperature, path);
    let mut file = BufWriter::new(File::create(path)?);
    write_rates(
        &mut file,
        &result.energies(),
        |i, j| barriers.matrix.get(i, j),
        temperature,
    )?;
    file.flush()?;
    Ok(())
}

fn print_summary(result: &ExploreResult) {
    let walk = &result.walk_stats;
    eprintln!(
        "Read {} structures ({} duplicates, {} descents, {} non-canonical, {} skipped).",
        walk.lines, walk.duplicates, walk.descents, walk.non_canonical, walk.skipped
    );
    eprintln!(
        "Found {} minima ({} shallow minima discarded).",
        result.minima.len(),
        result.shallow.len()
    );
    if let Some(barriers) = &result.barriers {
        eprintln!(
            "Flooded {}/{} minima, {} direct paths, {} tree root(s).",
            barriers.flooded,
            barriers.flood_attempts,
            barriers.direct_paths,
            barriers.tree.roots().len()
        );
    }
}
