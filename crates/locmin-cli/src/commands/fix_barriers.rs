use super::{build_model, open_output, open_reader};
use crate::cli::FixBarriersArgs;
use crate::config::build_fix_barriers_config;
use crate::error::{CliError, Result};
use crate::utils::progress::CliProgressHandler;
use rnalocmin::core::energy::EnergyModel;
use rnalocmin::core::io::report::write_fixed_barriers;
use rnalocmin::core::io::resume::read_barrier_listing;
use rnalocmin::engine::progress::ProgressReporter;
use rnalocmin::workflows;
use std::io::Write;
use tracing::info;

pub fn run(args: FixBarriersArgs) -> Result<()> {
    let app = build_fix_barriers_config(&args)?;

    info!("Loading barrier listing from {:?}", &app.barriers_path);
    let listing = read_barrier_listing(&mut open_reader(&app.barriers_path)?).map_err(|e| {
        CliError::FileParsing {
            path: app.barriers_path.clone(),
            source: e.into(),
        }
    })?;
    if listing.records.is_empty() {
        return Err(CliError::Argument(format!(
            "No minima found in {}",
            app.barriers_path.display()
        )));
    }

    let model = build_model(
        listing.sequence,
        app.param_file.as_deref(),
        app.core_config.descent.no_lone_pairs,
    )?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    info!("Invoking the fix-barriers workflow...");
    let result =
        workflows::fix_barriers::run(&model, &listing.records, &app.core_config, &reporter)?;

    let mut writer = open_output(app.output_path.as_deref())?;
    write_fixed_barriers(
        &mut writer,
        model.sequence(),
        &result.records,
        app.energy_range,
    )?;
    writer.flush()?;

    eprintln!(
        "{} listed minima: {} moved, {} merged, {} distinct.",
        listing.records.len(),
        result.moved,
        result.merged,
        result.records.len()
    );
    Ok(())
}
