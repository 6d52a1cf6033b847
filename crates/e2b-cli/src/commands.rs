use std::time::Instant;

use anyhow::Result;
use tracing::{info, info_span};

use e2b_cli::pipeline::{run_pipeline, validate_directory};
use e2b_cli::types::{PipelineConfig, RunSummary, ValidationOutcome};
use e2b_report::RenderOptions;
use e2b_transform::StandardizeOptions;

use crate::cli::{ConvertArgs, ValidateArgs};

pub fn run_convert(args: &ConvertArgs) -> Result<RunSummary> {
    let config = pipeline_config(args);
    let span = info_span!(
        "convert",
        input_dir = %config.input_dir.display(),
        dry_run = config.dry_run
    );
    let _guard = span.enter();
    run_pipeline(&config)
}

pub fn run_validate(args: &ValidateArgs) -> Result<Vec<ValidationOutcome>> {
    let span = info_span!("validate", input_dir = %args.input_dir.display());
    let _guard = span.enter();
    let start = Instant::now();

    let max_bytes = args.max_file_size_mb.saturating_mul(1024 * 1024);
    let outcomes = validate_directory(&args.input_dir, max_bytes)?;
    info!(
        files = outcomes.len(),
        valid = outcomes.iter().filter(|o| o.is_valid()).count(),
        duration_ms = start.elapsed().as_millis(),
        "validation complete"
    );
    Ok(outcomes)
}

fn pipeline_config(args: &ConvertArgs) -> PipelineConfig {
    let mut config = PipelineConfig::new(&args.input_dir);
    if let Some(dir) = &args.output_dir {
        config.output_dir = dir.clone();
        config.error_dir = dir.join("errors");
    }
    if let Some(dir) = &args.error_dir {
        config.error_dir = dir.clone();
    }
    config.max_file_size_mb = args.max_file_size_mb;
    config.dry_run = args.dry_run;
    config.write_json = args.write_json;

    let mut standardize = if args.strict_mapping {
        StandardizeOptions::strict()
    } else {
        StandardizeOptions::default()
    };
    standardize.default_transmission_date = args.transmission_date.clone();
    config.standardize = standardize;

    config.render = RenderOptions {
        occurrence_country: args.occurrence_country.clone(),
        sender_identifier: args.sender_id.clone(),
        receiver_identifier: args.receiver_id.clone(),
    };
    config
}
