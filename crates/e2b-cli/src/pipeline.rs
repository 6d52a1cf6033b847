//! Batch conversion pipeline with explicit stages.
//!
//! The pipeline follows these stages in order:
//! 1. **Scan**: list `.xml` and `.json` forms in the input directory
//! 2. **Read**: parse each form; unreadable files are recorded and skipped
//! 3. **Validate**: run the complete report validation and partition the batch
//! 4. **Convert**: extract, standardize and render valid reports as E2B XML
//! 5. **Quarantine**: write validation results of rejected reports
//! 6. **Summary**: write `summary.json` for the run
//!
//! A failure in one report never stops its siblings.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use chrono::{SecondsFormat, Utc};
use tracing::{debug, error, info, info_span, trace, warn};

use e2b_ingest::{
    SUPPORTED_EXTENSIONS, compute_file_sha256, file_id_for, read_form, scan_for_files,
};
use e2b_model::{RawForm, ValidationResult};
use e2b_report::{
    render_e2b_xml, write_e2b_xml, write_json, write_standard_record_json,
    write_validation_result_json,
};
use e2b_transform::{extract_adverse_event_data, transform_to_standard};
use e2b_validate::{RejectedForm, partition_forms, validate_complete_report};

use crate::logging::redact_value;
use crate::types::{
    FileOutcome, FileStatus, PipelineConfig, RunSummary, ValidationOutcome, success_rate,
};

// ============================================================================
// Stage 1: Scan
// ============================================================================

/// List the forms in `input_dir`, sorted by file name.
pub fn scan(input_dir: &Path) -> Result<Vec<PathBuf>> {
    scan_for_files(input_dir, SUPPORTED_EXTENSIONS)
        .with_context(|| format!("scan {}", input_dir.display()))
}

// ============================================================================
// Stage 2: Read
// ============================================================================

/// Where a form came from.
#[derive(Debug, Clone, Default)]
pub struct SourceMeta {
    pub path: PathBuf,
    /// SHA-256 of the source file; `None` if it could not be hashed.
    pub sha256: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SourceForm {
    pub meta: SourceMeta,
    pub form: RawForm,
}

/// Result of the read stage.
#[derive(Debug, Default)]
pub struct ReadResult {
    pub forms: Vec<SourceForm>,
    /// Files that could not be read or parsed.
    pub failures: Vec<FileOutcome>,
}

/// Read every file, recording failures instead of stopping.
///
/// File ids are made unique within the batch so quarantine files never
/// overwrite each other (`case.xml` and `case.json` share a stem).
pub fn read_sources(paths: &[PathBuf], max_bytes: u64) -> ReadResult {
    let mut result = ReadResult::default();
    let mut taken = BTreeSet::new();

    for path in paths {
        let mut form = match read_form(path, max_bytes) {
            Ok(form) => form,
            Err(err) => {
                error!(file = %path.display(), error = %err, "failed to read form");
                result.failures.push(FileOutcome::failed(
                    path,
                    &file_id_for(path),
                    err.to_string(),
                ));
                continue;
            }
        };
        form.file_id = unique_file_id(&mut taken, &form.file_id, path);

        let sha256 = match compute_file_sha256(path) {
            Ok(digest) => Some(digest),
            Err(err) => {
                warn!(file = %path.display(), error = %err, "failed to hash form");
                None
            }
        };
        debug!(
            file = %path.display(),
            file_id = %form.file_id,
            report_id = form.report_id().unwrap_or("-"),
            "read form"
        );
        result.forms.push(SourceForm {
            meta: SourceMeta {
                path: path.clone(),
                sha256,
            },
            form,
        });
    }
    result
}

fn unique_file_id(taken: &mut BTreeSet<String>, preferred: &str, path: &Path) -> String {
    let base = if preferred.is_empty() {
        file_id_for(path)
    } else {
        preferred.to_string()
    };
    let mut candidate = base.clone();
    if taken.contains(&candidate) {
        candidate = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| base.clone());
    }
    let mut suffix = 2usize;
    while taken.contains(&candidate) {
        candidate = format!("{base}-{suffix}");
        suffix += 1;
    }
    taken.insert(candidate.clone());
    candidate
}

// ============================================================================
// Stage 3: Validate
// ============================================================================

/// A batch split by validity, with each form's source attached.
#[derive(Debug, Default)]
pub struct ValidatedBatch {
    pub valid: Vec<(SourceMeta, RawForm, ValidationResult)>,
    pub invalid: Vec<(SourceMeta, RejectedForm)>,
}

pub fn validate(sources: Vec<SourceForm>) -> ValidatedBatch {
    let mut meta_by_id = BTreeMap::new();
    let forms = sources
        .into_iter()
        .map(|source| {
            meta_by_id.insert(source.form.file_id.clone(), source.meta);
            source.form
        })
        .collect();

    let partition = partition_forms(forms);
    let mut batch = ValidatedBatch::default();
    for (form, result) in partition.valid {
        let meta = meta_by_id.remove(&form.file_id).unwrap_or_default();
        batch.valid.push((meta, form, result));
    }
    for rejected in partition.invalid {
        let meta = meta_by_id.remove(&rejected.form.file_id).unwrap_or_default();
        batch.invalid.push((meta, rejected));
    }
    batch
}

// ============================================================================
// Stage 4: Convert
// ============================================================================

/// Extract, standardize and render one valid form.
///
/// Returns the written XML path, or `None` on a dry run.
pub fn convert_form(config: &PipelineConfig, form: &RawForm) -> Result<Option<PathBuf>> {
    let event = extract_adverse_event_data(form).context("extract adverse event data")?;
    let record = transform_to_standard(&event, &config.standardize).context("standardize")?;
    trace!(
        report_id = %record.report_identifier,
        patient_initials = redact_value(record.patient_demographics.initials.as_deref().unwrap_or("")),
        reporter_family_name = redact_value(record.reporter.family_name.as_deref().unwrap_or("")),
        "standardized record"
    );

    if config.dry_run {
        render_e2b_xml(&record, &config.render).context("render E2B XML")?;
        return Ok(None);
    }

    let path = config.xml_path(&record.report_identifier);
    write_e2b_xml(&path, &record, &config.render)
        .with_context(|| format!("write {}", path.display()))?;
    if config.write_json {
        let json_path = config.json_path(&record.report_identifier);
        write_standard_record_json(&json_path, &record)
            .with_context(|| format!("write {}", json_path.display()))?;
    }
    Ok(Some(path))
}

fn convert_one(
    config: &PipelineConfig,
    meta: SourceMeta,
    form: &RawForm,
    result: ValidationResult,
) -> FileOutcome {
    let (status, output, errors) = match convert_form(config, form) {
        Ok(output) => (FileStatus::Converted, output, Vec::new()),
        Err(err) => {
            error!(
                file_id = %form.file_id,
                report_id = %result.report_id,
                error = %format!("{err:#}"),
                "conversion failed"
            );
            (FileStatus::Failed, None, vec![format!("{err:#}")])
        }
    };
    FileOutcome {
        file: meta.path,
        file_id: form.file_id.clone(),
        report_id: Some(result.report_id),
        sha256: meta.sha256,
        status,
        output,
        errors,
        warnings: result.warnings,
    }
}

// ============================================================================
// Stage 5: Quarantine
// ============================================================================

fn quarantine(config: &PipelineConfig, meta: SourceMeta, rejected: RejectedForm) -> FileOutcome {
    let RejectedForm { form, result } = rejected;
    warn!(
        file_id = %form.file_id,
        report_id = %result.report_id,
        errors = result.error_count(),
        "report rejected"
    );

    let mut errors = result.errors.clone();
    let mut output = None;
    if !config.dry_run {
        let path = config.quarantine_path(&form.file_id);
        match write_validation_result_json(&path, &result) {
            Ok(()) => output = Some(path),
            Err(err) => {
                error!(path = %path.display(), error = %err, "failed to quarantine report");
                errors.push(format!("quarantine: {err}"));
            }
        }
    }

    FileOutcome {
        file: meta.path,
        file_id: form.file_id,
        report_id: Some(result.report_id),
        sha256: meta.sha256,
        status: FileStatus::Rejected,
        output,
        errors,
        warnings: result.warnings,
    }
}

// ============================================================================
// Full run
// ============================================================================

/// Run every stage over `config.input_dir` and write `summary.json`.
///
/// Only scan and summary failures abort the run; everything else is recorded
/// per file in the returned summary.
pub fn run_pipeline(config: &PipelineConfig) -> Result<RunSummary> {
    let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);
    let start = Instant::now();

    let paths = info_span!("scan", input_dir = %config.input_dir.display())
        .in_scope(|| scan(&config.input_dir))?;
    info!(file_count = paths.len(), "scan complete");

    let read_start = Instant::now();
    let ReadResult { forms, failures } = read_sources(&paths, config.max_file_bytes());
    info!(
        read = forms.len(),
        failed = failures.len(),
        duration_ms = read_start.elapsed().as_millis(),
        "read complete"
    );

    let batch = validate(forms);

    let convert_start = Instant::now();
    let mut outcomes = failures;
    let mut written = BTreeSet::new();
    for (meta, form, result) in batch.valid {
        let span = info_span!("report", report_id = %result.report_id);
        let outcome = span.in_scope(|| convert_one(config, meta, &form, result));
        if let Some(path) = &outcome.output
            && !written.insert(path.clone())
        {
            warn!(path = %path.display(), "report id repeated in batch, output overwritten");
        }
        outcomes.push(outcome);
    }
    for (meta, rejected) in batch.invalid {
        outcomes.push(quarantine(config, meta, rejected));
    }
    info!(
        reports = outcomes.len(),
        duration_ms = convert_start.elapsed().as_millis(),
        "conversion complete"
    );

    outcomes.sort_by(|a, b| a.file.cmp(&b.file));
    let count = |status: FileStatus| outcomes.iter().filter(|o| o.status == status).count();
    let converted = count(FileStatus::Converted);
    let rejected = count(FileStatus::Rejected);
    let failed = count(FileStatus::Failed);

    let summary = RunSummary {
        started_at,
        input_dir: config.input_dir.clone(),
        output_dir: config.output_dir.clone(),
        error_dir: config.error_dir.clone(),
        dry_run: config.dry_run,
        total_files: paths.len(),
        converted,
        rejected,
        failed,
        success_rate: success_rate(converted, paths.len()),
        duration_ms: u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX),
        files: outcomes,
    };

    if !config.dry_run {
        let path = config.summary_path();
        write_json(&path, &summary).with_context(|| format!("write {}", path.display()))?;
    }
    info!(
        total = summary.total_files,
        converted,
        rejected,
        failed,
        success_rate = summary.success_rate,
        duration_ms = summary.duration_ms,
        "pipeline complete"
    );
    Ok(summary)
}

/// Validate every form in `input_dir` without converting anything.
pub fn validate_directory(input_dir: &Path, max_bytes: u64) -> Result<Vec<ValidationOutcome>> {
    let paths = scan(input_dir)?;
    let outcomes = paths
        .into_iter()
        .map(|path| {
            let file_id = file_id_for(&path);
            let result = read_form(&path, max_bytes)
                .map(|form| validate_complete_report(&form))
                .map_err(|err| err.to_string());
            ValidationOutcome {
                file: path,
                file_id,
                result,
            }
        })
        .collect();
    Ok(outcomes)
}
