use std::path::{Path, PathBuf};

use serde::Serialize;

use e2b_ingest::DEFAULT_MAX_FILE_SIZE_MB;
use e2b_model::ValidationResult;
use e2b_report::RenderOptions;
use e2b_transform::StandardizeOptions;

/// Settings for one batch conversion run.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub input_dir: PathBuf,
    /// Destination for `<report id>.xml` files and `summary.json`.
    pub output_dir: PathBuf,
    /// Destination for `<file id>.validation.json` quarantine files.
    pub error_dir: PathBuf,
    pub max_file_size_mb: u64,
    /// Validate and convert without writing anything.
    pub dry_run: bool,
    /// Also write the standard record as `json/<report id>.json`.
    pub write_json: bool,
    pub standardize: StandardizeOptions,
    pub render: RenderOptions,
}

impl PipelineConfig {
    /// Defaults: `<input>/output` for reports and `<input>/output/errors`
    /// for quarantined forms.
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        let input_dir = input_dir.into();
        let output_dir = input_dir.join("output");
        let error_dir = output_dir.join("errors");
        Self {
            input_dir,
            output_dir,
            error_dir,
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            dry_run: false,
            write_json: false,
            standardize: StandardizeOptions::default(),
            render: RenderOptions::default(),
        }
    }

    pub fn max_file_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(1024 * 1024)
    }

    pub fn xml_path(&self, report_id: &str) -> PathBuf {
        self.output_dir.join(format!("{report_id}.xml"))
    }

    pub fn json_path(&self, report_id: &str) -> PathBuf {
        self.output_dir.join("json").join(format!("{report_id}.json"))
    }

    pub fn quarantine_path(&self, file_id: &str) -> PathBuf {
        self.error_dir.join(format!("{file_id}.validation.json"))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join("summary.json")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Rendered to E2B XML.
    Converted,
    /// Failed validation and was quarantined.
    Rejected,
    /// Could not be read, standardized, rendered or written.
    Failed,
}

impl FileStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Converted => "converted",
            Self::Rejected => "rejected",
            Self::Failed => "failed",
        }
    }
}

/// What happened to one input file.
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    pub file: PathBuf,
    pub file_id: String,
    pub report_id: Option<String>,
    pub sha256: Option<String>,
    pub status: FileStatus,
    /// The XML file for converted reports, the quarantine file for rejected ones.
    pub output: Option<PathBuf>,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl FileOutcome {
    pub fn failed(file: &Path, file_id: &str, error: String) -> Self {
        Self {
            file: file.to_path_buf(),
            file_id: file_id.to_string(),
            report_id: None,
            sha256: None,
            status: FileStatus::Failed,
            output: None,
            errors: vec![error],
            warnings: Vec::new(),
        }
    }
}

/// Machine-readable record of a conversion run, written as `summary.json`.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub started_at: String,
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub error_dir: PathBuf,
    pub dry_run: bool,
    pub total_files: usize,
    pub converted: usize,
    pub rejected: usize,
    pub failed: usize,
    /// Percentage of files converted, rounded to two decimals.
    pub success_rate: f64,
    pub duration_ms: u64,
    pub files: Vec<FileOutcome>,
}

impl RunSummary {
    pub fn has_failures(&self) -> bool {
        self.rejected > 0 || self.failed > 0
    }
}

/// Percentage of `part` in `total`, rounded to two decimals; zero for an empty run.
pub fn success_rate(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = part as f64 / total as f64 * 100.0;
    (rate * 100.0).round() / 100.0
}

/// Per-file result of the `validate` command.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    pub file: PathBuf,
    pub file_id: String,
    /// `Err` holds the read failure for files that could not be parsed.
    pub result: Result<ValidationResult, String>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.result.as_ref().is_ok_and(|result| result.is_valid)
    }
}
