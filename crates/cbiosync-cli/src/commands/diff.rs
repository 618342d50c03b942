//! Diff command
//!
//! Usage: cbiosync diff --study <ID> (--token <FILE> | --snapshot <DIR>) [options]
//!
//! The change summary goes to stdout, logs go to stderr.

use cbiosync_core::diff::render_human_summary;
use cbiosync_core::logging_facility::{init, Profile};
use cbiosync_core::run::{reconcile_and_write, RunConfig, DEFAULT_DATASHEET_DIR};
use cbiosync_core::source::ClinicalSource;
use cbiosync_core::StudyConfig;
use cbiosync_portal::{load_token, JsonSnapshotSource, PortalClient, DEFAULT_PORTAL_URL};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Human,
    Json,
}

#[derive(Debug, Args)]
pub struct DiffArgs {
    /// Cancer study id on the portal
    #[arg(short, long)]
    pub study: String,

    /// Any URL on the portal host; only scheme, host and port are used
    #[arg(short, long, default_value = DEFAULT_PORTAL_URL)]
    pub url: String,

    /// Token file downloaded from the portal (`token: <value>`)
    #[arg(short, long, required_unless_present = "snapshot", conflicts_with = "snapshot")]
    pub token: Option<PathBuf>,

    /// Read the current side from a JSON export instead of the portal
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Directory with data_clinical_sample.txt and data_clinical_patient.txt
    #[arg(short, long, default_value = DEFAULT_DATASHEET_DIR)]
    pub datasheets: PathBuf,

    /// Sample datasheet, overriding the one under --datasheets
    #[arg(long)]
    pub datasheet_sample: Option<PathBuf>,

    /// Patient datasheet, overriding the one under --datasheets
    #[arg(long)]
    pub datasheet_patient: Option<PathBuf>,

    /// Directory of data_clinical_timeline_*.txt files; timelines are skipped without it
    #[arg(long)]
    pub timeline_dir: Option<PathBuf>,

    /// File manifest to subset for newly added samples
    #[arg(short, long)]
    pub manifest: Option<PathBuf>,

    /// Manifest column matched against new sample ids
    #[arg(long)]
    pub join_column: Option<String>,

    /// YAML study config overriding the comparison defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Root directory for the delta and add outputs
    #[arg(short, long, default_value = ".")]
    pub out: PathBuf,

    /// Print the run summary as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Log line format on stderr
    #[arg(long, value_enum, default_value_t = LogFormat::Human)]
    pub log_format: LogFormat,
}

/// Execute diff command
pub fn execute(args: DiffArgs) -> Result<(), Box<dyn std::error::Error>> {
    init(match args.log_format {
        LogFormat::Human => Profile::Development,
        LogFormat::Json => Profile::Production,
    });

    let config = run_config(&args)?;

    let source: Box<dyn ClinicalSource> = match (&args.snapshot, &args.token) {
        (Some(dir), _) => Box::new(JsonSnapshotSource::new(dir)),
        (None, Some(token_path)) => {
            let token = load_token(token_path)?;
            Box::new(PortalClient::new(&args.url, token)?)
        }
        (None, None) => return Err("one of --token or --snapshot is required".into()),
    };

    let (report, written) = reconcile_and_write(source.as_ref(), &config)?;

    if args.json {
        let mut summary = report.summary();
        summary.outputs = written.iter().map(|p| p.display().to_string()).collect();
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_human_summary(&report));
        for path in &written {
            println!("wrote {}", path.display());
        }
    }

    Ok(())
}

fn run_config(args: &DiffArgs) -> Result<RunConfig, Box<dyn std::error::Error>> {
    let mut config = RunConfig::new(args.study.as_str(), &args.datasheets);

    if let Some(path) = &args.config {
        config.study_config = StudyConfig::load(path)?;
    }
    if let Some(column) = &args.join_column {
        config.study_config.manifest_join_column = column.clone();
    }
    if let Some(path) = &args.datasheet_sample {
        config.datasheet_sample = path.clone();
    }
    if let Some(path) = &args.datasheet_patient {
        config.datasheet_patient = path.clone();
    }
    config.timeline_dir = args.timeline_dir.clone();
    config.manifest = args.manifest.clone();
    config.output_root = args.out.clone();

    Ok(config)
}
