use std::path::PathBuf;

use clap::{Args, Command, FromArgMatches as _};

use crate::community::Community;
use crate::error::SimError;
use crate::log::{apply_log_level_spec, info, LogLevelSpec};
use crate::parameters::Parameters;
use crate::report::{CsvReportSink, ReportOptions};

/// Default cli arguments for the homeshare runner
#[derive(Args, Debug, Clone)]
pub struct BaseArgs {
    /// Random seed
    #[arg(short, long, default_value = "0")]
    pub random_seed: u64,

    /// Optional path for a JSON parameters file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory for report output
    #[arg(short, long, default_value = ".")]
    pub output_dir: PathBuf,

    /// Prefix for report file names
    #[arg(short, long, default_value = "")]
    pub prefix: String,

    /// Overwrite existing report files
    #[arg(short, long)]
    pub force_overwrite: bool,

    /// Enable logging: a level (e.g. `info`) and/or `module=level` pairs, comma separated
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Number of months to run, overriding the parameters file
    #[arg(short, long)]
    pub ticks: Option<u64>,
}

impl Default for BaseArgs {
    fn default() -> Self {
        BaseArgs {
            random_seed: 0,
            config: None,
            output_dir: PathBuf::from("."),
            prefix: String::new(),
            force_overwrite: false,
            log_level: None,
            ticks: None,
        }
    }
}

fn create_cli() -> Command {
    let cli = Command::new("homeshare")
        .about("Simulates a community renting houses whose ownership shares pass to the tenants");
    BaseArgs::augment_args(cli)
}

/// Runs a simulation configured from the command line.
///
/// # Parameters
/// - `setup_fn`: called with the seeded community and the parsed arguments before the first month
///
/// # Errors
/// Returns an error if argument parsing, parameter loading, the setup function or the run fails
pub fn run_with_args<F>(setup_fn: F) -> Result<Community, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Community, &BaseArgs) -> Result<(), SimError>,
{
    let matches = create_cli().get_matches();
    let args = BaseArgs::from_arg_matches(&matches)?;
    run_with_base_args(&args, setup_fn)
}

/// Runs a simulation from already parsed arguments, writing the yearly reports as CSV files.
///
/// # Errors
/// Returns an error if parameter loading, the setup function or the run fails
pub fn run_with_base_args<F>(
    args: &BaseArgs,
    setup_fn: F,
) -> Result<Community, Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Community, &BaseArgs) -> Result<(), SimError>,
{
    if let Some(log_level) = &args.log_level {
        apply_log_level_spec(&log_level.parse::<LogLevelSpec>()?);
    }

    let mut parameters = match &args.config {
        Some(path) => {
            info!("loading parameters from {}", path.display());
            Parameters::from_json_file(path)?
        }
        None => Parameters::default(),
    };
    if let Some(ticks) = args.ticks {
        parameters.number_of_months_to_run = ticks;
    }

    let mut community = Community::from_parameters(parameters, args.random_seed)?;
    setup_fn(&mut community, args)?;

    let mut report_options = ReportOptions::default();
    report_options
        .directory(args.output_dir.clone())
        .file_prefix(args.prefix.clone())
        .overwrite(args.force_overwrite);
    let mut sink = CsvReportSink::new(report_options);

    community.run(&mut sink)?;
    Ok(community)
}
