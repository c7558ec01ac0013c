use clap::{Parser, Subcommand};
use lxepet::pipeline::{CoincidenceSorter, ListModeConverter};
use lxepet::types::{CoincidenceConfig, ConfigOption};
use lxepet::utils::{coincidence_table_name, resolve_run_metadata, resolve_single_input};
use lxepet::ListModeFile;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line interface for `lxepet`
#[derive(Parser, Debug, Clone)]
#[command(name = "lxepet", about = "Sort simulated PET singles and export CASToR list-mode data")]
struct Cli {
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Pair singles into coincidences and write the coincidence table
    Sort {
        /// CSV or Parquet singles table
        input: PathBuf,

        /// Directory for `coincidence_<material>_src<dist>cm.csv`
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Detector material, used in the output name
        #[arg(short, long, default_value = "LXe")]
        material: String,

        /// Source distance in cm, used in the output name
        #[arg(short = 'd', long = "source-dist", default_value = "0.0")]
        source_distance_cm: f64,

        /// JSON run configuration; explicit flags take precedence
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Coincidence window in ns
        #[arg(long)]
        window_ns: Option<f64>,

        /// Minimum separation of the two hits in mm
        #[arg(long)]
        min_separation_mm: Option<f64>,
    },

    /// Convert the coincidence table in a directory to `.cdf`/`.cdh`
    Convert {
        /// One of original, fine, super_fine
        #[arg(short = 'o', long, default_value = "original")]
        config_option: ConfigOption,

        /// Restrict the input to this material (needs --source-dist)
        #[arg(short, long)]
        material: Option<String>,

        /// Restrict the input to this source distance in cm (needs --material)
        #[arg(short = 'd', long = "source-dist")]
        source_distance_cm: Option<f64>,

        #[arg(long, default_value = ".")]
        input_dir: PathBuf,

        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Directory holding `<config name>_binary.lut`
        #[arg(long, default_value = ".")]
        config_path: PathBuf,

        /// Number of rayon threads for the quantizer
        #[arg(short = 'j', long)]
        threads: Option<usize>,
    },

    /// Print a summary of a `.cdf` file and its header
    Inspect {
        data: PathBuf,

        /// Header file, defaults to the data path with a `.cdh` extension
        #[arg(long)]
        header: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    match cli.command {
        Command::Sort {
            input,
            output_dir,
            material,
            source_distance_cm,
            config,
            window_ns,
            min_separation_mm,
        } => {
            let mut run_config = match config {
                Some(path) => CoincidenceConfig::from_json_file(path)?,
                None => CoincidenceConfig::default(),
            };
            if let Some(window) = window_ns {
                run_config.time_window_ns = window;
            }
            if let Some(separation) = min_separation_mm {
                run_config.min_separation_mm = separation;
            }

            std::fs::create_dir_all(&output_dir)?;
            let output = output_dir.join(coincidence_table_name(&material, source_distance_cm));
            let stats = CoincidenceSorter::new(run_config)?.sort_file(&input, &output)?;
            println!(
                "Found {} coincidences from {} singles, saved to {}",
                stats.coincidences,
                stats.singles,
                output.display()
            );
        }
        Command::Convert {
            config_option,
            material,
            source_distance_cm,
            input_dir,
            output_dir,
            config_path,
            threads,
        } => {
            let input = resolve_single_input(&input_dir, material.as_deref(), source_distance_cm)?;
            let (material, distance) =
                resolve_run_metadata(&input, material.as_deref(), source_distance_cm)?;
            info!(%material, distance_cm = distance, option = %config_option, "converting");

            let converter = ListModeConverter::for_option(&config_path, config_option, threads)?;
            let output =
                converter.convert_file(&input, &output_dir, &material, distance, config_option)?;
            println!(
                "Wrote {} events to {} and {}",
                output.num_events,
                output.data_path.display(),
                output.header_path.display()
            );
        }
        Command::Inspect { data, header } => {
            let header = header.unwrap_or_else(|| data.with_extension("cdh"));
            let header = header.exists().then_some(header);
            let file = ListModeFile::open(&data, header.as_deref())?;
            print!("{}", file.get_summary());
            if !file.is_consistent() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
