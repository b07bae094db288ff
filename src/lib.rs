//! rs2coco: remote-sensing detection datasets to COCO JSON.
//!
//! Converts DIOR, DOTA v2, FAIR1M, VEDAI and xView annotations into COCO
//! detection files under one of three label spaces (`original`,
//! `car_other`, `car`), and post-filters existing COCO files by category
//! and box area.
//!
//! # Modules
//!
//! - [`source`]: Per-dataset readers behind the [`source::AnnotationSource`] trait
//! - [`policy`]: Conversion modes, category remapping and area filters
//! - [`conversion`]: The dataset-agnostic pipeline and its report
//! - [`filter`]: Post-hoc filters over COCO files
//! - [`ir`]: Dataset model and COCO JSON reader/writer
//! - [`error`]: Error types for rs2coco operations

pub mod conversion;
pub mod error;
pub mod filter;
pub mod ir;
pub mod policy;
pub mod source;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;

use conversion::{convert_split, ConvertOptions};
use policy::{IdRemapping, Mode};
use source::{AnnotationSource, DiorSource, Dota2Source, Fair1mSource, VedaiSource, XviewSource};

pub use error::Rs2CocoError;

/// The rs2coco CLI application.
#[derive(Parser)]
#[command(name = "rs2coco")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert a DIOR split to COCO.
    Dior(DatasetArgs),
    /// Convert a DOTA v2 split to COCO.
    Dota2(DatasetArgs),
    /// Convert a FAIR1M split to COCO.
    Fair1m(DatasetArgs),
    /// Convert a VEDAI split to COCO.
    Vedai(DatasetArgs),
    /// Convert an xView split to COCO.
    Xview(XviewArgs),
    /// Keep one category within an area range.
    FilterCategory(FilterCategoryArgs),
    /// Re-label a COCO file into car-only or car/other classes.
    FilterCar(FilterCarArgs),
}

/// Output format for reports.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ReportFormat {
    Text,
    Json,
}

/// Options shared by every dataset conversion.
#[derive(clap::Args)]
struct ConvertFlags {
    /// JSON object mapping native labels to output category ids.
    #[arg(long, value_name = "FILE")]
    category_remap: Option<PathBuf>,

    /// Do not draw a progress bar.
    #[arg(long)]
    no_progress: bool,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the directory-based datasets.
#[derive(clap::Args)]
struct DatasetArgs {
    /// Dataset root directory.
    data_dir: PathBuf,

    /// Split file listing `<dir>/<image>` per line.
    split: PathBuf,

    /// Directory receiving `<split stem>.json`.
    output_dir: PathBuf,

    /// Output label space.
    #[arg(value_enum)]
    mode: Mode,

    #[command(flatten)]
    flags: ConvertFlags,
}

/// Arguments for the xview subcommand.
#[derive(clap::Args)]
struct XviewArgs {
    /// Directory holding the xView images.
    images_dir: PathBuf,

    /// Split file listing `<dir>/<image>` per line.
    split: PathBuf,

    /// xView GeoJSON label file.
    geojson: PathBuf,

    /// Directory receiving `<split stem>.json`.
    output_dir: PathBuf,

    /// Output label space.
    #[arg(value_enum)]
    mode: Mode,

    /// `type_id:name` class label file.
    #[arg(
        long,
        value_name = "FILE",
        env = "RS2COCO_XVIEW_CLASS_LABELS",
        default_value = source::xview::DEFAULT_CLASS_LABELS
    )]
    class_labels: PathBuf,

    /// Default `type_id` to output id mapping.
    #[arg(
        long,
        value_name = "FILE",
        env = "RS2COCO_XVIEW_CATEGORY_MAPPING",
        default_value = source::xview::DEFAULT_CATEGORY_MAPPING
    )]
    category_mapping: PathBuf,

    #[command(flatten)]
    flags: ConvertFlags,
}

/// Arguments for the filter-category subcommand.
#[derive(clap::Args)]
struct FilterCategoryArgs {
    /// Input COCO JSON file.
    #[arg(short = 'i', long = "input-file")]
    input: PathBuf,

    /// Output path; the category and range are appended to its stem.
    #[arg(short = 'o', long = "out-file")]
    output: PathBuf,

    /// Minimum area (inclusive).
    #[arg(short = 'm', long)]
    min: f64,

    /// Maximum area (exclusive).
    #[arg(short = 'x', long)]
    max: f64,

    /// Category name to keep.
    #[arg(short = 'c', long = "cat")]
    category: String,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Arguments for the filter-car subcommand.
#[derive(clap::Args)]
struct FilterCarArgs {
    /// Input COCO JSON file.
    #[arg(short = 'f', long = "input-file")]
    input: PathBuf,

    /// Output COCO JSON file.
    #[arg(short = 'o', long = "out-file")]
    output: PathBuf,

    /// Maximum area (exclusive).
    #[arg(short = 'x', long)]
    max: f64,

    /// Keep only cars, as category 0.
    #[arg(long)]
    car_only: bool,

    /// Category id of cars in the input file.
    #[arg(long, default_value_t = filter::DEFAULT_CAR_CATEGORY_ID)]
    car_category_id: u64,

    /// Report format.
    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    report: ReportFormat,
}

/// Run the rs2coco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), Rs2CocoError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Dior(args)) => {
            let source = DiorSource::open(&args.data_dir)?;
            run_dataset(&source, &args.split, &args.output_dir, args.mode, &args.flags)
        }
        Some(Commands::Dota2(args)) => {
            let source = Dota2Source::open(&args.data_dir)?;
            run_dataset(&source, &args.split, &args.output_dir, args.mode, &args.flags)
        }
        Some(Commands::Fair1m(args)) => {
            let source = Fair1mSource::open(&args.data_dir)?;
            run_dataset(&source, &args.split, &args.output_dir, args.mode, &args.flags)
        }
        Some(Commands::Vedai(args)) => {
            let source = VedaiSource::open(&args.data_dir)?;
            run_dataset(&source, &args.split, &args.output_dir, args.mode, &args.flags)
        }
        Some(Commands::Xview(args)) => {
            let source = XviewSource::open(
                &args.images_dir,
                &args.geojson,
                &args.class_labels,
                &args.category_mapping,
            )?;
            run_dataset(&source, &args.split, &args.output_dir, args.mode, &args.flags)
        }
        Some(Commands::FilterCategory(args)) => {
            let report = filter::run_category_filter(
                &args.input,
                &args.output,
                &args.category,
                args.min,
                args.max,
            )?;
            print_report(&report, args.report)
        }
        Some(Commands::FilterCar(args)) => {
            let options = filter::CarRefilter {
                max_area: args.max,
                car_only: args.car_only,
                car_category_id: args.car_category_id,
            };
            let report = filter::run_car_refilter(&args.input, &args.output, options)?;
            print_report(&report, args.report)
        }
        None => {
            println!("rs2coco {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Remote-sensing detection datasets to COCO JSON.");
            println!();
            println!("Run 'rs2coco --help' for usage information.");
            Ok(())
        }
    }
}

fn run_dataset(
    source: &dyn AnnotationSource,
    split: &Path,
    output_dir: &Path,
    mode: Mode,
    flags: &ConvertFlags,
) -> Result<(), Rs2CocoError> {
    let category_remap = flags
        .category_remap
        .as_deref()
        .map(IdRemapping::load)
        .transpose()?;

    let options = ConvertOptions {
        mode,
        category_remap,
        show_progress: !flags.no_progress,
    };

    let outcome = convert_split(source, split, output_dir, &options)?;
    print_report(&outcome.report, flags.report)?;
    if flags.report == ReportFormat::Text {
        println!("Output: {}", outcome.output_path.display());
    }
    Ok(())
}

fn print_report<R>(report: &R, format: ReportFormat) -> Result<(), Rs2CocoError>
where
    R: Serialize + std::fmt::Display,
{
    match format {
        ReportFormat::Json => {
            let json =
                serde_json::to_string_pretty(report).map_err(Rs2CocoError::ReportSerialize)?;
            println!("{json}");
        }
        ReportFormat::Text => print!("{report}"),
    }
    Ok(())
}
