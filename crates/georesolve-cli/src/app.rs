//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use georesolve_core::catalog::DEFAULT_TOP_N;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "georesolve")]
#[command(
    author,
    version,
    about = "Turn natural language geospatial requests into structured queries"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "cli")]
    pub format: OutputFormat,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "GEORESOLVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve a request into a structured query
    Resolve(ResolveArgs),

    /// Recommend datasets for an analysis
    Recommend(RecommendArgs),

    /// Recommend an analysis workflow
    Workflow(WorkflowArgs),

    /// List or inspect catalog datasets
    Datasets(DatasetsArgs),

    /// List spectral indices or print a QGIS formula
    Indices(IndicesArgs),

    /// Geocode a place name
    Geocode(GeocodeArgs),

    /// Look up the address of a coordinate
    Reverse(ReverseArgs),

    /// Show or initialise the configuration
    Config(ConfigArgs),
}

#[derive(Args)]
pub struct ResolveArgs {
    /// Request text
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Product id, e.g. LANDSAT_C2L2
    #[arg(long)]
    pub product: Option<String>,

    /// Data type (optical, sar, dem, land_cover, climate, population, air_quality)
    #[arg(long)]
    pub data_type: Option<String>,

    /// Data provider
    #[arg(long)]
    pub provider: Option<String>,

    /// Bounding box as min_lon,min_lat,max_lon,max_lat
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub bbox: Option<Vec<f64>>,

    /// GeoJSON geometry
    #[arg(long)]
    pub geometry: Option<String>,

    /// Place name to geocode instead of the one in the text
    #[arg(long)]
    pub location: Option<String>,

    /// Start date (YYYY-MM-DD)
    #[arg(long)]
    pub start: Option<String>,

    /// End date (YYYY-MM-DD)
    #[arg(long)]
    pub end: Option<String>,

    /// Maximum cloud cover percentage
    #[arg(long)]
    pub cloud: Option<f64>,

    /// Maximum number of results
    #[arg(short = 'n', long)]
    pub limit: Option<u32>,

    /// Skip the LLM tier
    #[arg(long)]
    pub no_llm: bool,

    /// Skip geocoding
    #[arg(long)]
    pub no_geocode: bool,
}

impl ResolveArgs {
    pub fn text(&self) -> String {
        self.text.join(" ")
    }
}

#[derive(Args)]
pub struct RecommendArgs {
    /// Analysis description
    #[arg(required = true)]
    pub text: Vec<String>,

    /// Number of datasets
    #[arg(short = 'n', long, default_value_t = DEFAULT_TOP_N)]
    pub top: usize,
}

#[derive(Args)]
pub struct WorkflowArgs {
    /// Analysis description
    #[arg(required = true)]
    pub text: Vec<String>,
}

#[derive(Args)]
pub struct DatasetsArgs {
    /// Show one dataset in full
    pub id: Option<String>,

    /// Only datasets in this category
    #[arg(long, conflicts_with = "id")]
    pub category: Option<String>,

    /// Only datasets mentioning this keyword
    #[arg(long, conflicts_with_all = ["id", "category"])]
    pub keyword: Option<String>,
}

#[derive(Args)]
pub struct IndicesArgs {
    /// Rank indices against an analysis description
    #[arg(long, conflicts_with = "formula")]
    pub search: Option<String>,

    /// Print the QGIS raster calculator formula for this index
    #[arg(long)]
    pub formula: Option<String>,

    /// Sensor for band names (sentinel2, landsat)
    #[arg(long, requires = "formula")]
    pub sensor: Option<String>,
}

#[derive(Args)]
pub struct GeocodeArgs {
    /// Place name
    #[arg(required = true)]
    pub place: Vec<String>,
}

#[derive(Args)]
pub struct ReverseArgs {
    #[arg(allow_hyphen_values = true)]
    pub lat: f64,

    #[arg(allow_hyphen_values = true)]
    pub lon: f64,
}

#[derive(Args)]
pub struct ConfigArgs {
    /// Write the current settings to the config file
    #[arg(long)]
    pub init: bool,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Cli,
    Json,
}
