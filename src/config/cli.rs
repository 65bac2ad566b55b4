use crate::app::export::ExportFormat;
use crate::domain::model::{HeatmapFilters, WineFilters};
use crate::utils::error::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "wine-explorer")]
#[command(about = "Terminal dashboard for the wine review API", version)]
pub struct CliConfig {
    /// Base URL of the wine API
    #[arg(long, env = "WINE_API_URL", global = true)]
    pub api_url: Option<String>,

    /// TOML configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Average rating per country
    Map {
        #[arg(long)]
        min_wines: Option<u32>,
    },

    /// Wines from one country
    Country {
        name: String,
        /// Number of pages to load
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Price vs. rating scatter plot
    Scatter {
        #[arg(long, default_value = "1")]
        pages: u32,
        /// Highest price shown on the x axis
        #[arg(long, default_value = "200")]
        max_price: f64,
    },

    /// Wines in the price/points bucket containing a point
    Bucket {
        price: f64,
        points: f64,
        #[arg(long, default_value = "1")]
        pages: u32,
    },

    /// Pre-binned price vs. rating heatmap
    Heatmap(HeatmapArgs),

    /// Keyword search
    Search(FilterArgs),

    /// Paged wine listing
    List(FilterArgs),

    /// Ask a natural-language question; reads questions from stdin when none is given
    Ask { question: Vec<String> },

    /// Details of a single wine
    Wine { id: i64 },

    /// Countries and varieties available for filtering
    Filters {
        /// Also fetch the full filter options
        #[arg(long)]
        options: bool,
    },

    /// Interactive session reading commands from stdin
    Shell,

    /// Write results to files
    Export {
        #[command(subcommand)]
        target: ExportTarget,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, default_value = "./output")]
        output: String,
    },
}

#[derive(Debug, Clone, Subcommand)]
pub enum ExportTarget {
    Search(FilterArgs),
    Bucket {
        price: f64,
        points: f64,
        #[arg(long, default_value = "1")]
        pages: u32,
    },
    Country {
        name: String,
        #[arg(long, default_value = "1")]
        pages: u32,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct FilterArgs {
    /// Filters as a query string, e.g. "country=Italy&min_points=90"
    #[arg(long)]
    pub query: Option<String>,
    #[arg(long)]
    pub search: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub variety: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub min_points: Option<u32>,
    #[arg(long)]
    pub max_points: Option<u32>,
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub size: Option<u32>,
}

impl FilterArgs {
    /// 先解析 `--query`，再以個別旗標覆蓋
    pub fn to_filters(&self) -> Result<WineFilters> {
        let base = match &self.query {
            Some(query) => WineFilters::from_query_string(query)?,
            None => WineFilters::default(),
        };

        let filters = WineFilters {
            search: self.search.clone().or(base.search),
            country: self.country.clone().or(base.country),
            variety: self.variety.clone().or(base.variety),
            min_price: self.min_price.or(base.min_price),
            max_price: self.max_price.or(base.max_price),
            min_points: self.min_points.or(base.min_points),
            max_points: self.max_points.or(base.max_points),
            page: self.page.or(base.page),
            size: self.size.or(base.size),
        };
        filters.check_prices()?;
        Ok(filters.normalized())
    }
}

#[derive(Debug, Clone, Default, Args)]
pub struct HeatmapArgs {
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub variety: Option<String>,
    #[arg(long)]
    pub min_price: Option<f64>,
    #[arg(long)]
    pub max_price: Option<f64>,
    #[arg(long)]
    pub min_points: Option<u32>,
    #[arg(long)]
    pub max_points: Option<u32>,
    #[arg(long)]
    pub price_bucket_size: Option<f64>,
    #[arg(long)]
    pub points_bucket_size: Option<f64>,
}

impl From<&HeatmapArgs> for HeatmapFilters {
    fn from(args: &HeatmapArgs) -> Self {
        HeatmapFilters {
            country: args.country.clone(),
            variety: args.variety.clone(),
            min_price: args.min_price,
            max_price: args.max_price,
            min_points: args.min_points,
            max_points: args.max_points,
            price_bucket_size: args.price_bucket_size,
            points_bucket_size: args.points_bucket_size,
        }
    }
}
