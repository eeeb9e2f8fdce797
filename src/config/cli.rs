use crate::config::OutputFormat;
use crate::domain::model::DistanceUnit;
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "birthday-deals")]
#[command(about = "Find stores with birthday deals within a radius of a location")]
pub struct CliConfig {
    /// Address or coordinates to search from (e.g. 'New York, NY' or '40.7128,-74.0060')
    pub location: String,

    /// Search radius (miles unless --unit km)
    pub radius: f64,

    /// Google Maps API key (or set GOOGLE_MAPS_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Maximum number of store searches in flight [default: 10]
    #[arg(long)]
    pub max_workers: Option<usize>,

    /// Search stores one at a time
    #[arg(long, conflicts_with = "concurrent")]
    pub sequential: bool,

    /// Search stores concurrently (default)
    #[arg(long)]
    pub concurrent: bool,

    /// Run sequential and concurrent searches and compare their timings
    #[arg(long, conflicts_with_all = ["sequential", "concurrent"])]
    pub compare: bool,

    /// CSV file with 'store' and 'deal' columns [default: birthday_deals.csv]
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Distance unit for the radius and reported distances [default: miles]
    #[arg(long, value_enum)]
    pub unit: Option<DistanceUnit>,

    /// Pick the closest location per store instead of the first one in range
    #[arg(long)]
    pub nearest: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Optional TOML settings file
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_arguments() {
        let cli = CliConfig::try_parse_from(["birthday-deals", "New York, NY", "5"]).unwrap();
        assert_eq!(cli.location, "New York, NY");
        assert_eq!(cli.radius, 5.0);
        assert!(cli.max_workers.is_none());
        assert!(!cli.sequential);
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_flags() {
        let cli = CliConfig::try_parse_from([
            "birthday-deals",
            "40.7128,-74.0060",
            "8",
            "--api-key",
            "abc",
            "--max-workers",
            "4",
            "--unit",
            "km",
            "--nearest",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.api_key.as_deref(), Some("abc"));
        assert_eq!(cli.max_workers, Some(4));
        assert_eq!(cli.unit, Some(DistanceUnit::Kilometers));
        assert!(cli.nearest);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_mode_flags_conflict() {
        let result = CliConfig::try_parse_from([
            "birthday-deals",
            "Chicago, IL",
            "3",
            "--sequential",
            "--concurrent",
        ]);
        assert!(result.is_err());

        let result =
            CliConfig::try_parse_from(["birthday-deals", "Chicago, IL", "3", "--compare", "--sequential"]);
        assert!(result.is_err());
    }
}
