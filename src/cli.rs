//! Command-line interface definitions.
//!
//! This module defines the CLI arguments and options using the `clap` crate.

use clap::Parser;

/// Command-line arguments for the guide harvester.
///
/// # Examples
///
/// ```sh
/// # Harvest one channel around today
/// epg_harvest --channel bvntv
///
/// # Harvest everything for a 3-day window around a fixed date
/// epg_harvest --channel all --start-date 2025-03-15 --days-range 3
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Start date in YYYY-MM-DD format (defaults to today)
    #[arg(short, long)]
    pub start_date: Option<String>,

    /// Number of days before and after the start date to cover
    #[arg(short, long, default_value_t = 15)]
    pub days_range: i64,

    /// Channel to harvest, or "all" for every configured channel
    #[arg(short, long)]
    pub channel: String,

    /// Optional YAML file overriding the built-in channel table
    #[arg(long)]
    pub config: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing() {
        let cli = Cli::parse_from(&[
            "epg_harvest",
            "--channel",
            "bvntv",
            "--start-date",
            "2025-03-15",
            "--days-range",
            "3",
        ]);

        assert_eq!(cli.channel, "bvntv");
        assert_eq!(cli.start_date.as_deref(), Some("2025-03-15"));
        assert_eq!(cli.days_range, 3);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(&["epg_harvest", "-c", "all"]);
        assert_eq!(cli.channel, "all");
        assert!(cli.start_date.is_none());
        assert_eq!(cli.days_range, 15);
    }
}
