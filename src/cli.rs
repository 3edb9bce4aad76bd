//! Command-line interface definitions and parsing
//!
//! # Commands
//!
//! - **query**: Filter, sort and paginate a collection file, print one page
//! - **facets**: List the values of one facet with item counts
//! - **export**: Write the filtered and sorted list as CSV or JSON
//! - **status**: Per-status counts for deadline-bearing collections
//! - **config**: Show the config path or the effective configuration
//!
//! Listing commands share the same criteria flags, so
//! `vitrine query items.json -p contests -t closing-soon` and
//! `vitrine export items.json -p contests -t closing-soon` see the same list.

use crate::export::ExportFormat;
use crate::profile::PageProfile;
use crate::query::{FacetSelection, FilterCriteria, SortKey, StatusTab};
use crate::view::ViewMode;
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Faceted browsing over content listings", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long = "config", value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Emit logs as JSON lines (overrides config)
    #[arg(long = "log-json", global = true)]
    pub log_json: bool,
}

/// Criteria shared by every listing command
#[derive(Args, Debug, Clone)]
pub struct ListingArgs {
    /// JSON collection file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Page profile (news, contests, services, archive)
    #[arg(short = 'p', long = "page", value_name = "PAGE", default_value = "news")]
    pub profile: PageProfile,

    /// Free-text search over title, description, facet labels and tags
    #[arg(short = 's', long = "search", value_name = "TEXT")]
    pub search: Option<String>,

    /// Facet constraint (e.g., category=saude); "all" clears it
    #[arg(short = 'f', long = "facet", value_name = "NAME=VALUE", value_parser = parse_facet)]
    pub facets: Vec<(String, String)>,

    /// Status tab (active, closed, closing-soon, featured, regular)
    #[arg(short = 't', long = "tab", value_name = "TAB")]
    pub tab: Option<StatusTab>,

    /// Sort key (defaults to the page's default)
    #[arg(short = 'S', long = "sort", value_name = "KEY")]
    pub sort: Option<SortKey>,

    /// Evaluate deadlines at this instant (RFC 3339 or YYYY-MM-DD)
    #[arg(long = "now", value_name = "WHEN", value_parser = parse_instant)]
    pub now: Option<DateTime<Utc>>,
}

impl ListingArgs {
    /// Filter criteria described by the flags
    #[must_use]
    pub fn criteria(&self) -> FilterCriteria {
        let mut builder = FilterCriteria::builder();
        if let Some(search) = &self.search {
            builder = builder.search(search.clone());
        }
        for (name, value) in &self.facets {
            builder = builder.facet(name.clone(), FacetSelection::parse(value));
        }
        if let Some(tab) = self.tab {
            builder = builder.tab(tab);
        }
        builder.build()
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Print one page of the filtered and sorted list
    #[command(visible_alias = "q")]
    Query {
        #[command(flatten)]
        listing: ListingArgs,

        /// Page number (clamped to the available pages)
        #[arg(short = 'n', long = "page-number", value_name = "N", default_value_t = 1)]
        page: usize,

        /// Grid or list layout
        #[arg(long = "view", value_name = "MODE", default_value = "grid")]
        view: ViewMode,

        /// Number of page buttons shown around the current page
        #[arg(long = "window", value_name = "WIDTH", default_value_t = 5)]
        window: usize,
    },

    /// List the values of a facet with item counts
    Facets {
        #[command(flatten)]
        listing: ListingArgs,

        /// Facet name (e.g., category, direction, type)
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Export the filtered and sorted list
    #[command(visible_alias = "e")]
    Export {
        #[command(flatten)]
        listing: ListingArgs,

        /// Output format
        #[arg(long = "format", value_name = "FORMAT", default_value = "csv")]
        format: ExportFormat,

        /// Output file (stdout when omitted)
        #[arg(short = 'o', long = "output", value_name = "PATH")]
        output: Option<PathBuf>,
    },

    /// Show how many items are open, closing soon, closed or without deadline
    #[command(visible_alias = "s")]
    Status {
        /// JSON collection file
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Evaluate deadlines at this instant (RFC 3339 or YYYY-MM-DD)
        #[arg(long = "now", value_name = "WHEN", value_parser = parse_instant)]
        now: Option<DateTime<Utc>>,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the config file location
    Path,
    /// Print the effective configuration as TOML
    Show,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Parse a `name=value` facet constraint
///
/// # Errors
///
/// Returns a message if there is no `=` or the name is empty.
pub fn parse_facet(raw: &str) -> Result<(String, String), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing facet name in '{raw}'"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Parse an RFC 3339 timestamp or a bare date (midnight UTC)
///
/// # Errors
///
/// Returns a message if neither form parses.
pub fn parse_instant(raw: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("invalid instant '{raw}' (use RFC 3339 or YYYY-MM-DD)"))
}
