//! Vitrine CLI application entry point
//!
//! Runs listing pages against a JSON collection file from the terminal: the same
//! search, facet, tab, sort and pagination rules a listing page applies.
//!
//! # Usage
//!
//! ```bash
//! # First page of the news listing, newest first
//! vitrine query news.json
//!
//! # Contests closing soon, in the health category, as a list
//! vitrine query contests.json -p contests -t closing-soon -f category=saude --view list
//!
//! # Export the archive, largest documents first
//! vitrine export archive.json -p archive --sort size --format json -o archive.json
//!
//! # Status cards for a contests file, evaluated at a fixed date
//! vitrine status contests.json --now 2024-05-10
//!
//! # Quiet mode (only output results)
//! vitrine -q query news.json -s vacina
//! ```
//!
//! # Configuration
//!
//! Configuration is read from the user's config directory
//! (`~/.config/vitrine/config.toml` on Linux) and `VITRINE_*` environment
//! variables. A missing file means defaults.

use colored::Colorize;
use std::io::{self, Write};
use std::sync::Arc;
use vitrine::{
    VitrineError,
    cli::{Cli, Commands, ConfigCommands, ListingArgs},
    config::VitrineConfig,
    export::ExportFormat,
    logging::init_tracing,
    output,
    profile::PageProfile,
    query::FixedClock,
    session::{LoadState, PageSession},
    source::JsonFileSource,
    view::ViewMode,
};

type Result<T> = std::result::Result<T, VitrineError>;

/// Build and load a session for the listing flags
///
/// # Errors
///
/// Returns `VitrineError` if the page settings are invalid, the collection
/// cannot be loaded, or the criteria or sort key are not offered by the page.
async fn open_session(
    config: &VitrineConfig,
    listing: &ListingArgs,
) -> Result<PageSession<JsonFileSource>> {
    let profile = listing.profile;
    let settings = config.page_settings(profile)?;
    let source = Arc::new(JsonFileSource::new(&listing.file));

    let mut builder = PageSession::builder(source, profile)
        .settings(settings)
        .protocol(config.view_counts.protocol());
    if let Some(now) = listing.now {
        builder = builder.clock(Arc::new(FixedClock(now)));
    }
    let mut session = builder.build();

    if let LoadState::Failed(reason) = session.load().await? {
        return Err(VitrineError::InvalidInput(format!(
            "Could not load '{}': {reason}",
            listing.file.display()
        )));
    }

    session.set_criteria(listing.criteria())?;
    if let Some(sort) = listing.sort {
        session.set_sort_key(sort)?;
    }
    Ok(session)
}

async fn handle_query_command(
    config: &VitrineConfig,
    listing: &ListingArgs,
    page: usize,
    view: ViewMode,
    window: usize,
    quiet: bool,
) -> Result<()> {
    let mut session = open_session(config, listing).await?;
    session.set_view_mode(view);
    session.set_page(page);

    if !quiet {
        println!(
            "{} {} sorted by {}",
            listing.profile.to_string().bold(),
            session.criteria(),
            session.sort_key()
        );
    }

    let now = session.now();
    let items = session.current_page_items();
    if items.is_empty() && !quiet {
        println!("  No results");
    }
    for item in items {
        println!("{}", output::format_item(item, session.view_mode(), now, quiet));
    }

    if !quiet {
        println!(
            "{}",
            output::page_footer(
                session.current_page(),
                session.page_count(),
                &session.page_window(window),
                session.result_count(),
            )
        );
    }
    Ok(())
}

async fn handle_facets_command(
    config: &VitrineConfig,
    listing: &ListingArgs,
    name: &str,
    quiet: bool,
) -> Result<()> {
    let session = open_session(config, listing).await?;
    let values = session.facet_values(name)?;

    if !quiet {
        println!("Values of '{name}' ({}):", values.len());
    }
    for value in &values {
        println!("{}", output::facet_count(value, quiet));
    }
    Ok(())
}

async fn handle_export_command(
    config: &VitrineConfig,
    listing: &ListingArgs,
    format: ExportFormat,
    output_path: Option<&std::path::Path>,
    quiet: bool,
) -> Result<()> {
    let session = open_session(config, listing).await?;
    let exporter = format.exporter();
    let bytes = session.export(exporter.as_ref())?;

    match output_path {
        Some(path) => {
            std::fs::write(path, &bytes)?;
            if !quiet {
                println!(
                    "Exported {} item(s) as {format} to {}",
                    session.result_count(),
                    path.display().to_string().green()
                );
            }
        }
        None => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(&bytes)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

async fn handle_status_command(
    config: &VitrineConfig,
    listing: &ListingArgs,
    quiet: bool,
) -> Result<()> {
    let session = open_session(config, listing).await?;
    if !quiet {
        println!("Status of {} item(s):", session.collection().len());
    }
    for line in output::status_summary(&session.status_counts(), quiet) {
        println!("{line}");
    }
    Ok(())
}

fn handle_config_command(
    config: &VitrineConfig,
    cli: &Cli,
    command: ConfigCommands,
) -> Result<()> {
    match command {
        ConfigCommands::Path => {
            let path = match &cli.config {
                Some(path) => path.clone(),
                None => VitrineConfig::config_path()?,
            };
            println!("{}", path.display());
        }
        ConfigCommands::Show => {
            let rendered = toml::to_string_pretty(config).map_err(|e| {
                ::config::ConfigError::Message(format!("Failed to serialize config: {e}"))
            })?;
            print!("{rendered}");
        }
    }
    Ok(())
}

/// Main entry point for the vitrine application
///
/// # Errors
///
/// Returns `VitrineError` if configuration loading fails or any command
/// handler returns an error.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse_args();

    let config = match &cli.config {
        Some(path) => VitrineConfig::load_from(path, None)?,
        None => VitrineConfig::load()?,
    };

    let mut logging = config.logging.clone();
    logging.json |= cli.log_json;
    if let Err(e) = init_tracing(&logging) {
        eprintln!("Warning: Failed to initialize logging: {e}");
    }

    let quiet = cli.quiet || config.quiet;

    match &cli.command {
        Commands::Query {
            listing,
            page,
            view,
            window,
        } => handle_query_command(&config, listing, *page, *view, *window, quiet).await,
        Commands::Facets { listing, name } => {
            handle_facets_command(&config, listing, name, quiet).await
        }
        Commands::Export {
            listing,
            format,
            output,
        } => handle_export_command(&config, listing, *format, output.as_deref(), quiet).await,
        Commands::Status { file, now } => {
            let listing = ListingArgs {
                file: file.clone(),
                profile: PageProfile::Contests,
                search: None,
                facets: Vec::new(),
                tab: None,
                sort: None,
                now: *now,
            };
            handle_status_command(&config, &listing, quiet).await
        }
        Commands::Config { command } => handle_config_command(&config, &cli, *command),
    }
}
