//! Output formatting for CLI display
//!
//! Quiet mode drops decoration and prints one machine-friendly token per line
//! (item ids, facet ids, bare numbers).

use crate::model::Record;
use crate::query::{FacetCount, Status, StatusCounts, UrgencyTier, days_remaining, derive_status, urgency};
use crate::view::ViewMode;
use byte_unit::{Byte, UnitType};
use chrono::{DateTime, Utc};
use colored::Colorize;

/// Human-readable size ("1.5 MiB")
#[must_use]
pub fn format_size(bytes: u64) -> String {
    Byte::from_u64(bytes)
        .get_appropriate_unit(UnitType::Binary)
        .to_string()
}

/// Deadline badge: red when closed or on the last day, yellow when urgent
#[must_use]
pub fn deadline_badge<R: Record>(item: &R, now: DateTime<Utc>) -> Option<String> {
    let tier = urgency(item, now)?;
    let days = days_remaining(item, now).unwrap_or(0);
    let badge = match (derive_status(item, now), tier) {
        (Status::Closed, _) => "closed".red().to_string(),
        (Status::Active, UrgencyTier::LastDay) => "last day".red().bold().to_string(),
        (Status::Active, UrgencyTier::Urgent) => format!("{days} day(s) left").yellow().to_string(),
        (Status::Active, UrgencyTier::Normal) => format!("{days} day(s) left").green().to_string(),
    };
    Some(badge)
}

/// Format one item for display
///
/// List mode prints a single line. Grid mode prints a small card: title, then
/// facet labels, then the detail line.
#[must_use]
pub fn format_item<R: Record>(item: &R, mode: ViewMode, now: DateTime<Utc>, quiet: bool) -> String {
    if quiet {
        return item.id().to_string();
    }

    let mut details = vec![item.created_at().format("%Y-%m-%d").to_string()];
    if let Some(badge) = deadline_badge(item, now) {
        details.push(badge);
    }
    if let Some(views) = item.view_count() {
        details.push(format!("{views} view(s)"));
    }
    if let Some(size) = item.size_bytes() {
        details.push(format_size(size));
    }
    if item.is_featured() {
        details.push("featured".magenta().to_string());
    }

    let labels = item.facet_labels().join(", ");
    let title = item.title().bold();

    match mode {
        ViewMode::List => {
            if labels.is_empty() {
                format!("  {title} ({})", details.join(" | "))
            } else {
                format!("  {title} [{labels}] ({})", details.join(" | "))
            }
        }
        ViewMode::Grid => {
            let mut card = format!("  ┌ {title}\n");
            if !labels.is_empty() {
                card.push_str(&format!("  │ {}\n", labels.dimmed()));
            }
            card.push_str(&format!("  └ {}", details.join(" | ")));
            card
        }
    }
}

/// Pagination footer with the page-button window; the current page is highlighted
#[must_use]
pub fn page_footer(current: usize, page_count: usize, window: &[usize], total: usize) -> String {
    let buttons: Vec<String> = window
        .iter()
        .map(|&page| {
            if page == current {
                format!("[{page}]").bold().to_string()
            } else {
                page.to_string()
            }
        })
        .collect();
    format!(
        "Page {current} of {page_count} ({total} result(s))  {}",
        buttons.join(" ")
    )
}

/// Format a facet value with its item count
#[must_use]
pub fn facet_count(count: &FacetCount, quiet: bool) -> String {
    if quiet {
        count.id.clone()
    } else {
        format!("  {} ({}) - {} item(s)", count.label, count.id.dimmed(), count.count)
    }
}

/// Status summary lines
#[must_use]
pub fn status_summary(counts: &StatusCounts, quiet: bool) -> Vec<String> {
    if quiet {
        return vec![
            counts.open.to_string(),
            counts.closing_soon.to_string(),
            counts.closed.to_string(),
            counts.no_deadline.to_string(),
        ];
    }
    vec![
        format!("  {:<14} {}", "open".green(), counts.open),
        format!("  {:<14} {}", "closing soon".yellow(), counts.closing_soon),
        format!("  {:<14} {}", "closed".red(), counts.closed),
        format!("  {:<14} {}", "no deadline", counts.no_deadline),
        format!("  {:<14} {}", "total".bold(), counts.total()),
    ]
}
