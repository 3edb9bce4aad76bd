//! Export of a filtered and sorted result list
//!
//! Exporters receive rows already in result order; they never see the raw
//! collection. Each row carries the status derived at export time.

use crate::query::{Status, derive_status};
use crate::model::Record;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unknown export format '{0}' (expected csv or json)")]
    UnknownFormat(String),
}

pub type Result<T> = std::result::Result<T, ExportError>;

/// One exported record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub deadline: Option<DateTime<Utc>>,
    pub status: Status,
    pub view_count: Option<u64>,
    /// `name=id` pairs joined with `;`
    pub facets: String,
}

impl ExportRow {
    #[must_use]
    pub fn from_record<R: Record>(item: &R, now: DateTime<Utc>) -> Self {
        let facets = item
            .facets()
            .into_iter()
            .map(|(name, value)| format!("{name}={}", value.id))
            .collect::<Vec<_>>()
            .join(";");
        Self {
            id: item.id().to_string(),
            title: item.title().to_string(),
            created_at: item.created_at(),
            deadline: item.deadline(),
            status: derive_status(item, now),
            view_count: item.view_count(),
            facets,
        }
    }
}

pub trait Exporter {
    /// Serialize rows, keeping their order
    ///
    /// # Errors
    ///
    /// Returns `ExportError` if serialization fails.
    fn export(&self, rows: &[ExportRow]) -> Result<Vec<u8>>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl Exporter for CsvExporter {
    fn export(&self, rows: &[ExportRow]) -> Result<Vec<u8>> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(["id", "title", "created_at", "deadline", "status", "view_count", "facets"])?;
        for row in rows {
            writer.write_record([
                row.id.clone(),
                row.title.clone(),
                row.created_at.to_rfc3339(),
                row.deadline.map(|d| d.to_rfc3339()).unwrap_or_default(),
                row.status.to_string(),
                row.view_count.map(|c| c.to_string()).unwrap_or_default(),
                row.facets.clone(),
            ])?;
        }
        writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pub pretty: bool,
}

impl Exporter for JsonExporter {
    fn export(&self, rows: &[ExportRow]) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(rows)?
        } else {
            serde_json::to_vec(rows)?
        };
        Ok(bytes)
    }
}

/// Export format selectable from the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Csv,
    Json,
}

impl ExportFormat {
    #[must_use]
    pub fn exporter(self) -> Box<dyn Exporter> {
        match self {
            Self::Csv => Box::new(CsvExporter),
            Self::Json => Box::new(JsonExporter { pretty: true }),
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnknownFormat(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{FacetValue, Item};
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    fn rows() -> Vec<ExportRow> {
        let open = Item::new("c1", "Concurso, técnicos", now() - Duration::days(3))
            .with_deadline(now() + Duration::days(3))
            .with_facet("category", FacetValue::new("rh", "Recursos Humanos"))
            .with_facet("type", FacetValue::new("publico", "Público"))
            .with_view_count(12);
        let closed = Item::new("c2", "Concurso antigo", now() - Duration::days(60))
            .with_deadline(now() - Duration::days(30));
        vec![ExportRow::from_record(&open, now()), ExportRow::from_record(&closed, now())]
    }

    #[test]
    fn test_row_derives_status_and_facets() {
        let rows = rows();
        assert_eq!(rows[0].status, Status::Active);
        assert_eq!(rows[0].facets, "category=rh;type=publico");
        assert_eq!(rows[1].status, Status::Closed);
        assert!(rows[1].facets.is_empty());
    }

    #[test]
    fn test_csv_keeps_order_and_quotes() {
        let bytes = CsvExporter.export(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "id,title,created_at,deadline,status,view_count,facets");
        assert!(lines[1].starts_with("c1,\"Concurso, técnicos\","));
        assert!(lines[1].contains(",active,12,"));
        assert!(lines[2].starts_with("c2,Concurso antigo,"));
        assert!(lines[2].contains(",closed,,"));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_json_export() {
        let bytes = JsonExporter::default().export(&rows()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(value[0]["id"], "c1");
        assert_eq!(value[1]["status"], "closed");
        assert!(value[1]["view_count"].is_null());
    }

    #[test]
    fn test_format_parse() {
        assert_eq!("JSON".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert!(matches!(
            "xml".parse::<ExportFormat>(),
            Err(ExportError::UnknownFormat(_))
        ));
    }
}
