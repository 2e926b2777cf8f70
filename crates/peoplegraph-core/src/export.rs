//! Export and import format selection plus the flat (non-matrix) renderers.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;
use crate::matrix::render_matrix;
use crate::types::EdgeTriple;

/// Header of the flat CSV edge list.
pub const CSV_HEADER: &str = "source,source_name,type,target,target_name";

/// Formats accepted by the export route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    CsvMatrix,
    Json,
}

impl FromStr for ExportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Self::Csv),
            "csv-matrix" => Ok(Self::CsvMatrix),
            "json" => Ok(Self::Json),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown export format: {other}"
            ))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Csv => write!(f, "csv"),
            Self::CsvMatrix => write!(f, "csv-matrix"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Formats accepted by the import route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    CsvMatrix,
}

impl FromStr for ImportFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv-matrix" => Ok(Self::CsvMatrix),
            other => Err(CoreError::InvalidArgument(format!(
                "unknown import format: {other}"
            ))),
        }
    }
}

/// JSON export body.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct LinkExport {
    pub links: Vec<EdgeTriple>,
}

/// Render edges as a flat CSV list, one edge per line, without quoting.
pub fn render_csv(triples: &[EdgeTriple]) -> String {
    let mut csv = String::from(CSV_HEADER);
    for t in triples {
        csv.push_str(&format!(
            "\n{},{},{},{},{}",
            t.source, t.source_name, t.relationship_type, t.target, t.target_name
        ));
    }
    csv
}

/// A rendered export: either CSV text or a JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Csv(String),
    Json(LinkExport),
}

/// Render edges in the requested format.
pub fn render(format: ExportFormat, triples: Vec<EdgeTriple>) -> Rendered {
    match format {
        ExportFormat::Csv => Rendered::Csv(render_csv(&triples)),
        ExportFormat::CsvMatrix => Rendered::Csv(render_matrix(&triples)),
        ExportFormat::Json => Rendered::Json(LinkExport { links: triples }),
    }
}
