//! Table export — CSV, JSON and Parquet artifacts.
//!
//! A selector such as `"csv,parquet"` picks the formats; each one is written
//! to `<dir>/<name>_<YYYYMMDD_HHMMSS>.<ext>`. An empty selector writes
//! nothing.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use polars::prelude::*;
use thiserror::Error;

use futureslab_core::{Cell, Table};

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("unknown export format '{0}': expected csv, json or parquet")]
    UnknownFormat(String),

    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet export failed: {0}")]
    Parquet(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
    Parquet,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Parquet => "parquet",
        }
    }

    /// Parse a comma-separated selector. Blank entries are ignored and
    /// repeated formats are written once.
    pub fn parse_selector(selector: &str) -> Result<Vec<Self>, ExportError> {
        let mut formats = Vec::new();
        for part in selector.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let format = part.parse()?;
            if !formats.contains(&format) {
                formats.push(format);
            }
        }
        Ok(formats)
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            "parquet" => Ok(ExportFormat::Parquet),
            _ => Err(ExportError::UnknownFormat(s.to_string())),
        }
    }
}

/// Persists tables on request of the display operations.
pub trait Exporter {
    /// Write `table` in every format named by `selector`, returning the
    /// written paths. An empty selector is a no-op.
    fn export(
        &self,
        selector: &str,
        dir: &Path,
        name: &str,
        table: &Table,
    ) -> Result<Vec<PathBuf>, ExportError>;
}

/// Exporter writing timestamped files to disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct FileExporter;

impl Exporter for FileExporter {
    fn export(
        &self,
        selector: &str,
        dir: &Path,
        name: &str,
        table: &Table,
    ) -> Result<Vec<PathBuf>, ExportError> {
        let formats = ExportFormat::parse_selector(selector)?;
        if formats.is_empty() {
            return Ok(Vec::new());
        }

        fs::create_dir_all(dir).map_err(|source| ExportError::Io {
            path: dir.display().to_string(),
            source,
        })?;

        let stamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let mut written = Vec::with_capacity(formats.len());
        for format in formats {
            let path = dir.join(format!("{name}_{stamp}.{}", format.extension()));
            match format {
                ExportFormat::Csv => write_csv(&path, table)?,
                ExportFormat::Json => write_json(&path, table)?,
                ExportFormat::Parquet => write_parquet(&path, table)?,
            }
            log::info!("exported {name} to {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

/// Cell text for file formats: full precision, unlike the console.
fn export_text(cell: &Cell) -> String {
    match cell {
        Cell::Number(v) => v.to_string(),
        other => other.to_string(),
    }
}

fn write_csv(path: &Path, table: &Table) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(table.column_names())?;
    for row in table.records() {
        wtr.write_record(row.iter().map(export_text))?;
    }
    wtr.flush().map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(())
}

fn write_json(path: &Path, table: &Table) -> Result<(), ExportError> {
    let names = table.column_names();
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = table
        .records()
        .into_iter()
        .map(|row| {
            names
                .iter()
                .cloned()
                .zip(row.iter().map(|cell| serde_json::to_value(cell)))
                .map(|(name, value)| value.map(|v| (name, v)))
                .collect::<Result<serde_json::Map<_, _>, _>>()
        })
        .collect::<Result<_, _>>()?;

    let file = fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

/// Numeric columns become Float64, everything else String.
fn table_to_dataframe(table: &Table) -> Result<DataFrame, ExportError> {
    let names = table.column_names();
    let records = table.records();

    let columns: Vec<Column> = names
        .iter()
        .enumerate()
        .map(|(col, name)| {
            let cells = records.iter().map(|r| &r[col]);
            let numeric = records
                .iter()
                .all(|r| r[col].is_numeric() || r[col].is_empty());
            if numeric && !records.is_empty() {
                let values: Vec<Option<f64>> = cells.map(Cell::as_f64).collect();
                Column::new(name.as_str().into(), values)
            } else {
                let values: Vec<Option<String>> = cells
                    .map(|c| (!c.is_empty()).then(|| export_text(c)))
                    .collect();
                Column::new(name.as_str().into(), values)
            }
        })
        .collect();

    DataFrame::new(columns).map_err(|e| ExportError::Parquet(format!("dataframe creation: {e}")))
}

fn write_parquet(path: &Path, table: &Table) -> Result<(), ExportError> {
    let mut df = table_to_dataframe(table)?;
    let file = fs::File::create(path).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ParquetWriter::new(file)
        .finish(&mut df)
        .map_err(|e| ExportError::Parquet(format!("write parquet: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn curve_table() -> Table {
        let mut table = Table::new(["Futures"]).with_title("Futures curve").with_index("Contract");
        table.push_row(Some(Cell::text("Nov-2024")), vec![Cell::Number(71.125)]);
        table.push_row(Some(Cell::text("Dec-2024")), vec![Cell::Empty]);
        table
    }

    #[test]
    fn selector_parsing() {
        assert_eq!(ExportFormat::parse_selector("").unwrap(), vec![]);
        assert_eq!(
            ExportFormat::parse_selector("CSV, parquet,csv").unwrap(),
            vec![ExportFormat::Csv, ExportFormat::Parquet]
        );
        assert!(matches!(
            ExportFormat::parse_selector("csv,xlsx"),
            Err(ExportError::UnknownFormat(f)) if f == "xlsx"
        ));
    }

    #[test]
    fn empty_selector_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("exports");
        let written = FileExporter.export("", &out, "curve", &curve_table()).unwrap();
        assert!(written.is_empty());
        assert!(!out.exists());
    }

    #[test]
    fn writes_csv_with_index_column() {
        let dir = tempfile::tempdir().unwrap();
        let written = FileExporter
            .export("csv", dir.path(), "curve", &curve_table())
            .unwrap();

        assert_eq!(written.len(), 1);
        let file_name = written[0].file_name().unwrap().to_string_lossy().to_string();
        assert!(file_name.starts_with("curve_"));
        assert!(file_name.ends_with(".csv"));

        let content = fs::read_to_string(&written[0]).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines, vec!["Contract,Futures", "Nov-2024,71.125", "Dec-2024,"]);
    }

    #[test]
    fn writes_json_rows() {
        let dir = tempfile::tempdir().unwrap();
        let written = FileExporter
            .export("json", dir.path(), "curve", &curve_table())
            .unwrap();

        let content = fs::read_to_string(&written[0]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(
            value,
            serde_json::json!([
                {"Contract": "Nov-2024", "Futures": 71.125},
                {"Contract": "Dec-2024", "Futures": null}
            ])
        );
    }

    #[test]
    fn writes_parquet_readable_by_polars() {
        let dir = tempfile::tempdir().unwrap();
        let mut table = Table::new(["Adj Close", "Volume"]).with_index("Date");
        table.push_row(
            Some(Cell::Date(NaiveDate::from_ymd_opt(2022, 1, 3).unwrap())),
            vec![Cell::Number(76.08), Cell::Integer(1200)],
        );

        let written = FileExporter
            .export("parquet", dir.path(), "historical", &table)
            .unwrap();

        let file = fs::File::open(&written[0]).unwrap();
        let df = ParquetReader::new(file).finish().unwrap();
        assert_eq!(df.height(), 1);
        let names: Vec<String> = df.get_column_names().iter().map(|n| n.to_string()).collect();
        assert_eq!(names, ["Date", "Adj Close", "Volume"]);
        assert_eq!(df.column("Date").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("Volume").unwrap().dtype(), &DataType::Float64);
    }
}
