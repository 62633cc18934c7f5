use anyhow::Result;
use csv::Writer;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;

use crate::domain::record::{FieldValue, Record};
use crate::services::error_handling::{DeskError, ErrorContext};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "CSV",
            ExportFormat::Json => "JSON",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(DeskError::Export {
                format: other.to_string(),
                message: "unsupported format".to_string(),
            }),
        }
    }
}

/// Renders rows of a derived view, one column per field name. The record id
/// always comes first.
pub struct ExportService;

impl ExportService {
    pub fn render<R: Record>(rows: &[Arc<R>], columns: &[&str], format: ExportFormat) -> Result<String, DeskError> {
        match format {
            ExportFormat::Csv => Self::export_to_csv(rows, columns),
            ExportFormat::Json => Self::export_to_json(rows, columns),
        }
    }

    /// Export rows to CSV format
    pub fn export_to_csv<R: Record>(rows: &[Arc<R>], columns: &[&str]) -> Result<String, DeskError> {
        let fail = |message: String| DeskError::Export {
            format: ExportFormat::Csv.to_string(),
            message,
        };

        let mut wtr = Writer::from_writer(vec![]);

        let mut header = vec!["id"];
        header.extend_from_slice(columns);
        wtr.write_record(&header).map_err(|e| fail(e.to_string()))?;

        for record in rows {
            let mut line = vec![record.id().to_string()];
            line.extend(
                columns
                    .iter()
                    .map(|column| record.field(column).map(|v| v.search_text()).unwrap_or_default()),
            );
            wtr.write_record(&line).map_err(|e| fail(e.to_string()))?;
        }

        let data = wtr.into_inner().map_err(|e| fail(e.to_string()))?;
        String::from_utf8(data).map_err(|e| fail(e.to_string()))
    }

    /// Export rows to JSON format
    pub fn export_to_json<R: Record>(rows: &[Arc<R>], columns: &[&str]) -> Result<String, DeskError> {
        let objects: Vec<Value> = rows
            .iter()
            .map(|record| {
                let mut object = Map::new();
                object.insert("id".to_string(), Value::String(record.id().to_string()));
                for column in columns {
                    let value = record.field(column).map(json_value).unwrap_or(Value::Null);
                    object.insert(column.to_string(), value);
                }
                Value::Object(object)
            })
            .collect();

        serde_json::to_string_pretty(&objects).map_err(|e| DeskError::Export {
            format: ExportFormat::Json.to_string(),
            message: e.to_string(),
        })
    }

    pub fn write_to_file<R: Record>(
        rows: &[Arc<R>],
        columns: &[&str],
        format: ExportFormat,
        path: &Path,
    ) -> Result<()> {
        let rendered = Self::render(rows, columns, format)?;
        ErrorContext::new("write_export")
            .with_detail("path", path.display())
            .with_detail("format", format)
            .wrap(std::fs::write(path, rendered).map_err(anyhow::Error::from))?;
        info!(path = %path.display(), rows = rows.len(), format = %format, "Export written");
        Ok(())
    }
}

fn json_value(value: FieldValue) -> Value {
    match value {
        FieldValue::Text(text) | FieldValue::Date(text) => Value::String(text),
        FieldValue::Number(number) => serde_json::Number::from_f64(number.into_inner())
            .map(Value::Number)
            .unwrap_or(Value::Null),
        FieldValue::Flag(flag) => Value::Bool(flag),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::{fields, Category, EntryStatus, LedgerEntry};
    use crate::domain::record::collect;
    use tempfile::TempDir;

    fn rows() -> Vec<Arc<LedgerEntry>> {
        collect(vec![
            LedgerEntry::new("1", "Mensalidade - Ana Silva", 150.0, "15/05/2024", EntryStatus::Paid, Category::Income),
            LedgerEntry::new("3", "Agua Mineral, 20L", 250.5, "10/05/2024", EntryStatus::Paid, Category::Expense),
        ])
    }

    #[test]
    fn test_csv_quotes_and_numbers() {
        let csv = ExportService::export_to_csv(&rows(), &[fields::DESCRIPTION, fields::AMOUNT]).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "id,descricao,valor");
        assert_eq!(lines[1], "1,Mensalidade - Ana Silva,150");
        assert_eq!(lines[2], "3,\"Agua Mineral, 20L\",250.5");
    }

    #[test]
    fn test_json_keeps_types() {
        let json = ExportService::export_to_json(&rows(), &[fields::AMOUNT, "inexistente"]).unwrap();
        let parsed: Value = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed[0]["id"], "1");
        assert_eq!(parsed[0]["valor"], 150.0);
        assert!(parsed[1]["inexistente"].is_null());
    }

    #[test]
    fn test_format_parsing() {
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert!(matches!("pdf".parse::<ExportFormat>(), Err(DeskError::Export { .. })));
    }

    #[test]
    fn test_write_to_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ledger.json");

        ExportService::write_to_file(&rows(), &[fields::STATUS], ExportFormat::Json, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"pago\""));
    }
}
