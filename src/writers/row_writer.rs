use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::{AnalysisError, Result};
use crate::models::Row;

/// Exports query rows. Column order comes from the rows themselves, which
/// carry the per-query stable ordering.
pub struct RowWriter;

impl RowWriter {
    pub fn new() -> Self {
        Self
    }

    pub fn write_csv<W: Write>(&self, rows: &[Row], out: W) -> Result<()> {
        let mut writer = csv::Writer::from_writer(out);
        let Some(first) = rows.first() else {
            return Ok(());
        };

        let header = first.column_names();
        writer.write_record(&header)?;

        for row in rows {
            if row.column_names() != header {
                return Err(AnalysisError::InvalidFormat(
                    "rows have inconsistent columns".to_string(),
                ));
            }
            writer.write_record(row.values().map(|v| v.to_string()))?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn write_csv_file(&self, rows: &[Row], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.write_csv(rows, File::create(path)?)
    }

    pub fn to_json(&self, rows: &[Row]) -> serde_json::Value {
        serde_json::Value::Array(
            rows.iter()
                .map(|row| {
                    let mut object = serde_json::Map::new();
                    for name in row.column_names() {
                        if let Some(value) = row.get(name) {
                            object.insert(name.to_string(), value.to_json());
                        }
                    }
                    serde_json::Value::Object(object)
                })
                .collect(),
        )
    }

    pub fn write_json<W: Write>(&self, rows: &[Row], mut out: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut out, &self.to_json(rows))?;
        writeln!(out)?;
        Ok(())
    }

    pub fn write_json_file(&self, rows: &[Row], path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        self.write_json(rows, File::create(path)?)
    }
}

impl Default for RowWriter {
    fn default() -> Self {
        Self::new()
    }
}
