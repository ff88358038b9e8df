use chrono::NaiveDate;
use serde::Serialize;
use std::fmt;

/// A single output cell. Floats are formatted as written; rounding has
/// already happened upstream, exactly once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Int(i64),
    Float(f64),
    Date(NaiveDate),
}

impl CellValue {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            CellValue::Text(s) => serde_json::Value::String(s.clone()),
            CellValue::Int(i) => serde_json::Value::from(*i),
            CellValue::Float(f) => serde_json::Value::from(*f),
            CellValue::Date(d) => serde_json::Value::String(d.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Int(i) => write!(f, "{}", i),
            CellValue::Float(v) => write!(f, "{}", v),
            CellValue::Date(d) => write!(f, "{}", d),
        }
    }
}

/// A flat output row: ordered (column, value) pairs. Column order is fixed
/// per query type so exports are reproducible.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Row {
    columns: Vec<(String, CellValue)>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: CellValue) -> Self {
        self.columns.push((name.into(), value));
        self
    }

    pub fn push(&mut self, name: impl Into<String>, value: CellValue) {
        self.columns.push((name.into(), value));
    }

    pub fn get(&self, name: &str) -> Option<&CellValue> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|(n, _)| n.as_str()).collect()
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.columns.iter().map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_order_is_stable() {
        let row = Row::new()
            .with("city", CellValue::Text("Berlin".to_string()))
            .with("month", CellValue::Int(1))
            .with("avg_temp_c", CellValue::Float(4.4));

        assert_eq!(row.column_names(), vec!["city", "month", "avg_temp_c"]);
        assert_eq!(row.get("month"), Some(&CellValue::Int(1)));
        assert_eq!(row.get("missing"), None);
    }
}
