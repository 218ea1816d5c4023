//! Purchase record import
//!
//! Maps externally shaped purchase rows (JSON objects or CSV rows with a
//! header) onto [`PurchaseRecord`] through an explicit [`FieldMapping`].

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use serde_json::{Map, Value};

use crate::error::{SpreadError, SpreadResult};
use crate::models::{parse_amount, CoercionMode, PurchaseRecord, Timestamp};

/// Field names to read purchase data from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    /// Name of the category field
    pub category_field: String,
    /// Name of the amount field
    pub amount_field: String,
    /// Name of the timestamp field
    pub date_field: String,
    /// Name of the optional note field
    pub note_field: String,
}

impl Default for FieldMapping {
    fn default() -> Self {
        Self {
            category_field: "category".to_string(),
            amount_field: "amount".to_string(),
            date_field: "occurred_at".to_string(),
            note_field: "note".to_string(),
        }
    }
}

impl FieldMapping {
    /// Create the default mapping (`category`, `amount`, `occurred_at`, `note`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Map one JSON object to a purchase
    ///
    /// Numbers and numeric strings are both accepted for the amount. A
    /// missing or malformed amount is 0.0 in lenient mode and an error in
    /// strict mode.
    pub fn map_json(
        &self,
        row: &Map<String, Value>,
        mode: CoercionMode,
    ) -> SpreadResult<PurchaseRecord> {
        let category = match row.get(&self.category_field) {
            Some(Value::String(s)) => non_blank(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };

        let amount = match row.get(&self.amount_field) {
            Some(Value::Number(n)) => match n.as_f64() {
                Some(v) => v,
                None => missing_amount(&n.to_string(), mode)?,
            },
            Some(Value::String(s)) => parse_amount(s, mode)?,
            Some(Value::Null) | None => missing_amount("", mode)?,
            Some(other) => missing_amount(&other.to_string(), mode)?,
        };

        let occurred_at = match row.get(&self.date_field) {
            Some(Value::String(s)) => non_blank(s).map(Timestamp::Text),
            _ => None,
        };

        let note = match row.get(&self.note_field) {
            Some(Value::String(s)) => non_blank(s),
            _ => None,
        };

        Ok(PurchaseRecord {
            category,
            amount,
            occurred_at,
            note,
        })
    }

    /// Read a JSON array of purchase objects
    pub fn read_json<R: Read>(
        &self,
        reader: R,
        mode: CoercionMode,
    ) -> SpreadResult<Vec<PurchaseRecord>> {
        let value: Value = serde_json::from_reader(reader)?;
        let rows = value.as_array().ok_or_else(|| {
            SpreadError::Validation("Expected a JSON array of purchase objects".into())
        })?;

        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let object = row.as_object().ok_or_else(|| {
                    SpreadError::Validation(format!("Purchase {} is not a JSON object", i + 1))
                })?;
                self.map_json(object, mode)
            })
            .collect()
    }

    /// Read CSV purchases; the first row must name the columns
    pub fn read_csv<R: Read>(
        &self,
        reader: R,
        mode: CoercionMode,
    ) -> SpreadResult<Vec<PurchaseRecord>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));

        let amount_col = column(&self.amount_field).ok_or_else(|| {
            SpreadError::Validation(format!("CSV has no '{}' column", self.amount_field))
        })?;
        let category_col = column(&self.category_field);
        let date_col = column(&self.date_field);
        let note_col = column(&self.note_field);

        let mut purchases = Vec::new();
        for result in reader.records() {
            let record = result?;
            let cell = |col: Option<usize>| col.and_then(|c| record.get(c)).and_then(non_blank);

            let amount = match record.get(amount_col) {
                Some(raw) => parse_amount(raw, mode)?,
                None => missing_amount("", mode)?,
            };

            purchases.push(PurchaseRecord {
                category: cell(category_col),
                amount,
                occurred_at: cell(date_col).map(Timestamp::Text),
                note: cell(note_col),
            });
        }

        tracing::debug!(count = purchases.len(), "read purchases from CSV");
        Ok(purchases)
    }

    /// Read purchases from a file, choosing CSV or JSON by extension
    pub fn read_file(&self, path: &Path, mode: CoercionMode) -> SpreadResult<Vec<PurchaseRecord>> {
        let file = std::fs::File::open(path).map_err(|e| {
            SpreadError::Io(format!("Failed to open {}: {}", path.display(), e))
        })?;

        let is_csv = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.eq_ignore_ascii_case("csv"))
            .unwrap_or(false);

        if is_csv {
            self.read_csv(file, mode)
        } else {
            self.read_json(std::io::BufReader::new(file), mode)
        }
    }
}

fn non_blank(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn missing_amount(raw: &str, mode: CoercionMode) -> SpreadResult<f64> {
    if mode.is_strict() {
        Err(SpreadError::bad_amount(raw))
    } else {
        tracing::warn!(value = raw, "missing or invalid amount coerced to 0.0");
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::TempDir;

    fn object(v: Value) -> Map<String, Value> {
        v.as_object().unwrap().clone()
    }

    #[test]
    fn test_map_json_default_fields() {
        let mapping = FieldMapping::new();
        let row = object(json!({
            "category": "Food",
            "amount": 12.5,
            "occurred_at": "2025-01-02",
            "note": "lunch"
        }));
        let record = mapping.map_json(&row, CoercionMode::Strict).unwrap();
        assert_eq!(record.category.as_deref(), Some("Food"));
        assert_eq!(record.amount, 12.5);
        assert_eq!(record.occurred_at, Some(Timestamp::Text("2025-01-02".into())));
        assert_eq!(record.note.as_deref(), Some("lunch"));
    }

    #[test]
    fn test_map_json_custom_fields() {
        let mapping = FieldMapping {
            category_field: "cat".into(),
            amount_field: "total".into(),
            date_field: "when".into(),
            ..FieldMapping::default()
        };
        let row = object(json!({"cat": "Fun", "total": "$9.99", "when": "2025-02-01"}));
        let record = mapping.map_json(&row, CoercionMode::Lenient).unwrap();
        assert_eq!(record.category_label(), "Fun");
        assert_eq!(record.amount, 9.99);
    }

    #[test]
    fn test_map_json_bad_amount() {
        let mapping = FieldMapping::new();
        let row = object(json!({"category": "Food", "amount": "lots"}));

        let lenient = mapping.map_json(&row, CoercionMode::Lenient).unwrap();
        assert_eq!(lenient.amount, 0.0);

        let err = mapping.map_json(&row, CoercionMode::Strict).unwrap_err();
        assert!(err.is_coercion());

        let missing = object(json!({"category": "Food"}));
        assert_eq!(mapping.map_json(&missing, CoercionMode::Lenient).unwrap().amount, 0.0);
        assert!(mapping.map_json(&missing, CoercionMode::Strict).is_err());
    }

    #[test]
    fn test_read_json_array() {
        let data = r#"[
            {"category": "Food", "amount": 10, "occurred_at": "2025-01-01"},
            {"category": null, "amount": 2.5}
        ]"#;
        let purchases = FieldMapping::new()
            .read_json(data.as_bytes(), CoercionMode::Lenient)
            .unwrap();
        assert_eq!(purchases.len(), 2);
        assert_eq!(purchases[1].category_label(), "Unknown");
        assert!(purchases[1].occurred_at.is_none());
    }

    #[test]
    fn test_read_json_rejects_non_array() {
        let err = FieldMapping::new()
            .read_json(r#"{"amount": 1}"#.as_bytes(), CoercionMode::Lenient)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_read_csv() {
        let data = "Date,Category,Amount,Note\n\
                    2025-01-03,Food,12.50,\n\
                    2025-01-04,,\"1,000.00\",rent\n";
        let mapping = FieldMapping {
            date_field: "date".into(),
            ..FieldMapping::default()
        };
        let purchases = mapping.read_csv(data.as_bytes(), CoercionMode::Strict).unwrap();
        assert_eq!(purchases.len(), 2);
        assert_eq!(purchases[0].category.as_deref(), Some("Food"));
        assert_eq!(purchases[0].note, None);
        assert_eq!(purchases[1].category, None);
        assert_eq!(purchases[1].amount, 1000.0);
        assert_eq!(purchases[1].occurred_at, Some(Timestamp::Text("2025-01-04".into())));
    }

    #[test]
    fn test_read_csv_requires_amount_column() {
        let err = FieldMapping::new()
            .read_csv("category,price\nFood,1\n".as_bytes(), CoercionMode::Lenient)
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_read_file_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        let csv_path = temp_dir.path().join("purchases.csv");
        let mut file = std::fs::File::create(&csv_path).unwrap();
        writeln!(file, "category,amount,occurred_at").unwrap();
        writeln!(file, "Food,3.50,2025-03-01").unwrap();

        let purchases = FieldMapping::new()
            .read_file(&csv_path, CoercionMode::Strict)
            .unwrap();
        assert_eq!(purchases.len(), 1);
        assert_eq!(purchases[0].amount, 3.5);

        let missing = FieldMapping::new()
            .read_file(&temp_dir.path().join("nope.json"), CoercionMode::Lenient);
        assert!(matches!(missing, Err(SpreadError::Io(_))));
    }
}
