//! In-memory unit tables for efficiency analyses.
//!
//! Purpose
//! -------
//! Provide the rectangular dataset every estimator consumes: a sequence of
//! records, one per operating unit (hospital-year), each mapping a field
//! name to a numeric or textual value. The table is immutable from the
//! estimators' point of view; computed columns are appended by building a
//! new table.
//!
//! Key behaviors
//! -------------
//! - [`UnitTable::from_records`] collects the column order from the first
//!   appearance of each field across records.
//! - [`UnitTable::require_fields`] turns absent declared fields into a
//!   single [`DataError::MissingFields`] naming all of them.
//! - Numeric extraction ([`UnitTable::numeric_column`],
//!   [`UnitTable::numeric_matrix`]) maps missing or textual cells to `NaN`
//!   so that downstream validity checks reject them instead of coercing.
//! - [`UnitTable::with_column`] and [`UnitTable::select_rows`] return new
//!   tables; the receiver is never mutated.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every record in `rows` holds a value for every entry of `columns`
//!   (absent cells are stored as [`Value::Missing`]).
//! - Column names are unique.
//!
//! Conventions
//! -----------
//! - Row indices are 0-based positions in `rows`.
//! - Unit identities are integral numeric cells read via
//!   [`UnitTable::unit_id`].
//!
//! Downstream usage
//! ----------------
//! - Estimators call `require_fields` before anything else, then the
//!   validity filter, then numeric extraction over the valid rows.
//!
//! Testing notes
//! -------------
//! - Unit tests cover column ordering, missing-field reporting, NaN mapping
//!   for non-numeric cells, and non-mutating column appends.
use indexmap::IndexMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::data::errors::{DataError, DataResult};

/// A single cell of a [`UnitTable`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Numeric view of the cell; `None` for text and missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(x) => Some(*x),
            _ => None,
        }
    }

    /// `true` when the cell is a finite number.
    pub fn is_finite_number(&self) -> bool {
        matches!(self, Value::Number(x) if x.is_finite())
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Number(x)
    }
}

impl From<i64> for Value {
    fn from(x: i64) -> Self {
        Value::Number(x as f64)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Missing)
    }
}

/// One unit record: field name → cell, in insertion order.
pub type Record = IndexMap<String, Value>;

/// `UnitTable` — rectangular dataset of unit records.
///
/// Fields
/// ------
/// - `columns`: `Vec<String>`
///   Field names in presentation order.
/// - `rows`: `Vec<Record>`
///   One record per unit; each record carries every column.
///
/// Invariants
/// ----------
/// - `rows[i].len() == columns.len()` and the key order of each record
///   follows `columns`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UnitTable {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl UnitTable {
    /// Build a table from loosely shaped records.
    ///
    /// Columns are collected in order of first appearance; a record lacking
    /// a field gets [`Value::Missing`] in that column.
    pub fn from_records(records: Vec<Record>) -> Self {
        let mut columns: Vec<String> = Vec::new();
        for record in &records {
            for key in record.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
        let rows = records
            .into_iter()
            .map(|mut record| {
                let mut aligned = Record::with_capacity(columns.len());
                for col in &columns {
                    let value = record.shift_remove(col).unwrap_or(Value::Missing);
                    aligned.insert(col.clone(), value);
                }
                aligned
            })
            .collect();
        Self { columns, rows }
    }

    /// Build a table from named numeric columns of equal length.
    ///
    /// Non-finite entries are stored as numbers so that validity checks can
    /// reject them explicitly.
    ///
    /// # Errors
    /// - [`DataError::ColumnLengthMismatch`] when the columns differ in length.
    pub fn from_columns(columns: Vec<(&str, Vec<f64>)>) -> DataResult<Self> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        for (name, values) in &columns {
            if values.len() != n_rows {
                return Err(DataError::ColumnLengthMismatch {
                    column: (*name).to_string(),
                    expected: n_rows,
                    found: values.len(),
                });
            }
        }
        let rows = (0..n_rows)
            .map(|i| {
                columns
                    .iter()
                    .map(|(name, values)| ((*name).to_string(), Value::Number(values[i])))
                    .collect::<Record>()
            })
            .collect();
        let columns = columns.iter().map(|(name, _)| (*name).to_string()).collect();
        Ok(Self { columns, rows })
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Check that every declared field exists.
    ///
    /// # Errors
    /// - [`DataError::MissingFields`] listing every absent name, in the order
    ///   they were declared, without duplicates.
    pub fn require_fields<S: AsRef<str>>(&self, fields: &[S]) -> DataResult<()> {
        let mut missing: Vec<String> = Vec::new();
        for field in fields {
            let field = field.as_ref();
            if !self.has_column(field) && !missing.iter().any(|m| m == field) {
                missing.push(field.to_string());
            }
        }
        if missing.is_empty() { Ok(()) } else { Err(DataError::MissingFields { fields: missing }) }
    }

    /// Cell at `(row, column)`; `None` when either is absent.
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Numeric values of a column, with non-numeric and missing cells as `NaN`.
    ///
    /// # Errors
    /// - [`DataError::MissingFields`] if the column is absent.
    pub fn numeric_column(&self, column: &str) -> DataResult<Vec<f64>> {
        self.require_fields(&[column])?;
        Ok(self
            .rows
            .iter()
            .map(|r| r.get(column).and_then(Value::as_f64).unwrap_or(f64::NAN))
            .collect())
    }

    /// Dense `rows.len() × fields.len()` matrix over the selected rows.
    ///
    /// # Errors
    /// - [`DataError::MissingFields`] if any field is absent.
    /// - [`DataError::RowOutOfBounds`] if a row index is outside the table.
    pub fn numeric_matrix<S: AsRef<str>>(
        &self, fields: &[S], rows: &[usize],
    ) -> DataResult<Array2<f64>> {
        self.require_fields(fields)?;
        let mut out = Array2::<f64>::zeros((rows.len(), fields.len()));
        for (i, &row) in rows.iter().enumerate() {
            let record = self
                .rows
                .get(row)
                .ok_or(DataError::RowOutOfBounds { index: row, len: self.rows.len() })?;
            for (j, field) in fields.iter().enumerate() {
                out[[i, j]] =
                    record.get(field.as_ref()).and_then(Value::as_f64).unwrap_or(f64::NAN);
            }
        }
        Ok(out)
    }

    /// Integral unit id stored in `id_field` at `row`.
    ///
    /// Returns `None` for missing, textual, or non-integral cells.
    pub fn unit_id(&self, row: usize, id_field: &str) -> Option<i64> {
        let x = self.get(row, id_field)?.as_f64()?;
        if x.is_finite() && x.fract() == 0.0 { Some(x as i64) } else { None }
    }

    /// New table with `name` appended (or replaced) using one value per row.
    ///
    /// # Errors
    /// - [`DataError::ColumnLengthMismatch`] if `values.len() != n_rows()`.
    pub fn with_column<V: Into<Value>>(&self, name: &str, values: Vec<V>) -> DataResult<Self> {
        if values.len() != self.rows.len() {
            return Err(DataError::ColumnLengthMismatch {
                column: name.to_string(),
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        let mut columns = self.columns.clone();
        if !columns.iter().any(|c| c == name) {
            columns.push(name.to_string());
        }
        let rows = self
            .rows
            .iter()
            .zip(values)
            .map(|(record, value)| {
                let mut record = record.clone();
                record.insert(name.to_string(), value.into());
                record
            })
            .collect();
        Ok(Self { columns, rows })
    }

    /// New table holding only `indices`, in the given order.
    ///
    /// # Errors
    /// - [`DataError::RowOutOfBounds`] if an index is outside the table.
    pub fn select_rows(&self, indices: &[usize]) -> DataResult<Self> {
        let rows = indices
            .iter()
            .map(|&i| {
                self.rows
                    .get(i)
                    .cloned()
                    .ok_or(DataError::RowOutOfBounds { index: i, len: self.rows.len() })
            })
            .collect::<DataResult<Vec<_>>>()?;
        Ok(Self { columns: self.columns.clone(), rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Column collection and alignment in `from_records`.
    // - Missing-field reporting and NaN mapping of non-numeric cells.
    // - Non-mutating `with_column` / `select_rows`.
    //
    // They intentionally DO NOT cover:
    // - Validity partitioning (see `validity`).
    // -------------------------------------------------------------------------

    fn record(pairs: &[(&str, Value)]) -> Record {
        pairs.iter().map(|(k, v)| ((*k).to_string(), v.clone())).collect()
    }

    #[test]
    // Purpose
    // -------
    // Records with different field sets are aligned onto a common column list.
    //
    // Given
    // -----
    // - Two records, the second with an extra field and missing the first's.
    //
    // Expect
    // ------
    // - Columns follow first appearance; absent cells become `Missing`.
    fn from_records_aligns_columns_in_first_appearance_order() {
        // Arrange
        let records = vec![
            record(&[("id", 1.0.into()), ("camas", 10.0.into())]),
            record(&[("id", 2.0.into()), ("egresos", 5.0.into())]),
        ];

        // Act
        let table = UnitTable::from_records(records);

        // Assert
        assert_eq!(table.columns, vec!["id", "camas", "egresos"]);
        assert_eq!(table.get(0, "egresos"), Some(&Value::Missing));
        assert_eq!(table.get(1, "camas"), Some(&Value::Missing));
    }

    #[test]
    // Purpose
    // -------
    // `require_fields` names every absent field exactly once.
    //
    // Given
    // -----
    // - A table with `camas` only and a request for `camas`, `x`, `y`, `x`.
    //
    // Expect
    // ------
    // - `MissingFields { fields: ["x", "y"] }`.
    fn require_fields_reports_all_missing_names_once() {
        // Arrange
        let table = UnitTable::from_columns(vec![("camas", vec![1.0, 2.0])])
            .expect("columns have equal length");

        // Act
        let err = table.require_fields(&["camas", "x", "y", "x"]).expect_err("x and y are absent");

        // Assert
        assert_eq!(err, DataError::MissingFields { fields: vec!["x".into(), "y".into()] });
    }

    #[test]
    // Purpose
    // -------
    // Textual and missing cells must surface as NaN, never as a coerced number.
    //
    // Given
    // -----
    // - A column holding a number, a text cell, and a missing cell.
    //
    // Expect
    // ------
    // - `numeric_column` yields `[3.0, NaN, NaN]`.
    fn numeric_column_maps_non_numeric_cells_to_nan() {
        // Arrange
        let table = UnitTable::from_records(vec![
            record(&[("v", 3.0.into())]),
            record(&[("v", "n/a".into())]),
            record(&[("v", Value::Missing)]),
        ]);

        // Act
        let col = table.numeric_column("v").expect("column exists");

        // Assert
        assert_eq!(col[0], 3.0);
        assert!(col[1].is_nan());
        assert!(col[2].is_nan());
    }

    #[test]
    // Purpose
    // -------
    // Appending a column returns a new table and leaves the original intact.
    //
    // Given
    // -----
    // - A two-row table.
    //
    // Expect
    // ------
    // - The new table has the extra column; the original does not.
    // - A wrong-length column is rejected.
    fn with_column_is_non_mutating_and_length_checked() {
        // Arrange
        let table = UnitTable::from_columns(vec![("a", vec![1.0, 2.0])]).expect("valid columns");

        // Act
        let annotated = table.with_column("score", vec![0.5, 1.0]).expect("lengths match");
        let bad = table.with_column("score", vec![0.5]);

        // Assert
        assert!(annotated.has_column("score"));
        assert!(!table.has_column("score"));
        assert_eq!(annotated.get(1, "score"), Some(&Value::Number(1.0)));
        assert!(matches!(bad, Err(DataError::ColumnLengthMismatch { .. })));
    }

    #[test]
    // Purpose
    // -------
    // Unit ids are read only from integral numeric cells.
    //
    // Given
    // -----
    // - Ids 7.0, 7.5, and a text cell.
    //
    // Expect
    // ------
    // - `Some(7)`, `None`, `None`.
    fn unit_id_requires_integral_numbers() {
        // Arrange
        let table = UnitTable::from_records(vec![
            record(&[("id", 7.0.into())]),
            record(&[("id", 7.5.into())]),
            record(&[("id", "h7".into())]),
        ]);

        // Act / Assert
        assert_eq!(table.unit_id(0, "id"), Some(7));
        assert_eq!(table.unit_id(1, "id"), None);
        assert_eq!(table.unit_id(2, "id"), None);
    }
}
