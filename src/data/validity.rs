//! Validity filter shared by every efficiency estimator.
//!
//! A row is *usable* when every declared input and output field holds a
//! finite number strictly greater than zero. Missing cells, text, `NaN`,
//! zeros and negatives all fail the check; nothing is coerced. Declared
//! fields that are absent from the table are a configuration error, not a
//! filtering outcome.
//!
//! DEA, SFA and Malmquist build on [`ValidityPartition`] so that invalid
//! rows receive identical zero-fill semantics everywhere.
use crate::data::{
    errors::{DataError, DataResult},
    table::{UnitTable, Value},
};

/// Partition of a table's rows into usable and invalid sets.
///
/// - `mask[i]` is `true` iff row `i` is usable.
/// - `valid` and `invalid` hold row indices in ascending order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityPartition {
    pub mask: Vec<bool>,
    pub valid: Vec<usize>,
    pub invalid: Vec<usize>,
}

impl ValidityPartition {
    /// Partition `table` on the strictly-positive rule over `inputs ∪ outputs`.
    ///
    /// # Errors
    /// - [`DataError::EmptyFieldList`] if `inputs` or `outputs` is empty.
    /// - [`DataError::MissingFields`] naming every declared field the table
    ///   lacks.
    pub fn split<S: AsRef<str>>(
        table: &UnitTable, inputs: &[S], outputs: &[S],
    ) -> DataResult<Self> {
        if inputs.is_empty() {
            return Err(DataError::EmptyFieldList { role: "input" });
        }
        if outputs.is_empty() {
            return Err(DataError::EmptyFieldList { role: "output" });
        }
        let fields: Vec<&str> =
            inputs.iter().chain(outputs.iter()).map(|s| s.as_ref()).collect();
        table.require_fields(&fields)?;
        Ok(Self::from_fields(table, &fields))
    }

    /// Partition on an arbitrary field list whose presence was already checked.
    pub(crate) fn from_fields(table: &UnitTable, fields: &[&str]) -> Self {
        let mask: Vec<bool> = table
            .rows
            .iter()
            .map(|record| {
                fields.iter().all(|f| {
                    matches!(record.get(*f), Some(Value::Number(x)) if x.is_finite() && *x > 0.0)
                })
            })
            .collect();
        let mut valid = Vec::new();
        let mut invalid = Vec::new();
        for (i, &ok) in mask.iter().enumerate() {
            if ok { valid.push(i) } else { invalid.push(i) }
        }
        Self { mask, valid, invalid }
    }

    pub fn n_valid(&self) -> usize {
        self.valid.len()
    }

    pub fn n_rows(&self) -> usize {
        self.mask.len()
    }

    /// Scatter per-valid-row values back onto all rows, zero-filling invalid ones.
    ///
    /// `values[k]` belongs to row `self.valid[k]`.
    pub fn scatter(&self, values: &[f64]) -> Vec<f64> {
        let mut out = vec![0.0; self.mask.len()];
        for (&row, &v) in self.valid.iter().zip(values) {
            out[row] = v;
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::table::Record;
    use proptest::prelude::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - The strictly-positive rule over inputs ∪ outputs.
    // - Rejection of missing/text/NaN cells without coercion.
    // - Configuration errors for empty role lists and absent fields.
    // - Zero-fill scattering.
    //
    // They intentionally DO NOT cover:
    // - Estimator behavior on the resulting partitions.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Rows with any non-positive or non-numeric declared field are invalid.
    //
    // Given
    // -----
    // - Four rows: clean, zero input, negative output, text input.
    //
    // Expect
    // ------
    // - Only row 0 is valid.
    fn split_flags_non_positive_and_non_numeric_rows() {
        // Arrange
        let mut rows: Vec<Record> = Vec::new();
        for (x, y) in [
            (Value::from(2.0), Value::from(3.0)),
            (Value::from(0.0), Value::from(3.0)),
            (Value::from(2.0), Value::from(-1.0)),
            (Value::from("x"), Value::from(3.0)),
        ] {
            let mut r = Record::new();
            r.insert("x".into(), x);
            r.insert("y".into(), y);
            rows.push(r);
        }
        let table = UnitTable::from_records(rows);

        // Act
        let part = ValidityPartition::split(&table, &["x"], &["y"]).expect("fields exist");

        // Assert
        assert_eq!(part.valid, vec![0]);
        assert_eq!(part.invalid, vec![1, 2, 3]);
        assert_eq!(part.mask, vec![true, false, false, false]);
    }

    #[test]
    // Purpose
    // -------
    // An absent declared field is a configuration error naming the field.
    //
    // Given
    // -----
    // - A table with `x`, `y` and an output list naming `z`.
    //
    // Expect
    // ------
    // - `MissingFields { fields: ["z"] }`.
    fn split_rejects_absent_fields() {
        // Arrange
        let table = UnitTable::from_columns(vec![("x", vec![1.0]), ("y", vec![1.0])])
            .expect("valid columns");

        // Act
        let err = ValidityPartition::split(&table, &["x"], &["z"]).expect_err("z is absent");

        // Assert
        assert_eq!(err, DataError::MissingFields { fields: vec!["z".into()] });
    }

    #[test]
    // Purpose
    // -------
    // Empty role lists are rejected before any filtering.
    //
    // Given
    // -----
    // - An empty output list.
    //
    // Expect
    // ------
    // - `EmptyFieldList { role: "output" }`.
    fn split_rejects_empty_output_list() {
        // Arrange
        let table = UnitTable::from_columns(vec![("x", vec![1.0])]).expect("valid columns");
        let outputs: [&str; 0] = [];

        // Act
        let err = ValidityPartition::split(&table, &["x"], &outputs).expect_err("no outputs");

        // Assert
        assert_eq!(err, DataError::EmptyFieldList { role: "output" });
    }

    proptest! {
        // Purpose
        // -------
        // Scattering always yields exact zeros on invalid rows and the
        // supplied values on valid rows.
        #[test]
        fn scatter_zero_fills_invalid_rows(values in proptest::collection::vec(-5.0f64..5.0, 1..40)) {
            let table = UnitTable::from_columns(vec![("x", values.clone()), ("y", vec![1.0; values.len()])])
                .expect("equal lengths");
            let part = ValidityPartition::split(&table, &["x"], &["y"]).expect("fields exist");
            let scores: Vec<f64> = part.valid.iter().map(|_| 0.75).collect();
            let out = part.scatter(&scores);
            for (i, v) in values.iter().enumerate() {
                if *v > 0.0 {
                    prop_assert_eq!(out[i], 0.75);
                } else {
                    prop_assert_eq!(out[i], 0.0);
                }
            }
        }
    }
}
