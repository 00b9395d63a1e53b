//! Error surface for the tabular data layer.
//!
//! `DataError` covers configuration mistakes detected while reading a
//! [`UnitTable`](crate::data::table::UnitTable): declared fields that do not
//! exist, empty role lists, and shape mismatches when appending computed
//! columns. All of these are caller errors and are never retried.

/// Crate-wide result alias for table operations.
pub type DataResult<T> = Result<T, DataError>;

#[derive(Debug, Clone, PartialEq)]
pub enum DataError {
    // ---- Configuration ----
    /// One or more declared fields are absent from the table.
    MissingFields {
        fields: Vec<String>,
    },

    /// A field-role list (inputs, outputs, features, ...) was empty.
    EmptyFieldList {
        role: &'static str,
    },

    // ---- Shape ----
    /// A new column does not have one value per row.
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A row index is outside the table.
    RowOutOfBounds {
        index: usize,
        len: usize,
    },
}

impl std::error::Error for DataError {}

impl std::fmt::Display for DataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Configuration ----
            DataError::MissingFields { fields } => {
                write!(f, "Fields not found in table: {}", fields.join(", "))
            }
            DataError::EmptyFieldList { role } => {
                write!(f, "At least one {role} field must be declared")
            }

            // ---- Shape ----
            DataError::ColumnLengthMismatch { column, expected, found } => {
                write!(
                    f,
                    "Column '{column}' has {found} values but the table has {expected} rows"
                )
            }
            DataError::RowOutOfBounds { index, len } => {
                write!(f, "Row index {index} out of bounds for table with {len} rows")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Display messages that callers surface when a request is misconfigured.
    //
    // They intentionally DO NOT cover:
    // - Where the errors are raised (see `table` and `validity`).
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // The missing-fields message must name every absent field so the caller
    // can correct the request.
    //
    // Given
    // -----
    // - `MissingFields` with two names.
    //
    // Expect
    // ------
    // - Both names appear in the rendered message.
    fn missing_fields_message_names_every_field() {
        // Arrange
        let err = DataError::MissingFields { fields: vec!["camas".into(), "medicos".into()] };

        // Act
        let msg = err.to_string();

        // Assert
        assert!(msg.contains("camas"));
        assert!(msg.contains("medicos"));
    }
}
