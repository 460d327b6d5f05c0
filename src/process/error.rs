use thiserror::Error;

/// Fatal problems with a listings table. Every variant names the column.
#[derive(Debug, Error, PartialEq)]
pub enum PrepareError {
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),

    #[error("column `{column}`, record {row}: `{value}` is not a number")]
    NotNumeric {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("column `{column}`, record {row}: required value is missing")]
    MissingValue { column: &'static str, row: usize },

    #[error("column `{column}`, record {row}: {value} is out of range ({expected})")]
    OutOfRange {
        column: &'static str,
        row: usize,
        value: String,
        expected: &'static str,
    },

    #[error("column `{column}`, record {row}: `{value}` does not match YYYY-MM-DD")]
    BadDate {
        column: &'static str,
        row: usize,
        value: String,
    },

    #[error("column `{0}` has not been parsed into dates yet")]
    DatesNotParsed(&'static str),
}

impl PrepareError {
    /// Column the error refers to.
    pub fn column(&self) -> &'static str {
        match self {
            PrepareError::MissingColumn(c) | PrepareError::DatesNotParsed(c) => *c,
            PrepareError::NotNumeric { column, .. }
            | PrepareError::MissingValue { column, .. }
            | PrepareError::OutOfRange { column, .. }
            | PrepareError::BadDate { column, .. } => *column,
        }
    }
}
