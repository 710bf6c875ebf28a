use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelectorError {
    #[error("Invalid observation date (expected YYYY-MM-DD): {0}")]
    InvalidDateFormat(String),

    #[error("Invalid filter expression: {0}")]
    InvalidFilterExpression(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Catalog is missing the required column: {0}")]
    MissingCatalogColumn(String),

    #[error("Invalid coordinate in column {column} at row {row}: {value}")]
    InvalidCoordinate {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Invalid selection parameter: {0}")]
    InvalidParameter(String),

    #[error("Unable to read the catalog: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),
}

impl PartialEq for SelectorError {
    fn eq(&self, other: &Self) -> bool {
        use SelectorError::*;
        match (self, other) {
            (InvalidDateFormat(a), InvalidDateFormat(b)) => a == b,
            (InvalidFilterExpression(a), InvalidFilterExpression(b)) => a == b,
            (UnknownColumn(a), UnknownColumn(b)) => a == b,
            (MissingCatalogColumn(a), MissingCatalogColumn(b)) => a == b,
            (
                InvalidCoordinate {
                    column: ca,
                    row: ra,
                    value: va,
                },
                InvalidCoordinate {
                    column: cb,
                    row: rb,
                    value: vb,
                },
            ) => ca == cb && ra == rb && va == vb,
            (InvalidParameter(a), InvalidParameter(b)) => a == b,

            // not comparable: same variant is enough
            (CsvError(_), CsvError(_)) => true,
            (IoError(_), IoError(_)) => true,

            _ => false,
        }
    }
}
