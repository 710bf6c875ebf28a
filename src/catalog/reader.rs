//! # Delimited-text catalog reader
//!
//! Loads a [`CatalogTable`] from a comma- or pipe-separated file with a header row.
//!
//! Source catalogs name their coordinate and identifier columns differently
//! (`_RAJ2000`/`_DEJ2000`/`GCVS` for GCVS, `RA_ICRS`/`DE_ICRS`/`Cluster` for
//! Cantat-Gaudin 2020). A [`CatalogSchema`] tells the reader which source columns to
//! rename to `RA`, `DEC` and `name`; every other column becomes an attribute under its
//! original header.
//!
//! ## Cell conversion
//!
//! * Fields are trimmed before conversion.
//! * An empty `RA`/`DEC` cell becomes NaN. The row is kept and ranks last.
//! * A non-numeric `RA`/`DEC` cell is an [`SelectorError::InvalidCoordinate`].
//! * Attribute cells go through [`Value::parse_cell`].
use std::fs::File;
use std::io;

use camino::Utf8Path;
use csv::{ReaderBuilder, StringRecord, Trim};

use super::{CatalogTable, Value};
use crate::constants::{Degree, DEC_COLUMN, NAME_COLUMN, RA_COLUMN};
use crate::selector_errors::SelectorError;

/// Mapping from a source file layout to the canonical `name`/`RA`/`DEC` columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogSchema {
    /// Field separator (`b','` or `b'|'` for the supported catalogs)
    pub delimiter: u8,
    /// Source column holding the right ascension in degrees
    pub ra_column: String,
    /// Source column holding the declination in degrees
    pub dec_column: String,
    /// Source column holding the object identifier
    pub name_column: String,
}

impl Default for CatalogSchema {
    fn default() -> Self {
        CatalogSchema {
            delimiter: b',',
            ra_column: RA_COLUMN.to_string(),
            dec_column: DEC_COLUMN.to_string(),
            name_column: NAME_COLUMN.to_string(),
        }
    }
}

impl CatalogSchema {
    pub fn new(
        delimiter: u8,
        ra_column: impl Into<String>,
        dec_column: impl Into<String>,
        name_column: impl Into<String>,
    ) -> Self {
        CatalogSchema {
            delimiter,
            ra_column: ra_column.into(),
            dec_column: dec_column.into(),
            name_column: name_column.into(),
        }
    }
}

fn find_column(headers: &StringRecord, label: &str) -> Result<usize, SelectorError> {
    headers
        .iter()
        .position(|h| h == label)
        .ok_or_else(|| SelectorError::MissingCatalogColumn(label.to_string()))
}

fn parse_coordinate(cell: &str, column: &str, line: usize) -> Result<Degree, SelectorError> {
    if cell.is_empty() {
        return Ok(f64::NAN);
    }
    cell.parse::<f64>()
        .map_err(|_| SelectorError::InvalidCoordinate {
            column: column.to_string(),
            row: line,
            value: cell.to_string(),
        })
}

impl CatalogTable {
    /// Read a candidate catalog from a file.
    ///
    /// Arguments
    /// -----------------
    /// * `path` – Delimited text file with a header row.
    /// * `schema` – Delimiter and source names of the `RA`, `DEC` and `name` columns.
    ///   Rows shorter than the header are padded with empty cells.
    ///
    /// Return
    /// ----------
    /// * The loaded table, or an error if the file cannot be read, a required column is
    ///   absent, or a coordinate is not numeric.
    pub fn from_path(path: &Utf8Path, schema: &CatalogSchema) -> Result<Self, SelectorError> {
        let file = File::open(path)?;
        Self::from_reader(file, schema)
    }

    /// Read a candidate catalog from any byte stream. See [`Self::from_path`].
    pub fn from_reader<R: io::Read>(
        reader: R,
        schema: &CatalogSchema,
    ) -> Result<Self, SelectorError> {
        let mut csv_reader = ReaderBuilder::new()
            .delimiter(schema.delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let headers = csv_reader.headers()?.clone();
        let ra_idx = find_column(&headers, &schema.ra_column)?;
        let dec_idx = find_column(&headers, &schema.dec_column)?;
        let name_idx = find_column(&headers, &schema.name_column)?;

        let attribute_idx: Vec<usize> = (0..headers.len())
            .filter(|i| ![ra_idx, dec_idx, name_idx].contains(i))
            .collect();
        let mut table = CatalogTable::new(attribute_idx.iter().map(|&i| &headers[i]));

        for record in csv_reader.records() {
            let record = record?;
            let line = record.position().map_or(0, |p| p.line() as usize);
            let cell = |i: usize| record.get(i).unwrap_or("");

            let ra = parse_coordinate(cell(ra_idx), &schema.ra_column, line)?;
            let dec = parse_coordinate(cell(dec_idx), &schema.dec_column, line)?;
            let attributes = attribute_idx
                .iter()
                .map(|&i| Value::parse_cell(cell(i)))
                .collect();

            table.push_row(cell(name_idx), ra, dec, attributes)?;
        }

        log::debug!(
            "loaded {} catalog rows with {} attribute columns",
            table.len(),
            table.attribute_names().len()
        );
        Ok(table)
    }
}
