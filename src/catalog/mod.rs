//! # Candidate catalogs
//!
//! In-memory representation of the **candidate table** ranked by
//! [`rank_targets`](crate::ranking::rank_targets).
//!
//! ## Data model
//!
//! * Every [`CatalogRecord`] carries a `name`, a right ascension `RA` and a declination `DEC`
//!   (degrees). These three columns always exist, whatever the source catalog called them.
//! * Any other source column is kept as a named **attribute** holding a [`Value`]
//!   (integer, float, text or missing). Attributes are only read by filters and copied to
//!   the output; the ranking itself never looks at them.
//!
//! Tables are built either programmatically with [`CatalogTable::push_row`] or from a
//! delimited text file (see [`reader`]), where a [`CatalogSchema`] maps the source column
//! names onto `name`, `RA` and `DEC`.
//!
//! The [`neighbor_catalog`] submodule holds the secondary catalog of bright stars used to
//! detect crowded fields.
pub mod neighbor_catalog;
pub mod reader;

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use crate::constants::{Degree, DEC_COLUMN, NAME_COLUMN, RA_COLUMN};
use crate::selector_errors::SelectorError;

pub use reader::CatalogSchema;

/// A single cell of a catalog attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    /// Interpret a raw text cell: integers first, then floats, then text.
    /// Empty cells are [`Value::Missing`].
    pub fn parse_cell(cell: &str) -> Value {
        let cell = cell.trim();
        if cell.is_empty() {
            return Value::Missing;
        }
        if let Ok(i) = cell.parse::<i64>() {
            return Value::Integer(i);
        }
        match cell.parse::<f64>() {
            Ok(f) if f.is_nan() => Value::Missing,
            Ok(f) => Value::Number(f),
            Err(_) => Value::Text(cell.to_string()),
        }
    }

    /// Numeric view of the cell, if any.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Integer(i) => Some(*i as f64),
            Value::Number(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        match self {
            Value::Missing => true,
            Value::Number(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Compare two cells.
    ///
    /// Numbers compare with numbers (integers are widened to `f64`), text with text.
    /// Missing values, NaN and mixed kinds are unordered and return `None`.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (Value::Text(a), Value::Text(b)) => Some(a.cmp(b)),
            (a, b) => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x.partial_cmp(&y),
                _ => None,
            },
        }
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Number(f)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
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

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Number(x) if x.is_nan() => write!(f, "NaN"),
            Value::Number(x) => write!(f, "{x:?}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "NaN"),
        }
    }
}

/// Where a column lives inside a [`CatalogRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRef {
    Name,
    Ra,
    Dec,
    Attribute(usize),
}

/// One astronomical object of the candidate table.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogRecord {
    pub name: String,
    /// Right ascension in degrees (NaN when the source cell was empty)
    pub ra: Degree,
    /// Declination in degrees (NaN when the source cell was empty)
    pub dec: Degree,
    attributes: Vec<Value>,
}

impl CatalogRecord {
    pub fn attributes(&self) -> &[Value] {
        &self.attributes
    }

    /// Read a resolved column of this record.
    pub fn get(&self, column: ColumnRef) -> Value {
        match column {
            ColumnRef::Name => Value::Text(self.name.clone()),
            ColumnRef::Ra => Value::Number(self.ra),
            ColumnRef::Dec => Value::Number(self.dec),
            ColumnRef::Attribute(i) => self.attributes.get(i).cloned().unwrap_or(Value::Missing),
        }
    }
}

/// Ordered collection of candidate records sharing the same attribute columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogTable {
    attribute_names: Vec<String>,
    attribute_index: HashMap<String, usize>,
    records: Vec<CatalogRecord>,
}

impl CatalogTable {
    /// Create an empty table with the given attribute columns (besides `name`, `RA`, `DEC`).
    pub fn new<I, S>(attribute_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let attribute_names: Vec<String> = attribute_names.into_iter().map(Into::into).collect();
        let attribute_index = attribute_names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.clone(), i))
            .collect();
        CatalogTable {
            attribute_names,
            attribute_index,
            records: Vec::new(),
        }
    }

    /// Append a record. `attributes` must follow the order of [`Self::attribute_names`].
    pub fn push_row(
        &mut self,
        name: impl Into<String>,
        ra: Degree,
        dec: Degree,
        attributes: Vec<Value>,
    ) -> Result<(), SelectorError> {
        if attributes.len() != self.attribute_names.len() {
            return Err(SelectorError::InvalidParameter(format!(
                "expected {} attribute values, got {}",
                self.attribute_names.len(),
                attributes.len()
            )));
        }
        self.records.push(CatalogRecord {
            name: name.into(),
            ra,
            dec,
            attributes,
        });
        Ok(())
    }

    pub fn attribute_names(&self) -> &[String] {
        &self.attribute_names
    }

    /// All column names, starting with `name`, `RA`, `DEC`.
    pub fn column_names(&self) -> Vec<&str> {
        [NAME_COLUMN, RA_COLUMN, DEC_COLUMN]
            .into_iter()
            .chain(self.attribute_names.iter().map(String::as_str))
            .collect()
    }

    /// Resolve a column name to its location, if the table defines it.
    pub fn column(&self, name: &str) -> Option<ColumnRef> {
        match name {
            NAME_COLUMN => Some(ColumnRef::Name),
            RA_COLUMN => Some(ColumnRef::Ra),
            DEC_COLUMN => Some(ColumnRef::Dec),
            _ => self
                .attribute_index
                .get(name)
                .map(|&i| ColumnRef::Attribute(i)),
        }
    }

    pub fn records(&self) -> &[CatalogRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
