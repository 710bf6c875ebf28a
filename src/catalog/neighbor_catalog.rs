//! # Neighbor catalog
//!
//! Secondary catalog of reference stars (Hipparcos in practice) queried to decide whether a
//! candidate lies in a crowded field. Only the `RA`, `DEC` and `Vmag` columns are read; any
//! other column in the source file is ignored. The catalog is never modified after loading.
//!
//! Blank `RA`/`DEC` cells load as NaN. Such a star never falls inside a field, so it is
//! never counted as a neighbor.
use std::fs::File;
use std::io;

use camino::Utf8Path;
use csv::{ReaderBuilder, Trim};
use serde::{Deserialize, Deserializer};

use crate::constants::{Degree, Magnitude};
use crate::selector_errors::SelectorError;

/// A reference star of the neighbor catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NeighborStar {
    /// NaN when the catalog has no position for this star.
    #[serde(rename = "RA", deserialize_with = "nan_if_blank")]
    pub ra: Degree,
    #[serde(rename = "DEC", deserialize_with = "nan_if_blank")]
    pub dec: Degree,
    /// Visual magnitude. Stars without one are never counted as neighbors.
    #[serde(rename = "Vmag")]
    pub vmag: Option<Magnitude>,
}

// The column itself stays required: only the cell may be blank.
fn nan_if_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Degree, D::Error> {
    Ok(Option::<Degree>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl NeighborStar {
    pub fn new(ra: Degree, dec: Degree, vmag: Magnitude) -> Self {
        NeighborStar {
            ra,
            dec,
            vmag: Some(vmag),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NeighborCatalog {
    stars: Vec<NeighborStar>,
}

impl NeighborCatalog {
    pub fn new(stars: Vec<NeighborStar>) -> Self {
        NeighborCatalog { stars }
    }

    /// Load the catalog from a comma-separated file with `RA`, `DEC` and `Vmag` headers.
    pub fn from_path(path: &Utf8Path) -> Result<Self, SelectorError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: io::Read>(reader: R) -> Result<Self, SelectorError> {
        let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
        let stars = csv_reader
            .deserialize::<NeighborStar>()
            .collect::<Result<Vec<_>, _>>()?;

        log::debug!("loaded {} neighbor catalog stars", stars.len());
        Ok(NeighborCatalog { stars })
    }

    pub fn stars(&self) -> &[NeighborStar] {
        &self.stars
    }

    pub fn len(&self) -> usize {
        self.stars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }
}

impl FromIterator<NeighborStar> for NeighborCatalog {
    fn from_iter<T: IntoIterator<Item = NeighborStar>>(iter: T) -> Self {
        NeighborCatalog::new(iter.into_iter().collect())
    }
}
