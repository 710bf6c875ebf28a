//! # Target presets
//!
//! Ready-made selection settings for the two kinds of targets the selector is used with:
//!
//! * **Variable stars** from GCVS 5.1, with crowded-field detection against Hipparcos,
//! * **Open clusters** from Cantat-Gaudin et al. (2020).
//!
//! A [`TargetKind`] knows how its catalog is laid out ([`CatalogSchema`]), which columns to
//! report, which [`FilterSet`] its cuts translate to and whether neighbors are counted.
//! [`NightPeriod`] maps the part of the night to observe onto the Sun offset used by the
//! ranking.
use std::fmt;
use std::str::FromStr;

use crate::catalog::neighbor_catalog::NeighborCatalog;
use crate::catalog::{CatalogSchema, CatalogTable};
use crate::constants::{ArcMin, Degree, Hour, Magnitude, ARCMIN_PER_DEG};
use crate::filters::{CompareOp, Filter, FilterSet};
use crate::neighbors::{FieldNeighborCounter, NeighborCount};
use crate::ranking::{rank_targets, SelectionParams, SelectionResult};
use crate::selector_errors::SelectorError;

/// Default file name of the cleaned GCVS 5.1 export.
pub const GCVS_FILE: &str = "gcvs5_cleaned.csv";
/// Default file name of the Cantat-Gaudin 2020 cluster table.
pub const CLUSTER_FILE: &str = "cantat-gaudin_2020.tsv";
/// Default file name of the Hipparcos neighbor catalog.
pub const HIPPARCOS_FILE: &str = "hipparco.csv";

/// Part of the night the targets should be observable in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NightPeriod {
    FirstHalf,
    SecondHalf,
    EntireNight,
}

impl NightPeriod {
    /// Desired hour offset between target and Sun.
    ///
    /// Return
    /// ----------
    /// * 9 h for the first half, 15 h for the second half, 12 h for the entire night.
    pub fn target_offset_hours(&self) -> Hour {
        match self {
            NightPeriod::FirstHalf => 9.0,
            NightPeriod::SecondHalf => 15.0,
            NightPeriod::EntireNight => 12.0,
        }
    }
}

impl TryFrom<u8> for NightPeriod {
    type Error = SelectorError;

    /// Menu numbering: `1` first half, `2` second half, `3` entire night.
    fn try_from(choice: u8) -> Result<Self, Self::Error> {
        match choice {
            1 => Ok(NightPeriod::FirstHalf),
            2 => Ok(NightPeriod::SecondHalf),
            3 => Ok(NightPeriod::EntireNight),
            other => Err(SelectorError::InvalidParameter(format!(
                "night period must be 1, 2 or 3, got {other}"
            ))),
        }
    }
}

impl FromStr for NightPeriod {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let choice = s.trim().parse::<u8>().map_err(|_| {
            SelectorError::InvalidParameter(format!("night period must be 1, 2 or 3, got {s:?}"))
        })?;
        NightPeriod::try_from(choice)
    }
}

impl fmt::Display for NightPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            NightPeriod::FirstHalf => "first half",
            NightPeriod::SecondHalf => "second half",
            NightPeriod::EntireNight => "entire night",
        };
        f.write_str(label)
    }
}

/// Cuts applied to GCVS variable stars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableStarCuts {
    /// Faintest accepted maximum magnitude, also the Hipparcos `Vmag` cutoff
    pub max_magnitude: Magnitude,
    /// Smallest accepted amplitude (mag)
    pub min_amplitude: Magnitude,
    /// Longest accepted period (days)
    pub max_period: f64,
    /// Instrument field-of-view diameter (arcmin)
    pub field_diameter: ArcMin,
}

/// Cuts applied to Cantat-Gaudin open clusters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterCuts {
    /// Minimum number of members with membership probability above 0.7
    pub min_stars: i64,
    /// Maximum radius containing half of the members, in arc-minutes
    pub max_half_radius_arcmin: ArcMin,
}

impl ClusterCuts {
    /// `r50` is tabulated in degrees.
    pub fn max_half_radius_deg(&self) -> Degree {
        self.max_half_radius_arcmin / ARCMIN_PER_DEG
    }
}

/// Kind of target to select, with its cuts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TargetKind {
    VariableStars(VariableStarCuts),
    Clusters(ClusterCuts),
}

impl TargetKind {
    /// Layout of the candidate catalog of this kind.
    pub fn schema(&self) -> CatalogSchema {
        match self {
            TargetKind::VariableStars(_) => {
                CatalogSchema::new(b',', "_RAJ2000", "_DEJ2000", "GCVS")
            }
            TargetKind::Clusters(_) => CatalogSchema::new(b'|', "RA_ICRS", "DE_ICRS", "Cluster"),
        }
    }

    /// Conventional file name of the candidate catalog.
    pub fn default_catalog_file(&self) -> &'static str {
        match self {
            TargetKind::VariableStars(_) => GCVS_FILE,
            TargetKind::Clusters(_) => CLUSTER_FILE,
        }
    }

    pub fn desired_columns(&self) -> &'static [&'static str] {
        match self {
            TargetKind::VariableStars(_) => &[
                "name",
                "RA",
                "DEC",
                "magMax",
                "VarType",
                "Period",
                "Amplitude",
            ],
            TargetKind::Clusters(_) => &["name", "RA", "DEC", "nbstars07", "r50"],
        }
    }

    pub fn filters(&self) -> FilterSet {
        match self {
            TargetKind::VariableStars(cuts) => FilterSet::new(vec![
                Filter::new("magMax", CompareOp::Le, cuts.max_magnitude),
                Filter::new("Amplitude", CompareOp::Ge, cuts.min_amplitude),
                Filter::new("Period", CompareOp::Le, cuts.max_period),
            ]),
            TargetKind::Clusters(cuts) => FilterSet::new(vec![
                Filter::new("nbstars07", CompareOp::Ge, cuts.min_stars),
                Filter::new("r50", CompareOp::Le, cuts.max_half_radius_deg()),
            ]),
        }
    }

    /// Neighbor counter for this kind, if it counts neighbors at all.
    ///
    /// Variable stars bind `catalog` to their field diameter with `max_magnitude` as the
    /// brightness cutoff. Clusters never count neighbors.
    pub fn neighbor_counter<'a>(
        &self,
        catalog: &'a NeighborCatalog,
    ) -> Result<Option<FieldNeighborCounter<'a>>, SelectorError> {
        match self {
            TargetKind::VariableStars(cuts) => Ok(Some(FieldNeighborCounter::new(
                catalog,
                cuts.field_diameter,
                cuts.max_magnitude,
            )?)),
            TargetKind::Clusters(_) => Ok(None),
        }
    }

    /// Rank `table` with the columns, filters and neighbor rule of this kind.
    ///
    /// Arguments
    /// -----------------
    /// * `table` – Candidates loaded with [`Self::schema`].
    /// * `params` – Date, latitude, Sun offset and result count.
    /// * `neighbors` – Reference stars. Ignored by kinds that do not count neighbors; when
    ///   `None`, no neighbor filtering happens.
    pub fn select(
        &self,
        table: &CatalogTable,
        params: &SelectionParams,
        neighbors: Option<&NeighborCatalog>,
    ) -> Result<SelectionResult, SelectorError> {
        let counter = match neighbors {
            Some(catalog) => self.neighbor_counter(catalog)?,
            None => None,
        };
        log::info!(
            "selecting {} {} for {} at latitude {}",
            params.max_results,
            self,
            params.observation_date,
            params.observer_latitude
        );
        rank_targets(
            table,
            params,
            &self.filters(),
            self.desired_columns(),
            counter.as_ref().map(|c| c as &dyn NeighborCount),
        )
    }
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetKind::VariableStars(_) => f.write_str("variable stars"),
            TargetKind::Clusters(_) => f.write_str("open clusters"),
        }
    }
}
