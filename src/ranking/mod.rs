//! # Target ranking
//!
//! This module ranks the candidates of a [`CatalogTable`](crate::catalog::CatalogTable) for a
//! given night and observing site, and selects the best `N` of them.
//!
//! ## Pipeline overview
//!
//! 1. **Sun position**
//!    The Sun right ascension is derived from the day offset to March 20 of the observation
//!    year with the linear model of [`crate::solar`].
//!
//! 2. **Derived columns**
//!    For every candidate:
//!    - `delta_sun_RA = (RA - sun_RA) / 15` (hours),
//!    - `abs_delta_sun_RA = |delta_sun_RA|`,
//!    - `abs_delta_sun_RA_floor = floor(| abs_delta_sun_RA - target_offset_hours |)`, the
//!      **bin**, replaced by `99` when undefined,
//!    - `abs_delta_dec_lat = |DEC - observer_latitude|`.
//!
//! 3. **Sort**
//!    Stable ascending sort on (bin, `abs_delta_dec_lat`), undefined values last.
//!
//! 4. **Filter**
//!    The [`FilterSet`](crate::filters::FilterSet) is applied to the sorted rows, keeping
//!    their order.
//!
//! 5. **Select**
//!    Without a neighbor counter, the first `max_results` rows are returned. With one, rows
//!    are scanned in order and kept only when they have at least one neighbor, until
//!    `max_results` rows are kept or the table is exhausted. A shortfall is logged and
//!    reported by [`SelectionResult::shortfall`], it is not an error.
//!
//! 6. **Project**
//!    The result keeps the requested columns followed by `Delta_to_Sun`, `Bin`, `Lat_to_Dec`
//!    (and `n_neighbor` in neighbor mode). The full list is returned with the result; the
//!    caller's column list is left untouched.
//!
//! ## Example
//!
//! ```rust
//! use target_selector::catalog::CatalogTable;
//! use target_selector::filters::FilterSet;
//! use target_selector::ranking::{rank_targets, SelectionParams};
//!
//! let mut table = CatalogTable::new(["magMax"]);
//! table.push_row("V1", 180.0, -20.0, vec![10.0.into()]).unwrap();
//! table.push_row("V2", 40.0, -25.0, vec![12.0.into()]).unwrap();
//!
//! let params = SelectionParams::builder()
//!     .observation_date("2022-03-20")
//!     .observer_latitude(-22.5)
//!     .target_offset_hours(12.0)
//!     .max_results(5)
//!     .build()
//!     .unwrap();
//!
//! let filters = FilterSet::parse_all(["magMax <= 12"]).unwrap();
//! let result = rank_targets(&table, &params, &filters, &["name", "RA", "DEC"], None).unwrap();
//!
//! assert_eq!(result.rows()[0].name, "V1");
//! assert_eq!(result.columns(), ["name", "RA", "DEC", "Delta_to_Sun", "Bin", "Lat_to_Dec"]);
//! ```
mod ranker;
mod selection_result;

pub use ranker::{rank_targets, rank_targets_str, DerivedColumn, RankedTarget};
pub use selection_result::{ResultRow, SelectionResult};

use crate::constants::{Degree, Hour, DEFAULT_MAX_RESULTS};
use crate::selector_errors::SelectorError;
use crate::target_kind::NightPeriod;
use crate::time::ObservationDate;

/// Observation parameters of a ranking run.
///
/// Fields
/// -----------------
/// * `observation_date` – Night of the observation.
/// * `observer_latitude` – Site latitude in degrees. Not range-checked: an out-of-range
///   latitude simply ranks every target poorly on the declination key.
/// * `target_offset_hours` – Desired distance between target and Sun in right ascension
///   (9 h for the first half of the night, 15 h for the second half, 12 h for the whole night).
/// * `max_results` – Maximum number of rows returned (default 15).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionParams {
    pub observation_date: ObservationDate,
    pub observer_latitude: Degree,
    pub target_offset_hours: Hour,
    pub max_results: usize,
}

impl SelectionParams {
    /// Parameters with the default result count.
    pub fn new(
        observation_date: ObservationDate,
        observer_latitude: Degree,
        target_offset_hours: Hour,
    ) -> Self {
        SelectionParams {
            observation_date,
            observer_latitude,
            target_offset_hours,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    pub fn builder() -> SelectionParamsBuilder {
        SelectionParamsBuilder::new()
    }
}

/// Builder for [`SelectionParams`], with validation.
///
/// Defaults
/// -----------------
/// * date: today (UTC),
/// * offset: [`NightPeriod::EntireNight`] (12 h),
/// * `max_results`: 15.
///
/// The latitude has no default and must be set.
#[derive(Debug, Clone)]
pub struct SelectionParamsBuilder {
    observation_date: Option<String>,
    observer_latitude: Option<Degree>,
    target_offset_hours: Hour,
    max_results: usize,
}

impl Default for SelectionParamsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SelectionParamsBuilder {
    pub fn new() -> Self {
        SelectionParamsBuilder {
            observation_date: None,
            observer_latitude: None,
            target_offset_hours: NightPeriod::EntireNight.target_offset_hours(),
            max_results: DEFAULT_MAX_RESULTS,
        }
    }

    /// Observation date as `YYYY-MM-DD`. Parsed in [`Self::build`].
    pub fn observation_date(mut self, v: impl Into<String>) -> Self {
        self.observation_date = Some(v.into());
        self
    }
    pub fn observer_latitude(mut self, v: Degree) -> Self {
        self.observer_latitude = Some(v);
        self
    }
    pub fn target_offset_hours(mut self, v: Hour) -> Self {
        self.target_offset_hours = v;
        self
    }
    pub fn night_period(mut self, period: NightPeriod) -> Self {
        self.target_offset_hours = period.target_offset_hours();
        self
    }
    pub fn max_results(mut self, v: usize) -> Self {
        self.max_results = v;
        self
    }

    /// Finalize the builder.
    ///
    /// Return
    /// ----------
    /// * `Err(SelectorError::InvalidDateFormat)` if the date does not parse,
    /// * `Err(SelectorError::InvalidParameter)` if the latitude is missing or the offset is
    ///   not finite.
    pub fn build(self) -> Result<SelectionParams, SelectorError> {
        let observation_date = match self.observation_date {
            Some(s) => s.parse::<ObservationDate>()?,
            None => ObservationDate::today()?,
        };
        let observer_latitude = self.observer_latitude.ok_or_else(|| {
            SelectorError::InvalidParameter("observer latitude is required".into())
        })?;
        if !self.target_offset_hours.is_finite() {
            return Err(SelectorError::InvalidParameter(format!(
                "target offset must be finite, got {}",
                self.target_offset_hours
            )));
        }

        Ok(SelectionParams {
            observation_date,
            observer_latitude,
            target_offset_hours: self.target_offset_hours,
            max_results: self.max_results,
        })
    }
}
