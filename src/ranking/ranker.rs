use itertools::Itertools;
use ordered_float::OrderedFloat;

use super::selection_result::{ResultRow, SelectionResult};
use super::SelectionParams;
use crate::catalog::{CatalogRecord, CatalogTable, ColumnRef, Value};
use crate::constants::{
    Degree, Hour, ABS_DELTA_DEC_LAT, ABS_DELTA_SUN_RA, ABS_DELTA_SUN_RA_FLOOR, BIN,
    BIN_SENTINEL, DELTA_SUN_RA, DELTA_TO_SUN, LAT_TO_DEC, N_NEIGHBOR,
};
use crate::filters::{Filter, FilterSet};
use crate::neighbors::NeighborCount;
use crate::selector_errors::SelectorError;
use crate::solar::{approx_sun_ra, hours_from_sun};

/// Columns computed during ranking, addressable by filters and output projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DerivedColumn {
    DeltaSunRa,
    AbsDeltaSunRa,
    Bin,
    AbsDeltaDecLat,
}

impl DerivedColumn {
    pub const ALL: [DerivedColumn; 4] = [
        DerivedColumn::DeltaSunRa,
        DerivedColumn::AbsDeltaSunRa,
        DerivedColumn::Bin,
        DerivedColumn::AbsDeltaDecLat,
    ];

    /// Column name while ranking (`abs_delta_sun_RA_floor`, ...).
    pub fn name(&self) -> &'static str {
        match self {
            DerivedColumn::DeltaSunRa => DELTA_SUN_RA,
            DerivedColumn::AbsDeltaSunRa => ABS_DELTA_SUN_RA,
            DerivedColumn::Bin => ABS_DELTA_SUN_RA_FLOOR,
            DerivedColumn::AbsDeltaDecLat => ABS_DELTA_DEC_LAT,
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.name() == name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResolvedColumn {
    Catalog(ColumnRef),
    Derived(DerivedColumn),
}

fn resolve_column(table: &CatalogTable, name: &str) -> Result<ResolvedColumn, SelectorError> {
    table
        .column(name)
        .map(ResolvedColumn::Catalog)
        .or_else(|| DerivedColumn::from_name(name).map(ResolvedColumn::Derived))
        .ok_or_else(|| SelectorError::UnknownColumn(name.to_string()))
}

/// A candidate together with its ranking metrics.
#[derive(Debug, Clone, Copy)]
pub struct RankedTarget<'a> {
    pub record: &'a CatalogRecord,
    /// Signed hour offset from the Sun
    pub delta_sun_ra: Hour,
    pub abs_delta_sun_ra: Hour,
    /// `floor(|abs_delta_sun_ra - target_offset|)`, NaN when undefined
    bin_raw: f64,
    pub abs_delta_dec_lat: Degree,
}

impl<'a> RankedTarget<'a> {
    pub fn new(
        record: &'a CatalogRecord,
        sun_ra: Degree,
        observer_latitude: Degree,
        target_offset_hours: Hour,
    ) -> Self {
        let delta_sun_ra = hours_from_sun(record.ra, sun_ra);
        let abs_delta_sun_ra = delta_sun_ra.abs();
        RankedTarget {
            record,
            delta_sun_ra,
            abs_delta_sun_ra,
            bin_raw: (abs_delta_sun_ra - target_offset_hours).abs().floor(),
            abs_delta_dec_lat: (record.dec - observer_latitude).abs(),
        }
    }

    /// Integer proximity bin; [`BIN_SENTINEL`] when the Sun offset is undefined.
    pub fn bin(&self) -> u32 {
        if self.bin_raw.is_finite() {
            self.bin_raw as u32
        } else {
            BIN_SENTINEL
        }
    }

    /// Sort key: bin then declination distance, NaN ordered after every number.
    fn sort_key(&self) -> (OrderedFloat<f64>, OrderedFloat<f64>) {
        (
            OrderedFloat(self.bin_raw),
            OrderedFloat(self.abs_delta_dec_lat),
        )
    }

    fn value(&self, column: ResolvedColumn) -> Value {
        match column {
            ResolvedColumn::Catalog(c) => self.record.get(c),
            ResolvedColumn::Derived(DerivedColumn::DeltaSunRa) => Value::Number(self.delta_sun_ra),
            ResolvedColumn::Derived(DerivedColumn::AbsDeltaSunRa) => {
                Value::Number(self.abs_delta_sun_ra)
            }
            ResolvedColumn::Derived(DerivedColumn::Bin) => Value::Integer(self.bin() as i64),
            ResolvedColumn::Derived(DerivedColumn::AbsDeltaDecLat) => {
                Value::Number(self.abs_delta_dec_lat)
            }
        }
    }

    fn into_row(self, projection: &[ResolvedColumn], n_neighbor: Option<usize>) -> ResultRow {
        let mut cells: Vec<Value> = projection.iter().map(|&c| self.value(c)).collect();
        cells.push(Value::Number(self.abs_delta_sun_ra));
        cells.push(Value::Integer(self.bin() as i64));
        cells.push(Value::Number(self.abs_delta_dec_lat));
        if let Some(n) = n_neighbor {
            cells.push(Value::Integer(n as i64));
        }

        ResultRow {
            name: self.record.name.clone(),
            ra: self.record.ra,
            dec: self.record.dec,
            delta_to_sun: self.abs_delta_sun_ra,
            bin: self.bin(),
            lat_to_dec: self.abs_delta_dec_lat,
            n_neighbor,
            cells,
        }
    }
}

/// Rank the candidates of `table` and select the best ones.
///
/// See the [module documentation](crate::ranking) for the full pipeline.
///
/// Arguments
/// -----------------
/// * `table` – Candidate catalog (read only).
/// * `params` – Date, latitude, Sun offset and result count.
/// * `filters` – Predicates combined with AND; an empty set keeps every row.
/// * `desired_columns` – Columns copied to the output, in order. Catalog columns and the four
///   derived columns (`delta_sun_RA`, `abs_delta_sun_RA`, `abs_delta_sun_RA_floor`,
///   `abs_delta_dec_lat`) are accepted.
/// * `neighbor_counter` – When given, only targets with at least one neighbor are kept.
///
/// Return
/// ----------
/// * A [`SelectionResult`] of at most `params.max_results` rows.
/// * `Err(SelectorError::UnknownColumn)` if a filter or a desired column names a column the
///   table does not define. Names are checked against the table header, so a table without
///   rows still rejects them.
pub fn rank_targets<S: AsRef<str>>(
    table: &CatalogTable,
    params: &SelectionParams,
    filters: &FilterSet,
    desired_columns: &[S],
    neighbor_counter: Option<&dyn NeighborCount>,
) -> Result<SelectionResult, SelectorError> {
    let mut columns: Vec<String> = desired_columns
        .iter()
        .map(|c| c.as_ref().to_string())
        .collect();
    columns.extend([DELTA_TO_SUN, BIN, LAT_TO_DEC].map(String::from));
    if neighbor_counter.is_some() {
        columns.push(N_NEIGHBOR.to_string());
    }

    let projection = desired_columns
        .iter()
        .map(|c| resolve_column(table, c.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let predicates: Vec<(ResolvedColumn, &Filter)> = filters
        .iter()
        .map(|f| -> Result<_, SelectorError> { Ok((resolve_column(table, &f.column)?, f)) })
        .collect::<Result<_, _>>()?;

    let max_results = params.max_results;
    if table.is_empty() {
        let shortfall = neighbor_counter.and((max_results > 0).then_some(max_results));
        if shortfall.is_some() {
            log::warn!("Couldn't find the {max_results} targets: the candidate table is empty");
        }
        return Ok(SelectionResult::new(columns, Vec::new(), max_results, shortfall));
    }

    let day_offset = params.observation_date.day_offset_from_equinox();
    let sun_ra = approx_sun_ra(&params.observation_date);
    log::debug!(
        "ranking {} targets for {} (day offset {day_offset}, sun RA {sun_ra:.3} deg)",
        table.len(),
        params.observation_date
    );
    if !filters.is_empty() {
        log::debug!("filters: {}", filters.iter().join(" AND "));
    }

    let mut ranked: Vec<RankedTarget> = table
        .records()
        .iter()
        .map(|r| {
            RankedTarget::new(
                r,
                sun_ra,
                params.observer_latitude,
                params.target_offset_hours,
            )
        })
        .collect();
    ranked.sort_by_key(RankedTarget::sort_key);

    let mut candidates = ranked
        .into_iter()
        .filter(|t| predicates.iter().all(|(c, f)| f.matches(&t.value(*c))));

    let (rows, shortfall) = match neighbor_counter {
        None => {
            let rows = candidates
                .take(max_results)
                .map(|t| t.into_row(&projection, None))
                .collect();
            (rows, None)
        }
        Some(counter) => {
            let mut rows: Vec<ResultRow> = Vec::with_capacity(max_results);
            while rows.len() < max_results {
                let Some(target) = candidates.next() else {
                    break;
                };
                let n = counter.neighbor_count(target.record.ra, target.record.dec);
                if n != 0 {
                    rows.push(target.into_row(&projection, Some(n)));
                }
            }

            let shortfall = (rows.len() < max_results).then(|| max_results - rows.len());
            if let Some(missing) = shortfall {
                log::warn!(
                    "Couldn't find the {max_results} targets: {} found with neighbors, {missing} missing",
                    rows.len()
                );
            }
            (rows, shortfall)
        }
    };

    Ok(SelectionResult::new(columns, rows, max_results, shortfall))
}

/// [`rank_targets`] with a textual date and textual filters.
///
/// Return
/// ----------
/// * `Err(SelectorError::InvalidDateFormat)` if `observation_date` is not `YYYY-MM-DD`,
/// * `Err(SelectorError::InvalidFilterExpression)` if a filter does not parse,
/// * otherwise the same as [`rank_targets`].
#[allow(clippy::too_many_arguments)]
pub fn rank_targets_str<F: AsRef<str>, S: AsRef<str>>(
    table: &CatalogTable,
    observation_date: &str,
    observer_latitude: Degree,
    filters: &[F],
    desired_columns: &[S],
    target_offset_hours: Hour,
    max_results: usize,
    neighbor_counter: Option<&dyn NeighborCount>,
) -> Result<SelectionResult, SelectorError> {
    let params = SelectionParams {
        observation_date: observation_date.parse()?,
        observer_latitude,
        target_offset_hours,
        max_results,
    };
    let filters = FilterSet::parse_all(filters)?;
    rank_targets(table, &params, &filters, desired_columns, neighbor_counter)
}

#[cfg(test)]
mod ranker_test {
    use super::*;
    use crate::constants::DEFAULT_MAX_RESULTS;
    use crate::filters::CompareOp;
    use approx::assert_relative_eq;

    const COLUMNS: [&str; 3] = ["name", "RA", "DEC"];

    fn params(date: &str, latitude: f64, offset: f64, n: usize) -> SelectionParams {
        SelectionParams {
            observation_date: date.parse().unwrap(),
            observer_latitude: latitude,
            target_offset_hours: offset,
            max_results: n,
        }
    }

    fn table(rows: &[(&str, f64, f64, f64)]) -> CatalogTable {
        let mut table = CatalogTable::new(["magMax"]);
        for &(name, ra, dec, mag) in rows {
            table.push_row(name, ra, dec, vec![mag.into()]).unwrap();
        }
        table
    }

    fn names(result: &SelectionResult) -> Vec<&str> {
        result.rows().iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn test_derived_columns_at_equinox() {
        let t = table(&[("A", 180.0, -10.0, 10.0)]);
        let result = rank_targets(
            &t,
            &params("2022-03-20", -22.0, 12.0, 15),
            &FilterSet::default(),
            &COLUMNS,
            None,
        )
        .unwrap();

        let row = &result.rows()[0];
        assert_eq!(row.delta_to_sun, 12.0);
        assert_eq!(row.bin, 0);
        assert_eq!(row.lat_to_dec, 12.0);

        let target = RankedTarget::new(&t.records()[0], 0.0, -22.0, 12.0);
        assert_eq!(target.delta_sun_ra, 12.0);
    }

    #[test]
    fn test_negative_delta_uses_absolute_value() {
        let t = table(&[("A", 0.0, 0.0, 10.0)]);
        // 2022-09-01: sun RA = 165 * 360 / 365
        let sun_ra = 165.0 * 360.0 / 365.0;
        let target = RankedTarget::new(&t.records()[0], sun_ra, 0.0, 9.0);
        assert_relative_eq!(target.delta_sun_ra, -sun_ra / 15.0, epsilon = 1e-12);
        assert_relative_eq!(target.abs_delta_sun_ra, sun_ra / 15.0, epsilon = 1e-12);
        assert_eq!(target.bin(), 1);
    }

    #[test]
    fn test_sort_by_bin_then_declination() {
        let t = table(&[
            ("far", 60.0, 0.0, 10.0),
            ("close_high", 185.0, 30.0, 10.0),
            ("close_low", 175.0, -20.0, 10.0),
            ("mid", 150.0, -22.0, 10.0),
        ]);
        let result = rank_targets(
            &t,
            &params("2022-03-20", -22.0, 12.0, 15),
            &FilterSet::default(),
            &COLUMNS,
            None,
        )
        .unwrap();

        assert_eq!(names(&result), ["close_low", "close_high", "mid", "far"]);
        let bins: Vec<u32> = result.rows().iter().map(|r| r.bin).collect();
        assert_eq!(bins, [0, 0, 2, 8]);
    }

    #[test]
    fn test_ties_keep_catalog_order() {
        let t = table(&[
            ("first", 180.0, 0.0, 10.0),
            ("second", 180.0, 0.0, 11.0),
            ("third", 180.0, 0.0, 12.0),
        ]);
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 15),
            &FilterSet::default(),
            &COLUMNS,
            None,
        )
        .unwrap();
        assert_eq!(names(&result), ["first", "second", "third"]);
    }

    #[test]
    fn test_undefined_rows_sort_last_with_sentinel() {
        let t = table(&[
            ("no_ra", f64::NAN, 0.0, 10.0),
            ("no_dec", 180.0, f64::NAN, 10.0),
            ("ok", 100.0, 0.0, 10.0),
        ]);
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 15),
            &FilterSet::default(),
            &COLUMNS,
            None,
        )
        .unwrap();
        assert_eq!(names(&result), ["no_dec", "ok", "no_ra"]);
        assert_eq!(result.rows()[2].bin, BIN_SENTINEL);
    }

    #[test]
    fn test_filters_apply_after_sort() {
        let t = table(&[
            ("faint", 180.0, 0.0, 15.0),
            ("bright", 90.0, 0.0, 10.0),
            ("medium", 170.0, 0.0, 12.0),
        ]);
        let filters = FilterSet::new(vec![Filter::new("magMax", CompareOp::Le, 12.0)]);
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 15),
            &filters,
            &COLUMNS,
            None,
        )
        .unwrap();
        assert_eq!(names(&result), ["medium", "bright"]);
    }

    #[test]
    fn test_filter_on_derived_column() {
        let t = table(&[("A", 180.0, 0.0, 10.0), ("B", 90.0, 0.0, 10.0)]);
        let filters = FilterSet::parse_all(["abs_delta_sun_RA_floor < 1"]).unwrap();
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 15),
            &filters,
            &COLUMNS,
            None,
        )
        .unwrap();
        assert_eq!(names(&result), ["A"]);
    }

    #[test]
    fn test_unknown_columns_are_rejected() {
        let t = table(&[("A", 180.0, 0.0, 10.0)]);
        let p = params("2022-03-20", 0.0, 12.0, 15);

        let filters = FilterSet::parse_all(["Period <= 3"]).unwrap();
        let err = rank_targets(&t, &p, &filters, &COLUMNS, None).unwrap_err();
        assert_eq!(err, SelectorError::UnknownColumn("Period".to_string()));

        let err = rank_targets(&t, &p, &FilterSet::default(), &["name", "Bin"], None)
            .unwrap_err();
        assert_eq!(err, SelectorError::UnknownColumn("Bin".to_string()));
    }

    #[test]
    fn test_max_results_truncates() {
        let rows: Vec<(String, f64)> = (0..30).map(|i| (format!("T{i}"), i as f64 * 12.0)).collect();
        let mut t = CatalogTable::new(Vec::<String>::new());
        for (name, ra) in &rows {
            t.push_row(name.as_str(), *ra, 0.0, vec![]).unwrap();
        }
        let p = params("2022-03-20", 0.0, 12.0, DEFAULT_MAX_RESULTS);
        let result = rank_targets(&t, &p, &FilterSet::default(), &COLUMNS, None).unwrap();
        assert_eq!(result.len(), DEFAULT_MAX_RESULTS);
        assert_eq!(result.shortfall(), None);

        let p = params("2022-03-20", 0.0, 12.0, 0);
        let result = rank_targets(&t, &p, &FilterSet::default(), &COLUMNS, None).unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_neighbor_mode_skips_isolated_targets() {
        let t = table(&[
            ("lonely", 180.0, 0.0, 10.0),
            ("crowded", 181.0, 0.0, 10.0),
            ("busy", 170.0, 0.0, 10.0),
            ("also_crowded", 100.0, 0.0, 10.0),
        ]);
        let counter = |ra: Degree, _dec: Degree| if ra == 180.0 { 0 } else { (ra / 100.0) as usize };
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 2),
            &FilterSet::default(),
            &COLUMNS,
            Some(&counter),
        )
        .unwrap();

        assert_eq!(names(&result), ["crowded", "busy"]);
        assert_eq!(result.rows()[0].n_neighbor, Some(1));
        assert_eq!(result.shortfall(), None);
        assert_eq!(result.columns().last().map(String::as_str), Some("n_neighbor"));
    }

    #[test]
    fn test_neighbor_mode_shortfall_is_not_an_error() {
        let t = table(&[("A", 180.0, 0.0, 10.0), ("B", 170.0, 0.0, 10.0)]);
        let counter = |ra: Degree, _dec: Degree| usize::from(ra < 175.0);
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 5),
            &FilterSet::default(),
            &COLUMNS,
            Some(&counter),
        )
        .unwrap();
        assert_eq!(names(&result), ["B"]);
        assert_eq!(result.shortfall(), Some(4));
    }

    #[test]
    fn test_neighbor_scan_stops_once_enough_targets() {
        use std::cell::Cell;

        let t = table(&[
            ("A", 180.0, 0.0, 10.0),
            ("B", 170.0, 0.0, 10.0),
            ("C", 90.0, 0.0, 10.0),
        ]);
        let calls = Cell::new(0);
        let counter = |_: Degree, _: Degree| -> usize {
            calls.set(calls.get() + 1);
            1
        };
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 2),
            &FilterSet::default(),
            &COLUMNS,
            Some(&counter),
        )
        .unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_empty_table_gives_empty_result() {
        let t = table(&[]);
        let filters = FilterSet::parse_all(["magMax <= 12"]).unwrap();
        let result = rank_targets(
            &t,
            &params("2022-03-20", 0.0, 12.0, 15),
            &filters,
            &COLUMNS,
            None,
        )
        .unwrap();
        assert!(result.is_empty());
        assert_eq!(
            result.columns(),
            ["name", "RA", "DEC", "Delta_to_Sun", "Bin", "Lat_to_Dec"]
        );
    }

    #[test]
    fn test_header_only_table_still_checks_columns() {
        let t = CatalogTable::from_reader(
            "name,RA,DEC,magMax\n".as_bytes(),
            &crate::catalog::CatalogSchema::default(),
        )
        .unwrap();
        assert!(t.is_empty());

        let err = rank_targets_str(
            &t,
            "2022-03-20",
            0.0,
            &["Perid <= 3"],
            &["name", "magMax"],
            12.0,
            15,
            None,
        )
        .unwrap_err();
        assert_eq!(err, SelectorError::UnknownColumn("Perid".to_string()));

        let no_filter: [&str; 0] = [];
        let err = rank_targets_str(
            &t,
            "2022-03-20",
            0.0,
            &no_filter,
            &["name", "Typo"],
            12.0,
            15,
            None,
        )
        .unwrap_err();
        assert_eq!(err, SelectorError::UnknownColumn("Typo".to_string()));

        let result = rank_targets_str(
            &t,
            "2022-03-20",
            0.0,
            &["magMax <= 12", "abs_delta_dec_lat < 30"],
            &["name", "magMax"],
            12.0,
            15,
            None,
        )
        .unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_rank_targets_str_errors() {
        let t = table(&[("A", 180.0, 0.0, 10.0)]);
        let no_filter: [&str; 0] = [];

        let err =
            rank_targets_str(&t, "2022-02-30", 0.0, &no_filter, &COLUMNS, 12.0, 15, None)
                .unwrap_err();
        assert!(matches!(err, SelectorError::InvalidDateFormat(_)));

        let err = rank_targets_str(&t, "2022-03-20", 0.0, &["magMax <== 1"], &COLUMNS, 12.0, 15, None)
            .unwrap_err();
        assert!(matches!(err, SelectorError::InvalidFilterExpression(_)));

        let result =
            rank_targets_str(&t, "2022-03-20", 0.0, &["magMax <= 12"], &COLUMNS, 12.0, 15, None)
                .unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_derived_column_names() {
        for c in DerivedColumn::ALL {
            assert_eq!(DerivedColumn::from_name(c.name()), Some(c));
        }
        assert_eq!(DerivedColumn::from_name("Bin"), None);
    }
}
