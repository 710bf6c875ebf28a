use crate::catalog::Value;
use crate::constants::{Degree, Hour};

/// One selected target.
///
/// The typed fields mirror the columns every result carries; [`Self::cells`] holds the full
/// row aligned with [`SelectionResult::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct ResultRow {
    pub name: String,
    pub ra: Degree,
    pub dec: Degree,
    /// `Delta_to_Sun`: absolute hour offset from the Sun
    pub delta_to_sun: Hour,
    /// `Bin`: proximity bin (99 when undefined)
    pub bin: u32,
    /// `Lat_to_Dec`: absolute declination-to-latitude difference
    pub lat_to_dec: Degree,
    /// `n_neighbor`, only in neighbor mode
    pub n_neighbor: Option<usize>,
    pub(crate) cells: Vec<Value>,
}

impl ResultRow {
    pub fn cells(&self) -> &[Value] {
        &self.cells
    }

    /// `"<name> <RA> <DEC>"` with the name trimmed and inner spaces replaced by `_`.
    pub fn catserver_line(&self) -> String {
        format!(
            "{} {:?} {:?}",
            self.name.trim().replace(' ', "_"),
            self.ra,
            self.dec
        )
    }
}

/// Ordered outcome of [`rank_targets`](crate::ranking::rank_targets).
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionResult {
    columns: Vec<String>,
    rows: Vec<ResultRow>,
    requested: usize,
    shortfall: Option<usize>,
}

impl SelectionResult {
    pub(crate) fn new(
        columns: Vec<String>,
        rows: Vec<ResultRow>,
        requested: usize,
        shortfall: Option<usize>,
    ) -> Self {
        SelectionResult {
            columns,
            rows,
            requested,
            shortfall,
        }
    }

    /// Output column names: requested columns, then `Delta_to_Sun`, `Bin`, `Lat_to_Dec`
    /// and, in neighbor mode, `n_neighbor`.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResultRow> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of targets asked for (`max_results`).
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// In neighbor mode, how many targets are missing when the catalog ran out before
    /// `max_results` targets with neighbors were found.
    pub fn shortfall(&self) -> Option<usize> {
        self.shortfall
    }

    /// Value of `column` in row `row`, if both exist.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.columns.iter().position(|c| c == column)?;
        self.rows.get(row)?.cells.get(idx)
    }

    /// One `"<name> <RA> <DEC>"` line per row, for tools that ingest plain target lists.
    pub fn catserver_lines(&self) -> Vec<String> {
        self.rows.iter().map(ResultRow::catserver_line).collect()
    }
}

impl<'a> IntoIterator for &'a SelectionResult {
    type Item = &'a ResultRow;
    type IntoIter = std::slice::Iter<'a, ResultRow>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}
