//! # Tabular display for selection results
//!
//! Borrowing renderer printing a [`SelectionResult`] as a table with
//! [`comfy-table`](https://docs.rs/comfy-table/latest/comfy_table/).
//!
//! The header is [`SelectionResult::columns`]; numeric cells are right-aligned and floats
//! are printed with a fixed number of decimals (3 by default). Missing values render as
//! `NaN`. A neighbor-mode shortfall adds a footer line under the table.
//! [`ResultDisplayExt::catserver_string`] gives the plain one-line-per-target listing.
//!
//! ```rust,ignore
//! use target_selector::display::ResultDisplayExt;
//!
//! println!("{}", result.show());
//! println!("{}", result.show().with_precision(5));
//! ```
use std::fmt;

use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, ContentArrangement, Table};
use itertools::Itertools;

use crate::catalog::Value;
use crate::ranking::SelectionResult;

/// Display adaptor for a [`SelectionResult`].
#[derive(Debug, Clone, Copy)]
pub struct ResultDisplay<'a> {
    result: &'a SelectionResult,
    precision: usize,
}

impl<'a> ResultDisplay<'a> {
    pub fn new(result: &'a SelectionResult) -> Self {
        ResultDisplay {
            result,
            precision: 3,
        }
    }

    /// Number of decimals of floating-point cells.
    pub fn with_precision(mut self, p: usize) -> Self {
        self.precision = p;
        self
    }

    fn cell(&self, value: &Value) -> Cell {
        match value {
            Value::Integer(i) => Cell::new(i).set_alignment(CellAlignment::Right),
            Value::Number(x) if x.is_finite() => {
                Cell::new(format!("{:.*}", self.precision, x)).set_alignment(CellAlignment::Right)
            }
            Value::Number(x) => Cell::new(x).set_alignment(CellAlignment::Right),
            Value::Text(s) => Cell::new(s),
            Value::Missing => Cell::new("NaN").set_alignment(CellAlignment::Right),
        }
    }

    fn render_comfy(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(self.result.columns());

        for row in self.result.iter() {
            table.add_row(row.cells().iter().map(|v| self.cell(v)));
        }
        table.to_string()
    }
}

/// Convenience methods to render a [`SelectionResult`].
pub trait ResultDisplayExt {
    fn show(&self) -> ResultDisplay<'_>;

    fn show_string(&self) -> String {
        format!("{}", self.show())
    }

    /// Newline-separated `"<name> <RA> <DEC>"` lines, ready to paste into a catalog server.
    fn catserver_string(&self) -> String;
}

impl ResultDisplayExt for SelectionResult {
    fn show(&self) -> ResultDisplay<'_> {
        ResultDisplay::new(self)
    }

    fn catserver_string(&self) -> String {
        self.iter().map(|row| row.catserver_line()).join("\n")
    }
}

impl fmt::Display for ResultDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Selected targets (n={}/{})",
            self.result.len(),
            self.result.requested()
        )?;
        f.write_str(&self.render_comfy())?;
        if let Some(missing) = self.result.shortfall() {
            write!(
                f,
                "\nCouldn't find the {} targets with neighbors: {missing} missing",
                self.result.requested()
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod result_display_test {
    use super::*;
    use crate::catalog::CatalogTable;
    use crate::filters::FilterSet;
    use crate::ranking::{rank_targets, SelectionParams};

    fn ranked(neighbors: bool) -> SelectionResult {
        let mut table = CatalogTable::new(["VarType", "Period"]);
        table
            .push_row("R And", 180.0, -20.0, vec!["M".into(), 409.2.into()])
            .unwrap();
        table
            .push_row("V1", 40.0, -25.0, vec!["EA".into(), Value::Missing])
            .unwrap();
        let params = SelectionParams::builder()
            .observation_date("2022-03-20")
            .observer_latitude(-22.5)
            .max_results(4)
            .build()
            .unwrap();
        let one = |_: f64, _: f64| -> usize { 1 };
        rank_targets(
            &table,
            &params,
            &FilterSet::default(),
            &["name", "VarType", "Period"],
            neighbors.then_some(&one as &dyn crate::neighbors::NeighborCount),
        )
        .unwrap()
    }

    #[test]
    fn test_table_has_headers_and_rows() {
        let out = ranked(false).show_string();
        for header in ["name", "VarType", "Period", "Delta_to_Sun", "Bin", "Lat_to_Dec"] {
            assert!(out.contains(header), "missing header {header} in\n{out}");
        }
        assert!(out.starts_with("Selected targets (n=2/4)"));
        assert!(out.contains("R And"));
        assert!(out.contains("409.200"));
        assert!(out.contains("12.000"));
        assert!(out.contains("NaN"));
        assert!(!out.contains("Couldn't find"));
    }

    #[test]
    fn test_precision_and_shortfall_footer() {
        let result = ranked(true);
        let out = result.show().with_precision(1).to_string();
        assert!(out.contains("409.2"));
        assert!(!out.contains("409.20"));
        assert!(out.contains("n_neighbor"));
        assert!(out.ends_with("Couldn't find the 4 targets with neighbors: 2 missing"));
    }

    #[test]
    fn test_catserver_string() {
        assert_eq!(ranked(false).catserver_string(), "R_And 180.0 -20.0\nV1 40.0 -25.0");
    }
}
