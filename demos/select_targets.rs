//! Suggest observation targets from the sample catalogs.
//!
//! ```text
//! RUST_LOG=debug cargo run --example select_targets -- variables 2022-09-01 -22.53 3
//! cargo run --example select_targets -- clusters "" 50.05 1
//! ```
//!
//! Arguments are `<variables|clusters> [date] [latitude] [night period 1|2|3] [catalog dir]`.
//! An empty date means today. Without a catalog directory the samples of `tests/data` are
//! used; with one, the full catalogs are read under their usual file names.
use std::env;
use std::process::ExitCode;

use camino::Utf8Path;
use target_selector::catalog::neighbor_catalog::NeighborCatalog;
use target_selector::catalog::CatalogTable;
use target_selector::display::ResultDisplayExt;
use target_selector::ranking::SelectionParams;
use target_selector::target_kind::{
    ClusterCuts, NightPeriod, TargetKind, VariableStarCuts, HIPPARCOS_FILE,
};
use target_selector::SelectorError;

fn run(args: &[String]) -> Result<(), SelectorError> {
    let data = Utf8Path::new("tests/data");

    let (kind, catalog_file) = match args.first().map(String::as_str) {
        Some("clusters") => (
            TargetKind::Clusters(ClusterCuts {
                min_stars: 50,
                max_half_radius_arcmin: 30.0,
            }),
            "cantat_gaudin_sample.tsv",
        ),
        _ => (
            TargetKind::VariableStars(VariableStarCuts {
                max_magnitude: 11.0,
                min_amplitude: 0.5,
                max_period: 5.0,
                field_diameter: 30.0,
            }),
            "gcvs_sample.csv",
        ),
    };

    let mut builder = SelectionParams::builder().observer_latitude(
        args.get(2)
            .map(|s| s.parse::<f64>())
            .transpose()
            .map_err(|e| SelectorError::InvalidParameter(format!("latitude: {e}")))?
            .unwrap_or(-22.53),
    );
    if let Some(date) = args.get(1).filter(|d| !d.trim().is_empty()) {
        builder = builder.observation_date(date.trim());
    }
    if let Some(period) = args.get(3) {
        builder = builder.night_period(period.parse::<NightPeriod>()?);
    }
    let params = builder.build()?;

    let (table_path, hipparcos_path) = match args.get(4) {
        Some(dir) => {
            let dir = Utf8Path::new(dir);
            (dir.join(kind.default_catalog_file()), dir.join(HIPPARCOS_FILE))
        }
        None => (data.join(catalog_file), data.join("hipparcos_sample.csv")),
    };
    let table = CatalogTable::from_path(&table_path, &kind.schema())?;
    let hipparcos = NeighborCatalog::from_path(&hipparcos_path)?;

    let result = kind.select(&table, &params, Some(&hipparcos))?;

    println!("{}", result.show());
    println!();
    println!("Catserver list:");
    println!("{}", result.catserver_string());
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
