use approx::assert_relative_eq;
use camino::Utf8Path;
use target_selector::catalog::neighbor_catalog::NeighborCatalog;
use target_selector::catalog::{CatalogSchema, CatalogTable};
use target_selector::ranking::ResultRow;

pub fn load_table(file: &str, schema: &CatalogSchema) -> CatalogTable {
    CatalogTable::from_path(&Utf8Path::new("tests/data").join(file), schema).unwrap()
}

pub fn load_hipparcos() -> NeighborCatalog {
    NeighborCatalog::from_path(Utf8Path::new("tests/data/hipparcos_sample.csv")).unwrap()
}

pub fn names(rows: &[ResultRow]) -> Vec<&str> {
    rows.iter().map(|r| r.name.as_str()).collect()
}

/// Compare the derived columns of a result row.
pub fn assert_row_close(row: &ResultRow, delta_to_sun: f64, bin: u32, lat_to_dec: f64) {
    assert_eq!(row.bin, bin, "bin of {}", row.name);
    assert_relative_eq!(row.delta_to_sun, delta_to_sun, epsilon = 1e-4);
    assert_relative_eq!(row.lat_to_dec, lat_to_dec, epsilon = 1e-9);
}
