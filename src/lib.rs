pub mod catalog;
pub mod constants;
pub mod display;
pub mod filters;
pub mod neighbors;
pub mod ranking;
pub mod selector_errors;
pub mod solar;
pub mod target_kind;
pub mod time;

pub use catalog::neighbor_catalog::NeighborCatalog;
pub use catalog::{CatalogSchema, CatalogTable};
pub use ranking::{rank_targets, SelectionParams, SelectionResult};
pub use selector_errors::SelectorError;
