//! # Constants and type definitions for the target selector
//!
//! This module centralizes the **model constants**, **unit conversion factors**, and
//! **type aliases** shared by the ranking pipeline.
//!
//! ## Overview
//!
//! - Unit aliases (degrees, hours, arc-minutes, magnitudes)
//! - The linear Sun right-ascension model (equinox anchor, daily rate)
//! - Ranking defaults (result count, bin sentinel)
//! - Canonical column names used by the catalog and result tables

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Angle in hours of right ascension (1 h = 15°)
pub type Hour = f64;
/// Angle in arc-minutes
pub type ArcMin = f64;
/// Visual magnitude (lower is brighter)
pub type Magnitude = f64;

// -------------------------------------------------------------------------------------------------
// Unit conversions
// -------------------------------------------------------------------------------------------------

/// Degrees of right ascension per hour
pub const DEG_PER_HOUR: f64 = 15.0;

/// Arc-minutes per degree
pub const ARCMIN_PER_DEG: f64 = 60.0;

// -------------------------------------------------------------------------------------------------
// Sun model
// -------------------------------------------------------------------------------------------------

/// Month of the fixed reference equinox (Sun RA = 0 on that date)
pub const EQUINOX_MONTH: u8 = 3;

/// Day of the fixed reference equinox
pub const EQUINOX_DAY: u8 = 20;

/// Length of the model year in days (leap years are ignored)
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Apparent motion of the Sun in right ascension, degrees per day
pub const SUN_DEG_PER_DAY: f64 = 360.0 / DAYS_PER_YEAR;

// -------------------------------------------------------------------------------------------------
// Ranking defaults
// -------------------------------------------------------------------------------------------------

/// Bin assigned to rows whose Sun offset cannot be computed
pub const BIN_SENTINEL: u32 = 99;

/// Number of targets returned when the caller does not say otherwise
pub const DEFAULT_MAX_RESULTS: usize = 15;

// -------------------------------------------------------------------------------------------------
// Column names
// -------------------------------------------------------------------------------------------------

pub const NAME_COLUMN: &str = "name";
pub const RA_COLUMN: &str = "RA";
pub const DEC_COLUMN: &str = "DEC";

/// Signed hour offset between the target and the Sun
pub const DELTA_SUN_RA: &str = "delta_sun_RA";
/// Absolute value of [`DELTA_SUN_RA`]
pub const ABS_DELTA_SUN_RA: &str = "abs_delta_sun_RA";
/// Integer bin around the requested Sun offset
pub const ABS_DELTA_SUN_RA_FLOOR: &str = "abs_delta_sun_RA_floor";
/// Absolute declination-to-latitude difference
pub const ABS_DELTA_DEC_LAT: &str = "abs_delta_dec_lat";

/// Output name of [`ABS_DELTA_SUN_RA`]
pub const DELTA_TO_SUN: &str = "Delta_to_Sun";
/// Output name of [`ABS_DELTA_SUN_RA_FLOOR`]
pub const BIN: &str = "Bin";
/// Output name of [`ABS_DELTA_DEC_LAT`]
pub const LAT_TO_DEC: &str = "Lat_to_Dec";
/// Output column appended in neighbor mode
pub const N_NEIGHBOR: &str = "n_neighbor";
