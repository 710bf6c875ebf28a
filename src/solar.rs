//! # Approximate Sun right ascension
//!
//! The Sun is modelled as moving uniformly in right ascension: 0° at the fixed reference
//! equinox (March 20) and a full 360° turn every 365 days. Leap years and orbital
//! eccentricity are ignored, so the value can drift by a few degrees from a real ephemeris.
//! Rankings depend on this exact model; changing it changes which targets are suggested.
use crate::constants::{Degree, Hour, DEG_PER_HOUR, SUN_DEG_PER_DAY};
use crate::time::ObservationDate;

/// Right ascension of the Sun for a signed day offset from the reference equinox.
///
/// The result is not wrapped into `[0, 360)`: dates before March 20 give negative values and
/// late December dates exceed 280°.
pub fn sun_ra_from_day_offset(day_offset: i64) -> Degree {
    day_offset as f64 * SUN_DEG_PER_DAY
}

/// Right ascension of the Sun at the given observation date.
pub fn approx_sun_ra(date: &ObservationDate) -> Degree {
    sun_ra_from_day_offset(date.day_offset_from_equinox())
}

/// Signed offset, in hours, between a target right ascension and the Sun.
pub fn hours_from_sun(ra: Degree, sun_ra: Degree) -> Hour {
    (ra - sun_ra) / DEG_PER_HOUR
}
