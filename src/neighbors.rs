//! # Crowded-field detection
//!
//! Counts the bright reference stars that share the field of view of a candidate.
//!
//! ## Field geometry
//!
//! The field is approximated by a **square** of side `diameter` centred on the candidate,
//! with exclusive bounds on both axes, rather than by a circle. The right-ascension half-width
//! is not scaled by `cos δ`, so fields get wider on the sky away from the equator, and no
//! wrap-around is applied at RA = 0°/360°.
//!
//! ## The "minus one" convention
//!
//! The counter assumes the candidate itself is one of the matches in the neighbor catalog
//! (a variable star is also a Hipparcos star), so it reports `matches - 1` when at least two
//! stars match and `0` otherwise. When the catalog does **not** contain the candidate, the
//! reported count is one lower than the real number of neighbors.
use crate::catalog::neighbor_catalog::NeighborCatalog;
use crate::constants::{ArcMin, Degree, Magnitude, ARCMIN_PER_DEG};
use crate::selector_errors::SelectorError;

/// Number of neighbors of the position `(ra, dec)` in `catalog`.
///
/// Arguments
/// -----------------
/// * `ra`, `dec` – Field centre in degrees.
/// * `diameter` – Full field-of-view diameter in arc-minutes.
/// * `magnitude_cutoff` – Only stars with `Vmag < magnitude_cutoff` are counted.
/// * `catalog` – Reference stars.
///
/// Return
/// ----------
/// * `matches - 1` if two or more catalog stars fall in the field, `0` otherwise.
pub fn count_neighbors(
    ra: Degree,
    dec: Degree,
    diameter: ArcMin,
    magnitude_cutoff: Magnitude,
    catalog: &NeighborCatalog,
) -> usize {
    let radius = diameter / 2.0 / ARCMIN_PER_DEG;

    let matches = catalog
        .stars()
        .iter()
        .filter(|s| s.ra > ra - radius && s.ra < ra + radius)
        .filter(|s| s.dec > dec - radius && s.dec < dec + radius)
        .filter(|s| s.vmag.is_some_and(|v| v < magnitude_cutoff))
        .count();

    if matches >= 2 {
        matches - 1
    } else {
        0
    }
}

/// Anything able to count the neighbors of a sky position.
///
/// Implemented by [`FieldNeighborCounter`] and by any `Fn(Degree, Degree) -> usize`
/// closure, so callers can plug their own criterion into the ranking.
pub trait NeighborCount {
    fn neighbor_count(&self, ra: Degree, dec: Degree) -> usize;
}

impl<F> NeighborCount for F
where
    F: Fn(Degree, Degree) -> usize,
{
    fn neighbor_count(&self, ra: Degree, dec: Degree) -> usize {
        self(ra, dec)
    }
}

/// A neighbor catalog bound to a field diameter and a magnitude cutoff.
#[derive(Debug, Clone)]
pub struct FieldNeighborCounter<'a> {
    catalog: &'a NeighborCatalog,
    diameter: ArcMin,
    magnitude_cutoff: Magnitude,
}

impl<'a> FieldNeighborCounter<'a> {
    /// Bind `catalog` to an instrument field.
    ///
    /// Return
    /// ----------
    /// * `Err(SelectorError::InvalidParameter)` if `diameter` is not a strictly positive
    ///   finite number.
    pub fn new(
        catalog: &'a NeighborCatalog,
        diameter: ArcMin,
        magnitude_cutoff: Magnitude,
    ) -> Result<Self, SelectorError> {
        if !(diameter.is_finite() && diameter > 0.0) {
            return Err(SelectorError::InvalidParameter(format!(
                "field diameter must be > 0 arcmin, got {diameter}"
            )));
        }
        Ok(FieldNeighborCounter {
            catalog,
            diameter,
            magnitude_cutoff,
        })
    }

    pub fn diameter(&self) -> ArcMin {
        self.diameter
    }

    pub fn magnitude_cutoff(&self) -> Magnitude {
        self.magnitude_cutoff
    }
}

impl NeighborCount for FieldNeighborCounter<'_> {
    fn neighbor_count(&self, ra: Degree, dec: Degree) -> usize {
        count_neighbors(ra, dec, self.diameter, self.magnitude_cutoff, self.catalog)
    }
}

#[cfg(test)]
mod neighbors_test {
    use super::*;
    use crate::catalog::neighbor_catalog::NeighborStar;

    /// Target at (100, 20), 30 arcmin field (radius 0.25°), cutoff 10 mag.
    fn count(stars: Vec<NeighborStar>) -> usize {
        count_neighbors(100.0, 20.0, 30.0, 10.0, &NeighborCatalog::new(stars))
    }

    #[test]
    fn test_target_plus_one_neighbor() {
        let stars = vec![
            NeighborStar::new(100.0, 20.0, 8.0),
            NeighborStar::new(100.1, 19.9, 9.5),
        ];
        assert_eq!(count(stars), 1);
    }

    #[test]
    fn test_target_alone() {
        assert_eq!(count(vec![NeighborStar::new(100.0, 20.0, 8.0)]), 0);
        assert_eq!(count(vec![]), 0);
    }

    #[test]
    fn test_bounds_are_exclusive() {
        let stars = vec![
            NeighborStar::new(100.0, 20.0, 8.0),
            NeighborStar::new(100.25, 20.0, 8.0),
            NeighborStar::new(100.0, 19.75, 8.0),
        ];
        assert_eq!(count(stars), 0);
    }

    #[test]
    fn test_square_field_counts_corners() {
        // (0.2, 0.2) away is outside a 0.25° circle but inside the square
        let stars = vec![
            NeighborStar::new(100.0, 20.0, 8.0),
            NeighborStar::new(100.2, 20.2, 8.0),
            NeighborStar::new(99.8, 19.8, 8.0),
        ];
        assert_eq!(count(stars), 2);
    }

    #[test]
    fn test_magnitude_cutoff_is_strict() {
        let stars = vec![
            NeighborStar::new(100.0, 20.0, 8.0),
            NeighborStar::new(100.1, 20.1, 10.0),
            NeighborStar {
                ra: 100.1,
                dec: 19.9,
                vmag: None,
            },
        ];
        assert_eq!(count(stars), 0);
    }

    #[test]
    fn test_stars_without_position_are_never_counted() {
        let stars = vec![
            NeighborStar::new(100.0, 20.0, 8.0),
            NeighborStar::new(f64::NAN, f64::NAN, 5.0),
            NeighborStar::new(100.1, f64::NAN, 5.0),
            NeighborStar::new(f64::NAN, 20.1, 5.0),
        ];
        assert_eq!(count(stars), 0);

        let catalog = NeighborCatalog::from_reader(
            "HIP,RA,DEC,Vmag\n1,100.0,20.0,8.0\n2,100.1,19.9,9.0\n3,,,4.0\n".as_bytes(),
        )
        .unwrap();
        assert_eq!(count_neighbors(100.0, 20.0, 30.0, 10.0, &catalog), 1);
    }

    #[test]
    fn test_counter_without_the_target_undercounts() {
        // two real neighbors, candidate absent from the catalog
        let stars = vec![
            NeighborStar::new(100.1, 20.0, 8.0),
            NeighborStar::new(99.9, 20.0, 8.0),
        ];
        assert_eq!(count(stars), 1);
    }

    #[test]
    fn test_field_counter_binding() {
        let catalog = NeighborCatalog::new(vec![
            NeighborStar::new(100.0, 20.0, 8.0),
            NeighborStar::new(100.4, 20.0, 8.0),
        ]);
        let narrow = FieldNeighborCounter::new(&catalog, 30.0, 10.0).unwrap();
        let wide = FieldNeighborCounter::new(&catalog, 60.0, 10.0).unwrap();
        assert_eq!(narrow.neighbor_count(100.0, 20.0), 0);
        assert_eq!(wide.neighbor_count(100.0, 20.0), 1);

        assert!(FieldNeighborCounter::new(&catalog, 0.0, 10.0).is_err());
        assert!(FieldNeighborCounter::new(&catalog, f64::NAN, 10.0).is_err());
    }

    #[test]
    fn test_closures_count_neighbors() {
        let always_two = |_: Degree, _: Degree| -> usize { 2 };
        assert_eq!(always_two.neighbor_count(0.0, 0.0), 2);
    }
}
