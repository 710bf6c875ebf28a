//! # Observation dates
//!
//! Calendar handling for the ranking pipeline. An [`ObservationDate`] is parsed from a strict
//! `YYYY-MM-DD` string (month and day may use one or two digits), validated as a real Gregorian
//! date through `hifitime`, and paired with the reference equinox of the same year.
//!
//! The reference equinox is a fixed calendar date (March 20), not a computed astronomical
//! equinox. Day offsets are counted on UTC MJD day numbers, so they are exact whole days.
use std::fmt;
use std::str::FromStr;

use hifitime::Epoch;
use nom::{
    bytes::complete::take_while_m_n,
    character::complete::{char, multispace0},
    combinator::{all_consuming, map_res},
    sequence::{delimited, preceded},
    IResult, Parser,
};

use crate::constants::{EQUINOX_DAY, EQUINOX_MONTH};
use crate::selector_errors::SelectorError;

/// A validated calendar date at which targets are ranked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObservationDate {
    year: i32,
    month: u8,
    day: u8,
    epoch: Epoch,
    equinox: Epoch,
}

fn year_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(4, 4, |c: char| c.is_ascii_digit()).parse(input)
}

fn short_digits(input: &str) -> IResult<&str, &str> {
    take_while_m_n(1, 2, |c: char| c.is_ascii_digit()).parse(input)
}

fn parse_iso_date(input: &str) -> IResult<&str, (i32, u8, u8)> {
    all_consuming(delimited(
        multispace0,
        (
            map_res(year_digits, |s: &str| s.parse::<i32>()),
            preceded(char('-'), map_res(short_digits, |s: &str| s.parse::<u8>())),
            preceded(char('-'), map_res(short_digits, |s: &str| s.parse::<u8>())),
        ),
        multispace0,
    ))
    .parse(input)
}

fn midnight_utc(year: i32, month: u8, day: u8) -> Result<Epoch, SelectorError> {
    Epoch::maybe_from_gregorian_utc(year, month, day, 0, 0, 0, 0).map_err(|e| {
        SelectorError::InvalidDateFormat(format!("{year:04}-{month:02}-{day:02} ({e})"))
    })
}

impl ObservationDate {
    /// Build a date from its calendar components.
    ///
    /// Return
    /// ----------
    /// * `Err(SelectorError::InvalidDateFormat)` if the components do not form a Gregorian date
    ///   (e.g. `2023-02-29`).
    pub fn from_ymd(year: i32, month: u8, day: u8) -> Result<Self, SelectorError> {
        let epoch = midnight_utc(year, month, day)?;
        let equinox = midnight_utc(year, EQUINOX_MONTH, EQUINOX_DAY)?;
        Ok(ObservationDate {
            year,
            month,
            day,
            epoch,
            equinox,
        })
    }

    /// The current UTC calendar date.
    pub fn today() -> Result<Self, SelectorError> {
        let now = Epoch::now()
            .map_err(|e| SelectorError::InvalidDateFormat(format!("system clock: {e}")))?;
        let (year, month, day, _, _, _, _) = now.to_gregorian_utc();
        Self::from_ymd(year, month, day)
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    /// Midnight UTC of this date.
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Signed number of whole days since March 20 of the same year.
    ///
    /// Dates before the equinox give a negative offset.
    pub fn day_offset_from_equinox(&self) -> i64 {
        (self.epoch.to_mjd_utc_days() - self.equinox.to_mjd_utc_days()).round() as i64
    }
}

impl FromStr for ObservationDate {
    type Err = SelectorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (_, (year, month, day)) =
            parse_iso_date(s).map_err(|_| SelectorError::InvalidDateFormat(s.to_string()))?;
        Self::from_ymd(year, month, day)
    }
}

impl fmt::Display for ObservationDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.day)
    }
}
