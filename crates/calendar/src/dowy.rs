//! Day-of-year to day-of-water-year conversion.

use chrono::{Datelike, NaiveDate};

use crate::error::CalendarError;

/// Day of year of 1 October in a non-leap calendar year.
pub const OCTOBER_FIRST: u16 = 274;

/// Day of year of 1 October in a leap calendar year.
pub const OCTOBER_FIRST_LEAP: u16 = 275;

/// Days from 1 October through 31 December.
const OCT_THROUGH_DEC: u16 = 92;

/// Returns the number of days in a water year: 366 when it contains
/// February 29, otherwise 365.
pub fn water_year_length(leap_year: bool) -> u16 {
    if leap_year { 366 } else { 365 }
}

/// Converts a calendar day of year into the day of the water year.
///
/// `leap_year` refers to the calendar year that `doy` belongs to.
///
/// # Errors
///
/// Returns [`CalendarError::InvalidDoy`] if `doy` is not in `1..=365`
/// (`1..=366` for a leap year).
///
/// # Examples
///
/// ```
/// use canteen_calendar::doy_to_dowy;
///
/// assert_eq!(doy_to_dowy(274, false).unwrap(), 1);   // 1 Oct
/// assert_eq!(doy_to_dowy(275, true).unwrap(), 1);    // 1 Oct, leap year
/// assert_eq!(doy_to_dowy(273, false).unwrap(), 365); // 30 Sep
/// ```
pub fn doy_to_dowy(doy: u16, leap_year: bool) -> Result<u16, CalendarError> {
    let max = water_year_length(leap_year);
    if !(1..=max).contains(&doy) {
        return Err(CalendarError::InvalidDoy { doy, max });
    }
    let october_first = if leap_year {
        OCTOBER_FIRST_LEAP
    } else {
        OCTOBER_FIRST
    };
    if doy < october_first {
        Ok(doy + OCT_THROUGH_DEC)
    } else {
        Ok(doy - (october_first - 1))
    }
}

/// Returns the day of the water year for a calendar date.
///
/// This cannot fail: a `NaiveDate` always carries a valid ordinal.
pub fn dowy(date: NaiveDate) -> u16 {
    let doy = date.ordinal() as u16;
    let leap = date.leap_year();
    let october_first = if leap { OCTOBER_FIRST_LEAP } else { OCTOBER_FIRST };
    if doy < october_first {
        doy + OCT_THROUGH_DEC
    } else {
        doy - (october_first - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn october_first_is_day_one() {
        assert_eq!(doy_to_dowy(274, false).unwrap(), 1);
        assert_eq!(doy_to_dowy(275, true).unwrap(), 1);
    }

    #[test]
    fn january_first_is_day_93() {
        assert_eq!(doy_to_dowy(1, false).unwrap(), 93);
        assert_eq!(doy_to_dowy(1, true).unwrap(), 93);
    }

    #[test]
    fn february_28_is_day_151() {
        assert_eq!(doy_to_dowy(59, false).unwrap(), 92 + 59);
    }

    #[test]
    fn february_29_is_day_152() {
        assert_eq!(doy_to_dowy(60, true).unwrap(), 92 + 60);
    }

    #[test]
    fn september_30_is_last_day() {
        assert_eq!(doy_to_dowy(273, false).unwrap(), 365);
        assert_eq!(doy_to_dowy(274, true).unwrap(), 366);
    }

    #[test]
    fn december_31_is_day_92() {
        assert_eq!(doy_to_dowy(365, false).unwrap(), 92);
        assert_eq!(doy_to_dowy(366, true).unwrap(), 92);
    }

    #[test]
    fn zero_doy_rejected() {
        assert_eq!(
            doy_to_dowy(0, false).unwrap_err(),
            CalendarError::InvalidDoy { doy: 0, max: 365 }
        );
    }

    #[test]
    fn day_366_rejected_outside_leap_year() {
        assert_eq!(
            doy_to_dowy(366, false).unwrap_err(),
            CalendarError::InvalidDoy { doy: 366, max: 365 }
        );
    }

    #[test]
    fn dowy_matches_doy_conversion_for_every_day() {
        for year in [2019, 2020] {
            let mut d = date(year, 1, 1);
            while d.year() == year {
                let expected = doy_to_dowy(d.ordinal() as u16, d.leap_year()).unwrap();
                assert_eq!(dowy(d), expected, "mismatch on {d}");
                d = d.succ_opt().unwrap();
            }
        }
    }

    #[test]
    fn dowy_from_dates() {
        assert_eq!(dowy(date(2021, 10, 1)), 1);
        assert_eq!(dowy(date(2021, 9, 30)), 365);
        assert_eq!(dowy(date(2020, 9, 30)), 366);
        assert_eq!(dowy(date(2020, 3, 1)), 153);
    }

    #[test]
    fn water_year_length_values() {
        assert_eq!(water_year_length(false), 365);
        assert_eq!(water_year_length(true), 366);
    }
}
