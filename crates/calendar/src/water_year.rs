//! Water year computation.

use chrono::{Datelike, NaiveDate};

/// Month in which a water year begins.
const START_MONTH: u32 = 10;

/// Returns the water year a date belongs to.
///
/// Water years are named by the calendar year in which they end, so
/// 1 October 2000 through 30 September 2001 is water year 2001.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use canteen_calendar::water_year;
///
/// let oct = NaiveDate::from_ymd_opt(2000, 10, 1).unwrap();
/// let sep = NaiveDate::from_ymd_opt(2001, 9, 30).unwrap();
/// assert_eq!(water_year(oct), 2001);
/// assert_eq!(water_year(sep), 2001);
/// ```
pub fn water_year(date: NaiveDate) -> i32 {
    if date.month() >= START_MONTH {
        date.year() + 1
    } else {
        date.year()
    }
}

/// Returns `true` if the water year contains February 29.
pub fn is_leap_water_year(water_year: i32) -> bool {
    NaiveDate::from_ymd_opt(water_year, 2, 29).is_some()
}

/// Returns 1 October of the calendar year before `water_year`, or `None`
/// if that date is outside the representable range.
pub fn water_year_start(water_year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(water_year - 1, START_MONTH, 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dowy::{dowy, water_year_length};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn october_rolls_forward() {
        assert_eq!(water_year(date(2000, 10, 1)), 2001);
        assert_eq!(water_year(date(2000, 12, 31)), 2001);
    }

    #[test]
    fn september_stays() {
        assert_eq!(water_year(date(2001, 9, 30)), 2001);
        assert_eq!(water_year(date(2001, 1, 1)), 2001);
    }

    #[test]
    fn negative_year() {
        assert_eq!(water_year(date(-1, 10, 1)), 0);
    }

    #[test]
    fn leap_water_years() {
        assert!(is_leap_water_year(2020));
        assert!(!is_leap_water_year(2021));
        assert!(!is_leap_water_year(1900));
        assert!(is_leap_water_year(2000));
    }

    #[test]
    fn start_is_day_one() {
        let start = water_year_start(2021).unwrap();
        assert_eq!(start, date(2020, 10, 1));
        assert_eq!(dowy(start), 1);
    }

    #[test]
    fn last_day_matches_length() {
        for wy in [2019, 2020, 2021] {
            let end = water_year_start(wy + 1).unwrap().pred_opt().unwrap();
            assert_eq!(
                dowy(end),
                water_year_length(is_leap_water_year(wy)),
                "water year {wy}"
            );
        }
    }
}
