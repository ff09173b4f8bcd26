//! `DD Mon YYYY` date rendering.

use chrono::NaiveDate;

/// Formats a date as `DD Mon YYYY`, e.g. `28 Aug 2021`.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d %b %Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_day() {
        let d = NaiveDate::from_ymd_opt(2021, 9, 1).unwrap();
        assert_eq!(format_date(d), "01 Sep 2021");
    }

    #[test]
    fn month_abbreviation() {
        let d = NaiveDate::from_ymd_opt(2021, 8, 28).unwrap();
        assert_eq!(format_date(d), "28 Aug 2021");
    }
}
