//! # canteen-calendar
//!
//! Water-year date arithmetic used by rule curves and simulation display.
//!
//! A water year starts on 1 October: day 1 of the water year is 1 October
//! and the last day (365, or 366 when February 29 falls inside it) is
//! 30 September.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use canteen_calendar::{doy_to_dowy, dowy, format_date, water_year};
//!
//! assert_eq!(doy_to_dowy(274, false).unwrap(), 1); // 1 Oct
//! assert_eq!(doy_to_dowy(1, false).unwrap(), 93); // 1 Jan
//!
//! let date = NaiveDate::from_ymd_opt(2021, 9, 30).unwrap();
//! assert_eq!(dowy(date), 365);
//! assert_eq!(format_date(date), "30 Sep 2021");
//!
//! assert_eq!(water_year(date), 2021);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `dowy` | Day-of-year to day-of-water-year conversion |
//! | `water_year` | Water year computation |
//! | `format` | `DD Mon YYYY` date rendering |
//! | `error` | Error types |

mod dowy;
mod error;
mod format;
mod water_year;

pub use dowy::{OCTOBER_FIRST, OCTOBER_FIRST_LEAP, doy_to_dowy, dowy, water_year_length};
pub use error::CalendarError;
pub use format::format_date;
pub use water_year::{is_leap_water_year, water_year, water_year_start};
