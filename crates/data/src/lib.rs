//! Time step and time series data model for reservoir simulation.
//!
//! A [`TimeStep`] holds named, categorised [`Input`]s plus deferred
//! [`Output`] computations sorted by [`RunOrder`] then [`Category`]. A
//! [`TimeSeries`] is an ordered list of steps sharing the storage key taken
//! from its first step.
//!
//! Steps are values: adding inputs or outputs returns a new step, so earlier
//! states stay available for audit and for look-back by later computations.
//!
//! # Quick start
//!
//! ```
//! use canteen_data::{Input, Inputs, StepDate, TimeSeries, TimeStep};
//!
//! let mut first = Inputs::new();
//! first.insert("inflow".to_string(), Input::inflow(1.0));
//! first.insert("storage".to_string(), Input::storage(0.0));
//! let mut later = Inputs::new();
//! later.insert("inflow".to_string(), Input::inflow(1.0));
//!
//! let series = TimeSeries::new(vec![
//!     TimeStep::new(StepDate::Index(0), first).unwrap(),
//!     TimeStep::new(StepDate::Index(1), later).unwrap(),
//! ])
//! .unwrap();
//! assert_eq!(series.storage_key(), "storage");
//! ```

pub mod category;
pub mod error;
pub mod input;
pub mod output;
pub mod table;
pub mod timeseries;
pub mod timestep;
pub mod value;

pub use category::{Category, RunOrder};
pub use error::DataError;
pub use input::Input;
pub use output::{Output, Values};
pub use table::{Columns, categorize};
pub use timeseries::TimeSeries;
pub use timestep::{Inputs, Outputs, StepDate, TimeStep};
pub use value::{Value, round};
