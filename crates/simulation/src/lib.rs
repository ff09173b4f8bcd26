//! # canteen-simulation
//!
//! Runs an operations policy over a time series of reservoir inputs.
//!
//! [`Simulation::simulate`] realises each step in order: values staged by
//! the previous step are merged in, scheduled outputs run around a single
//! call to the operations policy, and `inflows + storage - outflows` becomes
//! the next step's storage. Post-operations output values are staged with it
//! rather than added to the step that computed them. The input series is never modified; the result is a new
//! series holding every computed value.
//!
//! [`Stepper`] exposes the same loop one step at a time, which is what
//! [`Optimization`] uses to inject a decision per step.
//!
//! ## Quick Start
//!
//! ```
//! use canteen_data::{Input, Inputs, StepDate, TimeSeries, TimeStep};
//! use canteen_operations::Passive;
//! use canteen_reservoir::Reservoir;
//! use canteen_simulation::Simulation;
//!
//! let steps = (0..3)
//!     .map(|t| {
//!         let mut inputs = Inputs::new();
//!         inputs.insert("inflow".to_string(), Input::inflow(1.0));
//!         if t == 0 {
//!             inputs.insert("storage".to_string(), Input::storage(0.0));
//!         }
//!         TimeStep::new(StepDate::Index(t), inputs)
//!     })
//!     .collect::<Result<Vec<_>, _>>()
//!     .unwrap();
//! let series = TimeSeries::new(steps).unwrap();
//!
//! let sim = Simulation::new(Reservoir::default(), Passive);
//! let out = sim.simulate(&series).unwrap();
//! assert_eq!(out.storages(), vec![0.0, 1.0, 1.0]);
//! ```

mod engine;
pub mod error;
mod optimization;

pub use engine::{Simulation, StepPhase, Stepper};
pub use error::SimulationError;
pub use optimization::{Decision, DecisionPolicy, Evaluation, Indicator, Optimization, Threshold};
