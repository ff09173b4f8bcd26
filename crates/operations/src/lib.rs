//! Reservoir operating policies.
//!
//! An [`OperationsPolicy`] turns one time step (storage, inflows and any
//! auxiliary inputs) plus the reservoir's outlets into a release per
//! outlet. Three policies are provided:
//!
//! | Policy | Target release |
//! |--------|----------------|
//! | [`Passive`] | none, every outlet spills its maximum |
//! | [`StandardOperatingProcedure`] | demand, plus anything above capacity |
//! | [`RuleCurveOperations`] | surplus above the [`RuleCurve`] target |
//!
//! All of them split the target across outlets with [`allocate`], lowest
//! location first. Closures with the `operate` signature are policies too.

mod allocate;
pub mod error;
mod interpolate;
mod passive;
mod policy;
mod rule_curve;
mod rule_curve_ops;
mod sop;

pub use allocate::allocate;
pub use error::OperationsError;
pub use interpolate::{Interpolator, Linear, Step};
pub use passive::Passive;
pub use policy::{OperateContext, OperationsPolicy, Releases};
pub use rule_curve::RuleCurve;
pub use rule_curve_ops::RuleCurveOperations;
pub use sop::StandardOperatingProcedure;
