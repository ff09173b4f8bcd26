//! Reservoirs and their outlets.
//!
//! An [`Outlet`] limits how much water can leave the reservoir at a given
//! storage. A [`Reservoir`] holds a validated, de-duplicated set of outlets
//! (highest location first) and optional named [`Map`]s from volume to
//! other variables such as elevation.
//!
//! Configuration problems (negative locations, non-positive capacity) are
//! recorded on the object instead of failing construction. Check
//! [`Reservoir::is_valid`] before simulating.

pub mod error;
mod functions;
mod map;
mod outlet;
mod reservoir;
mod validate;

pub use error::ReservoirError;
pub use functions::{clamp_to, close_on_domain, close_on_range, interpolate_from_data};
pub use map::{Map, VolumeFn};
pub use outlet::{Outlet, ReleaseFn};
pub use reservoir::{Reservoir, ReservoirBuilder};
