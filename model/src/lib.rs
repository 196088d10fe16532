/*!

This library provides the SimKube custom resource definitions, the scheme of object kinds that
SimKube clients understand, the API client used by `skctl`, and the construction of simulated
`Node` objects from node skeleton templates.

!*/

#![deny(
    clippy::expect_used,
    clippy::get_unwrap,
    clippy::panic,
    clippy::panic_in_result_fn,
    clippy::panicking_unwrap,
    clippy::unwrap_in_result,
    clippy::unwrap_used
)]

pub use error::{Error, ErrorKind, Result};
pub use node::{
    make_node, parse_skeleton_node, EnvIdentity, IdentityProvider, NodeSkeleton, StaticIdentity,
};
pub use scheme::{Scheme, SchemeEntry, Scope};
pub use simulation::{Simulation, SimulationSpec, SimulationState, SimulationStatus};

pub mod constants;
mod error;
mod node;
pub mod scheme;
pub mod sim_manager;
mod simulation;
