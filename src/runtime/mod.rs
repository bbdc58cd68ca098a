//! Runtime pieces for running the engine locally.
//!
//! - [`HostDriver`] - the host contract: invoke, persist the continuation, wait, re-invoke
//! - [`LocalSystem`] - spawns the simulator and wires an engine and a host onto it
//! - [`setup_tracing`] - subscriber initialization

pub mod host;
pub mod system;
pub mod tracing;

pub use host::HostDriver;
pub use system::LocalSystem;
pub use self::tracing::setup_tracing;
