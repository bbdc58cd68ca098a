//! # Capacity Reservation Provider
//!
//! > **A resource provider for `AWS::EC2::CapacityReservation`.**
//!
//! A host (an orchestration engine) asks this crate to Create, Read, Update,
//! Delete or List a capacity reservation. The crate translates that request into
//! calls against the remote capacity reservation API, waits for the reservation
//! to settle when it has to, and answers with a [`ProgressEvent`](model::ProgressEvent).
//!
//! ## 🏗️ How an invocation flows
//!
//! ```text
//! host ──HandlerRequest──► ReconciliationEngine ──typed requests──► CapacityReservationApi
//!  ▲                               │
//!  └──────ProgressEvent────────────┘   (IN_PROGRESS + CallbackContext while waiting)
//! ```
//!
//! Creation is the only operation that can take more than one invocation. The
//! engine creates the reservation once, records its identifier in the
//! [`CallbackContext`](model::CallbackContext), and answers IN_PROGRESS until
//! the reservation is `active`. The host sleeps and re-invokes with that context.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`], [`service`])
//! - [`model`]: what the host sees. Resource model, request, continuation, progress event.
//! - [`service`]: what the remote API sees. The [`CapacityReservationApi`](service::CapacityReservationApi)
//!   trait, its request/response types, [`ServiceError`](service::ServiceError), and
//!   [`MockService`](service::mock::MockService) for tests.
//!
//! ### 2. The Rules ([`translator`], [`stabilize`], [`error`])
//! - [`translator`]: pure mappings between the two worlds, including tag merging and end-date parsing.
//! - [`stabilize`]: when a mutation counts as done.
//! - [`error`]: [`HandlerError`](error::HandlerError) and the single place failures get an error code.
//!
//! ### 3. The Engine ([`engine`], [`config`])
//! - [`ReconciliationEngine`](engine::ReconciliationEngine): one method per operation.
//! - [`EngineConfig`](config::EngineConfig): callback delay and stabilization limit.
//!
//! ### 4. Running it locally ([`simulator`], [`runtime`])
//! - [`simulator`]: an actor that behaves like the remote service.
//! - [`runtime`]: [`HostDriver`](runtime::HostDriver), [`LocalSystem`](runtime::LocalSystem), tracing setup.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Full lifecycle against the simulator, one JSON event per step
//! RUST_LOG=info cargo run
//!
//! cargo test
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod model;
pub mod runtime;
pub mod service;
pub mod simulator;
pub mod stabilize;
pub mod translator;
