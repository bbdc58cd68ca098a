//! The remote service, specified only at its interface.
//!
//! - [`CapacityReservationApi`] - the trait every client implements
//! - [`types`] - request/response shapes
//! - [`ServiceError`] - status-coded failures
//!
//! # Testing
//!
//! See [`mock`] for an expectation-driven implementation used by unit and integration tests.

pub mod api;
pub mod error;
pub mod mock;
pub mod types;

pub use api::CapacityReservationApi;
pub use error::{ServiceError, RESERVATION_NOT_FOUND_CODE};
pub use types::*;
