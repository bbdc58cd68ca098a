//! # Capacity Reservation Simulator
//!
//! An in-process stand-in for the remote service, built as an actor.
//!
//! [`ReservationActor`] owns every reservation in a `HashMap` and processes one
//! request at a time from an `mpsc` channel, so its store needs no locking.
//! [`SimulatorClient`] is the other half of the channel and implements
//! [`CapacityReservationApi`](crate::service::CapacityReservationApi), which
//! lets the engine run against it exactly as it would against the real service.
//!
//! ```text
//! ReconciliationEngine ──► SimulatorClient ──mpsc──► ReservationActor
//!                                 ▲                        │
//!                                 └──────── oneshot ───────┘
//! ```
//!
//! Behaviour worth knowing when writing tests against it:
//!
//! - New reservations start `pending` and turn `active` after
//!   [`SimulatorSettings::activate_after_describes`] describes of that reservation.
//! - Cancelled reservations stay in the store with state `cancelled`.
//! - Limited reservations whose end date has passed are reported `expired`.
//! - Unknown identifiers fail with status 400, code `InvalidCapacityReservationId.NotFound`.

mod actor;
mod client;
mod message;

pub use actor::ReservationActor;
pub use client::SimulatorClient;
pub use message::{Response, SimulatorRequest};

/// Tunables for [`ReservationActor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulatorSettings {
    /// Channel capacity between client and actor.
    pub buffer_size: usize,
    /// Describes of a pending reservation before it becomes active. Zero creates it active.
    pub activate_after_describes: u32,
    /// Page size used by an unfiltered describe when the caller gives no `max_results`.
    pub page_size: usize,
}

impl Default for SimulatorSettings {
    fn default() -> Self {
        Self {
            buffer_size: 32,
            activate_after_describes: 2,
            page_size: 50,
        }
    }
}
