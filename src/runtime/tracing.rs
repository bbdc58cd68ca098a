//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `fmt` subscriber filtered by `RUST_LOG`.
//!
//! Every engine operation runs inside a span named after its handler method, with
//! the operation and reservation identifier as fields, so a stabilization loop
//! reads as one line per check:
//!
//! ```text
//! INFO create{operation="Create" attempt=0}: Created reservation_id=cr-00000000000000001 state=pending
//! INFO create{operation="Create" attempt=1}: Create has stabilized reservation_id=cr-00000000000000001 attempts=2
//! INFO create{operation="Create" attempt=1}:read{operation="Read" reservation_id=cr-00000000000000001}: Read state=active
//! ```
//!
//! ```bash
//! RUST_LOG=info cargo run
//! # Request payloads and per-describe state
//! RUST_LOG=capacity_reservation=debug cargo run
//! ```

/// Initializes the global subscriber. Call once, at startup.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
