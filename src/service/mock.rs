//! # Mock Service & Testing Guide
//!
//! `MockService` implements [`CapacityReservationApi`] entirely in memory. Tests
//! queue the responses the "remote service" should give, in call order, run the
//! engine, then assert on the requests the engine actually issued.
//!
//! ## When to use the mock vs the simulator
//!
//! | Feature | MockService | Simulator |
//! |---------|-------------|-----------|
//! | **Determinism** | Scripted, call by call | Real state machine |
//! | **Error Injection** | Easy (`return_err`) | Only what the simulator models |
//! | **Use Case** | Engine step ordering, error classification | Full lifecycle through the host driver |
//!
//! ```rust
//! use capacity_reservation::service::mock::MockService;
//! use capacity_reservation::service::{
//!     CapacityReservation, CapacityReservationApi, DescribeCapacityReservationsRequest,
//!     DescribeCapacityReservationsResponse, ReservationState, ServiceError,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockService::new();
//!     mock.expect_describe().return_ok(DescribeCapacityReservationsResponse {
//!         capacity_reservations: vec![CapacityReservation {
//!             capacity_reservation_id: "cr-1".into(),
//!             state: Some(ReservationState::Active),
//!             ..Default::default()
//!         }],
//!         next_token: None,
//!     });
//!     mock.expect_describe()
//!         .return_err(ServiceError::api(500, "InternalError", "boom"));
//!
//!     let first = mock
//!         .describe_capacity_reservations(DescribeCapacityReservationsRequest::default())
//!         .await;
//!     assert!(first.is_ok());
//!     let second = mock
//!         .describe_capacity_reservations(DescribeCapacityReservationsRequest::default())
//!         .await;
//!     assert_eq!(second.unwrap_err().status(), Some(500));
//!
//!     mock.verify();
//! }
//! ```
//!
//! A call with no matching expectation at the head of the queue panics, which
//! fails the test at the exact call the engine should not have made.

use super::api::CapacityReservationApi;
use super::error::ServiceError;
use super::types::*;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

enum Expectation {
    Create(Result<CreateCapacityReservationResponse, ServiceError>),
    Describe(Result<DescribeCapacityReservationsResponse, ServiceError>),
    Modify(Result<ModifyCapacityReservationResponse, ServiceError>),
    Cancel(Result<CancelCapacityReservationResponse, ServiceError>),
}

/// A request the engine issued, captured for assertions.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedRequest {
    Create(CreateCapacityReservationRequest),
    Describe(DescribeCapacityReservationsRequest),
    Modify(ModifyCapacityReservationRequest),
    Cancel(CancelCapacityReservationRequest),
}

type Queue = Arc<Mutex<VecDeque<Expectation>>>;

/// Scripted remote service with expectation tracking.
///
/// # Example
/// ```ignore
/// let mock = MockService::new();
/// mock.expect_create().return_ok(response);
/// mock.expect_describe().return_ok(describe);
///
/// let engine = ReconciliationEngine::new(Arc::new(mock.clone()), EngineConfig::default());
/// // drive the engine...
/// mock.verify(); // Ensures every scripted call happened
/// ```
#[derive(Clone, Default)]
pub struct MockService {
    expectations: Queue,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockService {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `create_capacity_reservation` call.
    pub fn expect_create(&self) -> ExpectationBuilder<CreateCapacityReservationResponse> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Create)
    }

    /// Expects a `describe_capacity_reservations` call.
    pub fn expect_describe(&self) -> ExpectationBuilder<DescribeCapacityReservationsResponse> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Describe)
    }

    /// Expects a `modify_capacity_reservation` call.
    pub fn expect_modify(&self) -> ExpectationBuilder<ModifyCapacityReservationResponse> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Modify)
    }

    /// Expects a `cancel_capacity_reservation` call.
    pub fn expect_cancel(&self) -> ExpectationBuilder<CancelCapacityReservationResponse> {
        ExpectationBuilder::new(self.expectations.clone(), Expectation::Cancel)
    }

    /// Every request received so far, in order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let exps = self.expectations.lock().unwrap();
        if !exps.is_empty() {
            panic!("Not all expectations were met. {} remaining", exps.len());
        }
    }

    fn next(&self, request: RecordedRequest) -> Expectation {
        self.requests.lock().unwrap().push(request.clone());
        let mut exps = self.expectations.lock().unwrap();
        match exps.pop_front() {
            Some(expectation) => expectation,
            None => panic!("Unexpected request with no expectation left: {request:?}"),
        }
    }
}

/// Builder returned by the `expect_*` methods.
pub struct ExpectationBuilder<R> {
    expectations: Queue,
    wrap: fn(Result<R, ServiceError>) -> Expectation,
}

impl<R> ExpectationBuilder<R> {
    fn new(expectations: Queue, wrap: fn(Result<R, ServiceError>) -> Expectation) -> Self {
        Self { expectations, wrap }
    }

    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, response: R) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(Ok(response)));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ServiceError) {
        let mut exps = self.expectations.lock().unwrap();
        exps.push_back((self.wrap)(Err(error)));
    }
}

#[async_trait]
impl CapacityReservationApi for MockService {
    async fn create_capacity_reservation(
        &self,
        request: CreateCapacityReservationRequest,
    ) -> Result<CreateCapacityReservationResponse, ServiceError> {
        match self.next(RecordedRequest::Create(request)) {
            Expectation::Create(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: expected create"),
        }
    }

    async fn describe_capacity_reservations(
        &self,
        request: DescribeCapacityReservationsRequest,
    ) -> Result<DescribeCapacityReservationsResponse, ServiceError> {
        match self.next(RecordedRequest::Describe(request)) {
            Expectation::Describe(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: expected describe"),
        }
    }

    async fn modify_capacity_reservation(
        &self,
        request: ModifyCapacityReservationRequest,
    ) -> Result<ModifyCapacityReservationResponse, ServiceError> {
        match self.next(RecordedRequest::Modify(request)) {
            Expectation::Modify(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: expected modify"),
        }
    }

    async fn cancel_capacity_reservation(
        &self,
        request: CancelCapacityReservationRequest,
    ) -> Result<CancelCapacityReservationResponse, ServiceError> {
        match self.next(RecordedRequest::Cancel(request)) {
            Expectation::Cancel(response) => response,
            _ => panic!("Unexpected request or expectation mismatch: expected cancel"),
        }
    }
}
