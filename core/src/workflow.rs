//! The booking workflow: four remote operations, each a single round trip.
//!
//! `BookingWorkflow` pairs the stateless `CarwashClient` with a `Transport`.
//! Validation happens here, before any request is built, so a rejected
//! booking or a zero rating never reaches the network.
//!
//! The `prepare_*` methods stop after validation and return the request, so
//! a host that performs its own IO can hold a screen in its in-flight state
//! until the response arrives.

use chrono::{DateTime, DurationRound, TimeDelta, Utc};
use tracing::{debug, info, warn};

use crate::client::CarwashClient;
use crate::error::{NetworkError, ValidationError, WorkflowError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Booking, CreateBooking, Rating, Service, ServiceRef, Vehicle};

/// Unvalidated booking form contents.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDraft {
    pub service_id: i64,
    pub customer_name: String,
    pub plate_number: String,
    pub vehicle_type: String,
    pub appointment: DateTime<Utc>,
}

impl BookingDraft {
    /// Checks required fields and the appointment time, producing the wire
    /// payload. The customer name is required but not transmitted.
    ///
    /// The appointment may not precede the start of the minute containing
    /// `now`, so a form submitted shortly after it was opened with the default
    /// time still passes.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<CreateBooking, ValidationError> {
        let plate = self.plate_number.trim();
        let vehicle_type = self.vehicle_type.trim();
        if self.customer_name.trim().is_empty() {
            return Err(ValidationError::MissingField("customer name"));
        }
        if plate.is_empty() {
            return Err(ValidationError::MissingField("plate number"));
        }
        if vehicle_type.is_empty() {
            return Err(ValidationError::MissingField("vehicle type"));
        }

        let floor = now.duration_trunc(TimeDelta::minutes(1)).unwrap_or(now);
        if self.appointment < floor {
            return Err(ValidationError::AppointmentInPast);
        }

        Ok(CreateBooking {
            service: ServiceRef { id: self.service_id },
            vehicle: Vehicle {
                plate_number: plate.to_string(),
                vehicle_type: vehicle_type.to_string(),
            },
            booking_time: self.appointment,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BookingWorkflow<T> {
    client: CarwashClient,
    transport: T,
}

impl<T: Transport> BookingWorkflow<T> {
    pub fn new(client: CarwashClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &CarwashClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn list_services(&self) -> Result<Vec<Service>, WorkflowError> {
        let request = self.client.build_list_services();
        let services = self.round_trip(request, |c, r| c.parse_list_services(r))?;
        info!(count = services.len(), "loaded services");
        Ok(services)
    }

    pub fn fetch_booking(&self, id: i64) -> Result<Booking, WorkflowError> {
        let request = self.client.build_get_booking(id);
        Ok(self.round_trip(request, |c, r| c.parse_get_booking(r))?)
    }

    /// Validates the draft and builds the create request without sending it.
    pub fn prepare_booking(&self, draft: &BookingDraft, now: DateTime<Utc>) -> Result<HttpRequest, WorkflowError> {
        let payload = draft.validate(now).inspect_err(|e| {
            debug!(error = %e, "booking rejected before submission");
        })?;
        Ok(self.client.build_create_booking(&payload)?)
    }

    pub fn create_booking(&self, draft: &BookingDraft, now: DateTime<Utc>) -> Result<Booking, WorkflowError> {
        let request = self.prepare_booking(draft, now)?;
        let booking = self.round_trip(request, |c, r| c.parse_create_booking(r))?;
        info!(booking_id = booking.id, service_id = draft.service_id, "booking created");
        Ok(booking)
    }

    pub fn confirm_booking(&self, id: i64) -> Result<Booking, WorkflowError> {
        let request = self.client.build_confirm_booking(id);
        let booking = self.round_trip(request, |c, r| c.parse_confirm_booking(r))?;
        info!(booking_id = id, status = ?booking.status, "booking confirmed");
        Ok(booking)
    }

    /// A rating outside `1..=5`, including the unset value 0, is rejected
    /// without building a request.
    pub fn prepare_rating(&self, id: i64, rating: u8) -> Result<HttpRequest, WorkflowError> {
        let rating = Rating::new(rating)?;
        Ok(self.client.build_rate_booking(id, rating))
    }

    pub fn submit_rating(&self, id: i64, rating: u8) -> Result<Option<Booking>, WorkflowError> {
        let request = self.prepare_rating(id, rating)?;
        let acknowledged = self.round_trip(request, |c, r| c.parse_rate_booking(r))?;
        info!(booking_id = id, rating, "rating submitted");
        Ok(acknowledged)
    }

    /// Sends one request through the transport. Status codes are not
    /// interpreted here.
    pub fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, NetworkError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");
        self.transport.execute(request)
    }

    fn round_trip<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&CarwashClient, HttpResponse) -> Result<R, NetworkError>,
    ) -> Result<R, NetworkError> {
        let result = self
            .execute(&request)
            .and_then(|response| parse(&self.client, response));
        if let Err(e) = &result {
            warn!(method = request.method.as_str(), url = %request.url, error = %e, "request failed");
        }
        result
    }
}
