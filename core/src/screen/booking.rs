//! Booking form for the selected service.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::Notice;
use crate::error::{NetworkError, ValidationError, WorkflowError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Booking, Service};
use crate::workflow::{BookingDraft, BookingWorkflow};

/// Booking form for one selected service.
#[derive(Debug, Clone)]
pub struct BookingScreen {
    service: Service,
    customer_name: String,
    plate_number: String,
    vehicle_type: String,
    appointment: DateTime<Utc>,
    submitting: bool,
    notice: Option<Notice>,
}

impl BookingScreen {
    /// The appointment defaults to the moment the form was opened.
    pub fn new(service: Service, opened_at: DateTime<Utc>) -> Self {
        Self {
            service,
            customer_name: String::new(),
            plate_number: String::new(),
            vehicle_type: String::new(),
            appointment: opened_at,
            submitting: false,
            notice: None,
        }
    }

    pub fn service(&self) -> &Service {
        &self.service
    }

    pub fn customer_name(&self) -> &str {
        &self.customer_name
    }

    pub fn plate_number(&self) -> &str {
        &self.plate_number
    }

    pub fn vehicle_type(&self) -> &str {
        &self.vehicle_type
    }

    pub fn appointment(&self) -> DateTime<Utc> {
        self.appointment
    }

    pub fn set_customer_name(&mut self, value: impl Into<String>) {
        self.customer_name = value.into();
    }

    pub fn set_plate_number(&mut self, value: impl Into<String>) {
        self.plate_number = value.into();
    }

    pub fn set_vehicle_type(&mut self, value: impl Into<String>) {
        self.vehicle_type = value.into();
    }

    pub fn set_appointment(&mut self, value: DateTime<Utc>) {
        self.appointment = value;
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.submitting {
            "Processing..."
        } else {
            "Confirm Booking"
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn draft(&self) -> BookingDraft {
        BookingDraft {
            service_id: self.service.id,
            customer_name: self.customer_name.clone(),
            plate_number: self.plate_number.clone(),
            vehicle_type: self.vehicle_type.clone(),
            appointment: self.appointment,
        }
    }

    /// Validates the form and returns the create request. The form stays in
    /// the submitting state until `complete_submit` is called. Returns `None`
    /// while a submission is in flight or when validation fails, in which
    /// case a notice is raised instead.
    pub fn begin_submit<T: Transport>(
        &mut self,
        workflow: &BookingWorkflow<T>,
        now: DateTime<Utc>,
    ) -> Option<HttpRequest> {
        if self.submitting {
            debug!(service_id = self.service.id, "booking submission already in flight");
            return None;
        }
        match workflow.prepare_booking(&self.draft(), now) {
            Ok(request) => {
                self.submitting = true;
                Some(request)
            }
            Err(e) => {
                self.notice = Some(failure_notice(&e));
                None
            }
        }
    }

    /// Finishes a submission started by `begin_submit`. Returns the created
    /// booking on success; any failure leaves the form as it was and raises
    /// a notice.
    pub fn complete_submit<T: Transport>(
        &mut self,
        workflow: &BookingWorkflow<T>,
        outcome: Result<HttpResponse, NetworkError>,
    ) -> Option<Booking> {
        if !self.submitting {
            debug!("no booking submission in flight");
            return None;
        }
        self.submitting = false;

        match outcome.and_then(|response| workflow.client().parse_create_booking(response)) {
            Ok(booking) => {
                info!(booking_id = booking.id, service_id = self.service.id, "booking created");
                Some(booking)
            }
            Err(e) => {
                warn!(error = %e, "booking submission failed");
                self.notice = Some(failure_notice(&e.into()));
                None
            }
        }
    }

    /// Submits the form through the workflow's transport.
    pub fn submit<T: Transport>(&mut self, workflow: &BookingWorkflow<T>, now: DateTime<Utc>) -> Option<Booking> {
        let request = self.begin_submit(workflow, now)?;
        let outcome = workflow.execute(&request);
        self.complete_submit(workflow, outcome)
    }
}

fn failure_notice(error: &WorkflowError) -> Notice {
    match error {
        WorkflowError::Validation(ValidationError::MissingField(_)) => Notice::validation(
            "Missing Information",
            "Please fill in all required fields.",
        ),
        e => Notice::from_error(e, "Booking Failed", "Unable to create booking. Please try again."),
    }
}
