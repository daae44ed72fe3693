//! Confirmation of a newly created booking.

use tracing::{debug, info, warn};

use super::Notice;
use crate::error::NetworkError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::Booking;
use crate::workflow::BookingWorkflow;

/// Shows a created booking and confirms it once on entry.
#[derive(Debug, Clone)]
pub struct ConfirmationScreen {
    booking: Booking,
    confirming: bool,
    entered: bool,
    notice: Option<Notice>,
}

impl ConfirmationScreen {
    pub fn new(booking: Booking) -> Self {
        Self {
            booking,
            confirming: false,
            entered: false,
            notice: None,
        }
    }

    pub fn booking(&self) -> &Booking {
        &self.booking
    }

    pub fn is_confirming(&self) -> bool {
        self.confirming
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Whether the entry hook has already run.
    pub fn has_entered(&self) -> bool {
        self.entered
    }

    /// Entry hook. The first call returns the confirm request if the
    /// booking's status is absent or `PENDING`; later calls return `None`.
    pub fn begin_on_enter<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> Option<HttpRequest> {
        if self.entered {
            return None;
        }
        self.entered = true;
        if !self.booking.awaiting_confirmation() {
            debug!(booking_id = self.booking.id, status = ?self.booking.status, "skipping auto-confirm");
            return None;
        }
        self.begin_confirm(workflow)
    }

    /// Marks the screen as confirming and returns the confirm request, or
    /// `None` if one is already in flight.
    pub fn begin_confirm<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> Option<HttpRequest> {
        if self.confirming {
            return None;
        }
        self.confirming = true;
        Some(workflow.client().build_confirm_booking(self.booking.id))
    }

    /// Finishes a confirmation. On failure the booking keeps its previous
    /// status and a notice is raised.
    pub fn complete_confirm<T: Transport>(
        &mut self,
        workflow: &BookingWorkflow<T>,
        outcome: Result<HttpResponse, NetworkError>,
    ) -> bool {
        if !self.confirming {
            debug!(booking_id = self.booking.id, "no confirmation in flight");
            return false;
        }
        self.confirming = false;

        match outcome.and_then(|response| workflow.client().parse_confirm_booking(response)) {
            Ok(booking) => {
                info!(booking_id = booking.id, status = ?booking.status, "booking confirmed");
                self.booking = booking;
                true
            }
            Err(e) => {
                warn!(booking_id = self.booking.id, error = %e, "confirmation failed");
                self.notice = Some(Notice::from_error(
                    &e.into(),
                    "Error",
                    "Unable to confirm booking. Please try again.",
                ));
                false
            }
        }
    }

    /// Runs the entry hook through the workflow's transport. Returns whether
    /// a confirm request was issued.
    pub fn on_enter<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> bool {
        match self.begin_on_enter(workflow) {
            Some(request) => {
                let outcome = workflow.execute(&request);
                self.complete_confirm(workflow, outcome);
                true
            }
            None => false,
        }
    }

    /// Confirms the booking through the workflow's transport.
    pub fn confirm<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> bool {
        let Some(request) = self.begin_confirm(workflow) else {
            return false;
        };
        let outcome = workflow.execute(&request);
        self.complete_confirm(workflow, outcome)
    }
}
