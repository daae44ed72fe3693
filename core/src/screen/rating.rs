//! Star rating for a completed booking.

use tracing::{debug, info, warn};

use super::Notice;
use crate::error::{NetworkError, ValidationError, WorkflowError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::Rating;
use crate::workflow::BookingWorkflow;

/// Star rating for a booking. A rating of 0 means nothing is selected yet.
#[derive(Debug, Clone)]
pub struct RatingScreen {
    booking_id: i64,
    rating: u8,
    comments: String,
    submitting: bool,
    rated: bool,
    notice: Option<Notice>,
}

impl RatingScreen {
    pub fn new(booking_id: i64) -> Self {
        Self {
            booking_id,
            rating: 0,
            comments: String::new(),
            submitting: false,
            rated: false,
            notice: None,
        }
    }

    pub fn booking_id(&self) -> i64 {
        self.booking_id
    }

    pub fn rating(&self) -> u8 {
        self.rating
    }

    /// Free-text feedback. Kept on the screen only; the backend has no
    /// field for it.
    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_rated(&self) -> bool {
        self.rated
    }

    pub fn can_submit(&self) -> bool {
        self.rating != 0 && !self.submitting && !self.rated
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    pub fn rating_label(&self) -> String {
        if self.rating == 0 {
            "Please select a rating".to_string()
        } else {
            format!("{} out of {} Stars", self.rating, Rating::MAX)
        }
    }

    /// Sets the star count; 0 clears it. Input is frozen while submitting
    /// and after a successful submission.
    pub fn select(&mut self, value: u8) {
        if self.submitting || self.rated {
            return;
        }
        if value > Rating::MAX {
            self.notice = Some(Notice::from_validation(&ValidationError::RatingOutOfRange(value)));
            return;
        }
        self.rating = value;
    }

    pub fn set_comments(&mut self, value: impl Into<String>) {
        if !self.submitting && !self.rated {
            self.comments = value.into();
        }
    }

    /// Returns the rate request and holds the screen in the submitting
    /// state until `complete_submit`. An unset rating raises a prompt and
    /// returns `None`, as does a submission already in flight.
    pub fn begin_submit<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> Option<HttpRequest> {
        if self.submitting || self.rated {
            return None;
        }
        match workflow.prepare_rating(self.booking_id, self.rating) {
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

    /// Finishes a submission. Returns whether the backend accepted it.
    pub fn complete_submit<T: Transport>(
        &mut self,
        workflow: &BookingWorkflow<T>,
        outcome: Result<HttpResponse, NetworkError>,
    ) -> bool {
        if !self.submitting {
            debug!(booking_id = self.booking_id, "no rating submission in flight");
            return false;
        }
        self.submitting = false;

        match outcome.and_then(|response| workflow.client().parse_rate_booking(response)) {
            Ok(_) => {
                info!(booking_id = self.booking_id, rating = self.rating, "rating submitted");
                self.rated = true;
                self.notice = Some(Notice::info(
                    "Thank You!",
                    "Your feedback has been submitted successfully.",
                ));
                true
            }
            Err(e) => {
                warn!(booking_id = self.booking_id, error = %e, "rating submission failed");
                self.notice = Some(failure_notice(&e.into()));
                false
            }
        }
    }

    /// Submits the rating through the workflow's transport.
    pub fn submit<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> bool {
        let Some(request) = self.begin_submit(workflow) else {
            return false;
        };
        let outcome = workflow.execute(&request);
        self.complete_submit(workflow, outcome)
    }
}

fn failure_notice(error: &WorkflowError) -> Notice {
    match error {
        WorkflowError::Validation(_) => Notice::validation("Rating Required", "Please select a star rating."),
        e => Notice::from_error(e, "Error", "Could not submit rating. Please try again."),
    }
}
