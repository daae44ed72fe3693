//! Forward-only screen flow for one booking session.
//!
//! # Design
//! `FlowController` owns a navigation stack of `Screen` values. Payloads
//! (the selected `Service`, the created `Booking`, the booking id) move
//! between screens inside those values; nothing is shared. The path is
//! fixed:
//!
//! ```text
//! ServiceList -> Booking -> Confirmation -> Rating -> (reset) ServiceList
//!                              \-> "back to services" (reset)
//! ```
//!
//! Entering Confirmation replaces the stack, and Rating is pushed on top of
//! it with back disabled, so neither can be left except forward or by
//! reset. Entry hooks run exactly once per screen value: ServiceList loads
//! its services and Confirmation auto-confirms a pending booking.
//!
//! Operations that do not apply to the current screen are ignored and
//! return `Step::Stayed`.
//!
//! Each network operation also comes as a `begin_*`/`complete_*` pair for
//! hosts that perform their own IO. `begin_*` returns the `HttpRequest` and
//! leaves the screen busy, so `session_state` reports `Submitting` or
//! `Confirming` until the host hands the outcome to `complete_*`. The plain
//! methods run both halves through the workflow's transport.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::NetworkError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::screen::{
    BookingScreen, ConfirmationScreen, Notice, RatingScreen, Screen, ScreenKind, ServiceListScreen,
};
use crate::types::BookingStatus;
use crate::workflow::BookingWorkflow;

/// Source of the current time for appointment validation.
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Client-observed state of the booking session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Browsing,
    ServiceSelected,
    Submitting,
    Created,
    Confirming,
    Confirmed,
    Rating,
    Rated,
}

/// Result of a flow operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The current screen did not change. It may carry a new notice.
    Stayed,
    /// The flow moved; the payload is the new current screen.
    Navigated(ScreenKind),
}

pub struct FlowController<T, C = SystemClock> {
    workflow: BookingWorkflow<T>,
    clock: C,
    current: Screen,
    history: Vec<Screen>,
}

impl<T: Transport, C: Clock> FlowController<T, C> {
    /// Opens the service list and loads it.
    pub fn start(workflow: BookingWorkflow<T>, clock: C) -> Self {
        let mut flow = Self {
            workflow,
            clock,
            current: Screen::ServiceList(ServiceListScreen::new()),
            history: Vec::new(),
        };
        flow.enter_current();
        flow
    }

    pub fn workflow(&self) -> &BookingWorkflow<T> {
        &self.workflow
    }

    pub fn current(&self) -> &Screen {
        &self.current
    }

    fn current_mut(&mut self) -> &mut Screen {
        &mut self.current
    }

    pub fn current_kind(&self) -> ScreenKind {
        self.current().kind()
    }

    /// Number of screens on the navigation stack, including the current one.
    pub fn depth(&self) -> usize {
        self.history.len() + 1
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.current().notice()
    }

    pub fn service_list(&self) -> Option<&ServiceListScreen> {
        match self.current() {
            Screen::ServiceList(s) => Some(s),
            _ => None,
        }
    }

    pub fn booking(&self) -> Option<&BookingScreen> {
        match self.current() {
            Screen::Booking(s) => Some(s),
            _ => None,
        }
    }

    /// Mutable access for editing the booking form fields.
    pub fn booking_form(&mut self) -> Option<&mut BookingScreen> {
        match self.current_mut() {
            Screen::Booking(s) => Some(s),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Option<&ConfirmationScreen> {
        match self.current() {
            Screen::Confirmation(s) => Some(s),
            _ => None,
        }
    }

    pub fn rating(&self) -> Option<&RatingScreen> {
        match self.current() {
            Screen::Rating(s) => Some(s),
            _ => None,
        }
    }

    pub fn session_state(&self) -> SessionState {
        match self.current() {
            Screen::ServiceList(s) if s.selected().is_some() => SessionState::ServiceSelected,
            Screen::ServiceList(_) => SessionState::Browsing,
            Screen::Booking(s) if s.is_submitting() => SessionState::Submitting,
            Screen::Booking(_) => SessionState::ServiceSelected,
            Screen::Confirmation(s) if s.is_confirming() => SessionState::Confirming,
            Screen::Confirmation(s) if s.booking().status == Some(BookingStatus::Confirmed) => {
                SessionState::Confirmed
            }
            Screen::Confirmation(_) => SessionState::Created,
            Screen::Rating(s) if s.is_rated() => SessionState::Rated,
            Screen::Rating(_) => SessionState::Rating,
        }
    }

    // --- service list ---

    pub fn toggle_service(&mut self, id: i64) -> Step {
        if let Screen::ServiceList(screen) = self.current_mut() {
            screen.toggle(id);
        }
        Step::Stayed
    }

    pub fn refresh_services(&mut self) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::ServiceList(screen) = current {
            screen.refresh(workflow);
        }
        Step::Stayed
    }

    pub fn begin_refresh_services(&mut self) -> Option<HttpRequest> {
        let Self { workflow, current, .. } = &mut *self;
        let Screen::ServiceList(screen) = current else {
            self.ignored("begin_refresh_services");
            return None;
        };
        screen.begin_refresh(workflow)
    }

    /// Completes a refresh or retry started with `begin_refresh_services` or
    /// `begin_retry_services`.
    pub fn complete_load_services(&mut self, outcome: Result<HttpResponse, NetworkError>) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::ServiceList(screen) = current {
            screen.complete_load(workflow, outcome);
        }
        Step::Stayed
    }

    pub fn retry_services(&mut self) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::ServiceList(screen) = current {
            screen.retry(workflow);
        }
        Step::Stayed
    }

    pub fn begin_retry_services(&mut self) -> Option<HttpRequest> {
        let Self { workflow, current, .. } = &mut *self;
        let Screen::ServiceList(screen) = current else {
            self.ignored("begin_retry_services");
            return None;
        };
        screen.begin_retry(workflow)
    }

    /// Opens the booking form for the selected service.
    pub fn proceed(&mut self) -> Step {
        let opened_at = self.clock.now();
        let Screen::ServiceList(screen) = &mut self.current else {
            return self.ignored("proceed");
        };
        match screen.proceed() {
            Some(service) => {
                debug!(service_id = service.id, "opening booking form");
                self.push(Screen::Booking(BookingScreen::new(service, opened_at)))
            }
            None => Step::Stayed,
        }
    }

    // --- booking ---

    /// Submits the booking form. On success the stack is replaced by the
    /// confirmation screen, which then auto-confirms.
    pub fn submit_booking(&mut self) -> Step {
        let Some(request) = self.begin_submit_booking() else {
            return Step::Stayed;
        };
        let outcome = self.workflow.execute(&request);
        let step = self.complete_submit_booking(outcome);
        if step != Step::Stayed {
            self.enter_current();
        }
        step
    }

    /// Validates the form and returns the create request, leaving the flow
    /// in `SessionState::Submitting`.
    pub fn begin_submit_booking(&mut self) -> Option<HttpRequest> {
        let now = self.clock.now();
        let Self { workflow, current, .. } = &mut *self;
        let Screen::Booking(screen) = current else {
            self.ignored("begin_submit_booking");
            return None;
        };
        screen.begin_submit(workflow, now)
    }

    /// Applies the create response. On success the stack is replaced by the
    /// confirmation screen; its auto-confirm is started with `begin_confirm`.
    pub fn complete_submit_booking(&mut self, outcome: Result<HttpResponse, NetworkError>) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        let Screen::Booking(screen) = current else {
            return self.ignored("complete_submit_booking");
        };
        match screen.complete_submit(workflow, outcome) {
            Some(booking) => {
                info!(booking_id = booking.id, "entering confirmation");
                self.replace(Screen::Confirmation(ConfirmationScreen::new(booking)))
            }
            None => Step::Stayed,
        }
    }

    // --- confirmation ---

    pub fn retry_confirm(&mut self) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::Confirmation(screen) = current {
            screen.confirm(workflow);
        }
        Step::Stayed
    }

    /// Returns the confirm request, leaving the flow in
    /// `SessionState::Confirming`. The first call after entering the screen
    /// is the auto-confirm and yields nothing for a booking that no longer
    /// awaits confirmation; later calls are retries.
    pub fn begin_confirm(&mut self) -> Option<HttpRequest> {
        let Self { workflow, current, .. } = &mut *self;
        let Screen::Confirmation(screen) = current else {
            self.ignored("begin_confirm");
            return None;
        };
        if screen.has_entered() {
            screen.begin_confirm(workflow)
        } else {
            screen.begin_on_enter(workflow)
        }
    }

    pub fn complete_confirm(&mut self, outcome: Result<HttpResponse, NetworkError>) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::Confirmation(screen) = current {
            screen.complete_confirm(workflow, outcome);
        }
        Step::Stayed
    }

    pub fn finish_and_rate(&mut self) -> Step {
        let Screen::Confirmation(screen) = &self.current else {
            return self.ignored("finish_and_rate");
        };
        let booking_id = screen.booking().id;
        self.push(Screen::Rating(RatingScreen::new(booking_id)))
    }

    pub fn back_to_services(&mut self) -> Step {
        if self.current_kind() != ScreenKind::Confirmation {
            return self.ignored("back_to_services");
        }
        self.reset_to_services()
    }

    // --- rating ---

    pub fn select_rating(&mut self, value: u8) -> Step {
        if let Screen::Rating(screen) = self.current_mut() {
            screen.select(value);
        }
        Step::Stayed
    }

    pub fn set_comments(&mut self, value: impl Into<String>) -> Step {
        if let Screen::Rating(screen) = self.current_mut() {
            screen.set_comments(value);
        }
        Step::Stayed
    }

    /// Submits the rating. Success raises a thank-you notice; the flow
    /// resets when that notice is dismissed.
    pub fn submit_rating(&mut self) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::Rating(screen) = current {
            screen.submit(workflow);
        }
        Step::Stayed
    }

    pub fn begin_submit_rating(&mut self) -> Option<HttpRequest> {
        let Self { workflow, current, .. } = &mut *self;
        let Screen::Rating(screen) = current else {
            self.ignored("begin_submit_rating");
            return None;
        };
        screen.begin_submit(workflow)
    }

    pub fn complete_submit_rating(&mut self, outcome: Result<HttpResponse, NetworkError>) -> Step {
        let Self { workflow, current, .. } = &mut *self;
        if let Screen::Rating(screen) = current {
            screen.complete_submit(workflow, outcome);
        }
        Step::Stayed
    }

    // --- common ---

    /// Pops back from the booking form to the service list, which keeps
    /// its selection and is not reloaded. Disabled everywhere else.
    pub fn back(&mut self) -> Step {
        if !self.current_kind().allows_back() {
            return self.ignored("back");
        }
        match self.history.pop() {
            Some(previous) => {
                self.current = previous;
                Step::Navigated(self.current_kind())
            }
            None => self.ignored("back"),
        }
    }

    pub fn dismiss_notice(&mut self) -> Step {
        let dismissed = self.current_mut().dismiss_notice();
        let rated = matches!(self.current(), Screen::Rating(s) if s.is_rated());
        if dismissed.is_some() && rated {
            return self.reset_to_services();
        }
        Step::Stayed
    }

    fn push(&mut self, screen: Screen) -> Step {
        let previous = std::mem::replace(&mut self.current, screen);
        self.history.push(previous);
        Step::Navigated(self.current_kind())
    }

    fn replace(&mut self, screen: Screen) -> Step {
        self.history.clear();
        self.current = screen;
        Step::Navigated(self.current_kind())
    }

    fn reset_to_services(&mut self) -> Step {
        info!("resetting to service list");
        let step = self.replace(Screen::ServiceList(ServiceListScreen::new()));
        self.enter_current();
        step
    }

    fn enter_current(&mut self) {
        let Self { workflow, current, .. } = &mut *self;
        match current {
            Screen::ServiceList(screen) => {
                screen.load(workflow);
            }
            Screen::Confirmation(screen) => {
                screen.on_enter(workflow);
            }
            _ => {}
        }
    }

    fn ignored(&self, operation: &str) -> Step {
        debug!(operation, screen = ?self.current_kind(), "operation not available on this screen");
        Step::Stayed
    }
}
