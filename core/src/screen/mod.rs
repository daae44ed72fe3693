//! Per-screen controllers.
//!
//! # Design
//! Each screen owns the UI flags it needs while waiting on the network
//! (`loading`, `submitting`, `confirming`) plus at most one dismissable
//! `Notice`. Screens never navigate; they report what happened and the
//! `FlowController` decides where to go next. Failures stop here: a
//! `WorkflowError` becomes a notice and is not returned to the host.

mod booking;
mod confirmation;
mod rating;
mod service_list;

pub use booking::BookingScreen;
pub use confirmation::ConfirmationScreen;
pub use rating::RatingScreen;
pub use service_list::ServiceListScreen;

use crate::error::{ValidationError, WorkflowError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Validation,
    Network,
}

/// A dismissable message shown over the current screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub message: String,
}

impl Notice {
    pub fn info(title: &str, message: &str) -> Self {
        Self::new(NoticeKind::Info, title, message)
    }

    pub fn validation(title: &str, message: &str) -> Self {
        Self::new(NoticeKind::Validation, title, message)
    }

    pub fn network(title: &str, message: &str) -> Self {
        Self::new(NoticeKind::Network, title, message)
    }

    fn new(kind: NoticeKind, title: &str, message: &str) -> Self {
        Self {
            kind,
            title: title.to_string(),
            message: message.to_string(),
        }
    }

    /// Validation failures carry the error's own text; network failures get
    /// the screen's generic retry message.
    pub(crate) fn from_error(error: &WorkflowError, network_title: &str, network_message: &str) -> Self {
        match error {
            WorkflowError::Validation(e) => Self::from_validation(e),
            WorkflowError::Network(_) => Self::network(network_title, network_message),
        }
    }

    pub(crate) fn from_validation(error: &ValidationError) -> Self {
        let title = match error {
            ValidationError::MissingField(_) => "Missing Information",
            ValidationError::AppointmentInPast => "Invalid Input",
            ValidationError::RatingOutOfRange(_) => "Invalid Rating",
            ValidationError::NoServiceSelected => "Selection Required",
        };
        Self::validation(title, &capitalize(&error.to_string()))
    }
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    ServiceList,
    Booking,
    Confirmation,
    Rating,
}

impl ScreenKind {
    /// Confirmation and Rating are terminal for a booking and have no back
    /// action.
    pub fn allows_back(&self) -> bool {
        matches!(self, ScreenKind::Booking)
    }
}

/// One entry on the navigation stack, carrying its typed payload.
#[derive(Debug, Clone)]
pub enum Screen {
    ServiceList(ServiceListScreen),
    Booking(BookingScreen),
    Confirmation(ConfirmationScreen),
    Rating(RatingScreen),
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::ServiceList(_) => ScreenKind::ServiceList,
            Screen::Booking(_) => ScreenKind::Booking,
            Screen::Confirmation(_) => ScreenKind::Confirmation,
            Screen::Rating(_) => ScreenKind::Rating,
        }
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Screen::ServiceList(s) => s.notice(),
            Screen::Booking(s) => s.notice(),
            Screen::Confirmation(s) => s.notice(),
            Screen::Rating(s) => s.notice(),
        }
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        match self {
            Screen::ServiceList(s) => s.dismiss_notice(),
            Screen::Booking(s) => s.dismiss_notice(),
            Screen::Confirmation(s) => s.dismiss_notice(),
            Screen::Rating(s) => s.dismiss_notice(),
        }
    }

    /// True while the screen's primary action is waiting on the network.
    pub fn is_busy(&self) -> bool {
        match self {
            Screen::ServiceList(s) => s.is_loading() || s.is_refreshing(),
            Screen::Booking(s) => s.is_submitting(),
            Screen::Confirmation(s) => s.is_confirming(),
            Screen::Rating(s) => s.is_submitting(),
        }
    }
}
