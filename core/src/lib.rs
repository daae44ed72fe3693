//! Client core for the car-wash booking service.
//!
//! # Overview
//! Lists wash packages, creates a booking for a vehicle and appointment,
//! confirms it and collects a 1–5 star rating, against a REST backend.
//!
//! # Design
//! - `CarwashClient` is stateless: it builds `HttpRequest` values and parses
//!   `HttpResponse` values without touching the network.
//! - A `Transport` performs the round-trip; `UreqTransport` is the default.
//!   No retries, no caching, one request per call.
//! - `BookingWorkflow` validates input and runs each operation as a single
//!   round trip.
//! - Screen controllers in `screen` hold per-screen UI flags and notices;
//!   `FlowController` sequences them on a forward-only navigation stack.
//!   Hosts that do their own IO use the `begin_*`/`complete_*` pairs and
//!   see the in-flight state in between.
//! - DTOs are defined independently from the mock-server crate;
//!   integration tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod flow;
pub mod http;
pub mod screen;
pub mod types;
pub mod workflow;

pub use client::CarwashClient;
pub use config::ClientConfig;
pub use error::{NetworkError, ValidationError, WorkflowError};
pub use flow::{Clock, FlowController, SessionState, Step, SystemClock};
#[cfg(feature = "ureq")]
pub use http::UreqTransport;
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use screen::{Notice, NoticeKind, Screen, ScreenKind};
pub use types::{Booking, BookingStatus, CreateBooking, NewService, Rating, Service, ServiceRef, Vehicle};
pub use workflow::{BookingDraft, BookingWorkflow};
