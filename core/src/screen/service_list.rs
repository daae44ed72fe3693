//! Service catalogue with single selection.

use tracing::{debug, info, warn};

use super::Notice;
use crate::error::{NetworkError, ValidationError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::Service;
use crate::workflow::BookingWorkflow;

const LOAD_FAILED: &str = "Failed to load car wash services. Please try again.";

/// Service list with single selection.
///
/// A fresh screen starts in the loading state; a failed load replaces the
/// list with an error message and a retry action rather than a notice.
#[derive(Debug, Clone)]
pub struct ServiceListScreen {
    services: Vec<Service>,
    selected: Option<Service>,
    loading: bool,
    refreshing: bool,
    error: Option<String>,
    notice: Option<Notice>,
}

impl Default for ServiceListScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl ServiceListScreen {
    pub fn new() -> Self {
        Self {
            services: Vec::new(),
            selected: None,
            loading: true,
            refreshing: false,
            error: None,
            notice: None,
        }
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn selected(&self) -> Option<&Service> {
        self.selected.as_ref()
    }

    pub fn is_selected(&self, id: i64) -> bool {
        self.selected.as_ref().is_some_and(|s| s.id == id)
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn dismiss_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Fetches the list. Returns whether it succeeded; on failure the
    /// previous list is kept but hidden behind the error state.
    pub fn load<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> bool {
        let request = workflow.client().build_list_services();
        let outcome = workflow.execute(&request);
        self.complete_load(workflow, outcome)
    }

    /// Pull-to-refresh: keeps the current items visible while reloading.
    pub fn refresh<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> bool {
        match self.begin_refresh(workflow) {
            Some(request) => {
                let outcome = workflow.execute(&request);
                self.complete_load(workflow, outcome)
            }
            None => false,
        }
    }

    pub fn retry<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> bool {
        match self.begin_retry(workflow) {
            Some(request) => {
                let outcome = workflow.execute(&request);
                self.complete_load(workflow, outcome)
            }
            None => false,
        }
    }

    /// Marks the list as refreshing and returns the list request, or `None`
    /// while a load is already in flight.
    pub fn begin_refresh<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> Option<HttpRequest> {
        if self.loading || self.refreshing {
            return None;
        }
        self.refreshing = true;
        Some(workflow.client().build_list_services())
    }

    /// Like `begin_refresh`, but shows the full-screen loading state.
    pub fn begin_retry<T: Transport>(&mut self, workflow: &BookingWorkflow<T>) -> Option<HttpRequest> {
        if self.loading || self.refreshing {
            return None;
        }
        self.loading = true;
        Some(workflow.client().build_list_services())
    }

    /// Applies a list response and clears the loading flags.
    pub fn complete_load<T: Transport>(
        &mut self,
        workflow: &BookingWorkflow<T>,
        outcome: Result<HttpResponse, NetworkError>,
    ) -> bool {
        self.error = None;
        let ok = match outcome.and_then(|response| workflow.client().parse_list_services(response)) {
            Ok(services) => {
                info!(count = services.len(), "loaded services");
                self.services = services;
                // A selection that vanished from the refreshed list is dropped.
                if let Some(id) = self.selected.as_ref().map(|s| s.id) {
                    self.selected = self.services.iter().find(|s| s.id == id).cloned();
                }
                true
            }
            Err(e) => {
                warn!(error = %e, "service list load failed");
                self.error = Some(LOAD_FAILED.to_string());
                false
            }
        };
        self.loading = false;
        self.refreshing = false;
        ok
    }

    /// Selects the service, or clears the selection if it was already
    /// selected. Ids not in the list are ignored.
    pub fn toggle(&mut self, id: i64) {
        if self.is_selected(id) {
            self.selected = None;
            return;
        }
        match self.services.iter().find(|s| s.id == id) {
            Some(service) => self.selected = Some(service.clone()),
            None => debug!(service_id = id, "ignoring selection of unknown service"),
        }
    }

    /// Returns the selected service to carry into the booking form, or
    /// raises a prompt when nothing is selected.
    pub fn proceed(&mut self) -> Option<Service> {
        if self.selected.is_none() {
            self.notice = Some(Notice::from_validation(&ValidationError::NoServiceSelected));
        }
        self.selected.clone()
    }

    pub fn proceed_label(&self) -> String {
        match &self.selected {
            Some(service) => format!("Proceed with {} – {}", service.name, service.price_label()),
            None => "Select a Service to Proceed".to_string(),
        }
    }
}
