//! Stateless HTTP request builder and response parser for the booking API.
//!
//! # Design
//! `CarwashClient` holds only a `base_url` and carries no mutable state
//! between calls. Each endpoint is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Any 2xx status is accepted; 404 maps to `NotFound` and
//! every other status to `HttpStatus`.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::config::ClientConfig;
use crate::error::NetworkError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Booking, CreateBooking, NewService, Rating, Service};

#[derive(Debug, Clone)]
pub struct CarwashClient {
    base_url: String,
}

impl CarwashClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // --- services ---

    pub fn build_list_services(&self) -> HttpRequest {
        self.bare(HttpMethod::Get, "/api/services")
    }

    pub fn build_get_service(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/api/services/{id}"))
    }

    pub fn build_create_service(&self, input: &NewService) -> Result<HttpRequest, NetworkError> {
        self.json(HttpMethod::Post, "/api/services", input)
    }

    pub fn build_update_service(&self, id: i64, input: &NewService) -> Result<HttpRequest, NetworkError> {
        self.json(HttpMethod::Put, &format!("/api/services/{id}"), input)
    }

    pub fn build_delete_service(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Delete, &format!("/api/services/{id}"))
    }

    pub fn parse_list_services(&self, response: HttpResponse) -> Result<Vec<Service>, NetworkError> {
        decode(response)
    }

    pub fn parse_get_service(&self, response: HttpResponse) -> Result<Service, NetworkError> {
        decode(response)
    }

    pub fn parse_create_service(&self, response: HttpResponse) -> Result<Service, NetworkError> {
        decode(response)
    }

    pub fn parse_update_service(&self, response: HttpResponse) -> Result<Service, NetworkError> {
        decode(response)
    }

    pub fn parse_delete_service(&self, response: HttpResponse) -> Result<(), NetworkError> {
        check_status(&response)
    }

    // --- bookings ---

    pub fn build_create_booking(&self, input: &CreateBooking) -> Result<HttpRequest, NetworkError> {
        self.json(HttpMethod::Post, "/api/booking/create", input)
    }

    pub fn build_get_booking(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Get, &format!("/api/booking/{id}"))
    }

    pub fn build_confirm_booking(&self, id: i64) -> HttpRequest {
        self.bare(HttpMethod::Post, &format!("/api/booking/{id}/confirm"))
    }

    /// The rating travels as a query parameter with an empty body.
    pub fn build_rate_booking(&self, id: i64, rating: Rating) -> HttpRequest {
        self.bare(HttpMethod::Post, &format!("/api/booking/{id}/rate?rating={rating}"))
    }

    pub fn parse_create_booking(&self, response: HttpResponse) -> Result<Booking, NetworkError> {
        decode(response)
    }

    pub fn parse_get_booking(&self, response: HttpResponse) -> Result<Booking, NetworkError> {
        decode(response)
    }

    pub fn parse_confirm_booking(&self, response: HttpResponse) -> Result<Booking, NetworkError> {
        decode(response)
    }

    /// An empty 2xx body is a valid acknowledgement and yields `None`.
    pub fn parse_rate_booking(&self, response: HttpResponse) -> Result<Option<Booking>, NetworkError> {
        check_status(&response)?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        serde_json::from_str(&response.body)
            .map(Some)
            .map_err(|e| NetworkError::Deserialization(e.to_string()))
    }

    fn bare(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    fn json<B: Serialize>(&self, method: HttpMethod, path: &str, input: &B) -> Result<HttpRequest, NetworkError> {
        let body = serde_json::to_string(input).map_err(|e| NetworkError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url: format!("{}{path}", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }
}

fn decode<T: DeserializeOwned>(response: HttpResponse) -> Result<T, NetworkError> {
    check_status(&response)?;
    serde_json::from_str(&response.body).map_err(|e| NetworkError::Deserialization(e.to_string()))
}

/// Map non-success status codes to the appropriate `NetworkError` variant.
fn check_status(response: &HttpResponse) -> Result<(), NetworkError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(NetworkError::NotFound);
    }
    Err(NetworkError::HttpStatus {
        status: response.status,
        body: response.body.clone(),
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::types::{ServiceRef, Vehicle};

    fn client() -> CarwashClient {
        CarwashClient::new("http://localhost:8080")
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            headers: Vec::new(),
            body: body.to_string(),
        }
    }

    #[test]
    fn build_list_services_produces_correct_request() {
        let req = client().build_list_services();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:8080/api/services");
        assert!(req.body.is_none());
        assert!(req.headers.is_empty());
    }

    #[test]
    fn build_create_booking_produces_correct_request() {
        let input = CreateBooking {
            service: ServiceRef { id: 1 },
            vehicle: Vehicle {
                plate_number: "KBD123".to_string(),
                vehicle_type: "SUV".to_string(),
            },
            booking_time: Utc.with_ymd_and_hms(2025, 1, 20, 10, 0, 0).unwrap(),
        };
        let req = client().build_create_booking(&input).unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/booking/create");
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), "application/json".to_string())]
        );
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["service"]["id"], 1);
        assert_eq!(body["vehicle"]["plateNumber"], "KBD123");
        assert_eq!(body["bookingTime"], "2025-01-20T10:00:00Z");
    }

    #[test]
    fn build_confirm_booking_has_no_body() {
        let req = client().build_confirm_booking(42);
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/booking/42/confirm");
        assert!(req.body.is_none());
    }

    #[test]
    fn build_rate_booking_puts_rating_in_query() {
        let req = client().build_rate_booking(42, Rating::new(4).unwrap());
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.url, "http://localhost:8080/api/booking/42/rate?rating=4");
        assert!(req.body.is_none());
    }

    #[test]
    fn admin_service_requests() {
        let c = client();
        let input = NewService {
            name: "Interior".to_string(),
            description: "Vacuum and wipe".to_string(),
            price: 15.5,
            duration_minutes: Some(30),
        };
        let req = c.build_update_service(3, &input).unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.url, "http://localhost:8080/api/services/3");
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["durationMinutes"], 30);

        let req = c.build_delete_service(3);
        assert_eq!(req.method, HttpMethod::Delete);
        assert!(req.body.is_none());
        assert!(c.parse_delete_service(response(204, "")).is_ok());
    }

    #[test]
    fn parse_list_services_keeps_server_order() {
        let services = client()
            .parse_list_services(response(
                200,
                r#"[{"id":2,"name":"Premium","price":25.0},{"id":1,"name":"Basic Wash","price":10.0}]"#,
            ))
            .unwrap();
        let ids: Vec<i64> = services.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn parse_create_booking_accepts_201() {
        let booking = client()
            .parse_create_booking(response(201, r#"{"id":42,"status":"PENDING"}"#))
            .unwrap();
        assert_eq!(booking.id, 42);
    }

    #[test]
    fn parse_get_booking_not_found() {
        let err = client().parse_get_booking(response(404, "")).unwrap_err();
        assert_eq!(err, NetworkError::NotFound);
    }

    #[test]
    fn parse_confirm_booking_server_error() {
        let err = client()
            .parse_confirm_booking(response(500, "internal error"))
            .unwrap_err();
        assert!(matches!(err, NetworkError::HttpStatus { status: 500, .. }));
    }

    #[test]
    fn parse_rate_booking_empty_body_is_ack() {
        assert_eq!(client().parse_rate_booking(response(200, "")).unwrap(), None);
        let booking = client()
            .parse_rate_booking(response(200, r#"{"id":42,"status":"COMPLETED","rating":5}"#))
            .unwrap()
            .unwrap();
        assert_eq!(booking.rating, Some(5));
    }

    #[test]
    fn parse_list_services_bad_json() {
        let err = client()
            .parse_list_services(response(200, "not json"))
            .unwrap_err();
        assert!(matches!(err, NetworkError::Deserialization(_)));
    }

    #[test]
    fn trailing_slash_is_stripped() {
        let client = CarwashClient::new("http://localhost:8080/");
        assert_eq!(client.build_list_services().url, "http://localhost:8080/api/services");
    }
}
