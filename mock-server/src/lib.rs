//! In-memory car-wash backend.
//!
//! Implements the service catalogue and booking endpoints with the same
//! status codes and validation as the production backend, so the client
//! can be exercised end-to-end without a database. Booking times are stored
//! and returned as zone-less local date-times, as the production backend does.

use std::{collections::BTreeMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::info;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_minutes: Option<u32>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub duration_minutes: Option<u32>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: i64,
    pub plate_number: String,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: i64,
    pub service: Service,
    pub vehicle: Vehicle,
    pub booking_time: NaiveDateTime,
    pub status: String,
    pub rating: Option<u8>,
}

#[derive(Deserialize)]
pub struct IdRef {
    pub id: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInput {
    pub id: Option<i64>,
    pub plate_number: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBooking {
    pub service: Option<IdRef>,
    pub vehicle: Option<VehicleInput>,
    pub booking_time: Option<String>,
}

#[derive(Deserialize)]
pub struct RateParams {
    pub rating: i32,
}

pub const STATUS_PENDING: &str = "PENDING";
pub const STATUS_CONFIRMED: &str = "CONFIRMED";
pub const STATUS_COMPLETED: &str = "COMPLETED";

#[derive(Default)]
pub struct Store {
    services: BTreeMap<i64, Service>,
    vehicles: BTreeMap<i64, Vehicle>,
    bookings: BTreeMap<i64, Booking>,
    next_id: i64,
}

impl Store {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn insert_service(&mut self, input: ServiceInput) -> Service {
        let service = Service {
            id: self.next_id(),
            name: input.name,
            description: input.description,
            price: input.price,
            duration_minutes: input.duration_minutes,
        };
        self.services.insert(service.id, service.clone());
        service
    }

    /// Looks a vehicle up by id, else by trimmed plate, creating it if the
    /// plate is new.
    fn resolve_vehicle(&mut self, input: VehicleInput) -> ApiResult<Vehicle> {
        if let Some(id) = input.id {
            return self
                .vehicles
                .get(&id)
                .cloned()
                .ok_or_else(|| not_found("Vehicle not found by id"));
        }
        let plate = match input.plate_number.as_deref().map(str::trim) {
            Some(plate) if !plate.is_empty() => plate.to_string(),
            _ => return Err(bad_request("Vehicle id or plateNumber must be provided")),
        };
        if let Some(existing) = self.vehicles.values().find(|v| v.plate_number == plate) {
            return Ok(existing.clone());
        }
        let vehicle = Vehicle {
            id: self.next_id(),
            plate_number: plate,
            vehicle_type: input.vehicle_type,
        };
        self.vehicles.insert(vehicle.id, vehicle.clone());
        Ok(vehicle)
    }
}

pub type Db = Arc<RwLock<Store>>;

type ApiResult<T> = Result<T, (StatusCode, String)>;

fn not_found(message: &str) -> (StatusCode, String) {
    (StatusCode::NOT_FOUND, message.to_string())
}

fn bad_request(message: &str) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, message.to_string())
}

/// Packages served by the standalone binary.
pub fn default_catalog() -> Vec<ServiceInput> {
    vec![
        ServiceInput {
            name: "Basic Wash".to_string(),
            description: "Exterior wash and dry".to_string(),
            price: 10.0,
            duration_minutes: Some(20),
        },
        ServiceInput {
            name: "Premium".to_string(),
            description: "Exterior, interior vacuum and wax".to_string(),
            price: 25.0,
            duration_minutes: Some(45),
        },
    ]
}

pub fn app() -> Router {
    app_with_services(Vec::new())
}

pub fn app_with_services(services: Vec<ServiceInput>) -> Router {
    let mut store = Store::default();
    for service in services {
        store.insert_service(service);
    }
    let db: Db = Arc::new(RwLock::new(store));
    Router::new()
        .route("/api/services", get(list_services).post(create_service))
        .route(
            "/api/services/{id}",
            get(get_service).put(update_service).delete(delete_service),
        )
        .route("/api/booking/create", post(create_booking))
        .route("/api/booking/{id}", get(get_booking))
        .route("/api/booking/{id}/confirm", post(confirm_booking))
        .route("/api/booking/{id}/rate", post(rate_booking))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_services(default_catalog())).await
}

// --- services ---

async fn list_services(State(db): State<Db>) -> Json<Vec<Service>> {
    let store = db.read().await;
    Json(store.services.values().cloned().collect())
}

async fn get_service(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Service>> {
    let store = db.read().await;
    store
        .services
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Service not found"))
}

async fn create_service(
    State(db): State<Db>,
    Json(input): Json<ServiceInput>,
) -> (StatusCode, Json<Service>) {
    let service = db.write().await.insert_service(input);
    info!(service_id = service.id, name = %service.name, "service created");
    (StatusCode::CREATED, Json(service))
}

async fn update_service(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<ServiceInput>,
) -> ApiResult<Json<Service>> {
    let mut store = db.write().await;
    let service = store
        .services
        .get_mut(&id)
        .ok_or_else(|| not_found("Service not found"))?;
    service.name = input.name;
    service.description = input.description;
    service.price = input.price;
    service.duration_minutes = input.duration_minutes;
    Ok(Json(service.clone()))
}

async fn delete_service(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<StatusCode> {
    let mut store = db.write().await;
    store
        .services
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| not_found("Service not found"))
}

// --- bookings ---

/// Accepts RFC 3339 (converted to UTC) or a zone-less local date-time.
fn parse_booking_time(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc).naive_utc());
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()
}

async fn create_booking(
    State(db): State<Db>,
    Json(input): Json<CreateBooking>,
) -> ApiResult<(StatusCode, Json<Booking>)> {
    let service_id = input
        .service
        .and_then(|s| s.id)
        .ok_or_else(|| bad_request("Service id must be provided"))?;
    let vehicle_input = input
        .vehicle
        .ok_or_else(|| bad_request("Vehicle must be provided"))?;
    let booking_time = match input.booking_time.as_deref() {
        Some(raw) => parse_booking_time(raw).ok_or_else(|| bad_request("Invalid bookingTime"))?,
        None => Utc::now().naive_utc(),
    };

    let mut store = db.write().await;
    let service = store
        .services
        .get(&service_id)
        .cloned()
        .ok_or_else(|| not_found("Service not found"))?;
    let vehicle = store.resolve_vehicle(vehicle_input)?;

    let booking = Booking {
        id: store.next_id(),
        service,
        vehicle,
        booking_time,
        status: STATUS_PENDING.to_string(),
        rating: None,
    };
    store.bookings.insert(booking.id, booking.clone());
    info!(booking_id = booking.id, service_id, plate = %booking.vehicle.plate_number, "booking created");
    Ok((StatusCode::CREATED, Json(booking)))
}

async fn get_booking(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Booking>> {
    let store = db.read().await;
    store
        .bookings
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| not_found("Booking not found"))
}

async fn confirm_booking(State(db): State<Db>, Path(id): Path<i64>) -> ApiResult<Json<Booking>> {
    let mut store = db.write().await;
    let booking = store
        .bookings
        .get_mut(&id)
        .ok_or_else(|| not_found("Booking not found"))?;
    booking.status = STATUS_CONFIRMED.to_string();
    info!(booking_id = id, "booking confirmed");
    Ok(Json(booking.clone()))
}

async fn rate_booking(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<RateParams>,
) -> ApiResult<Json<Booking>> {
    if !(1..=5).contains(&params.rating) {
        return Err(bad_request("Rating must be between 1 and 5"));
    }
    let mut store = db.write().await;
    let booking = store
        .bookings
        .get_mut(&id)
        .ok_or_else(|| not_found("Booking not found"))?;
    booking.rating = Some(params.rating as u8);
    booking.status = STATUS_COMPLETED.to_string();
    info!(booking_id = id, rating = params.rating, "booking rated");
    Ok(Json(booking.clone()))
}
