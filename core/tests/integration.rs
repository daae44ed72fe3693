//! Full booking session against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then drives `FlowController`
//! over real HTTP with `UreqTransport`: list, select, book, auto-confirm,
//! rate, reset. A second test exercises the stateless client directly.

use std::net::SocketAddr;

use carwash_core::{
    BookingDraft, BookingStatus, BookingWorkflow, CarwashClient, ClientConfig, FlowController, HttpMethod,
    HttpRequest, NetworkError, NewService, NoticeKind, ScreenKind, SessionState, Step, SystemClock, Transport,
    UreqTransport,
};
use chrono::{TimeDelta, Utc};

fn spawn_server() -> SocketAddr {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    addr
}

#[test]
fn booking_session() {
    let addr = spawn_server();
    let config = ClientConfig::new(&format!("http://{addr}/"));
    let workflow = BookingWorkflow::new(CarwashClient::from_config(&config), UreqTransport::new());

    // Step 1: the list loads on start.
    let mut flow = FlowController::start(workflow, SystemClock);
    let services = flow.service_list().unwrap().services().to_vec();
    assert_eq!(services.len(), 2, "seeded catalogue");
    assert_eq!(flow.session_state(), SessionState::Browsing);

    // Step 2: proceed without a selection is refused.
    assert_eq!(flow.proceed(), Step::Stayed);
    assert_eq!(flow.notice().unwrap().kind, NoticeKind::Validation);
    flow.dismiss_notice();

    // Step 3: select Premium and open the form.
    let premium = services.iter().find(|s| s.name == "Premium").unwrap();
    flow.toggle_service(premium.id);
    assert_eq!(flow.proceed(), Step::Navigated(ScreenKind::Booking));

    // Step 4: an incomplete form issues nothing.
    assert_eq!(flow.submit_booking(), Step::Stayed);
    assert_eq!(flow.notice().unwrap().title, "Missing Information");
    flow.dismiss_notice();

    // Step 5: a complete form books and auto-confirms.
    let form = flow.booking_form().unwrap();
    form.set_customer_name("Wanjiru");
    form.set_plate_number("KBD123");
    form.set_vehicle_type("SUV");
    form.set_appointment(Utc::now() + TimeDelta::days(1));
    assert_eq!(flow.submit_booking(), Step::Navigated(ScreenKind::Confirmation));
    assert_eq!(flow.session_state(), SessionState::Confirmed);

    let booking = flow.confirmation().unwrap().booking().clone();
    assert_eq!(booking.status, Some(BookingStatus::Confirmed));
    assert_eq!(booking.service.as_ref().unwrap().name, "Premium");
    assert_eq!(booking.vehicle.as_ref().unwrap().plate_number, "KBD123");
    assert_eq!(flow.back(), Step::Stayed);

    // Step 6: rate and acknowledge.
    assert_eq!(flow.finish_and_rate(), Step::Navigated(ScreenKind::Rating));
    flow.select_rating(4);
    flow.submit_rating();
    assert_eq!(flow.session_state(), SessionState::Rated);
    assert_eq!(flow.dismiss_notice(), Step::Navigated(ScreenKind::ServiceList));

    // Step 7: the backend recorded the rating.
    let stored = flow.workflow().fetch_booking(booking.id).unwrap();
    assert_eq!(stored.rating, Some(4));
    assert_eq!(stored.status, Some(BookingStatus::Completed));
    assert_eq!(flow.service_list().unwrap().services().len(), 2);
}

#[test]
fn client_round_trips() {
    let addr = spawn_server();
    let client = CarwashClient::new(&format!("http://{addr}"));
    let transport = UreqTransport::new();

    // Create, fetch, delete a service through the admin endpoints.
    let input = NewService {
        name: "Engine Bay".to_string(),
        description: "Degrease and rinse".to_string(),
        price: 18.0,
        duration_minutes: Some(25),
    };
    let req = client.build_create_service(&input).unwrap();
    let created = client.parse_create_service(transport.execute(&req).unwrap()).unwrap();
    assert_eq!(created.name, "Engine Bay");

    let req = client.build_get_service(created.id);
    let fetched = client.parse_get_service(transport.execute(&req).unwrap()).unwrap();
    assert_eq!(fetched, created);

    let req = client.build_delete_service(created.id);
    client.parse_delete_service(transport.execute(&req).unwrap()).unwrap();

    let req = client.build_delete_service(created.id);
    let err = client.parse_delete_service(transport.execute(&req).unwrap()).unwrap_err();
    assert_eq!(err, NetworkError::NotFound);

    // Unknown booking.
    let req = client.build_get_booking(9999);
    let err = client.parse_get_booking(transport.execute(&req).unwrap()).unwrap_err();
    assert_eq!(err, NetworkError::NotFound);
}

#[test]
fn unreachable_backend_is_a_list_error() {
    // Bind then drop to get a port nothing listens on.
    let addr = std::net::TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
    let workflow = BookingWorkflow::new(CarwashClient::new(&format!("http://{addr}")), UreqTransport::new());

    let flow = FlowController::start(workflow, SystemClock);

    let list = flow.service_list().unwrap();
    assert!(list.error().is_some());
    assert!(!list.is_loading());
    assert!(list.services().is_empty());
}

#[test]
fn plate_registered_without_type_still_books() {
    let addr = spawn_server();
    let workflow = BookingWorkflow::new(CarwashClient::new(&format!("http://{addr}")), UreqTransport::new());

    // Register the plate through a request that omits the vehicle type.
    let raw = HttpRequest {
        method: HttpMethod::Post,
        url: format!("http://{addr}/api/booking/create"),
        headers: vec![("content-type".to_string(), "application/json".to_string())],
        body: Some(r#"{"service":{"id":1},"vehicle":{"plateNumber":"KBD999"}}"#.to_string()),
    };
    assert_eq!(workflow.transport().execute(&raw).unwrap().status, 201);

    let draft = BookingDraft {
        service_id: 1,
        customer_name: "Otieno".to_string(),
        plate_number: "KBD999".to_string(),
        vehicle_type: "SUV".to_string(),
        appointment: Utc::now() + TimeDelta::hours(2),
    };
    let booking = workflow.create_booking(&draft, Utc::now()).unwrap();

    let vehicle = booking.vehicle.unwrap();
    assert_eq!(vehicle.plate_number, "KBD999");
    assert!(vehicle.vehicle_type.is_empty());
    assert_eq!(booking.status, Some(BookingStatus::Pending));
}
