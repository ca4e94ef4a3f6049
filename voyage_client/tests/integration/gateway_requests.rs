/// Gateway request shaping and response handling
///
/// Covers header composition as the backend sees it, error normalization and the
/// named feature operations (paths, methods, query strings and bodies).
use crate::common::{MockResponse, TEST_TOKEN, TestSession};
use axum::http::{HeaderValue, Method, header};
use serde_json::{Value, json};
use voyage_client::{ApiRequest, FlightSearchParams, GatewayError};

#[tokio::test]
async fn test_no_authorization_header_without_token() {
    // Given no persisted token
    let session = TestSession::start().await;
    session
        .backend
        .respond(Method::GET, "/destinations", MockResponse::ok(json!([])));

    // When calling an endpoint
    let result = session.gateway().destinations().await.unwrap();

    // Then the request carries JSON content type and no credentials
    assert_eq!(result, Some(json!([])));
    let request = session.backend.last_request();
    assert_eq!(request.headers[header::CONTENT_TYPE], "application/json");
    assert!(request.headers.get(header::AUTHORIZATION).is_none());
}

#[tokio::test]
async fn test_bearer_header_with_token() {
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session.backend.respond(
        Method::GET,
        "/users/bookings",
        MockResponse::ok(json!([{"Booking_ID": 1}])),
    );

    session.gateway().user_bookings().await.unwrap();

    let request = session.backend.last_request();
    assert_eq!(request.headers[header::AUTHORIZATION], "Bearer abc");
    assert_eq!(request.headers.get_all(header::AUTHORIZATION).iter().count(), 1);
}

#[tokio::test]
async fn test_caller_headers_reach_backend() {
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session
        .backend
        .respond(Method::POST, "/reviews", MockResponse::ok(json!({"id": 1})));

    let request = ApiRequest::post("/reviews")
        .json(&json!({"packageId": 3, "rating": 5}))
        .unwrap()
        .header(header::ACCEPT_LANGUAGE, HeaderValue::from_static("pt-PT"));
    session.gateway().request(request).await.unwrap();

    let received = session.backend.last_request();
    assert_eq!(received.headers[header::ACCEPT_LANGUAGE], "pt-PT");
    assert_eq!(received.headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(received.headers[header::AUTHORIZATION], "Bearer abc");
    assert_eq!(received.body, Some(json!({"packageId": 3, "rating": 5})));
}

#[tokio::test]
async fn test_rejection_carries_backend_message() {
    // Given a backend that refuses the booking with an explanation
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session.backend.respond(
        Method::POST,
        "/bookings",
        MockResponse::json(409, json!({"message": "Package is fully booked"})),
    );

    // When booking
    let result = session
        .gateway()
        .create_booking(&json!({"packageId": 3, "travelers": 2}))
        .await;

    // Then the error exposes status and message, and the session is untouched
    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(409));
    assert_eq!(err.message(), "Package is fully booked");
    assert_eq!(session.persisted_token().await.as_deref(), Some(TEST_TOKEN));
}

#[tokio::test]
async fn test_rejection_without_message_uses_default() {
    let session = TestSession::start().await;
    session
        .backend
        .respond(Method::GET, "/packages/9", MockResponse::empty(500));

    let err = session.gateway().package(9).await.unwrap_err();

    assert!(matches!(err, GatewayError::RequestRejected { status: 500, .. }));
    assert_eq!(err.message(), "Something went wrong");
}

#[tokio::test]
async fn test_unknown_route_is_rejected_not_expired() {
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;

    let err = session.gateway().destination("atlantis").await.unwrap_err();

    assert_eq!(err.status(), Some(404));
    assert_eq!(err.message(), "Not found");
    assert_eq!(session.persisted_token().await.as_deref(), Some(TEST_TOKEN));
}

#[tokio::test]
async fn test_empty_success_body_is_null() {
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session
        .backend
        .respond(Method::PUT, "/bookings/42/cancel", MockResponse::empty(204));

    let result = session.gateway().cancel_booking(42).await.unwrap();

    assert_eq!(result, Some(Value::Null));
    assert_eq!(session.backend.last_request().method, Method::PUT);
}

#[tokio::test]
async fn test_packages_and_reviews_query_strings() {
    let session = TestSession::start().await;
    session
        .backend
        .respond(Method::GET, "/packages", MockResponse::ok(json!([])));
    session
        .backend
        .respond(Method::GET, "/reviews", MockResponse::ok(json!([])));
    session
        .backend
        .respond(Method::GET, "/search", MockResponse::ok(json!({"results": []})));

    session
        .gateway()
        .packages([("category", "beach"), ("maxPrice", "900")])
        .await
        .unwrap();
    session.gateway().package_reviews(3).await.unwrap();
    session.gateway().search("lisbon & porto").await.unwrap();

    let queries: Vec<Option<String>> = session
        .backend
        .requests()
        .into_iter()
        .map(|r| r.query)
        .collect();
    assert_eq!(
        queries,
        vec![
            Some("category=beach&maxPrice=900".to_string()),
            Some("packageId=3".to_string()),
            Some("q=lisbon+%26+porto".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_wishlist_add_and_remove_bodies() {
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session
        .backend
        .respond(Method::POST, "/users/wishlist", MockResponse::ok(json!({"added": true})));
    session.backend.respond(
        Method::DELETE,
        "/users/wishlist",
        MockResponse::ok(json!({"removed": true})),
    );

    session.gateway().add_to_wishlist(12).await.unwrap();
    session.gateway().remove_from_wishlist(12).await.unwrap();

    let requests = session.backend.requests_to("/users/wishlist");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].method, Method::POST);
    assert_eq!(requests[1].method, Method::DELETE);
    for request in requests {
        assert_eq!(request.body, Some(json!({"packageId": 12})));
    }
}

#[tokio::test]
async fn test_airport_suggestions_below_minimum_skip_backend() {
    let session = TestSession::start().await;

    let suggestions = session.gateway().airport_suggestions("L").await;

    assert!(suggestions.is_empty());
    assert!(session.backend.requests().is_empty());
}

#[tokio::test]
async fn test_airport_suggestions_decode_results() {
    // Given results with one malformed entry
    let session = TestSession::start().await;
    session.backend.respond(
        Method::GET,
        "/airports/search",
        MockResponse::ok(json!([
            {
                "Airport_Code": "LIS",
                "City": "Lisbon",
                "Airport_Name": "Humberto Delgado",
                "Country": "Portugal"
            },
            {"City": "Nowhere"}
        ])),
    );

    // When typing two characters
    let suggestions = session.gateway().airport_suggestions("li").await;

    // Then the valid airport is suggested
    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].display_label(), "Lisbon (LIS)");
    assert_eq!(session.backend.last_request().query.as_deref(), Some("query=li"));
}

#[tokio::test]
async fn test_search_airports_failure_yields_empty_list() {
    let session = TestSession::start().await;
    session.backend.respond(
        Method::GET,
        "/airports/search",
        MockResponse::json(500, json!({"message": "Database unavailable"})),
    );

    let results = session.gateway().search_airports("lis").await;

    assert_eq!(results, json!([]));
}

#[tokio::test]
async fn test_flight_search_query_and_legs() {
    // Given a round trip for two
    let session = TestSession::start().await;
    session.backend.respond(
        Method::GET,
        "/flights/search",
        MockResponse::ok(json!({
            "outboundFlights": [{"Flight_ID": 1}, {"Flight_ID": 2}],
            "returnFlights": [{"Flight_ID": 3}]
        })),
    );
    let params = FlightSearchParams::one_way("LIS", "JFK", "2024-06-01")
        .with_return("2024-06-10")
        .with_passengers(2);

    // When searching
    let results = session.gateway().find_flights(&params).await.unwrap().unwrap();

    // Then both legs are split out and every criterion was sent
    assert_eq!(results.outbound.len(), 2);
    assert_eq!(results.return_flights.len(), 1);
    assert_eq!(
        session.backend.last_request().query.as_deref(),
        Some(
            "departureAirport=LIS&arrivalAirport=JFK&departureDate=2024-06-01&returnDate=2024-06-10&passengers=2"
        )
    );
}

#[tokio::test]
async fn test_flight_search_missing_criteria_skips_backend() {
    let session = TestSession::start().await;
    let params = FlightSearchParams::one_way("LIS", "", "2024-06-01");

    let err = session.gateway().find_flights(&params).await.unwrap_err();

    assert_eq!(err.message(), "Missing search criteria");
    assert!(session.backend.requests().is_empty());
}

#[tokio::test]
async fn test_malformed_success_body_is_parse_error() {
    // Given a backend that answers 200 with something that is not JSON
    let session = TestSession::with_persisted_token(TEST_TOKEN).await;
    session
        .backend
        .respond(Method::GET, "/destinations", MockResponse::raw(200, "not json"));
    let mut events = session.store.subscribe();

    // When fetching
    let result = session.gateway().destinations().await;

    // Then the call fails with a parse error and the session is untouched
    assert!(matches!(result, Err(GatewayError::Parse(_))), "{result:?}");
    assert_eq!(session.persisted_token().await.as_deref(), Some(TEST_TOKEN));
    assert!(events.try_recv().is_err());
}
