use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::Method;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::gateway::errors::GatewayError;

/// Airport autocomplete only queries the backend from this many characters on
pub const MIN_AIRPORT_QUERY_LEN: usize = 2;

/// A single call to the backend, built by feature wrappers or by callers directly.
///
/// Defaults to a GET with no body and no extra headers.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) endpoint: String,
    pub(crate) method: Method,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
    pub(crate) headers: HeaderMap,
}

impl ApiRequest {
    /// `endpoint` is relative to the configured base URL and must start with `/`.
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            query: Vec::new(),
            body: None,
            headers: HeaderMap::new(),
        }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Serialize `body` as the JSON request body.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, GatewayError> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    /// Add a header. Caller headers override the default `Content-Type`.
    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn method(&self) -> &Method {
        &self.method
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// Airport suggestion returned by `/airports/search`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Airport {
    #[serde(rename = "Airport_Code")]
    pub code: String,
    #[serde(rename = "City", default)]
    pub city: String,
    #[serde(rename = "Airport_Name", default)]
    pub name: String,
    #[serde(rename = "Country", default)]
    pub country: String,
}

impl Airport {
    /// Text placed in the search field once a suggestion is picked, e.g. "Lisbon (LIS)"
    pub fn display_label(&self) -> String {
        format!("{} ({})", self.city, self.code)
    }
}

/// Criteria for `/flights/search`
#[derive(Debug, Clone, PartialEq)]
pub struct FlightSearchParams {
    pub departure_airport: String,
    pub arrival_airport: String,
    pub departure_date: String,
    pub return_date: Option<String>,
    pub passengers: u32,
}

impl FlightSearchParams {
    pub fn one_way(
        departure_airport: impl Into<String>,
        arrival_airport: impl Into<String>,
        departure_date: impl Into<String>,
    ) -> Self {
        Self {
            departure_airport: departure_airport.into(),
            arrival_airport: arrival_airport.into(),
            departure_date: departure_date.into(),
            return_date: None,
            passengers: 1,
        }
    }

    pub fn with_return(mut self, return_date: impl Into<String>) -> Self {
        self.return_date = Some(return_date.into());
        self
    }

    pub fn with_passengers(mut self, passengers: u32) -> Self {
        self.passengers = passengers;
        self
    }

    pub fn validate(&self) -> Result<(), GatewayError> {
        let missing = [
            &self.departure_airport,
            &self.arrival_airport,
            &self.departure_date,
        ]
        .iter()
        .any(|field| field.trim().is_empty());

        if missing {
            return Err(GatewayError::InvalidRequest(
                "Missing search criteria".to_string(),
            ));
        }
        Ok(())
    }

    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        // Zero passengers is treated as unset, which the backend reads as one
        let passengers = self.passengers.max(1);
        vec![
            ("departureAirport".to_string(), self.departure_airport.clone()),
            ("arrivalAirport".to_string(), self.arrival_airport.clone()),
            ("departureDate".to_string(), self.departure_date.clone()),
            (
                "returnDate".to_string(),
                self.return_date.clone().unwrap_or_default(),
            ),
            ("passengers".to_string(), passengers.to_string()),
        ]
    }
}

/// Outbound and return legs of a flight search
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FlightSearchResults {
    pub outbound: Vec<Value>,
    #[serde(rename = "return")]
    pub return_flights: Vec<Value>,
}

impl FlightSearchResults {
    /// Extract `outboundFlights`/`returnFlights`, each defaulting to empty.
    pub fn from_value(data: &Value) -> Self {
        let legs = |key: &str| {
            data.get(key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };
        Self {
            outbound: legs("outboundFlights"),
            return_flights: legs("returnFlights"),
        }
    }
}
