mod errors;
mod main;
mod types;

pub use errors::GatewayError;
pub use main::ApiGateway;
pub use types::{
    Airport, ApiRequest, FlightSearchParams, FlightSearchResults, LoginRequest,
    MIN_AIRPORT_QUERY_LEN,
};
