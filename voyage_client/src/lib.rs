//! voyage-client - Session store and API gateway for the Voyage travel-booking frontend
//!
//! This crate owns the authenticated-user lifecycle (token persistence, profile
//! normalization, login/register/logout, session restore) and the single HTTP channel
//! through which feature code reaches the backend.

mod catalog;
mod config;
mod gateway;
mod session;
mod storage;
mod utils;

pub use config::{AUTH_TOKEN_KEY, VOYAGE_API_URL};

pub use gateway::{
    Airport, ApiGateway, ApiRequest, FlightSearchParams, FlightSearchResults, GatewayError,
    LoginRequest, MIN_AIRPORT_QUERY_LEN,
};

pub use session::{
    AuthResult, AuthSession, SessionContext, SessionEvent, SessionSnapshot, SessionStore,
    UserProfile,
};

pub use storage::{
    FileTokenStore, InMemoryTokenStore, StorageError, TokenStore, token_store_from_env,
};

pub use catalog::{
    BookingFilter, BookingOrder, BookingStatus, Destination, DestinationFilter, PackageFilter,
    PackageSort, TourPackage, filter_bookings, filter_destinations, filter_packages,
    flight_duration, format_clock_time, format_flight_date, format_long_date,
};

pub use utils::UtilError;

/// Build the full session stack from the environment: token store, shared context,
/// gateway and store.
pub async fn init() -> Result<SessionStore, Box<dyn std::error::Error + Send + Sync>> {
    let token_store = token_store_from_env().await?;
    let context = SessionContext::new(token_store);
    let gateway = ApiGateway::new(context)?;
    Ok(SessionStore::new(gateway))
}
