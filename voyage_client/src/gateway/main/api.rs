use serde::Serialize;
use serde_json::{Value, json};
use std::fmt::Display;

use crate::gateway::errors::GatewayError;
use crate::gateway::types::{
    Airport, ApiRequest, FlightSearchParams, FlightSearchResults, LoginRequest,
    MIN_AIRPORT_QUERY_LEN,
};
use crate::utils::encode_segment;

use super::core::ApiGateway;

fn resource_path(collection: &str, id: impl Display) -> String {
    format!("{collection}/{}", encode_segment(&id.to_string()))
}

// Named backend operations. Each fixes path, method and body shape and returns the
// decoded JSON untouched; `Ok(None)` means the session was evicted by a 401.
impl ApiGateway {
    pub async fn login(&self, email: &str, password: &str) -> Result<Option<Value>, GatewayError> {
        let request = ApiRequest::post("/auth/login").json(&LoginRequest { email, password })?;
        self.request(request).await
    }

    pub async fn register<T: Serialize + ?Sized>(
        &self,
        user_data: &T,
    ) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::post("/auth/register").json(user_data)?)
            .await
    }

    pub async fn current_user(&self) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get("/auth/me")).await
    }

    pub async fn destinations(&self) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get("/destinations")).await
    }

    pub async fn destination(&self, id: impl Display) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get(resource_path("/destinations", id)))
            .await
    }

    /// List packages, forwarding `params` as query parameters
    pub async fn packages<I, K, V>(&self, params: I) -> Result<Option<Value>, GatewayError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let request = params
            .into_iter()
            .fold(ApiRequest::get("/packages"), |request, (key, value)| {
                request.query(key, value)
            });
        self.request(request).await
    }

    pub async fn package(&self, id: impl Display) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get(resource_path("/packages", id)))
            .await
    }

    pub async fn create_booking<T: Serialize + ?Sized>(
        &self,
        booking: &T,
    ) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::post("/bookings").json(booking)?)
            .await
    }

    pub async fn booking(&self, id: impl Display) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get(resource_path("/bookings", id)))
            .await
    }

    pub async fn cancel_booking(&self, id: impl Display) -> Result<Option<Value>, GatewayError> {
        let endpoint = format!("{}/cancel", resource_path("/bookings", id));
        self.request(ApiRequest::put(endpoint)).await
    }

    pub async fn user_bookings(&self) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get("/users/bookings")).await
    }

    pub async fn package_reviews(
        &self,
        package_id: impl Display,
    ) -> Result<Option<Value>, GatewayError> {
        let request = ApiRequest::get("/reviews").query("packageId", package_id.to_string());
        self.request(request).await
    }

    pub async fn create_review<T: Serialize + ?Sized>(
        &self,
        review: &T,
    ) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::post("/reviews").json(review)?)
            .await
    }

    pub async fn wishlist(&self) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get("/users/wishlist")).await
    }

    pub async fn add_to_wishlist<P: Serialize>(
        &self,
        package_id: P,
    ) -> Result<Option<Value>, GatewayError> {
        let request =
            ApiRequest::post("/users/wishlist").json(&json!({ "packageId": package_id }))?;
        self.request(request).await
    }

    pub async fn remove_from_wishlist<P: Serialize>(
        &self,
        package_id: P,
    ) -> Result<Option<Value>, GatewayError> {
        let request =
            ApiRequest::delete("/users/wishlist").json(&json!({ "packageId": package_id }))?;
        self.request(request).await
    }

    pub async fn search(&self, query: &str) -> Result<Option<Value>, GatewayError> {
        self.request(ApiRequest::get("/search").query("q", query))
            .await
    }

    /// Look up airports by name or code.
    ///
    /// Never fails: any error is logged and yields an empty JSON array, so an
    /// autocomplete field simply shows no suggestions.
    pub async fn search_airports(&self, query: &str) -> Value {
        let request = ApiRequest::get("/airports/search").query("query", query);
        match self.request(request).await {
            Ok(Some(results)) => results,
            Ok(None) => Value::Array(Vec::new()),
            Err(e) => {
                tracing::error!("Search airports error: {}", e);
                Value::Array(Vec::new())
            }
        }
    }

    /// Autocomplete suggestions for an airport field.
    ///
    /// Queries shorter than [`MIN_AIRPORT_QUERY_LEN`] characters return nothing without
    /// contacting the backend. Entries that do not decode as airports are skipped.
    pub async fn airport_suggestions(&self, query: &str) -> Vec<Airport> {
        let query = query.trim();
        if query.chars().count() < MIN_AIRPORT_QUERY_LEN {
            return Vec::new();
        }

        match self.search_airports(query).await {
            Value::Array(entries) => entries
                .into_iter()
                .filter_map(|entry| serde_json::from_value(entry).ok())
                .collect(),
            other => {
                tracing::debug!("Unexpected airport search payload: {}", other);
                Vec::new()
            }
        }
    }

    pub async fn search_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<Option<Value>, GatewayError> {
        let request = params
            .query_pairs()
            .into_iter()
            .fold(ApiRequest::get("/flights/search"), |request, (key, value)| {
                request.query(key, value)
            });

        self.request(request).await.inspect_err(|e| {
            tracing::error!("Search flights error: {}", e);
        })
    }

    /// Validate criteria, run the search and split the result into its two legs.
    pub async fn find_flights(
        &self,
        params: &FlightSearchParams,
    ) -> Result<Option<FlightSearchResults>, GatewayError> {
        params.validate()?;
        let data = self.search_flights(params).await?;
        Ok(data.map(|data| FlightSearchResults::from_value(&data)))
    }
}
