use dotenvy::dotenv;
use serde_json::Value;
use std::env;

use voyage_client::{PackageFilter, PackageSort, TourPackage, filter_packages};

mod tracing_setup;
use tracing_setup::init_tracing;

/// Walk through a session against a running backend: restore any persisted session,
/// optionally sign in with `DEMO_EMAIL`/`DEMO_PASSWORD`, then browse packages.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    dotenv().ok();
    init_tracing("demo-session");

    let store = voyage_client::init().await?;

    let mut events = store.subscribe();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            tracing::info!(
                "Session event {:?}; a browser would now open {}",
                event,
                event.redirect_path()
            );
        }
    });

    tracing::info!("Backend: {}", store.gateway().base_url());
    store.hydrate().await;

    if store.user().await.is_none() {
        if let (Ok(email), Ok(password)) = (env::var("DEMO_EMAIL"), env::var("DEMO_PASSWORD")) {
            let result = store.login(&email, &password).await;
            tracing::info!("Login result: {}", serde_json::to_string(&result)?);
        }
    }

    match store.user().await {
        Some(user) => tracing::info!("Signed in as {} <{}>", user.name, user.email),
        None => tracing::info!("Browsing signed out"),
    }

    match store.gateway().destinations().await {
        Ok(Some(Value::Array(destinations))) => {
            tracing::info!("{} destinations available", destinations.len())
        }
        Ok(_) => tracing::info!("No destinations returned"),
        Err(e) => tracing::warn!("Failed to load destinations: {}", e.message()),
    }

    let packages = match store.gateway().packages(Vec::<(String, String)>::new()).await {
        Ok(Some(raw)) => TourPackage::from_records(&raw),
        Ok(None) => Vec::new(),
        Err(e) => {
            tracing::warn!("Failed to load packages: {}", e.message());
            Vec::new()
        }
    };

    let sort = env::var("DEMO_SORT")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(PackageSort::Recommended);
    for package in filter_packages(&packages, &PackageFilter::default(), sort) {
        tracing::info!(
            "{:<40} {:>8.2}  {}  {:.1}",
            package.title,
            package.price,
            package.trip_length_label(),
            package.rating
        );
    }

    if env::var("DEMO_LOGOUT").is_ok() {
        store.logout().await;
    }

    Ok(())
}
