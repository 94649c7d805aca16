//! Geolocation lookup for the currency overlay and clock timezone

use anyhow::Result;
use focusclock_core::{IpApiResponse, LocationData};
use std::time::Duration;
use tracing::{info, warn};

use crate::config::LocationConfig;

/// Looks up where we are. Never fails: any problem yields
/// [`LocationData::fallback`].
pub async fn lookup(config: &LocationConfig) -> LocationData {
    if !config.enabled {
        info!("Geolocation disabled, using default currency and local time");
        return LocationData::fallback();
    }
    match fetch(config).await {
        Ok(location) => {
            info!(
                country = location.country.as_deref().unwrap_or("unknown"),
                currency = %location.currency.code,
                "Location resolved"
            );
            location
        }
        Err(e) => {
            warn!("Failed to get location data, using default: {:#}", e);
            LocationData::fallback()
        }
    }
}

async fn fetch(config: &LocationConfig) -> Result<LocationData> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("focusclock/", env!("CARGO_PKG_VERSION")))
        .build()?;
    let response: IpApiResponse = client
        .get(&config.endpoint)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    Ok(LocationData::from_ip_api(response))
}
