//! Location acquisition
//!
//! One-shot request for the device position. Any failure is turned into a
//! `Denied` outcome carrying the fallback coordinate, so callers always get
//! something to resolve a schedule for.

use serde::Deserialize;
use std::time::Duration;
use tracing::{info, warn};

use crate::config::{LocationConfig, LocationMode};
use crate::error::LocationError;
use crate::types::GeoCoordinate;

/// Karachi, used whenever the real position is unknown
pub const FALLBACK_COORDINATE: GeoCoordinate = GeoCoordinate::new_unchecked(24.8607, 67.0011);

pub fn fallback_coordinate() -> GeoCoordinate {
    FALLBACK_COORDINATE
}

/// Result of a location request
#[derive(Debug, Clone, PartialEq)]
pub enum LocationOutcome {
    Granted(GeoCoordinate),
    Denied {
        fallback: GeoCoordinate,
        reason: String,
    },
}

impl LocationOutcome {
    /// Coordinate to resolve against, whichever way the request went
    pub fn coordinate(&self) -> GeoCoordinate {
        match self {
            LocationOutcome::Granted(c) => *c,
            LocationOutcome::Denied { fallback, .. } => *fallback,
        }
    }

    /// Whether the user should be told the fallback is in use
    pub fn needs_advisory(&self) -> bool {
        matches!(self, LocationOutcome::Denied { .. })
    }
}

/// Location oracle
pub trait LocationProvider: Send + Sync {
    fn locate(&self) -> Result<GeoCoordinate, LocationError>;
}

/// Always answers with the same coordinate
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub GeoCoordinate);

impl LocationProvider for FixedLocation {
    fn locate(&self) -> Result<GeoCoordinate, LocationError> {
        Ok(self.0)
    }
}

/// Response shape of ip-api.com style lookup services
#[derive(Debug, Deserialize)]
struct IpLookupResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    lat: Option<f64>,
    #[serde(default)]
    lon: Option<f64>,
}

/// Approximate position from a public IP geolocation endpoint
pub struct IpLocationProvider {
    url: String,
    timeout_secs: u64,
    client: reqwest::blocking::Client,
}

impl IpLocationProvider {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Result<Self, LocationError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| LocationError::Lookup(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            timeout_secs,
            client,
        })
    }
}

impl LocationProvider for IpLocationProvider {
    fn locate(&self) -> Result<GeoCoordinate, LocationError> {
        let response = self.client.get(&self.url).send().map_err(|e| {
            if e.is_timeout() {
                LocationError::Timeout(self.timeout_secs)
            } else {
                LocationError::Lookup(format!("Request failed: {}", e))
            }
        })?;

        if !response.status().is_success() {
            return Err(LocationError::Lookup(format!(
                "HTTP {} from {}",
                response.status(),
                self.url
            )));
        }

        let body: IpLookupResponse = response
            .json()
            .map_err(|e| LocationError::Lookup(format!("Failed to parse response: {}", e)))?;

        parse_lookup(body)
    }
}

fn parse_lookup(body: IpLookupResponse) -> Result<GeoCoordinate, LocationError> {
    if body.status != "success" {
        return Err(LocationError::Refused(
            body.message.unwrap_or_else(|| body.status.clone()),
        ));
    }
    match (body.lat, body.lon) {
        (Some(lat), Some(lon)) => Ok(GeoCoordinate::new(lat, lon)?),
        _ => Err(LocationError::Lookup("response has no coordinates".to_string())),
    }
}

/// Run the one-shot request, substituting the fallback on any failure
pub fn acquire_location(provider: &dyn LocationProvider) -> LocationOutcome {
    match provider.locate() {
        Ok(coordinate) => {
            info!(%coordinate, "Location acquired");
            LocationOutcome::Granted(coordinate)
        }
        Err(e) => {
            let fallback = fallback_coordinate();
            warn!(error = %e, %fallback, "Location unavailable, using fallback");
            LocationOutcome::Denied {
                fallback,
                reason: e.to_string(),
            }
        }
    }
}

/// Build the provider selected in configuration
pub fn provider_from_config(config: &LocationConfig) -> Result<Box<dyn LocationProvider>, LocationError> {
    match config.mode {
        LocationMode::Fixed => {
            let coordinate = GeoCoordinate::new(config.latitude, config.longitude)?;
            Ok(Box::new(FixedLocation(coordinate)))
        }
        LocationMode::Ip => Ok(Box::new(IpLocationProvider::new(
            config.lookup_url.clone(),
            config.timeout_secs,
        )?)),
        // No location source at all: fallback without an advisory
        LocationMode::Fallback => Ok(Box::new(FixedLocation(fallback_coordinate()))),
    }
}

/// Build the configured provider and run the one-shot request
///
/// A provider that cannot even be built (e.g. HTTP client setup failure) is
/// treated like a denied request.
pub fn locate_from_config(config: &LocationConfig) -> LocationOutcome {
    match provider_from_config(config) {
        Ok(provider) => acquire_location(provider.as_ref()),
        Err(e) => {
            let fallback = fallback_coordinate();
            warn!(error = %e, %fallback, "Location provider unavailable, using fallback");
            LocationOutcome::Denied {
                fallback,
                reason: e.to_string(),
            }
        }
    }
}
