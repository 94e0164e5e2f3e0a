use anyhow::{Context, Result};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::models::CleanRecord;

/// Default address of the local simulation automation bridge.
pub const DEFAULT_BRIDGE_URL: &str = "http://127.0.0.1:5055";

/// Configuration for the simulation session client
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    /// Base URL of the automation bridge (from SIM_BRIDGE_URL env var)
    pub base_url: String,
}

impl BridgeConfig {
    /// Create config from environment variables, falling back to the
    /// default local bridge address.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("SIM_BRIDGE_URL").unwrap_or_else(|_| DEFAULT_BRIDGE_URL.to_string());
        Self { base_url }
    }

    /// Create with an explicit bridge address
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { base_url }
    }
}

/// Client for the simulation session automation bridge
pub struct SessionClient {
    client: Client,
    config: BridgeConfig,
}

#[derive(Debug, Serialize)]
struct UnitPreferences {
    latitude: &'static str,
    longitude: &'static str,
    distance: &'static str,
}

#[derive(Debug, Serialize)]
struct FacilityPayload<'a> {
    name: &'a str,
    latitude: f64,
    longitude: f64,
    altitude: f64,
    use_terrain: bool,
    short_description: &'a str,
    long_description: &'a str,
}

impl SessionClient {
    pub fn new(config: BridgeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Configure session unit preferences: latitude/longitude in degrees,
    /// distance in meters. Must be called once before any facility writes.
    pub async fn configure_units(&self) -> Result<()> {
        let prefs = UnitPreferences {
            latitude: "deg",
            longitude: "deg",
            distance: "m",
        };

        let response = self
            .client
            .put(format!("{}/preferences", self.config.base_url))
            .json(&prefs)
            .send()
            .await
            .context("Failed to reach simulation bridge")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Simulation bridge error: {} - {}", status, body);
        }
        Ok(())
    }

    /// Check whether a facility with this name exists in the session.
    pub async fn contains(&self, name: &str) -> Result<bool> {
        let response = self
            .client
            .get(format!("{}/facilities/{}", self.config.base_url, name))
            .send()
            .await
            .context("Failed to reach simulation bridge")?;

        match response.status() {
            StatusCode::OK => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                anyhow::bail!("Simulation bridge error: {} - {}", status, body)
            }
        }
    }

    /// Remove a facility from the session by name.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let response = self
            .client
            .delete(format!("{}/facilities/{}", self.config.base_url, name))
            .send()
            .await
            .context("Failed to reach simulation bridge")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Simulation bridge error: {} - {}", status, body);
        }
        Ok(())
    }

    /// Create a facility at the record's position, altitude fixed at zero.
    pub async fn create(&self, record: &CleanRecord) -> Result<()> {
        let payload = FacilityPayload {
            name: &record.facility_name,
            latitude: record.lat,
            longitude: record.lon,
            altitude: 0.0,
            use_terrain: true,
            short_description: &record.short_description,
            long_description: &record.long_description,
        };

        let response = self
            .client
            .post(format!("{}/facilities", self.config.base_url))
            .json(&payload)
            .send()
            .await
            .context("Failed to reach simulation bridge")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Simulation bridge error: {} - {}", status, body);
        }
        Ok(())
    }

    /// Idempotent upsert: the session forbids duplicate facility names, so
    /// an existing facility is deleted before the record is created fresh.
    ///
    /// Returns true when an existing facility was replaced.
    pub async fn upsert_facility(&self, record: &CleanRecord) -> Result<bool> {
        let replaced = self.contains(&record.facility_name).await?;
        if replaced {
            debug!(
                "Facility {} already exists, deleting before re-create",
                record.facility_name
            );
            self.delete(&record.facility_name).await?;
        }
        self.create(record).await?;
        Ok(replaced)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CleanRecord {
        CleanRecord {
            facility_name: "Alpha_Site".to_string(),
            lat: 34.05,
            lon: -118.25,
            short_description: "uplink".to_string(),
            long_description: "primary uplink station".to_string(),
        }
    }

    #[tokio::test]
    async fn test_upsert_creates_when_absent() {
        let mut server = mockito::Server::new_async().await;

        let check = server
            .mock("GET", "/facilities/Alpha_Site")
            .with_status(404)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/facilities")
            .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                "name": "Alpha_Site",
                "latitude": 34.05,
                "longitude": -118.25,
                "altitude": 0.0,
                "use_terrain": true,
            })))
            .with_status(201)
            .create_async()
            .await;
        // No delete call expected on the create path.
        let delete = server
            .mock("DELETE", "/facilities/Alpha_Site")
            .expect(0)
            .create_async()
            .await;

        let client = SessionClient::new(BridgeConfig::new(server.url()));
        let replaced = client.upsert_facility(&sample()).await.unwrap();

        assert!(!replaced);
        check.assert_async().await;
        create.assert_async().await;
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn test_upsert_deletes_existing_first() {
        let mut server = mockito::Server::new_async().await;

        let check = server
            .mock("GET", "/facilities/Alpha_Site")
            .with_status(200)
            .create_async()
            .await;
        let delete = server
            .mock("DELETE", "/facilities/Alpha_Site")
            .with_status(204)
            .create_async()
            .await;
        let create = server
            .mock("POST", "/facilities")
            .with_status(201)
            .create_async()
            .await;

        let client = SessionClient::new(BridgeConfig::new(server.url()));
        let replaced = client.upsert_facility(&sample()).await.unwrap();

        assert!(replaced);
        check.assert_async().await;
        delete.assert_async().await;
        create.assert_async().await;
    }

    #[tokio::test]
    async fn test_configure_units_sends_degree_meter_preferences() {
        let mut server = mockito::Server::new_async().await;

        let prefs = server
            .mock("PUT", "/preferences")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "latitude": "deg",
                "longitude": "deg",
                "distance": "m",
            })))
            .with_status(200)
            .create_async()
            .await;

        let client = SessionClient::new(BridgeConfig::new(server.url()));
        client.configure_units().await.unwrap();

        prefs.assert_async().await;
    }

    #[tokio::test]
    async fn test_bridge_error_surfaces() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/facilities/Alpha_Site")
            .with_status(500)
            .with_body("session not loaded")
            .create_async()
            .await;

        let client = SessionClient::new(BridgeConfig::new(server.url()));
        let err = client.contains("Alpha_Site").await.unwrap_err();
        assert!(err.to_string().contains("500"));
    }

    #[test]
    fn test_config_trims_trailing_slash() {
        let config = BridgeConfig::new("http://localhost:5055/");
        assert_eq!(config.base_url, "http://localhost:5055");
    }
}
