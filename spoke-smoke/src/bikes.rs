//! Bikes service calls

use crate::error::{SmokeError, SmokeResult};
use serde_json::Value as JsonValue;
use spoke_config::SpokeConfig;
use spoke_http::{join_url, HttpClient};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Clone)]
pub struct BikesApi {
    client: Arc<dyn HttpClient>,
    base_url: Option<String>,
    list_endpoint: Option<String>,
}

impl BikesApi {
    pub fn new(
        client: Arc<dyn HttpClient>,
        base_url: Option<String>,
        list_endpoint: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            list_endpoint,
        }
    }

    pub fn from_config(client: Arc<dyn HttpClient>, config: &SpokeConfig) -> Self {
        Self::new(
            client,
            config.services.bikes_url.clone(),
            config.endpoints.list_bikes.clone(),
        )
    }

    /// ID of the first bike listed for the authenticated user.
    ///
    /// `Ok(None)` means the listing succeeded but was empty.
    pub async fn first_bike_id(&self, token: &str) -> SmokeResult<Option<String>> {
        let base = self
            .base_url
            .as_deref()
            .ok_or(SmokeError::MissingConfig("bikes base URL"))?;
        let endpoint = self
            .list_endpoint
            .as_deref()
            .ok_or(SmokeError::MissingConfig("list bikes endpoint"))?;

        let url = join_url(base, endpoint);
        debug!("Requesting bikes from {}", url);
        let response = self.client.get(&url, Some(token)).await?;
        if response.status != 200 {
            return Err(SmokeError::from_status(&response));
        }

        let data = response
            .field("data")
            .and_then(JsonValue::as_array)
            .ok_or(SmokeError::MissingData("data array"))?;

        let id = data.first().and_then(|bike| bike.get("id")).and_then(|id| match id {
            JsonValue::String(s) if !s.is_empty() => Some(s.clone()),
            JsonValue::Number(n) => Some(n.to_string()),
            _ => None,
        });

        match id {
            Some(ref id) => info!("Bike ID retrieved: {}", id),
            None => info!("No bikes listed for this account"),
        }
        Ok(id)
    }
}
