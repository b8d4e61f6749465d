//! Notifications service calls

use crate::error::{SmokeError, SmokeResult};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Map, Value as JsonValue};
use spoke_config::SpokeConfig;
use spoke_http::{append_path_segment, join_url, with_query, HttpClient, HttpResponse};
use std::sync::Arc;
use tracing::{debug, info};

/// A notification as listed by the service. Fields beyond `id` and
/// `is_read` are kept untouched in `extra`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "truthy")]
    pub is_read: bool,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

/// One page of the notifications list
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub meta: Option<JsonValue>,
}

/// Query parameters accepted by the list endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub notification_type: Option<String>,
    pub is_read: Option<bool>,
}

impl NotificationFilters {
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(page) = self.page {
            params.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(ref kind) = self.notification_type {
            params.push(("type", kind.clone()));
        }
        if let Some(is_read) = self.is_read {
            params.push(("is_read", is_read.to_string()));
        }
        params
    }
}

#[derive(Clone)]
pub struct NotificationsApi {
    client: Arc<dyn HttpClient>,
    base_url: Option<String>,
    list_endpoint: Option<String>,
    update_endpoint: Option<String>,
}

impl NotificationsApi {
    pub fn new(
        client: Arc<dyn HttpClient>,
        base_url: Option<String>,
        list_endpoint: Option<String>,
        update_endpoint: Option<String>,
    ) -> Self {
        Self {
            client,
            base_url,
            list_endpoint,
            update_endpoint,
        }
    }

    pub fn from_config(client: Arc<dyn HttpClient>, config: &SpokeConfig) -> Self {
        Self::new(
            client,
            config.services.notifications_url.clone(),
            config.endpoints.list_notifications.clone(),
            config.endpoints.update_notification.clone(),
        )
    }

    pub fn can_update(&self) -> bool {
        self.base_url.is_some() && self.update_endpoint.is_some()
    }

    fn list_url(&self, filters: &NotificationFilters) -> SmokeResult<String> {
        let base = self
            .base_url
            .as_deref()
            .ok_or(SmokeError::MissingConfig("notifications base URL"))?;
        let endpoint = self
            .list_endpoint
            .as_deref()
            .ok_or(SmokeError::MissingConfig("list notifications endpoint"))?;
        Ok(with_query(&join_url(base, endpoint), &filters.query()))
    }

    /// Raw list response, whatever its status
    pub async fn list_response(
        &self,
        token: &str,
        filters: &NotificationFilters,
    ) -> SmokeResult<HttpResponse> {
        let url = self.list_url(filters)?;
        debug!("Requesting notifications from {}", url);
        Ok(self.client.get(&url, Some(token)).await?)
    }

    /// Decode a list response; anything but 200 with a `data` array is an error
    pub fn parse_page(response: &HttpResponse) -> SmokeResult<NotificationPage> {
        if response.status != 200 {
            return Err(SmokeError::from_status(response));
        }

        let data = response
            .field("data")
            .filter(|data| data.is_array())
            .ok_or(SmokeError::MissingData("data array"))?;
        let notifications: Vec<Notification> = serde_json::from_value(data.clone())?;

        Ok(NotificationPage {
            notifications,
            meta: response.field("meta").filter(|m| !m.is_null()).cloned(),
        })
    }

    pub async fn list(&self, token: &str) -> SmokeResult<NotificationPage> {
        self.list_with_filters(token, &NotificationFilters::default())
            .await
    }

    pub async fn list_with_filters(
        &self,
        token: &str,
        filters: &NotificationFilters,
    ) -> SmokeResult<NotificationPage> {
        let response = self.list_response(token, filters).await?;
        let page = Self::parse_page(&response)?;
        info!("Retrieved {} notifications", page.notifications.len());
        Ok(page)
    }

    /// First notification of the default listing, if there is one
    pub async fn first_notification(&self, token: &str) -> SmokeResult<Option<Notification>> {
        let page = self.list(token).await?;
        Ok(page.notifications.into_iter().next())
    }

    /// Raw response of setting `is_read` on a notification
    pub async fn update_response(
        &self,
        token: &str,
        notification_id: &str,
        is_read: bool,
    ) -> SmokeResult<HttpResponse> {
        if notification_id.is_empty() {
            return Err(SmokeError::InvalidArgument(
                "notification ID is required".to_string(),
            ));
        }
        let base = self
            .base_url
            .as_deref()
            .ok_or(SmokeError::MissingConfig("notifications base URL"))?;
        let endpoint = self
            .update_endpoint
            .as_deref()
            .ok_or(SmokeError::MissingConfig("update notification endpoint"))?;

        let url = append_path_segment(&join_url(base, endpoint), notification_id)?;
        debug!("PATCH {} is_read={}", url, is_read);

        Ok(self
            .client
            .patch_json(&url, json!({ "is_read": is_read }), Some(token))
            .await?)
    }

    pub async fn update_is_read(
        &self,
        token: &str,
        notification_id: &str,
        is_read: bool,
    ) -> SmokeResult<()> {
        let response = self.update_response(token, notification_id, is_read).await?;
        if response.status != 200 {
            return Err(SmokeError::from_status(&response));
        }
        info!("Notification {} updated, is_read={}", notification_id, is_read);
        Ok(())
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match JsonValue::deserialize(deserializer)? {
        JsonValue::String(s) => Ok(s),
        JsonValue::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number id, got {}",
            other
        ))),
    }
}

// Services have been seen sending is_read as bool, 0/1 or null
fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match JsonValue::deserialize(deserializer)? {
        JsonValue::Bool(b) => b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        JsonValue::String(s) => !s.is_empty() && s != "false" && s != "0",
        JsonValue::Null => false,
        JsonValue::Array(a) => !a.is_empty(),
        JsonValue::Object(_) => true,
    })
}
