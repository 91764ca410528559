/// Business logic services layer
use crate::clients::ApodClient;
use crate::domain::{ApodPayload, ApodSelector, BroadcastEvent, MediaRecord};
use crate::errors::{ApiError, ApiResult};
use crate::facts::pick_random;
use crate::relay::Relay;
use crate::utils::recent_window;
use chrono::NaiveDate;
use std::sync::Arc;

/// Fetches upstream records and pushes every success to live viewers
pub struct ApodService {
    client: ApodClient,
    relay: Arc<Relay>,
    facts: &'static [&'static str],
}

impl ApodService {
    pub fn new(client: ApodClient, relay: Arc<Relay>, facts: &'static [&'static str]) -> Self {
        Self {
            client,
            relay,
            facts,
        }
    }

    /// Fetch today's record, a specific date, or an explicit range; broadcast `apod_update`
    pub async fn fetch_apod(&self, selector: ApodSelector) -> ApiResult<ApodPayload> {
        let payload = self.client.fetch(selector).await?;
        self.relay
            .broadcast(&BroadcastEvent::apod_update(payload.clone()))
            .await;
        Ok(payload)
    }

    /// Fetch the trailing week ending yesterday; broadcast `gallery_update`
    pub async fn fetch_recent(&self, today: NaiveDate) -> ApiResult<Vec<MediaRecord>> {
        let records = self.client.fetch(recent_window(today)).await?.into_records();
        self.relay
            .broadcast(&BroadcastEvent::gallery_update(records.clone()))
            .await;
        Ok(records)
    }

    /// Draw one fact; broadcast `new_fact`
    pub async fn random_fact(&self) -> ApiResult<String> {
        let fact = pick_random(self.facts)
            .ok_or_else(|| ApiError::Internal("fact table is empty".to_string()))?
            .to_string();
        self.relay
            .broadcast(&BroadcastEvent::new_fact(fact.clone()))
            .await;
        Ok(fact)
    }
}
