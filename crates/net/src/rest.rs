//! HTTP client for a PostgREST-style hosted store

use std::time::Duration;

use async_trait::async_trait;
use podium_core::{Entry, EntryId, Round, RoundId, Scores};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::config::RemoteConfig;
use crate::error::{RemoteError, Result};
use crate::store::RemoteStore;
use crate::wire::{eq, ActivePatch, NamePatch, NewEntry, NewRound, ScoresPatch};
use crate::REST_PATH;

/// Remote store backed by the hosted REST endpoint
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    base_url: String,
    rounds_table: String,
    entries_table: String,
}

impl RestStore {
    /// Build a client from configuration
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RemoteError::Config("remote url is empty".to_string()));
        }

        let api_key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| RemoteError::Config(format!("invalid api key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key))
            .map_err(|e| RemoteError::Config(format!("invalid api key: {}", e)))?;

        let mut headers = HeaderMap::new();
        headers.insert("apikey", api_key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            base_url,
            rounds_table: config.rounds_table,
            entries_table: config.entries_table,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}{}/{}", self.base_url, REST_PATH, table)
    }

    fn rounds(&self) -> String {
        self.table_url(&self.rounds_table)
    }

    fn entries(&self) -> String {
        self.table_url(&self.entries_table)
    }

    /// Send a request, mapping non-2xx statuses to errors
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(RemoteError::Status {
            status: status.as_u16(),
            body,
        })
    }

    async fn fetch_rows<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Vec<T>> {
        let response = self.send(request).await?;
        response
            .json()
            .await
            .map_err(|e| RemoteError::Decode(e.to_string()))
    }

    /// Insert one row and return the stored representation
    async fn insert_one<B, T>(&self, url: String, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self
            .client
            .post(url)
            .header("Prefer", "return=representation")
            .json(body);
        let rows: Vec<T> = self.fetch_rows(request).await?;
        rows.into_iter().next().ok_or(RemoteError::EmptyResponse)
    }

    async fn clear_active(&self) -> Result<()> {
        let request = self
            .client
            .patch(self.rounds())
            .query(&[("is_active", eq(true))])
            .json(&ActivePatch { is_active: false });
        self.send(request).await?;
        Ok(())
    }
}

#[async_trait]
impl RemoteStore for RestStore {
    async fn ping(&self) -> Result<()> {
        let request = self
            .client
            .get(self.rounds())
            .query(&[("select", "id"), ("limit", "1")]);
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_rounds(&self) -> Result<Vec<Round>> {
        let request = self
            .client
            .get(self.rounds())
            .query(&[("select", "*"), ("order", "created_at.desc")]);
        let rounds: Vec<Round> = self.fetch_rows(request).await?;
        debug!(count = rounds.len(), "Fetched rounds");
        Ok(rounds)
    }

    #[instrument(skip(self))]
    async fn create_round(&self, name: &str) -> Result<Round> {
        // A failed clear does not stop the insert
        if let Err(e) = self.clear_active().await {
            warn!(error = %e, "Failed to clear active rounds before create");
        }

        self.insert_one(
            self.rounds(),
            &NewRound {
                name,
                is_active: true,
            },
        )
        .await
    }

    #[instrument(skip(self))]
    async fn set_active_round(&self, id: &RoundId) -> Result<()> {
        if let Err(e) = self.clear_active().await {
            warn!(error = %e, "Failed to clear active rounds before switch");
        }

        let request = self
            .client
            .patch(self.rounds())
            .query(&[("id", eq(id))])
            .json(&ActivePatch { is_active: true });
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn rename_round(&self, id: &RoundId, name: &str) -> Result<()> {
        let request = self
            .client
            .patch(self.rounds())
            .query(&[("id", eq(id))])
            .json(&NamePatch { name });
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_round(&self, id: &RoundId) -> Result<()> {
        let request = self.client.delete(self.rounds()).query(&[("id", eq(id))]);
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_entries(&self, round_id: &RoundId) -> Result<Vec<Entry>> {
        let request = self
            .client
            .get(self.entries())
            .query(&[("select", "*".to_string()), ("episode_id", eq(round_id))]);
        self.fetch_rows(request).await
    }

    #[instrument(skip(self))]
    async fn create_entry(&self, round_id: &RoundId, name: &str) -> Result<Entry> {
        self.insert_one(
            self.entries(),
            &NewEntry {
                episode_id: round_id,
                name,
                scores: Scores::default(),
            },
        )
        .await
    }

    #[instrument(skip(self, scores))]
    async fn update_entry_scores(&self, id: &EntryId, scores: &Scores) -> Result<()> {
        let request = self
            .client
            .patch(self.entries())
            .query(&[("id", eq(id))])
            .json(&ScoresPatch { scores });
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_entry(&self, id: &EntryId) -> Result<()> {
        let request = self.client.delete(self.entries()).query(&[("id", eq(id))]);
        self.send(request).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_entries_for_round(&self, round_id: &RoundId) -> Result<()> {
        let request = self
            .client
            .delete(self.entries())
            .query(&[("episode_id", eq(round_id))]);
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_normalized() {
        let store = RestStore::new(RemoteConfig::new("https://example.test/", "key")).unwrap();
        assert_eq!(store.base_url(), "https://example.test");
        assert_eq!(store.rounds(), "https://example.test/rest/v1/episodes");
        assert_eq!(store.entries(), "https://example.test/rest/v1/brands");
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = RestStore::new(RemoteConfig::new("  ", "key")).unwrap_err();
        assert!(matches!(err, RemoteError::Config(_)));
    }

    #[test]
    fn test_invalid_key_rejected() {
        let err = RestStore::new(RemoteConfig::new("https://example.test", "bad\nkey")).unwrap_err();
        assert!(matches!(err, RemoteError::Config(_)));
    }
}
