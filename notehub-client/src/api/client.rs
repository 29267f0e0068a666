//! Bearer-authenticated client for the NoteHub HTTP API.
//!
//! Every operation maps to one remote call. Failures surface as typed
//! errors for explicit handling by the caller; nothing is retried here.

use async_trait::async_trait;
use reqwest::{Client, header};
use serde::de::DeserializeOwned;

use super::types::NotePage;
use crate::config::Config;
use crate::error::ApiError;
use crate::models::{Note, NoteDraft, NoteTag};

/// Remote notes operations.
///
/// The trait is the seam for substituting an in-memory implementation in
/// tests, the same way a fake transport would stand in for the real one.
#[async_trait]
pub trait NotesApi: Send + Sync {
    /// `GET /notes?page&perPage&search&tag`. The search term and tag filter
    /// are omitted from the query string when absent.
    async fn list(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        tag: Option<NoteTag>,
    ) -> Result<NotePage, ApiError>;

    /// `POST /notes`. Validates the draft locally before sending.
    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError>;

    /// `DELETE /notes/{id}`. A vanished id surfaces as `ApiError::Api`
    /// with status 404 (see [`ApiError::is_not_found`]).
    async fn delete(&self, id: &str) -> Result<Note, ApiError>;
}

/// reqwest-backed implementation talking to the real NoteHub service.
pub struct RemoteNotesClient {
    client: Client,
    base_url: String,
    token: String,
}

impl RemoteNotesClient {
    pub fn new(config: &Config) -> Self {
        Self::from_parts(&config.api_url, &config.token)
    }

    pub fn from_parts(base_url: &str, token: &str) -> Self {
        Self {
            client: crate::http::shared_client().clone(),
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.to_string(),
        }
    }

    fn notes_url(&self) -> String {
        format!("{}/notes", self.base_url)
    }

    fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Query pairs for the list endpoint; the search term and tag filter
    /// appear only when present.
    fn list_query(
        page: u32,
        per_page: u32,
        search: Option<&str>,
        tag: Option<NoteTag>,
    ) -> Vec<(&'static str, String)> {
        let mut query = vec![("page", page.to_string()), ("perPage", per_page.to_string())];
        if let Some(term) = search {
            query.push(("search", term.to_string()));
        }
        if let Some(tag) = tag {
            query.push(("tag", tag.as_ref().to_string()));
        }
        query
    }

    /// Read the body of a non-2xx response into an `ApiError::Api`, pulling
    /// the server's `message` field when the body is JSON.
    async fn read_error(response: reqwest::Response) -> ApiError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let message = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| {
                v.get("message")
                    .and_then(|m| m.as_str())
                    .map(str::to_string)
            })
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| {
                if body.trim().is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                } else {
                    body
                }
            });

        ApiError::Api {
            status: status.as_u16(),
            message,
        }
    }

    async fn parse<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
        if !response.status().is_success() {
            return Err(Self::read_error(response).await);
        }
        response
            .json()
            .await
            .map_err(|e| ApiError::Network(format!("invalid response body: {}", e)))
    }
}

#[async_trait]
impl NotesApi for RemoteNotesClient {
    async fn list(
        &self,
        page: u32,
        per_page: u32,
        search: Option<&str>,
        tag: Option<NoteTag>,
    ) -> Result<NotePage, ApiError> {
        log::debug!(
            "[NOTES_API] GET /notes page={} perPage={} search={:?} tag={:?}",
            page,
            per_page,
            search,
            tag
        );

        let response = self
            .client
            .get(self.notes_url())
            .header(header::AUTHORIZATION, self.bearer())
            .query(&Self::list_query(page, per_page, search, tag))
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::parse(response).await
    }

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ApiError> {
        // Local constraint check happens before any network traffic.
        draft.validate().map_err(ApiError::Validation)?;

        log::info!(
            "[NOTES_API] POST /notes title={:?} tag={}",
            draft.title,
            draft.tag.as_ref()
        );

        let response = self
            .client
            .post(self.notes_url())
            .header(header::AUTHORIZATION, self.bearer())
            .json(draft)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::parse(response).await
    }

    async fn delete(&self, id: &str) -> Result<Note, ApiError> {
        log::info!("[NOTES_API] DELETE /notes/{}", id);

        let response = self
            .client
            .delete(format!("{}/{}", self.notes_url(), id))
            .header(header::AUTHORIZATION, self.bearer())
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        Self::parse(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_rejects_invalid_draft_before_any_network_call() {
        // Unroutable base URL: a network attempt would fail with a different
        // error kind, so a ValidationError proves nothing was sent.
        let client = RemoteNotesClient::from_parts("http://127.0.0.1:0", "test-token");
        let draft = NoteDraft::new("ab", "too short a title", NoteTag::Todo);

        let err = client.create(&draft).await.unwrap_err();
        match err {
            ApiError::Validation(v) => assert_eq!(v.errors[0].field, "title"),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_list_query_carries_optional_filters() {
        let query = RemoteNotesClient::list_query(2, 12, Some("meeting"), Some(NoteTag::Work));
        assert_eq!(
            query,
            vec![
                ("page", "2".to_string()),
                ("perPage", "12".to_string()),
                ("search", "meeting".to_string()),
                ("tag", "Work".to_string()),
            ]
        );

        // Absent filters are omitted from the query string entirely.
        let query = RemoteNotesClient::list_query(1, 12, None, None);
        assert_eq!(
            query,
            vec![("page", "1".to_string()), ("perPage", "12".to_string())]
        );
    }

    #[test]
    fn test_base_url_trailing_slash_is_normalized() {
        let client = RemoteNotesClient::from_parts("https://example.com/api/", "t");
        assert_eq!(client.notes_url(), "https://example.com/api/notes");
    }
}
