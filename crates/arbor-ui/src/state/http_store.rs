//! JSON-over-HTTP idea store
//!
//! Routes, relative to the configured base URL:
//!
//! - `GET   {base}/owners/{owner}/projects/{project}/ideas`
//! - `POST  {base}/owners/{owner}/projects/{project}/ideas` -> `{"id": ...}`
//! - `PATCH {base}/owners/{owner}/projects/{project}/ideas/{id}`

use arbor_core::BlockId;
use arbor_core::error::StoreError;
use arbor_core::store::{IdeaPatch, IdeaRecord, IdeaStore, NewIdea, ProjectScope, Result};
use async_trait::async_trait;
use serde::Deserialize;

/// Body returned by a successful create.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreatedIdea {
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpIdeaStore {
    base_url: String,
}

impl HttpIdeaStore {
    /// Creates a store rooted at `base_url`. A trailing slash is ignored.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Collection URL for a project's ideas.
    ///
    /// # Examples
    ///
    /// ```
    /// use arbor_core::store::ProjectScope;
    /// use arbor_ui::state::HttpIdeaStore;
    ///
    /// let store = HttpIdeaStore::new("https://api.example.com/v1/");
    /// assert_eq!(
    ///     store.ideas_url(&ProjectScope::new("ada", "roadmap")),
    ///     "https://api.example.com/v1/owners/ada/projects/roadmap/ideas"
    /// );
    /// ```
    #[must_use]
    pub fn ideas_url(&self, scope: &ProjectScope) -> String {
        format!(
            "{}/owners/{}/projects/{}/ideas",
            self.base_url,
            encode_segment(&scope.owner_id),
            encode_segment(&scope.project_id)
        )
    }

    /// URL of a single idea.
    #[must_use]
    pub fn idea_url(&self, scope: &ProjectScope, id: &BlockId) -> String {
        format!("{}/{}", self.ideas_url(scope), encode_segment(id.as_str()))
    }
}

/// Percent-encodes a single path segment.
#[cfg(target_arch = "wasm32")]
fn encode_segment(segment: &str) -> String {
    js_sys::encode_uri_component(segment).into()
}

#[cfg(not(target_arch = "wasm32"))]
fn encode_segment(segment: &str) -> String {
    let mut encoded = String::with_capacity(segment.len());
    for byte in segment.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.!~*'()".contains(&byte) {
            encoded.push(char::from(byte));
        } else {
            encoded.push_str(&format!("%{byte:02X}"));
        }
    }
    encoded
}

#[cfg(target_arch = "wasm32")]
#[async_trait(?Send)]
impl IdeaStore for HttpIdeaStore {
    async fn list_ideas(&self, scope: &ProjectScope) -> Result<Vec<IdeaRecord>> {
        use gloo_net::http::Request;

        let response = Request::get(&self.ideas_url(scope))
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::load_failed(
                scope.project_id.clone(),
                format!("HTTP {}", response.status()),
            ));
        }
        response
            .json::<Vec<IdeaRecord>>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn create_idea(&self, scope: &ProjectScope, idea: NewIdea) -> Result<BlockId> {
        use gloo_net::http::Request;

        let response = Request::post(&self.ideas_url(scope))
            .json(&idea)
            .map_err(|e| StoreError::create_failed(e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::create_failed(format!("HTTP {}", response.status())));
        }
        let created = response
            .json::<CreatedIdea>()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        BlockId::new(created.id).map_err(|e| StoreError::Decode(e.to_string()))
    }

    async fn update_idea(&self, scope: &ProjectScope, id: &BlockId, patch: IdeaPatch) -> Result<()> {
        use gloo_net::http::Request;

        let response = Request::patch(&self.idea_url(scope, id))
            .json(&patch)
            .map_err(|e| StoreError::update_failed(id.as_str(), e.to_string()))?
            .send()
            .await
            .map_err(|e| StoreError::Transport(e.to_string()))?;
        if !response.ok() {
            return Err(StoreError::update_failed(
                id.as_str(),
                format!("HTTP {}", response.status()),
            ));
        }
        Ok(())
    }
}

#[cfg(not(target_arch = "wasm32"))]
#[async_trait(?Send)]
impl IdeaStore for HttpIdeaStore {
    async fn list_ideas(&self, scope: &ProjectScope) -> Result<Vec<IdeaRecord>> {
        Err(StoreError::Transport(format!(
            "no browser fetch available for {}",
            self.ideas_url(scope)
        )))
    }

    async fn create_idea(&self, scope: &ProjectScope, _idea: NewIdea) -> Result<BlockId> {
        Err(StoreError::Transport(format!(
            "no browser fetch available for {}",
            self.ideas_url(scope)
        )))
    }

    async fn update_idea(&self, scope: &ProjectScope, id: &BlockId, _patch: IdeaPatch) -> Result<()> {
        Err(StoreError::Transport(format!(
            "no browser fetch available for {}",
            self.idea_url(scope, id)
        )))
    }
}
