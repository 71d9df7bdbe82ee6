//! Backend speaking to a Google Apps Script web app.
//!
//! One endpoint, an `action` field selecting the operation, and a
//! `{notes?, success?, error?}` response shape. The proxy owns all row
//! arithmetic, so every operation here is a single round trip.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::AppsScriptConfig;
use crate::error::{Result, SheetsError};
use crate::note::Note;
use crate::store::NoteStore;

#[derive(Debug, Serialize)]
struct ActionBody<'a> {
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    note: Option<&'a Note>,
    #[serde(rename = "noteId", skip_serializing_if = "Option::is_none")]
    note_id: Option<&'a str>,
}

impl<'a> ActionBody<'a> {
    fn bare(action: &'a str) -> Self {
        Self {
            action,
            note: None,
            note_id: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ActionResponse {
    #[serde(default)]
    notes: Option<Vec<Note>>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

pub struct AppsScriptStore {
    config: AppsScriptConfig,
    client: reqwest::Client,
}

impl AppsScriptStore {
    pub fn new(config: AppsScriptConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn get_action(&self, action: &str) -> Result<ActionResponse> {
        debug!(action, "apps script GET");
        let resp = self
            .client
            .get(&self.config.web_app_url)
            .query(&[("action", action)])
            .send()
            .await?;
        Self::parse(resp).await
    }

    async fn post_action(&self, body: &ActionBody<'_>) -> Result<ActionResponse> {
        debug!(action = body.action, "apps script POST");
        let resp = self
            .client
            .post(&self.config.web_app_url)
            .json(body)
            .send()
            .await?;
        Self::parse(resp).await
    }

    /// An `error` field is a backend failure even on HTTP 200; the proxy
    /// reports script-level problems that way.
    async fn parse(resp: reqwest::Response) -> Result<ActionResponse> {
        let status = resp.status();
        if !status.is_success() {
            return Err(SheetsError::Transport {
                status: status.as_u16(),
            });
        }

        let parsed: ActionResponse = resp.json().await?;
        if let Some(error) = parsed.error {
            return Err(SheetsError::Backend(error));
        }
        Ok(parsed)
    }

    async fn mutate(&self, body: ActionBody<'_>) -> bool {
        let action = body.action;
        match self.post_action(&body).await {
            Ok(resp) => resp.success == Some(true),
            Err(e) => {
                warn!(action, error = %e, "apps script mutation failed");
                false
            }
        }
    }
}

#[async_trait]
impl NoteStore for AppsScriptStore {
    async fn list_all(&self) -> Result<Vec<Note>> {
        let resp = self.get_action("getAllNotes").await?;
        // The proxy should never hand back id-less notes, but a blanked
        // row upstream would; drop them here as well.
        Ok(resp
            .notes
            .unwrap_or_default()
            .into_iter()
            .filter(|note| !note.id.is_empty())
            .collect())
    }

    async fn create(&self, note: &Note) -> bool {
        self.mutate(ActionBody {
            action: "addNote",
            note: Some(note),
            note_id: None,
        })
        .await
    }

    async fn update(&self, id: &str, note: &Note) -> bool {
        self.mutate(ActionBody {
            action: "updateNote",
            note: Some(note),
            note_id: Some(id),
        })
        .await
    }

    async fn delete(&self, id: &str) -> bool {
        self.mutate(ActionBody {
            action: "deleteNote",
            note: None,
            note_id: Some(id),
        })
        .await
    }

    async fn initialize(&self) -> bool {
        self.mutate(ActionBody::bare("initializeSheet")).await
    }

    async fn test_connection(&self) -> bool {
        match self.get_action("testConnection").await {
            Ok(resp) => resp.success == Some(true),
            Err(e) => {
                debug!(error = %e, "connection test failed");
                false
            }
        }
    }
}
