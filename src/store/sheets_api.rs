//! Backend speaking to the Google Sheets v4 REST API directly.
//!
//! Unlike the Apps Script proxy, row arithmetic lives here: update and
//! delete first scan the sheet for the id, convert the match position to a
//! 1-based sheet row (+2 for indexing and the header), and then write to
//! that row. The scan-to-write window is not atomic; see
//! [`crate::locking`] for the optional in-process mitigation.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::config::SheetsApiConfig;
use crate::error::{Result, SheetsError};
use crate::locking::IdLocks;
use crate::note::Note;
use crate::schema;
use crate::store::NoteStore;

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<String>>,
}

#[derive(Debug, Serialize)]
struct WriteBody {
    values: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct SpreadsheetMeta {
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SheetProperties {
    #[serde(default)]
    sheet_id: i64,
    #[serde(default)]
    title: String,
}

pub struct SheetsApiStore {
    config: SheetsApiConfig,
    client: reqwest::Client,
    locks: IdLocks,
}

impl SheetsApiStore {
    pub fn new(config: SheetsApiConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
            locks: IdLocks::new(),
        }
    }

    // ── URL and range helpers ───────────────────────────

    fn values_url(&self, range: &str, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}{}",
            self.config.base_url,
            self.config.spreadsheet_id,
            urlencoding::encode(range),
            suffix
        )
    }

    fn spreadsheet_url(&self, suffix: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}{}",
            self.config.base_url, self.config.spreadsheet_id, suffix
        )
    }

    /// Full data span, columns A-H, header included.
    fn full_range(&self) -> String {
        format!("{}!A:H", self.config.sheet_name)
    }

    /// Exactly one data row.
    fn row_range(&self, row: usize) -> String {
        format!("{}!A{}:H{}", self.config.sheet_name, row, row)
    }

    fn header_range(&self) -> String {
        format!("{}!A1:H1", self.config.sheet_name)
    }

    fn key(&self) -> (&str, &str) {
        ("key", self.config.api_key.as_str())
    }

    fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            return Err(SheetsError::Transport {
                status: status.as_u16(),
            });
        }
        Ok(resp)
    }

    // ── Raw cell operations ─────────────────────────────

    async fn read_range(&self, range: &str) -> Result<Vec<Vec<String>>> {
        debug!(range, "values read");
        let resp = self
            .client
            .get(self.values_url(range, ""))
            .query(&[self.key()])
            .send()
            .await?;
        let parsed: ValueRange = Self::check(resp)?.json().await?;
        Ok(parsed.values)
    }

    async fn overwrite_range(&self, range: &str, values: Vec<Vec<String>>) -> Result<()> {
        debug!(range, "values overwrite");
        let resp = self
            .client
            .put(self.values_url(range, ""))
            .query(&[self.key(), ("valueInputOption", "RAW")])
            .json(&WriteBody { values })
            .send()
            .await?;
        Self::check(resp)?;
        Ok(())
    }

    /// Sheet row currently occupied by `id`, derived with a fresh scan over
    /// the raw grid (empty rows count; they still occupy a physical row).
    /// The result is stale the moment it returns.
    pub async fn find_row(&self, id: &str) -> Result<Option<usize>> {
        let rows = self.read_range(&self.full_range()).await?;
        let hit = rows
            .iter()
            .skip(1)
            .position(|cells| cells.first().map(String::as_str) == Some(id));
        Ok(hit.map(schema::sheet_row))
    }

    /// Numeric id of the configured sheet, from spreadsheet metadata.
    /// `None` on any failure; callers fall back to sheet id 0, which is
    /// correct whenever the spreadsheet has a single sheet.
    async fn sheet_id(&self) -> Option<i64> {
        let resp = self
            .client
            .get(self.spreadsheet_url(""))
            .query(&[self.key(), ("fields", "sheets.properties")])
            .send()
            .await
            .ok()?;
        let meta: SpreadsheetMeta = resp.json().await.ok()?;
        meta.sheets
            .into_iter()
            .find(|entry| entry.properties.title == self.config.sheet_name)
            .map(|entry| entry.properties.sheet_id)
    }

    async fn write_guard(&self, id: &str) -> Option<tokio::sync::OwnedMutexGuard<()>> {
        if self.config.lock_writes {
            Some(self.locks.lock_for(id).lock_owned().await)
        } else {
            None
        }
    }
}

#[async_trait]
impl NoteStore for SheetsApiStore {
    async fn list_all(&self) -> Result<Vec<Note>> {
        let rows = self.read_range(&self.full_range()).await?;
        let mut notes = Vec::new();
        for (index, cells) in rows.iter().enumerate().skip(1) {
            // Blanked rows keep their physical slot but carry no record.
            if cells.first().map_or(true, |cell| cell.is_empty()) {
                continue;
            }
            notes.push(schema::decode_row(cells, index + 1)?);
        }
        Ok(notes)
    }

    async fn create(&self, note: &Note) -> bool {
        let body = WriteBody {
            values: vec![schema::encode_row(note)],
        };
        let result = self
            .client
            .post(self.values_url(&self.full_range(), ":append"))
            .query(&[
                self.key(),
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(id = %note.id, status = resp.status().as_u16(), "append rejected");
                false
            }
            Err(e) => {
                warn!(id = %note.id, error = %e, "append failed");
                false
            }
        }
    }

    async fn update(&self, id: &str, note: &Note) -> bool {
        let _guard = self.write_guard(id).await;

        let row = match self.find_row(id).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                debug!(id, "update target not found");
                return false;
            }
            Err(e) => {
                warn!(id, error = %e, "update scan failed");
                return false;
            }
        };

        match self
            .overwrite_range(&self.row_range(row), vec![schema::encode_row(note)])
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(id, row, error = %e, "row overwrite failed");
                false
            }
        }
    }

    async fn delete(&self, id: &str) -> bool {
        let _guard = self.write_guard(id).await;

        let row = match self.find_row(id).await {
            Ok(Some(row)) => row,
            Ok(None) => {
                debug!(id, "delete target not found");
                return false;
            }
            Err(e) => {
                warn!(id, error = %e, "delete scan failed");
                return false;
            }
        };

        let sheet_id = match self.sheet_id().await {
            Some(sheet_id) => sheet_id,
            None => {
                debug!("sheet id lookup failed, falling back to 0");
                0
            }
        };

        // deleteDimension removes the row structurally: later rows shift
        // up. Indices are 0-based and half-open.
        let body = json!({
            "requests": [{
                "deleteDimension": {
                    "range": {
                        "sheetId": sheet_id,
                        "dimension": "ROWS",
                        "startIndex": row - 1,
                        "endIndex": row,
                    }
                }
            }]
        });

        let result = self
            .client
            .post(self.spreadsheet_url(":batchUpdate"))
            .query(&[self.key()])
            .json(&body)
            .send()
            .await;

        match result {
            Ok(resp) if resp.status().is_success() => true,
            Ok(resp) => {
                warn!(id, row, status = resp.status().as_u16(), "row deletion rejected");
                false
            }
            Err(e) => {
                warn!(id, row, error = %e, "row deletion failed");
                false
            }
        }
    }

    async fn initialize(&self) -> bool {
        let rows = match self.read_range(&self.header_range()).await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(error = %e, "header read failed");
                return false;
            }
        };

        if rows.first().map_or(false, |cells| schema::header_is_valid(cells)) {
            return true;
        }

        match self
            .overwrite_range(&self.header_range(), vec![schema::header_row()])
            .await
        {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "header write failed");
                false
            }
        }
    }

    async fn test_connection(&self) -> bool {
        let result = self
            .client
            .get(self.spreadsheet_url(""))
            .query(&[self.key(), ("fields", "spreadsheetId")])
            .send()
            .await;

        match result {
            Ok(resp) => resp.status().is_success(),
            Err(e) => {
                debug!(error = %e, "connection test failed");
                false
            }
        }
    }
}
