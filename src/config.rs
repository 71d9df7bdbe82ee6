use serde::{Deserialize, Serialize};

/// Default Google Sheets API host. Overridable so tests can point a store
/// at an in-process fake.
pub const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

/// Configuration for the Apps Script proxy backend: a single web-app URL
/// that speaks the action protocol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppsScriptConfig {
    pub web_app_url: String,
}

impl AppsScriptConfig {
    pub fn new(web_app_url: impl Into<String>) -> Self {
        let url: String = web_app_url.into();
        Self {
            web_app_url: url.trim_end_matches('/').to_string(),
        }
    }
}

/// Configuration for the direct Sheets REST backend.
///
/// Endpoint and key come from the caller, never from source. `lock_writes`
/// turns on the optional per-id write serialization described on
/// [`crate::locking::IdLocks`]; it is off by default so the stock behavior
/// stays observable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetsApiConfig {
    pub api_key: String,
    pub spreadsheet_id: String,
    pub sheet_name: String,
    pub base_url: String,
    pub lock_writes: bool,
}

impl SheetsApiConfig {
    pub fn new(
        api_key: impl Into<String>,
        spreadsheet_id: impl Into<String>,
        sheet_name: impl Into<String>,
    ) -> Self {
        Self {
            api_key: api_key.into(),
            spreadsheet_id: spreadsheet_id.into(),
            sheet_name: sheet_name.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            lock_writes: false,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let url: String = base_url.into();
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_write_locking(mut self) -> Self {
        self.lock_writes = true;
        self
    }
}
