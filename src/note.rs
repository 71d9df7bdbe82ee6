use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Category assigned to notes that carry none.
pub const DEFAULT_CATEGORY: &str = "Genel";

/// A note as it exists in the spreadsheet.
///
/// Every field is a string on the wire, including `is_pinned`, which is the
/// literal `"true"` or `"false"` and must survive a round trip untouched
/// rather than being coerced to a `bool`. The `id` is assigned by the caller
/// before creation and is immutable afterward; the sheet never generates one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default = "now_rfc3339")]
    pub created_at: String,
    #[serde(default = "now_rfc3339")]
    pub updated_at: String,
    #[serde(default = "default_pinned")]
    pub is_pinned: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

fn default_pinned() -> String {
    "false".to_string()
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339()
}

impl Note {
    /// New note with a fresh uuid, current timestamps, and field defaults.
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now().to_rfc3339();
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            content: String::new(),
            category: default_category(),
            tags: String::new(),
            created_at: now.clone(),
            updated_at: now,
            is_pinned: default_pinned(),
        }
    }

    /// Refresh `updated_at` to the current time. Call before sending an update.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }
}
