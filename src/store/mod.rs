mod apps_script;
mod sheets_api;

pub use apps_script::AppsScriptStore;
pub use sheets_api::SheetsApiStore;

use async_trait::async_trait;

use crate::error::Result;
use crate::note::Note;

/// CRUD over notes kept in a remote spreadsheet.
///
/// Reads surface failures as typed errors so the caller can tell "empty"
/// from "unreachable". Writes never propagate: they report success as a
/// boolean and leave the diagnostic detail in the log, matching what a
/// caller can actually act on. An absent id on update/delete is `false`,
/// not an error.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Every note in the sheet, in row order. The header row and rows with
    /// an empty id cell are never included.
    async fn list_all(&self) -> Result<Vec<Note>>;

    /// Append one note as a new row. Ids are not checked for uniqueness;
    /// creating twice with the same id yields two rows.
    async fn create(&self, note: &Note) -> bool;

    /// Overwrite the full row for `id` with `note`, all 8 columns.
    /// Partial updates are not supported; pass the merged note. Returns
    /// false without issuing a write when the id is absent.
    async fn update(&self, id: &str, note: &Note) -> bool;

    /// Remove the row for `id` entirely, shifting later rows up.
    async fn delete(&self, id: &str) -> bool;

    /// Ensure the canonical header row exists. Idempotent: when the header
    /// already matches it is a read-only no-op.
    async fn initialize(&self) -> bool;

    /// Read-only reachability probe. Never mutates, never propagates.
    async fn test_connection(&self) -> bool;
}
