//! Notes persisted in a Google Sheets spreadsheet.
//!
//! Two interchangeable backends implement [`NoteStore`]: an Apps Script
//! web-app proxy ([`AppsScriptStore`]) and the Sheets v4 REST API
//! ([`SheetsApiStore`]). Both share the fixed 8-column row layout in
//! [`schema`].
//!
//! A note's sheet row is derived by scanning for its id at access time,
//! never cached, so concurrent writers can shift rows between a lookup and
//! the write that follows it. That race is a property of the protocol and
//! is documented rather than hidden; [`locking`] offers an optional
//! in-process mitigation.

pub mod config;
pub mod error;
pub mod locking;
pub mod note;
pub mod schema;
pub mod store;

pub use config::{AppsScriptConfig, SheetsApiConfig};
pub use error::{Result, SheetsError};
pub use note::Note;
pub use store::{AppsScriptStore, NoteStore, SheetsApiStore};
