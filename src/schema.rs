//! Fixed 8-column row layout shared by both backends.
//!
//! Columns A-H hold `[id, title, content, category, tags, createdAt,
//! updatedAt, isPinned]` in that order, with row 1 reserved for the header.
//! A record's sheet row is never stored; it is derived by scanning for the
//! id and adding [`HEADER_OFFSET`].

use chrono::Utc;

use crate::error::{Result, SheetsError};
use crate::note::{Note, DEFAULT_CATEGORY};

pub const COLUMN_COUNT: usize = 8;

/// Offset from a 0-based data-scan position to a 1-based sheet row:
/// one for the indexing conversion, one for the header row.
pub const HEADER_OFFSET: usize = 2;

/// Canonical header labels, written by `initialize`.
pub const HEADER_LABELS: [&str; COLUMN_COUNT] = [
    "ID",
    "Başlık",
    "İçerik",
    "Kategori",
    "Etiketler",
    "Oluşturulma",
    "Güncellenme",
    "Sabitlenmiş",
];

/// Encode a note as one sheet row in column order.
pub fn encode_row(note: &Note) -> Vec<String> {
    vec![
        note.id.clone(),
        note.title.clone(),
        note.content.clone(),
        note.category.clone(),
        note.tags.clone(),
        note.created_at.clone(),
        note.updated_at.clone(),
        note.is_pinned.clone(),
    ]
}

/// Decode one sheet row into a note. `row` is the 1-based sheet row, used
/// only for error reporting.
///
/// The Sheets API trims trailing empty cells from responses, so short rows
/// are legitimate: absent trailing cells fall back to field defaults
/// (empty string, `"Genel"`, `"false"`, or the current time for the
/// timestamps). A row wider than the schema or with an empty id cell is
/// rejected as malformed instead of being silently coerced.
pub fn decode_row(cells: &[String], row: usize) -> Result<Note> {
    if cells.len() > COLUMN_COUNT {
        return Err(SheetsError::MalformedRow {
            row,
            reason: format!("expected at most {} cells, got {}", COLUMN_COUNT, cells.len()),
        });
    }

    let id = cells.first().map(String::as_str).unwrap_or("");
    if id.is_empty() {
        return Err(SheetsError::MalformedRow {
            row,
            reason: "empty id cell".to_string(),
        });
    }

    let cell = |i: usize| cells.get(i).cloned().unwrap_or_default();
    let or_default = |value: String, fallback: &str| {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value
        }
    };
    let now = Utc::now().to_rfc3339();

    Ok(Note {
        id: id.to_string(),
        title: cell(1),
        content: cell(2),
        category: or_default(cell(3), DEFAULT_CATEGORY),
        tags: cell(4),
        created_at: or_default(cell(5), &now),
        updated_at: or_default(cell(6), &now),
        is_pinned: or_default(cell(7), "false"),
    })
}

/// Strict header check: all 8 canonical labels, exact match, exact order.
/// Earlier revisions accepted a case-insensitive first cell or any known
/// label anywhere in the row; that leniency is intentionally not kept.
pub fn header_is_valid(cells: &[String]) -> bool {
    cells.len() == COLUMN_COUNT
        && cells.iter().zip(HEADER_LABELS.iter()).all(|(cell, label)| cell == label)
}

/// The canonical header row as owned strings.
pub fn header_row() -> Vec<String> {
    HEADER_LABELS.iter().map(|s| s.to_string()).collect()
}

/// Sheet row occupied by the entry at `scan_index` in a 0-based data scan.
pub fn sheet_row(scan_index: usize) -> usize {
    scan_index + HEADER_OFFSET
}
