//! Decoding of ISS history response bodies.

use isshist_types::DecodeError;
use serde::Deserialize;
use serde_json::Value;

/// Cursor metadata served with day queries (`history.cursor`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMeta {
    /// Offset of the page this block was served with.
    pub index: u64,
    /// Total rows available for the query.
    pub total: u64,
    /// Rows per page.
    pub page_size: u64,
}

/// One decoded response: raw rows plus optional cursor metadata.
#[derive(Debug, Clone, Default)]
pub struct RawPage {
    /// Column names, when the server sent them.
    pub columns: Vec<String>,
    /// Fixed-width row arrays in server order.
    pub rows: Vec<Vec<Value>>,
    /// Cursor metadata, present only for day queries.
    pub cursor: Option<CursorMeta>,
}

#[derive(Deserialize)]
struct Envelope {
    history: HistoryBlock,
    #[serde(rename = "history.cursor")]
    cursor: Option<CursorBlock>,
}

#[derive(Deserialize)]
struct HistoryBlock {
    #[serde(default)]
    columns: Vec<String>,
    data: Vec<Vec<Value>>,
}

#[derive(Deserialize)]
struct CursorBlock {
    data: Vec<Vec<Value>>,
}

/// Decodes a response body into a [`RawPage`].
///
/// Expected shape:
///
/// ```json
/// {
///   "history": { "columns": ["BOARDID", ...], "data": [[...], ...] },
///   "history.cursor": { "columns": ["INDEX", "TOTAL", "PAGESIZE"], "data": [[0, 250, 100]] }
/// }
/// ```
///
/// # Errors
///
/// Returns an error if the body is not JSON, lacks `history.data`, or carries
/// a cursor block that is not `[[index, total, pageSize]]` with a non-zero page size.
pub fn decode_page(body: &[u8]) -> Result<RawPage, DecodeError> {
    let envelope: Envelope = serde_json::from_slice(body)?;
    let cursor = envelope.cursor.map(parse_cursor).transpose()?;

    Ok(RawPage {
        columns: envelope.history.columns,
        rows: envelope.history.data,
        cursor,
    })
}

fn parse_cursor(block: CursorBlock) -> Result<CursorMeta, DecodeError> {
    let row = block
        .data
        .first()
        .ok_or_else(|| DecodeError::MalformedCursor("empty data".to_string()))?;

    let field = |i: usize, name: &str| {
        row.get(i).and_then(Value::as_u64).ok_or_else(|| {
            DecodeError::MalformedCursor(format!("{name} missing or not an unsigned integer"))
        })
    };

    let meta = CursorMeta {
        index: field(0, "INDEX")?,
        total: field(1, "TOTAL")?,
        page_size: field(2, "PAGESIZE")?,
    };

    if meta.page_size == 0 {
        return Err(DecodeError::MalformedCursor("PAGESIZE is 0".to_string()));
    }
    Ok(meta)
}
