//! Wire codec for the NBFC service protocol.
//!
//! Requests are a single JSON object followed by a newline:
//!
//! ```text
//! {"command":"set-fan-speed","fan":1,"speed":42}\n
//! ```
//!
//! Replies are not framed. The bytes read back may carry diagnostic output
//! around the JSON object, so decoding keeps everything up to and including
//! the last `}` and parses the first complete object inside that range.

use bytes::{BufMut, Bytes, BytesMut};
use nbfc_types::{Command, StatusSnapshot};
use serde_json::{Map, Value};

/// Terminates every encoded request
pub const LINE_TERMINATOR: u8 = b'\n';

const OPENING_BRACE: u8 = b'{';
const CLOSING_BRACE: u8 = b'}';

/// Top-level keys of a status reply; an object needs one to count
const STATUS_KEYS: [&str; 5] = ["pid", "config", "read-only", "temperature", "fans"];

/// Upper bound on object start positions tried before giving up
const MAX_START_CANDIDATES: usize = 16;

/// Encode a command as one JSON line.
///
/// # Errors
///
/// Returns `EncodeError::Json` if serialization fails.
pub fn encode(command: &Command) -> Result<Bytes, EncodeError> {
    let json = serde_json::to_vec(command)?;

    let mut buf = BytesMut::with_capacity(json.len() + 1);
    buf.put_slice(&json);
    buf.put_u8(LINE_TERMINATOR);

    Ok(buf.freeze())
}

/// Decode a raw `status` reply.
///
/// Everything after the last `}` is discarded. Parsing starts at the first
/// `{`; if that fails, each `{` that opens a new line is tried in turn. The
/// first complete object carrying at least one status key wins, so log lines
/// like `{"level":"info"}` ahead of the reply are skipped.
///
/// # Errors
///
/// Returns `DecodeError::MissingClosingBrace` if the reply holds no `}`,
/// `DecodeError::MissingOpeningBrace` if nothing could start an object,
/// `DecodeError::NotAStatus` if the only objects found are not status
/// replies, and `DecodeError::Json` if no candidate parses.
pub fn decode(raw: &[u8]) -> Result<StatusSnapshot, DecodeError> {
    let end = raw
        .iter()
        .rposition(|&b| b == CLOSING_BRACE)
        .ok_or(DecodeError::MissingClosingBrace)?;
    let window = &raw[..=end];

    let mut first_error = None;
    let starts = window
        .iter()
        .enumerate()
        .filter(|(_, b)| **b == OPENING_BRACE)
        .map(|(pos, _)| pos)
        .enumerate()
        .filter(|&(nth, pos)| nth == 0 || window[pos - 1] == b'\n')
        .map(|(_, pos)| pos)
        .take(MAX_START_CANDIDATES);

    for start in starts {
        let mut stream = serde_json::Deserializer::from_slice(&window[start..]).into_iter::<Value>();

        let error = match stream.next() {
            Some(Ok(Value::Object(object))) if is_status_object(&object) => {
                match serde_json::from_value(Value::Object(object)) {
                    Ok(snapshot) => {
                        if start > 0 {
                            tracing::debug!("Skipped {} leading non-protocol bytes", start);
                        }
                        return Ok(snapshot);
                    }
                    Err(e) => DecodeError::Json(e),
                }
            }
            Some(Ok(_)) => {
                tracing::debug!("Skipping non-status object at byte {}", start);
                DecodeError::NotAStatus
            }
            Some(Err(e)) => DecodeError::Json(e),
            None => continue,
        };
        first_error.get_or_insert(error);
    }

    Err(first_error.unwrap_or(DecodeError::MissingOpeningBrace))
}

fn is_status_object(object: &Map<String, Value>) -> bool {
    STATUS_KEYS.iter().any(|key| object.contains_key(*key))
}

/// Errors that can occur while encoding a request
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur while decoding a reply
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("No closing brace in response")]
    MissingClosingBrace,

    #[error("No JSON object in response")]
    MissingOpeningBrace,

    #[error("Response holds no status object")]
    NotAStatus,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
