//! Line protocol between the game client and the service.
//!
//! Requests arrive one per line on stdin:
//!
//! - any line containing `shutdown` stops the service
//! - `RQSTMV[3,A,0,F,1,2,0,4,-1]&2` asks for a move; the bracketed list holds
//!   eight feature tokens plus an optional ninth (placeholder label) that is
//!   dropped, and `&2` is the client's retry counter
//! - anything else is acknowledged and otherwise ignored

use thiserror::Error;
use ttt_move_core::{SanitizeError, FEATURE_COUNT};

pub const SHUTDOWN_TOKEN: &str = "shutdown";
pub const REQUEST_MARKER: &str = "RQSTMV";
pub const RESPONSE_MARKER: &str = "RSPMV";
pub const READY_TOKEN: &str = "READY";

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestParseError {
    #[error("missing '[' after the RQSTMV marker")]
    MissingOpenBracket,

    #[error("missing ']' closing the feature list")]
    MissingCloseBracket,

    #[error("expected {} or {} feature tokens, got {found}", FEATURE_COUNT, FEATURE_COUNT + 1)]
    TokenCount { found: usize },

    #[error("{0}")]
    Malformed(#[from] SanitizeError),
}

/// A move request with its raw feature tokens
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PredictRequest {
    /// Exactly [`FEATURE_COUNT`] unsanitized tokens
    pub tokens: Vec<String>,
    /// Retry counter from an `&N` suffix
    pub attempt: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Shutdown,
    Predict(PredictRequest),
    Unknown(String),
}

impl Command {
    /// Classify one input line.
    ///
    /// Shutdown wins over a request marker on the same line.
    pub fn parse(line: &str) -> Result<Self, RequestParseError> {
        let line = line.trim();

        if line.contains(SHUTDOWN_TOKEN) {
            return Ok(Command::Shutdown);
        }

        match line.find(REQUEST_MARKER) {
            Some(pos) => parse_request(&line[pos + REQUEST_MARKER.len()..]).map(Command::Predict),
            None => Ok(Command::Unknown(line.to_string())),
        }
    }
}

/// `rest` starts right after the marker, so a `[` earlier in the line is
/// never taken as the start of the payload.
fn parse_request(rest: &str) -> Result<PredictRequest, RequestParseError> {
    let open = rest.find('[').ok_or(RequestParseError::MissingOpenBracket)?;
    let body = &rest[open + 1..];
    let close = body.find(']').ok_or(RequestParseError::MissingCloseBracket)?;

    let mut tokens: Vec<String> = body[..close]
        .split(',')
        .map(|t| t.trim().to_string())
        .collect();

    match tokens.len() {
        n if n == FEATURE_COUNT => {}
        n if n == FEATURE_COUNT + 1 => {
            tokens.pop();
        }
        found => return Err(RequestParseError::TokenCount { found }),
    }

    let attempt = body[close + 1..]
        .trim()
        .strip_prefix('&')
        .and_then(|n| n.trim().parse().ok());

    Ok(PredictRequest { tokens, attempt })
}

/// Response line for a predicted move
pub fn format_prediction(label: i64) -> String {
    format!("{RESPONSE_MARKER}[{label}]")
}
