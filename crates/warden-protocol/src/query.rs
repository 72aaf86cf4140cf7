use serde::{Deserialize, Serialize};
use warden_core::{ChannelId, GuildId, UserId};

use crate::ProtocolError;

/// Maximum allowed bytes for a single query line.
pub const MAX_QUERY_BYTES: usize = 16 * 1024;

/// One permission question, tagged by `kind`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", deny_unknown_fields)]
pub enum Query {
    Channel {
        user_id: UserId,
        channel_id: ChannelId,
        flags: Vec<String>,
    },
    Server {
        user_id: UserId,
        guild_id: GuildId,
        flags: Vec<String>,
    },
    Perk {
        user_id: UserId,
        perk: String,
    },
}

impl Query {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Channel { .. } => "channel",
            Self::Server { .. } => "server",
            Self::Perk { .. } => "perk",
        }
    }
}

/// Answer written back for each query line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryResult {
    Verdict { granted: bool },
    Error { error: String },
}

impl QueryResult {
    #[must_use]
    pub fn error(code: impl Into<String>) -> Self {
        Self::Error { error: code.into() }
    }
}

/// Parse one query line at the input boundary.
///
/// # Errors
/// Returns [`ProtocolError`] if the line is too large or not a valid query.
pub fn parse_query(input: &[u8]) -> Result<Query, ProtocolError> {
    if input.len() > MAX_QUERY_BYTES {
        return Err(ProtocolError::OversizedPayload {
            max: MAX_QUERY_BYTES,
            actual: input.len(),
        });
    }
    Ok(serde_json::from_slice(input)?)
}
