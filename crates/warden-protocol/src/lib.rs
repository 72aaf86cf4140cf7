#![forbid(unsafe_code)]

mod query;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use warden_core::{Channel, Guild, GuildId, Role, Subscription};

pub use query::{parse_query, Query, QueryResult, MAX_QUERY_BYTES};

/// Current snapshot document version.
pub const SNAPSHOT_VERSION: u16 = 1;
/// Maximum allowed snapshot document bytes.
pub const MAX_SNAPSHOT_BYTES: usize = 8 * 1024 * 1024;

/// Read-only dump of the entities permission checks run against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Snapshot {
    pub v: u16,
    #[serde(default)]
    pub guilds: Vec<Guild>,
    /// Roles in source order; evaluation order follows it.
    #[serde(default)]
    pub roles: Vec<Role>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub subscriptions: Vec<Subscription>,
}

/// Parse and validate a snapshot document.
///
/// # Errors
/// Returns [`ProtocolError`] if the document exceeds `max_bytes`, is malformed
/// JSON, carries an unsupported version, repeats an id, or points at a guild
/// it does not define.
pub fn parse_snapshot(input: &[u8], max_bytes: usize) -> Result<Snapshot, ProtocolError> {
    if input.len() > max_bytes {
        return Err(ProtocolError::OversizedPayload {
            max: max_bytes,
            actual: input.len(),
        });
    }

    let snapshot: Snapshot = serde_json::from_slice(input)?;
    if snapshot.v != SNAPSHOT_VERSION {
        return Err(ProtocolError::UnsupportedVersion {
            expected: SNAPSHOT_VERSION,
            actual: snapshot.v,
        });
    }
    validate_references(&snapshot)?;
    Ok(snapshot)
}

fn validate_references(snapshot: &Snapshot) -> Result<(), ProtocolError> {
    let mut guild_ids = HashSet::new();
    for guild in &snapshot.guilds {
        if !guild_ids.insert(guild.id) {
            return Err(duplicate("guild", guild.id));
        }
    }

    let mut role_ids = HashSet::new();
    for role in &snapshot.roles {
        if !role_ids.insert(role.id) {
            return Err(duplicate("role", role.id));
        }
        ensure_guild(&guild_ids, role.guild_id)?;
    }

    let mut channel_ids = HashSet::new();
    for channel in &snapshot.channels {
        if !channel_ids.insert(channel.id) {
            return Err(duplicate("channel", channel.id));
        }
        if let Some(guild_id) = channel.guild_id {
            ensure_guild(&guild_ids, guild_id)?;
        }
    }
    Ok(())
}

fn duplicate(kind: &'static str, id: impl ToString) -> ProtocolError {
    ProtocolError::DuplicateId {
        kind,
        id: id.to_string(),
    }
}

fn ensure_guild(known: &HashSet<GuildId>, id: GuildId) -> Result<(), ProtocolError> {
    if known.contains(&id) {
        Ok(())
    } else {
        Err(ProtocolError::UnknownGuild { id: id.to_string() })
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("payload exceeds max size: max={max} bytes actual={actual} bytes")]
    OversizedPayload { max: usize, actual: usize },
    #[error("unsupported snapshot version: expected={expected} actual={actual}")]
    UnsupportedVersion { expected: u16, actual: u16 },
    #[error("duplicate {kind} id: {id}")]
    DuplicateId { kind: &'static str, id: String },
    #[error("reference to unknown guild: {id}")]
    UnknownGuild { id: String },
    #[error("invalid json payload")]
    InvalidJson,
}

impl ProtocolError {
    /// Stable machine-readable code reported back to callers.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::OversizedPayload { .. } => "payload_too_large",
            Self::UnsupportedVersion { .. } => "unsupported_version",
            Self::DuplicateId { .. } => "duplicate_id",
            Self::UnknownGuild { .. } => "unknown_guild",
            Self::InvalidJson => "invalid_json",
        }
    }
}

impl From<serde_json::Error> for ProtocolError {
    fn from(_: serde_json::Error) -> Self {
        Self::InvalidJson
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use warden_core::{GuildId, RoleId, UserId};

    use super::{parse_snapshot, ProtocolError, MAX_SNAPSHOT_BYTES, SNAPSHOT_VERSION};

    fn guild_json(id: GuildId, everyone: RoleId) -> serde_json::Value {
        json!({"id": id, "owner_id": UserId::new(), "everyone_role_id": everyone})
    }

    #[test]
    fn parse_accepts_minimal_snapshot() {
        let snapshot = parse_snapshot(br#"{"v":1}"#, MAX_SNAPSHOT_BYTES).unwrap();
        assert_eq!(snapshot.v, SNAPSHOT_VERSION);
        assert!(snapshot.guilds.is_empty());
        assert!(snapshot.channels.is_empty());
    }

    #[test]
    fn parse_rejects_unsupported_version() {
        let error = parse_snapshot(br#"{"v":99}"#, MAX_SNAPSHOT_BYTES).unwrap_err();
        assert_eq!(
            error,
            ProtocolError::UnsupportedVersion {
                expected: SNAPSHOT_VERSION,
                actual: 99,
            }
        );
    }

    #[test]
    fn parse_rejects_oversized_and_unknown_fields() {
        let error = parse_snapshot(br#"{"v":1}"#, 4).unwrap_err();
        assert_eq!(error, ProtocolError::OversizedPayload { max: 4, actual: 7 });

        let error = parse_snapshot(br#"{"v":1,"extra":1}"#, MAX_SNAPSHOT_BYTES).unwrap_err();
        assert_eq!(error, ProtocolError::InvalidJson);
    }

    #[test]
    fn parse_rejects_numeric_masks() {
        let guild = GuildId::new();
        let everyone = RoleId::new();
        let payload = json!({
            "v": 1,
            "guilds": [guild_json(guild, everyone)],
            "roles": [{"id": everyone, "guild_id": guild, "permissions": 1024}],
        });
        let error = parse_snapshot(payload.to_string().as_bytes(), MAX_SNAPSHOT_BYTES).unwrap_err();
        assert_eq!(error.code(), "invalid_json");
    }

    #[test]
    fn parse_rejects_duplicates_and_dangling_guilds() {
        let guild = GuildId::new();
        let everyone = RoleId::new();
        let payload = json!({
            "v": 1,
            "guilds": [guild_json(guild, everyone), guild_json(guild, everyone)],
        });
        let error = parse_snapshot(payload.to_string().as_bytes(), MAX_SNAPSHOT_BYTES).unwrap_err();
        assert_eq!(
            error,
            ProtocolError::DuplicateId {
                kind: "guild",
                id: guild.to_string(),
            }
        );

        let stray = GuildId::new();
        let payload = json!({
            "v": 1,
            "guilds": [guild_json(guild, everyone)],
            "channels": [{"id": warden_core::ChannelId::new(), "guild_id": stray}],
        });
        let error = parse_snapshot(payload.to_string().as_bytes(), MAX_SNAPSHOT_BYTES).unwrap_err();
        assert_eq!(
            error,
            ProtocolError::UnknownGuild {
                id: stray.to_string(),
            }
        );
    }

    #[test]
    fn parse_keeps_high_mask_bits_and_role_order() {
        let guild = GuildId::new();
        let everyone = RoleId::new();
        let second = RoleId::new();
        let payload = json!({
            "v": 1,
            "guilds": [guild_json(guild, everyone)],
            "roles": [
                {"id": second, "guild_id": guild, "permissions": "70368744177664"},
                {"id": everyone, "guild_id": guild, "permissions": "0", "is_everyone": true},
            ],
        });
        let snapshot = parse_snapshot(payload.to_string().as_bytes(), MAX_SNAPSHOT_BYTES).unwrap();
        assert_eq!(snapshot.roles[0].id, second);
        assert_eq!(snapshot.roles[0].permissions.bits(), 1 << 46);
        assert!(snapshot.roles[1].is_everyone);
    }
}
