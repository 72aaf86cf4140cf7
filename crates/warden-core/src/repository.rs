use std::collections::HashMap;

use crate::{
    codec::FlagTable, Channel, ChannelId, Guild, GuildId, Role, Subscription, UserId, PERKS,
    PERMISSIONS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Guild,
    Channel,
}

impl EntityKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Guild => "guild",
            Self::Channel => "channel",
        }
    }
}

impl core::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: String },
}

/// Read-only source of the entities an evaluation needs.
pub trait PermissionRepository {
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the guild does not exist.
    fn guild(&self, id: GuildId) -> Result<Guild, RepositoryError>;

    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the channel does not exist.
    fn channel(&self, id: ChannelId) -> Result<Channel, RepositoryError>;

    /// Every role defined in the guild, in source order.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the guild does not exist.
    fn guild_roles(&self, id: GuildId) -> Result<Vec<Role>, RepositoryError>;

    /// Every subscription the user holds, active or not. Users without
    /// subscriptions yield an empty list.
    ///
    /// # Errors
    /// Returns a [`RepositoryError`] if the backing store fails.
    fn subscriptions(&self, user: UserId) -> Result<Vec<Subscription>, RepositoryError>;
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryRepository {
    guilds: HashMap<GuildId, Guild>,
    channels: HashMap<ChannelId, Channel>,
    roles: HashMap<GuildId, Vec<Role>>,
    subscriptions: HashMap<UserId, Vec<Subscription>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_guild(&mut self, guild: Guild) {
        self.roles.entry(guild.id).or_default();
        self.guilds.insert(guild.id, guild);
    }

    pub fn insert_channel(&mut self, channel: Channel) {
        let masks = channel
            .user_overwrites
            .iter()
            .flat_map(|o| [o.allow, o.deny])
            .chain(channel.role_overwrites.iter().flat_map(|o| [o.allow, o.deny]));
        for mask in masks {
            warn_unknown_bits(&PERMISSIONS, mask.bits());
        }
        self.channels.insert(channel.id, channel);
    }

    /// Appends `role` after the roles already stored for its guild.
    pub fn insert_role(&mut self, role: Role) {
        warn_unknown_bits(&PERMISSIONS, role.permissions.bits());
        let roles = self.roles.entry(role.guild_id).or_default();
        if let Some(existing) = roles.iter_mut().find(|r| r.id == role.id) {
            *existing = role;
        } else {
            roles.push(role);
        }
    }

    pub fn insert_subscription(&mut self, subscription: Subscription) {
        warn_unknown_bits(&PERKS, subscription.perks.bits());
        self.subscriptions
            .entry(subscription.user_id)
            .or_default()
            .push(subscription);
    }
}

fn warn_unknown_bits(table: &FlagTable, raw: u64) {
    let (_, unknown) = table.mask_known(raw);
    if unknown != 0 {
        tracing::warn!(
            table = table.label(),
            unknown_bits = unknown,
            "mask carries undefined bits"
        );
    }
}

impl PermissionRepository for InMemoryRepository {
    fn guild(&self, id: GuildId) -> Result<Guild, RepositoryError> {
        self.guilds
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                kind: EntityKind::Guild,
                id: id.to_string(),
            })
    }

    fn channel(&self, id: ChannelId) -> Result<Channel, RepositoryError> {
        self.channels
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::NotFound {
                kind: EntityKind::Channel,
                id: id.to_string(),
            })
    }

    fn guild_roles(&self, id: GuildId) -> Result<Vec<Role>, RepositoryError> {
        if !self.guilds.contains_key(&id) {
            return Err(RepositoryError::NotFound {
                kind: EntityKind::Guild,
                id: id.to_string(),
            });
        }
        Ok(self.roles.get(&id).cloned().unwrap_or_default())
    }

    fn subscriptions(&self, user: UserId) -> Result<Vec<Subscription>, RepositoryError> {
        Ok(self.subscriptions.get(&user).cloned().unwrap_or_default())
    }
}
