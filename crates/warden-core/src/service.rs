use crate::{
    channel::{evaluate_channel_permission, GuildContext},
    perk::evaluate_perk,
    repository::{PermissionRepository, RepositoryError},
    roles::explicit_roles,
    server::evaluate_server_permission,
    ChannelId, GuildId, UserSubscriptionPerk, UserId,
};

/// Loads the snapshot an evaluation needs and hands it to the evaluators.
///
/// Fetches are independent reads; the verdict is only as consistent as the
/// repository makes them.
#[derive(Debug, Clone)]
pub struct PermissionService<R> {
    repository: R,
}

impl<R: PermissionRepository> PermissionService<R> {
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self { repository }
    }

    #[must_use]
    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the channel or its guild is missing.
    pub fn channel_permission(
        &self,
        user: UserId,
        channel_id: ChannelId,
        required: &[&str],
    ) -> Result<bool, RepositoryError> {
        let channel = self.repository.channel(channel_id)?;
        let Some(guild_id) = channel.guild_id else {
            return Ok(evaluate_channel_permission(user, &channel, None, required));
        };

        let guild = self.repository.guild(guild_id)?;
        let roles = self.repository.guild_roles(guild_id)?;
        let context = GuildContext {
            guild: &guild,
            roles: &roles,
        };
        Ok(evaluate_channel_permission(
            user,
            &channel,
            Some(context),
            required,
        ))
    }

    /// Passes only the caller's explicit roles; the everyone role does not
    /// take part in guild-scoped checks.
    ///
    /// # Errors
    /// Returns [`RepositoryError::NotFound`] if the guild is missing.
    pub fn server_permission(
        &self,
        user: UserId,
        guild_id: GuildId,
        required: &[&str],
    ) -> Result<bool, RepositoryError> {
        let guild = self.repository.guild(guild_id)?;
        let roles = self.repository.guild_roles(guild_id)?;
        let held: Vec<_> = explicit_roles(user, &guild, &roles)
            .into_iter()
            .cloned()
            .collect();
        Ok(evaluate_server_permission(user, &guild, &held, required))
    }

    /// # Errors
    /// Propagates repository failures while loading subscriptions.
    pub fn perk(&self, user: UserId, required_perk: &str) -> Result<bool, RepositoryError> {
        let subscriptions = self.repository.subscriptions(user)?;
        let aggregate = UserSubscriptionPerk::aggregate(user, &subscriptions);
        if !aggregate.has_active_plan() {
            tracing::debug!(%user, perk = required_perk, "no active plan");
            return Ok(false);
        }
        let granted = evaluate_perk(aggregate.perks, required_perk);
        tracing::debug!(%user, perk = required_perk, granted, "perk evaluated");
        Ok(granted)
    }
}
