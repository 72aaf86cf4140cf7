use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{ChannelId, GuildId, PermissionMask, PlanId, RoleId, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Guild {
    pub id: GuildId,
    pub owner_id: UserId,
    pub everyone_role_id: RoleId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Role {
    pub id: RoleId,
    pub guild_id: GuildId,
    pub permissions: PermissionMask,
    #[serde(default)]
    pub is_everyone: bool,
    #[serde(default)]
    pub member_ids: HashSet<UserId>,
}

impl Role {
    #[must_use]
    pub fn has_member(&self, user: UserId) -> bool {
        self.member_ids.contains(&user)
    }
}

/// Allow/deny pair attached to a channel for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Overwrite<S> {
    pub subject_id: S,
    #[serde(default)]
    pub allow: PermissionMask,
    #[serde(default)]
    pub deny: PermissionMask,
}

pub type UserOverwrite = Overwrite<UserId>;
pub type RoleOverwrite = Overwrite<RoleId>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Channel {
    pub id: ChannelId,
    /// `None` for direct-message and group channels.
    #[serde(default)]
    pub guild_id: Option<GuildId>,
    /// Only set on direct-message and group channels.
    #[serde(default)]
    pub owner_id: Option<UserId>,
    #[serde(default)]
    pub user_overwrites: Vec<UserOverwrite>,
    #[serde(default)]
    pub role_overwrites: Vec<RoleOverwrite>,
}

impl Channel {
    #[must_use]
    pub const fn is_direct(&self) -> bool {
        self.guild_id.is_none()
    }

    #[must_use]
    pub fn user_overwrite(&self, user: UserId) -> Option<&UserOverwrite> {
        self.user_overwrites
            .iter()
            .find(|overwrite| overwrite.subject_id == user)
    }

    #[must_use]
    pub fn role_overwrite(&self, role: RoleId) -> Option<&RoleOverwrite> {
        self.role_overwrites
            .iter()
            .find(|overwrite| overwrite.subject_id == role)
    }
}

/// One subscription plan held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Subscription {
    pub plan_id: PlanId,
    pub user_id: UserId,
    pub perks: PermissionMask,
    pub active: bool,
}

/// OR of the perk masks of every active plan a user holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserSubscriptionPerk {
    pub user_id: UserId,
    pub perks: PermissionMask,
    pub active_plans: usize,
}

impl UserSubscriptionPerk {
    #[must_use]
    pub fn aggregate<'s>(
        user_id: UserId,
        subscriptions: impl IntoIterator<Item = &'s Subscription>,
    ) -> Self {
        let mut aggregate = Self {
            user_id,
            perks: PermissionMask::empty(),
            active_plans: 0,
        };
        for subscription in subscriptions {
            if subscription.user_id != user_id || !subscription.active {
                continue;
            }
            aggregate.perks |= subscription.perks;
            aggregate.active_plans += 1;
        }
        aggregate
    }

    #[must_use]
    pub const fn has_active_plan(&self) -> bool {
        self.active_plans > 0
    }
}
