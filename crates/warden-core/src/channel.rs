//! Channel-scoped evaluation.
//!
//! Layers run in a fixed order: ownership, the caller's own overwrite, role
//! overwrites one role at a time, then role base permissions one role at a
//! time. Each layer only sees the flags earlier layers left unresolved.

use crate::{
    resolver::{has_permissions, Verdict},
    roles::ordered_roles,
    server::narrow_by_role_base,
    Channel, Guild, Role, UserId,
};

/// The guild a channel belongs to plus every role defined in it.
#[derive(Debug, Clone, Copy)]
pub struct GuildContext<'a> {
    pub guild: &'a Guild,
    pub roles: &'a [Role],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    OwnerBypass,
    UserOverwrite,
    DirectMessage,
    RoleOverwrite,
    RoleBase,
}

impl Phase {
    const fn as_str(self) -> &'static str {
        match self {
            Self::OwnerBypass => "owner_bypass",
            Self::UserOverwrite => "user_overwrite",
            Self::DirectMessage => "dm_no_role_fallback",
            Self::RoleOverwrite => "role_overwrite",
            Self::RoleBase => "role_base",
        }
    }
}

/// Decides whether `user` holds every flag in `required` on `channel`.
///
/// `guild` is ignored for direct-message channels and when it is not the
/// channel's own guild. For a guild channel without context no roles apply.
#[must_use]
pub fn evaluate_channel_permission(
    user: UserId,
    channel: &Channel,
    guild: Option<GuildContext<'_>>,
    required: &[&str],
) -> bool {
    let (granted, phase) = resolve(user, channel, guild, required);
    tracing::debug!(
        %user,
        channel_id = %channel.id,
        phase = phase.as_str(),
        granted,
        "channel permission evaluated"
    );
    granted
}

fn resolve(
    user: UserId,
    channel: &Channel,
    guild: Option<GuildContext<'_>>,
    required: &[&str],
) -> (bool, Phase) {
    let guild = guild.filter(|ctx| {
        if channel.is_direct() {
            return false;
        }
        let matches = Some(ctx.guild.id) == channel.guild_id;
        if !matches {
            tracing::warn!(
                channel_id = %channel.id,
                guild_id = %ctx.guild.id,
                "guild context does not own channel"
            );
        }
        matches
    });
    if channel.owner_id == Some(user) || guild.is_some_and(|ctx| ctx.guild.owner_id == user) {
        return (true, Phase::OwnerBypass);
    }

    let mut pending = required.to_vec();
    if let Some(overwrite) = channel.user_overwrite(user) {
        match has_permissions(overwrite.allow, overwrite.deny, &pending) {
            Verdict::Granted => return (true, Phase::UserOverwrite),
            Verdict::Denied => return (false, Phase::UserOverwrite),
            Verdict::StillMissing(rest) => pending = rest,
        }
    }

    if channel.is_direct() {
        return (false, Phase::DirectMessage);
    }

    let roles = match guild {
        Some(ctx) => ordered_roles(user, ctx.guild, ctx.roles),
        None => {
            tracing::warn!(channel_id = %channel.id, "guild channel evaluated without guild context");
            Vec::new()
        }
    };

    for role in &roles {
        let Some(overwrite) = channel.role_overwrite(role.id) else {
            continue;
        };
        match has_permissions(overwrite.allow, overwrite.deny, &pending) {
            Verdict::Granted => {
                tracing::trace!(role_id = %role.id, "role overwrite satisfied request");
                pending.clear();
                break;
            }
            Verdict::Denied => {
                tracing::trace!(role_id = %role.id, "role overwrite denied request");
                return (false, Phase::RoleOverwrite);
            }
            Verdict::StillMissing(rest) => pending = rest,
        }
    }
    if pending.is_empty() {
        return (true, Phase::RoleOverwrite);
    }

    let granted = narrow_by_role_base(roles.iter().copied(), &pending).is_granted();
    (granted, Phase::RoleBase)
}
