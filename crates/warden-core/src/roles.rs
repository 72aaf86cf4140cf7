use crate::{Guild, Role, UserId};

/// Orders the roles that apply to `user` inside `guild`.
///
/// The everyone role comes first even without a membership record, followed
/// by every other role listing `user` as a member, in source order.
#[must_use]
pub fn ordered_roles<'r>(user: UserId, guild: &Guild, roles: &'r [Role]) -> Vec<&'r Role> {
    let everyone = roles
        .iter()
        .find(|role| role.id == guild.everyone_role_id)
        .or_else(|| roles.iter().find(|role| role.is_everyone));

    let mut ordered = Vec::with_capacity(roles.len());
    if let Some(everyone) = everyone {
        ordered.push(everyone);
    } else {
        tracing::warn!(guild_id = %guild.id, "guild has no everyone role");
    }

    ordered.extend(explicit_roles(user, guild, roles));
    ordered
}

/// Roles listing `user` as an explicit member, everyone role excluded.
#[must_use]
pub fn explicit_roles<'r>(user: UserId, guild: &Guild, roles: &'r [Role]) -> Vec<&'r Role> {
    roles
        .iter()
        .filter(|role| {
            role.id != guild.everyone_role_id && !role.is_everyone && role.has_member(user)
        })
        .collect()
}
