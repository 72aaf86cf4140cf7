use crate::{
    resolver::{has_permissions, Verdict},
    Guild, PermissionMask, Role, UserId,
};

/// Runs each role's base permissions, in order, against the flags still
/// pending. Guild roles carry no deny set.
pub(crate) fn narrow_by_role_base<'r, 'a>(
    roles: impl IntoIterator<Item = &'r Role>,
    required: &[&'a str],
) -> Verdict<'a> {
    let mut pending = required.to_vec();
    for role in roles {
        match has_permissions(role.permissions, PermissionMask::empty(), &pending) {
            Verdict::Granted => {
                tracing::trace!(role_id = %role.id, "role base permissions satisfied request");
                return Verdict::Granted;
            }
            Verdict::Denied => return Verdict::Denied,
            Verdict::StillMissing(rest) => pending = rest,
        }
    }

    if pending.is_empty() {
        Verdict::Granted
    } else {
        Verdict::StillMissing(pending)
    }
}

/// Guild-scoped check: owner bypass, then sequential role narrowing.
///
/// `roles` is used exactly as supplied. The everyone role is not inserted
/// here, so callers pass whichever roles should count.
#[must_use]
pub fn evaluate_server_permission(
    user: UserId,
    guild: &Guild,
    roles: &[Role],
    required: &[&str],
) -> bool {
    if guild.owner_id == user {
        tracing::debug!(%user, guild_id = %guild.id, phase = "owner_bypass", "server permission granted");
        return true;
    }

    let granted = narrow_by_role_base(roles, required).is_granted();
    tracing::debug!(
        %user,
        guild_id = %guild.id,
        phase = "role_base",
        granted,
        "server permission evaluated"
    );
    granted
}
