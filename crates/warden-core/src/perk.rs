use crate::{
    resolver::{check_permission, FlagStatus},
    PermissionMask, PERKS,
};

/// Checks one perk against a user's aggregated perk mask.
///
/// An empty mask means no active plan and fails immediately.
#[must_use]
pub fn evaluate_perk(perks: PermissionMask, required_perk: &str) -> bool {
    if perks.is_empty() {
        return false;
    }
    check_permission(&PERKS, required_perk, perks, PermissionMask::empty()) == FlagStatus::Allowed
}
