//! Single-scope narrowing over one allow/deny pair.

use crate::{codec::FlagTable, PermissionMask, ADMINISTRATOR, PERMISSIONS};

/// Outcome of evaluating one scope against the flags still required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<'a> {
    Granted,
    Denied,
    /// Flags this scope said nothing about, in input order.
    StillMissing(Vec<&'a str>),
}

impl Verdict<'_> {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagStatus {
    Allowed,
    Denied,
    Unresolved,
}

/// Resolves one flag against an allow/deny pair, deny winning over allow.
///
/// When neither mask carries the flag's exact bit, every defined flag whose
/// bits are a superset of it is consulted as well. Names missing from `table`
/// are always [`FlagStatus::Unresolved`].
#[must_use]
pub fn check_permission(
    table: &FlagTable,
    flag: &str,
    allow: PermissionMask,
    deny: PermissionMask,
) -> FlagStatus {
    let Some(bits) = table.bits_of(flag) else {
        return FlagStatus::Unresolved;
    };
    if deny.contains_bits(bits) {
        return FlagStatus::Denied;
    }
    if allow.contains_bits(bits) {
        return FlagStatus::Allowed;
    }

    let mut status = FlagStatus::Unresolved;
    for candidate in table.entries().iter().filter(|p| p.bits & bits == bits) {
        if deny.contains_bits(candidate.bits) {
            return FlagStatus::Denied;
        }
        if allow.contains_bits(candidate.bits) {
            status = FlagStatus::Allowed;
        }
    }
    status
}

/// Narrows `required` against one scope of the permission table.
///
/// `ADMINISTRATOR` in `allow` grants outright, ignoring `deny`. The first
/// denied flag short-circuits the whole call.
#[must_use]
pub fn has_permissions<'a>(
    allow: PermissionMask,
    deny: PermissionMask,
    required: &[&'a str],
) -> Verdict<'a> {
    if allow.contains_bits(ADMINISTRATOR) {
        return Verdict::Granted;
    }

    let mut remaining = Vec::new();
    for &flag in required {
        match check_permission(&PERMISSIONS, flag, allow, deny) {
            FlagStatus::Denied => return Verdict::Denied,
            FlagStatus::Allowed => {}
            FlagStatus::Unresolved => remaining.push(flag),
        }
    }

    if remaining.is_empty() {
        Verdict::Granted
    } else {
        Verdict::StillMissing(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::{check_permission, has_permissions, FlagStatus, Verdict};
    use crate::{
        codec::{FlagDefinition, FlagTable},
        PermissionMask, PERMISSIONS,
    };

    const COMPOSITE: FlagTable = FlagTable::new(
        "composite",
        &[
            FlagDefinition { name: "READ", bits: 0b001 },
            FlagDefinition { name: "WRITE", bits: 0b010 },
            FlagDefinition { name: "READ_WRITE", bits: 0b011 },
        ],
    );

    fn mask(names: &[&str]) -> PermissionMask {
        PERMISSIONS.encode(names)
    }

    #[test]
    fn deny_wins_within_a_single_scope() {
        let both = mask(&["SEND_MESSAGES"]);
        assert_eq!(
            check_permission(&PERMISSIONS, "SEND_MESSAGES", both, both),
            FlagStatus::Denied
        );
        assert_eq!(
            has_permissions(both, both, &["SEND_MESSAGES"]),
            Verdict::Denied
        );
    }

    #[test]
    fn unknown_flags_stay_unresolved() {
        let allow = PERMISSIONS.all();
        assert_eq!(
            check_permission(&PERMISSIONS, "FLY", allow, PermissionMask::empty()),
            FlagStatus::Unresolved
        );
    }

    #[test]
    fn administrator_grants_despite_deny() {
        let allow = mask(&["ADMINISTRATOR"]);
        let deny = PERMISSIONS.all();
        let verdict = has_permissions(allow, deny, &["SEND_MESSAGES", "BAN_MEMBERS"]);
        assert_eq!(verdict, Verdict::Granted);
    }

    #[test]
    fn administrator_in_deny_only_is_an_ordinary_flag() {
        let deny = mask(&["ADMINISTRATOR"]);
        let verdict = has_permissions(PermissionMask::empty(), deny, &["ADMINISTRATOR"]);
        assert_eq!(verdict, Verdict::Denied);
    }

    #[test]
    fn unresolved_flags_are_returned_in_input_order() {
        let allow = mask(&["VIEW_CHANNEL"]);
        let verdict = has_permissions(
            allow,
            PermissionMask::empty(),
            &["MANAGE_MESSAGES", "VIEW_CHANNEL", "ATTACH_FILES"],
        );
        assert_eq!(
            verdict,
            Verdict::StillMissing(vec!["MANAGE_MESSAGES", "ATTACH_FILES"])
        );
    }

    #[test]
    fn denial_short_circuits_before_later_flags() {
        let allow = mask(&["ATTACH_FILES"]);
        let deny = mask(&["SEND_MESSAGES"]);
        let verdict = has_permissions(allow, deny, &["EMBED_LINKS", "SEND_MESSAGES", "ATTACH_FILES"]);
        assert_eq!(verdict, Verdict::Denied);
        assert!(!verdict.is_granted());
    }

    #[test]
    fn empty_requirement_is_granted() {
        let verdict = has_permissions(PermissionMask::empty(), PermissionMask::empty(), &[]);
        assert!(verdict.is_granted());
    }

    #[test]
    fn superset_flags_resolve_sub_flags() {
        let composite = PermissionMask::from_bits(0b011);
        assert_eq!(
            check_permission(&COMPOSITE, "READ", composite, PermissionMask::empty()),
            FlagStatus::Allowed
        );
        assert_eq!(
            check_permission(&COMPOSITE, "WRITE", PermissionMask::empty(), composite),
            FlagStatus::Denied
        );
        assert_eq!(
            check_permission(
                &COMPOSITE,
                "READ",
                PermissionMask::from_bits(0b010),
                PermissionMask::empty()
            ),
            FlagStatus::Unresolved
        );
    }
}
