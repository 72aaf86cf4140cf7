use std::collections::BTreeSet;

use crate::PermissionMask;

/// One named flag bound to its bit value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagDefinition {
    pub name: &'static str,
    pub bits: u64,
}

impl FlagDefinition {
    #[must_use]
    pub const fn new(name: &'static str, bit: u32) -> Self {
        Self {
            name,
            bits: 1 << bit,
        }
    }
}

/// Static name-to-bit mapping shared by the permission and perk codecs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlagTable {
    label: &'static str,
    entries: &'static [FlagDefinition],
}

impl FlagTable {
    #[must_use]
    pub const fn new(label: &'static str, entries: &'static [FlagDefinition]) -> Self {
        Self { label, entries }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        self.label
    }

    #[must_use]
    pub const fn entries(&self) -> &'static [FlagDefinition] {
        self.entries
    }

    #[must_use]
    pub fn bits_of(&self, name: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.bits)
    }

    /// ORs the bits of every recognized name. Unknown names are ignored.
    #[must_use]
    pub fn encode<I, S>(&self, names: I) -> PermissionMask
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let bits = names
            .into_iter()
            .filter_map(|name| self.bits_of(name.as_ref()))
            .fold(0_u64, |bits, flag| bits | flag);
        PermissionMask::from_bits(bits)
    }

    #[must_use]
    pub fn decode(&self, mask: PermissionMask) -> BTreeSet<&'static str> {
        self.entries
            .iter()
            .filter(|entry| mask.contains_bits(entry.bits))
            .map(|entry| entry.name)
            .collect()
    }

    #[must_use]
    pub fn all(&self) -> PermissionMask {
        PermissionMask::from_bits(
            self.entries
                .iter()
                .fold(0_u64, |bits, entry| bits | entry.bits),
        )
    }

    /// Splits `raw` into the defined part and whatever bits no flag claims.
    #[must_use]
    pub fn mask_known(&self, raw: u64) -> (PermissionMask, u64) {
        let known = self.all().bits();
        (PermissionMask::from_bits(raw & known), raw & !known)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{FlagDefinition, FlagTable};
    use crate::{PermissionMask, PERKS, PERMISSIONS};

    const OVERLAPPING: FlagTable = FlagTable::new(
        "overlapping",
        &[
            FlagDefinition { name: "READ", bits: 0b001 },
            FlagDefinition { name: "WRITE", bits: 0b010 },
            FlagDefinition { name: "READ_WRITE", bits: 0b011 },
        ],
    );

    #[test]
    fn encode_ignores_unknown_names() {
        let mask = PERMISSIONS.encode(["SEND_MESSAGES", "NOT_A_FLAG", "VIEW_CHANNEL"]);
        assert_eq!(mask.bits(), (1 << 11) | (1 << 10));
        assert!(PERMISSIONS.encode(["NOT_A_FLAG"]).is_empty());
    }

    #[test]
    fn decode_round_trips_recognized_sets() {
        let names: BTreeSet<&'static str> = ["ADMINISTRATOR", "SEND_VOICE_MESSAGES", "KICK_MEMBERS"]
            .into_iter()
            .collect();
        assert_eq!(PERMISSIONS.decode(PERMISSIONS.encode(&names)), names);

        let every: BTreeSet<&'static str> =
            PERKS.entries().iter().map(|entry| entry.name).collect();
        assert_eq!(PERKS.decode(PERKS.encode(&every)), every);
        assert!(PERMISSIONS.decode(PermissionMask::empty()).is_empty());
    }

    #[test]
    fn decode_uses_exact_bit_equality() {
        let decoded = OVERLAPPING.decode(PermissionMask::from_bits(0b001));
        assert_eq!(decoded.into_iter().collect::<Vec<_>>(), vec!["READ"]);

        let decoded = OVERLAPPING.decode(PermissionMask::from_bits(0b011));
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn mask_known_splits_undefined_bits() {
        let (known, unknown) = PERMISSIONS.mask_known((1 << 63) | (1 << 11));
        assert_eq!(known.bits(), 1 << 11);
        assert_eq!(unknown, 1 << 63);
    }

    #[test]
    fn perk_and_permission_tables_are_independent() {
        assert_eq!(PERKS.label(), "perks");
        assert_eq!(PERMISSIONS.label(), "permissions");
        assert!(PERKS.bits_of("SEND_MESSAGES").is_none());
        assert!(PERMISSIONS.bits_of("CHANGE_USERNAME").is_none());
    }
}
